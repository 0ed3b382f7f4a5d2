//! Nature Remo MCP Server - Main Entry Point
//!
//! This server supports two transports:
//! - stdio: line-delimited JSON-RPC for desktop MCP clients
//! - http: `POST /mcp` with an optional bearer token gate

use clap::{Parser, Subcommand};
use nature_remo_mcp::config::HttpConfig;
use nature_remo_mcp::{
    logging, stdio_transport::StdioTransport, RemoError, RemoHttpClient, RemoMcpServer, Result,
    ServerConfig,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use url::Url;

#[cfg(feature = "http-server")]
use nature_remo_mcp::http_transport::HttpTransportServer;

/// Nature Remo MCP Server Configuration
#[derive(Parser, Debug)]
#[command(name = "nature-remo-mcp")]
#[command(about = "MCP server for device-scoped Nature Remo smart home control")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Config {
    /// Transport configuration
    #[command(subcommand)]
    transport: TransportCommand,

    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Nature Remo access token
    #[arg(long, global = true, env = "NATURE_REMO_ACCESS_TOKEN", hide_env_values = true)]
    access_token: Option<String>,

    /// Nature Remo API base URL
    #[arg(long, global = true, env = "NATURE_REMO_API_BASE_URL")]
    api_base_url: Option<Url>,

    /// Nature Remo request timeout in seconds
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    /// Write logs to a daily-rolling file as well
    #[arg(long, global = true, env = "REMO_MCP_LOG_FILE")]
    log_file: Option<PathBuf>,

    /// Emit JSON log lines
    #[arg(long, global = true)]
    log_json: bool,
}

#[derive(Subcommand, Debug)]
enum TransportCommand {
    /// Run with stdio transport (Claude Desktop)
    Stdio,
    /// Run with HTTP transport
    #[cfg(feature = "http-server")]
    Http {
        /// Address to bind
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Bearer token required on /mcp
        #[arg(long, env = "MCP_BEARER_TOKEN", hide_env_values = true)]
        bearer_token: Option<String>,

        /// Enable CORS (permissive mode)
        #[arg(long)]
        enable_cors: bool,
    },
}

impl Config {
    /// Merge the configuration file with CLI and environment overrides
    fn server_config(&self) -> Result<ServerConfig> {
        let mut config = match &self.config {
            Some(path) => ServerConfig::load(path)?,
            None => ServerConfig::default(),
        };

        if let Some(token) = &self.access_token {
            config.remo.access_token = Some(token.clone());
        }
        if let Some(url) = &self.api_base_url {
            config.remo.api_base_url = url.clone();
        }
        if let Some(secs) = self.timeout_secs {
            config.remo.timeout = Duration::from_secs(secs);
        }
        if let Some(path) = &self.log_file {
            config.logging.file_path = Some(path.clone());
        }
        if self.log_json {
            config.logging.json = true;
        }

        self.apply_http_overrides(&mut config.http);

        config.validate()?;
        Ok(config)
    }

    #[cfg(feature = "http-server")]
    fn apply_http_overrides(&self, http: &mut HttpConfig) {
        if let TransportCommand::Http {
            host,
            port,
            bearer_token,
            enable_cors,
        } = &self.transport
        {
            if let Some(host) = host {
                http.host = host.clone();
            }
            if let Some(port) = port {
                http.port = *port;
            }
            if let Some(token) = bearer_token {
                http.bearer_token = Some(token.clone());
            }
            if *enable_cors {
                http.enable_cors = true;
            }
        }
    }

    #[cfg(not(feature = "http-server"))]
    fn apply_http_overrides(&self, _http: &mut HttpConfig) {}
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Config::parse();
    let config = cli.server_config()?;

    logging::init_logging(&config.logging, cli.debug)?;

    info!("Starting Nature Remo MCP Server v{}", env!("CARGO_PKG_VERSION"));
    info!("Nature Remo API: {}", config.remo.api_base_url);

    let mcp_server = match config.access_token() {
        Some(token) => {
            let client = RemoHttpClient::new(&config.remo, token)?;
            Some(RemoMcpServer::new(Arc::new(client)))
        }
        None => None,
    };

    match cli.transport {
        TransportCommand::Stdio => {
            let server = mcp_server.ok_or_else(|| {
                RemoError::config(
                    "Nature Remo access token required. Set NATURE_REMO_ACCESS_TOKEN or use --access-token",
                )
            })?;
            StdioTransport::new(server).run().await
        }
        #[cfg(feature = "http-server")]
        TransportCommand::Http { .. } => {
            HttpTransportServer::new(mcp_server, &config.http)
                .start()
                .await
        }
    }
}
