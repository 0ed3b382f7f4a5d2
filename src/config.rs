//! Configuration management for the Nature Remo MCP server
//!
//! Defaults come from [`ServerConfig::default`], an optional TOML file
//! provides overrides, and the CLI/environment layer in `main.rs` wins last.

use crate::error::{RemoError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Production Nature Remo API endpoint
pub const DEFAULT_API_BASE_URL: &str = "https://api.nature.global";

/// Default port for the HTTP transport
pub const DEFAULT_HTTP_PORT: u16 = 3001;

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// Nature Remo API configuration
    pub remo: RemoConfig,

    /// HTTP transport configuration
    pub http: HttpConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Nature Remo API configuration
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoConfig {
    /// OAuth access token issued by home.nature.global
    #[serde(skip_serializing)]
    pub access_token: Option<String>,

    /// API base URL
    pub api_base_url: Url,

    /// Request timeout
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for RemoConfig {
    fn default() -> Self {
        Self {
            access_token: None,
            api_base_url: Url::parse(DEFAULT_API_BASE_URL).expect("default API URL is valid"),
            timeout: Duration::from_secs(30),
        }
    }
}

impl fmt::Debug for RemoConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoConfig")
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .field("api_base_url", &self.api_base_url.as_str())
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// HTTP transport configuration
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Bind address
    pub host: String,

    /// Listen port
    pub port: u16,

    /// Bearer token required on `/mcp`; no gate when unset
    #[serde(skip_serializing)]
    pub bearer_token: Option<String>,

    /// Permissive CORS for browser-based MCP clients
    pub enable_cors: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_HTTP_PORT,
            bearer_token: None,
            enable_cors: false,
        }
    }
}

impl fmt::Debug for HttpConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("bearer_token", &self.bearer_token.as_ref().map(|_| "<redacted>"))
            .field("enable_cors", &self.enable_cors)
            .finish()
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset
    pub level: String,

    /// Daily-rolling log file
    pub file_path: Option<PathBuf>,

    /// Emit JSON lines instead of compact text
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_path: None,
            json: false,
        }
    }
}

impl ServerConfig {
    /// Parse a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| RemoError::config(format!("Failed to parse configuration: {e}")))
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            RemoError::config(format!(
                "Failed to read configuration file {}: {e}",
                path.display()
            ))
        })?;
        Self::from_toml_str(&content)
    }

    /// Access token, if one is configured and non-blank
    pub fn access_token(&self) -> Option<&str> {
        self.remo
            .access_token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
    }

    /// Bearer token for `/mcp`, if one is configured and non-blank
    pub fn bearer_token(&self) -> Option<&str> {
        self.http
            .bearer_token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        match self.remo.api_base_url.scheme() {
            "http" | "https" => {}
            scheme => {
                return Err(RemoError::config(format!(
                    "Unsupported API base URL scheme '{scheme}', expected http or https"
                )))
            }
        }

        if self.remo.api_base_url.host().is_none() {
            return Err(RemoError::config("Invalid API base URL - missing host"));
        }

        if self.remo.timeout.is_zero() {
            return Err(RemoError::config("Request timeout must be greater than zero"));
        }

        if self.http.port == 0 {
            return Err(RemoError::config("HTTP port must be greater than zero"));
        }

        Ok(())
    }
}
