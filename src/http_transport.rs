//! HTTP transport for MCP using axum
//!
//! Routes:
//! - `GET /health` - liveness check, never authenticated
//! - `/mcp` - rmcp's stateless streamable HTTP service, behind the optional
//!   bearer token gate
//!
//! Without a Nature Remo access token the server still starts, but `/mcp`
//! answers 500 until one is configured.

use crate::config::HttpConfig;
use crate::error::{RemoError, Result};
use crate::server::RemoMcpServer;
use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use rmcp::transport::streamable_http_server::session::never::NeverSessionManager;
use rmcp::transport::{StreamableHttpServerConfig, StreamableHttpService};
use serde_json::json;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{debug, info, warn};

/// Shared state for HTTP handlers
struct AppState {
    mcp_server: Option<RemoMcpServer>,
    bearer_digest: Option<[u8; 32]>,
}

fn token_digest(token: &str) -> [u8; 32] {
    Sha256::digest(token.as_bytes()).into()
}

/// HTTP transport server
pub struct HttpTransportServer {
    state: Arc<AppState>,
    host: String,
    port: u16,
    enable_cors: bool,
}

impl HttpTransportServer {
    /// Create a new HTTP transport server
    ///
    /// `mcp_server` is `None` when no vendor access token is configured.
    pub fn new(mcp_server: Option<RemoMcpServer>, config: &HttpConfig) -> Self {
        let bearer_digest = config
            .bearer_token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(token_digest);

        Self {
            state: Arc::new(AppState {
                mcp_server,
                bearer_digest,
            }),
            host: config.host.clone(),
            port: config.port,
            enable_cors: config.enable_cors,
        }
    }

    /// Build the router with all endpoints
    pub fn router(&self) -> Router {
        let public_routes = Router::new().route("/health", get(health_check));

        let mcp_routes = match &self.state.mcp_server {
            Some(server) => Router::new().route_service("/mcp", mcp_service(server.clone())),
            None => Router::new().route("/mcp", any(missing_access_token)),
        };
        let protected_routes = mcp_routes.layer(middleware::from_fn_with_state(
            self.state.clone(),
            bearer_auth_middleware,
        ));

        let app = Router::new()
            .merge(public_routes)
            .merge(protected_routes)
            .fallback(not_found)
            .with_state(self.state.clone())
            .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()));

        if self.enable_cors {
            app.layer(CorsLayer::permissive())
        } else {
            app
        }
    }

    /// Start the HTTP server and run until Ctrl+C
    pub async fn start(&self) -> Result<()> {
        let address = format!("{}:{}", self.host, self.port);
        let listener = TcpListener::bind(&address)
            .await
            .map_err(|e| RemoError::config(format!("Failed to bind to {address}: {e}")))?;

        info!("HTTP MCP server listening on http://{address}");
        info!("MCP endpoint: http://{address}/mcp");
        info!("Health check: http://{address}/health");
        if self.state.bearer_digest.is_none() {
            warn!("No bearer token configured, /mcp is not authenticated");
        }
        if self.state.mcp_server.is_none() {
            warn!("No Nature Remo access token configured, /mcp will answer 500");
        }

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(RemoError::Io)?;

        info!("HTTP MCP server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

fn json_error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

/// Bearer token gate for `/mcp`; a no-op when no token is configured
async fn bearer_auth_middleware(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let Some(expected) = state.bearer_digest else {
        return next.run(request).await;
    };

    let Some(header_value) = request.headers().get(header::AUTHORIZATION) else {
        debug!("Rejected /mcp request without bearer token");
        return json_error(StatusCode::UNAUTHORIZED, "Missing bearer token.");
    };

    let presented = header_value
        .to_str()
        .ok()
        .and_then(|value| value.split_once(' '))
        .filter(|(scheme, _)| scheme.eq_ignore_ascii_case("bearer"))
        .map(|(_, token)| token.trim());

    match presented {
        Some(token) if token_digest(token) == expected => next.run(request).await,
        _ => {
            debug!("Rejected /mcp request with invalid bearer token");
            json_error(StatusCode::UNAUTHORIZED, "Invalid bearer token.")
        }
    }
}

async fn health_check() -> impl IntoResponse {
    Json(json!({ "ok": true }))
}

async fn not_found() -> Response {
    json_error(StatusCode::NOT_FOUND, "Not found")
}

/// Stateless streamable HTTP endpoint: each POST carries one message and
/// gets its own short-lived MCP service
fn mcp_service(server: RemoMcpServer) -> StreamableHttpService<RemoMcpServer, NeverSessionManager> {
    StreamableHttpService::new(
        move || Ok(server.clone()),
        Arc::new(NeverSessionManager::default()),
        StreamableHttpServerConfig {
            sse_keep_alive: None,
            stateful_mode: false,
        },
    )
}

async fn missing_access_token() -> Response {
    json_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        "Missing NATURE_REMO_ACCESS_TOKEN.",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_digest_is_stable() {
        assert_eq!(token_digest("secret"), token_digest("secret"));
        assert_ne!(token_digest("secret"), token_digest("Secret"));
    }

    #[test]
    fn test_blank_bearer_token_disables_gate() {
        let config = HttpConfig {
            bearer_token: Some("  ".into()),
            ..Default::default()
        };
        let server = HttpTransportServer::new(None, &config);
        assert!(server.state.bearer_digest.is_none());
    }
}
