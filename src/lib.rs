//! Nature Remo MCP server
//!
//! Exposes Nature Remo smart-home control as Model Context Protocol tools.
//! Every control request names a hub device, and the target appliance or
//! signal must belong to that device before any command reaches the Nature
//! Remo API.
//!
//! # Features
//!
//! - Eight MCP tools for sensor readings, appliance listing and control
//! - Device-scoped appliance and signal resolution ([`services::device_scope`])
//! - Exact, unambiguous name matching ([`services::name_matcher`])
//! - stdio transport and an axum HTTP transport with optional bearer auth

// Core modules
pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod server;
pub mod services;
pub mod tools;

// Transports
#[cfg(feature = "http-server")]
pub mod http_transport;
pub mod stdio_transport;

// Test support modules - available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

// Re-export main types for convenience
pub use client::{RemoClient, RemoHttpClient};
pub use config::ServerConfig;
pub use error::{RemoError, Result};
pub use server::RemoMcpServer;
pub use services::DeviceSafetyContext;
