//! Logging setup
//!
//! Logs always go to stderr so the stdio transport keeps stdout for
//! JSON-RPC. An optional daily-rolling file receives the same events.

use crate::config::LoggingConfig;
use crate::error::{RemoError, Result};
use std::ffi::OsStr;
use std::path::Path;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Filter from `RUST_LOG`, falling back to the configured level
///
/// `debug` overrides both.
pub fn env_filter(config: &LoggingConfig, debug: bool) -> EnvFilter {
    if debug {
        return EnvFilter::new("debug");
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level))
}

/// Directory and file name prefix for the rolling appender
fn split_log_path(path: &Path) -> (&Path, &OsStr) {
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = path
        .file_name()
        .unwrap_or_else(|| OsStr::new("nature-remo-mcp.log"));
    (directory, file_name)
}

/// Install the global tracing subscriber
pub fn init_logging(config: &LoggingConfig, debug: bool) -> Result<()> {
    let mut layers: Vec<BoxedLayer> = Vec::new();

    let stderr_layer = fmt::layer().with_writer(std::io::stderr).with_target(true);
    if config.json {
        layers.push(stderr_layer.json().boxed());
    } else {
        layers.push(stderr_layer.compact().boxed());
    }

    if let Some(file_path) = &config.file_path {
        let (directory, file_name) = split_log_path(file_path);
        std::fs::create_dir_all(directory)?;

        let file_appender = tracing_appender::rolling::daily(directory, file_name);
        let file_layer = fmt::layer().with_writer(file_appender).with_ansi(false);
        if config.json {
            layers.push(file_layer.json().boxed());
        } else {
            layers.push(file_layer.boxed());
        }
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(env_filter(config, debug))
        .try_init()
        .map_err(|e| RemoError::internal(format!("Failed to initialize logging: {e}")))
}
