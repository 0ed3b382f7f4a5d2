//! MCP tool implementations for Nature Remo
//!
//! Handlers return `Result<CallToolResult>` and never format their own
//! failures. [`run_tool`] is the single place where a [`RemoError`] becomes a
//! user-facing tool error, including the required-scope hint for 401/403
//! responses from the vendor API.

pub mod appliances;
pub mod devices;
pub mod signals;

use crate::error::{ErrorReporter, RemoError, Result};
use rmcp::model::{CallToolResult, Content};
use serde::Serialize;
use serde_json::Value;
use std::future::Future;
use tracing::{debug, warn};

/// Successful result with a message and structured data
pub fn tool_success(text: impl Into<String>, structured: Value) -> CallToolResult {
    let mut result = CallToolResult::success(vec![Content::text(text)]);
    result.structured_content = Some(structured);
    result
}

/// Error result carrying only the message shown to the caller
pub fn tool_error(text: impl Into<String>) -> CallToolResult {
    CallToolResult::error(vec![Content::text(text)])
}

/// Read access to tool results
pub trait ToolResultExt {
    /// True when the result reports a failure
    fn failed(&self) -> bool;

    /// Text of the first content block
    fn text(&self) -> &str;
}

impl ToolResultExt for CallToolResult {
    fn failed(&self) -> bool {
        self.is_error.unwrap_or(false)
    }

    fn text(&self) -> &str {
        self.content
            .first()
            .and_then(|content| content.as_text())
            .map(|content| content.text.as_str())
            .unwrap_or_default()
    }
}

/// Access level a tool needs from the Nature Remo token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolScope {
    Read,
    Control,
}

impl ToolScope {
    /// OAuth scopes the vendor checks for this access level
    pub fn required_scopes(&self) -> &'static [&'static str] {
        match self {
            ToolScope::Read => &["basic"],
            ToolScope::Control => &["sendir", "basic"],
        }
    }
}

/// Hint appended to vendor auth failures, empty for every other error
pub fn scope_hint(error: &RemoError, scope: ToolScope) -> String {
    if !error.is_auth_error() {
        return String::new();
    }
    let hint = match error {
        RemoError::Api { status: 401, .. } => "verify token validity",
        _ => "ensure sufficient permissions",
    };
    format!(
        " (Hint: {hint}; required scopes: {})",
        scope.required_scopes().join(", ")
    )
}

/// Render a handler failure as the text shown to the caller
pub fn render_error(error: &RemoError, scope: ToolScope) -> String {
    match error {
        RemoError::Api { status, body } => {
            let detail = if body.is_empty() {
                error.to_string()
            } else {
                body.clone()
            };
            format!(
                "Nature Remo API error ({status}): {detail}{}",
                scope_hint(error, scope)
            )
        }
        e if e.is_lookup_failure() => e.to_string(),
        RemoError::InvalidInput(message) => message.clone(),
        other => format!("Unexpected error: {other}"),
    }
}

/// Run a handler and convert any failure into an error result
pub async fn run_tool<F>(name: &str, scope: ToolScope, handler: F) -> CallToolResult
where
    F: Future<Output = Result<CallToolResult>>,
{
    debug!("Running tool {name}");
    match handler.await {
        Ok(result) => result,
        Err(error) => {
            ErrorReporter::log_error(&error, "tools", name);
            warn!(tool = name, "Tool call failed");
            tool_error(render_error(&error, scope))
        }
    }
}

/// Two-space indented JSON
pub(crate) fn to_pretty_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}
