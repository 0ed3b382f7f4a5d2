//! MCP server for Nature Remo
//!
//! [`RemoMcpServer`] owns the tool registry and implements rmcp's
//! [`ServerHandler`]. It is transport-agnostic; see
//! [`crate::http_transport`] and [`crate::stdio_transport`].

pub mod handlers;
pub mod models;

pub use handlers::{tool_definitions, ToolDefinition};

use crate::client::RemoClient;
use rmcp::model::{
    CallToolRequestParam, CallToolResult, ErrorData as McpError, Implementation,
    InitializeRequestParam, InitializeResult, ListToolsResult, PaginatedRequestParam,
    ProtocolVersion, ServerCapabilities, ServerInfo, Tool,
};
use rmcp::service::{NotificationContext, RequestContext};
use rmcp::{RoleServer, ServerHandler};
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

/// Name advertised in `serverInfo`
pub const SERVER_NAME: &str = "nature-remo-mcp";

/// Nature Remo MCP server
///
/// Holds no per-call state. Every tool call fetches fresh device and
/// appliance lists through the client.
#[derive(Clone)]
pub struct RemoMcpServer {
    client: Arc<dyn RemoClient>,
    tools: Arc<Vec<ToolDefinition>>,
}

impl RemoMcpServer {
    /// Create a new server backed by `client`
    pub fn new(client: Arc<dyn RemoClient>) -> Self {
        Self {
            client,
            tools: Arc::new(tool_definitions()),
        }
    }

    /// Registered tools
    pub fn tools(&self) -> &[ToolDefinition] {
        &self.tools
    }

    /// Tools as advertised by `tools/list`
    pub fn tool_list(&self) -> Vec<Tool> {
        self.tools.iter().map(|definition| definition.tool.clone()).collect()
    }

    pub(crate) fn client(&self) -> &dyn RemoClient {
        self.client.as_ref()
    }
}

impl ServerHandler for RemoMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_03_26,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Implementation::from_build_env()
            },
            instructions: Some(
                "Every control tool takes the Nature Remo deviceId it targets. \
                 Appliances and signals outside that device are refused."
                    .into(),
            ),
        }
    }

    /// Answer with the protocol version the client asked for
    async fn initialize(
        &self,
        request: InitializeRequestParam,
        context: RequestContext<RoleServer>,
    ) -> Result<InitializeResult, McpError> {
        info!(
            protocol_version = %request.protocol_version,
            client = %request.client_info.name,
            "Initializing MCP session"
        );
        let protocol_version = request.protocol_version.clone();
        if context.peer.peer_info().is_none() {
            context.peer.set_peer_info(request);
        }
        Ok(InitializeResult {
            protocol_version,
            ..self.get_info()
        })
    }

    async fn on_initialized(&self, _context: NotificationContext<RoleServer>) {
        info!("MCP client initialized");
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult::with_all_items(self.tool_list()))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let arguments = request.arguments.map(Value::Object).unwrap_or(Value::Null);
        self.invoke_tool(&request.name, arguments).await
    }
}
