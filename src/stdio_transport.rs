//! Stdio transport for MCP
//!
//! One JSON-RPC message per line on stdin, one message per line on stdout.
//! rmcp drives the session; [`LineTransport`] only frames lines. A line that
//! is not valid UTF-8 or JSON, or names a method rmcp does not model, is
//! answered with a JSON-RPC error and the session keeps going.

use crate::error::{RemoError, Result};
use crate::server::RemoMcpServer;
use rmcp::model::{ClientJsonRpcMessage, ErrorCode, ErrorData, ServerJsonRpcMessage};
use rmcp::transport::Transport;
use rmcp::{RoleServer, ServiceExt};
use serde_json::{json, Value};
use std::future::Future;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

/// Requests rmcp decodes itself; a failed decode of one of these is a
/// parameter problem, anything else is an unknown method
const KNOWN_REQUESTS: &[&str] = &[
    "initialize",
    "ping",
    "completion/complete",
    "logging/setLevel",
    "prompts/get",
    "prompts/list",
    "resources/list",
    "resources/templates/list",
    "resources/read",
    "resources/subscribe",
    "resources/unsubscribe",
    "tools/call",
    "tools/list",
];

/// Outcome of decoding one input line
#[derive(Debug)]
enum Inbound {
    Message(Box<ClientJsonRpcMessage>),
    Skip,
    Reject(Value),
}

fn error_reply(id: Value, error: ErrorData) -> Value {
    json!({ "jsonrpc": "2.0", "id": id, "error": error })
}

fn decode_line(line: &[u8]) -> Inbound {
    let value: Value = match serde_json::from_slice(line) {
        Ok(value) => value,
        Err(e) => {
            return Inbound::Reject(error_reply(
                Value::Null,
                ErrorData::parse_error(format!("Parse error: {e}"), None),
            ))
        }
    };

    let id = value.get("id").cloned();
    let method = value
        .get("method")
        .and_then(Value::as_str)
        .map(str::to_owned);
    let is_v2 = value.get("jsonrpc").and_then(Value::as_str) == Some("2.0");

    let decode_error = match serde_json::from_value::<ClientJsonRpcMessage>(value) {
        Ok(message) => return Inbound::Message(Box::new(message)),
        Err(e) => e,
    };

    let Some(id) = id else {
        debug!(method = ?method, "Dropping undecodable notification");
        return Inbound::Skip;
    };

    let error = match method {
        _ if !is_v2 => ErrorData::invalid_request("Invalid Request", None),
        Some(method) if KNOWN_REQUESTS.contains(&method.as_str()) => {
            ErrorData::invalid_params(format!("Invalid params: {decode_error}"), None)
        }
        Some(method) => ErrorData::new(
            ErrorCode::METHOD_NOT_FOUND,
            format!("Method not found: {method}"),
            None,
        ),
        None => ErrorData::invalid_request("Invalid Request", None),
    };
    Inbound::Reject(error_reply(id, error))
}

async fn write_line<W>(writer: &Mutex<W>, line: &[u8]) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut writer = writer.lock().await;
    writer.write_all(line).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await
}

/// Newline-delimited JSON-RPC framing over any reader/writer pair
pub struct LineTransport<R, W> {
    reader: BufReader<R>,
    writer: Arc<Mutex<W>>,
    buffer: Vec<u8>,
}

impl<R, W> LineTransport<R, W>
where
    R: AsyncRead + Send + Unpin + 'static,
    W: AsyncWrite + Send + Unpin + 'static,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader: BufReader::new(reader),
            writer: Arc::new(Mutex::new(writer)),
            buffer: Vec::new(),
        }
    }
}

impl<R, W> Transport<RoleServer> for LineTransport<R, W>
where
    R: AsyncRead + Send + Unpin + 'static,
    W: AsyncWrite + Send + Unpin + 'static,
{
    type Error = std::io::Error;

    fn send(
        &mut self,
        item: ServerJsonRpcMessage,
    ) -> impl Future<Output = std::result::Result<(), Self::Error>> + Send + 'static {
        let writer = self.writer.clone();
        async move {
            let encoded = serde_json::to_vec(&item)?;
            write_line(&writer, &encoded).await
        }
    }

    async fn receive(&mut self) -> Option<ClientJsonRpcMessage> {
        loop {
            self.buffer.clear();
            match self.reader.read_until(b'\n', &mut self.buffer).await {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => {
                    error!("Failed to read from stdin: {e}");
                    return None;
                }
            }

            let line = self.buffer.trim_ascii();
            if line.is_empty() {
                continue;
            }

            match decode_line(line) {
                Inbound::Message(message) => return Some(*message),
                Inbound::Skip => continue,
                Inbound::Reject(reply) => {
                    warn!("Rejected input line: {}", reply["error"]["message"]);
                    let encoded = reply.to_string();
                    if let Err(e) = write_line(&self.writer, encoded.as_bytes()).await {
                        error!("Failed to write error response: {e}");
                        return None;
                    }
                }
            }
        }
    }

    async fn close(&mut self) -> std::result::Result<(), Self::Error> {
        self.writer.lock().await.flush().await
    }
}

/// Line-delimited JSON-RPC over stdin/stdout
pub struct StdioTransport {
    server: RemoMcpServer,
}

impl StdioTransport {
    pub fn new(server: RemoMcpServer) -> Self {
        Self { server }
    }

    /// Serve stdin until it is closed
    pub async fn run(self) -> Result<()> {
        info!("Stdio MCP server ready");
        self.serve(tokio::io::stdin(), tokio::io::stdout()).await?;
        info!("Stdin closed, stopping");
        Ok(())
    }

    /// Serve messages from `reader`, writing responses to `writer`
    pub async fn serve<R, W>(self, reader: R, writer: W) -> Result<()>
    where
        R: AsyncRead + Send + Unpin + 'static,
        W: AsyncWrite + Send + Unpin + 'static,
    {
        let running = self
            .server
            .serve(LineTransport::new(reader, writer))
            .await
            .map_err(|e| RemoError::internal(format!("MCP session failed to start: {e}")))?;

        let reason = running
            .waiting()
            .await
            .map_err(|e| RemoError::internal(format!("MCP session task failed: {e}")))?;
        debug!(?reason, "MCP session ended");
        Ok(())
    }
}
