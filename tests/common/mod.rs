//! Common test utilities
//!
//! A wiremock server standing in for the Nature Remo cloud API, plus a
//! household fixture with two hub devices.

#![allow(dead_code)]

use nature_remo_mcp::config::RemoConfig;
use nature_remo_mcp::stdio_transport::StdioTransport;
use nature_remo_mcp::{RemoHttpClient, RemoMcpServer};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{duplex, AsyncBufReadExt, AsyncWriteExt, BufReader, DuplexStream, Lines};
use tokio::task::JoinHandle;
use wiremock::{
    matchers::{header, method, path},
    Mock, MockServer, ResponseTemplate,
};

pub const ACCESS_TOKEN: &str = "test-access-token";

/// Mock Nature Remo cloud API for testing
pub struct MockRemoApi {
    pub server: MockServer,
}

impl MockRemoApi {
    /// Start a server serving [`devices_fixture`] and [`appliances_fixture`]
    pub async fn start() -> Self {
        let api = Self::empty().await;
        api.mock_devices(devices_fixture()).await;
        api.mock_appliances(appliances_fixture()).await;
        api
    }

    /// Start a server without any mounted endpoints
    pub async fn empty() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    pub fn remo_config(&self) -> RemoConfig {
        RemoConfig {
            access_token: Some(ACCESS_TOKEN.to_string()),
            api_base_url: self.uri().parse().unwrap(),
            timeout: Duration::from_secs(5),
        }
    }

    pub fn client(&self) -> RemoHttpClient {
        RemoHttpClient::new(&self.remo_config(), ACCESS_TOKEN).unwrap()
    }

    pub fn mcp_server(&self) -> RemoMcpServer {
        RemoMcpServer::new(Arc::new(self.client()))
    }

    pub async fn mock_devices(&self, body: Value) {
        Mock::given(method("GET"))
            .and(path("/1/devices"))
            .and(header("authorization", format!("Bearer {ACCESS_TOKEN}").as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    pub async fn mock_appliances(&self, body: Value) {
        Mock::given(method("GET"))
            .and(path("/1/appliances"))
            .and(header("authorization", format!("Bearer {ACCESS_TOKEN}").as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Fail `GET {endpoint}` with the given status and body
    pub async fn mock_failure(&self, endpoint: &str, status: u16, body: &str) {
        Mock::given(method("GET"))
            .and(path(endpoint))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&self.server)
            .await;
    }

    /// Expect no mutating request at all
    pub async fn expect_no_mutation(&self) {
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(0)
            .named("no vendor mutation")
            .mount(&self.server)
            .await;
    }

    /// Number of POST requests received so far
    pub async fn mutation_count(&self) -> usize {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|request| request.method.as_str() == "POST")
            .count()
    }
}

/// Two hub devices; `device-2` only reports humidity
pub fn devices_fixture() -> Value {
    json!([
        {
            "id": "device-1",
            "name": "Living Remo",
            "firmware_version": "Remo/1.0.62-gabbf5bd",
            "online": true,
            "newest_events": {
                "te": { "val": 24.3, "created_at": "2026-02-07T08:00:00Z" },
                "hu": { "val": 45, "created_at": "2026-02-07T08:01:00Z" }
            }
        },
        {
            "id": "device-2",
            "name": "Bedroom Remo",
            "newest_events": {
                "hu": { "val": 50, "created_at": "2026-02-07T08:02:00Z" }
            }
        }
    ])
}

/// Appliances of both devices plus one without a device reference
pub fn appliances_fixture() -> Value {
    json!([
        {
            "id": "ap-ac",
            "nickname": "Living Aircon",
            "type": "AC",
            "device": { "id": "device-1", "name": "Living Remo" },
            "settings": { "temp": "26", "temp_unit": "c", "mode": "cool", "vol": "auto", "dir": "auto", "button": "" },
            "signals": []
        },
        {
            "id": "ap-tv",
            "nickname": "Living Room TV",
            "type": "TV",
            "device": { "id": "device-1", "name": "Living Remo" },
            "signals": [
                { "id": "sig-power", "name": "Power", "image": "ico_on" },
                { "id": "sig-mute", "name": "Mute", "image": "ico_mute" }
            ]
        },
        {
            "id": "ap-light",
            "nickname": "Ceiling Light",
            "type": "LIGHT",
            "device": { "id": "device-1", "name": "Living Remo" },
            "signals": null
        },
        {
            "id": "ap-outside",
            "nickname": "Bedroom TV",
            "type": "TV",
            "device": { "id": "device-2", "name": "Bedroom Remo" },
            "signals": [
                { "id": "signal-1", "name": "Power", "image": "ico_on" }
            ]
        },
        {
            "id": "ap-orphan",
            "nickname": "Old Fan",
            "type": "IR",
            "device": null,
            "signals": [
                { "id": "sig-orphan", "name": "Power", "image": "ico_on" }
            ]
        }
    ])
}

/// Extract the text of the first content block of a tool result value
pub fn result_text(result: &Value) -> &str {
    result["content"][0]["text"].as_str().unwrap_or_default()
}

/// An initialized MCP session over an in-memory stdio pipe
pub struct StdioSession {
    input: DuplexStream,
    output: Lines<BufReader<DuplexStream>>,
    task: JoinHandle<nature_remo_mcp::Result<()>>,
}

impl StdioSession {
    /// Spawn `server` and complete the initialize handshake
    pub async fn start(server: RemoMcpServer) -> Self {
        let (input, server_in) = duplex(64 * 1024);
        let (server_out, output) = duplex(64 * 1024);
        let task = tokio::spawn(StdioTransport::new(server).serve(server_in, server_out));
        let mut session = Self {
            input,
            output: BufReader::new(output).lines(),
            task,
        };

        let initialized = session
            .request(
                0,
                "initialize",
                json!({
                    "protocolVersion": "2025-03-26",
                    "capabilities": {},
                    "clientInfo": { "name": "integration-test", "version": "1.0.0" }
                }),
            )
            .await;
        assert_eq!(initialized["result"]["serverInfo"]["name"], "nature-remo-mcp");
        session
            .send(json!({ "jsonrpc": "2.0", "method": "notifications/initialized" }))
            .await;
        session
    }

    pub async fn send(&mut self, message: Value) {
        let line = format!("{message}\n");
        self.input.write_all(line.as_bytes()).await.unwrap();
    }

    /// Send a request and wait for its response line
    pub async fn request(&mut self, id: u64, method: &str, params: Value) -> Value {
        self.send(json!({ "jsonrpc": "2.0", "id": id, "method": method, "params": params }))
            .await;
        let line = self.output.next_line().await.unwrap().unwrap();
        serde_json::from_str(&line).unwrap()
    }

    /// Close stdin and wait for the server to stop
    pub async fn finish(self) {
        drop(self.input);
        self.task.await.unwrap().unwrap();
    }
}
