//! Tool registry and tool call dispatch

use super::models::{
    ButtonRequest, ControlAirconRequest, DeviceRequest, NoArgs, SendSignalByNameRequest,
    SendSignalRequest,
};
use super::RemoMcpServer;
use crate::tools::{appliances, devices, run_tool, signals, ToolScope};
use rmcp::handler::server::tool::schema_for_type;
use rmcp::model::{CallToolResult, ErrorData, JsonObject, Tool, ToolAnnotations};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;
use validator::Validate;

/// Registered tool with the token scope it needs
#[derive(Debug, Clone)]
pub struct ToolDefinition {
    pub tool: Tool,
    pub scope: ToolScope,
}

impl ToolDefinition {
    fn new<T: JsonSchema>(name: &'static str, description: &'static str, scope: ToolScope) -> Self {
        Self {
            tool: Tool::new(name, description, input_schema::<T>())
                .annotate(ToolAnnotations::new().read_only(scope == ToolScope::Read)),
            scope,
        }
    }

    pub fn name(&self) -> &str {
        &self.tool.name
    }
}

/// JSON schema of an argument type, always an object schema
fn input_schema<T: JsonSchema>() -> Arc<JsonObject> {
    let mut schema = schema_for_type::<T>();
    schema.remove("title");
    schema.insert("type".to_string(), json!("object"));
    schema
        .entry("properties")
        .or_insert_with(|| json!({}));
    Arc::new(schema)
}

/// All tools served, in advertised order
pub fn tool_definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new::<NoArgs>(
            "remo_list_devices",
            "List Nature Remo devices available to this token.",
            ToolScope::Read,
        ),
        ToolDefinition::new::<DeviceRequest>(
            "remo_get_room_temperature",
            "Get current room temperature and humidity from Nature Remo sensors for a specific device.",
            ToolScope::Read,
        ),
        ToolDefinition::new::<DeviceRequest>(
            "remo_list_appliances",
            "List appliances linked to the specified Remo device.",
            ToolScope::Read,
        ),
        ToolDefinition::new::<SendSignalRequest>(
            "remo_send_signal",
            "Send an infrared signal in the specified device by signalId.",
            ToolScope::Control,
        ),
        ToolDefinition::new::<SendSignalByNameRequest>(
            "remo_send_signal_by_name",
            "Send an infrared signal by appliance name and signal name in the specified device.",
            ToolScope::Control,
        ),
        ToolDefinition::new::<ControlAirconRequest>(
            "remo_control_aircon",
            "Control an air conditioner appliance in the specified device with operation_mode, temperature, and related settings.",
            ToolScope::Control,
        ),
        ToolDefinition::new::<ButtonRequest>(
            "remo_control_tv",
            "Send a button command to a TV appliance in the specified device.",
            ToolScope::Control,
        ),
        ToolDefinition::new::<ButtonRequest>(
            "remo_control_light",
            "Send a button command to a light appliance in the specified device.",
            ToolScope::Control,
        ),
    ]
}

fn decode_args<T: DeserializeOwned>(arguments: Value) -> Result<T, ErrorData> {
    let arguments = if arguments.is_null() {
        json!({})
    } else {
        arguments
    };
    serde_json::from_value(arguments)
        .map_err(|e| ErrorData::invalid_params(format!("Invalid arguments: {e}"), None))
}

fn parse_args<T: DeserializeOwned + Validate>(arguments: Value) -> Result<T, ErrorData> {
    let args: T = decode_args(arguments)?;
    args.validate()
        .map_err(|e| ErrorData::invalid_params(format!("Invalid arguments: {e}"), None))?;
    Ok(args)
}

fn unknown_tool(name: &str) -> ErrorData {
    ErrorData::invalid_params(format!("Unknown tool: {name}"), None)
}

impl RemoMcpServer {
    /// Validate arguments and run the named tool
    ///
    /// Argument and unknown-tool problems are protocol errors. Everything
    /// that fails inside a tool is returned as an error result instead.
    pub async fn invoke_tool(&self, name: &str, arguments: Value) -> Result<CallToolResult, ErrorData> {
        let scope = self
            .tools()
            .iter()
            .find(|tool| tool.name() == name)
            .map(|tool| tool.scope)
            .ok_or_else(|| unknown_tool(name))?;
        let client = self.client();

        info!(tool = name, "Calling tool");
        let result = match name {
            "remo_list_devices" => {
                let _: NoArgs = decode_args(arguments)?;
                run_tool(name, scope, devices::list_devices(client)).await
            }
            "remo_get_room_temperature" => {
                let args: DeviceRequest = parse_args(arguments)?;
                run_tool(
                    name,
                    scope,
                    devices::get_room_temperature(client, &args.device_id),
                )
                .await
            }
            "remo_list_appliances" => {
                let args: DeviceRequest = parse_args(arguments)?;
                run_tool(
                    name,
                    scope,
                    appliances::list_appliances(client, &args.device_id),
                )
                .await
            }
            "remo_send_signal" => {
                let args: SendSignalRequest = parse_args(arguments)?;
                run_tool(
                    name,
                    scope,
                    signals::send_signal(client, &args.device_id, &args.signal_id),
                )
                .await
            }
            "remo_send_signal_by_name" => {
                let args: SendSignalByNameRequest = parse_args(arguments)?;
                run_tool(
                    name,
                    scope,
                    signals::send_signal_by_name(
                        client,
                        &args.device_id,
                        &args.appliance_name,
                        &args.signal_name,
                    ),
                )
                .await
            }
            "remo_control_aircon" => {
                let args: ControlAirconRequest = parse_args(arguments)?;
                let settings = args.settings();
                run_tool(
                    name,
                    scope,
                    appliances::control_aircon(
                        client,
                        &args.device_id,
                        &args.appliance_id,
                        &settings,
                    ),
                )
                .await
            }
            "remo_control_tv" => {
                let args: ButtonRequest = parse_args(arguments)?;
                run_tool(
                    name,
                    scope,
                    appliances::control_tv(client, &args.device_id, &args.appliance_id, &args.button),
                )
                .await
            }
            "remo_control_light" => {
                let args: ButtonRequest = parse_args(arguments)?;
                run_tool(
                    name,
                    scope,
                    appliances::control_light(
                        client,
                        &args.device_id,
                        &args.appliance_id,
                        &args.button,
                    ),
                )
                .await
            }
            other => return Err(unknown_tool(other)),
        };

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{Appliance, ApplianceDevice, Device};
    use crate::mock::{MockCall, MockRemoClient};
    use crate::tools::ToolResultExt;
    use rmcp::model::ErrorCode;

    fn device(id: &str) -> Device {
        Device {
            id: id.to_string(),
            name: format!("Remo {id}"),
            online: None,
            newest_events: None,
        }
    }

    fn appliance(id: &str, device_id: &str) -> Appliance {
        Appliance {
            id: id.to_string(),
            nickname: format!("Appliance {id}"),
            appliance_type: "AC".to_string(),
            device: Some(ApplianceDevice {
                id: Some(device_id.to_string()),
                name: None,
            }),
            settings: None,
            signals: None,
        }
    }

    fn server(client: MockRemoClient) -> (RemoMcpServer, Arc<MockRemoClient>) {
        let client = Arc::new(client);
        (RemoMcpServer::new(client.clone()), client)
    }

    #[test]
    fn test_definitions_cover_every_tool() {
        let definitions = tool_definitions();
        let names: Vec<_> = definitions.iter().map(ToolDefinition::name).collect();
        assert_eq!(
            names,
            vec![
                "remo_list_devices",
                "remo_get_room_temperature",
                "remo_list_appliances",
                "remo_send_signal",
                "remo_send_signal_by_name",
                "remo_control_aircon",
                "remo_control_tv",
                "remo_control_light",
            ]
        );

        for definition in &definitions {
            let read_only = definition
                .tool
                .annotations
                .as_ref()
                .and_then(|annotations| annotations.read_only_hint);
            assert_eq!(
                read_only,
                Some(definition.scope == ToolScope::Read),
                "{}",
                definition.name()
            );
        }
    }

    #[test]
    fn test_input_schema_lists_required_arguments() {
        let schema = input_schema::<ButtonRequest>();
        assert_eq!(schema["type"], json!("object"));

        let required = schema["required"].as_array().unwrap();
        for field in ["deviceId", "applianceId", "button"] {
            assert!(required.contains(&json!(field)), "missing {field}");
        }

        let aircon = input_schema::<ControlAirconRequest>();
        assert!(aircon["properties"]["temperatureUnit"].is_object());
        assert!(aircon["properties"]["airDirectionH"].is_object());
        assert_eq!(aircon["required"].as_array().unwrap().len(), 2);
        assert!(aircon.get("title").is_none());
    }

    #[test]
    fn test_no_args_schema_is_empty_object() {
        let schema = input_schema::<NoArgs>();
        assert_eq!(schema["type"], json!("object"));
        assert_eq!(schema["properties"], json!({}));
    }

    #[tokio::test]
    async fn test_missing_device_id_is_invalid_params() {
        let (server, client) = server(MockRemoClient::new());

        let err = server
            .invoke_tool("remo_control_tv", json!({"applianceId": "ap-1", "button": "power"}))
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
        assert!(client.calls().is_empty());
    }

    #[tokio::test]
    async fn test_empty_device_id_is_invalid_params() {
        let (server, _) = server(MockRemoClient::new());

        let err = server
            .invoke_tool("remo_list_appliances", json!({"deviceId": ""}))
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
    }

    #[tokio::test]
    async fn test_unknown_temperature_unit_is_invalid_params() {
        let (server, _) = server(MockRemoClient::new());

        let err = server
            .invoke_tool(
                "remo_control_aircon",
                json!({"deviceId": "d", "applianceId": "a", "temperatureUnit": "k"}),
            )
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
    }

    #[tokio::test]
    async fn test_unknown_tool_is_invalid_params() {
        let (server, _) = server(MockRemoClient::new());

        let err = server.invoke_tool("remo_unlock_door", json!({})).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
        assert_eq!(err.message, "Unknown tool: remo_unlock_door");
    }

    #[tokio::test]
    async fn test_read_tool_forbidden_carries_read_scope_hint() {
        let (server, _) = server(MockRemoClient::new().failing_devices(403, "forbidden"));

        let result = server
            .invoke_tool("remo_list_devices", Value::Null)
            .await
            .unwrap();

        assert!(result.failed());
        assert_eq!(
            result.text(),
            "Nature Remo API error (403): forbidden (Hint: ensure sufficient permissions; required scopes: basic)"
        );
    }

    #[tokio::test]
    async fn test_control_tool_unauthorized_carries_control_scope_hint() {
        let (server, _) = server(
            MockRemoClient::new()
                .with_devices(vec![device("device-1")])
                .with_appliances(vec![appliance("ap-1", "device-1")])
                .failing_mutations(401, "unauthorized"),
        );

        let result = server
            .invoke_tool(
                "remo_control_light",
                json!({"deviceId": "device-1", "applianceId": "ap-1", "button": "on"}),
            )
            .await
            .unwrap();

        assert_eq!(
            result.text(),
            "Nature Remo API error (401): unauthorized (Hint: verify token validity; required scopes: sendir, basic)"
        );
    }

    #[tokio::test]
    async fn test_aircon_without_settings_is_tool_error() {
        let (server, client) = server(
            MockRemoClient::new()
                .with_devices(vec![device("device-1")])
                .with_appliances(vec![appliance("ap-1", "device-1")]),
        );

        let result = server
            .invoke_tool(
                "remo_control_aircon",
                json!({"deviceId": "device-1", "applianceId": "ap-1", "button": ""}),
            )
            .await
            .unwrap();

        assert!(result.failed());
        assert_eq!(
            result.text(),
            "At least one aircon control parameter is required."
        );
        assert!(client.calls().is_empty());
    }

    #[tokio::test]
    async fn test_aircon_update_reaches_vendor() {
        let (server, client) = server(
            MockRemoClient::new()
                .with_devices(vec![device("device-1")])
                .with_appliances(vec![appliance("ap-1", "device-1")]),
        );

        let result = server
            .invoke_tool(
                "remo_control_aircon",
                json!({"deviceId": "device-1", "applianceId": "ap-1", "airDirectionH": "swing"}),
            )
            .await
            .unwrap();

        assert!(!result.failed());
        match client.mutations().as_slice() {
            [MockCall::ControlAircon {
                appliance_id,
                settings,
            }] => {
                assert_eq!(appliance_id, "ap-1");
                assert_eq!(settings.air_direction_h.as_deref(), Some("swing"));
            }
            other => panic!("unexpected calls: {other:?}"),
        }
    }
}
