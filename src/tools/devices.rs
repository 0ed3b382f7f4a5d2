//! Hub device tools: device listing and room climate readings

use crate::client::{Device, RemoClient};
use crate::error::{RemoError, Result};
use crate::tools::{to_pretty_json, tool_success};
use chrono::{DateTime, FixedOffset};
use rmcp::model::CallToolResult;
use serde::Serialize;
use serde_json::{json, Number};

/// Latest temperature and humidity reported by a hub device
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomTemperatureSummary {
    pub device_id: String,
    pub device_name: String,
    pub temperature: Option<Number>,
    pub humidity: Option<Number>,
    pub temperature_measured_at: Option<DateTime<FixedOffset>>,
    pub humidity_measured_at: Option<DateTime<FixedOffset>>,
    pub online: Option<bool>,
}

impl From<&Device> for RoomTemperatureSummary {
    fn from(device: &Device) -> Self {
        let events = device.newest_events.as_ref();
        let temperature = events.and_then(|events| events.te.as_ref());
        let humidity = events.and_then(|events| events.hu.as_ref());

        Self {
            device_id: device.id.clone(),
            device_name: device.name.clone(),
            temperature: temperature.map(|reading| reading.val.clone()),
            humidity: humidity.map(|reading| reading.val.clone()),
            temperature_measured_at: temperature.map(|reading| reading.created_at),
            humidity_measured_at: humidity.map(|reading| reading.created_at),
            online: device.online,
        }
    }
}

/// List every hub device visible to the token
pub async fn list_devices(client: &dyn RemoClient) -> Result<CallToolResult> {
    let devices = client.get_devices().await?;
    let summary: Vec<RoomTemperatureSummary> = devices.iter().map(Into::into).collect();

    Ok(tool_success(
        to_pretty_json(&summary)?,
        json!({ "devices": summary }),
    ))
}

/// Temperature and humidity for one hub device
///
/// A device without a temperature sensor reading is not an error; the
/// missing values are reported as `null`.
pub async fn get_room_temperature(
    client: &dyn RemoClient,
    device_id: &str,
) -> Result<CallToolResult> {
    let devices = client.get_devices().await?;
    let device = devices
        .iter()
        .find(|device| device.id == device_id)
        .ok_or_else(|| RemoError::device_not_found(device_id))?;

    let summary = RoomTemperatureSummary::from(device);
    Ok(tool_success(
        to_pretty_json(&summary)?,
        json!({ "deviceId": device_id, "device": summary }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{NewestEvents, SensorValue};
    use crate::tools::ToolResultExt;
    use crate::mock::{MockCall, MockRemoClient};
    use pretty_assertions::assert_eq;
    use serde_json::Value;

    fn reading(val: Value) -> SensorValue {
        SensorValue {
            val: serde_json::from_value(val).unwrap(),
            created_at: "2026-02-07T08:00:00Z".parse().unwrap(),
        }
    }

    fn device(id: &str, events: Option<NewestEvents>) -> Device {
        Device {
            id: id.to_string(),
            name: format!("Remo {id}"),
            online: Some(true),
            newest_events: events,
        }
    }

    #[tokio::test]
    async fn test_humidity_only_device_reports_null_temperature() {
        let client = MockRemoClient::new().with_devices(vec![device(
            "device-1",
            Some(NewestEvents {
                hu: Some(reading(json!(48))),
                ..Default::default()
            }),
        )]);

        let result = get_room_temperature(&client, "device-1").await.unwrap();

        assert!(!result.failed());
        assert_eq!(
            result.structured_content.unwrap(),
            json!({
                "deviceId": "device-1",
                "device": {
                    "deviceId": "device-1",
                    "deviceName": "Remo device-1",
                    "temperature": null,
                    "humidity": 48,
                    "temperatureMeasuredAt": null,
                    "humidityMeasuredAt": "2026-02-07T08:00:00Z",
                    "online": true
                }
            })
        );
    }

    #[tokio::test]
    async fn test_readings_keep_vendor_number_and_offset() {
        let client = MockRemoClient::new().with_devices(vec![device(
            "device-1",
            Some(NewestEvents {
                hu: Some(SensorValue {
                    val: 45.into(),
                    created_at: "2026-02-07T17:00:00+09:00".parse().unwrap(),
                }),
                ..Default::default()
            }),
        )]);

        let result = get_room_temperature(&client, "device-1").await.unwrap();
        let structured = result.structured_content.unwrap();

        assert_eq!(structured["device"]["humidity"], json!(45));
        assert_eq!(
            structured["device"]["humidityMeasuredAt"],
            json!("2026-02-07T17:00:00+09:00")
        );
        assert!(result.content[0].as_text().unwrap().text.contains("\"humidity\": 45,"));
    }

    #[tokio::test]
    async fn test_unknown_device_is_not_found() {
        let client = MockRemoClient::new().with_devices(vec![device("device-1", None)]);

        let err = get_room_temperature(&client, "device-404")
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Device not found: device-404");
    }

    #[tokio::test]
    async fn test_list_devices_summarises_every_device() {
        let client = MockRemoClient::new().with_devices(vec![
            device(
                "device-1",
                Some(NewestEvents {
                    te: Some(reading(json!(23.5))),
                    hu: Some(reading(json!(40))),
                    ..Default::default()
                }),
            ),
            device("device-2", None),
        ]);

        let result = list_devices(&client).await.unwrap();
        let structured = result.structured_content.clone().unwrap();

        assert_eq!(structured["devices"].as_array().unwrap().len(), 2);
        assert_eq!(structured["devices"][0]["temperature"], json!(23.5));
        assert_eq!(structured["devices"][1]["humidity"], json!(null));
        assert!(result.text().starts_with("[\n  {"));
        assert_eq!(client.calls(), vec![MockCall::GetDevices]);
    }
}
