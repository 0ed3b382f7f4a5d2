//! Appliance tools: listing and direct control
//!
//! Every control path resolves the appliance through a
//! [`DeviceSafetyContext`] before the vendor mutation is issued.

use crate::client::{AirconSettings, Appliance, ApplianceSettings, RemoClient, TemperatureUnit};
use crate::error::{RemoError, Result};
use crate::services::DeviceSafetyContext;
use crate::tools::{to_pretty_json, tool_success};
use rmcp::model::CallToolResult;
use serde::Serialize;
use serde_json::json;
use tracing::info;

/// Appliance as presented to the caller
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplianceSummary {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub appliance_type: String,
    pub device: Option<DeviceRef>,
    pub settings: Option<ApplianceSettings>,
    pub signals: Vec<SignalSummary>,
}

/// Device back-reference of an appliance summary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceRef {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalSummary {
    pub id: String,
    pub name: String,
}

impl From<&Appliance> for ApplianceSummary {
    fn from(appliance: &Appliance) -> Self {
        Self {
            id: appliance.id.clone(),
            name: appliance.nickname.clone(),
            appliance_type: appliance.appliance_type.clone(),
            device: appliance.device.as_ref().map(|device| DeviceRef {
                id: device.id.clone(),
                name: device.name.clone(),
            }),
            settings: appliance.settings.clone(),
            signals: appliance
                .signals()
                .iter()
                .map(|signal| SignalSummary {
                    id: signal.id.clone(),
                    name: signal.name.clone(),
                })
                .collect(),
        }
    }
}

/// Settings echoed back after an aircon update; unset fields are omitted
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
struct AirconUpdate<'a> {
    device_id: &'a str,
    appliance_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    operation_mode: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature_unit: Option<TemperatureUnit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    air_volume: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    air_direction: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    air_direction_h: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    button: Option<&'a str>,
}

/// List the appliances linked to a hub device
pub async fn list_appliances(client: &dyn RemoClient, device_id: &str) -> Result<CallToolResult> {
    let context = DeviceSafetyContext::build(client, device_id).await?;
    let summary: Vec<ApplianceSummary> = context.appliances().iter().map(Into::into).collect();

    Ok(tool_success(
        to_pretty_json(&summary)?,
        json!({ "deviceId": device_id, "appliances": summary }),
    ))
}

/// Update air conditioner settings of an appliance in the device
pub async fn control_aircon(
    client: &dyn RemoClient,
    device_id: &str,
    appliance_id: &str,
    settings: &AirconSettings,
) -> Result<CallToolResult> {
    if settings.is_empty() {
        return Err(RemoError::invalid_input(
            "At least one aircon control parameter is required.",
        ));
    }

    let context = DeviceSafetyContext::build(client, device_id).await?;
    context.require_appliance(appliance_id)?;

    info!(device_id, appliance_id, "Updating aircon settings");
    client.control_aircon(appliance_id, settings).await?;

    let payload = AirconUpdate {
        device_id,
        appliance_id,
        operation_mode: settings.operation_mode.as_deref(),
        temperature: settings.temperature.as_deref(),
        temperature_unit: settings.temperature_unit,
        air_volume: settings.air_volume.as_deref(),
        air_direction: settings.air_direction.as_deref(),
        air_direction_h: settings.air_direction_h.as_deref(),
        button: settings.button.as_deref(),
    };

    Ok(tool_success(
        format!("Aircon updated: {}", to_pretty_json(&payload)?),
        serde_json::to_value(&payload)?,
    ))
}

/// Press a button on a TV appliance in the device
pub async fn control_tv(
    client: &dyn RemoClient,
    device_id: &str,
    appliance_id: &str,
    button: &str,
) -> Result<CallToolResult> {
    let context = DeviceSafetyContext::build(client, device_id).await?;
    context.require_appliance(appliance_id)?;

    info!(device_id, appliance_id, button, "Sending TV command");
    client.control_tv(appliance_id, button).await?;

    Ok(tool_success(
        format!("TV command sent: deviceId={device_id}, applianceId={appliance_id}, button={button}"),
        json!({ "deviceId": device_id, "applianceId": appliance_id, "button": button }),
    ))
}

/// Press a button on a light appliance in the device
pub async fn control_light(
    client: &dyn RemoClient,
    device_id: &str,
    appliance_id: &str,
    button: &str,
) -> Result<CallToolResult> {
    let context = DeviceSafetyContext::build(client, device_id).await?;
    context.require_appliance(appliance_id)?;

    info!(device_id, appliance_id, button, "Sending light command");
    client.control_light(appliance_id, button).await?;

    Ok(tool_success(
        format!(
            "Light command sent: deviceId={device_id}, applianceId={appliance_id}, button={button}"
        ),
        json!({ "deviceId": device_id, "applianceId": appliance_id, "button": button }),
    ))
}
