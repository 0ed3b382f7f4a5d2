//! Infrared signal tools

use crate::client::{Appliance, RemoClient, Signal};
use crate::error::{RemoError, Result};
use crate::services::{find_single_by_name, DeviceSafetyContext};
use crate::tools::tool_success;
use rmcp::model::CallToolResult;
use serde_json::{json, Value};
use tracing::info;

fn sent_payload(device_id: &str, appliance: &Appliance, signal: &Signal) -> Value {
    json!({
        "deviceId": device_id,
        "applianceId": appliance.id,
        "applianceName": appliance.nickname,
        "signalId": signal.id,
        "signalName": signal.name,
    })
}

/// Send a stored signal of the device by id
pub async fn send_signal(
    client: &dyn RemoClient,
    device_id: &str,
    signal_id: &str,
) -> Result<CallToolResult> {
    let context = DeviceSafetyContext::build(client, device_id).await?;
    let scoped = context.require_signal(signal_id)?;

    info!(device_id, signal_id, "Sending signal");
    client.send_signal(&scoped.signal.id).await?;

    Ok(tool_success(
        format!(
            "Signal sent: deviceId={device_id}, appliance=\"{}\", signal=\"{}\" ({})",
            scoped.appliance.nickname, scoped.signal.name, scoped.signal.id
        ),
        sent_payload(device_id, scoped.appliance, scoped.signal),
    ))
}

/// Send a stored signal of the device by appliance and signal name
///
/// Both names must resolve to exactly one candidate; the signal is only
/// searched within the resolved appliance.
pub async fn send_signal_by_name(
    client: &dyn RemoClient,
    device_id: &str,
    appliance_name: &str,
    signal_name: &str,
) -> Result<CallToolResult> {
    let context = DeviceSafetyContext::build(client, device_id).await?;

    let appliance = find_single_by_name(context.appliances(), appliance_name)
        .ok_or_else(|| RemoError::ApplianceNameUnresolved(appliance_name.to_string()))?;
    let signal = find_single_by_name(appliance.signals(), signal_name)
        .ok_or_else(|| RemoError::SignalNameUnresolved(signal_name.to_string()))?;

    info!(device_id, signal_id = %signal.id, "Sending signal by name");
    client.send_signal(&signal.id).await?;

    Ok(tool_success(
        format!(
            "Signal sent: deviceId={device_id}, appliance=\"{}\" signal=\"{}\" ({})",
            appliance.nickname, signal.name, signal.id
        ),
        sent_payload(device_id, appliance, signal),
    ))
}
