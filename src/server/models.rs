//! Request models for MCP tools
//!
//! Arguments arrive in camelCase. Required identifiers must be non-empty;
//! decoding or validation failures surface as JSON-RPC invalid params.

use crate::client::{AirconSettings, TemperatureUnit};
use schemars::JsonSchema;
use serde::Deserialize;
use validator::Validate;

/// Tool without arguments
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct NoArgs {}

/// Hub device selection
#[derive(Debug, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DeviceRequest {
    #[schemars(description = "Nature Remo device ID")]
    #[validate(length(min = 1))]
    pub device_id: String,
}

/// Send signal by id
#[derive(Debug, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SendSignalRequest {
    #[schemars(description = "Nature Remo device ID that owns the signal")]
    #[validate(length(min = 1))]
    pub device_id: String,
    #[schemars(description = "Signal ID to send")]
    #[validate(length(min = 1))]
    pub signal_id: String,
}

/// Send signal by appliance and signal name
#[derive(Debug, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SendSignalByNameRequest {
    #[schemars(description = "Nature Remo device ID that owns the appliance")]
    #[validate(length(min = 1))]
    pub device_id: String,
    #[schemars(description = "Appliance nickname (exact match, case-insensitive)")]
    #[validate(length(min = 1))]
    pub appliance_name: String,
    #[schemars(description = "Signal name (exact match, case-insensitive)")]
    #[validate(length(min = 1))]
    pub signal_name: String,
}

/// Air conditioner settings update
#[derive(Debug, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ControlAirconRequest {
    #[schemars(description = "Nature Remo device ID that owns the appliance")]
    #[validate(length(min = 1))]
    pub device_id: String,
    #[schemars(description = "Air conditioner appliance ID")]
    #[validate(length(min = 1))]
    pub appliance_id: String,
    #[schemars(description = "Operation mode (cool, warm, dry, blow, auto)")]
    pub operation_mode: Option<String>,
    #[schemars(description = "Target temperature")]
    pub temperature: Option<String>,
    #[schemars(description = "Temperature unit")]
    pub temperature_unit: Option<TemperatureUnit>,
    #[schemars(description = "Air volume (auto, 1-10)")]
    pub air_volume: Option<String>,
    #[schemars(description = "Vertical air direction")]
    pub air_direction: Option<String>,
    #[schemars(description = "Horizontal air direction")]
    pub air_direction_h: Option<String>,
    #[schemars(description = "Button, e.g. power-off")]
    pub button: Option<String>,
}

impl ControlAirconRequest {
    /// Settings part of the request
    pub fn settings(&self) -> AirconSettings {
        AirconSettings {
            operation_mode: self.operation_mode.clone(),
            temperature: self.temperature.clone(),
            temperature_unit: self.temperature_unit,
            air_volume: self.air_volume.clone(),
            air_direction: self.air_direction.clone(),
            air_direction_h: self.air_direction_h.clone(),
            button: self.button.clone(),
        }
    }
}

/// Button press on a TV or light appliance
#[derive(Debug, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ButtonRequest {
    #[schemars(description = "Nature Remo device ID that owns the appliance")]
    #[validate(length(min = 1))]
    pub device_id: String,
    #[schemars(description = "Appliance ID")]
    #[validate(length(min = 1))]
    pub appliance_id: String,
    #[schemars(description = "Button name")]
    #[validate(length(min = 1))]
    pub button: String,
}
