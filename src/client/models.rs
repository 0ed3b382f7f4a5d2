//! Nature Remo API data model
//!
//! Snapshots decoded from `GET /1/devices` and `GET /1/appliances`. Only the
//! fields the tools read are modelled; anything else in the vendor payload is
//! ignored on decode.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::Number;

/// A single sensor reading, kept as the vendor reported it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorValue {
    /// Measured value; integers stay integers
    pub val: Number,
    /// Measurement timestamp in the offset the vendor used
    pub created_at: DateTime<FixedOffset>,
}

/// Latest readings per sensor kind
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewestEvents {
    /// Temperature
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub te: Option<SensorValue>,
    /// Humidity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hu: Option<SensorValue>,
    /// Illuminance
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub il: Option<SensorValue>,
    /// Movement
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mo: Option<SensorValue>,
}

/// Hub device (a Remo unit)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub online: Option<bool>,
    #[serde(default)]
    pub newest_events: Option<NewestEvents>,
}

/// Stored infrared signal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Denormalised back-reference from an appliance to its hub device
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApplianceDevice {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Current air conditioner settings as reported by the vendor
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApplianceSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp_unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir_h: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button: Option<String>,
}

/// Controllable appliance registered under a hub device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appliance {
    pub id: String,
    #[serde(default)]
    pub nickname: String,
    /// Vendor type tag (`AC`, `TV`, `LIGHT`, `IR`, ...)
    #[serde(rename = "type", default)]
    pub appliance_type: String,
    #[serde(default)]
    pub device: Option<ApplianceDevice>,
    #[serde(default)]
    pub settings: Option<ApplianceSettings>,
    #[serde(default)]
    pub signals: Option<Vec<Signal>>,
}

impl Appliance {
    /// Id of the owning hub device, if the vendor reported one
    pub fn device_id(&self) -> Option<&str> {
        self.device.as_ref().and_then(|device| device.id.as_deref())
    }

    /// Signals of this appliance; an absent list reads as empty
    pub fn signals(&self) -> &[Signal] {
        self.signals.as_deref().unwrap_or(&[])
    }
}

/// Temperature unit accepted by `aircon_settings`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    C,
    F,
}

impl TemperatureUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemperatureUnit::C => "c",
            TemperatureUnit::F => "f",
        }
    }
}

/// Requested air conditioner settings; unset fields are sent as empty values
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AirconSettings {
    pub operation_mode: Option<String>,
    pub temperature: Option<String>,
    pub temperature_unit: Option<TemperatureUnit>,
    pub air_volume: Option<String>,
    pub air_direction: Option<String>,
    pub air_direction_h: Option<String>,
    pub button: Option<String>,
}

impl AirconSettings {
    /// True when no setting at all was requested
    pub fn is_empty(&self) -> bool {
        let blank = |value: &Option<String>| value.as_deref().map_or(true, str::is_empty);
        blank(&self.operation_mode)
            && blank(&self.temperature)
            && self.temperature_unit.is_none()
            && blank(&self.air_volume)
            && blank(&self.air_direction)
            && blank(&self.air_direction_h)
            && blank(&self.button)
    }

    /// Form fields for `POST /1/appliances/{id}/aircon_settings`
    pub fn to_form(&self) -> Vec<(&'static str, String)> {
        let value = |field: &Option<String>| field.clone().unwrap_or_default();
        vec![
            ("air_direction", value(&self.air_direction)),
            ("air_direction_h", value(&self.air_direction_h)),
            ("air_volume", value(&self.air_volume)),
            ("button", value(&self.button)),
            ("operation_mode", value(&self.operation_mode)),
            ("temperature", value(&self.temperature)),
            (
                "temperature_unit",
                self.temperature_unit
                    .map(|unit| unit.as_str().to_string())
                    .unwrap_or_default(),
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_appliance_decodes_with_missing_optional_fields() {
        let appliance: Appliance = serde_json::from_value(json!({
            "id": "ap1",
            "nickname": "AC",
            "type": "AC",
            "device": null,
            "signals": null
        }))
        .unwrap();

        assert_eq!(appliance.device_id(), None);
        assert!(appliance.signals().is_empty());
        assert!(appliance.settings.is_none());
    }

    #[test]
    fn test_device_decodes_sensor_readings() {
        let device: Device = serde_json::from_value(json!({
            "id": "device-1",
            "name": "Living Room Remo",
            "online": true,
            "firmware_version": "Remo/1.0.62",
            "newest_events": {
                "te": { "val": 24.3, "created_at": "2026-02-07T08:00:00Z" }
            }
        }))
        .unwrap();

        let events = device.newest_events.unwrap();
        assert_eq!(events.te.map(|te| te.val.as_f64()), Some(Some(24.3)));
        assert!(events.hu.is_none());
    }

    #[test]
    fn test_sensor_value_reencodes_as_received() {
        let raw = json!({ "val": 45, "created_at": "2026-02-07T17:00:00+09:00" });

        let reading: SensorValue = serde_json::from_value(raw.clone()).unwrap();

        assert_eq!(reading.val.as_u64(), Some(45));
        assert_eq!(serde_json::to_value(&reading).unwrap(), raw);
    }

    #[test]
    fn test_aircon_settings_emptiness() {
        assert!(AirconSettings::default().is_empty());
        assert!(AirconSettings {
            button: Some(String::new()),
            ..Default::default()
        }
        .is_empty());
        assert!(!AirconSettings {
            temperature_unit: Some(TemperatureUnit::C),
            ..Default::default()
        }
        .is_empty());
    }

    #[test]
    fn test_aircon_form_fills_unset_fields_with_empty_values() {
        let settings = AirconSettings {
            operation_mode: Some("cool".into()),
            temperature: Some("26".into()),
            temperature_unit: Some(TemperatureUnit::C),
            ..Default::default()
        };

        let form = settings.to_form();
        assert_eq!(form.len(), 7);
        assert!(form.contains(&("operation_mode", "cool".to_string())));
        assert!(form.contains(&("temperature_unit", "c".to_string())));
        assert!(form.contains(&("air_volume", String::new())));
    }
}
