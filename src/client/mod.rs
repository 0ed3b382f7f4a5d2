//! Nature Remo cloud API client
//!
//! [`RemoClient`] is the seam between the tool layer and the vendor API.
//! The production implementation is [`http_client::RemoHttpClient`]; tests
//! substitute [`crate::mock::MockRemoClient`].

pub mod http_client;
pub mod models;

pub use http_client::RemoHttpClient;
pub use models::{
    AirconSettings, Appliance, ApplianceDevice, ApplianceSettings, Device, NewestEvents,
    SensorValue, Signal, TemperatureUnit,
};

use crate::error::Result;
use async_trait::async_trait;

/// Operations the server issues against the Nature Remo API
///
/// Every method fails with [`crate::error::RemoError::Api`] on a non-success
/// HTTP status. Mutators return nothing beyond success.
#[async_trait]
pub trait RemoClient: Send + Sync {
    /// List all hub devices visible to the access token
    async fn get_devices(&self) -> Result<Vec<Device>>;

    /// List all appliances visible to the access token
    async fn get_appliances(&self) -> Result<Vec<Appliance>>;

    /// Emit a stored infrared signal
    async fn send_signal(&self, signal_id: &str) -> Result<()>;

    /// Press a TV button
    async fn control_tv(&self, appliance_id: &str, button: &str) -> Result<()>;

    /// Press a light button
    async fn control_light(&self, appliance_id: &str, button: &str) -> Result<()>;

    /// Update air conditioner settings
    async fn control_aircon(&self, appliance_id: &str, settings: &AirconSettings) -> Result<()>;
}
