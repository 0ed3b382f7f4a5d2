//! Mock implementations for testing
//!
//! [`MockRemoClient`] serves fixed device and appliance lists and records
//! every call it receives, so tests can assert that a rejected request never
//! reached a vendor mutation.

use crate::client::{AirconSettings, Appliance, Device, RemoClient};
use crate::error::{RemoError, Result};
use async_trait::async_trait;
use std::sync::{Mutex, MutexGuard};

/// A call received by [`MockRemoClient`]
#[derive(Debug, Clone, PartialEq)]
pub enum MockCall {
    GetDevices,
    GetAppliances,
    SendSignal(String),
    ControlTv { appliance_id: String, button: String },
    ControlLight { appliance_id: String, button: String },
    ControlAircon { appliance_id: String, settings: AirconSettings },
}

impl MockCall {
    /// True for calls that change appliance state
    pub fn is_mutation(&self) -> bool {
        !matches!(self, MockCall::GetDevices | MockCall::GetAppliances)
    }
}

/// Which operation a configured failure applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FailurePoint {
    Devices,
    Appliances,
    Mutations,
}

/// Mock Nature Remo client for testing
#[derive(Default)]
pub struct MockRemoClient {
    devices: Vec<Device>,
    appliances: Vec<Appliance>,
    failures: Vec<(FailurePoint, u16, String)>,
    calls: Mutex<Vec<MockCall>>,
}

impl MockRemoClient {
    /// Create new mock client with empty lists
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the devices returned by `get_devices`
    pub fn with_devices(mut self, devices: Vec<Device>) -> Self {
        self.devices = devices;
        self
    }

    /// Set the appliances returned by `get_appliances`
    pub fn with_appliances(mut self, appliances: Vec<Appliance>) -> Self {
        self.appliances = appliances;
        self
    }

    /// Fail `get_devices` with an API error
    pub fn failing_devices(self, status: u16, body: &str) -> Self {
        self.failing(FailurePoint::Devices, status, body)
    }

    /// Fail `get_appliances` with an API error
    pub fn failing_appliances(self, status: u16, body: &str) -> Self {
        self.failing(FailurePoint::Appliances, status, body)
    }

    /// Fail every mutating call with an API error
    pub fn failing_mutations(self, status: u16, body: &str) -> Self {
        self.failing(FailurePoint::Mutations, status, body)
    }

    fn failing(mut self, point: FailurePoint, status: u16, body: &str) -> Self {
        self.failures.push((point, status, body.to_string()));
        self
    }

    /// All calls received so far, in order
    pub fn calls(&self) -> Vec<MockCall> {
        self.lock().clone()
    }

    /// Mutating calls received so far, in order
    pub fn mutations(&self) -> Vec<MockCall> {
        self.lock()
            .iter()
            .filter(|call| call.is_mutation())
            .cloned()
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<MockCall>> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn record(&self, call: MockCall, point: FailurePoint) -> Result<()> {
        self.lock().push(call);
        match self.failures.iter().find(|(p, _, _)| *p == point) {
            Some((_, status, body)) => Err(RemoError::api(*status, body.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl RemoClient for MockRemoClient {
    async fn get_devices(&self) -> Result<Vec<Device>> {
        self.record(MockCall::GetDevices, FailurePoint::Devices)?;
        Ok(self.devices.clone())
    }

    async fn get_appliances(&self) -> Result<Vec<Appliance>> {
        self.record(MockCall::GetAppliances, FailurePoint::Appliances)?;
        Ok(self.appliances.clone())
    }

    async fn send_signal(&self, signal_id: &str) -> Result<()> {
        self.record(
            MockCall::SendSignal(signal_id.to_string()),
            FailurePoint::Mutations,
        )
    }

    async fn control_tv(&self, appliance_id: &str, button: &str) -> Result<()> {
        self.record(
            MockCall::ControlTv {
                appliance_id: appliance_id.to_string(),
                button: button.to_string(),
            },
            FailurePoint::Mutations,
        )
    }

    async fn control_light(&self, appliance_id: &str, button: &str) -> Result<()> {
        self.record(
            MockCall::ControlLight {
                appliance_id: appliance_id.to_string(),
                button: button.to_string(),
            },
            FailurePoint::Mutations,
        )
    }

    async fn control_aircon(&self, appliance_id: &str, settings: &AirconSettings) -> Result<()> {
        self.record(
            MockCall::ControlAircon {
                appliance_id: appliance_id.to_string(),
                settings: settings.clone(),
            },
            FailurePoint::Mutations,
        )
    }
}
