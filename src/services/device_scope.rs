//! Device scoping for control operations
//!
//! Every tool that touches an appliance or a signal first builds a
//! [`DeviceSafetyContext`] for the hub device the caller named. Lookups then
//! only search that device's appliances, so an id belonging to another hub
//! device resolves to "not found" and never reaches a vendor mutation.
//!
//! Appliances whose device reference is missing are excluded from every
//! context.

use crate::client::{Appliance, Device, RemoClient, Signal};
use crate::error::{RemoError, Result};

/// Appliances linked to one hub device, fetched for a single tool call
///
/// Invariant: every appliance in [`DeviceSafetyContext::appliances`] reports
/// `device.id == device_id`. The context is immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceSafetyContext {
    device_id: String,
    device_appliances: Vec<Appliance>,
}

/// A signal together with the scoped appliance that owns it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScopedSignal<'a> {
    pub appliance: &'a Appliance,
    pub signal: &'a Signal,
}

impl DeviceSafetyContext {
    /// Fetch devices and appliances concurrently and scope them to `device_id`
    ///
    /// Either read failing aborts the build with that read's error.
    pub async fn build(client: &dyn RemoClient, device_id: &str) -> Result<Self> {
        let (devices, appliances) =
            tokio::try_join!(client.get_devices(), client.get_appliances())?;
        Self::from_parts(device_id, &devices, appliances)
    }

    /// Scope an already fetched snapshot to `device_id`
    pub fn from_parts(
        device_id: &str,
        devices: &[Device],
        appliances: Vec<Appliance>,
    ) -> Result<Self> {
        if !devices.iter().any(|device| device.id == device_id) {
            return Err(RemoError::device_not_found(device_id));
        }

        let device_appliances = appliances
            .into_iter()
            .filter(|appliance| appliance.device_id() == Some(device_id))
            .collect();

        Ok(Self {
            device_id: device_id.to_string(),
            device_appliances,
        })
    }

    /// The hub device this context is scoped to
    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    /// Appliances linked to the device, in vendor order
    pub fn appliances(&self) -> &[Appliance] {
        &self.device_appliances
    }

    /// Resolve an appliance id within the device
    ///
    /// Duplicate ids within one device are not expected; the first one wins.
    pub fn require_appliance(&self, appliance_id: &str) -> Result<&Appliance> {
        self.device_appliances
            .iter()
            .find(|appliance| appliance.id == appliance_id)
            .ok_or_else(|| RemoError::appliance_not_found(appliance_id))
    }

    /// Resolve a signal id within the device's appliances
    ///
    /// Appliances are searched in vendor order, then signals in list order.
    pub fn require_signal(&self, signal_id: &str) -> Result<ScopedSignal<'_>> {
        self.device_appliances
            .iter()
            .find_map(|appliance| {
                appliance
                    .signals()
                    .iter()
                    .find(|signal| signal.id == signal_id)
                    .map(|signal| ScopedSignal { appliance, signal })
            })
            .ok_or_else(|| RemoError::signal_not_found(signal_id))
    }
}
