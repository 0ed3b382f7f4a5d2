//! Lookup services shared by the tool handlers
//!
//! [`device_scope`] restricts appliance and signal lookups to a single hub
//! device. [`name_matcher`] resolves human-facing names with exact-match
//! disambiguation. Neither formats nor logs errors.

pub mod device_scope;
pub mod name_matcher;

pub use device_scope::{DeviceSafetyContext, ScopedSignal};
pub use name_matcher::{find_single_by_name, normalize, NamedItem};
