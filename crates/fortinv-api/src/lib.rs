//! fortinv-api: Shared FortiGate API types
//!
//! Contains the monitor response envelope, the managed device record schema and
//! the fixed set of controller endpoints used across the client, mapper and CLI.

pub mod device;
pub mod endpoint;
pub mod responses;

pub use device::{DeviceRecord, Port, is_truthy};
pub use endpoint::Endpoint;
pub use responses::MonitorResponse;
