//! Response types for the monitor API

use serde::{Deserialize, Serialize};

/// Envelope returned by every `api/v2/monitor/*` endpoint
///
/// Only `results` is required; a body without it is treated as malformed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorResponse<T> {
    pub results: Vec<T>,
    #[serde(default)]
    pub http_method: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub http_status: Option<u16>,
    /// Subsystem path, e.g. `switch-controller` or `wifi`
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub vdom: Option<String>,
    #[serde(default)]
    pub serial: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub build: Option<u64>,
}
