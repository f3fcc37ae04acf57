//! Managed device record schema

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A single managed switch or access point as reported by the controller
///
/// Only the fields the mapper reads are typed. Pass-through fields stay loosely
/// typed because the controller is free to report non-string values for them.
/// Anything else the controller sends is kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceRecord {
    /// Device name, used as the inventory hostname
    pub name: String,
    /// Management address the device connects from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connecting_from: Option<Value>,
    /// Serial number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial: Option<Value>,
    /// Connection status (`online`, `offline`, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Value>,
    /// Firmware string, e.g. `S548DF-v7.0.1-build456-FORTINET`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os_version: Option<String>,
    /// Controller subsystem path, e.g. `switch-controller`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Vendor name; filled in by the mapper
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_vendor: Option<Value>,
    /// Platform name; filled in by the mapper from the source endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_platform: Option<Value>,
    /// Switch ports (absent and `null` both deserialize to empty)
    #[serde(default, deserialize_with = "null_as_empty")]
    pub ports: Vec<Port>,
    /// Fields not modelled above
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DeviceRecord {
    /// Create a record with only a name set
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// A switch port
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Port {
    /// Whether the port can deliver power over ethernet
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poe_capable: Option<Value>,
    /// Fields not modelled above
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Port {
    /// Whether `poe_capable` is set to a truthy value
    #[must_use]
    pub fn is_poe_capable(&self) -> bool {
        self.poe_capable.as_ref().is_some_and(is_truthy)
    }
}

/// JSON truthiness: `false`, `0`, `""`, `[]`, `{}` and `null` are falsy
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
