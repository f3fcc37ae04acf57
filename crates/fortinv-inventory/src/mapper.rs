//! Device to inventory mapping

use fortinv_api::{DeviceRecord, Endpoint};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::InventoryError;
use crate::naming::{safe_group_name, unreserved_group_name};
use crate::options::{CasePolicy, FieldParsing, MappingOptions};
use crate::rules::{RuleBinding, RuleSet};
use crate::sink::InventorySink;

/// Vendor written onto every record before the rules run
const VENDOR: &str = "Fortinet";

/// Applies a [`RuleSet`] to device records and writes the result to a sink
#[derive(Debug, Clone, Default)]
pub struct DeviceMapper {
    rules: RuleSet,
    options: MappingOptions,
}

impl DeviceMapper {
    /// Create a mapper
    #[must_use]
    pub fn new(rules: RuleSet, options: MappingOptions) -> Self {
        Self { rules, options }
    }

    /// Map every device of an endpoint
    ///
    /// # Errors
    /// Returns the first field-parse error under strict parsing.
    pub fn map_devices<S: InventorySink + ?Sized>(
        &self,
        endpoint: Endpoint,
        devices: Vec<DeviceRecord>,
        sink: &mut S,
    ) -> Result<(), InventoryError> {
        for device in devices {
            self.map_device(endpoint, device, sink)?;
        }
        Ok(())
    }

    /// Map one device
    ///
    /// `ansible_host` is written right after the host is registered, so it is
    /// present even when a later rule aborts the run.
    ///
    /// # Errors
    /// Returns a field-parse error under strict parsing.
    pub fn map_device<S: InventorySink + ?Sized>(
        &self,
        endpoint: Endpoint,
        mut device: DeviceRecord,
        sink: &mut S,
    ) -> Result<(), InventoryError> {
        let host = device.name.clone();
        debug!(%host, %endpoint, "mapping device");

        sink.add_host(&host);
        sink.set_variable(
            &host,
            "ansible_host",
            device.connecting_from.clone().unwrap_or(Value::Null),
        );

        let platform = match self.options.casing {
            CasePolicy::Lower => endpoint.platform(),
            CasePolicy::Preserve => endpoint.product_name(),
        };
        device.device_platform = Some(Value::String(platform.to_string()));
        device.device_vendor = Some(Value::String(VENDOR.to_string()));

        for binding in &self.rules.variables {
            let value = self.extract(binding, &device)?;
            sink.set_variable(&host, binding.attribute(), value);
        }

        for binding in &self.rules.groups {
            let value = self.extract(binding, &device)?;
            let group = group_label(&value)
                .map(|label| safe_group_name(&label))
                .filter(|g| !g.is_empty())
                .map(unreserved_group_name);
            sink.set_variable(&host, binding.attribute(), value);

            if let Some(group) = group {
                sink.add_group(&group);
                sink.add_child(&group, &host);
            }
        }

        Ok(())
    }

    /// Run one binding, applying the field parsing policy
    ///
    /// Only fallible rules are downgraded under lenient parsing; a mismatch
    /// from any other rule is always an error.
    fn extract(&self, binding: &RuleBinding, device: &DeviceRecord) -> Result<Value, InventoryError> {
        let rule = binding.rule;
        match rule.extract(device, self.options.casing) {
            Ok(value) => Ok(value.unwrap_or(Value::Null)),
            Err(mismatch)
                if rule.is_fallible() && self.options.field_parsing == FieldParsing::Lenient =>
            {
                warn!(
                    host = %device.name,
                    rule = rule.id(),
                    fields = ?rule.input_fields(),
                    value = %mismatch.value,
                    "failed to extract {}, recording null",
                    mismatch.target
                );
                Ok(Value::Null)
            }
            Err(mismatch) => Err(InventoryError::FieldParse {
                host: device.name.clone(),
                target: mismatch.target,
                value: mismatch.value,
            }),
        }
    }
}

/// Text a group is named after; arrays, objects and null form no group
fn group_label(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
