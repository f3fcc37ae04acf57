//! Extraction rules
//!
//! A [`Rule`] is a pure function from a device record to an optional JSON value.
//! Rules are bound to attribute names by a [`RuleSet`], which is built once from
//! configuration and then applied to every device.

use std::collections::HashSet;
use std::sync::LazyLock;

use fortinv_api::DeviceRecord;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::model_for_part;
use crate::options::CasePolicy;

static OS_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^-]*-v([^-]*)").expect("valid os version pattern"));

static OS_RELEASE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-.*-(.*)").expect("valid os release pattern"));

/// Subsystem path reported for managed switches
const SWITCH_CONTROLLER_PATH: &str = "switch-controller";

/// A field was present but did not have the expected format
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMismatch {
    /// What was being extracted, e.g. `os_version`
    pub target: &'static str,
    /// The offending value
    pub value: String,
}

/// Named extraction rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rule {
    /// `connecting_from`, passed through
    ConnectingFrom,
    /// `serial`, passed through
    Serial,
    /// `device_vendor`, passed through
    Vendor,
    /// `status`, always lower-cased
    ConnectionStatus,
    /// `device_platform`, passed through
    DevicePlatform,
    /// Firmware version from `os_version`
    OsVersion,
    /// Firmware release suffix from `os_version`
    OsRelease,
    /// Operating system name from the subsystem `path`
    OsDistribution,
    /// Hardware model from the part number in `os_version`
    DeviceType,
    /// Whether any port can deliver power over ethernet
    PoeCapable,
}

impl Rule {
    /// Every rule
    pub const ALL: [Rule; 10] = [
        Rule::ConnectingFrom,
        Rule::Serial,
        Rule::Vendor,
        Rule::ConnectionStatus,
        Rule::DevicePlatform,
        Rule::OsVersion,
        Rule::OsRelease,
        Rule::OsDistribution,
        Rule::DeviceType,
        Rule::PoeCapable,
    ];

    /// Identifier used in configuration
    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Rule::ConnectingFrom => "connecting-from",
            Rule::Serial => "serial",
            Rule::Vendor => "vendor",
            Rule::ConnectionStatus => "connection-status",
            Rule::DevicePlatform => "device-platform",
            Rule::OsVersion => "os-version",
            Rule::OsRelease => "os-release",
            Rule::OsDistribution => "os-distribution",
            Rule::DeviceType => "device-type",
            Rule::PoeCapable => "poe-capable",
        }
    }

    /// Host variable written when the binding does not name one
    #[must_use]
    pub fn default_attribute(self) -> &'static str {
        match self {
            Rule::ConnectingFrom => "ansible_host",
            Rule::Serial => "device_serial",
            Rule::Vendor => "device_vendor",
            Rule::ConnectionStatus => "device_status",
            Rule::DevicePlatform => "device_platform",
            Rule::OsVersion => "ansible_distribution_version",
            Rule::OsRelease => "ansible_distribution_release",
            Rule::OsDistribution => "ansible_distribution",
            Rule::DeviceType => "device_type",
            Rule::PoeCapable => "poe_switch",
        }
    }

    /// Record fields the rule reads
    #[must_use]
    pub fn input_fields(self) -> &'static [&'static str] {
        match self {
            Rule::ConnectingFrom => &["connecting_from"],
            Rule::Serial => &["serial"],
            Rule::Vendor => &["device_vendor"],
            Rule::ConnectionStatus => &["status"],
            Rule::DevicePlatform => &["device_platform"],
            Rule::OsVersion | Rule::OsRelease | Rule::DeviceType => &["os_version"],
            Rule::OsDistribution => &["path"],
            Rule::PoeCapable => &["ports"],
        }
    }

    /// Whether the rule can fail on a malformed field and so obeys [`crate::FieldParsing`]
    #[must_use]
    pub fn is_fallible(self) -> bool {
        matches!(self, Rule::OsVersion | Rule::OsRelease)
    }

    /// Extract the rule's value from a record
    ///
    /// Missing fields yield `Ok(None)`.
    ///
    /// # Errors
    /// Returns [`FieldMismatch`] when a fallible rule finds its field in an
    /// unexpected format.
    pub fn extract(
        self,
        record: &DeviceRecord,
        casing: CasePolicy,
    ) -> Result<Option<Value>, FieldMismatch> {
        let value = match self {
            Rule::ConnectingFrom => pass_through(record.connecting_from.as_ref(), casing),
            Rule::Serial => pass_through(record.serial.as_ref(), casing),
            Rule::Vendor => pass_through(record.device_vendor.as_ref(), casing),
            Rule::DevicePlatform => pass_through(record.device_platform.as_ref(), casing),
            Rule::ConnectionStatus => pass_through(record.status.as_ref(), CasePolicy::Lower),
            Rule::OsVersion => {
                capture(&OS_VERSION, "os_version", record.os_version.as_deref(), casing)?
            }
            Rule::OsRelease => {
                capture(&OS_RELEASE, "os_release", record.os_version.as_deref(), casing)?
            }
            Rule::OsDistribution => os_distribution(record.path.as_deref()),
            Rule::DeviceType => device_type(record.os_version.as_deref(), casing),
            Rule::PoeCapable => Some(poe_capability(record)),
        };
        Ok(value)
    }
}

fn pass_through(value: Option<&Value>, casing: CasePolicy) -> Option<Value> {
    value.cloned().map(|v| casing.apply_value(v))
}

fn capture(
    pattern: &Regex,
    target: &'static str,
    os_version: Option<&str>,
    casing: CasePolicy,
) -> Result<Option<Value>, FieldMismatch> {
    let Some(os_version) = os_version else {
        return Ok(None);
    };

    pattern
        .captures(os_version)
        .and_then(|caps| caps.get(1))
        .map(|m| Some(Value::String(casing.apply(m.as_str()))))
        .ok_or_else(|| FieldMismatch {
            target,
            value: os_version.to_string(),
        })
}

fn os_distribution(path: Option<&str>) -> Option<Value> {
    match path {
        Some(SWITCH_CONTROLLER_PATH) => Some(Value::String("FortiSwitchOS".to_string())),
        _ => None,
    }
}

fn device_type(os_version: Option<&str>, casing: CasePolicy) -> Option<Value> {
    let part = os_version?.split('-').next()?;
    model_for_part(part).map(|model| Value::String(casing.apply(model)))
}

fn poe_capability(record: &DeviceRecord) -> Value {
    let label = if record.ports.iter().any(|port| port.is_poe_capable()) {
        "poe_switch"
    } else {
        "no_poe_switch"
    };
    Value::String(label.to_string())
}

/// A rule bound to the host variable it writes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleBinding {
    pub rule: Rule,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    attribute: Option<String>,
}

impl RuleBinding {
    /// Bind a rule to its default attribute
    #[must_use]
    pub fn new(rule: Rule) -> Self {
        Self {
            rule,
            attribute: None,
        }
    }

    /// Bind a rule to a custom attribute
    #[must_use]
    pub fn named(attribute: impl Into<String>, rule: Rule) -> Self {
        Self {
            rule,
            attribute: Some(attribute.into()),
        }
    }

    /// Host variable written by this binding
    #[must_use]
    pub fn attribute(&self) -> &str {
        self.attribute
            .as_deref()
            .unwrap_or_else(|| self.rule.default_attribute())
    }
}

/// Ordered variable and group rules applied to every device
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    /// Rules that only write a host variable
    #[serde(default = "default_variables")]
    pub variables: Vec<RuleBinding>,
    /// Rules that write a host variable and put the host in a group
    #[serde(default = "default_groups")]
    pub groups: Vec<RuleBinding>,
}

fn default_variables() -> Vec<RuleBinding> {
    vec![
        RuleBinding::new(Rule::ConnectingFrom),
        RuleBinding::new(Rule::Serial),
        RuleBinding::new(Rule::Vendor),
        RuleBinding::new(Rule::OsRelease),
    ]
}

fn default_groups() -> Vec<RuleBinding> {
    vec![
        RuleBinding::new(Rule::ConnectionStatus),
        RuleBinding::new(Rule::OsVersion),
        RuleBinding::new(Rule::DevicePlatform),
        RuleBinding::new(Rule::DeviceType),
        RuleBinding::new(Rule::PoeCapable),
    ]
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            variables: default_variables(),
            groups: default_groups(),
        }
    }
}

impl RuleSet {
    /// First attribute written by more than one binding, if any
    #[must_use]
    pub fn duplicate_attribute(&self) -> Option<&str> {
        let mut seen = HashSet::new();
        self.variables
            .iter()
            .chain(&self.groups)
            .map(RuleBinding::attribute)
            .find(|attribute| !seen.insert(*attribute))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fortinv_api::Port;
    use serde_json::json;

    fn switch(os_version: &str) -> DeviceRecord {
        DeviceRecord {
            os_version: Some(os_version.to_string()),
            ..DeviceRecord::new("SW1")
        }
    }

    #[test]
    fn test_os_version() {
        let record = switch("FS1E48-v6.2.3-build123-FORTINET");
        assert_eq!(
            Rule::OsVersion.extract(&record, CasePolicy::Lower),
            Ok(Some(json!("6.2.3")))
        );
    }

    #[test]
    fn test_os_version_mismatch() {
        let record = switch("garbage");
        let err = Rule::OsVersion
            .extract(&record, CasePolicy::Lower)
            .unwrap_err();
        assert_eq!(err.target, "os_version");
        assert_eq!(err.value, "garbage");
    }

    #[test]
    fn test_os_version_missing_field() {
        let record = DeviceRecord::new("SW1");
        assert_eq!(Rule::OsVersion.extract(&record, CasePolicy::Lower), Ok(None));
        assert_eq!(Rule::OsRelease.extract(&record, CasePolicy::Lower), Ok(None));
        assert_eq!(Rule::DeviceType.extract(&record, CasePolicy::Lower), Ok(None));
    }

    #[test]
    fn test_os_release() {
        let record = switch("S548DF-v7.0.1-build456-FORTINET");
        assert_eq!(
            Rule::OsRelease.extract(&record, CasePolicy::Lower),
            Ok(Some(json!("fortinet")))
        );
        assert_eq!(
            Rule::OsRelease.extract(&record, CasePolicy::Preserve),
            Ok(Some(json!("FORTINET")))
        );
    }

    #[test]
    fn test_os_release_mismatch() {
        let err = Rule::OsRelease
            .extract(&switch("S548DF"), CasePolicy::Lower)
            .unwrap_err();
        assert_eq!(err.target, "os_release");
    }

    #[test]
    fn test_device_type_casing() {
        let record = switch("FS1E48-v6.2.3-build123-FORTINET");
        assert_eq!(
            Rule::DeviceType.extract(&record, CasePolicy::Lower),
            Ok(Some(json!("fs-1048e")))
        );
        assert_eq!(
            Rule::DeviceType.extract(&record, CasePolicy::Preserve),
            Ok(Some(json!("FS-1048E")))
        );
    }

    #[test]
    fn test_device_type_unknown_prefix() {
        let record = switch("ZZ9999-v6.2.3-build123-FORTINET");
        assert_eq!(Rule::DeviceType.extract(&record, CasePolicy::Lower), Ok(None));
    }

    #[test]
    fn test_pass_through_casing() {
        let record = DeviceRecord {
            serial: Some(json!("ABC123")),
            ..DeviceRecord::new("SW1")
        };
        assert_eq!(
            Rule::Serial.extract(&record, CasePolicy::Lower),
            Ok(Some(json!("abc123")))
        );
        assert_eq!(
            Rule::Serial.extract(&record, CasePolicy::Preserve),
            Ok(Some(json!("ABC123")))
        );
        assert_eq!(Rule::Vendor.extract(&record, CasePolicy::Lower), Ok(None));
    }

    #[test]
    fn test_connection_status_always_lowered() {
        let record = DeviceRecord {
            status: Some(json!("Online")),
            ..DeviceRecord::new("SW1")
        };
        assert_eq!(
            Rule::ConnectionStatus.extract(&record, CasePolicy::Preserve),
            Ok(Some(json!("online")))
        );

        let numeric = DeviceRecord {
            status: Some(json!(1)),
            ..DeviceRecord::new("SW1")
        };
        assert_eq!(
            Rule::ConnectionStatus.extract(&numeric, CasePolicy::Lower),
            Ok(Some(json!(1)))
        );
    }

    #[test]
    fn test_os_distribution() {
        let record = DeviceRecord {
            path: Some("switch-controller".to_string()),
            ..DeviceRecord::new("SW1")
        };
        assert_eq!(
            Rule::OsDistribution.extract(&record, CasePolicy::Lower),
            Ok(Some(json!("FortiSwitchOS")))
        );

        let ap = DeviceRecord {
            path: Some("wifi".to_string()),
            ..DeviceRecord::new("AP1")
        };
        assert_eq!(Rule::OsDistribution.extract(&ap, CasePolicy::Lower), Ok(None));
    }

    #[test]
    fn test_poe_capability() {
        let poe = DeviceRecord {
            ports: vec![
                Port::default(),
                Port {
                    poe_capable: Some(json!(true)),
                    ..Port::default()
                },
            ],
            ..DeviceRecord::new("SW1")
        };
        assert_eq!(
            Rule::PoeCapable.extract(&poe, CasePolicy::Lower),
            Ok(Some(json!("poe_switch")))
        );

        let no_ports = DeviceRecord::new("SW2");
        assert_eq!(
            Rule::PoeCapable.extract(&no_ports, CasePolicy::Lower),
            Ok(Some(json!("no_poe_switch")))
        );

        let no_poe = DeviceRecord {
            ports: vec![Port {
                poe_capable: Some(json!(false)),
                ..Port::default()
            }],
            ..DeviceRecord::new("SW3")
        };
        assert_eq!(
            Rule::PoeCapable.extract(&no_poe, CasePolicy::Lower),
            Ok(Some(json!("no_poe_switch")))
        );
    }

    #[test]
    fn test_only_fallible_rules_mismatch() {
        let record = switch("garbage");
        for rule in Rule::ALL {
            let result = rule.extract(&record, CasePolicy::Lower);
            assert_eq!(result.is_err(), rule.is_fallible(), "{}", rule.id());
        }
        assert_eq!(Rule::OsRelease.input_fields(), ["os_version"]);
        assert_eq!(Rule::OsDistribution.input_fields(), ["path"]);
    }

    #[test]
    fn test_rule_ids_round_trip_through_serde() {
        for rule in Rule::ALL {
            let value = serde_json::to_value(rule).unwrap();
            assert_eq!(value, json!(rule.id()));
        }
    }

    #[test]
    fn test_default_rule_set() {
        let rules = RuleSet::default();
        let variables: Vec<&str> = rules.variables.iter().map(RuleBinding::attribute).collect();
        let groups: Vec<&str> = rules.groups.iter().map(RuleBinding::attribute).collect();

        assert_eq!(
            variables,
            [
                "ansible_host",
                "device_serial",
                "device_vendor",
                "ansible_distribution_release"
            ]
        );
        assert_eq!(
            groups,
            [
                "device_status",
                "ansible_distribution_version",
                "device_platform",
                "device_type",
                "poe_switch"
            ]
        );
        assert_eq!(rules.duplicate_attribute(), None);
    }

    #[test]
    fn test_binding_attribute_override() {
        let binding = RuleBinding::named("fortiswitch_os", Rule::OsDistribution);
        assert_eq!(binding.attribute(), "fortiswitch_os");
        assert_eq!(
            RuleBinding::new(Rule::OsDistribution).attribute(),
            "ansible_distribution"
        );
    }

    #[test]
    fn test_duplicate_attribute() {
        let rules = RuleSet {
            variables: vec![RuleBinding::new(Rule::Serial)],
            groups: vec![RuleBinding::named("device_serial", Rule::Vendor)],
        };
        assert_eq!(rules.duplicate_attribute(), Some("device_serial"));
    }

    #[test]
    fn test_partial_rule_set_deserialization() {
        let rules: RuleSet = serde_json::from_value(json!({
            "groups": [{"rule": "device-type"}, {"rule": "os-distribution", "attribute": "os"}]
        }))
        .unwrap();

        assert_eq!(rules.variables, RuleSet::default().variables);
        assert_eq!(rules.groups[1].attribute(), "os");
    }

    #[test]
    fn test_unknown_rule_rejected() {
        let result: Result<RuleSet, _> =
            serde_json::from_value(json!({"groups": [{"rule": "uptime"}]}));
        assert!(result.is_err());
    }
}
