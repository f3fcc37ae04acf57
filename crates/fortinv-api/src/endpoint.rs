//! Controller monitor endpoints

use std::fmt;

/// Monitor endpoint queried for devices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Endpoint {
    /// Managed FortiSwitch status
    Switches,
    /// Managed FortiAP status
    AccessPoints,
}

impl Endpoint {
    /// All endpoints, in the order they are fetched and mapped
    pub const ALL: [Endpoint; 2] = [Endpoint::Switches, Endpoint::AccessPoints];

    /// Request path relative to the controller root
    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Switches => "api/v2/monitor/switch-controller/managed-switch/status",
            Endpoint::AccessPoints => "api/v2/monitor/wifi/managed_ap",
        }
    }

    /// Platform name in lower case (`fortiswitch`, `fortiap`)
    #[must_use]
    pub fn platform(self) -> &'static str {
        match self {
            Endpoint::Switches => "fortiswitch",
            Endpoint::AccessPoints => "fortiap",
        }
    }

    /// Platform name as the vendor writes it (`FortiSwitch`, `FortiAP`)
    #[must_use]
    pub fn product_name(self) -> &'static str {
        match self {
            Endpoint::Switches => "FortiSwitch",
            Endpoint::AccessPoints => "FortiAP",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.platform())
    }
}
