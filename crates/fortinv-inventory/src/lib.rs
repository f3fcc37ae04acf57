//! fortinv-inventory: device to inventory mapping
//!
//! Turns managed switch and access point records into Ansible hosts, host
//! variables and groups. Each host variable is produced by a named extraction
//! [`Rule`]; group rules additionally place the host in a group named after the
//! sanitized value.

pub mod collector;
pub mod error;
pub mod mapper;
pub mod models;
pub mod naming;
pub mod options;
pub mod rules;
pub mod sink;

pub use collector::InventoryCollector;
pub use error::InventoryError;
pub use mapper::DeviceMapper;
pub use models::model_for_part;
pub use naming::{safe_group_name, unreserved_group_name};
pub use options::{CasePolicy, FieldParsing, MappingOptions};
pub use rules::{Rule, RuleBinding, RuleSet};
pub use sink::{Inventory, InventorySink};
