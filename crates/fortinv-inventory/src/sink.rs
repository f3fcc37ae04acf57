//! Inventory sink and the in-memory inventory

use std::collections::{BTreeMap, BTreeSet};

use serde_json::{Map, Value, json};

/// Receiver of hosts, variables and group memberships
///
/// Every operation is idempotent: repeating a call leaves the sink unchanged.
pub trait InventorySink {
    /// Register a host
    fn add_host(&mut self, host: &str);

    /// Set a host variable, replacing any previous value
    fn set_variable(&mut self, host: &str, key: &str, value: Value);

    /// Register a group
    fn add_group(&mut self, group: &str);

    /// Put a host into a group
    fn add_child(&mut self, group: &str, host: &str);
}

/// In-memory inventory with deterministic ordering
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Inventory {
    hosts: BTreeMap<String, BTreeMap<String, Value>>,
    groups: BTreeMap<String, BTreeSet<String>>,
}

impl Inventory {
    /// Create an empty inventory
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Host names, sorted
    pub fn hosts(&self) -> impl Iterator<Item = &str> {
        self.hosts.keys().map(String::as_str)
    }

    /// Group names, sorted
    pub fn groups(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    /// Number of hosts
    #[must_use]
    pub fn host_count(&self) -> usize {
        self.hosts.len()
    }

    /// Variables of a host
    #[must_use]
    pub fn host_vars(&self, host: &str) -> Option<&BTreeMap<String, Value>> {
        self.hosts.get(host)
    }

    /// A single host variable
    #[must_use]
    pub fn variable(&self, host: &str, key: &str) -> Option<&Value> {
        self.hosts.get(host)?.get(key)
    }

    /// Members of a group
    #[must_use]
    pub fn group_hosts(&self, group: &str) -> Option<&BTreeSet<String>> {
        self.groups.get(group)
    }

    /// Groups a host belongs to, sorted
    #[must_use]
    pub fn groups_of(&self, host: &str) -> Vec<&str> {
        self.groups
            .iter()
            .filter(|(_, members)| members.contains(host))
            .map(|(group, _)| group.as_str())
            .collect()
    }

    /// Render as an Ansible dynamic inventory `--list` document
    ///
    /// Hosts that belong to no group are listed under `ungrouped`.
    #[must_use]
    pub fn to_list_json(&self) -> Value {
        let mut document = Map::new();

        let mut hostvars = Map::new();
        for (host, vars) in &self.hosts {
            hostvars.insert(host.clone(), vars_json(vars));
        }
        document.insert("_meta".to_string(), json!({ "hostvars": hostvars }));

        let mut children: Vec<&str> = vec!["ungrouped"];
        for (group, members) in &self.groups {
            document.insert(group.clone(), json!({ "hosts": members }));
            children.push(group);
        }
        document.insert("all".to_string(), json!({ "children": children }));

        let ungrouped: Vec<&str> = self
            .hosts
            .keys()
            .filter(|host| !self.groups.values().any(|members| members.contains(*host)))
            .map(String::as_str)
            .collect();
        document.insert("ungrouped".to_string(), json!({ "hosts": ungrouped }));

        Value::Object(document)
    }

    /// Render a host's variables as an Ansible `--host` document
    ///
    /// Unknown hosts render as an empty object.
    #[must_use]
    pub fn to_host_json(&self, host: &str) -> Value {
        self.host_vars(host)
            .map_or_else(|| Value::Object(Map::new()), vars_json)
    }
}

fn vars_json(vars: &BTreeMap<String, Value>) -> Value {
    Value::Object(
        vars.iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect(),
    )
}

impl InventorySink for Inventory {
    fn add_host(&mut self, host: &str) {
        self.hosts.entry(host.to_string()).or_default();
    }

    fn set_variable(&mut self, host: &str, key: &str, value: Value) {
        self.hosts
            .entry(host.to_string())
            .or_default()
            .insert(key.to_string(), value);
    }

    fn add_group(&mut self, group: &str) {
        self.groups.entry(group.to_string()).or_default();
    }

    fn add_child(&mut self, group: &str, host: &str) {
        self.add_host(host);
        self.groups
            .entry(group.to_string())
            .or_default()
            .insert(host.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Inventory {
        let mut inventory = Inventory::new();
        inventory.add_host("SW1");
        inventory.set_variable("SW1", "ansible_host", json!("10.0.0.5"));
        inventory.add_group("online");
        inventory.add_child("online", "SW1");
        inventory.add_host("AP1");
        inventory.set_variable("AP1", "ansible_host", Value::Null);
        inventory
    }

    #[test]
    fn test_operations_are_idempotent() {
        let mut inventory = sample();
        let before = inventory.clone();

        inventory.add_host("SW1");
        inventory.add_group("online");
        inventory.add_child("online", "SW1");
        inventory.set_variable("SW1", "ansible_host", json!("10.0.0.5"));

        assert_eq!(inventory, before);
    }

    #[test]
    fn test_null_variable_is_kept() {
        let inventory = sample();
        assert_eq!(inventory.variable("AP1", "ansible_host"), Some(&Value::Null));
    }

    #[test]
    fn test_list_json() {
        let list = sample().to_list_json();

        assert_eq!(list["_meta"]["hostvars"]["SW1"]["ansible_host"], json!("10.0.0.5"));
        assert_eq!(list["_meta"]["hostvars"]["AP1"]["ansible_host"], Value::Null);
        assert_eq!(list["online"]["hosts"], json!(["SW1"]));
        assert_eq!(list["all"]["children"], json!(["ungrouped", "online"]));
        assert_eq!(list["ungrouped"]["hosts"], json!(["AP1"]));
    }

    #[test]
    fn test_host_json() {
        let inventory = sample();
        assert_eq!(
            inventory.to_host_json("SW1"),
            json!({"ansible_host": "10.0.0.5"})
        );
        assert_eq!(inventory.to_host_json("missing"), json!({}));
    }

    #[test]
    fn test_lookups() {
        let inventory = sample();
        let members = inventory.group_hosts("online").unwrap();
        assert!(members.contains("SW1"));
        assert!(inventory.group_hosts("offline").is_none());
        assert_eq!(inventory.host_vars("AP1").map(BTreeMap::len), Some(1));
        assert!(inventory.host_vars("missing").is_none());
    }

    #[test]
    fn test_groups_of() {
        let inventory = sample();
        assert_eq!(inventory.groups_of("SW1"), ["online"]);
        assert!(inventory.groups_of("AP1").is_empty());
    }
}
