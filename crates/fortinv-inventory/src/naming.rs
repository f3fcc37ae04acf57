//! Group name sanitization

/// Characters Ansible does not accept in group names
const INVALID_CHARACTERS: [char; 3] = ['-', '.', ' '];

/// Top-level keys of the `--list` document
const RESERVED_GROUPS: [&str; 3] = ["all", "ungrouped", "_meta"];

/// Turn an extracted value into a valid Ansible group name
///
/// A leading digit gets an underscore prefix, then every `-`, `.` and space
/// becomes `_`. Only ASCII digits count, so a value starting with e.g. `²` or
/// `٣` is not prefixed (Python's `str.isdigit()` would prefix both).
#[must_use]
pub fn safe_group_name(value: &str) -> String {
    let mut name = String::with_capacity(value.len() + 1);
    if value.starts_with(|c: char| c.is_ascii_digit()) {
        name.push('_');
    }
    name.extend(value.chars().map(|c| {
        if INVALID_CHARACTERS.contains(&c) {
            '_'
        } else {
            c
        }
    }));
    name
}

/// Prefix a sanitized name that collides with a key of the `--list` document
#[must_use]
pub fn unreserved_group_name(name: String) -> String {
    if RESERVED_GROUPS.contains(&name.as_str()) {
        format!("_{name}")
    } else {
        name
    }
}
