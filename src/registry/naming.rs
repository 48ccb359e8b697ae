//! Command name derivation.
//!
//! `derive` keeps the exact character-level transform of the legacy tool,
//! including the double dash produced by a leading slash:
//!
//!   ("gossiper", "/endpoint/down/") -> "gossiper--endpoint-down"
//!   ("config",   "")                -> "config-"
//!
//! `leaf_name` is the cosmetic, group-relative form registered with clap.

use std::fmt;

/// Canonical identifier of an endpoint descriptor. Unique across a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommandName(String);

impl CommandName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CommandName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Derive the canonical command name from `(namespace, suffix)`.
pub fn derive(namespace: &str, suffix: &str) -> CommandName {
    let stripped = suffix.trim_end_matches('/');
    CommandName(format!("{namespace}-{stripped}").replace('/', "-"))
}

/// Group-relative leaf name: drops the `group` prefix and any dashes that
/// follow it. Falls back to the group name when nothing is left.
pub fn leaf_name(group: &str, name: &CommandName) -> String {
    let rest = name
        .as_str()
        .strip_prefix(group)
        .unwrap_or(name.as_str())
        .trim_start_matches('-');
    if rest.is_empty() {
        group.to_string()
    } else {
        rest.to_string()
    }
}
