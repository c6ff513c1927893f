//! Boomer traps: common misuses of terms, served read-only.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoomerTrap {
    pub id: String,
    pub term: String,
    pub correct_usage: String,
    pub incorrect_usage_example: String,
    pub explanation: String,
}

/// Traps whose term matches `term`, ignoring case. An empty term matches all.
pub fn for_term<'a>(traps: &'a [BoomerTrap], term: &str) -> Vec<&'a BoomerTrap> {
    let needle = term.trim().to_lowercase();
    traps
        .iter()
        .filter(|t| needle.is_empty() || t.term.to_lowercase() == needle)
        .collect()
}
