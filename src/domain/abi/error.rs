//! Registry error taxonomy

use thiserror::Error;

use super::entry::EntryKind;
use super::validate::Violation;

/// Failures surfaced by registration, lookup and parsing
///
/// None of these are transient; retrying with the same input fails again.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("contract name must not be empty")]
    EmptyName,

    #[error("contract `{0}` is already registered")]
    DuplicateName(String),

    #[error(
        "descriptor `{name}` is malformed ({} violation(s)): {}",
        .violations.len(),
        join_violations(.violations)
    )]
    MalformedDescriptor {
        name: String,
        violations: Vec<Violation>,
    },

    #[error("contract `{0}` not found")]
    ContractNotFound(String),

    #[error("{kind} `{entry}` not found in `{contract}`")]
    EntryNotFound {
        contract: String,
        kind: EntryKind,
        entry: String,
    },

    #[error(
        "{kind} `{entry}` in `{contract}` is overloaded; pass input types to pick one of: {}",
        .candidates.join(", ")
    )]
    AmbiguousOverload {
        contract: String,
        kind: EntryKind,
        entry: String,
        /// Canonical signatures of every matching overload
        candidates: Vec<String>,
    },

    #[error("unknown entry kind `{0}`")]
    UnknownKind(String),

    #[error("invalid ABI JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

impl RegistryError {
    /// Contract or entry lookup miss
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::ContractNotFound(_) | Self::EntryNotFound { .. }
        )
    }
}

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
