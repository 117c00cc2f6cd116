//! Shape validation for interface descriptors

use std::collections::HashSet;
use std::fmt;

use thiserror::Error;

use super::descriptor::InterfaceDescriptor;
use super::entry::{Entry, EntryKind};
use super::param::{EventParam, Param};
use super::types::{TypeTag, TypeTagError};

/// Indexed parameter limit for a non-anonymous event (topic 0 is the signature)
const MAX_INDEXED: usize = 3;
const MAX_INDEXED_ANONYMOUS: usize = 4;

/// What is wrong at a given location
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViolationKind {
    #[error("{0}")]
    InvalidType(TypeTagError),
    #[error("tuple has no components")]
    EmptyTuple,
    #[error("components given for non-tuple type `{0}`")]
    UnexpectedComponents(String),
    #[error("name is empty")]
    EmptyName,
    #[error("duplicate entry `{0}`")]
    DuplicateEntry(String),
    #[error("{count} indexed parameters exceed the limit of {limit}")]
    TooManyIndexed { count: usize, limit: usize },
    #[error("more than one constructor")]
    MultipleConstructors,
}

/// A single validation finding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Path to the offending item, e.g. "function setValues.inputs[0].components[1]"
    pub location: String,
    pub kind: ViolationKind,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location, self.kind)
    }
}

/// Check a descriptor against the parameter grammar and entry invariants
///
/// Returns every violation found; an empty list means the descriptor is valid.
pub fn validate(descriptor: &InterfaceDescriptor) -> Vec<Violation> {
    let mut violations = Vec::new();
    let mut seen = HashSet::new();
    let mut constructors = 0usize;

    for (idx, entry) in descriptor.entries().iter().enumerate() {
        let label = entry_label(idx, entry);

        if let Some(name) = entry.name() {
            if name.trim().is_empty() {
                violations.push(Violation {
                    location: label.clone(),
                    kind: ViolationKind::EmptyName,
                });
            }
        }

        match entry {
            Entry::Function(function) => {
                check_params(&label, "inputs", &function.inputs, &mut violations);
                check_params(&label, "outputs", &function.outputs, &mut violations);
            }
            Entry::Constructor(constructor) => {
                constructors += 1;
                if constructors == 2 {
                    violations.push(Violation {
                        location: label.clone(),
                        kind: ViolationKind::MultipleConstructors,
                    });
                }
                check_params(&label, "inputs", &constructor.inputs, &mut violations);
            }
            Entry::Event(event) => {
                check_event_params(&label, &event.inputs, &mut violations);
                let limit = if event.anonymous {
                    MAX_INDEXED_ANONYMOUS
                } else {
                    MAX_INDEXED
                };
                let count = event.indexed_count();
                if count > limit {
                    violations.push(Violation {
                        location: label.clone(),
                        kind: ViolationKind::TooManyIndexed { count, limit },
                    });
                }
            }
            Entry::Error(error) => {
                check_params(&label, "inputs", &error.inputs, &mut violations);
            }
        }

        if entry.kind() != EntryKind::Constructor {
            let key = (entry.kind(), entry.signature());
            if !seen.insert(key) {
                violations.push(Violation {
                    location: label,
                    kind: ViolationKind::DuplicateEntry(entry.signature()),
                });
            }
        }
    }

    violations
}

fn entry_label(idx: usize, entry: &Entry) -> String {
    match entry.name() {
        Some(name) if !name.trim().is_empty() => format!("{} {}", entry.kind(), name),
        _ => format!("{} #{}", entry.kind(), idx),
    }
}

fn check_params(label: &str, field: &str, params: &[Param], violations: &mut Vec<Violation>) {
    for (idx, param) in params.iter().enumerate() {
        let location = format!("{label}.{field}[{idx}]");
        check_param(&location, &param.ty, &param.components, violations);
    }
}

fn check_event_params(label: &str, params: &[EventParam], violations: &mut Vec<Violation>) {
    for (idx, param) in params.iter().enumerate() {
        let location = format!("{label}.inputs[{idx}]");
        check_param(&location, &param.ty, &param.components, violations);
    }
}

fn check_param(location: &str, ty: &str, components: &[Param], violations: &mut Vec<Violation>) {
    let tag: TypeTag = match ty.parse() {
        Ok(tag) => tag,
        Err(err) => {
            violations.push(Violation {
                location: location.to_string(),
                kind: ViolationKind::InvalidType(err),
            });
            return;
        }
    };

    if tag.is_tuple() {
        if components.is_empty() {
            violations.push(Violation {
                location: location.to_string(),
                kind: ViolationKind::EmptyTuple,
            });
        }
        check_params(location, "components", components, violations);
    } else if !components.is_empty() {
        violations.push(Violation {
            location: location.to_string(),
            kind: ViolationKind::UnexpectedComponents(ty.to_string()),
        });
    }
}
