//! Interface registry - contract descriptors indexed by name

use std::collections::BTreeMap;

use alloy_primitives::B256;

use super::descriptor::InterfaceDescriptor;
use super::entry::{Entry, EntryKind, Event, Function};
use super::error::RegistryError;
use super::validate::validate;

/// Registry of validated contract interfaces
///
/// Populated once, then shared read-only. Every descriptor it holds has
/// passed [`validate`].
#[derive(Debug, Default, Clone)]
pub struct InterfaceRegistry {
    descriptors: BTreeMap<String, InterfaceDescriptor>,
}

impl InterfaceRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a descriptor under a unique, non-empty name
    ///
    /// On failure the registry is left unchanged.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        descriptor: InterfaceDescriptor,
    ) -> Result<(), RegistryError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(RegistryError::EmptyName);
        }
        if self.descriptors.contains_key(&name) {
            return Err(RegistryError::DuplicateName(name));
        }

        let violations = validate(&descriptor);
        if !violations.is_empty() {
            return Err(RegistryError::MalformedDescriptor { name, violations });
        }

        tracing::debug!(contract = %name, entries = descriptor.len(), "registered descriptor");
        self.descriptors.insert(name, descriptor);
        Ok(())
    }

    /// Parse a JSON ABI array and register it
    pub fn register_json(&mut self, name: impl Into<String>, json: &str) -> Result<(), RegistryError> {
        let descriptor = InterfaceDescriptor::from_json(json)?;
        self.register(name, descriptor)
    }

    /// Look up a descriptor by contract name
    pub fn lookup(&self, name: &str) -> Result<&InterfaceDescriptor, RegistryError> {
        self.descriptors
            .get(name)
            .ok_or_else(|| RegistryError::ContractNotFound(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.descriptors.contains_key(name)
    }

    /// Resolve one entry of a contract
    ///
    /// Without `input_types`, the entry name must be unique for its kind.
    /// With `input_types`, the canonical input type sequence must match
    /// exactly (whitespace is ignored). Tuples are written expanded, e.g.
    /// `(string,bytes)[]`. The entry name is ignored for constructors.
    pub fn find_entry(
        &self,
        contract: &str,
        kind: EntryKind,
        entry_name: &str,
        input_types: Option<&[&str]>,
    ) -> Result<&Entry, RegistryError> {
        let descriptor = self.lookup(contract)?;
        let mut candidates: Vec<&Entry> = descriptor.matching(kind, entry_name).collect();

        if let Some(types) = input_types {
            let wanted: Vec<String> = types.iter().map(|ty| normalize_type(ty)).collect();
            candidates.retain(|entry| entry.input_types() == wanted);
        }

        match candidates.as_slice() {
            [entry] => Ok(*entry),
            [] => Err(RegistryError::EntryNotFound {
                contract: contract.to_string(),
                kind,
                entry: entry_name.to_string(),
            }),
            many => Err(RegistryError::AmbiguousOverload {
                contract: contract.to_string(),
                kind,
                entry: entry_name.to_string(),
                candidates: many.iter().map(|entry| entry.signature()).collect(),
            }),
        }
    }

    /// Resolve a function of a contract
    pub fn find_function(
        &self,
        contract: &str,
        name: &str,
        input_types: Option<&[&str]>,
    ) -> Result<&Function, RegistryError> {
        self.find_entry(contract, EntryKind::Function, name, input_types)?
            .as_function()
            .ok_or_else(|| RegistryError::EntryNotFound {
                contract: contract.to_string(),
                kind: EntryKind::Function,
                entry: name.to_string(),
            })
    }

    /// Every function with this selector, as (contract, function), in contract name order
    pub fn functions_by_selector(&self, selector: [u8; 4]) -> Vec<(&str, &Function)> {
        self.descriptors
            .iter()
            .filter_map(|(name, descriptor)| {
                descriptor
                    .function_by_selector(selector)
                    .map(|function| (name.as_str(), function))
            })
            .collect()
    }

    /// Look up functions by selector hex string (e.g., "0xa9059cbb")
    pub fn functions_by_selector_hex(&self, selector_hex: &str) -> Vec<(&str, &Function)> {
        match parse_selector(selector_hex) {
            Some(selector) => self.functions_by_selector(selector),
            None => Vec::new(),
        }
    }

    /// Every non-anonymous event with this topic 0, as (contract, event)
    pub fn events_by_topic(&self, topic: B256) -> Vec<(&str, &Event)> {
        self.descriptors
            .iter()
            .filter_map(|(name, descriptor)| {
                descriptor
                    .event_by_topic(topic)
                    .map(|event| (name.as_str(), event))
            })
            .collect()
    }

    /// Registered contract names, sorted
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.descriptors.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &InterfaceDescriptor)> {
        self.descriptors
            .iter()
            .map(|(name, descriptor)| (name.as_str(), descriptor))
    }

    /// Get the number of registered contracts
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

fn normalize_type(ty: &str) -> String {
    ty.split_whitespace().collect()
}

/// Parse a 4-byte selector from hex, with or without the 0x prefix
pub fn parse_selector(selector_hex: &str) -> Option<[u8; 4]> {
    let trimmed = selector_hex.trim();
    let normalized = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    if normalized.len() != 8 {
        return None;
    }

    let bytes = hex::decode(normalized).ok()?;
    bytes.try_into().ok()
}
