//! Interface descriptor - the ordered entries of one contract ABI

use alloy_primitives::B256;
use serde::{Deserialize, Serialize};

use super::entry::{Constructor, CustomError, Entry, EntryKind, Event, Function};
use super::RegistryError;

/// A contract interface in declaration order
///
/// Serializes to and from the standard JSON ABI array shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InterfaceDescriptor {
    entries: Vec<Entry>,
}

impl InterfaceDescriptor {
    pub fn new(entries: Vec<Entry>) -> Self {
        Self { entries }
    }

    /// Parse a JSON ABI array
    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self, RegistryError> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn to_json(&self) -> Result<String, RegistryError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, RegistryError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn functions(&self) -> impl Iterator<Item = &Function> {
        self.entries.iter().filter_map(Entry::as_function)
    }

    pub fn events(&self) -> impl Iterator<Item = &Event> {
        self.entries.iter().filter_map(Entry::as_event)
    }

    pub fn errors(&self) -> impl Iterator<Item = &CustomError> {
        self.entries.iter().filter_map(Entry::as_error)
    }

    pub fn constructor(&self) -> Option<&Constructor> {
        self.entries.iter().find_map(Entry::as_constructor)
    }

    /// All entries of `kind` named `name`, in declaration order
    ///
    /// The name is ignored for constructors.
    pub fn matching(&self, kind: EntryKind, name: &str) -> impl Iterator<Item = &Entry> + '_ {
        let name = name.to_string();
        self.entries.iter().filter(move |entry| {
            entry.kind() == kind
                && (kind == EntryKind::Constructor || entry.name() == Some(name.as_str()))
        })
    }

    pub fn function_by_selector(&self, selector: [u8; 4]) -> Option<&Function> {
        self.functions().find(|function| function.selector() == selector)
    }

    pub fn error_by_selector(&self, selector: [u8; 4]) -> Option<&CustomError> {
        self.errors().find(|error| error.selector() == selector)
    }

    /// Non-anonymous event whose topic 0 is `topic`
    pub fn event_by_topic(&self, topic: B256) -> Option<&Event> {
        self.events()
            .filter(|event| !event.anonymous)
            .find(|event| event.topic() == topic)
    }
}

impl From<Vec<Entry>> for InterfaceDescriptor {
    fn from(entries: Vec<Entry>) -> Self {
        Self::new(entries)
    }
}

impl<'a> IntoIterator for &'a InterfaceDescriptor {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIST_MANAGER: &str = r#"[
        {
            "type": "function",
            "name": "getListManager",
            "inputs": [{"name": "tokenId", "type": "uint256", "internalType": "uint256"}],
            "outputs": [{"name": "", "type": "address", "internalType": "address"}],
            "stateMutability": "view"
        },
        {
            "type": "event",
            "name": "UpdateListManager",
            "inputs": [
                {"name": "tokenId", "type": "uint256", "indexed": true, "internalType": "uint256"},
                {"name": "manager", "type": "address", "indexed": false, "internalType": "address"}
            ],
            "anonymous": false
        },
        {
            "type": "error",
            "name": "NotManager",
            "inputs": []
        }
    ]"#;

    #[test]
    fn test_parse_preserves_order() {
        let descriptor = InterfaceDescriptor::from_json(LIST_MANAGER).unwrap();
        assert_eq!(descriptor.len(), 3);
        let kinds: Vec<EntryKind> = descriptor.entries().iter().map(Entry::kind).collect();
        assert_eq!(
            kinds,
            vec![EntryKind::Function, EntryKind::Event, EntryKind::Error]
        );
        assert_eq!(descriptor.functions().count(), 1);
        assert_eq!(descriptor.events().count(), 1);
        assert_eq!(descriptor.errors().count(), 1);
        assert!(descriptor.constructor().is_none());
    }

    #[test]
    fn test_json_round_trip() {
        let descriptor = InterfaceDescriptor::from_json(LIST_MANAGER).unwrap();
        let json = descriptor.to_json().unwrap();
        let reparsed = InterfaceDescriptor::from_json(&json).unwrap();
        assert_eq!(descriptor, reparsed);
    }

    #[test]
    fn test_selector_and_topic_lookup() {
        let descriptor = InterfaceDescriptor::from_json(LIST_MANAGER).unwrap();
        let function = descriptor.functions().next().unwrap();
        assert_eq!(
            descriptor.function_by_selector(function.selector()),
            Some(function)
        );
        assert!(descriptor.function_by_selector([0xde, 0xad, 0xbe, 0xef]).is_none());

        let event = descriptor.events().next().unwrap();
        assert_eq!(descriptor.event_by_topic(event.topic()), Some(event));

        let error = descriptor.errors().next().unwrap();
        assert_eq!(descriptor.error_by_selector(error.selector()), Some(error));
    }

    #[test]
    fn test_matching_outlives_name() {
        let descriptor = InterfaceDescriptor::from_json(LIST_MANAGER).unwrap();
        let found: Vec<&Entry> = {
            let name = String::from("getListManager");
            descriptor.matching(EntryKind::Function, &name).collect()
        };
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].signature(), "getListManager(uint256)");

        let constructors = descriptor.matching(EntryKind::Constructor, "ignored");
        assert_eq!(constructors.count(), 0);
    }

    #[test]
    fn test_parse_error_is_reported() {
        let result = InterfaceDescriptor::from_json(r#"{"not": "an array"}"#);
        assert!(matches!(result, Err(RegistryError::Parse(_))));
    }
}
