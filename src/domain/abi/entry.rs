//! ABI entries: functions, constructors, events and custom errors

use std::fmt;
use std::str::FromStr;

use alloy_primitives::{keccak256, B256};
use serde::{Deserialize, Serialize};

use super::param::{joined_types, EventParam, Param};
use super::RegistryError;

/// Mutability classifier of a callable entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StateMutability {
    Pure,
    View,
    NonPayable,
    Payable,
}

impl StateMutability {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pure => "pure",
            Self::View => "view",
            Self::NonPayable => "nonpayable",
            Self::Payable => "payable",
        }
    }

    /// `pure` and `view` never change state
    pub fn is_read_only(self) -> bool {
        matches!(self, Self::Pure | Self::View)
    }

    pub fn accepts_value(self) -> bool {
        self == Self::Payable
    }
}

impl fmt::Display for StateMutability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Discriminator of an [`Entry`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntryKind {
    Function,
    Constructor,
    Event,
    Error,
}

impl EntryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Function => "function",
            Self::Constructor => "constructor",
            Self::Event => "event",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryKind {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "function" => Ok(Self::Function),
            "constructor" => Ok(Self::Constructor),
            "event" => Ok(Self::Event),
            "error" => Ok(Self::Error),
            _ => Err(RegistryError::UnknownKind(s.to_string())),
        }
    }
}

/// Compute the 4-byte selector from a canonical signature
pub fn compute_selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

/// A callable function
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Function {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub inputs: Vec<Param>,
    #[serde(default)]
    pub outputs: Vec<Param>,
    pub state_mutability: StateMutability,
}

impl Function {
    /// Canonical signature (e.g., "transfer(address,uint256)")
    pub fn signature(&self) -> String {
        format!("{}({})", self.name, joined_types(self.input_types().into_iter()))
    }

    /// Signature including mutability and outputs, for display
    pub fn full_signature(&self) -> String {
        let mut out = self.signature();
        if self.state_mutability != StateMutability::NonPayable {
            out.push(' ');
            out.push_str(self.state_mutability.as_str());
        }
        if !self.outputs.is_empty() {
            let outputs = joined_types(self.outputs.iter().map(Param::canonical_type));
            out.push_str(&format!(" returns ({outputs})"));
        }
        out
    }

    pub fn selector(&self) -> [u8; 4] {
        compute_selector(&self.signature())
    }

    pub fn selector_hex(&self) -> String {
        format!("0x{}", hex::encode(self.selector()))
    }

    pub fn input_types(&self) -> Vec<String> {
        self.inputs.iter().map(Param::canonical_type).collect()
    }
}

/// The contract constructor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Constructor {
    #[serde(default)]
    pub inputs: Vec<Param>,
    pub state_mutability: StateMutability,
}

impl Constructor {
    pub fn signature(&self) -> String {
        format!(
            "constructor({})",
            joined_types(self.inputs.iter().map(Param::canonical_type))
        )
    }
}

/// An event emitted by the contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub inputs: Vec<EventParam>,
    #[serde(default)]
    pub anonymous: bool,
}

impl Event {
    pub fn signature(&self) -> String {
        format!("{}({})", self.name, joined_types(self.input_types().into_iter()))
    }

    /// keccak256 of the signature; this is topic 0 unless the event is anonymous
    pub fn topic(&self) -> B256 {
        keccak256(self.signature().as_bytes())
    }

    pub fn input_types(&self) -> Vec<String> {
        self.inputs.iter().map(EventParam::canonical_type).collect()
    }

    pub fn indexed_count(&self) -> usize {
        self.inputs.iter().filter(|param| param.indexed).count()
    }
}

/// A custom error declared by the contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomError {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub inputs: Vec<Param>,
}

impl CustomError {
    pub fn signature(&self) -> String {
        format!("{}({})", self.name, joined_types(self.input_types().into_iter()))
    }

    pub fn selector(&self) -> [u8; 4] {
        compute_selector(&self.signature())
    }

    pub fn input_types(&self) -> Vec<String> {
        self.inputs.iter().map(Param::canonical_type).collect()
    }
}

/// One declaration in a contract interface
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Entry {
    Function(Function),
    Constructor(Constructor),
    Event(Event),
    Error(CustomError),
}

impl Entry {
    pub fn kind(&self) -> EntryKind {
        match self {
            Self::Function(_) => EntryKind::Function,
            Self::Constructor(_) => EntryKind::Constructor,
            Self::Event(_) => EntryKind::Event,
            Self::Error(_) => EntryKind::Error,
        }
    }

    /// Entry name; constructors have none
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Function(function) => Some(&function.name),
            Self::Constructor(_) => None,
            Self::Event(event) => Some(&event.name),
            Self::Error(error) => Some(&error.name),
        }
    }

    pub fn input_types(&self) -> Vec<String> {
        match self {
            Self::Function(function) => function.input_types(),
            Self::Constructor(constructor) => constructor
                .inputs
                .iter()
                .map(Param::canonical_type)
                .collect(),
            Self::Event(event) => event.input_types(),
            Self::Error(error) => error.input_types(),
        }
    }

    pub fn signature(&self) -> String {
        match self {
            Self::Function(function) => function.signature(),
            Self::Constructor(constructor) => constructor.signature(),
            Self::Event(event) => event.signature(),
            Self::Error(error) => error.signature(),
        }
    }

    pub fn as_function(&self) -> Option<&Function> {
        match self {
            Self::Function(function) => Some(function),
            _ => None,
        }
    }

    pub fn as_event(&self) -> Option<&Event> {
        match self {
            Self::Event(event) => Some(event),
            _ => None,
        }
    }

    pub fn as_error(&self) -> Option<&CustomError> {
        match self {
            Self::Error(error) => Some(error),
            _ => None,
        }
    }

    pub fn as_constructor(&self) -> Option<&Constructor> {
        match self {
            Self::Constructor(constructor) => Some(constructor),
            _ => None,
        }
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Function(function) => write!(f, "function {}", function.full_signature()),
            Self::Constructor(constructor) => write!(f, "{}", constructor.signature()),
            Self::Event(event) if event.anonymous => {
                write!(f, "event {} anonymous", event.signature())
            }
            Self::Event(event) => write!(f, "event {}", event.signature()),
            Self::Error(error) => write!(f, "error {}", error.signature()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approve() -> Function {
        Function {
            name: "approve".to_string(),
            inputs: vec![Param::new("to", "address"), Param::new("tokenId", "uint256")],
            outputs: vec![],
            state_mutability: StateMutability::Payable,
        }
    }

    #[test]
    fn test_compute_selector() {
        // transfer(address,uint256) -> 0xa9059cbb
        assert_eq!(
            compute_selector("transfer(address,uint256)"),
            [0xa9, 0x05, 0x9c, 0xbb]
        );
        // approve(address,uint256) -> 0x095ea7b3
        assert_eq!(approve().selector(), [0x09, 0x5e, 0xa7, 0xb3]);
        assert_eq!(approve().selector_hex(), "0x095ea7b3");
    }

    #[test]
    fn test_event_topic() {
        let event = Event {
            name: "Transfer".to_string(),
            inputs: vec![
                EventParam::new("from", "address", true),
                EventParam::new("to", "address", true),
                EventParam::new("tokenId", "uint256", true),
            ],
            anonymous: false,
        };
        assert_eq!(event.signature(), "Transfer(address,address,uint256)");
        assert_eq!(
            hex::encode(event.topic()),
            "ddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef"
        );
        assert_eq!(event.indexed_count(), 3);
    }

    #[test]
    fn test_entry_tagging() {
        let json = r#"{
            "type": "function",
            "name": "approve",
            "inputs": [
                {"name": "to", "type": "address"},
                {"name": "tokenId", "type": "uint256"}
            ],
            "outputs": [],
            "stateMutability": "payable"
        }"#;
        let entry: Entry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.kind(), EntryKind::Function);
        assert_eq!(entry, Entry::Function(approve()));

        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["type"], "function");
        assert_eq!(value["stateMutability"], "payable");
    }

    #[test]
    fn test_rejects_unknown_mutability_and_kind() {
        let bad_mutability =
            r#"{"type":"function","name":"f","inputs":[],"outputs":[],"stateMutability":"cheap"}"#;
        assert!(serde_json::from_str::<Entry>(bad_mutability).is_err());

        let bad_kind = r#"{"type":"receive","stateMutability":"payable"}"#;
        assert!(serde_json::from_str::<Entry>(bad_kind).is_err());
    }

    #[test]
    fn test_display() {
        let owner = Function {
            name: "owner".to_string(),
            inputs: vec![],
            outputs: vec![Param::new("", "address")],
            state_mutability: StateMutability::View,
        };
        assert_eq!(
            Entry::Function(owner).to_string(),
            "function owner() view returns (address)"
        );

        let error = CustomError {
            name: "MintZeroQuantity".to_string(),
            inputs: vec![],
        };
        assert_eq!(Entry::Error(error).to_string(), "error MintZeroQuantity()");
    }

    #[test]
    fn test_entry_kind_from_str() {
        assert_eq!("event".parse::<EntryKind>().unwrap(), EntryKind::Event);
        assert_eq!(" Function ".parse::<EntryKind>().unwrap(), EntryKind::Function);
        assert!("fallback".parse::<EntryKind>().is_err());
    }
}
