//! ABI decoder trait and types

use alloy_primitives::B256;
use serde::{Deserialize, Serialize};

use super::entry::{Event, Function};

/// A decoded argument or return value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedArg {
    /// Parameter name (or "arg{n}" if unnamed)
    pub name: String,
    /// Canonical type (e.g., "address", "uint256", "(string,bytes)[]")
    pub kind: String,
    /// Decoded value as a formatted string
    pub value: String,
}

/// Result of decoding a function call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedCall {
    /// Contract the function was resolved from, when known
    pub contract: Option<String>,
    /// Function name
    pub function_name: String,
    /// Full function signature (e.g., "transfer(address,uint256)")
    pub signature: String,
    /// Decoded arguments
    pub arguments: Vec<DecodedArg>,
}

/// A decoded event parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedLogArg {
    pub indexed: bool,
    #[serde(flatten)]
    pub arg: DecodedArg,
}

/// Result of decoding an event log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedLog {
    pub event_name: String,
    pub signature: String,
    /// Parameters in declaration order
    pub arguments: Vec<DecodedLogArg>,
}

/// Trait for ABI decoding implementations
///
/// This trait abstracts over the actual ABI decoding implementation,
/// allowing us to swap out alloy-dyn-abi for a different library if needed.
pub trait AbiDecoder: Send + Sync {
    /// Decode calldata (including the 4-byte selector) for a function
    fn decode_calldata(&self, function: &Function, data: &[u8]) -> anyhow::Result<DecodedCall>;

    /// Decode the return data of a function
    fn decode_output(&self, function: &Function, data: &[u8]) -> anyhow::Result<Vec<DecodedArg>>;

    /// Decode a log given its topics (topic 0 first unless anonymous) and data
    fn decode_log(&self, event: &Event, topics: &[B256], data: &[u8])
        -> anyhow::Result<DecodedLog>;

    /// Decode calldata by looking up the selector
    ///
    /// # Returns
    /// * `Ok(Some(DecodedCall))` - If the selector was found and decoding succeeded
    /// * `Ok(None)` - If the selector was not found
    /// * `Err(...)` - If decoding fails
    fn decode_by_selector(&self, data: &[u8]) -> anyhow::Result<Option<DecodedCall>>;
}
