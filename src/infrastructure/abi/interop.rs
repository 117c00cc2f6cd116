//! Conversion into alloy-json-abi types for existing contract tooling

use alloy_json_abi::JsonAbi;
use anyhow::{Context, Result};

use crate::domain::abi::InterfaceDescriptor;

/// Convert a descriptor into an alloy [`JsonAbi`]
pub fn to_json_abi(descriptor: &InterfaceDescriptor) -> Result<JsonAbi> {
    let value = serde_json::to_value(descriptor).context("Failed to serialize descriptor")?;
    serde_json::from_value(value).context("Failed to convert descriptor to JsonAbi")
}
