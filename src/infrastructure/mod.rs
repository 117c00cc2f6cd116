//! Infrastructure layer - External library integrations
//!
//! This layer contains:
//! - ABI encoding and decoding using alloy-dyn-abi
//! - Conversion to alloy-json-abi
//! - The embedded EFP interfaces and the ABI file scanner

pub mod abi;

pub use abi::{builtin_registry, AbiScanner};
