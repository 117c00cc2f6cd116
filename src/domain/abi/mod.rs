//! ABI domain models and contracts
//!
//! This module defines the typed contract interfaces, their validation and
//! the registry that owns them, independent of the encoding library
//! (alloy-dyn-abi) used by the infrastructure layer.

mod decoder;
mod descriptor;
mod entry;
mod error;
mod param;
mod registry;
mod types;
mod validate;

pub use decoder::{AbiDecoder, DecodedArg, DecodedCall, DecodedLog, DecodedLogArg};
pub use descriptor::InterfaceDescriptor;
pub use entry::{
    compute_selector, Constructor, CustomError, Entry, EntryKind, Event, Function,
    StateMutability,
};
pub use error::RegistryError;
pub use param::{EventParam, Param};
pub use registry::{parse_selector, InterfaceRegistry};
pub use types::{ArrayDim, BaseType, ParamType, TypeTag, TypeTagError};
pub use validate::{validate, Violation, ViolationKind};
