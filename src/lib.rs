//! Typed interface registry for the Ethereum Follow Protocol contracts
//!
//! The registry holds validated contract ABIs (functions, events, errors and
//! constructors) by contract name and resolves entries, including overloads,
//! for encoders and decoders.
//!
//! ```no_run
//! use efp_abi::{builtin_registry, EntryKind};
//!
//! let registry = builtin_registry()?;
//! let entry = registry.find_entry(
//!     "EFPListRegistry",
//!     EntryKind::Function,
//!     "safeTransferFrom",
//!     Some(&["address", "address", "uint256", "bytes"][..]),
//! )?;
//! println!("{entry}");
//! # Ok::<(), efp_abi::RegistryError>(())
//! ```

pub mod config;
pub mod domain;
pub mod infrastructure;

pub use domain::abi::{
    validate, AbiDecoder, Entry, EntryKind, InterfaceDescriptor, InterfaceRegistry, RegistryError,
    Violation,
};
pub use infrastructure::abi::{
    builtin_registry, register_builtin, to_json_abi, AbiEncoder, AbiScanner, AlloyAbiDecoder,
    ScanReport,
};
