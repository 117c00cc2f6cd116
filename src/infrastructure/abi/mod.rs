//! ABI infrastructure - alloy-based codec, built-in interfaces and file scanning

mod builtin;
mod decoder;
mod dyn_types;
mod encoder;
mod interop;
mod scanner;

pub use builtin::{builtin_registry, register_builtin, BUILTIN_ABIS};
pub use decoder::AlloyAbiDecoder;
pub use dyn_types::{format_dyn_sol_value, to_dyn_sol_type};
pub use encoder::AbiEncoder;
pub use interop::to_json_abi;
pub use scanner::{AbiScanner, ScanReport};
