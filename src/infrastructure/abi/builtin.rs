//! Built-in Ethereum Follow Protocol interfaces, embedded at compile time

use crate::domain::abi::{InterfaceRegistry, RegistryError};

/// (contract name, JSON ABI) for every built-in interface
pub const BUILTIN_ABIS: [(&str, &str); 8] = [
    (
        "EFPAccountMetadata",
        include_str!("../../../abis/EFPAccountMetadata.json"),
    ),
    (
        "EFPListMinter",
        include_str!("../../../abis/EFPListMinter.json"),
    ),
    (
        "EFPListRecords",
        include_str!("../../../abis/EFPListRecords.json"),
    ),
    (
        "EFPListRegistry",
        include_str!("../../../abis/EFPListRegistry.json"),
    ),
    (
        "IEFPListRegistry_ERC721",
        include_str!("../../../abis/IEFPListRegistry_ERC721.json"),
    ),
    ("ListManager", include_str!("../../../abis/ListManager.json")),
    ("ListMetadata", include_str!("../../../abis/ListMetadata.json")),
    ("ListRecords", include_str!("../../../abis/ListRecords.json")),
];

/// Register every built-in interface
pub fn register_builtin(registry: &mut InterfaceRegistry) -> Result<(), RegistryError> {
    for (name, json) in BUILTIN_ABIS {
        registry.register_json(name, json)?;
    }
    tracing::debug!(count = BUILTIN_ABIS.len(), "registered built-in interfaces");
    Ok(())
}

/// A registry holding only the built-in interfaces
pub fn builtin_registry() -> Result<InterfaceRegistry, RegistryError> {
    let mut registry = InterfaceRegistry::new();
    register_builtin(&mut registry)?;
    Ok(registry)
}
