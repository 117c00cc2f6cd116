//! Registry behaviour over the public API

use efp_abi::domain::abi::{
    EntryKind, InterfaceDescriptor, InterfaceRegistry, RegistryError, ViolationKind,
};
use efp_abi::validate;

const TOKEN_ABI: &str = r#"[
    {
        "type": "function",
        "name": "approve",
        "inputs": [
            {"name": "to", "type": "address", "internalType": "address"},
            {"name": "tokenId", "type": "uint256", "internalType": "uint256"}
        ],
        "outputs": [],
        "stateMutability": "payable"
    },
    {
        "type": "function",
        "name": "safeTransferFrom",
        "inputs": [
            {"name": "from", "type": "address", "internalType": "address"},
            {"name": "to", "type": "address", "internalType": "address"},
            {"name": "tokenId", "type": "uint256", "internalType": "uint256"}
        ],
        "outputs": [],
        "stateMutability": "payable"
    },
    {
        "type": "function",
        "name": "safeTransferFrom",
        "inputs": [
            {"name": "from", "type": "address", "internalType": "address"},
            {"name": "to", "type": "address", "internalType": "address"},
            {"name": "tokenId", "type": "uint256", "internalType": "uint256"},
            {"name": "_data", "type": "bytes", "internalType": "bytes"}
        ],
        "outputs": [],
        "stateMutability": "payable"
    },
    {
        "type": "event",
        "name": "Transfer",
        "inputs": [
            {"name": "from", "type": "address", "indexed": true, "internalType": "address"},
            {"name": "to", "type": "address", "indexed": true, "internalType": "address"},
            {"name": "tokenId", "type": "uint256", "indexed": true, "internalType": "uint256"}
        ],
        "anonymous": false
    },
    {"type": "error", "name": "TransferToZeroAddress", "inputs": []}
]"#;

fn token() -> InterfaceDescriptor {
    InterfaceDescriptor::from_json(TOKEN_ABI).expect("token ABI parses")
}

#[test]
fn test_register_then_lookup_returns_equal_descriptor() {
    let descriptor = token();
    assert!(validate(&descriptor).is_empty());

    let mut registry = InterfaceRegistry::new();
    registry.register("Token", descriptor.clone()).unwrap();
    assert_eq!(registry.lookup("Token").unwrap(), &descriptor);
}

#[test]
fn test_second_registration_fails_and_first_survives() {
    let mut registry = InterfaceRegistry::new();
    registry.register("Token", token()).unwrap();

    let replacement = InterfaceDescriptor::from_json(
        r#"[{"type":"function","name":"burn","inputs":[],"outputs":[],"stateMutability":"nonpayable"}]"#,
    )
    .unwrap();
    let err = registry.register("Token", replacement).unwrap_err();
    assert!(matches!(err, RegistryError::DuplicateName(ref name) if name == "Token"));
    assert_eq!(err.to_string(), "contract `Token` is already registered");
    assert_eq!(registry.lookup("Token").unwrap(), &token());
}

#[test]
fn test_safe_transfer_from_overloads() {
    let mut registry = InterfaceRegistry::new();
    registry.register("Token", token()).unwrap();

    let four = registry
        .find_entry(
            "Token",
            EntryKind::Function,
            "safeTransferFrom",
            Some(&["address", "address", "uint256", "bytes"][..]),
        )
        .unwrap();
    assert_eq!(
        four.signature(),
        "safeTransferFrom(address,address,uint256,bytes)"
    );
    assert_eq!(four.as_function().unwrap().selector_hex(), "0xb88d4fde");

    let three = registry
        .find_function(
            "Token",
            "safeTransferFrom",
            Some(&["address", "address", "uint256"][..]),
        )
        .unwrap();
    assert_eq!(three.selector_hex(), "0x42842e0e");

    let err = registry
        .find_entry("Token", EntryKind::Function, "safeTransferFrom", None)
        .unwrap_err();
    match err {
        RegistryError::AmbiguousOverload {
            contract,
            kind,
            entry,
            candidates,
        } => {
            assert_eq!(contract, "Token");
            assert_eq!(kind, EntryKind::Function);
            assert_eq!(entry, "safeTransferFrom");
            assert_eq!(candidates.len(), 2);
        }
        other => panic!("expected AmbiguousOverload, got {other:?}"),
    }
}

#[test]
fn test_find_event_and_error() {
    let mut registry = InterfaceRegistry::new();
    registry.register("Token", token()).unwrap();

    let transfer = registry
        .find_entry("Token", EntryKind::Event, "Transfer", None)
        .unwrap();
    assert_eq!(transfer.as_event().unwrap().indexed_count(), 3);

    let error = registry
        .find_entry("Token", EntryKind::Error, "TransferToZeroAddress", Some(&[] as &[&str]))
        .unwrap();
    assert_eq!(error.signature(), "TransferToZeroAddress()");

    let missing = registry
        .find_entry("Token", EntryKind::Constructor, "", None)
        .unwrap_err();
    assert!(missing.is_not_found());
}

#[test]
fn test_tuple_without_components_is_one_violation() {
    let descriptor = InterfaceDescriptor::from_json(
        r#"[{
            "type": "function",
            "name": "setValues",
            "inputs": [{"name": "records", "type": "tuple[]", "internalType": "struct KeyValue[]"}],
            "outputs": [],
            "stateMutability": "nonpayable"
        }]"#,
    )
    .unwrap();

    let violations = validate(&descriptor);
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].kind, ViolationKind::EmptyTuple);

    let mut registry = InterfaceRegistry::new();
    let err = registry.register("Broken", descriptor).unwrap_err();
    assert!(matches!(err, RegistryError::MalformedDescriptor { ref violations, .. } if violations.len() == 1));
    assert!(err.to_string().contains("tuple has no components"));
    assert!(registry.is_empty());
}

#[test]
fn test_unknown_type_tag_rejected() {
    let mut registry = InterfaceRegistry::new();
    let err = registry
        .register_json(
            "Broken",
            r#"[{"type":"error","name":"Bad","inputs":[{"name":"x","type":"uint257"}]}]"#,
        )
        .unwrap_err();
    assert!(matches!(err, RegistryError::MalformedDescriptor { .. }));
}

#[test]
fn test_unrecognized_mutability_is_parse_error() {
    let mut registry = InterfaceRegistry::new();
    let err = registry
        .register_json(
            "Broken",
            r#"[{"type":"function","name":"f","inputs":[],"outputs":[],"stateMutability":"constant"}]"#,
        )
        .unwrap_err();
    assert!(matches!(err, RegistryError::Parse(_)));
    assert!(registry.is_empty());
}

#[test]
fn test_round_trip_into_fresh_registry() {
    let mut first = InterfaceRegistry::new();
    first.register("Token", token()).unwrap();

    let json = first.lookup("Token").unwrap().to_json().unwrap();

    let mut second = InterfaceRegistry::new();
    second.register_json("Token", &json).unwrap();
    assert_eq!(second.lookup("Token").unwrap(), first.lookup("Token").unwrap());

    // Serializing again yields the same document
    assert_eq!(second.lookup("Token").unwrap().to_json().unwrap(), json);
}

#[test]
fn test_registry_is_shareable_across_threads() {
    let mut registry = InterfaceRegistry::new();
    registry.register("Token", token()).unwrap();
    let registry = std::sync::Arc::new(registry);

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let registry = std::sync::Arc::clone(&registry);
            std::thread::spawn(move || {
                registry
                    .find_function("Token", "approve", None)
                    .map(|function| function.selector_hex())
                    .unwrap()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), "0x095ea7b3");
    }
}
