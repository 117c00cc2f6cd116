//! Domain layer - contract interface types and the registry

pub mod abi;
