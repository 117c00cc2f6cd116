//! Bridge from registry parameter types to alloy-dyn-abi types

use alloy_dyn_abi::{DynSolType, DynSolValue};
use anyhow::{Context, Result};

use crate::domain::abi::{EventParam, Param, ParamType};

/// Convert a resolved parameter type to its dynamic Solidity type
pub fn to_dyn_sol_type(ty: &ParamType) -> DynSolType {
    match ty {
        ParamType::Address => DynSolType::Address,
        ParamType::Bool => DynSolType::Bool,
        ParamType::String => DynSolType::String,
        ParamType::Bytes => DynSolType::Bytes,
        ParamType::FixedBytes(size) => DynSolType::FixedBytes(*size),
        ParamType::Uint(bits) => DynSolType::Uint(*bits),
        ParamType::Int(bits) => DynSolType::Int(*bits),
        ParamType::Array(inner) => DynSolType::Array(Box::new(to_dyn_sol_type(inner))),
        ParamType::FixedArray(inner, len) => {
            DynSolType::FixedArray(Box::new(to_dyn_sol_type(inner)), *len)
        }
        ParamType::Tuple(items) => DynSolType::Tuple(items.iter().map(to_dyn_sol_type).collect()),
    }
}

/// Resolve a parameter list into dynamic types
pub fn param_types(params: &[Param]) -> Result<Vec<DynSolType>> {
    params
        .iter()
        .map(|param| {
            param
                .resolve()
                .map(|ty| to_dyn_sol_type(&ty))
                .with_context(|| format!("Failed to parse type '{}' for param '{}'", param.ty, param.name))
        })
        .collect()
}

pub fn event_param_type(param: &EventParam) -> Result<ParamType> {
    param
        .resolve()
        .with_context(|| format!("Failed to parse type '{}' for param '{}'", param.ty, param.name))
}

/// Display name for a parameter, falling back to its position
pub fn display_name(name: &str, idx: usize) -> String {
    if name.trim().is_empty() {
        format!("arg{}", idx)
    } else {
        name.to_string()
    }
}

/// Format a DynSolValue without loss
///
/// The output parses back through the calldata encoder.
pub fn format_dyn_sol_value(value: &DynSolValue) -> String {
    match value {
        DynSolValue::Bool(b) => b.to_string(),
        DynSolValue::Int(i, _) => i.to_string(),
        DynSolValue::Uint(u, _) => u.to_string(),
        DynSolValue::FixedBytes(word, size) => {
            let bytes = &word.as_slice()[..(*size).min(32)];
            format!("0x{}", hex::encode(bytes))
        }
        DynSolValue::Address(addr) => addr.to_checksum(None),
        DynSolValue::Function(func) => format!("0x{}", hex::encode(func.as_slice())),
        DynSolValue::Bytes(bytes) => format!("0x{}", hex::encode(bytes)),
        DynSolValue::String(s) => format!("\"{}\"", s),
        DynSolValue::Array(items) | DynSolValue::FixedArray(items) => {
            let items: Vec<String> = items.iter().map(format_dyn_sol_value).collect();
            format!("[{}]", items.join(", "))
        }
        DynSolValue::Tuple(fields) => {
            let items: Vec<String> = fields.iter().map(format_dyn_sol_value).collect();
            format!("({})", items.join(", "))
        }
        #[allow(unreachable_patterns)]
        other => format!("{:?}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::U256;

    #[test]
    fn test_to_dyn_sol_type_matches_parser() {
        let records = Param::tuple(
            "records",
            "tuple[]",
            vec![Param::new("key", "string"), Param::new("value", "bytes")],
        );
        let ty = to_dyn_sol_type(&records.resolve().unwrap());
        assert_eq!(ty, DynSolType::parse("(string,bytes)[]").unwrap());
        assert_eq!(ty.sol_type_name(), "(string,bytes)[]");
    }

    #[test]
    fn test_param_types_reports_bad_type() {
        let err = param_types(&[Param::new("x", "uint")]).unwrap_err();
        assert!(err.to_string().contains("'uint'"));
    }

    #[test]
    fn test_format_long_values_in_full() {
        let location = vec![0xab; 86];
        assert_eq!(
            format_dyn_sol_value(&DynSolValue::Bytes(location.clone())),
            format!("0x{}", hex::encode(&location))
        );

        let key = "k".repeat(100);
        assert_eq!(
            format_dyn_sol_value(&DynSolValue::String(key.clone())),
            format!("\"{key}\"")
        );

        assert_eq!(
            format_dyn_sol_value(&DynSolValue::Uint(U256::MAX, 256)),
            U256::MAX.to_string()
        );

        let items = vec![DynSolValue::Uint(U256::from(1u64), 8); 12];
        let formatted = format_dyn_sol_value(&DynSolValue::Array(items));
        assert_eq!(formatted.matches('1').count(), 12);
    }

    #[test]
    fn test_format_values() {
        assert_eq!(format_dyn_sol_value(&DynSolValue::Bool(true)), "true");
        assert_eq!(
            format_dyn_sol_value(&DynSolValue::Uint(U256::from(1000u64), 256)),
            "1000"
        );
        assert_eq!(
            format_dyn_sol_value(&DynSolValue::Bytes(vec![0xde, 0xad])),
            "0xdead"
        );
        assert_eq!(
            format_dyn_sol_value(&DynSolValue::Tuple(vec![
                DynSolValue::String("k".into()),
                DynSolValue::Bytes(vec![1]),
            ])),
            "(\"k\", 0x01)"
        );
        assert_eq!(display_name("", 2), "arg2");
        assert_eq!(display_name("owner", 2), "owner");
    }
}
