//! Calldata encoder for registry functions

use alloy_dyn_abi::{DynSolType, DynSolValue};
use alloy_primitives::{Address, B256, I256, U256};
use anyhow::{anyhow, bail, Context, Result};

use super::dyn_types::param_types;
use crate::domain::abi::Function;

/// Encodes calls from string arguments using the function's parameter types
pub struct AbiEncoder;

impl AbiEncoder {
    /// Selector followed by the ABI-encoded arguments
    pub fn encode_call(function: &Function, args: &[&str]) -> Result<Vec<u8>> {
        let types = param_types(&function.inputs)?;

        if args.len() != types.len() {
            bail!(
                "Argument count mismatch: expected {} arguments, got {}",
                types.len(),
                args.len()
            );
        }

        let mut calldata = function.selector().to_vec();
        if !types.is_empty() {
            let values = parse_arguments(&types, args)?;
            calldata.extend_from_slice(&DynSolValue::Tuple(values).abi_encode_params());
        }

        Ok(calldata)
    }
}

/// Parse each argument string against its parameter type
fn parse_arguments(types: &[DynSolType], args: &[&str]) -> Result<Vec<DynSolValue>> {
    types
        .iter()
        .zip(args.iter())
        .enumerate()
        .map(|(i, (ty, arg))| {
            parse_value(ty, arg).with_context(|| {
                format!("Failed to parse argument {} (type {})", i + 1, ty.sol_type_name())
            })
        })
        .collect()
}

fn parse_value(ty: &DynSolType, arg: &str) -> Result<DynSolValue> {
    let arg = arg.trim();
    match ty {
        DynSolType::Address => {
            let addr = arg.to_lowercase();
            let addr = addr.strip_prefix("0x").unwrap_or(&addr);

            if addr.len() != 40 || !addr.chars().all(|c| c.is_ascii_hexdigit()) {
                bail!("Invalid address: expected 40 hex characters");
            }

            let bytes = hex::decode(addr).context("Invalid hex")?;
            Ok(DynSolValue::Address(Address::from_slice(&bytes)))
        }

        DynSolType::Bool => {
            let value = match arg.to_lowercase().as_str() {
                "true" | "1" => true,
                "false" | "0" => false,
                _ => bail!("Invalid bool: expected true/false, got '{}'", arg),
            };
            Ok(DynSolValue::Bool(value))
        }

        DynSolType::Int(size) => {
            let value = match strip_hex_prefix(arg) {
                // Hex is the N-bit two's complement pattern, sign-extended to 256 bits
                Some(hex_str) => {
                    let bytes = parse_hex_to_bytes(hex_str, 32)?;
                    let mut array = [0u8; 32];
                    array.copy_from_slice(&bytes);
                    let raw = U256::from_be_bytes(array);
                    if raw.bit_len() > *size {
                        bail!("Value {} does not fit in int{}", arg, size);
                    }
                    let raw = if *size < 256 && raw.bit(*size - 1) {
                        raw | (U256::MAX << *size)
                    } else {
                        raw
                    };
                    I256::from_raw(raw)
                }
                None => arg
                    .parse::<I256>()
                    .map_err(|e| anyhow!("Invalid integer: {}", e))?,
            };
            let shift = 256 - *size;
            if value < I256::MIN.asr(shift) || value > I256::MAX.asr(shift) {
                bail!("Value {} does not fit in int{}", value, size);
            }
            Ok(DynSolValue::Int(value, *size))
        }

        DynSolType::Uint(size) => {
            let value = match strip_hex_prefix(arg) {
                Some(hex_str) => {
                    let bytes = parse_hex_to_bytes(hex_str, 32)?;
                    let mut array = [0u8; 32];
                    array.copy_from_slice(&bytes);
                    U256::from_be_bytes(array)
                }
                None => arg
                    .parse::<U256>()
                    .map_err(|e| anyhow!("Invalid unsigned integer: {}", e))?,
            };
            if value.bit_len() > *size {
                bail!("Value {} does not fit in uint{}", value, size);
            }
            Ok(DynSolValue::Uint(value, *size))
        }

        DynSolType::Bytes => {
            let hex_str = strip_hex_prefix(arg).unwrap_or(arg);
            let bytes = hex::decode(hex_str).context("Invalid hex")?;
            Ok(DynSolValue::Bytes(bytes))
        }

        DynSolType::FixedBytes(size) => {
            let hex_str = strip_hex_prefix(arg).unwrap_or(arg);
            let bytes = hex::decode(hex_str).context("Invalid hex")?;

            if bytes.len() != *size {
                bail!(
                    "Invalid bytes length: expected {} bytes, got {}",
                    size,
                    bytes.len()
                );
            }

            Ok(DynSolValue::FixedBytes(B256::right_padding_from(&bytes), *size))
        }

        DynSolType::String => {
            // Remove quotes if present
            let s = if arg.len() >= 2
                && ((arg.starts_with('"') && arg.ends_with('"'))
                    || (arg.starts_with('\'') && arg.ends_with('\'')))
            {
                &arg[1..arg.len() - 1]
            } else {
                arg
            };
            Ok(DynSolValue::String(s.to_string()))
        }

        DynSolType::Array(inner_ty) => {
            let elements = split_enclosed(arg, '[', ']')
                .context("Array must be enclosed in brackets: [val1,val2,...]")?;
            let values = elements
                .iter()
                .map(|elem| parse_value(inner_ty, elem))
                .collect::<Result<Vec<_>>>()?;
            Ok(DynSolValue::Array(values))
        }

        DynSolType::FixedArray(inner_ty, size) => {
            let elements = split_enclosed(arg, '[', ']')
                .context("Array must be enclosed in brackets: [val1,val2,...]")?;

            if elements.len() != *size {
                bail!(
                    "Fixed array size mismatch: expected {} elements, got {}",
                    size,
                    elements.len()
                );
            }

            let values = elements
                .iter()
                .map(|elem| parse_value(inner_ty, elem))
                .collect::<Result<Vec<_>>>()?;
            Ok(DynSolValue::FixedArray(values))
        }

        DynSolType::Tuple(types) => {
            let elements = split_enclosed(arg, '(', ')')
                .context("Tuple must be enclosed in parentheses: (val1,val2,...)")?;

            if elements.len() != types.len() {
                bail!(
                    "Tuple size mismatch: expected {} elements, got {}",
                    types.len(),
                    elements.len()
                );
            }

            let values = types
                .iter()
                .zip(elements.iter())
                .map(|(ty, elem)| parse_value(ty, elem))
                .collect::<Result<Vec<_>>>()?;
            Ok(DynSolValue::Tuple(values))
        }

        _ => bail!("Unsupported type: {}", ty.sol_type_name()),
    }
}

fn strip_hex_prefix(arg: &str) -> Option<&str> {
    arg.strip_prefix("0x").or_else(|| arg.strip_prefix("0X"))
}

/// Strip the enclosing delimiters and split on top-level commas
///
/// Commas inside nested brackets, parentheses or quotes do not split.
fn split_enclosed(arg: &str, open: char, close: char) -> Option<Vec<String>> {
    let inner = arg.strip_prefix(open)?.strip_suffix(close)?.trim();
    if inner.is_empty() {
        return Some(Vec::new());
    }

    let mut parts = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;

    for c in inner.chars() {
        match quote {
            Some(q) => {
                if c == q {
                    quote = None;
                }
                current.push(c);
            }
            None => match c {
                '"' | '\'' => {
                    quote = Some(c);
                    current.push(c);
                }
                '[' | '(' => {
                    depth += 1;
                    current.push(c);
                }
                ']' | ')' => {
                    depth = depth.checked_sub(1)?;
                    current.push(c);
                }
                ',' if depth == 0 => {
                    parts.push(current.trim().to_string());
                    current.clear();
                }
                _ => current.push(c),
            },
        }
    }

    if depth != 0 || quote.is_some() {
        return None;
    }
    parts.push(current.trim().to_string());
    Some(parts)
}

/// Parse hex string to bytes with padding
fn parse_hex_to_bytes(hex_str: &str, expected_size: usize) -> Result<Vec<u8>> {
    // Odd-length hex like 0x3e8 is accepted for integers
    let padded_hex = if hex_str.len() % 2 == 1 {
        format!("0{}", hex_str)
    } else {
        hex_str.to_string()
    };
    let bytes = hex::decode(&padded_hex).context("Invalid hex")?;

    if bytes.len() > expected_size {
        bail!(
            "Hex value too large: expected max {} bytes, got {}",
            expected_size,
            bytes.len()
        );
    }

    // Pad with zeros on the left
    let mut padded = vec![0u8; expected_size];
    padded[expected_size - bytes.len()..].copy_from_slice(&bytes);

    Ok(padded)
}
