//! ABI decoder implementation using alloy-dyn-abi

use alloy_dyn_abi::{DynSolType, DynSolValue};
use alloy_primitives::B256;
use anyhow::{bail, ensure, Context, Result};

use super::dyn_types::{display_name, event_param_type, format_dyn_sol_value, param_types, to_dyn_sol_type};
use crate::domain::abi::{
    AbiDecoder, DecodedArg, DecodedCall, DecodedLog, DecodedLogArg, Event, Function,
    InterfaceRegistry, Param, ParamType,
};

/// ABI decoder backed by a shared registry
pub struct AlloyAbiDecoder<'a> {
    registry: &'a InterfaceRegistry,
}

impl<'a> AlloyAbiDecoder<'a> {
    /// Create a new decoder over the given registry
    pub fn new(registry: &'a InterfaceRegistry) -> Self {
        Self { registry }
    }

    /// Get the underlying registry
    pub fn registry(&self) -> &InterfaceRegistry {
        self.registry
    }
}

/// Reject topic words that are not a clean encoding of `ty`
fn check_topic_word(ty: &ParamType, topic: &B256) -> Result<()> {
    let word = topic.as_slice();
    let clean = match ty {
        ParamType::Address => word[..12].iter().all(|b| *b == 0),
        ParamType::Bool => word[..31].iter().all(|b| *b == 0) && word[31] <= 1,
        ParamType::Uint(bits) => word[..32 - bits / 8].iter().all(|b| *b == 0),
        ParamType::Int(bits) => {
            // High bytes repeat the sign bit
            let pad = 32 - bits / 8;
            let fill = if word[pad] & 0x80 != 0 { 0xff } else { 0x00 };
            word[..pad].iter().all(|b| *b == fill)
        }
        ParamType::FixedBytes(size) => word[*size..].iter().all(|b| *b == 0),
        _ => true,
    };
    ensure!(clean, "topic {} is not a valid {}", topic, ty);
    Ok(())
}

/// Decode an ABI parameter sequence and pair values with their parameters
fn decode_params(params: &[Param], data: &[u8]) -> Result<Vec<DecodedArg>> {
    let types = param_types(params)?;
    let values = if types.is_empty() {
        Vec::new()
    } else {
        match DynSolType::Tuple(types).abi_decode_params(data)? {
            DynSolValue::Tuple(values) => values,
            other => vec![other],
        }
    };

    Ok(params
        .iter()
        .zip(values.iter())
        .enumerate()
        .map(|(idx, (param, value))| DecodedArg {
            name: display_name(&param.name, idx),
            kind: param.canonical_type(),
            value: format_dyn_sol_value(value),
        })
        .collect())
}

impl AbiDecoder for AlloyAbiDecoder<'_> {
    fn decode_calldata(&self, function: &Function, data: &[u8]) -> Result<DecodedCall> {
        if data.len() < 4 {
            bail!("calldata too short (need at least 4 bytes for selector)");
        }

        // Verify selector matches
        let expected = function.selector();
        if data[..4] != expected {
            bail!(
                "selector mismatch: got 0x{}, expected 0x{}",
                hex::encode(&data[..4]),
                hex::encode(expected)
            );
        }

        let arguments =
            decode_params(&function.inputs, &data[4..]).context("Failed to decode calldata")?;

        Ok(DecodedCall {
            contract: None,
            function_name: function.name.clone(),
            signature: function.signature(),
            arguments,
        })
    }

    fn decode_output(&self, function: &Function, data: &[u8]) -> Result<Vec<DecodedArg>> {
        decode_params(&function.outputs, data)
            .with_context(|| format!("Failed to decode return data of {}", function.signature()))
    }

    fn decode_log(&self, event: &Event, topics: &[B256], data: &[u8]) -> Result<DecodedLog> {
        let mut topics = topics.iter();
        if !event.anonymous {
            let topic0 = topics.next().context("log has no topics")?;
            ensure!(
                *topic0 == event.topic(),
                "topic mismatch: got {}, expected {}",
                topic0,
                event.topic()
            );
        }

        let mut body_types = Vec::new();
        let mut slots = Vec::with_capacity(event.inputs.len());
        for param in &event.inputs {
            let ty = event_param_type(param)?;
            if param.indexed {
                let topic = topics
                    .next()
                    .with_context(|| format!("missing topic for indexed param '{}'", param.name))?;
                // Reference types are stored as the keccak256 of their encoding
                let value = if ty.is_value_type() {
                    check_topic_word(&ty, topic)
                        .with_context(|| format!("Failed to decode topic for '{}'", param.name))?;
                    to_dyn_sol_type(&ty)
                        .abi_decode(topic.as_slice())
                        .with_context(|| format!("Failed to decode topic for '{}'", param.name))?
                } else {
                    DynSolValue::FixedBytes(*topic, 32)
                };
                slots.push(Some(value));
            } else {
                body_types.push(to_dyn_sol_type(&ty));
                slots.push(None);
            }
        }
        ensure!(topics.next().is_none(), "log has more topics than indexed params");

        let body_values = if body_types.is_empty() {
            Vec::new()
        } else {
            match DynSolType::Tuple(body_types)
                .abi_decode_params(data)
                .context("Failed to decode log data")?
            {
                DynSolValue::Tuple(values) => values,
                other => vec![other],
            }
        };
        let mut body = body_values.into_iter();

        let mut arguments = Vec::with_capacity(event.inputs.len());
        for (idx, (param, slot)) in event.inputs.iter().zip(slots).enumerate() {
            let value = match slot {
                Some(value) => value,
                None => body.next().context("log data has too few values")?,
            };
            arguments.push(DecodedLogArg {
                indexed: param.indexed,
                arg: DecodedArg {
                    name: display_name(&param.name, idx),
                    kind: param.canonical_type(),
                    value: format_dyn_sol_value(&value),
                },
            });
        }

        Ok(DecodedLog {
            event_name: event.name.clone(),
            signature: event.signature(),
            arguments,
        })
    }

    fn decode_by_selector(&self, data: &[u8]) -> Result<Option<DecodedCall>> {
        if data.len() < 4 {
            bail!("calldata too short (need at least 4 bytes for selector)");
        }
        let selector: [u8; 4] = [data[0], data[1], data[2], data[3]];

        // First contract in name order wins when several share a selector
        match self.registry.functions_by_selector(selector).first() {
            Some((contract, function)) => {
                let mut decoded = self.decode_calldata(function, data)?;
                decoded.contract = Some(contract.to_string());
                Ok(Some(decoded))
            }
            None => Ok(None),
        }
    }
}
