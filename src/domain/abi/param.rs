//! Function, error and event parameters

use serde::{Deserialize, Serialize};

use super::types::{ParamType, TypeTag, TypeTagError};

/// A parameter of a function, constructor or error, or a tuple component
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Param {
    /// Parameter name (may be empty, e.g. for unnamed outputs)
    #[serde(default)]
    pub name: String,
    /// Type tag (e.g., "address", "uint256", "tuple[]")
    #[serde(rename = "type")]
    pub ty: String,
    /// Tuple components, only present when `ty` is a tuple
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<Param>,
    /// Solidity-level type (e.g., "struct IEFPAccountMetadata.KeyValue[]")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internal_type: Option<String>,
}

impl Param {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            components: Vec::new(),
            internal_type: None,
        }
    }

    /// Build a tuple parameter from its components
    pub fn tuple(name: impl Into<String>, ty: impl Into<String>, components: Vec<Param>) -> Self {
        Self {
            components,
            ..Self::new(name, ty)
        }
    }

    pub fn with_internal_type(mut self, internal_type: impl Into<String>) -> Self {
        self.internal_type = Some(internal_type.into());
        self
    }

    /// Canonical type with tuples expanded, e.g. "(string,bytes)[]"
    pub fn canonical_type(&self) -> String {
        canonical_type(&self.ty, &self.components)
    }

    pub fn resolve(&self) -> Result<ParamType, TypeTagError> {
        resolve(&self.ty, &self.components)
    }
}

/// An event parameter, which additionally records whether it is indexed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventParam {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    pub indexed: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<Param>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internal_type: Option<String>,
}

impl EventParam {
    pub fn new(name: impl Into<String>, ty: impl Into<String>, indexed: bool) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            indexed,
            components: Vec::new(),
            internal_type: None,
        }
    }

    pub fn canonical_type(&self) -> String {
        canonical_type(&self.ty, &self.components)
    }

    pub fn resolve(&self) -> Result<ParamType, TypeTagError> {
        resolve(&self.ty, &self.components)
    }
}

fn canonical_type(ty: &str, components: &[Param]) -> String {
    match ty.strip_prefix("tuple") {
        Some(suffix) => {
            let inner: Vec<String> = components.iter().map(Param::canonical_type).collect();
            format!("({}){}", inner.join(","), suffix)
        }
        None => ty.to_string(),
    }
}

fn resolve(ty: &str, components: &[Param]) -> Result<ParamType, TypeTagError> {
    let tag: TypeTag = ty.parse()?;
    let element = match tag.base.elementary() {
        Some(element) => element,
        None => {
            if components.is_empty() {
                return Err(TypeTagError::EmptyTuple);
            }
            let items = components
                .iter()
                .map(Param::resolve)
                .collect::<Result<Vec<_>, _>>()?;
            ParamType::Tuple(items)
        }
    };
    Ok(tag.wrap(element))
}

/// Canonical type list, e.g. "address,(string,bytes)[]"
pub(crate) fn joined_types(types: impl Iterator<Item = String>) -> String {
    types.collect::<Vec<_>>().join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key_value_records() -> Param {
        Param::tuple(
            "records",
            "tuple[]",
            vec![Param::new("key", "string"), Param::new("value", "bytes")],
        )
        .with_internal_type("struct IEFPAccountMetadata.KeyValue[]")
    }

    #[test]
    fn test_canonical_type_expands_tuples() {
        assert_eq!(Param::new("addr", "address").canonical_type(), "address");
        assert_eq!(key_value_records().canonical_type(), "(string,bytes)[]");
    }

    #[test]
    fn test_resolve_nested_tuple() {
        let resolved = key_value_records().resolve().unwrap();
        assert_eq!(
            resolved,
            ParamType::Array(Box::new(ParamType::Tuple(vec![
                ParamType::String,
                ParamType::Bytes
            ])))
        );
    }

    #[test]
    fn test_resolve_empty_tuple_fails() {
        let param = Param::new("empty", "tuple");
        assert_eq!(param.resolve(), Err(TypeTagError::EmptyTuple));
    }

    #[test]
    fn test_event_param_requires_indexed() {
        let missing = r#"{"name":"proxy","type":"address"}"#;
        assert!(serde_json::from_str::<EventParam>(missing).is_err());

        let not_bool = r#"{"name":"proxy","type":"address","indexed":"yes"}"#;
        assert!(serde_json::from_str::<EventParam>(not_bool).is_err());

        let ok = r#"{"name":"proxy","type":"address","indexed":true}"#;
        let param: EventParam = serde_json::from_str(ok).unwrap();
        assert!(param.indexed);
    }

    #[test]
    fn test_serialize_omits_empty_fields() {
        let json = serde_json::to_value(Param::new("", "bool")).unwrap();
        assert_eq!(json, serde_json::json!({"name": "", "type": "bool"}));

        let json = serde_json::to_value(key_value_records()).unwrap();
        assert_eq!(json["internalType"], "struct IEFPAccountMetadata.KeyValue[]");
        assert_eq!(json["components"][1]["type"], "bytes");
    }
}
