//! Parameter type grammar
//!
//! A type tag is a base type optionally followed by array suffixes, e.g.
//! `uint256`, `bytes[]`, `tuple[2][]`. Only canonical spellings are
//! accepted: `uint`, `int` and `byte` aliases are rejected.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Errors produced while parsing a type tag
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeTagError {
    #[error("unknown type `{0}`")]
    Unknown(String),
    #[error("invalid bit or byte width in `{0}`")]
    InvalidWidth(String),
    #[error("malformed array suffix in `{0}`")]
    MalformedArray(String),
    #[error("tuple type without components")]
    EmptyTuple,
}

/// Base of a type tag, before any array suffix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseType {
    Address,
    Bool,
    String,
    Bytes,
    FixedBytes(usize),
    Uint(usize),
    Int(usize),
    Tuple,
}

impl BaseType {
    fn parse(raw: &str, full: &str) -> Result<Self, TypeTagError> {
        match raw {
            "address" => return Ok(Self::Address),
            "bool" => return Ok(Self::Bool),
            "string" => return Ok(Self::String),
            "bytes" => return Ok(Self::Bytes),
            "tuple" => return Ok(Self::Tuple),
            _ => {}
        }

        if let Some(width) = raw.strip_prefix("uint") {
            return parse_bits(width, full).map(Self::Uint);
        }
        if let Some(width) = raw.strip_prefix("int") {
            return parse_bits(width, full).map(Self::Int);
        }
        if let Some(width) = raw.strip_prefix("bytes") {
            let size = parse_width(width, full)?;
            if !(1..=32).contains(&size) {
                return Err(TypeTagError::InvalidWidth(full.to_string()));
            }
            return Ok(Self::FixedBytes(size));
        }

        Err(TypeTagError::Unknown(full.to_string()))
    }

    /// The resolved type for a non-tuple base
    pub fn elementary(self) -> Option<ParamType> {
        match self {
            Self::Address => Some(ParamType::Address),
            Self::Bool => Some(ParamType::Bool),
            Self::String => Some(ParamType::String),
            Self::Bytes => Some(ParamType::Bytes),
            Self::FixedBytes(size) => Some(ParamType::FixedBytes(size)),
            Self::Uint(bits) => Some(ParamType::Uint(bits)),
            Self::Int(bits) => Some(ParamType::Int(bits)),
            Self::Tuple => None,
        }
    }
}

impl fmt::Display for BaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Address => f.write_str("address"),
            Self::Bool => f.write_str("bool"),
            Self::String => f.write_str("string"),
            Self::Bytes => f.write_str("bytes"),
            Self::FixedBytes(size) => write!(f, "bytes{size}"),
            Self::Uint(bits) => write!(f, "uint{bits}"),
            Self::Int(bits) => write!(f, "int{bits}"),
            Self::Tuple => f.write_str("tuple"),
        }
    }
}

fn parse_width(digits: &str, full: &str) -> Result<usize, TypeTagError> {
    // Bare `uint`/`int` aliases and anything non-numeric land here
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TypeTagError::Unknown(full.to_string()));
    }
    // Leading zeros are not canonical (`uint0256`)
    if digits.starts_with('0') {
        return Err(TypeTagError::InvalidWidth(full.to_string()));
    }
    digits
        .parse()
        .map_err(|_| TypeTagError::InvalidWidth(full.to_string()))
}

fn parse_bits(digits: &str, full: &str) -> Result<usize, TypeTagError> {
    let bits = parse_width(digits, full)?;
    if bits == 0 || bits > 256 || bits % 8 != 0 {
        return Err(TypeTagError::InvalidWidth(full.to_string()));
    }
    Ok(bits)
}

/// One array dimension: `[]` or `[k]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArrayDim {
    Dynamic,
    Fixed(usize),
}

impl fmt::Display for ArrayDim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dynamic => f.write_str("[]"),
            Self::Fixed(len) => write!(f, "[{len}]"),
        }
    }
}

/// A parsed type tag as it appears in the `type` field of a parameter
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeTag {
    pub base: BaseType,
    /// Array dimensions, innermost first
    pub dims: Vec<ArrayDim>,
}

impl TypeTag {
    pub fn is_tuple(&self) -> bool {
        self.base == BaseType::Tuple
    }

    /// Wrap an element type in this tag's array dimensions
    pub fn wrap(&self, element: ParamType) -> ParamType {
        self.dims.iter().fold(element, |inner, dim| match dim {
            ArrayDim::Dynamic => ParamType::Array(Box::new(inner)),
            ArrayDim::Fixed(len) => ParamType::FixedArray(Box::new(inner), *len),
        })
    }

    /// Array suffix as written after the base, e.g. `[2][]`
    pub fn suffix(&self) -> String {
        self.dims.iter().map(ToString::to_string).collect()
    }
}

impl FromStr for TypeTag {
    type Err = TypeTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (base, mut rest) = match s.find('[') {
            Some(pos) => (&s[..pos], &s[pos..]),
            None => (s, ""),
        };

        let base = BaseType::parse(base, s)?;

        let mut dims = Vec::new();
        while !rest.is_empty() {
            let body = rest
                .strip_prefix('[')
                .ok_or_else(|| TypeTagError::MalformedArray(s.to_string()))?;
            let close = body
                .find(']')
                .ok_or_else(|| TypeTagError::MalformedArray(s.to_string()))?;
            let len = &body[..close];
            if len.is_empty() {
                dims.push(ArrayDim::Dynamic);
            } else {
                match len.parse::<usize>() {
                    Ok(n) if n > 0 && !len.starts_with('0') => dims.push(ArrayDim::Fixed(n)),
                    _ => return Err(TypeTagError::MalformedArray(s.to_string())),
                }
            }
            rest = &body[close + 1..];
        }

        Ok(Self { base, dims })
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.base, self.suffix())
    }
}

/// A fully resolved parameter type, with tuple components expanded
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParamType {
    Address,
    Bool,
    String,
    Bytes,
    FixedBytes(usize),
    Uint(usize),
    Int(usize),
    Array(Box<ParamType>),
    FixedArray(Box<ParamType>, usize),
    Tuple(Vec<ParamType>),
}

impl ParamType {
    /// Types that occupy exactly one 32-byte word and are stored verbatim
    /// in an event topic when indexed
    pub fn is_value_type(&self) -> bool {
        matches!(
            self,
            Self::Address | Self::Bool | Self::FixedBytes(_) | Self::Uint(_) | Self::Int(_)
        )
    }

    pub fn is_dynamic(&self) -> bool {
        match self {
            Self::String | Self::Bytes | Self::Array(_) => true,
            Self::FixedArray(inner, _) => inner.is_dynamic(),
            Self::Tuple(items) => items.iter().any(Self::is_dynamic),
            _ => false,
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Address => f.write_str("address"),
            Self::Bool => f.write_str("bool"),
            Self::String => f.write_str("string"),
            Self::Bytes => f.write_str("bytes"),
            Self::FixedBytes(size) => write!(f, "bytes{size}"),
            Self::Uint(bits) => write!(f, "uint{bits}"),
            Self::Int(bits) => write!(f, "int{bits}"),
            Self::Array(inner) => write!(f, "{inner}[]"),
            Self::FixedArray(inner, len) => write!(f, "{inner}[{len}]"),
            Self::Tuple(items) => {
                f.write_str("(")?;
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str(")")
            }
        }
    }
}
