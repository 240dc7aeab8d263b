//! Value types shared by the descriptor tree, the extraction walk and the
//! validation engine.

use std::collections::BTreeMap;
use std::fmt;

/// A constant written directly into a descriptor tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    String(String),
    Integer(i64),
    /// Finite; `From<f64>` refuses NaN and infinities.
    Float(f64),
    Bool(bool),
}

impl Literal {
    /// The JSON form this literal takes in a loaded configuration.
    ///
    /// A `Float` built by hand from NaN or an infinity has no JSON form and
    /// becomes `null`.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Literal::String(s) => serde_json::Value::String(s.clone()),
            Literal::Integer(i) => serde_json::Value::from(*i),
            Literal::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Literal::Bool(b) => serde_json::Value::Bool(*b),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::String(s) => write!(f, "{s:?}"),
            Literal::Integer(i) => write!(f, "{i}"),
            Literal::Float(x) => write!(f, "{x}"),
            Literal::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Literal::String(value.to_string())
    }
}

impl From<String> for Literal {
    fn from(value: String) -> Self {
        Literal::String(value)
    }
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Literal::Integer(value)
    }
}

impl From<i32> for Literal {
    fn from(value: i32) -> Self {
        Literal::Integer(value.into())
    }
}

impl From<u16> for Literal {
    fn from(value: u16) -> Self {
        Literal::Integer(value.into())
    }
}

impl From<u32> for Literal {
    fn from(value: u32) -> Self {
        Literal::Integer(value.into())
    }
}

/// # Panics
///
/// Panics if `value` is NaN or infinite: such a literal has no JSON form and
/// could never load as itself.
impl From<f64> for Literal {
    fn from(value: f64) -> Self {
        assert!(
            value.is_finite(),
            "envtree: float literal must be finite, got {value}"
        );
        Literal::Float(value)
    }
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Literal::Bool(value)
    }
}

/// A raw, unvalidated value sitting at one position of a raw data tree.
///
/// Store lookups only ever produce [`Raw::String`] or [`Raw::Missing`]; the
/// other variants come from literals and containers in the descriptor tree,
/// or from callers driving the validation engine directly.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Raw {
    /// The key is not present in the store. Distinct from an empty string.
    #[default]
    Missing,
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Sequence(Vec<Raw>),
    Mapping(BTreeMap<String, Raw>),
}

impl Raw {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Raw::String(s) => Some(s),
            _ => None,
        }
    }

    /// `Missing` and `Null` both count as "no value" for `nullable`/`default`.
    pub fn is_absent(&self) -> bool {
        matches!(self, Raw::Missing | Raw::Null)
    }

    /// Short description used in failure messages: `Expected string, got {..}`.
    pub fn describe(&self) -> String {
        match self {
            Raw::Missing => "missing".into(),
            Raw::Null => "null".into(),
            Raw::Bool(b) => b.to_string(),
            Raw::Integer(i) => i.to_string(),
            Raw::Float(f) => f.to_string(),
            Raw::String(s) => format!("{s:?}"),
            Raw::Sequence(_) => "array".into(),
            Raw::Mapping(_) => "object".into(),
        }
    }

    /// Deep equality against a literal. Integers and floats never compare equal.
    pub fn matches(&self, literal: &Literal) -> bool {
        match (self, literal) {
            (Raw::String(a), Literal::String(b)) => a == b,
            (Raw::Integer(a), Literal::Integer(b)) => a == b,
            (Raw::Float(a), Literal::Float(b)) => a == b,
            (Raw::Bool(a), Literal::Bool(b)) => a == b,
            _ => false,
        }
    }
}

impl From<Literal> for Raw {
    fn from(literal: Literal) -> Self {
        match literal {
            Literal::String(s) => Raw::String(s),
            Literal::Integer(i) => Raw::Integer(i),
            Literal::Float(f) => Raw::Float(f),
            Literal::Bool(b) => Raw::Bool(b),
        }
    }
}

impl From<&str> for Raw {
    fn from(value: &str) -> Self {
        Raw::String(value.to_string())
    }
}

impl From<Option<String>> for Raw {
    fn from(value: Option<String>) -> Self {
        value.map(Raw::String).unwrap_or(Raw::Missing)
    }
}

/// How a load call presents a failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Failures become `Err(EnvtreeError::Invalid(..))`.
    #[default]
    Throw,
    /// Failures are returned as `Loaded::Invalid(..)`.
    Return,
}

/// What the validation engine does with raw object keys no validator declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownKeys {
    /// Declared keys are the contract; extras pass silently.
    #[default]
    Ignore,
    /// Every extra key is reported as a violation at its own path.
    Reject,
}
