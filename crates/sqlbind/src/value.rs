//! Scalar values used for bind parameters and row fields.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single bindable / fetchable value.
///
/// The execution layer only has to understand text, integers, floats and NULL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    /// Text value
    Text(String),
    /// Integer value
    Int(i64),
    /// Floating-point value
    Float(f64),
    /// SQL NULL
    Null,
}

impl Scalar {
    /// Borrow the text value, if this is text.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Integer value, if this is an integer.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Scalar::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Float value; integers are widened.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Scalar::Float(f) => Some(*f),
            Scalar::Int(n) => Some(*n as f64),
            _ => None,
        }
    }

    /// Check for SQL NULL.
    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    /// Text starting with `:` names an existing placeholder rather than a value.
    pub(crate) fn as_placeholder(&self) -> Option<&str> {
        self.as_str().filter(|s| s.starts_with(crate::BIND_PREFIX))
    }

    fn kind(&self) -> &'static str {
        match self {
            Scalar::Text(_) => "text",
            Scalar::Int(_) => "integer",
            Scalar::Float(_) => "float",
            Scalar::Null => "null",
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Text(s) => f.write_str(s),
            Scalar::Int(n) => write!(f, "{n}"),
            Scalar::Float(x) => write!(f, "{x}"),
            Scalar::Null => f.write_str("NULL"),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Text(value)
    }
}

impl From<&String> for Scalar {
    fn from(value: &String) -> Self {
        Scalar::Text(value.clone())
    }
}

macro_rules! impl_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Scalar {
                fn from(value: $ty) -> Self {
                    Scalar::Int(i64::from(value))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<f32> for Scalar {
    fn from(value: f32) -> Self {
        Scalar::Float(f64::from(value))
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Float(value)
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Int(i64::from(value))
    }
}

impl<T: Into<Scalar>> From<Option<T>> for Scalar {
    fn from(value: Option<T>) -> Self {
        value.map_or(Scalar::Null, Into::into)
    }
}

/// Conversion out of a [`Scalar`], used by typed row access.
pub trait FromScalar: Sized {
    /// Convert `value` (read from `column`) into `Self`.
    fn from_scalar(column: &str, value: &Scalar) -> Result<Self>;
}

fn mismatch(column: &str, expected: &str, value: &Scalar) -> Error {
    Error::decode(column, format!("expected {expected}, got {}", value.kind()))
}

impl FromScalar for Scalar {
    fn from_scalar(_column: &str, value: &Scalar) -> Result<Self> {
        Ok(value.clone())
    }
}

impl FromScalar for i64 {
    fn from_scalar(column: &str, value: &Scalar) -> Result<Self> {
        match value {
            Scalar::Int(n) => Ok(*n),
            // Some drivers hand every column back as text.
            Scalar::Text(s) => s
                .trim()
                .parse()
                .map_err(|e| Error::decode(column, format!("invalid integer {s:?}: {e}"))),
            other => Err(mismatch(column, "integer", other)),
        }
    }
}

impl FromScalar for i32 {
    fn from_scalar(column: &str, value: &Scalar) -> Result<Self> {
        let n = i64::from_scalar(column, value)?;
        i32::try_from(n).map_err(|e| Error::decode(column, e.to_string()))
    }
}

impl FromScalar for u64 {
    fn from_scalar(column: &str, value: &Scalar) -> Result<Self> {
        let n = i64::from_scalar(column, value)?;
        u64::try_from(n).map_err(|e| Error::decode(column, e.to_string()))
    }
}

impl FromScalar for f64 {
    fn from_scalar(column: &str, value: &Scalar) -> Result<Self> {
        match value {
            Scalar::Float(x) => Ok(*x),
            Scalar::Int(n) => Ok(*n as f64),
            Scalar::Text(s) => s
                .trim()
                .parse()
                .map_err(|e| Error::decode(column, format!("invalid float {s:?}: {e}"))),
            Scalar::Null => Err(mismatch(column, "float", value)),
        }
    }
}

impl FromScalar for String {
    fn from_scalar(column: &str, value: &Scalar) -> Result<Self> {
        match value {
            Scalar::Null => Err(mismatch(column, "text", value)),
            other => Ok(other.to_string()),
        }
    }
}

impl<T: FromScalar> FromScalar for Option<T> {
    fn from_scalar(column: &str, value: &Scalar) -> Result<Self> {
        match value {
            Scalar::Null => Ok(None),
            other => T::from_scalar(column, other).map(Some),
        }
    }
}
