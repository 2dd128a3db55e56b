//! Column types and primitive values.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Logical type of a column or cell.
///
/// The numeric code is the on-wire representation inside a column chunk header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ColumnType {
    /// No value.
    Null,
    /// Tri-state boolean (true, false, null).
    Boolean,
    /// Signed 8-bit integer.
    Byte,
    /// Signed 16-bit integer.
    Short,
    /// Signed 32-bit integer.
    Integer,
    /// Signed 64-bit integer.
    Long,
    /// 32-bit float.
    Float,
    /// 64-bit float.
    Double,
    /// UTF-8 string.
    String,
    /// Opaque byte string.
    Bytes,
    /// Composite column with named children.
    Spread,
}

impl ColumnType {
    /// Returns the wire code of this type.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Null => 0,
            Self::Boolean => 1,
            Self::Byte => 2,
            Self::Short => 3,
            Self::Integer => 4,
            Self::Long => 5,
            Self::Float => 6,
            Self::Double => 7,
            Self::String => 8,
            Self::Bytes => 9,
            Self::Spread => 10,
        }
    }

    /// Parses a wire code.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Corrupted`] for an unknown code.
    pub fn from_code(code: u8) -> Result<Self> {
        Ok(match code {
            0 => Self::Null,
            1 => Self::Boolean,
            2 => Self::Byte,
            3 => Self::Short,
            4 => Self::Integer,
            5 => Self::Long,
            6 => Self::Float,
            7 => Self::Double,
            8 => Self::String,
            9 => Self::Bytes,
            10 => Self::Spread,
            other => return Err(Error::corrupted(format!("unknown column type code {other}"))),
        })
    }

    /// Fixed byte width of one value, `None` for variable-width and non-primitive types.
    #[must_use]
    pub const fn byte_width(self) -> Option<usize> {
        match self {
            Self::Boolean | Self::Byte => Some(1),
            Self::Short => Some(2),
            Self::Integer | Self::Float => Some(4),
            Self::Long | Self::Double => Some(8),
            Self::Null | Self::String | Self::Bytes | Self::Spread => None,
        }
    }

    /// Returns true for types that hold a single primitive value per cell.
    #[must_use]
    pub const fn is_primitive(self) -> bool {
        !matches!(self, Self::Null | Self::Spread)
    }

    /// Upper-case display name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Null => "NULL",
            Self::Boolean => "BOOLEAN",
            Self::Byte => "BYTE",
            Self::Short => "SHORT",
            Self::Integer => "INTEGER",
            Self::Long => "LONG",
            Self::Float => "FLOAT",
            Self::Double => "DOUBLE",
            Self::String => "STRING",
            Self::Bytes => "BYTES",
            Self::Spread => "SPREAD",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A decoded primitive value.
#[derive(Debug, Clone, PartialEq)]
pub enum PrimitiveValue {
    /// Boolean value
    Boolean(bool),
    /// 8-bit value
    Byte(i8),
    /// 16-bit value
    Short(i16),
    /// 32-bit value
    Integer(i32),
    /// 64-bit value
    Long(i64),
    /// 32-bit float
    Float(f32),
    /// 64-bit float
    Double(f64),
    /// String value
    String(String),
    /// Byte string
    Bytes(Vec<u8>),
}

impl PrimitiveValue {
    /// Returns the column type this value belongs to.
    #[must_use]
    pub const fn column_type(&self) -> ColumnType {
        match self {
            Self::Boolean(_) => ColumnType::Boolean,
            Self::Byte(_) => ColumnType::Byte,
            Self::Short(_) => ColumnType::Short,
            Self::Integer(_) => ColumnType::Integer,
            Self::Long(_) => ColumnType::Long,
            Self::Float(_) => ColumnType::Float,
            Self::Double(_) => ColumnType::Double,
            Self::String(_) => ColumnType::String,
            Self::Bytes(_) => ColumnType::Bytes,
        }
    }

    /// Number of bytes this value occupies in a flat dump, excluding framing.
    #[must_use]
    pub fn byte_len(&self) -> usize {
        match self {
            Self::String(s) => s.len(),
            Self::Bytes(b) => b.len(),
            other => other.column_type().byte_width().unwrap_or(0),
        }
    }

    /// Integer view for the integral types.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Byte(v) => Some(i64::from(*v)),
            Self::Short(v) => Some(i64::from(*v)),
            Self::Integer(v) => Some(i64::from(*v)),
            Self::Long(v) => Some(*v),
            _ => None,
        }
    }

    /// Floating-point view for every numeric type.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(f64::from(*v)),
            Self::Double(v) => Some(*v),
            other => other.as_i64().map(|v| v as f64),
        }
    }

    /// String view.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Compares two values.
    ///
    /// Integral types compare exactly with each other; any other numeric
    /// mix is compared as `f64`. Strings, byte strings and booleans compare
    /// only with their own kind. Returns `None` for incomparable pairs
    /// (including NaN).
    #[must_use]
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Boolean(a), Self::Boolean(b)) => Some(a.cmp(b)),
            (Self::String(a), Self::String(b)) => Some(a.cmp(b)),
            (Self::Bytes(a), Self::Bytes(b)) => Some(a.cmp(b)),
            (a, b) => match (a.as_i64(), b.as_i64()) {
                (Some(x), Some(y)) => Some(x.cmp(&y)),
                _ => a.as_f64()?.partial_cmp(&b.as_f64()?),
            },
        }
    }
}

impl fmt::Display for PrimitiveValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean(v) => write!(f, "{v}"),
            Self::Byte(v) => write!(f, "{v}"),
            Self::Short(v) => write!(f, "{v}"),
            Self::Integer(v) => write!(f, "{v}"),
            Self::Long(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Double(v) => write!(f, "{v}"),
            Self::String(v) => f.write_str(v),
            Self::Bytes(v) => write!(f, "{v:02x?}"),
        }
    }
}

macro_rules! impl_from_primitive {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for PrimitiveValue {
                fn from(value: $ty) -> Self {
                    Self::$variant(value.into())
                }
            }
        )*
    };
}

impl_from_primitive! {
    bool => Boolean,
    i8 => Byte,
    i16 => Short,
    i32 => Integer,
    i64 => Long,
    f32 => Float,
    f64 => Double,
    String => String,
    &str => String,
    Vec<u8> => Bytes,
    &[u8] => Bytes,
}
