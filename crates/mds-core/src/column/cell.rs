//! Cells: the per-row values of a column.

use std::sync::Arc;

use super::dictionary::DictionaryManager;
use super::types::{ColumnType, PrimitiveValue};
use crate::error::Result;

/// A cell that resolves its value from a shared dictionary on read.
#[derive(Debug, Clone)]
pub struct LazyCell {
    dictionary: Arc<DictionaryManager>,
    slot: usize,
}

impl LazyCell {
    /// Pairs a dictionary with one of its slots.
    #[must_use]
    pub fn new(dictionary: Arc<DictionaryManager>, slot: usize) -> Self {
        Self { dictionary, slot }
    }

    /// Type tag, available without touching the payload.
    #[must_use]
    pub fn column_type(&self) -> ColumnType {
        self.dictionary.column_type()
    }

    /// Dictionary slot this cell points at.
    #[must_use]
    pub fn slot(&self) -> usize {
        self.slot
    }

    /// Resolves the value, decoding the dictionary if needed.
    ///
    /// # Errors
    ///
    /// Propagates a deferred decode failure of the dictionary.
    pub fn value(&self) -> Result<PrimitiveValue> {
        self.dictionary.get(self.slot)
    }
}

/// One row of a column.
#[derive(Debug, Clone, Default)]
pub enum Cell {
    /// Missing value.
    #[default]
    Null,
    /// Realized primitive value.
    Value(PrimitiveValue),
    /// Dictionary-backed value, resolved on read.
    Lazy(LazyCell),
    /// One row of a composite column: its non-null children by name.
    Composite(Vec<(String, Cell)>),
}

impl Cell {
    /// Type tag of the cell. Never forces a dictionary decode.
    #[must_use]
    pub fn cell_type(&self) -> ColumnType {
        match self {
            Self::Null => ColumnType::Null,
            Self::Value(value) => value.column_type(),
            Self::Lazy(lazy) => lazy.column_type(),
            Self::Composite(_) => ColumnType::Spread,
        }
    }

    /// Returns true for [`Cell::Null`].
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the primitive value, `None` for null and composite cells.
    ///
    /// # Errors
    ///
    /// Propagates a deferred decode failure of a lazy cell.
    pub fn value(&self) -> Result<Option<PrimitiveValue>> {
        match self {
            Self::Null | Self::Composite(_) => Ok(None),
            Self::Value(value) => Ok(Some(value.clone())),
            Self::Lazy(lazy) => lazy.value().map(Some),
        }
    }

    /// Returns a copy with every lazy cell resolved, recursively.
    ///
    /// # Errors
    ///
    /// Propagates a deferred decode failure of a lazy cell.
    pub fn realize(&self) -> Result<Cell> {
        Ok(match self {
            Self::Null => Self::Null,
            Self::Value(value) => Self::Value(value.clone()),
            Self::Lazy(lazy) => Self::Value(lazy.value()?),
            Self::Composite(fields) => Self::Composite(
                fields
                    .iter()
                    .map(|(name, cell)| Ok((name.clone(), cell.realize()?)))
                    .collect::<Result<Vec<_>>>()?,
            ),
        })
    }

    /// Looks up a field of a composite cell.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Cell> {
        match self {
            Self::Composite(fields) => fields.iter().find(|(n, _)| n == name).map(|(_, c)| c),
            _ => None,
        }
    }
}

impl From<PrimitiveValue> for Cell {
    fn from(value: PrimitiveValue) -> Self {
        Self::Value(value)
    }
}

impl<T: Into<PrimitiveValue>> From<Option<T>> for Cell {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, |v| Self::Value(v.into()))
    }
}

macro_rules! impl_cell_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Cell {
                fn from(value: $ty) -> Self {
                    Self::Value(value.into())
                }
            }
        )*
    };
}

impl_cell_from!(bool, i8, i16, i32, i64, f32, f64, String, &str, Vec<u8>, &[u8]);
