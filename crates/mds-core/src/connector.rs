//! Value conversion at decode boundaries.
//!
//! Every primitive produced by a decoder passes through a [`ValueConnector`]
//! before it is handed to a cell, so callers can substitute their own runtime
//! representation (interned strings, widened integers, ...).

use std::fmt;

use crate::column::{ColumnType, PrimitiveValue};
use crate::error::Result;

/// Converts decoded primitives into the caller's value representation.
pub trait ValueConnector: Send + Sync + fmt::Debug {
    /// Converts one decoded value of a column of type `column_type`.
    ///
    /// # Errors
    ///
    /// Implementations may reject values they cannot represent.
    fn convert(&self, column_type: ColumnType, value: PrimitiveValue) -> Result<PrimitiveValue>;
}

/// Pass-through connector.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultConnector;

impl ValueConnector for DefaultConnector {
    fn convert(&self, _column_type: ColumnType, value: PrimitiveValue) -> Result<PrimitiveValue> {
        Ok(value)
    }
}
