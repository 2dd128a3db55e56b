//! Vectorized sink collaborator.
//!
//! Makers push decoded values straight into a caller-owned sink during
//! direct load, bypassing cells and dictionaries entirely. Rows a maker never
//! touches keep whatever default the sink has (usually null).

use crate::column::{ColumnType, PrimitiveValue};
use crate::error::Result;

/// Destination of a direct load.
///
/// Row indices are block-relative. Implementations own their storage; the
/// crate only calls into them.
pub trait VectorSink {
    /// Marks `row` as null.
    fn set_null(&mut self, row: usize);
    /// Stores a boolean.
    fn set_boolean(&mut self, row: usize, value: bool);
    /// Stores a byte.
    fn set_byte(&mut self, row: usize, value: i8);
    /// Stores a short.
    fn set_short(&mut self, row: usize, value: i16);
    /// Stores an integer.
    fn set_integer(&mut self, row: usize, value: i32);
    /// Stores a long.
    fn set_long(&mut self, row: usize, value: i64);
    /// Stores a float.
    fn set_float(&mut self, row: usize, value: f32);
    /// Stores a double.
    fn set_double(&mut self, row: usize, value: f64);
    /// Stores a string.
    fn set_string(&mut self, row: usize, value: &str);
    /// Stores a byte string.
    fn set_bytes(&mut self, row: usize, value: &[u8]);

    /// Sink for the nested column `name` of a composite column.
    ///
    /// # Errors
    ///
    /// Implementations may reject children they do not expect.
    fn child(&mut self, name: &str, column_type: ColumnType) -> Result<&mut dyn VectorSink>;

    /// Dispatches `value` to the matching typed setter.
    fn set_value(&mut self, row: usize, value: &PrimitiveValue) {
        match value {
            PrimitiveValue::Boolean(v) => self.set_boolean(row, *v),
            PrimitiveValue::Byte(v) => self.set_byte(row, *v),
            PrimitiveValue::Short(v) => self.set_short(row, *v),
            PrimitiveValue::Integer(v) => self.set_integer(row, *v),
            PrimitiveValue::Long(v) => self.set_long(row, *v),
            PrimitiveValue::Float(v) => self.set_float(row, *v),
            PrimitiveValue::Double(v) => self.set_double(row, *v),
            PrimitiveValue::String(v) => self.set_string(row, v),
            PrimitiveValue::Bytes(v) => self.set_bytes(row, v),
        }
    }
}
