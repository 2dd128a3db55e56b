//! Read-only boolean column backed by the dense tri-state buffer.

use bytes::Bytes;

use super::cell::Cell;
use crate::index::{CellIndex, SequentialBooleanIndex};

/// Boolean column reading cells straight from the decompressed buffer.
///
/// Byte `0` is false, `1` is true and `2` is null. The buffer is validated
/// by the boolean maker before this column is built.
#[derive(Debug, Clone)]
pub struct BooleanBufferColumn {
    name: String,
    buffer: Bytes,
    true_cell: Cell,
    false_cell: Cell,
    index: CellIndex,
}

impl BooleanBufferColumn {
    pub(crate) fn new(name: impl Into<String>, buffer: Bytes, true_cell: Cell, false_cell: Cell) -> Self {
        let index = SequentialBooleanIndex::new(buffer.clone()).into();
        Self {
            name: name.into(),
            buffer,
            true_cell,
            false_cell,
            index,
        }
    }

    /// Column name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Cell at `row`, [`Cell::Null`] past the end.
    #[must_use]
    pub fn get(&self, row: usize) -> Cell {
        match self.buffer.get(row) {
            Some(0) => self.false_cell.clone(),
            Some(1) => self.true_cell.clone(),
            _ => Cell::Null,
        }
    }

    /// Number of rows in the buffer.
    #[must_use]
    pub fn size(&self) -> usize {
        self.buffer.len()
    }

    /// The sequential boolean index over the buffer.
    #[must_use]
    pub fn index(&self) -> &CellIndex {
        &self.index
    }

    /// Raw tri-state bytes.
    #[must_use]
    pub fn buffer(&self) -> &Bytes {
        &self.buffer
    }
}
