//! Flat column of primitive cells.

use super::cell::Cell;
use super::types::ColumnType;
use crate::error::{Error, Result};
use crate::index::CellIndex;

/// A named column of primitive cells addressed by row.
///
/// Rows never written read back as [`Cell::Null`]. Columns produced by a
/// decoder are read-only.
#[derive(Debug, Clone)]
pub struct PrimitiveColumn {
    name: String,
    column_type: ColumnType,
    cells: Vec<Cell>,
    index: CellIndex,
    read_only: bool,
}

impl PrimitiveColumn {
    /// Creates an empty writable column.
    pub fn new(column_type: ColumnType, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            column_type,
            cells: Vec::new(),
            index: CellIndex::Default,
            read_only: false,
        }
    }

    /// Creates a read-only column of `rows` rows from positioned cells.
    ///
    /// Later entries for the same row win.
    pub(crate) fn decoded(
        column_type: ColumnType,
        name: impl Into<String>,
        rows: usize,
        positioned: impl IntoIterator<Item = (usize, Cell)>,
    ) -> Self {
        let mut cells = vec![Cell::Null; rows];
        for (row, cell) in positioned {
            if row >= cells.len() {
                cells.resize(row + 1, Cell::Null);
            }
            cells[row] = cell;
        }
        Self {
            name: name.into(),
            column_type,
            cells,
            index: CellIndex::Default,
            read_only: true,
        }
    }

    /// Column name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Column type.
    #[must_use]
    pub fn column_type(&self) -> ColumnType {
        self.column_type
    }

    /// Returns true for decoded columns.
    #[must_use]
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Writes `cell` at `row`, growing the column with nulls as needed.
    ///
    /// # Errors
    ///
    /// - [`Error::Unsupported`] on a read-only column
    /// - [`Error::TypeMismatch`] if the cell type differs from the column type
    pub fn add(&mut self, row: usize, cell: Cell) -> Result<()> {
        if self.read_only {
            return Err(Error::Unsupported(format!(
                "column '{}' is read only",
                self.name
            )));
        }
        let cell_type = cell.cell_type();
        if cell_type != ColumnType::Null && cell_type != self.column_type {
            return Err(Error::TypeMismatch {
                expected: self.column_type.to_string(),
                actual: cell_type.to_string(),
            });
        }
        if row >= self.cells.len() {
            self.cells.resize(row + 1, Cell::Null);
        }
        self.cells[row] = cell;
        Ok(())
    }

    /// Cell at `row`, [`Cell::Null`] past the end.
    #[must_use]
    pub fn get(&self, row: usize) -> Cell {
        self.cells.get(row).cloned().unwrap_or_default()
    }

    /// Number of addressable rows (last written row + 1).
    #[must_use]
    pub fn size(&self) -> usize {
        self.cells.len()
    }

    /// Attached cell index.
    #[must_use]
    pub fn index(&self) -> &CellIndex {
        &self.index
    }

    /// Replaces the cell index.
    pub fn set_index(&mut self, index: CellIndex) {
        self.index = index;
    }
}
