//! Row/column container for one block, with nested-schema flattening.
//!
//! # Architecture
//!
//! ```text
//! Spread (row_count = N)
//! ├── "id"    -> Column (LONG)
//! ├── "user"  -> Column (SPREAD)
//! │   ├── "name" -> Column (STRING)
//! │   └── "age"  -> Column (INTEGER)
//! └── "flag"  -> Column (BOOLEAN)
//!
//! FlattenFunction { "user.name" -> ["user", "name"], ... }
//!     flatten(&spread) -> Spread { "user.name" -> Column (STRING), ... }
//! ```

mod flatten;
mod tree;


use std::sync::Arc;

use indexmap::IndexMap;

pub use flatten::{FlattenColumn, FlattenFunction};
pub use tree::{ColumnTree, NodeId};

use crate::column::{Cell, Column, ColumnType};
use crate::error::{Error, Result};

/// Named top-level columns sharing one row count.
///
/// Columns keep their insertion order. The row count grows with
/// [`Spread::add_row`] until it is fixed by [`Spread::set_row_count`],
/// which may happen only once.
#[derive(Debug, Clone, Default)]
pub struct Spread {
    columns: IndexMap<String, Arc<Column>>,
    row_count: usize,
    row_count_fixed: bool,
}

impl Spread {
    /// Creates an empty spread.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a column under its own name.
    ///
    /// A column with the same name is replaced in place.
    pub fn add_column(&mut self, column: impl Into<Arc<Column>>) {
        let column = column.into();
        self.columns.insert(column.name().to_string(), column);
    }

    /// Appends a column under `name`, which may differ from the column's own.
    pub fn insert(&mut self, name: impl Into<String>, column: Arc<Column>) {
        self.columns.insert(name.into(), column);
    }

    /// Fixes the row count.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IllegalState`] if the row count is already fixed.
    pub fn set_row_count(&mut self, row_count: usize) -> Result<()> {
        if self.row_count_fixed {
            return Err(Error::IllegalState(format!(
                "row count already set to {}",
                self.row_count
            )));
        }
        self.row_count = row_count;
        self.row_count_fixed = true;
        Ok(())
    }

    /// Number of rows.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Returns true once [`Spread::set_row_count`] has been called.
    #[must_use]
    pub fn is_row_count_fixed(&self) -> bool {
        self.row_count_fixed
    }

    /// Appends one row of named values and returns its index.
    ///
    /// Columns are created on first sight with the type of the first
    /// non-null value offered for them. Null fields are skipped.
    ///
    /// # Errors
    ///
    /// - [`Error::IllegalState`] once the row count is fixed
    /// - [`Error::TypeMismatch`] for a value of the wrong type
    /// - [`Error::Unsupported`] if the target column is shared or read-only
    pub fn add_row<K: Into<String>>(&mut self, fields: impl IntoIterator<Item = (K, Cell)>) -> Result<usize> {
        if self.row_count_fixed {
            return Err(Error::IllegalState(
                "cannot add rows after the row count is fixed".to_string(),
            ));
        }
        let row = self.row_count;
        for (name, cell) in fields {
            if cell.is_null() {
                continue;
            }
            let column = self
                .columns
                .entry(name.into())
                .or_insert_with_key(|key| Arc::new(Column::new(cell.cell_type(), key.clone())));
            Arc::get_mut(column)
                .ok_or_else(|| Error::Unsupported("cannot write to a shared column".to_string()))?
                .add(row, cell)?;
        }
        self.row_count += 1;
        Ok(row)
    }

    /// Row `row` as a composite cell of its non-null values.
    ///
    /// # Errors
    ///
    /// Propagates deferred decode failures.
    pub fn row(&self, row: usize) -> Result<Cell> {
        let mut fields = Vec::with_capacity(self.columns.len());
        for (name, column) in &self.columns {
            let cell = column.get(row)?;
            if !cell.is_null() {
                fields.push((name.clone(), cell));
            }
        }
        Ok(Cell::Composite(fields))
    }

    /// Column by name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&Arc<Column>> {
        self.columns.get(name)
    }

    /// Column by position.
    #[must_use]
    pub fn column_at(&self, ordinal: usize) -> Option<&Arc<Column>> {
        self.columns.get_index(ordinal).map(|(_, column)| column)
    }

    /// First column of type `column_type`.
    #[must_use]
    pub fn column_by_type(&self, column_type: ColumnType) -> Option<&Arc<Column>> {
        self.columns.values().find(|c| c.column_type() == column_type)
    }

    /// Position of the column named `name`.
    #[must_use]
    pub fn ordinal(&self, name: &str) -> Option<usize> {
        self.columns.get_index_of(name)
    }

    /// Column names in insertion order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    /// Columns in insertion order.
    pub fn columns(&self) -> impl Iterator<Item = (&str, &Arc<Column>)> {
        self.columns.iter().map(|(name, column)| (name.as_str(), column))
    }

    /// Number of top-level columns.
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Returns true if the spread has no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Arena of every column, nested ones included.
    ///
    /// # Errors
    ///
    /// Propagates deferred decode failures of lazy composite columns.
    pub fn tree(&self) -> Result<ColumnTree> {
        ColumnTree::build(self)
    }
}
