//! Composite column with named children.

use std::sync::Arc;

use indexmap::IndexMap;

use super::cell::Cell;
use super::types::ColumnType;
use super::Column;
use crate::error::{Error, Result};

/// Composite (struct-like) column.
///
/// Each row is either null or a set of named child values. Children are
/// full columns sharing the parent's row addressing and are reachable by
/// name.
#[derive(Debug, Clone)]
pub struct SpreadColumn {
    name: String,
    present: Vec<bool>,
    children: IndexMap<String, Arc<Column>>,
    read_only: bool,
}

impl SpreadColumn {
    /// Creates an empty writable composite column.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            present: Vec::new(),
            children: IndexMap::new(),
            read_only: false,
        }
    }

    pub(crate) fn decoded(
        name: impl Into<String>,
        present: Vec<bool>,
        children: IndexMap<String, Arc<Column>>,
    ) -> Self {
        Self {
            name: name.into(),
            present,
            children,
            read_only: true,
        }
    }

    /// Column name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Writes a composite cell at `row`.
    ///
    /// Children are created on first sight with the type of the first
    /// non-null value offered for them.
    ///
    /// # Errors
    ///
    /// - [`Error::Unsupported`] on a read-only column or a shared child
    /// - [`Error::TypeMismatch`] for a non-composite cell or a child value
    ///   of the wrong type
    pub fn add(&mut self, row: usize, cell: Cell) -> Result<()> {
        if self.read_only {
            return Err(Error::Unsupported(format!(
                "column '{}' is read only",
                self.name
            )));
        }
        let fields = match cell {
            Cell::Null => return Ok(()),
            Cell::Composite(fields) => fields,
            other => {
                return Err(Error::TypeMismatch {
                    expected: ColumnType::Spread.to_string(),
                    actual: other.cell_type().to_string(),
                })
            }
        };

        for (field, value) in fields {
            if value.is_null() {
                continue;
            }
            let child = self
                .children
                .entry(field)
                .or_insert_with_key(|key| Arc::new(Column::new(value.cell_type(), key.clone())));
            Arc::get_mut(child)
                .ok_or_else(|| Error::Unsupported(format!("child of '{}' is shared", self.name)))?
                .add(row, value)?;
        }

        if row >= self.present.len() {
            self.present.resize(row + 1, false);
        }
        self.present[row] = true;
        Ok(())
    }

    /// Composite cell at `row` holding the non-null child values.
    ///
    /// # Errors
    ///
    /// Propagates deferred decode failures of lazy children.
    pub fn get(&self, row: usize) -> Result<Cell> {
        if !self.present.get(row).copied().unwrap_or(false) {
            return Ok(Cell::Null);
        }
        let mut fields = Vec::with_capacity(self.children.len());
        for (name, child) in &self.children {
            let cell = child.get(row)?;
            if !cell.is_null() {
                fields.push((name.clone(), cell));
            }
        }
        Ok(Cell::Composite(fields))
    }

    /// Returns true if `row` holds a (possibly empty) composite value.
    #[must_use]
    pub fn is_present(&self, row: usize) -> bool {
        self.present.get(row).copied().unwrap_or(false)
    }

    /// Number of addressable rows.
    #[must_use]
    pub fn size(&self) -> usize {
        self.present.len()
    }

    /// Child column by name.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&Arc<Column>> {
        self.children.get(name)
    }

    /// Child names in insertion order.
    pub fn child_names(&self) -> impl Iterator<Item = &str> {
        self.children.keys().map(String::as_str)
    }

    /// Children in insertion order.
    pub fn children(&self) -> impl Iterator<Item = (&str, &Arc<Column>)> {
        self.children.iter().map(|(name, column)| (name.as_str(), column))
    }

    /// Number of children.
    #[must_use]
    pub fn child_count(&self) -> usize {
        self.children.len()
    }
}
