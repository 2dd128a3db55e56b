//! Typed columns, cells and lazy materialization.
//!
//! # Architecture
//!
//! ```text
//! Column
//! ├── Primitive(PrimitiveColumn)      Vec<Cell>, writable until decoded
//! │   └── Cell::Lazy ──► Arc<DictionaryManager> (decoded once, shared)
//! ├── Boolean(BooleanBufferColumn)    dense tri-state bytes, read-only
//! ├── Spread(SpreadColumn)            named children: IndexMap<String, Arc<Column>>
//! └── Lazy(LazyColumn)                OnceLock<Column> + deferred builder
//! ```
//!
//! Every accessor that may force a deferred build returns [`Result`]: a
//! corrupted chunk is reported at the first read that touches it.

mod boolean;
mod cell;
mod dictionary;
mod lazy;
mod primitive;
mod spread;
mod types;


use std::sync::Arc;

use roaring::RoaringBitmap;

pub use boolean::BooleanBufferColumn;
pub use cell::{Cell, LazyCell};
pub use dictionary::DictionaryManager;
pub use lazy::{ColumnBuilder, LazyColumn};
pub use primitive::PrimitiveColumn;
pub use spread::SpreadColumn;
pub use types::{ColumnType, PrimitiveValue};

use crate::error::{Error, Result};
use crate::index::{CellIndex, FilterOutcome, Predicate};

/// A named, typed column addressed by row.
///
/// Reading past the end yields [`Cell::Null`], never an error.
#[derive(Debug)]
pub enum Column {
    /// Flat column of primitive cells.
    Primitive(PrimitiveColumn),
    /// Read-only boolean buffer column.
    Boolean(BooleanBufferColumn),
    /// Composite column with named children.
    Spread(SpreadColumn),
    /// Deferred column built on first access.
    Lazy(LazyColumn),
}

impl Column {
    /// Creates an empty writable column of the given type.
    pub fn new(column_type: ColumnType, name: impl Into<String>) -> Self {
        match column_type {
            ColumnType::Spread => Self::Spread(SpreadColumn::new(name)),
            other => Self::Primitive(PrimitiveColumn::new(other, name)),
        }
    }

    /// Column name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Primitive(c) => c.name(),
            Self::Boolean(c) => c.name(),
            Self::Spread(c) => c.name(),
            Self::Lazy(c) => c.name(),
        }
    }

    /// Column type. Known without materializing a lazy column.
    #[must_use]
    pub fn column_type(&self) -> ColumnType {
        match self {
            Self::Primitive(c) => c.column_type(),
            Self::Boolean(_) => ColumnType::Boolean,
            Self::Spread(_) => ColumnType::Spread,
            Self::Lazy(c) => c.column_type(),
        }
    }

    /// Returns the materialized column, building a lazy one if needed.
    ///
    /// # Errors
    ///
    /// Surfaces the deferred decode failure of a lazy column.
    pub fn resolve(&self) -> Result<&Column> {
        match self {
            Self::Lazy(lazy) => lazy.get()?.resolve(),
            other => Ok(other),
        }
    }

    /// Writes `cell` at `row`.
    ///
    /// # Errors
    ///
    /// - [`Error::Unsupported`] for decoded (read-only) columns
    /// - [`Error::TypeMismatch`] for a cell of another type
    pub fn add(&mut self, row: usize, cell: impl Into<Cell>) -> Result<()> {
        let cell = cell.into();
        match self {
            Self::Primitive(c) => c.add(row, cell),
            Self::Spread(c) => c.add(row, cell),
            Self::Boolean(_) | Self::Lazy(_) => Err(Error::Unsupported(format!(
                "column '{}' is read only",
                self.name()
            ))),
        }
    }

    /// Cell at `row`; [`Cell::Null`] past the end.
    ///
    /// # Errors
    ///
    /// Surfaces deferred decode failures.
    pub fn get(&self, row: usize) -> Result<Cell> {
        match self.resolve()? {
            Self::Primitive(c) => Ok(c.get(row)),
            Self::Boolean(c) => Ok(c.get(row)),
            Self::Spread(c) => c.get(row),
            Self::Lazy(_) => unreachable!("resolve never returns a lazy column"),
        }
    }

    /// Number of addressable rows.
    ///
    /// # Errors
    ///
    /// Surfaces deferred decode failures.
    pub fn size(&self) -> Result<usize> {
        Ok(match self.resolve()? {
            Self::Primitive(c) => c.size(),
            Self::Boolean(c) => c.size(),
            Self::Spread(c) => c.size(),
            Self::Lazy(_) => unreachable!("resolve never returns a lazy column"),
        })
    }

    /// Child column of a composite column. `None` for other columns.
    ///
    /// # Errors
    ///
    /// Surfaces deferred decode failures.
    pub fn child(&self, name: &str) -> Result<Option<Arc<Column>>> {
        Ok(match self.resolve()? {
            Self::Spread(c) => c.child(name).cloned(),
            _ => None,
        })
    }

    /// Children of a composite column in insertion order.
    ///
    /// # Errors
    ///
    /// Surfaces deferred decode failures.
    pub fn children(&self) -> Result<Vec<(String, Arc<Column>)>> {
        Ok(match self.resolve()? {
            Self::Spread(c) => c
                .children()
                .map(|(name, column)| (name.to_string(), Arc::clone(column)))
                .collect(),
            _ => Vec::new(),
        })
    }

    /// Attaches a cell index to a writable primitive column.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] for other column kinds.
    pub fn set_index(&mut self, index: CellIndex) -> Result<()> {
        match self {
            Self::Primitive(c) => {
                c.set_index(index);
                Ok(())
            }
            other => Err(Error::Unsupported(format!(
                "cannot attach an index to column '{}'",
                other.name()
            ))),
        }
    }

    /// Consults the column's cell index.
    ///
    /// # Errors
    ///
    /// Surfaces deferred decode failures.
    pub fn filter(&self, predicate: &Predicate) -> Result<FilterOutcome> {
        Ok(match self.resolve()? {
            Self::Primitive(c) => c.index().filter(predicate),
            Self::Boolean(c) => c.index().filter(predicate),
            Self::Spread(_) | Self::Lazy(_) => FilterOutcome::Unknown,
        })
    }

    /// Exact set of rows in `0..size()` satisfying `predicate`.
    ///
    /// Uses the index first and scans cells only when it cannot decide.
    ///
    /// # Errors
    ///
    /// Surfaces deferred decode failures.
    pub fn filter_rows(&self, predicate: &Predicate) -> Result<RoaringBitmap> {
        match self.filter(predicate)? {
            FilterOutcome::DefinitelyEmpty => Ok(RoaringBitmap::new()),
            FilterOutcome::Rows(rows) => Ok(rows),
            FilterOutcome::Unknown => {
                let mut rows = RoaringBitmap::new();
                for row in 0..self.size()? {
                    let value = self.get(row)?.value()?;
                    if predicate.matches(value.as_ref()) {
                        rows.insert(row as u32);
                    }
                }
                Ok(rows)
            }
        }
    }
}

impl From<PrimitiveColumn> for Column {
    fn from(column: PrimitiveColumn) -> Self {
        Self::Primitive(column)
    }
}

impl From<SpreadColumn> for Column {
    fn from(column: SpreadColumn) -> Self {
        Self::Spread(column)
    }
}

impl From<LazyColumn> for Column {
    fn from(column: LazyColumn) -> Self {
        Self::Lazy(column)
    }
}
