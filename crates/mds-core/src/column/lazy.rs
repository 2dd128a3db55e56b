//! Deferred column materialization.

use std::fmt;
use std::sync::OnceLock;

use super::types::ColumnType;
use super::Column;
use crate::error::Result;

/// Strategy that builds a real column from an encoded chunk.
pub trait ColumnBuilder: Send + Sync + fmt::Debug {
    /// Decompresses and decodes the chunk.
    ///
    /// # Errors
    ///
    /// Returns an error for malformed chunks or compressor failures.
    fn build(&self) -> Result<Column>;
}

/// Column whose decode is deferred to the first read.
///
/// Name and type are known up front; everything else goes through
/// [`LazyColumn::get`], which runs the builder once and keeps the result.
/// A failed build is not cached, so the next access retries and reports
/// the failure again.
pub struct LazyColumn {
    name: String,
    column_type: ColumnType,
    builder: Box<dyn ColumnBuilder>,
    built: OnceLock<Box<Column>>,
}

impl LazyColumn {
    /// Wraps a builder. O(1), nothing is decoded here.
    pub fn new(name: impl Into<String>, column_type: ColumnType, builder: Box<dyn ColumnBuilder>) -> Self {
        Self {
            name: name.into(),
            column_type,
            builder,
            built: OnceLock::new(),
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

    /// Returns true once the column has been materialized.
    #[must_use]
    pub fn is_built(&self) -> bool {
        self.built.get().is_some()
    }

    /// Materializes the column on first call and returns the memoized result.
    ///
    /// # Errors
    ///
    /// Surfaces the deferred decode failure of the chunk.
    pub fn get(&self) -> Result<&Column> {
        if let Some(column) = self.built.get() {
            return Ok(column);
        }
        let column = self.builder.build()?;
        tracing::trace!(column = %self.name, column_type = %self.column_type, "lazy column built");
        Ok(self.built.get_or_init(|| Box::new(column)))
    }
}

impl fmt::Debug for LazyColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyColumn")
            .field("name", &self.name)
            .field("column_type", &self.column_type)
            .field("built", &self.is_built())
            .finish_non_exhaustive()
    }
}
