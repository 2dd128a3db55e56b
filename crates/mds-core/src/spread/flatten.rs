//! Projection of nested columns into a flat spread.

use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};

use super::Spread;
use crate::column::{Column, ColumnType};
use crate::config::FlattenColumnConfig;
use crate::error::Result;

/// An output column name bound to a path into nested columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlattenColumn {
    link_name: String,
    path: Vec<String>,
}

impl FlattenColumn {
    /// Binds `link_name` to `path` (top-level column first).
    pub fn new<S: Into<String>>(link_name: impl Into<String>, path: impl IntoIterator<Item = S>) -> Self {
        Self {
            link_name: link_name.into(),
            path: path.into_iter().map(Into::into).collect(),
        }
    }

    /// Output column name.
    #[must_use]
    pub fn link_name(&self) -> &str {
        &self.link_name
    }

    /// Path into the nested columns.
    #[must_use]
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// Follows the path through `spread`.
    ///
    /// Returns `None` if any segment is missing.
    ///
    /// # Errors
    ///
    /// Propagates deferred decode failures of lazy composite columns.
    pub fn resolve(&self, spread: &Spread) -> Result<Option<Arc<Column>>> {
        let Some((first, rest)) = self.path.split_first() else {
            return Ok(None);
        };
        let Some(mut current) = spread.column(first).cloned() else {
            return Ok(None);
        };
        for segment in rest {
            match current.child(segment)? {
                Some(child) => current = child,
                None => return Ok(None),
            }
        }
        Ok(Some(current))
    }
}

impl From<&FlattenColumnConfig> for FlattenColumn {
    fn from(config: &FlattenColumnConfig) -> Self {
        Self::new(config.link_name.clone(), config.path.iter().cloned())
    }
}

/// Set of flatten links applied to every spread of a reader.
///
/// Until a link is requested through [`FlattenFunction::flatten_column_names`]
/// every registered link is materialized. The first request switches the
/// function, for good, to materializing only the requested links.
#[derive(Debug, Clone, Default)]
pub struct FlattenFunction {
    links: IndexMap<String, FlattenColumn>,
    requested: IndexSet<String>,
}

impl FlattenFunction {
    /// Creates an empty function.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one link per non-composite column of `spread`.
    ///
    /// Link names are the dotted paths, e.g. `user.name`.
    ///
    /// # Errors
    ///
    /// Propagates deferred decode failures of lazy composite columns.
    pub fn from_leaves(spread: &Spread) -> Result<Self> {
        let tree = spread.tree()?;
        let mut function = Self::new();
        for leaf in tree.leaves() {
            let path = tree.path(leaf);
            function.add(FlattenColumn::new(path.join("."), path));
        }
        Ok(function)
    }

    /// Registers a link. Returns false, changing nothing, if the link name
    /// is already registered.
    pub fn add(&mut self, column: FlattenColumn) -> bool {
        if self.links.contains_key(column.link_name()) {
            return false;
        }
        self.links.insert(column.link_name.clone(), column);
        true
    }

    /// Number of registered links.
    #[must_use]
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// Returns true if no link is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Returns true if flattening applies, i.e. at least one link is registered.
    #[must_use]
    pub fn is_flatten(&self) -> bool {
        !self.is_empty()
    }

    /// Registered link by name.
    #[must_use]
    pub fn link(&self, link_name: &str) -> Option<&FlattenColumn> {
        self.links.get(link_name)
    }

    /// Looks up the path of `link_name` and marks the link as requested.
    ///
    /// From then on [`FlattenFunction::flatten`] materializes requested
    /// links only. Unknown names return `None` and change nothing.
    pub fn flatten_column_names(&mut self, link_name: &str) -> Option<&[String]> {
        let link = self.links.get(link_name)?;
        if self.requested.insert(link_name.to_string()) {
            tracing::debug!(link = link_name, "flatten narrowed to requested links");
        }
        Some(link.path())
    }

    /// Requested link names in request order.
    pub fn requested(&self) -> impl Iterator<Item = &str> {
        self.requested.iter().map(String::as_str)
    }

    /// Returns true once a link has been requested.
    #[must_use]
    pub fn is_pruned(&self) -> bool {
        !self.requested.is_empty()
    }

    /// Projects `spread` into a flat spread keyed by link name.
    ///
    /// Resolved columns are shared, not copied. A link whose path does not
    /// resolve yields an all-null column.
    ///
    /// # Errors
    ///
    /// Propagates deferred decode failures of lazy composite columns.
    pub fn flatten(&self, spread: &Spread) -> Result<Spread> {
        let mut flat = Spread::new();
        for link in self.links.values() {
            if self.is_pruned() && !self.requested.contains(link.link_name()) {
                continue;
            }
            let column = match link.resolve(spread)? {
                Some(column) => column,
                None => Arc::new(Column::new(ColumnType::Null, link.link_name())),
            };
            flat.insert(link.link_name(), column);
        }
        flat.set_row_count(spread.row_count())?;
        Ok(flat)
    }
}
