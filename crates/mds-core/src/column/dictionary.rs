//! Lazily decoded value dictionaries.

use std::fmt;
use std::sync::{Arc, OnceLock};

use bytes::Bytes;

use super::types::{ColumnType, PrimitiveValue};
use crate::binary::codec::dump;
use crate::connector::ValueConnector;
use crate::error::{Error, Result};

/// Owns the dump section of one column chunk and decodes it on first use.
///
/// The manager moves from *unbuilt* to *built* exactly once. Both [`get`]
/// and [`len`] force the build. The transition itself is not serialized:
/// two threads racing on the first access may both parse the section (only
/// one result is kept). Once built, the manager is safe to share for reads.
///
/// [`get`]: DictionaryManager::get
/// [`len`]: DictionaryManager::len
pub struct DictionaryManager {
    column_type: ColumnType,
    section: Bytes,
    entries: usize,
    connector: Arc<dyn ValueConnector>,
    values: OnceLock<Vec<PrimitiveValue>>,
}

impl DictionaryManager {
    /// Creates an unbuilt dictionary over a flat value dump holding exactly
    /// `entries` values.
    #[must_use]
    pub fn new(
        column_type: ColumnType,
        section: Bytes,
        entries: usize,
        connector: Arc<dyn ValueConnector>,
    ) -> Self {
        Self {
            column_type,
            section,
            entries,
            connector,
            values: OnceLock::new(),
        }
    }

    /// Type of every value in the dictionary. Known without decoding.
    #[must_use]
    pub fn column_type(&self) -> ColumnType {
        self.column_type
    }

    /// Returns true once the dump section has been decoded.
    #[must_use]
    pub fn is_built(&self) -> bool {
        self.values.get().is_some()
    }

    fn values(&self) -> Result<&[PrimitiveValue]> {
        if let Some(values) = self.values.get() {
            return Ok(values);
        }

        let parsed = dump::parse_values(self.column_type, &self.section)?;
        if parsed.len() != self.entries {
            return Err(Error::corrupted(format!(
                "dictionary holds {} values, expected {}",
                parsed.len(),
                self.entries
            )));
        }
        let values = parsed
            .into_iter()
            .map(|value| self.connector.convert(self.column_type, value))
            .collect::<Result<Vec<_>>>()?;
        tracing::trace!(
            column_type = %self.column_type,
            entries = values.len(),
            "dictionary materialized"
        );

        Ok(self.values.get_or_init(|| values))
    }

    /// Returns the value stored at dictionary slot `index`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Corrupted`] if the section cannot be decoded, holds
    /// another number of values than announced, or the slot does not exist.
    pub fn get(&self, index: usize) -> Result<PrimitiveValue> {
        let values = self.values()?;
        values.get(index).cloned().ok_or_else(|| {
            Error::corrupted(format!(
                "dictionary slot {index} out of range ({} entries)",
                values.len()
            ))
        })
    }

    /// Number of entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the section cannot be decoded.
    pub fn len(&self) -> Result<usize> {
        Ok(self.values()?.len())
    }

    /// Returns true if the dictionary has no entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the section cannot be decoded.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

impl fmt::Debug for DictionaryManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DictionaryManager")
            .field("column_type", &self.column_type)
            .field("section_len", &self.section.len())
            .field("built", &self.is_built())
            .finish_non_exhaustive()
    }
}
