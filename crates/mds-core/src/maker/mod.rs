//! Column binary makers: per-type encode, decode and direct load.
//!
//! # Architecture
//!
//! ```text
//!                    ┌──────────── MakerKind ────────────┐
//! ColumnType ──────► │ Boolean    dense tri-state bytes  │
//!   for_type()       │ Dictionary positions + value dump │ ──► ColumnBinary
//!                    │ Spread     presence + child list  │
//!                    └───────────────────────────────────┘
//! ```
//!
//! The dispatch table is closed: every column type maps to exactly one
//! maker and `match` keeps the three operations exhaustive.
//!
//! - `encode` scans the N block rows once and compresses the payload.
//! - `decode` is O(1): it wraps the chunk in a [`LazyColumn`] that
//!   decompresses on first read.
//! - `load_direct` decompresses immediately and pushes values into a
//!   [`VectorSink`].

mod boolean;
mod dictionary;
mod spread;


use std::fmt;
use std::sync::Arc;

use bytes::Bytes;

use crate::binary::ColumnBinary;
use crate::column::{Column, ColumnBuilder, ColumnType, LazyColumn};
use crate::compressor;
use crate::config::MakerConfig;
use crate::connector::ValueConnector;
use crate::error::{Error, Result};
use crate::sink::VectorSink;

/// Closed set of column binary makers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MakerKind {
    /// Dense one-byte-per-row encoding for booleans.
    Boolean,
    /// Position list plus flat value dump for every other primitive type.
    Dictionary,
    /// Presence bytes plus recursively encoded children.
    Spread,
}

impl MakerKind {
    /// Every maker.
    pub const ALL: [Self; 3] = [Self::Boolean, Self::Dictionary, Self::Spread];

    /// Id written into each chunk.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Dictionary => "dictionary",
            Self::Spread => "spread",
        }
    }

    /// Resolves a maker id read from a chunk.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownMaker`] for ids outside the table.
    pub fn from_id(id: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.id() == id)
            .ok_or_else(|| Error::UnknownMaker(id.to_string()))
    }

    /// Maker responsible for `column_type`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] for [`ColumnType::Null`].
    pub fn for_type(column_type: ColumnType) -> Result<Self> {
        Ok(match column_type {
            ColumnType::Boolean => Self::Boolean,
            ColumnType::Byte
            | ColumnType::Short
            | ColumnType::Integer
            | ColumnType::Long
            | ColumnType::Float
            | ColumnType::Double
            | ColumnType::String
            | ColumnType::Bytes => Self::Dictionary,
            ColumnType::Spread => Self::Spread,
            ColumnType::Null => {
                return Err(Error::Unsupported(
                    "NULL columns have no binary maker".to_string(),
                ))
            }
        })
    }

    /// Returns true if this maker handles `column_type`.
    #[must_use]
    pub fn handles(self, column_type: ColumnType) -> bool {
        Self::for_type(column_type).is_ok_and(|kind| kind == self)
    }

    /// Encodes `column` as a chunk of a block of `rows` rows.
    ///
    /// # Errors
    ///
    /// - [`Error::IllegalState`] if the column holds more than `rows` rows
    /// - [`Error::TypeMismatch`] if a cell does not match the column type
    /// - [`Error::UnknownCompressor`] or [`Error::Compression`] from the compressor
    /// - deferred decode failures of a lazy source column
    pub fn encode(self, column: &Column, rows: usize, config: &MakerConfig) -> Result<ColumnBinary> {
        if !self.handles(column.column_type()) {
            return Err(Error::TypeMismatch {
                expected: format!("a column handled by the {} maker", self.id()),
                actual: column.column_type().to_string(),
            });
        }
        let size = column.size()?;
        if size > rows {
            return Err(Error::IllegalState(format!(
                "column '{}' holds {size} rows, block has {rows}",
                column.name()
            )));
        }
        match self {
            Self::Boolean => boolean::encode(column, rows, config),
            Self::Dictionary => dictionary::encode(column, rows, config),
            Self::Spread => spread::encode(column, rows, config),
        }
    }

    /// Wraps `binary` in a lazily built column. Nothing is decompressed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Corrupted`] if the chunk header is inconsistent with
    /// this maker or with the block row count.
    pub fn decode(
        self,
        binary: ColumnBinary,
        rows: usize,
        connector: Arc<dyn ValueConnector>,
    ) -> Result<Column> {
        self.check_header(&binary, rows)?;
        let name = binary.column_name.clone();
        let column_type = binary.column_type;
        let builder = ChunkBuilder {
            kind: self,
            binary,
            rows,
            connector,
        };
        Ok(LazyColumn::new(name, column_type, Box::new(builder)).into())
    }

    /// Decompresses `binary` and pushes every value into `sink`.
    ///
    /// # Errors
    ///
    /// Returns an error for malformed chunks or compressor failures.
    pub fn load_direct(self, binary: &ColumnBinary, rows: usize, sink: &mut dyn VectorSink) -> Result<()> {
        self.check_header(binary, rows)?;
        match self {
            Self::Boolean => boolean::load_direct(binary, rows, sink),
            Self::Dictionary => dictionary::load_direct(binary, rows, sink),
            Self::Spread => spread::load_direct(binary, rows, sink),
        }
    }

    fn build(self, binary: &ColumnBinary, rows: usize, connector: &Arc<dyn ValueConnector>) -> Result<Column> {
        match self {
            Self::Boolean => boolean::build(binary, rows, connector.as_ref()),
            Self::Dictionary => dictionary::build(binary, rows, connector),
            Self::Spread => spread::build(binary, rows, connector),
        }
    }

    fn check_header(self, binary: &ColumnBinary, rows: usize) -> Result<()> {
        if binary.maker_id != self.id() || !self.handles(binary.column_type) {
            return Err(Error::corrupted(format!(
                "column '{}': maker '{}' cannot hold {} values",
                binary.column_name, binary.maker_id, binary.column_type
            )));
        }
        if binary.row_count as usize > rows {
            return Err(Error::corrupted(format!(
                "column '{}': {} values in a block of {rows} rows",
                binary.column_name, binary.row_count
            )));
        }
        Ok(())
    }
}

impl fmt::Display for MakerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Deferred build strategy of a decoded chunk.
struct ChunkBuilder {
    kind: MakerKind,
    binary: ColumnBinary,
    rows: usize,
    connector: Arc<dyn ValueConnector>,
}

impl ColumnBuilder for ChunkBuilder {
    fn build(&self) -> Result<Column> {
        self.kind.build(&self.binary, self.rows, &self.connector)
    }
}

impl fmt::Debug for ChunkBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChunkBuilder")
            .field("kind", &self.kind)
            .field("column", &self.binary.column_name)
            .field("rows", &self.rows)
            .finish_non_exhaustive()
    }
}

/// Encodes `column` with the maker for its type.
///
/// # Errors
///
/// See [`MakerKind::encode`]; NULL columns are [`Error::Unsupported`].
pub fn encode_column(column: &Column, rows: usize, config: &MakerConfig) -> Result<ColumnBinary> {
    MakerKind::for_type(column.column_type())?.encode(column, rows, config)
}

/// Decodes a chunk lazily with the maker named in its header.
///
/// # Errors
///
/// Returns [`Error::UnknownMaker`] or [`Error::Corrupted`] for bad headers.
pub fn decode_column(
    binary: ColumnBinary,
    rows: usize,
    connector: Arc<dyn ValueConnector>,
) -> Result<Column> {
    MakerKind::from_id(&binary.maker_id)?.decode(binary, rows, connector)
}

/// Loads a chunk into `sink` with the maker named in its header.
///
/// # Errors
///
/// Returns an error for bad headers, malformed payloads or compressor failures.
pub fn load_column(binary: &ColumnBinary, rows: usize, sink: &mut dyn VectorSink) -> Result<()> {
    MakerKind::from_id(&binary.maker_id)?.load_direct(binary, rows, sink)
}

/// Compresses a raw payload with the configured compressor.
fn compress(config: &MakerConfig, raw: &[u8]) -> Result<(String, Bytes)> {
    let compressor = compressor::registry().get(&config.compressor)?;
    let payload = compressor.compress(raw)?;
    Ok((compressor.id().to_string(), Bytes::from(payload)))
}

/// Converts a length to a header field.
fn header_len(len: usize, what: &str) -> Result<u32> {
    u32::try_from(len)
        .ok()
        .filter(|&n| i32::try_from(n).is_ok())
        .ok_or_else(|| Error::Unsupported(format!("{what} of {len} does not fit a chunk header")))
}
