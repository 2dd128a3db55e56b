//! # `mds-core`
//!
//! Columnar block encoding engine for semi-structured tabular data.
//!
//! Typed columns are compressed into self-describing [`ColumnBinary`] chunks,
//! grouped into blocks and read back lazily: a decoded column decompresses
//! nothing until one of its cells is touched.
//!
//! ## Features
//!
//! - **Per-type makers**: dictionary + sparse positions for scalar types, dense
//!   tri-state bytes for booleans, recursive chunks for nested columns
//! - **Lazy decoding**: memoized, at most one decompression per chunk
//! - **Filter pushdown**: sound [`CellIndex`] answers before any decode
//! - **Nested schemas**: [`Spread`] containers with [`FlattenFunction`] projection
//! - **Pluggable compression**: `identity` and `lz4` built in
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::io::Cursor;
//! use mds_core::{BlockReader, BlockWriter, Cell, Spread};
//!
//! let mut spread = Spread::new();
//! spread.add_row([("id", Cell::from(1_i64)), ("name", Cell::from("ada"))])?;
//!
//! let mut writer = BlockWriter::new(Vec::new());
//! writer.write(&spread)?;
//!
//! let mut reader = BlockReader::new();
//! reader.set_stream(Cursor::new(writer.into_inner()?))?;
//! while reader.has_next()? {
//!     let block = reader.next()?;
//!     let name = block.column("name").unwrap().get(0)?;
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
// =============================================================================
// NUMERIC CAST LINTS - USE WITH CAUTION
// =============================================================================
// Wire headers are u32 while in-memory lengths are usize.
// For new code: prefer try_from() where a length crosses the wire.
// =============================================================================
#![allow(clippy::cast_possible_truncation)] // Can hide integer truncation bugs
#![allow(clippy::cast_precision_loss)] // Acceptable for f32/f64 conversions
#![allow(clippy::cast_possible_wrap)] // Can hide overflow bugs
#![allow(clippy::cast_sign_loss)] // Can hide sign conversion bugs
#![allow(clippy::cast_lossless)]
// Safe - just suggests Into instead of as

// =============================================================================
// STYLISTIC LINTS - Safe to allow globally (no bug risk)
// =============================================================================
#![allow(clippy::option_if_let_else)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::derive_partial_eq_without_eq)]
#![allow(clippy::if_not_else)]
#![allow(clippy::redundant_pub_crate)]
#![allow(clippy::use_self)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::single_match_else)]
#![allow(clippy::manual_let_else)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::wildcard_imports)]
#![allow(clippy::missing_errors_doc)]

pub mod binary;
pub mod block;
pub mod column;
pub mod compressor;
pub mod config;
pub mod connector;
pub mod error;
#[cfg(test)]
mod error_tests;
pub mod index;
pub mod logging;
#[cfg(test)]
mod logging_tests;
pub mod maker;
pub mod sink;
pub mod spread;

pub use binary::ColumnBinary;
pub use block::{BlockReadOffset, BlockReader, BlockStats, BlockWriter};
pub use column::{
    BooleanBufferColumn, Cell, Column, ColumnBuilder, ColumnType, DictionaryManager, LazyCell,
    LazyColumn, PrimitiveColumn, PrimitiveValue, SpreadColumn,
};
pub use compressor::{registry, Compressor, CompressorRegistry, DEFAULT_COMPRESSOR};
pub use config::{
    ConfigError, FlattenColumnConfig, LoggingConfig, MakerConfig, MdsConfig, ReaderConfig,
    WriterConfig,
};
pub use connector::{DefaultConnector, ValueConnector};
pub use error::{Error, Result};
pub use index::{
    CellIndex, CompareOp, FilterOutcome, Predicate, RangeIndex, SequentialBooleanIndex,
};
pub use logging::init_logging;
pub use maker::{decode_column, encode_column, load_column, MakerKind};
pub use sink::VectorSink;
pub use spread::{ColumnTree, FlattenColumn, FlattenFunction, NodeId, Spread};
