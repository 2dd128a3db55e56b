//! Dictionary maker for every non-boolean primitive type.
//!
//! Payload, before compression:
//!
//! ```text
//! [u32 len][sorted row positions of the non-null values]
//! [u32 len][flat dump of those values, same order]
//! ```
//!
//! Null rows are simply absent from the position list.

use std::sync::Arc;

use bytes::Bytes;
use rustc_hash::FxHashSet;

use super::{compress, header_len, MakerKind};
use crate::binary::codec::{dump, positions, section};
use crate::binary::ColumnBinary;
use crate::column::{Cell, Column, DictionaryManager, LazyCell, PrimitiveColumn};
use crate::config::MakerConfig;
use crate::connector::ValueConnector;
use crate::error::{Error, Result};
use crate::sink::VectorSink;

pub(super) fn encode(column: &Column, rows: usize, config: &MakerConfig) -> Result<ColumnBinary> {
    let column_type = column.column_type();
    let mut rows_present = Vec::new();
    let mut values = Vec::new();
    let mut logical = 0usize;
    let mut scratch = Vec::new();
    let mut distinct: FxHashSet<Vec<u8>> = FxHashSet::default();

    for row in 0..rows {
        let Some(value) = column.get(row)?.value()? else {
            continue;
        };
        if value.column_type() != column_type {
            return Err(Error::TypeMismatch {
                expected: column_type.to_string(),
                actual: value.column_type().to_string(),
            });
        }
        scratch.clear();
        dump::write_value(&value, &mut scratch);
        if !distinct.contains(scratch.as_slice()) {
            distinct.insert(scratch.clone());
        }
        logical += value.byte_len();
        rows_present.push(header_len(row, "row position")?);
        values.push(value);
    }

    let mut position_section = Vec::new();
    positions::encode(&rows_present, &mut position_section);
    let mut value_section = Vec::new();
    dump::write_values(&values, &mut value_section);
    let raw = section::frame(&[&position_section, &value_section]);

    let (compressor_id, payload) = compress(config, &raw)?;
    tracing::trace!(
        column = %column.name(),
        column_type = %column_type,
        values = values.len(),
        raw_bytes = raw.len(),
        payload_bytes = payload.len(),
        "dictionary column encoded"
    );
    Ok(ColumnBinary {
        maker_id: MakerKind::Dictionary.id().to_string(),
        compressor_id,
        column_name: column.name().to_string(),
        column_type,
        row_count: header_len(values.len(), "row count")?,
        raw_length: header_len(raw.len(), "raw length")?,
        logical_length: header_len(logical, "logical length")?,
        unique_count: Some(header_len(distinct.len(), "unique count")?),
        payload,
        children: Vec::new(),
    })
}

pub(super) fn build(
    binary: &ColumnBinary,
    rows: usize,
    connector: &Arc<dyn ValueConnector>,
) -> Result<Column> {
    let (row_positions, value_section) = split_payload(binary, rows)?;
    let dictionary = Arc::new(DictionaryManager::new(
        binary.column_type,
        value_section,
        row_positions.len(),
        Arc::clone(connector),
    ));
    let cells = row_positions.into_iter().enumerate().map(|(slot, row)| {
        (row as usize, Cell::Lazy(LazyCell::new(Arc::clone(&dictionary), slot)))
    });
    Ok(PrimitiveColumn::decoded(binary.column_type, binary.column_name.clone(), rows, cells).into())
}

pub(super) fn load_direct(binary: &ColumnBinary, rows: usize, sink: &mut dyn VectorSink) -> Result<()> {
    let (row_positions, value_section) = split_payload(binary, rows)?;
    let values = dump::parse_values(binary.column_type, &value_section)?;
    if values.len() != row_positions.len() {
        return Err(Error::corrupted(format!(
            "column '{}': {} positions but {} values",
            binary.column_name,
            row_positions.len(),
            values.len()
        )));
    }
    for (row, value) in row_positions.into_iter().zip(&values) {
        sink.set_value(row as usize, value);
    }
    Ok(())
}

/// Decompresses the payload and decodes the position list eagerly.
///
/// The value section is handed back undecoded.
fn split_payload(binary: &ColumnBinary, rows: usize) -> Result<(Vec<u32>, Bytes)> {
    let raw = binary.decompress()?;
    let mut sections = section::split(&raw, 2)?.into_iter();
    let (Some(position_section), Some(value_section)) = (sections.next(), sections.next()) else {
        return Err(Error::corrupted("dictionary payload needs two sections"));
    };

    let row_positions = positions::decode(&position_section)?;
    if row_positions.len() != binary.row_count as usize {
        return Err(Error::corrupted(format!(
            "column '{}': {} positions, header says {}",
            binary.column_name,
            row_positions.len(),
            binary.row_count
        )));
    }
    if let Some(&last) = row_positions.last() {
        if last as usize >= rows {
            return Err(Error::corrupted(format!(
                "column '{}': row position {last} outside a block of {rows} rows",
                binary.column_name
            )));
        }
    }
    Ok((row_positions, value_section))
}
