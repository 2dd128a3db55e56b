//! Dense boolean maker.
//!
//! One byte per row: `0` false, `1` true, `2` null. A two-bit value space
//! gains nothing from a dictionary or a position list.

use bytes::Bytes;
use rustc_hash::FxHashSet;

use super::{compress, header_len, MakerKind};
use crate::binary::ColumnBinary;
use crate::column::{BooleanBufferColumn, Cell, Column, ColumnType, PrimitiveValue};
use crate::config::MakerConfig;
use crate::connector::ValueConnector;
use crate::error::{Error, Result};
use crate::index::BOOLEAN_NULL;
use crate::sink::VectorSink;

/// Byte some legacy writers used as a second null marker.
const LEGACY_NULL_ALIAS: u8 = 0x7F;

pub(super) fn encode(column: &Column, rows: usize, config: &MakerConfig) -> Result<ColumnBinary> {
    let mut raw = Vec::with_capacity(rows);
    let mut non_null = 0usize;
    let mut seen = FxHashSet::default();

    for row in 0..rows {
        match column.get(row)?.value()? {
            None => raw.push(BOOLEAN_NULL),
            Some(PrimitiveValue::Boolean(value)) => {
                raw.push(u8::from(value));
                seen.insert(value);
                non_null += 1;
            }
            Some(other) => {
                return Err(Error::TypeMismatch {
                    expected: ColumnType::Boolean.to_string(),
                    actual: other.column_type().to_string(),
                })
            }
        }
    }

    let (compressor_id, payload) = compress(config, &raw)?;
    Ok(ColumnBinary {
        maker_id: MakerKind::Boolean.id().to_string(),
        compressor_id,
        column_name: column.name().to_string(),
        column_type: ColumnType::Boolean,
        row_count: header_len(non_null, "row count")?,
        raw_length: header_len(raw.len(), "raw length")?,
        logical_length: header_len(non_null, "logical length")?,
        unique_count: Some(header_len(seen.len(), "unique count")?),
        payload,
        children: Vec::new(),
    })
}

pub(super) fn build(binary: &ColumnBinary, rows: usize, connector: &dyn ValueConnector) -> Result<Column> {
    let buffer = checked_buffer(binary, rows)?;
    let true_cell = Cell::from(connector.convert(ColumnType::Boolean, PrimitiveValue::Boolean(true))?);
    let false_cell = Cell::from(connector.convert(ColumnType::Boolean, PrimitiveValue::Boolean(false))?);
    Ok(Column::Boolean(BooleanBufferColumn::new(
        binary.column_name.clone(),
        buffer,
        true_cell,
        false_cell,
    )))
}

pub(super) fn load_direct(binary: &ColumnBinary, rows: usize, sink: &mut dyn VectorSink) -> Result<()> {
    let buffer = checked_buffer(binary, rows)?;
    for (row, &byte) in buffer.iter().enumerate() {
        match byte {
            0 => sink.set_boolean(row, false),
            1 => sink.set_boolean(row, true),
            _ => sink.set_null(row),
        }
    }
    Ok(())
}

/// Decompresses the buffer and checks its length and every byte.
fn checked_buffer(binary: &ColumnBinary, rows: usize) -> Result<Bytes> {
    let buffer = binary.decompress()?;
    if buffer.len() != rows {
        return Err(Error::corrupted(format!(
            "boolean column '{}' holds {} rows, block has {rows}",
            binary.column_name,
            buffer.len()
        )));
    }

    let mut non_null = 0usize;
    for (row, &byte) in buffer.iter().enumerate() {
        match byte {
            0 | 1 => non_null += 1,
            BOOLEAN_NULL => {}
            LEGACY_NULL_ALIAS => {
                tracing::warn!(
                    column = %binary.column_name,
                    row,
                    "boolean buffer uses the unverified legacy null alias 0x7F"
                );
                return Err(Error::corrupted(format!(
                    "boolean column '{}': legacy null alias at row {row}",
                    binary.column_name
                )));
            }
            other => {
                return Err(Error::corrupted(format!(
                    "boolean column '{}': invalid byte {other} at row {row}",
                    binary.column_name
                )))
            }
        }
    }

    if non_null != binary.row_count as usize {
        return Err(Error::corrupted(format!(
            "boolean column '{}': {non_null} values, header says {}",
            binary.column_name, binary.row_count
        )));
    }
    Ok(buffer)
}
