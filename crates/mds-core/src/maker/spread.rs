//! Composite column maker.
//!
//! The payload holds one presence byte per row (`1` present, `0` null); each
//! child is encoded on its own with the maker for its type and travels in the
//! chunk's child list.

use std::sync::Arc;

use bytes::Bytes;
use indexmap::IndexMap;

use super::{compress, decode_column, encode_column, header_len, load_column, MakerKind};
use crate::binary::ColumnBinary;
use crate::column::{Column, ColumnType, SpreadColumn};
use crate::config::MakerConfig;
use crate::connector::ValueConnector;
use crate::error::{Error, Result};
use crate::sink::VectorSink;

pub(super) fn encode(column: &Column, rows: usize, config: &MakerConfig) -> Result<ColumnBinary> {
    let Column::Spread(spread) = column.resolve()? else {
        return Err(Error::TypeMismatch {
            expected: ColumnType::Spread.to_string(),
            actual: column.column_type().to_string(),
        });
    };

    let presence: Vec<u8> = (0..rows).map(|row| u8::from(spread.is_present(row))).collect();
    let present = presence.iter().filter(|&&byte| byte == 1).count();

    let mut children = Vec::with_capacity(spread.child_count());
    for (name, child) in spread.children() {
        if child.column_type() == ColumnType::Null {
            continue;
        }
        children.push(encode_column(child, rows, config.for_child(name))?);
    }

    let (compressor_id, payload) = compress(config, &presence)?;
    Ok(ColumnBinary {
        maker_id: MakerKind::Spread.id().to_string(),
        compressor_id,
        column_name: column.name().to_string(),
        column_type: ColumnType::Spread,
        row_count: header_len(present, "row count")?,
        raw_length: header_len(presence.len(), "raw length")?,
        logical_length: header_len(present, "logical length")?,
        unique_count: None,
        payload,
        children,
    })
}

pub(super) fn build(
    binary: &ColumnBinary,
    rows: usize,
    connector: &Arc<dyn ValueConnector>,
) -> Result<Column> {
    let presence = checked_presence(binary, rows)?;
    let mut children = IndexMap::with_capacity(binary.children.len());
    for child in &binary.children {
        let column = decode_column(child.clone(), rows, Arc::clone(connector))?;
        if children.insert(child.column_name.clone(), Arc::new(column)).is_some() {
            return Err(Error::corrupted(format!(
                "column '{}': duplicate child '{}'",
                binary.column_name, child.column_name
            )));
        }
    }
    let present = presence.iter().map(|&byte| byte == 1).collect();
    Ok(SpreadColumn::decoded(binary.column_name.clone(), present, children).into())
}

pub(super) fn load_direct(binary: &ColumnBinary, rows: usize, sink: &mut dyn VectorSink) -> Result<()> {
    let presence = checked_presence(binary, rows)?;
    for (row, &byte) in presence.iter().enumerate() {
        if byte == 0 {
            sink.set_null(row);
        }
    }
    for child in &binary.children {
        let child_sink = sink.child(&child.column_name, child.column_type)?;
        load_column(child, rows, child_sink)?;
    }
    Ok(())
}

fn checked_presence(binary: &ColumnBinary, rows: usize) -> Result<Bytes> {
    let presence = binary.decompress()?;
    if presence.len() != rows {
        return Err(Error::corrupted(format!(
            "spread column '{}' holds {} rows, block has {rows}",
            binary.column_name,
            presence.len()
        )));
    }
    if let Some(bad) = presence.iter().find(|&&byte| byte > 1) {
        return Err(Error::corrupted(format!(
            "spread column '{}': invalid presence byte {bad}",
            binary.column_name
        )));
    }
    let present = presence.iter().filter(|&&byte| byte == 1).count();
    if present != binary.row_count as usize {
        return Err(Error::corrupted(format!(
            "spread column '{}': {present} present rows, header says {}",
            binary.column_name, binary.row_count
        )));
    }
    Ok(presence)
}
