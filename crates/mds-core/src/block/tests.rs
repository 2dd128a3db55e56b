//! Tests for the `block` module

use std::fs::File;
use std::io::{Cursor, Write};

use super::*;
use crate::column::{Cell, Column, ColumnType, PrimitiveValue};
use crate::config::{FlattenColumnConfig, ReaderConfig};
use crate::error::Error;
use crate::spread::Spread;

fn people() -> Spread {
    let mut spread = Spread::new();
    spread
        .add_row([
            ("id", Cell::from(1_i64)),
            ("name", Cell::from("ada")),
            (
                "address",
                Cell::Composite(vec![("city".into(), Cell::from("london"))]),
            ),
        ])
        .unwrap();
    spread
        .add_row([("id", Cell::from(2_i64)), ("active", Cell::from(true))])
        .unwrap();
    spread.add_row([("name", Cell::from("grace"))]).unwrap();
    spread
}

fn written(spreads: &[Spread]) -> Vec<u8> {
    let mut writer = BlockWriter::new(Vec::new());
    for spread in spreads {
        writer.write(spread).unwrap();
    }
    writer.into_inner().unwrap()
}

fn reader_over(bytes: Vec<u8>) -> BlockReader {
    let mut reader = BlockReader::new();
    reader.set_stream(Cursor::new(bytes)).unwrap();
    reader
}

#[test]
fn test_block_read_offset_ordering() {
    let a = BlockReadOffset { start: 0, length: 10 };
    let b = BlockReadOffset { start: 0, length: 12 };
    let c = BlockReadOffset { start: 10, length: 1 };

    assert!(a < b);
    assert!(b < c);
    assert_eq!(c.end(), 11);
}

#[test]
fn test_empty_stream_has_no_blocks() {
    // Arrange
    let mut reader = reader_over(Vec::new());

    // Act
    let has_next = reader.has_next().unwrap();

    // Assert
    assert!(!has_next);
    assert_eq!(reader.block_read_count(), 0);
    assert!(reader.last_block_offset().is_none());
}

#[test]
fn test_write_then_read_spread() {
    // Arrange
    let bytes = written(&[people()]);
    let mut reader = reader_over(bytes);

    // Act
    assert!(reader.has_next().unwrap());
    let spread = reader.next().unwrap();

    // Assert
    assert_eq!(spread.row_count(), 3);
    assert_eq!(
        spread.column_names().collect::<Vec<_>>(),
        vec!["id", "name", "address", "active"]
    );
    let name = spread.column("name").unwrap();
    assert_eq!(name.get(2).unwrap().value().unwrap(), Some(PrimitiveValue::from("grace")));
    assert!(name.get(1).unwrap().is_null());
    let city = spread.column("address").unwrap().child("city").unwrap().unwrap();
    assert_eq!(city.get(0).unwrap().value().unwrap(), Some(PrimitiveValue::from("london")));
    assert!(spread.column("address").unwrap().get(1).unwrap().is_null());
    let active = spread.column("active").unwrap();
    assert_eq!(active.get(1).unwrap().value().unwrap(), Some(PrimitiveValue::Boolean(true)));
    assert!(!reader.has_next().unwrap());
    assert_eq!(reader.current_spread_size(), 4);
}

#[test]
fn test_write_rejects_columns_longer_than_row_count() {
    // Arrange
    let mut column = Column::new(ColumnType::Long, "x");
    for row in 0..3 {
        column.add(row, row as i64).unwrap();
    }
    let mut unset = Spread::new();
    unset.add_column(column);
    let mut short = unset.clone();
    short.set_row_count(2).unwrap();
    let mut writer = BlockWriter::new(Vec::new());

    // Act
    let without_row_count = writer.write(&unset);
    let with_short_row_count = writer.write(&short);

    // Assert
    assert!(matches!(without_row_count, Err(Error::IllegalState(_))));
    assert!(matches!(with_short_row_count, Err(Error::IllegalState(_))));
    assert_eq!(writer.stats().blocks, 0);
    assert!(writer.into_inner().unwrap().is_empty());
}

#[test]
fn test_stats_and_offsets_track_blocks() {
    // Arrange
    let mut writer = BlockWriter::new(Vec::new());
    let first = writer.write(&people()).unwrap();
    let second = writer.write(&people()).unwrap();
    let written_stats = *writer.stats();
    let bytes = writer.into_inner().unwrap();
    let mut reader = reader_over(bytes.clone());

    // Act
    reader.next_raw().unwrap();
    let after_first = reader.last_block_offset();
    reader.next_raw().unwrap();

    // Assert
    assert_eq!(first.start, 0);
    assert_eq!(second.start, first.end());
    assert_eq!(second.end(), bytes.len() as u64);
    assert_eq!(after_first, Some(first));
    assert_eq!(reader.last_block_offset(), Some(second));
    assert_eq!(reader.block_read_count(), 2);
    assert_eq!(*reader.stats(), written_stats);
    assert_eq!(written_stats.rows, 6);
    assert_eq!(written_stats.stream_bytes, bytes.len() as u64);
    assert!(written_stats.raw_bytes > 0);
}

#[test]
fn test_stats_merge() {
    let mut total = BlockStats {
        blocks: 1,
        rows: 10,
        stream_bytes: 100,
        raw_bytes: 80,
        logical_bytes: 40,
    };

    total.merge(&BlockStats {
        blocks: 2,
        rows: 5,
        stream_bytes: 50,
        raw_bytes: 30,
        logical_bytes: 20,
    });

    assert_eq!(total.blocks, 3);
    assert_eq!(total.rows, 15);
    assert_eq!(total.stream_bytes, 150);
    assert_eq!(total.raw_bytes, 110);
    assert_eq!(total.logical_bytes, 60);
}

#[test]
fn test_raw_pass_through_copy() {
    // Arrange
    let source = written(&[people()]);
    let mut reader = reader_over(source.clone());
    let mut copy = BlockWriter::new(Vec::new());

    // Act
    while reader.has_next().unwrap() {
        let (rows, chunks) = reader.next_raw().unwrap();
        copy.write_raw(rows, &chunks).unwrap();
    }

    // Assert
    assert_eq!(copy.into_inner().unwrap(), source);
}

#[test]
fn test_write_raw_rejects_oversized_chunk() {
    let bytes = written(&[people()]);
    let (_, chunks) = reader_over(bytes).next_raw().unwrap();
    let mut writer = BlockWriter::new(Vec::new());

    let result = writer.write_raw(1, &chunks);

    assert!(matches!(result, Err(Error::Corrupted(_))));
}

#[test]
fn test_flatten_links_from_setup() {
    // Arrange
    let mut reader = reader_over(written(&[people()]));
    let config = ReaderConfig {
        flatten: vec![
            FlattenColumnConfig {
                link_name: "city".to_string(),
                path: vec!["address".to_string(), "city".to_string()],
            },
            FlattenColumnConfig {
                link_name: "id".to_string(),
                path: vec!["id".to_string()],
            },
        ],
        ..ReaderConfig::default()
    };
    reader.setup(&config).unwrap();

    // Act
    let spread = reader.next().unwrap();

    // Assert
    assert_eq!(spread.column_names().collect::<Vec<_>>(), vec!["city", "id"]);
    assert_eq!(spread.row_count(), 3);
    assert_eq!(reader.current_spread_size(), 2);
    let city = spread.column("city").unwrap();
    assert_eq!(city.get(0).unwrap().value().unwrap(), Some(PrimitiveValue::from("london")));
}

#[test]
fn test_closed_reader_rejects_every_call() {
    // Arrange
    let mut reader = reader_over(written(&[people()]));

    // Act
    reader.close().unwrap();

    // Assert
    assert!(reader.is_closed());
    assert!(matches!(reader.has_next(), Err(Error::IllegalState(_))));
    assert!(matches!(reader.next(), Err(Error::IllegalState(_))));
    assert!(matches!(reader.next_raw(), Err(Error::IllegalState(_))));
    assert!(matches!(reader.set_stream(Cursor::new(Vec::new())), Err(Error::IllegalState(_))));
    assert!(matches!(reader.close(), Err(Error::IllegalState(_))));
}

#[test]
fn test_reader_without_stream() {
    let mut reader = BlockReader::new();

    assert!(matches!(reader.has_next(), Err(Error::IllegalState(_))));
}

#[test]
fn test_next_past_end_is_illegal_state() {
    let mut reader = reader_over(written(&[people()]));
    reader.next().unwrap();

    let result = reader.next();

    assert!(matches!(result, Err(Error::IllegalState(_))));
}

#[test]
fn test_bad_magic_is_corrupted() {
    let mut reader = reader_over(b"NOPE\0\0\0\0".to_vec());

    assert!(matches!(reader.has_next(), Err(Error::Corrupted(_))));
}

#[test]
fn test_truncated_block_is_corrupted() {
    // Arrange
    let mut bytes = written(&[people()]);
    bytes.truncate(bytes.len() - 3);
    let mut reader = reader_over(bytes);

    // Act
    let result = reader.next_raw();

    // Assert
    assert!(matches!(result, Err(Error::Corrupted(_))));
}

#[test]
fn test_oversized_block_is_corrupted() {
    let mut reader = reader_over(written(&[people()]));
    reader
        .setup(&ReaderConfig {
            max_block_bytes: 16,
            ..ReaderConfig::default()
        })
        .unwrap();

    let result = reader.next_raw();

    assert!(matches!(result, Err(Error::Corrupted(_))));
}

#[test]
fn test_block_row_count_above_limit_is_corrupted() {
    // Arrange
    let (_, chunks) = reader_over(written(&[people()])).next_raw().unwrap();
    let mut writer = BlockWriter::new(Vec::new());
    writer.write_raw(u32::MAX as usize, &chunks).unwrap();
    let huge = writer.into_inner().unwrap();
    let mut default_limits = reader_over(huge);
    let mut tight_limits = reader_over(written(&[people()]));
    tight_limits
        .setup(&ReaderConfig {
            max_block_rows: 2,
            ..ReaderConfig::default()
        })
        .unwrap();

    // Act
    let huge_result = default_limits.next();
    let tight_result = tight_limits.next_raw();

    // Assert
    assert!(matches!(huge_result, Err(Error::Corrupted(_))));
    assert!(matches!(tight_result, Err(Error::Corrupted(_))));
    assert_eq!(default_limits.block_read_count(), 0);
}

#[test]
fn test_write_raw_rejects_header_fields_beyond_wire_range() {
    // Arrange
    let (rows, chunks) = reader_over(written(&[people()])).next_raw().unwrap();
    let mut raw_length = chunks.clone();
    raw_length[0].raw_length = u32::MAX;
    let mut unique_count = chunks.clone();
    unique_count[0].unique_count = Some(u32::MAX);
    let mut nested = chunks;
    let address = nested
        .iter_mut()
        .find(|chunk| chunk.column_name == "address")
        .unwrap();
    address.children[0].logical_length = i32::MAX as u32 + 1;
    let mut writer = BlockWriter::new(Vec::new());

    // Act
    let results = [
        writer.write_raw(rows, &raw_length),
        writer.write_raw(rows, &unique_count),
        writer.write_raw(rows, &nested),
    ];

    // Assert
    for result in results {
        assert!(matches!(result, Err(Error::Unsupported(_))));
    }
    assert!(writer.into_inner().unwrap().is_empty());
}

#[test]
fn test_read_blocks_from_file() {
    // Arrange
    let mut file = tempfile::NamedTempFile::new().unwrap();
    let mut writer = BlockWriter::new(Vec::new());
    writer.write(&people()).unwrap();
    writer.write(&people()).unwrap();
    file.write_all(&writer.into_inner().unwrap()).unwrap();
    file.flush().unwrap();

    let mut reader = BlockReader::new();
    reader.set_stream(File::open(file.path()).unwrap()).unwrap();

    // Act
    let mut rows = 0;
    while reader.has_next().unwrap() {
        rows += reader.next().unwrap().row_count();
    }
    reader.close().unwrap();

    // Assert
    assert_eq!(rows, 6);
    assert_eq!(reader.block_read_count(), 2);
}

#[test]
fn test_stats_serialize_for_progress_reports() {
    let stats = BlockStats {
        blocks: 2,
        rows: 6,
        ..BlockStats::default()
    };

    let json = serde_json::to_string(&stats).unwrap();
    let back: BlockStats = serde_json::from_str(&json).unwrap();

    assert!(json.contains("\"rows\":6"));
    assert_eq!(back, stats);
}
