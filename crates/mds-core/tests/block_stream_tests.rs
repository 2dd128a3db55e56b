//! End-to-end block streams: write, read back, project and filter.

use std::fs::File;
use std::io::{Cursor, Write};

use mds_core::{
    BlockReader, BlockWriter, Cell, CellIndex, Column, ColumnType, FilterOutcome,
    FlattenColumnConfig, MakerConfig, MdsConfig, Predicate, PrimitiveValue, RangeIndex,
    ReaderConfig, Spread, WriterConfig,
};
use proptest::prelude::*;

fn events(rows: i64) -> Spread {
    let mut spread = Spread::new();
    for i in 0..rows {
        let mut fields = vec![
            ("ts", Cell::from(1_000 + i)),
            (
                "device",
                Cell::Composite(vec![
                    ("id".into(), Cell::from(format!("d{}", i % 3))),
                    ("online".into(), Cell::from(i % 2 == 0)),
                ]),
            ),
        ];
        if i % 4 == 0 {
            fields.push(("note", Cell::from("checkpoint")));
        }
        spread.add_row(fields).unwrap();
    }
    spread
}

fn stream_of(spreads: &[Spread], config: WriterConfig) -> Vec<u8> {
    let mut writer = BlockWriter::with_config(Vec::new(), config);
    for spread in spreads {
        writer.write(spread).unwrap();
    }
    writer.into_inner().unwrap()
}

#[test]
fn test_empty_stream_scenario() {
    // Arrange
    let mut reader = BlockReader::new();
    reader.set_stream(Cursor::new(Vec::<u8>::new())).unwrap();

    // Act
    let mut blocks = 0;
    while reader.has_next().unwrap() {
        reader.next().unwrap();
        blocks += 1;
    }

    // Assert
    assert_eq!(blocks, 0);
    assert_eq!(reader.block_read_count(), 0);
    assert_eq!(reader.stats().rows, 0);
}

#[test]
fn test_nested_blocks_through_a_file() {
    // Arrange
    let config = WriterConfig {
        maker: MakerConfig::default(),
    };
    let bytes = stream_of(&[events(8), events(5)], config);
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&bytes).unwrap();
    file.flush().unwrap();

    let mut reader = BlockReader::new();
    reader.set_stream(File::open(file.path()).unwrap()).unwrap();

    // Act
    let first = reader.next().unwrap();
    let second = reader.next().unwrap();

    // Assert
    assert!(!reader.has_next().unwrap());
    assert_eq!(first.row_count(), 8);
    assert_eq!(second.row_count(), 5);
    assert_eq!(reader.stats().rows, 13);
    assert_eq!(reader.stats().stream_bytes, bytes.len() as u64);

    let device = first.column("device").unwrap();
    let id = device.child("id").unwrap().unwrap();
    assert_eq!(id.get(4).unwrap().value().unwrap(), Some(PrimitiveValue::from("d1")));
    let row = first.row(4).unwrap();
    assert_eq!(
        row.field("note").unwrap().value().unwrap(),
        Some(PrimitiveValue::from("checkpoint"))
    );
    assert!(first.row(5).unwrap().field("note").is_none());
}

#[test]
fn test_per_child_compressor_override() {
    // Arrange
    let mut maker = MakerConfig::default();
    maker
        .custom
        .insert("device".to_string(), MakerConfig::with_compressor("identity"));
    let bytes = stream_of(&[events(4)], WriterConfig { maker });
    let mut reader = BlockReader::new();
    reader.set_stream(Cursor::new(bytes)).unwrap();

    // Act
    let (_, chunks) = reader.next_raw().unwrap();

    // Assert
    let ts = chunks.iter().find(|c| c.column_name == "ts").unwrap();
    let device = chunks.iter().find(|c| c.column_name == "device").unwrap();
    assert_eq!(ts.compressor_id, "lz4");
    assert_eq!(device.compressor_id, "identity");
    assert!(device.children.iter().all(|c| c.compressor_id == "identity"));
}

#[test]
fn test_configured_flatten_projection() {
    // Arrange
    let config = MdsConfig::from_toml(
        r#"
        [[reader.flatten]]
        link_name = "device_id"
        path = ["device", "id"]

        [[reader.flatten]]
        link_name = "firmware"
        path = ["device", "firmware"]
        "#,
    )
    .unwrap();
    let mut reader = BlockReader::new();
    reader.setup(&config.reader).unwrap();
    reader
        .set_stream(Cursor::new(stream_of(&[events(3), events(3)], WriterConfig::default())))
        .unwrap();

    // Act
    let full = reader.next().unwrap();
    let path = reader
        .flatten_function_mut()
        .flatten_column_names("device_id")
        .map(<[String]>::to_vec);
    let pruned = reader.next().unwrap();

    // Assert
    assert_eq!(full.column_names().collect::<Vec<_>>(), vec!["device_id", "firmware"]);
    let firmware = full.column("firmware").unwrap();
    assert_eq!(firmware.column_type(), ColumnType::Null);
    assert!(firmware.get(0).unwrap().is_null());
    assert_eq!(path, Some(vec!["device".to_string(), "id".to_string()]));
    assert_eq!(pruned.column_names().collect::<Vec<_>>(), vec!["device_id"]);
    assert_eq!(reader.current_spread_size(), 1);
}

#[test]
fn test_duplicate_flatten_links_keep_first() {
    let config = ReaderConfig {
        flatten: vec![
            FlattenColumnConfig {
                link_name: "x".to_string(),
                path: vec!["ts".to_string()],
            },
            FlattenColumnConfig {
                link_name: "x".to_string(),
                path: vec!["note".to_string()],
            },
        ],
        ..ReaderConfig::default()
    };
    let mut reader = BlockReader::new();

    reader.setup(&config).unwrap();

    let function = reader.flatten_function_mut();
    assert_eq!(function.len(), 1);
    assert_eq!(function.link("x").unwrap().path(), &["ts".to_string()]);
}

#[test]
fn test_boolean_filter_pushdown_after_decode() {
    // Arrange
    let mut reader = BlockReader::new();
    reader
        .set_stream(Cursor::new(stream_of(&[events(6)], WriterConfig::default())))
        .unwrap();
    let spread = reader.next().unwrap();
    let online = spread
        .column("device")
        .unwrap()
        .child("online")
        .unwrap()
        .unwrap();

    // Act
    let outcome = online.filter(&Predicate::NotNull).unwrap();
    let trues = online.filter_rows(&Predicate::eq(true)).unwrap();

    // Assert
    assert!(matches!(outcome, FilterOutcome::Rows(ref rows) if rows.len() == 6));
    assert_eq!(trues.iter().collect::<Vec<_>>(), vec![0, 2, 4]);
}

#[test]
fn test_range_index_skips_column() {
    // Arrange
    let mut column = Column::new(ColumnType::Long, "ts");
    for (row, ts) in [10_i64, 20, 30].into_iter().enumerate() {
        column.add(row, ts).unwrap();
    }
    let index = RangeIndex::from_column(&column).unwrap().unwrap();
    column.set_index(CellIndex::from(index)).unwrap();

    // Act
    let outside = column.filter(&Predicate::gt(30_i64)).unwrap();
    let inside = column.filter_rows(&Predicate::range(15_i64, true, 30_i64, false)).unwrap();

    // Assert
    assert!(outside.is_definitely_empty());
    assert_eq!(inside.iter().collect::<Vec<_>>(), vec![1]);
}

fn predicates() -> impl Strategy<Value = Predicate> {
    prop_oneof![
        (-40_i64..40).prop_map(Predicate::eq),
        (-40_i64..40).prop_map(Predicate::lt),
        (-40_i64..40).prop_map(Predicate::le),
        (-40_i64..40).prop_map(Predicate::gt),
        (-40_i64..40).prop_map(Predicate::ge),
        (-40_i64..40, 0_i64..20, any::<bool>(), any::<bool>(), any::<bool>()).prop_map(
            |(lo, width, lo_inc, hi_inc, invert)| {
                if invert {
                    Predicate::not_range(lo, lo_inc, lo + width, hi_inc)
                } else {
                    Predicate::range(lo, lo_inc, lo + width, hi_inc)
                }
            }
        ),
    ]
}

proptest! {
    #[test]
    fn prop_decoded_range_index_agrees_with_scan(
        values in prop::collection::vec(prop::option::of(-30_i64..30), 1..24),
        predicate in predicates(),
    ) {
        // A column rebuilt from decoded cells carries a bound; whenever the
        // bound rules the predicate out, a scan must find nothing.
        let mut spread = Spread::new();
        for value in &values {
            spread.add_row([("v", Cell::from(*value))]).unwrap();
        }
        let mut reader = BlockReader::new();
        reader.set_stream(Cursor::new(stream_of(&[spread], WriterConfig::default()))).unwrap();

        let decoded = if reader.has_next().unwrap() { Some(reader.next().unwrap()) } else { None };
        let Some(column) = decoded.as_ref().and_then(|s| s.column("v").cloned()) else {
            prop_assert!(values.iter().all(Option::is_none));
            return Ok(());
        };

        let scanned = column.filter_rows(&predicate).unwrap();
        let Some(index) = RangeIndex::from_column(&column).unwrap() else {
            return Ok(());
        };
        if index.filter(&predicate).is_definitely_empty() {
            prop_assert!(scanned.is_empty(), "{:?} ruled out but rows {:?} match", predicate, scanned);
        }
    }
}
