//! Tests for the `codec` module

use bytes::Bytes;
use proptest::prelude::*;

use super::{dump, positions, section};
use crate::column::{ColumnType, PrimitiveValue};
use crate::error::Error;

// =========================================================================
// Positions
// =========================================================================

#[test]
fn test_positions_encode_layout() {
    // Arrange
    let mut out = Vec::new();

    // Act
    positions::encode(&[1, 3, 200], &mut out);

    // Assert: count, then gaps 1, 2 and 197 (two-byte varint)
    assert_eq!(out, vec![0, 0, 0, 3, 1, 2, 0xC5, 0x01]);
    assert_eq!(positions::decode(&out).unwrap(), vec![1, 3, 200]);
}

#[test]
fn test_positions_empty() {
    let mut out = Vec::new();
    positions::encode(&[], &mut out);

    assert_eq!(out, vec![0, 0, 0, 0]);
    assert!(positions::decode(&out).unwrap().is_empty());
}

#[test]
fn test_positions_first_may_be_zero() {
    let mut out = Vec::new();
    positions::encode(&[0, 1], &mut out);

    assert_eq!(positions::decode(&out).unwrap(), vec![0, 1]);
}

#[test]
fn test_positions_reject_truncation_and_trailing() {
    assert!(matches!(positions::decode(&[0, 0, 0]), Err(Error::Corrupted(_))));
    assert!(matches!(positions::decode(&[0, 0, 0, 2, 1]), Err(Error::Corrupted(_))));
    assert!(matches!(positions::decode(&[0, 0, 0, 1, 0x81]), Err(Error::Corrupted(_))));
    assert!(matches!(positions::decode(&[0, 0, 0, 1, 1, 9]), Err(Error::Corrupted(_))));
}

#[test]
fn test_positions_reject_overflow_and_duplicates() {
    // u32::MAX, then a gap of one
    let overflow = [0, 0, 0, 2, 0xFF, 0xFF, 0xFF, 0xFF, 0x0F, 1];
    let too_wide = [0, 0, 0, 1, 0xFF, 0xFF, 0xFF, 0xFF, 0x1F];
    let duplicate = [0, 0, 0, 2, 4, 0];

    assert!(matches!(positions::decode(&overflow), Err(Error::Corrupted(_))));
    assert!(matches!(positions::decode(&too_wide), Err(Error::Corrupted(_))));
    assert!(matches!(positions::decode(&duplicate), Err(Error::Corrupted(_))));
}

proptest! {
    #[test]
    fn prop_positions_roundtrip(rows in proptest::collection::btree_set(any::<u32>(), 0..200)) {
        let rows: Vec<u32> = rows.into_iter().collect();
        let mut out = Vec::new();
        positions::encode(&rows, &mut out);
        prop_assert_eq!(positions::decode(&out).unwrap(), rows);
    }
}

// =========================================================================
// Sections
// =========================================================================

#[test]
fn test_section_frame_and_split() {
    // Arrange
    let framed = Bytes::from(section::frame(&[b"ab", b"", b"xyz"]));

    // Act
    let parts = section::split(&framed, 3).unwrap();

    // Assert
    assert_eq!(framed.len(), 3 * 4 + 5);
    assert_eq!(parts[0].as_ref(), b"ab");
    assert!(parts[1].is_empty());
    assert_eq!(parts[2].as_ref(), b"xyz");
}

#[test]
fn test_section_split_rejects_truncation_and_trailing() {
    let framed = Bytes::from(section::frame(&[b"ab"]));

    assert!(matches!(section::split(&framed, 2), Err(Error::Corrupted(_))));
    assert!(matches!(section::split(&framed.slice(..5), 1), Err(Error::Corrupted(_))));

    let mut extra = framed.to_vec();
    extra.push(0);
    assert!(matches!(section::split(&Bytes::from(extra), 1), Err(Error::Corrupted(_))));
}

// =========================================================================
// Value dumps
// =========================================================================

#[test]
fn test_dump_double_layout() {
    // Arrange
    let values = [PrimitiveValue::Double(3.5), PrimitiveValue::Double(7.25)];
    let mut out = Vec::new();

    // Act
    dump::write_values(&values, &mut out);

    // Assert
    assert_eq!(&out[..8], &3.5f64.to_be_bytes());
    assert_eq!(&out[8..], &7.25f64.to_be_bytes());
    assert_eq!(dump::parse_values(ColumnType::Double, &out).unwrap(), values.to_vec());
}

#[test]
fn test_dump_strings_are_length_prefixed() {
    let values = [PrimitiveValue::from("hé"), PrimitiveValue::from("")];
    let mut out = Vec::new();
    dump::write_values(&values, &mut out);

    assert_eq!(out, vec![0, 0, 0, 3, b'h', 0xC3, 0xA9, 0, 0, 0, 0]);
    assert_eq!(dump::parse_values(ColumnType::String, &out).unwrap(), values.to_vec());
}

#[test]
fn test_dump_rejects_bad_input() {
    assert!(matches!(
        dump::parse_values(ColumnType::Long, &[0; 7]),
        Err(Error::Corrupted(_))
    ));
    assert!(matches!(
        dump::parse_values(ColumnType::String, &[0, 0, 0, 2, 0xFF, 0xFE]),
        Err(Error::Corrupted(_))
    ));
    assert!(matches!(
        dump::parse_values(ColumnType::Bytes, &[0, 0, 0, 9, 1]),
        Err(Error::Corrupted(_))
    ));
    assert!(matches!(
        dump::parse_values(ColumnType::Spread, &[]),
        Err(Error::Unsupported(_))
    ));
}
