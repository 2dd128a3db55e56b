//! Tests for the `index` module

use bytes::Bytes;
use proptest::prelude::*;

use super::*;
use crate::column::PrimitiveValue;

fn rows(outcome: &FilterOutcome) -> Vec<u32> {
    match outcome {
        FilterOutcome::Rows(rows) => rows.iter().collect(),
        other => panic!("expected rows, got {other:?}"),
    }
}

// =========================================================================
// RangeIndex
// =========================================================================

#[test]
fn test_range_compare_boundaries() {
    // Arrange
    let index = RangeIndex::new(10, 20);

    // Act & Assert
    assert!(index.filter(&Predicate::lt(10)).is_definitely_empty());
    assert!(index.filter(&Predicate::lt(11)).is_unknown());
    assert!(index.filter(&Predicate::le(9)).is_definitely_empty());
    assert!(index.filter(&Predicate::le(10)).is_unknown());
    assert!(index.filter(&Predicate::gt(20)).is_definitely_empty());
    assert!(index.filter(&Predicate::gt(19)).is_unknown());
    assert!(index.filter(&Predicate::ge(21)).is_definitely_empty());
    assert!(index.filter(&Predicate::ge(20)).is_unknown());
    assert!(index.filter(&Predicate::eq(9)).is_definitely_empty());
    assert!(index.filter(&Predicate::eq(21)).is_definitely_empty());
    assert!(index.filter(&Predicate::eq(15)).is_unknown());
}

#[test]
fn test_range_predicate_disjoint_with_inclusivity() {
    let index = RangeIndex::new(10, 20);

    assert!(index.filter(&Predicate::range(0, true, 10, false)).is_definitely_empty());
    assert!(index.filter(&Predicate::range(0, true, 10, true)).is_unknown());
    assert!(index.filter(&Predicate::range(20, false, 30, true)).is_definitely_empty());
    assert!(index.filter(&Predicate::range(20, true, 30, true)).is_unknown());
    assert!(index.filter(&Predicate::range(12, true, 14, true)).is_unknown());
}

#[test]
fn test_range_predicate_unsatisfiable_is_empty() {
    let index = RangeIndex::new(10, 20);

    assert!(index.filter(&Predicate::range(15, true, 12, true)).is_definitely_empty());
    assert!(index.filter(&Predicate::range(15, true, 15, false)).is_definitely_empty());
    assert!(index.filter(&Predicate::range(15, true, 15, true)).is_unknown());
}

#[test]
fn test_inverted_range_empty_only_when_covering() {
    let index = RangeIndex::new(10, 20);

    assert!(index.filter(&Predicate::not_range(10, true, 20, true)).is_definitely_empty());
    assert!(index.filter(&Predicate::not_range(5, false, 25, false)).is_definitely_empty());
    assert!(index.filter(&Predicate::not_range(10, false, 20, true)).is_unknown());
    assert!(index.filter(&Predicate::not_range(12, true, 14, true)).is_unknown());
}

#[test]
fn test_range_defers_on_null_and_incomparable() {
    let index = RangeIndex::new("b", "m");

    assert!(index.filter(&Predicate::Null).is_unknown());
    assert!(index.filter(&Predicate::NotNull).is_unknown());
    assert!(index.filter(&Predicate::eq(3)).is_unknown());
    assert!(index.filter(&Predicate::eq("z")).is_definitely_empty());
}

#[test]
fn test_range_mixed_numeric_operands() {
    let index = RangeIndex::new(PrimitiveValue::Double(1.5), PrimitiveValue::Double(2.5));

    assert!(index.filter(&Predicate::gt(3_i64)).is_definitely_empty());
    assert!(index.filter(&Predicate::eq(2_i32)).is_unknown());
}

// =========================================================================
// SequentialBooleanIndex
// =========================================================================

#[test]
fn test_boolean_index_null_scan() {
    // Arrange
    let index = SequentialBooleanIndex::new(Bytes::from_static(&[1, 2, 0, 2]));

    // Act
    let nulls = index.filter(&Predicate::Null);
    let not_nulls = index.filter(&Predicate::NotNull);

    // Assert
    assert_eq!(rows(&nulls), vec![1, 3]);
    assert_eq!(rows(&not_nulls), vec![0, 2]);
    assert!(index.filter(&Predicate::eq(true)).is_unknown());
}

#[test]
fn test_boolean_index_no_nulls_is_empty() {
    let index = SequentialBooleanIndex::new(Bytes::from_static(&[1, 0]));

    assert!(index.filter(&Predicate::Null).is_definitely_empty());
}

#[test]
fn test_default_index_always_unknown() {
    let index = CellIndex::default();

    assert!(index.filter(&Predicate::Null).is_unknown());
    assert!(index.filter(&Predicate::eq(1)).is_unknown());
}

// =========================================================================
// Predicate
// =========================================================================

#[test]
fn test_predicate_matches_null_semantics() {
    assert!(Predicate::Null.matches(None));
    assert!(!Predicate::NotNull.matches(None));
    assert!(!Predicate::eq(1).matches(None));
    assert!(!Predicate::not_range(0, true, 1, true).matches(None));
    assert!(Predicate::not_range(0, true, 1, true).matches(Some(&PrimitiveValue::Integer(5))));
}

// =========================================================================
// Soundness
// =========================================================================

fn predicate_strategy() -> impl Strategy<Value = Predicate> {
    let operand = -25i32..25;
    prop_oneof![
        (0usize..5, operand.clone()).prop_map(|(op, v)| {
            let op = [CompareOp::Eq, CompareOp::Lt, CompareOp::Le, CompareOp::Gt, CompareOp::Ge][op];
            Predicate::compare(op, v)
        }),
        (
            any::<bool>(),
            operand.clone(),
            any::<bool>(),
            operand,
            any::<bool>()
        )
            .prop_map(|(invert, a, ai, b, bi)| if invert {
                Predicate::not_range(a, ai, b, bi)
            } else {
                Predicate::range(a, ai, b, bi)
            }),
    ]
}

proptest! {
    #[test]
    fn prop_range_index_is_sound(
        lo in -20i32..20,
        width in 0i32..15,
        predicate in predicate_strategy(),
    ) {
        let hi = lo + width;
        let index = RangeIndex::new(lo, hi);

        if index.filter(&predicate).is_definitely_empty() {
            for v in lo..=hi {
                prop_assert!(
                    !predicate.matches(Some(&PrimitiveValue::Integer(v))),
                    "{predicate:?} matches {v} inside [{lo}, {hi}]"
                );
            }
        }
    }
}
