//! Min/max bound index.

use std::cmp::Ordering;

use super::predicate::{CompareOp, Predicate};
use super::FilterOutcome;
use crate::column::{Column, PrimitiveValue};
use crate::error::Result;

/// Bound summary `[min, max]` over the non-null values of a column.
///
/// Only proves emptiness. Null predicates always defer since the bound
/// says nothing about null rows.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeIndex {
    min: PrimitiveValue,
    max: PrimitiveValue,
}

impl RangeIndex {
    /// Creates an index from known bounds.
    #[must_use]
    pub fn new(min: impl Into<PrimitiveValue>, max: impl Into<PrimitiveValue>) -> Self {
        Self {
            min: min.into(),
            max: max.into(),
        }
    }

    /// Computes the bound of a realized column.
    ///
    /// Returns `None` when the column has no non-null value or holds values
    /// that do not compare with each other.
    ///
    /// # Errors
    ///
    /// Propagates deferred decode failures of lazy columns and cells.
    pub fn from_column(column: &Column) -> Result<Option<Self>> {
        let mut bound: Option<(PrimitiveValue, PrimitiveValue)> = None;
        for row in 0..column.size()? {
            let Some(value) = column.get(row)?.value()? else {
                continue;
            };
            bound = match bound {
                None => Some((value.clone(), value)),
                Some((min, max)) => {
                    let (Some(lo), Some(hi)) = (value.compare(&min), value.compare(&max)) else {
                        return Ok(None);
                    };
                    let min = if lo == Ordering::Less { value.clone() } else { min };
                    let max = if hi == Ordering::Greater { value } else { max };
                    Some((min, max))
                }
            };
        }
        Ok(bound.map(|(min, max)| Self { min, max }))
    }

    /// Lower bound.
    #[must_use]
    pub fn min(&self) -> &PrimitiveValue {
        &self.min
    }

    /// Upper bound.
    #[must_use]
    pub fn max(&self) -> &PrimitiveValue {
        &self.max
    }

    /// Decides emptiness of `predicate` over `[min, max]`.
    #[must_use]
    pub fn filter(&self, predicate: &Predicate) -> FilterOutcome {
        let empty = match predicate {
            Predicate::Null | Predicate::NotNull => None,
            Predicate::Compare { op, operand } => self.compare_is_empty(*op, operand),
            Predicate::Range {
                invert: false,
                min,
                min_inclusive,
                max,
                max_inclusive,
            } => self.range_is_empty(min, *min_inclusive, max, *max_inclusive),
            Predicate::Range {
                invert: true,
                min,
                min_inclusive,
                max,
                max_inclusive,
            } => self.covered_by(min, *min_inclusive, max, *max_inclusive),
        };
        match empty {
            Some(true) => FilterOutcome::DefinitelyEmpty,
            _ => FilterOutcome::Unknown,
        }
    }

    fn compare_is_empty(&self, op: CompareOp, operand: &PrimitiveValue) -> Option<bool> {
        let to_min = operand.compare(&self.min)?;
        let to_max = operand.compare(&self.max)?;
        Some(match op {
            CompareOp::Eq => to_min == Ordering::Less || to_max == Ordering::Greater,
            CompareOp::Lt => to_min != Ordering::Greater,
            CompareOp::Le => to_min == Ordering::Less,
            CompareOp::Gt => to_max != Ordering::Less,
            CompareOp::Ge => to_max == Ordering::Greater,
        })
    }

    fn range_is_empty(
        &self,
        min: &PrimitiveValue,
        min_inclusive: bool,
        max: &PrimitiveValue,
        max_inclusive: bool,
    ) -> Option<bool> {
        // An unsatisfiable predicate range matches nothing anywhere.
        match min.compare(max)? {
            Ordering::Greater => return Some(true),
            Ordering::Equal if !(min_inclusive && max_inclusive) => return Some(true),
            _ => {}
        }
        let upper_vs_lo = max.compare(&self.min)?;
        let lower_vs_hi = min.compare(&self.max)?;
        let below = upper_vs_lo == Ordering::Less || (upper_vs_lo == Ordering::Equal && !max_inclusive);
        let above = lower_vs_hi == Ordering::Greater || (lower_vs_hi == Ordering::Equal && !min_inclusive);
        Some(below || above)
    }

    fn covered_by(
        &self,
        min: &PrimitiveValue,
        min_inclusive: bool,
        max: &PrimitiveValue,
        max_inclusive: bool,
    ) -> Option<bool> {
        let lower = min.compare(&self.min)?;
        let upper = max.compare(&self.max)?;
        let covers_lo = lower == Ordering::Less || (lower == Ordering::Equal && min_inclusive);
        let covers_hi = upper == Ordering::Greater || (upper == Ordering::Equal && max_inclusive);
        Some(covers_lo && covers_hi)
    }
}
