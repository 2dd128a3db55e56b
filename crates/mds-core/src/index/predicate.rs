//! Filter predicates evaluated against cells or index summaries.

use std::cmp::Ordering;

use crate::column::PrimitiveValue;

/// Comparison operator of a [`Predicate::Compare`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// value == operand
    Eq,
    /// value < operand
    Lt,
    /// value <= operand
    Le,
    /// value > operand
    Gt,
    /// value >= operand
    Ge,
}

impl CompareOp {
    fn holds(self, ordering: Ordering) -> bool {
        match self {
            Self::Eq => ordering == Ordering::Equal,
            Self::Lt => ordering == Ordering::Less,
            Self::Le => ordering != Ordering::Greater,
            Self::Gt => ordering == Ordering::Greater,
            Self::Ge => ordering != Ordering::Less,
        }
    }
}

/// A single-column filter predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Row is null.
    Null,
    /// Row is not null.
    NotNull,
    /// `value <op> operand`
    Compare {
        /// Operator
        op: CompareOp,
        /// Right-hand operand
        operand: PrimitiveValue,
    },
    /// `min <(=) value <(=) max`, or its complement when `invert` is set.
    Range {
        /// Match values outside the range instead.
        invert: bool,
        /// Lower end
        min: PrimitiveValue,
        /// Lower end is inclusive
        min_inclusive: bool,
        /// Upper end
        max: PrimitiveValue,
        /// Upper end is inclusive
        max_inclusive: bool,
    },
}

impl Predicate {
    /// `value == operand`
    pub fn eq(operand: impl Into<PrimitiveValue>) -> Self {
        Self::compare(CompareOp::Eq, operand)
    }

    /// `value < operand`
    pub fn lt(operand: impl Into<PrimitiveValue>) -> Self {
        Self::compare(CompareOp::Lt, operand)
    }

    /// `value <= operand`
    pub fn le(operand: impl Into<PrimitiveValue>) -> Self {
        Self::compare(CompareOp::Le, operand)
    }

    /// `value > operand`
    pub fn gt(operand: impl Into<PrimitiveValue>) -> Self {
        Self::compare(CompareOp::Gt, operand)
    }

    /// `value >= operand`
    pub fn ge(operand: impl Into<PrimitiveValue>) -> Self {
        Self::compare(CompareOp::Ge, operand)
    }

    /// Generic comparison.
    pub fn compare(op: CompareOp, operand: impl Into<PrimitiveValue>) -> Self {
        Self::Compare {
            op,
            operand: operand.into(),
        }
    }

    /// Range predicate with explicit end inclusivity.
    pub fn range(
        min: impl Into<PrimitiveValue>,
        min_inclusive: bool,
        max: impl Into<PrimitiveValue>,
        max_inclusive: bool,
    ) -> Self {
        Self::Range {
            invert: false,
            min: min.into(),
            min_inclusive,
            max: max.into(),
            max_inclusive,
        }
    }

    /// Complement of [`Predicate::range`] over non-null values.
    pub fn not_range(
        min: impl Into<PrimitiveValue>,
        min_inclusive: bool,
        max: impl Into<PrimitiveValue>,
        max_inclusive: bool,
    ) -> Self {
        Self::Range {
            invert: true,
            min: min.into(),
            min_inclusive,
            max: max.into(),
            max_inclusive,
        }
    }

    /// Brute-force evaluation against one cell value (`None` = null).
    ///
    /// Comparisons against null or incomparable values never match.
    #[must_use]
    pub fn matches(&self, value: Option<&PrimitiveValue>) -> bool {
        match (self, value) {
            (Self::Null, v) => v.is_none(),
            (Self::NotNull, v) => v.is_some(),
            (_, None) => false,
            (Self::Compare { op, operand }, Some(v)) => {
                v.compare(operand).is_some_and(|ord| op.holds(ord))
            }
            (
                Self::Range {
                    invert,
                    min,
                    min_inclusive,
                    max,
                    max_inclusive,
                },
                Some(v),
            ) => {
                let (Some(lower), Some(upper)) = (v.compare(min), v.compare(max)) else {
                    return false;
                };
                let above_min = lower == Ordering::Greater || (*min_inclusive && lower == Ordering::Equal);
                let below_max = upper == Ordering::Less || (*max_inclusive && upper == Ordering::Equal);
                (above_min && below_max) != *invert
            }
        }
    }
}
