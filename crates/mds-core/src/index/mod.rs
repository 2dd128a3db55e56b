//! Cell indexes for filter pushdown.
//!
//! A [`CellIndex`] summarizes one column so a [`Predicate`] can sometimes be
//! decided without decoding a single value. Answers are sound but
//! incomplete: an index may prove that no row matches, or compute the exact
//! row set from its own summary, but it never claims that every row matches.
//!
//! ```text
//! filter(P) ─┬─ DefinitelyEmpty   skip the column
//!            ├─ Rows(bitmap)      exact answer from the summary
//!            └─ Unknown           scan cell by cell
//! ```

mod boolean;
mod predicate;
mod range;

#[cfg(test)]
mod tests;

use roaring::RoaringBitmap;

pub(crate) use boolean::BOOLEAN_NULL;
pub use boolean::SequentialBooleanIndex;
pub use predicate::{CompareOp, Predicate};
pub use range::RangeIndex;

/// Outcome of consulting a cell index.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterOutcome {
    /// No row of the column can satisfy the predicate.
    DefinitelyEmpty,
    /// The summary cannot decide; the caller must scan cells.
    Unknown,
    /// Exact set of matching rows, computed from the summary alone.
    Rows(RoaringBitmap),
}

impl FilterOutcome {
    /// Returns true for [`FilterOutcome::DefinitelyEmpty`].
    #[must_use]
    pub fn is_definitely_empty(&self) -> bool {
        matches!(self, Self::DefinitelyEmpty)
    }

    /// Returns true for [`FilterOutcome::Unknown`].
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }

    pub(crate) fn from_rows(rows: RoaringBitmap) -> Self {
        if rows.is_empty() {
            Self::DefinitelyEmpty
        } else {
            Self::Rows(rows)
        }
    }
}

/// Per-column summary consulted before scanning.
#[derive(Debug, Clone, Default)]
pub enum CellIndex {
    /// No summary; always defers.
    #[default]
    Default,
    /// Min/max bound over the non-null values.
    Range(RangeIndex),
    /// Dense tri-state boolean buffer.
    SequentialBoolean(SequentialBooleanIndex),
}

impl CellIndex {
    /// Evaluates `predicate` against the summary.
    #[must_use]
    pub fn filter(&self, predicate: &Predicate) -> FilterOutcome {
        match self {
            Self::Default => FilterOutcome::Unknown,
            Self::Range(index) => index.filter(predicate),
            Self::SequentialBoolean(index) => index.filter(predicate),
        }
    }
}

impl From<RangeIndex> for CellIndex {
    fn from(index: RangeIndex) -> Self {
        Self::Range(index)
    }
}

impl From<SequentialBooleanIndex> for CellIndex {
    fn from(index: SequentialBooleanIndex) -> Self {
        Self::SequentialBoolean(index)
    }
}
