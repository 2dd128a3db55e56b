//! Index over the dense tri-state boolean buffer.

use bytes::Bytes;
use roaring::RoaringBitmap;

use super::predicate::Predicate;
use super::FilterOutcome;

/// Byte marking a null row in a dense boolean buffer.
pub(crate) const BOOLEAN_NULL: u8 = 2;

/// Answers null checks by scanning the boolean bytes directly.
///
/// Value predicates defer to the generic cell scan.
#[derive(Debug, Clone)]
pub struct SequentialBooleanIndex {
    buffer: Bytes,
}

impl SequentialBooleanIndex {
    /// Wraps a decompressed boolean buffer (one byte per row).
    #[must_use]
    pub fn new(buffer: Bytes) -> Self {
        Self { buffer }
    }

    /// Evaluates `predicate` without materializing any cell.
    #[must_use]
    pub fn filter(&self, predicate: &Predicate) -> FilterOutcome {
        match predicate {
            Predicate::Null => self.scan(|byte| byte == BOOLEAN_NULL),
            Predicate::NotNull => self.scan(|byte| byte != BOOLEAN_NULL),
            _ => FilterOutcome::Unknown,
        }
    }

    fn scan(&self, keep: impl Fn(u8) -> bool) -> FilterOutcome {
        let rows: RoaringBitmap = self
            .buffer
            .iter()
            .enumerate()
            .filter(|(_, byte)| keep(**byte))
            .map(|(row, _)| row as u32)
            .collect();
        FilterOutcome::from_rows(rows)
    }
}
