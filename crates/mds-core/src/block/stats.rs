//! Cumulative block statistics.

use serde::{Deserialize, Serialize};

use crate::binary::ColumnBinary;

/// Running totals kept by block readers and writers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockStats {
    /// Blocks processed.
    pub blocks: u64,
    /// Rows across all blocks.
    pub rows: u64,
    /// Bytes on the stream, framing included.
    pub stream_bytes: u64,
    /// Decompressed payload bytes of every chunk.
    pub raw_bytes: u64,
    /// Logical value bytes of every chunk.
    pub logical_bytes: u64,
}

impl BlockStats {
    /// Accounts for one block.
    pub(crate) fn record(&mut self, rows: usize, stream_bytes: usize, chunks: &[ColumnBinary]) {
        self.blocks += 1;
        self.rows += rows as u64;
        self.stream_bytes += stream_bytes as u64;
        for chunk in chunks {
            self.record_chunk(chunk);
        }
    }

    fn record_chunk(&mut self, chunk: &ColumnBinary) {
        self.raw_bytes += u64::from(chunk.raw_length);
        self.logical_bytes += u64::from(chunk.logical_length);
        for child in &chunk.children {
            self.record_chunk(child);
        }
    }

    /// Adds the totals of `other`, e.g. to aggregate several readers.
    pub fn merge(&mut self, other: &BlockStats) {
        self.blocks += other.blocks;
        self.rows += other.rows;
        self.stream_bytes += other.stream_bytes;
        self.raw_bytes += other.raw_bytes;
        self.logical_bytes += other.logical_bytes;
    }
}
