//! Block streams: groups of column chunks sharing one row count.
//!
//! # Format
//!
//! ```text
//! ["MDSB"][u32 body-length][body]
//! body = [u32 row-count][u32 column-count][ColumnBinary × column-count]
//! ```
//!
//! Blocks are concatenated; a stream ends cleanly between two blocks.

mod reader;
mod stats;
mod writer;

#[cfg(test)]
mod tests;

pub use reader::BlockReader;
pub use stats::BlockStats;
pub use writer::BlockWriter;

use bytes::Bytes;

use crate::binary::codec::{get_len, put_len};
use crate::binary::ColumnBinary;
use crate::error::{Error, Result};

/// Magic bytes opening every block.
pub const MAGIC: &[u8; 4] = b"MDSB";

/// Size of the block header (magic + body length).
pub const HEADER_LEN: usize = 8;

/// Position of a block on its stream.
///
/// Orders by start offset, then by length.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlockReadOffset {
    /// Offset of the block header.
    pub start: u64,
    /// Length of the block, header included.
    pub length: u64,
}

impl BlockReadOffset {
    /// Offset one past the block.
    #[must_use]
    pub fn end(&self) -> u64 {
        self.start + self.length
    }
}

/// Serializes a block body.
pub(crate) fn encode_body(row_count: usize, chunks: &[ColumnBinary]) -> Vec<u8> {
    let size = 8 + chunks.iter().map(ColumnBinary::encoded_len).sum::<usize>();
    let mut body = Vec::with_capacity(size);
    put_len(&mut body, row_count);
    put_len(&mut body, chunks.len());
    for chunk in chunks {
        chunk.write_to(&mut body);
    }
    body
}

/// Parses a block body into its row count and chunks.
pub(crate) fn decode_body(body: Bytes) -> Result<(usize, Vec<ColumnBinary>)> {
    let mut buf = body;
    let row_count = get_len(&mut buf, "block row count")?;
    let column_count = get_len(&mut buf, "block column count")?;
    let chunks = (0..column_count)
        .map(|_| ColumnBinary::read_from(&mut buf))
        .collect::<Result<Vec<_>>>()?;
    if !buf.is_empty() {
        return Err(Error::corrupted(format!(
            "{} trailing bytes after block body",
            buf.len()
        )));
    }
    Ok((row_count, chunks))
}
