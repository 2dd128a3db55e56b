//! Block stream writer.

use std::io::Write;

use super::{encode_body, BlockReadOffset, BlockStats, HEADER_LEN, MAGIC};
use crate::binary::ColumnBinary;
use crate::column::ColumnType;
use crate::config::WriterConfig;
use crate::error::{Error, Result};
use crate::maker::encode_column;
use crate::spread::Spread;

/// Writes spreads as framed blocks to a byte sink.
#[derive(Debug)]
pub struct BlockWriter<W: Write> {
    inner: W,
    config: WriterConfig,
    position: u64,
    stats: BlockStats,
}

impl<W: Write> BlockWriter<W> {
    /// Creates a writer with the default configuration.
    pub fn new(inner: W) -> Self {
        Self::with_config(inner, WriterConfig::default())
    }

    /// Creates a writer encoding columns with `config`.
    pub fn with_config(inner: W, config: WriterConfig) -> Self {
        Self {
            inner,
            config,
            position: 0,
            stats: BlockStats::default(),
        }
    }

    /// Encodes every column of `spread` and writes them as one block.
    ///
    /// Columns of type NULL carry no data and are left out. Each chunk is
    /// named after its key in the spread.
    ///
    /// # Errors
    ///
    /// - [`Error::IllegalState`] if a column holds more rows than the spread's
    ///   row count, e.g. columns added without fixing the row count
    /// - any error of a column that fails to encode, or of the sink
    pub fn write(&mut self, spread: &Spread) -> Result<BlockReadOffset> {
        let rows = spread.row_count();
        let mut chunks = Vec::with_capacity(spread.column_count());
        for (name, column) in spread.columns() {
            if column.column_type() == ColumnType::Null {
                continue;
            }
            let mut chunk = encode_column(column, rows, self.config.maker.for_child(name))?;
            chunk.column_name = name.to_string();
            chunks.push(chunk);
        }
        self.write_raw(rows, &chunks)
    }

    /// Writes already encoded chunks as one block of `rows` rows.
    ///
    /// # Errors
    ///
    /// - [`Error::Corrupted`] if a chunk holds more values than `rows`
    /// - [`Error::Unsupported`] if `rows` or a chunk header field does not
    ///   fit the wire format
    /// - [`Error::Io`] if the sink fails
    pub fn write_raw(&mut self, rows: usize, chunks: &[ColumnBinary]) -> Result<BlockReadOffset> {
        if u32::try_from(rows).is_err() {
            return Err(Error::Unsupported(format!("block of {rows} rows")));
        }
        for chunk in chunks {
            if chunk.row_count as usize > rows {
                return Err(Error::corrupted(format!(
                    "column '{}': {} values in a block of {rows} rows",
                    chunk.column_name, chunk.row_count
                )));
            }
            chunk.check_wire_limits()?;
        }
        let body = encode_body(rows, chunks);
        let body_len = u32::try_from(body.len())
            .map_err(|_| Error::Unsupported(format!("block body of {} bytes", body.len())))?;

        self.inner.write_all(MAGIC)?;
        self.inner.write_all(&body_len.to_be_bytes())?;
        self.inner.write_all(&body)?;

        let length = (HEADER_LEN + body.len()) as u64;
        let offset = BlockReadOffset {
            start: self.position,
            length,
        };
        self.position += length;
        self.stats.record(rows, HEADER_LEN + body.len(), chunks);
        tracing::debug!(
            rows,
            columns = chunks.len(),
            bytes = length,
            start = offset.start,
            "block written"
        );
        Ok(offset)
    }

    /// Cumulative write statistics.
    #[must_use]
    pub fn stats(&self) -> &BlockStats {
        &self.stats
    }

    /// Flushes the sink.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the sink fails.
    pub fn flush(&mut self) -> Result<()> {
        self.inner.flush()?;
        Ok(())
    }

    /// Flushes and returns the sink.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the sink fails.
    pub fn into_inner(mut self) -> Result<W> {
        self.flush()?;
        Ok(self.inner)
    }
}
