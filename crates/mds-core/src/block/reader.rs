//! Sequential block stream reader.

use std::io::{self, BufRead, BufReader, Read};
use std::sync::Arc;

use bytes::Bytes;

use super::{decode_body, BlockReadOffset, BlockStats, HEADER_LEN, MAGIC};
use crate::binary::ColumnBinary;
use crate::config::ReaderConfig;
use crate::connector::{DefaultConnector, ValueConnector};
use crate::error::{Error, Result};
use crate::maker::decode_column;
use crate::spread::{FlattenColumn, FlattenFunction, Spread};

enum Stream {
    Uninitialized,
    Ready(Box<dyn BufRead + Send>),
    Closed,
}

impl std::fmt::Debug for Stream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Uninitialized => "Uninitialized",
            Self::Ready(_) => "Ready",
            Self::Closed => "Closed",
        })
    }
}

/// Pulls blocks from a byte stream, one at a time.
///
/// # Lifecycle
///
/// ```text
/// new() ──setup()/set_stream()──> Ready ──{has_next, next | next_raw}*──> close() ──> Closed
/// ```
///
/// Every call after [`BlockReader::close`] fails with [`Error::IllegalState`].
#[derive(Debug)]
pub struct BlockReader {
    stream: Stream,
    config: ReaderConfig,
    flatten: FlattenFunction,
    connector: Arc<dyn ValueConnector>,
    position: u64,
    stats: BlockStats,
    current_spread_size: usize,
    last_block_offset: Option<BlockReadOffset>,
}

impl Default for BlockReader {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockReader {
    /// Creates a reader with the default configuration and no stream.
    #[must_use]
    pub fn new() -> Self {
        Self {
            stream: Stream::Uninitialized,
            config: ReaderConfig::default(),
            flatten: FlattenFunction::new(),
            connector: Arc::new(DefaultConnector),
            position: 0,
            stats: BlockStats::default(),
            current_spread_size: 0,
            last_block_offset: None,
        }
    }

    /// Applies `config` and registers its flatten links.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IllegalState`] once the reader is closed.
    pub fn setup(&mut self, config: &ReaderConfig) -> Result<()> {
        self.ensure_open()?;
        for link in &config.flatten {
            if !self.flatten.add(FlattenColumn::from(link)) {
                tracing::debug!(link = %link.link_name, "duplicate flatten link ignored");
            }
        }
        self.config = config.clone();
        Ok(())
    }

    /// Attaches the stream to read blocks from, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IllegalState`] once the reader is closed.
    pub fn set_stream<R: Read + Send + 'static>(&mut self, reader: R) -> Result<()> {
        self.ensure_open()?;
        self.stream = Stream::Ready(Box::new(BufReader::new(reader)));
        self.position = 0;
        Ok(())
    }

    /// Sets the connector applied to every decoded value.
    pub fn set_connector(&mut self, connector: Arc<dyn ValueConnector>) {
        self.connector = connector;
    }

    /// Flatten links applied by [`BlockReader::next`].
    pub fn flatten_function_mut(&mut self) -> &mut FlattenFunction {
        &mut self.flatten
    }

    /// Returns true if another block follows. Consumes nothing.
    ///
    /// # Errors
    ///
    /// - [`Error::IllegalState`] without a stream or once closed
    /// - [`Error::Corrupted`] if the next bytes are not a block header
    pub fn has_next(&mut self) -> Result<bool> {
        let stream = self.stream_mut()?;
        let available = stream.fill_buf()?;
        if available.is_empty() {
            return Ok(false);
        }
        let prefix = available.len().min(MAGIC.len());
        if available[..prefix] != MAGIC[..prefix] {
            return Err(Error::corrupted("missing block magic"));
        }
        Ok(true)
    }

    /// Reads the next block and decodes it into a spread of lazy columns.
    ///
    /// Registered flatten links are applied to the decoded spread.
    ///
    /// # Errors
    ///
    /// See [`BlockReader::next_raw`]; chunk headers are checked here, payloads
    /// at first access.
    pub fn next(&mut self) -> Result<Spread> {
        let (rows, chunks) = self.next_raw()?;
        let mut spread = Spread::new();
        for chunk in chunks {
            let name = chunk.column_name.clone();
            let column = decode_column(chunk, rows, Arc::clone(&self.connector))?;
            spread.insert(name, Arc::new(column));
        }
        spread.set_row_count(rows)?;
        let spread = if self.flatten.is_flatten() {
            self.flatten.flatten(&spread)?
        } else {
            spread
        };
        self.current_spread_size = spread.column_count();
        Ok(spread)
    }

    /// Reads the next block without decoding its chunks.
    ///
    /// Returns the block row count and its chunks.
    ///
    /// # Errors
    ///
    /// - [`Error::IllegalState`] at end of stream, without a stream or once closed
    /// - [`Error::Corrupted`] for a malformed or truncated block, or one over
    ///   the configured byte or row limits
    pub fn next_raw(&mut self) -> Result<(usize, Vec<ColumnBinary>)> {
        if !self.has_next()? {
            return Err(Error::IllegalState("no more blocks".to_string()));
        }
        let max_block_bytes = self.config.max_block_bytes;
        let stream = self.stream_mut()?;

        let mut header = [0_u8; HEADER_LEN];
        read_fully(stream, &mut header, "block header")?;
        if header[..4] != MAGIC[..] {
            return Err(Error::corrupted("missing block magic"));
        }
        let body_len = u32::from_be_bytes([header[4], header[5], header[6], header[7]]) as usize;
        if body_len > max_block_bytes {
            return Err(Error::corrupted(format!(
                "block body of {body_len} bytes exceeds the {max_block_bytes} byte limit"
            )));
        }
        let mut body = vec![0_u8; body_len];
        read_fully(stream, &mut body, "block body")?;

        let (rows, chunks) = decode_body(Bytes::from(body))?;
        if rows > self.config.max_block_rows {
            return Err(Error::corrupted(format!(
                "block of {rows} rows exceeds the {} row limit",
                self.config.max_block_rows
            )));
        }
        let offset = BlockReadOffset {
            start: self.position,
            length: (HEADER_LEN + body_len) as u64,
        };
        self.position = offset.end();
        self.last_block_offset = Some(offset);
        self.stats.record(rows, HEADER_LEN + body_len, &chunks);
        tracing::debug!(
            rows,
            columns = chunks.len(),
            bytes = offset.length,
            start = offset.start,
            "block read"
        );
        Ok((rows, chunks))
    }

    /// Number of blocks read so far.
    #[must_use]
    pub fn block_read_count(&self) -> u64 {
        self.stats.blocks
    }

    /// Cumulative read statistics.
    #[must_use]
    pub fn stats(&self) -> &BlockStats {
        &self.stats
    }

    /// Number of top-level columns of the last spread returned by `next`.
    #[must_use]
    pub fn current_spread_size(&self) -> usize {
        self.current_spread_size
    }

    /// Stream position of the last block read.
    #[must_use]
    pub fn last_block_offset(&self) -> Option<BlockReadOffset> {
        self.last_block_offset
    }

    /// Returns true once [`BlockReader::close`] has been called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        matches!(self.stream, Stream::Closed)
    }

    /// Releases the stream.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IllegalState`] if the reader is already closed.
    pub fn close(&mut self) -> Result<()> {
        self.ensure_open()?;
        self.stream = Stream::Closed;
        tracing::debug!(blocks = self.stats.blocks, rows = self.stats.rows, "block reader closed");
        Ok(())
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_closed() {
            return Err(Error::IllegalState("block reader is closed".to_string()));
        }
        Ok(())
    }

    fn stream_mut(&mut self) -> Result<&mut (dyn BufRead + Send)> {
        match &mut self.stream {
            Stream::Ready(stream) => Ok(stream.as_mut()),
            Stream::Uninitialized => Err(Error::IllegalState("no stream attached".to_string())),
            Stream::Closed => Err(Error::IllegalState("block reader is closed".to_string())),
        }
    }
}

fn read_fully<R: Read + ?Sized>(stream: &mut R, buf: &mut [u8], what: &str) -> Result<()> {
    stream.read_exact(buf).map_err(|err| {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            Error::corrupted(format!("truncated {what}"))
        } else {
            Error::Io(err)
        }
    })
}
