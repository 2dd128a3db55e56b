//! Encoded column chunks.
//!
//! # Wire format
//!
//! ```text
//! [maker-id: str][compressor-id: str][column-name: str][column-type: u8]
//! [row-count: i32][raw-length: i32][logical-length: i32][unique-count: i32]
//! [payload-length: u32][payload]
//! [child-count: u32][child chunk × child-count]
//! ```
//!
//! Strings are `[u32 length][utf-8]`, integers big-endian. A unique count of
//! `-1` means unknown.

pub mod codec;


use bytes::{BufMut, Bytes};

use crate::column::ColumnType;
use crate::compressor;
use crate::error::{Error, Result};

use codec::{get_i32, get_len, get_str, get_u8, put_len, put_str, take};

/// Immutable descriptor of one encoded column chunk.
///
/// The payload is independently decompressible with the compressor named by
/// `compressor_id`. Nested columns carry their own chunks in `children`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnBinary {
    /// Id of the maker that produced the chunk.
    pub maker_id: String,
    /// Id of the compressor that produced the payload.
    pub compressor_id: String,
    /// Column name.
    pub column_name: String,
    /// Column type.
    pub column_type: ColumnType,
    /// Number of non-null values.
    pub row_count: u32,
    /// Payload length before compression.
    pub raw_length: u32,
    /// Size of the values the chunk stands for.
    pub logical_length: u32,
    /// Number of distinct values, when known.
    pub unique_count: Option<u32>,
    /// Compressed payload.
    pub payload: Bytes,
    /// Chunks of nested columns.
    pub children: Vec<ColumnBinary>,
}

impl ColumnBinary {
    /// Decompresses the payload and checks it against `raw_length`.
    ///
    /// # Errors
    ///
    /// - [`Error::UnknownCompressor`] if the compressor is not registered
    /// - [`Error::Compression`] if decompression fails
    /// - [`Error::Corrupted`] if the decompressed size does not match
    pub fn decompress(&self) -> Result<Bytes> {
        let compressor = compressor::registry().get(&self.compressor_id)?;
        let raw = compressor.decompress(&self.payload)?;
        if raw.len() != self.raw_length as usize {
            return Err(Error::corrupted(format!(
                "column '{}': decompressed {} bytes, header says {}",
                self.column_name,
                raw.len(),
                self.raw_length
            )));
        }
        Ok(Bytes::from(raw))
    }

    /// Checks that every header field, children included, fits the signed
    /// wire representation [`ColumnBinary::read_from`] accepts.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] naming the first field out of range.
    pub fn check_wire_limits(&self) -> Result<()> {
        let counts = [
            ("row count", Some(self.row_count)),
            ("raw length", Some(self.raw_length)),
            ("logical length", Some(self.logical_length)),
            ("unique count", self.unique_count),
        ];
        for (what, value) in counts {
            if let Some(n) = value.filter(|&n| i32::try_from(n).is_err()) {
                return Err(Error::Unsupported(format!(
                    "column '{}': {what} of {n} does not fit a chunk header",
                    self.column_name
                )));
            }
        }
        if u32::try_from(self.payload.len()).is_err() {
            return Err(Error::Unsupported(format!(
                "column '{}': payload of {} bytes does not fit a chunk header",
                self.column_name,
                self.payload.len()
            )));
        }
        self.children.iter().try_for_each(Self::check_wire_limits)
    }

    /// Exact number of bytes [`ColumnBinary::write_to`] produces.
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        let strings = 12 + self.maker_id.len() + self.compressor_id.len() + self.column_name.len();
        let header = 1 + 4 * 4 + 4;
        let children: usize = self.children.iter().map(Self::encoded_len).sum();
        strings + header + self.payload.len() + 4 + children
    }

    /// Serializes the chunk, children included.
    pub fn write_to(&self, out: &mut impl BufMut) {
        put_str(out, &self.maker_id);
        put_str(out, &self.compressor_id);
        put_str(out, &self.column_name);
        out.put_u8(self.column_type.code());
        out.put_u32(self.row_count);
        out.put_u32(self.raw_length);
        out.put_u32(self.logical_length);
        out.put_i32(self.unique_count.map_or(-1, |n| n as i32));
        put_len(out, self.payload.len());
        out.put_slice(&self.payload);
        put_len(out, self.children.len());
        for child in &self.children {
            child.write_to(out);
        }
    }

    /// Serializes the chunk into a fresh buffer.
    #[must_use]
    pub fn to_bytes(&self) -> Bytes {
        let mut out = Vec::with_capacity(self.encoded_len());
        self.write_to(&mut out);
        Bytes::from(out)
    }

    /// Reads one chunk from the front of `buf`. The payload is not copied.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Corrupted`] for truncated or malformed headers.
    pub fn read_from(buf: &mut Bytes) -> Result<Self> {
        let maker_id = get_str(buf, "maker id")?;
        let compressor_id = get_str(buf, "compressor id")?;
        let column_name = get_str(buf, "column name")?;
        let column_type = ColumnType::from_code(get_u8(buf, "column type")?)?;
        let row_count = non_negative(get_i32(buf, "row count")?, "row count")?;
        let raw_length = non_negative(get_i32(buf, "raw length")?, "raw length")?;
        let logical_length = non_negative(get_i32(buf, "logical length")?, "logical length")?;
        let unique_count = match get_i32(buf, "unique count")? {
            -1 => None,
            n => Some(non_negative(n, "unique count")?),
        };
        let payload_len = get_len(buf, "payload length")?;
        let payload = take(buf, payload_len, "payload")?;
        let child_count = get_len(buf, "child count")?;
        let children = (0..child_count)
            .map(|_| Self::read_from(buf))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            maker_id,
            compressor_id,
            column_name,
            column_type,
            row_count,
            raw_length,
            logical_length,
            unique_count,
            payload,
            children,
        })
    }

    /// Parses a buffer holding exactly one chunk.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Corrupted`] for malformed input or trailing bytes.
    pub fn from_bytes(bytes: Bytes) -> Result<Self> {
        let mut buf = bytes;
        let binary = Self::read_from(&mut buf)?;
        if !buf.is_empty() {
            return Err(Error::corrupted(format!(
                "{} trailing bytes after column chunk",
                buf.len()
            )));
        }
        Ok(binary)
    }
}

fn non_negative(value: i32, what: &str) -> Result<u32> {
    u32::try_from(value).map_err(|_| Error::corrupted(format!("negative {what}: {value}")))
}
