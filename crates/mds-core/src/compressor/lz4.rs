//! LZ4 block compressor.

use super::Compressor;
use crate::error::{Error, Result};

/// Compressor id of [`Lz4Compressor`].
pub(crate) const LZ4_ID: &str = "lz4";

/// LZ4 block format with the uncompressed size prepended (`lz4_flex`).
#[derive(Debug, Default, Clone, Copy)]
pub struct Lz4Compressor;

impl Compressor for Lz4Compressor {
    fn id(&self) -> &str {
        LZ4_ID
    }

    fn compress(&self, input: &[u8]) -> Result<Vec<u8>> {
        Ok(lz4_flex::compress_prepend_size(input))
    }

    fn decompress(&self, input: &[u8]) -> Result<Vec<u8>> {
        lz4_flex::decompress_size_prepended(input).map_err(|e| Error::Compression {
            compressor: LZ4_ID.to_string(),
            message: e.to_string(),
        })
    }
}
