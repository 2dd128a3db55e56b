//! Pass-through compressor.

use super::Compressor;
use crate::error::Result;

/// Compressor id of [`IdentityCompressor`].
pub(crate) const IDENTITY_ID: &str = "identity";

/// Stores payloads uncompressed.
#[derive(Debug, Default, Clone, Copy)]
pub struct IdentityCompressor;

impl Compressor for IdentityCompressor {
    fn id(&self) -> &str {
        IDENTITY_ID
    }

    fn compress(&self, input: &[u8]) -> Result<Vec<u8>> {
        Ok(input.to_vec())
    }

    fn decompress(&self, input: &[u8]) -> Result<Vec<u8>> {
        Ok(input.to_vec())
    }
}
