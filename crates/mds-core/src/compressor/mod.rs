//! Pluggable byte-array compressors resolved by string id.
//!
//! Every column chunk names the compressor that produced its payload, and
//! decoders look that id up in the process-wide [`registry`]. The registry
//! ships with [`IdentityCompressor`] and [`Lz4Compressor`]; callers can plug
//! in more with [`CompressorRegistry::register`].

mod identity;
mod lz4;

#[cfg(test)]
mod tests;

use std::fmt;
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

pub use identity::IdentityCompressor;
pub use lz4::Lz4Compressor;

use crate::error::{Error, Result};

/// Id of the compressor used when none is configured.
pub const DEFAULT_COMPRESSOR: &str = lz4::LZ4_ID;

/// Byte-array compressor.
///
/// Implementations must be deterministic, must round-trip exactly and must
/// accept empty input.
pub trait Compressor: Send + Sync {
    /// Registered id, written into every chunk this compressor produces.
    fn id(&self) -> &str;

    /// Compresses `input`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Compression`] if the input cannot be compressed.
    fn compress(&self, input: &[u8]) -> Result<Vec<u8>>;

    /// Restores bytes produced by [`Compressor::compress`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Compression`] for malformed input.
    fn decompress(&self, input: &[u8]) -> Result<Vec<u8>>;
}

impl fmt::Debug for dyn Compressor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Compressor").field("id", &self.id()).finish()
    }
}

/// Thread-safe map from compressor id to implementation.
#[derive(Default)]
pub struct CompressorRegistry {
    compressors: RwLock<FxHashMap<String, Arc<dyn Compressor>>>,
}

impl CompressorRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the built-in compressors.
    #[must_use]
    pub fn with_builtins() -> Self {
        let registry = Self::new();
        registry.register(Arc::new(IdentityCompressor));
        registry.register(Arc::new(Lz4Compressor));
        registry
    }

    /// Registers `compressor` under its id, replacing any previous entry.
    pub fn register(&self, compressor: Arc<dyn Compressor>) {
        let id = compressor.id().to_string();
        tracing::debug!(compressor = %id, "compressor registered");
        self.compressors.write().insert(id, compressor);
    }

    /// Looks up a compressor.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownCompressor`] if nothing is registered under `id`.
    pub fn get(&self, id: &str) -> Result<Arc<dyn Compressor>> {
        self.compressors
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| Error::UnknownCompressor(id.to_string()))
    }

    /// Returns true if `id` is registered.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.compressors.read().contains_key(id)
    }

    /// Registered ids, sorted.
    #[must_use]
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.compressors.read().keys().cloned().collect();
        ids.sort_unstable();
        ids
    }
}

impl fmt::Debug for CompressorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompressorRegistry")
            .field("ids", &self.ids())
            .finish()
    }
}

static REGISTRY: OnceLock<CompressorRegistry> = OnceLock::new();

/// Process-wide registry, initialized with the built-ins on first use.
pub fn registry() -> &'static CompressorRegistry {
    REGISTRY.get_or_init(CompressorRegistry::with_builtins)
}
