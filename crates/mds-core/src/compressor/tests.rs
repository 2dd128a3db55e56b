//! Tests for the `compressor` module

use std::sync::Arc;

use super::*;

#[derive(Debug)]
struct Reversing;

impl Compressor for Reversing {
    fn id(&self) -> &str {
        "reversing"
    }

    fn compress(&self, input: &[u8]) -> Result<Vec<u8>> {
        Ok(input.iter().rev().copied().collect())
    }

    fn decompress(&self, input: &[u8]) -> Result<Vec<u8>> {
        self.compress(input)
    }
}

#[test]
fn test_builtins_registered() {
    let registry = CompressorRegistry::with_builtins();

    assert_eq!(registry.ids(), vec!["identity".to_string(), "lz4".to_string()]);
    assert!(registry.contains(DEFAULT_COMPRESSOR));
}

#[test]
fn test_unknown_compressor() {
    let registry = CompressorRegistry::new();

    let result = registry.get("zstd");

    assert!(matches!(result, Err(Error::UnknownCompressor(id)) if id == "zstd"));
}

#[test]
fn test_lz4_roundtrip_including_empty() {
    // Arrange
    let lz4 = Lz4Compressor;
    let data: Vec<u8> = (0..4096u32).map(|i| (i % 7) as u8).collect();

    // Act
    let packed = lz4.compress(&data).unwrap();
    let empty = lz4.compress(&[]).unwrap();

    // Assert
    assert!(packed.len() < data.len());
    assert_eq!(lz4.decompress(&packed).unwrap(), data);
    assert!(lz4.decompress(&empty).unwrap().is_empty());
}

#[test]
fn test_lz4_rejects_garbage() {
    let result = Lz4Compressor.decompress(&[10, 0, 0, 0, 0xF0]);

    assert!(matches!(result, Err(Error::Compression { .. })));
}

#[test]
fn test_register_custom_compressor() {
    // Arrange
    let registry = CompressorRegistry::new();
    registry.register(Arc::new(Reversing));

    // Act
    let compressor = registry.get("reversing").unwrap();

    // Assert
    assert_eq!(compressor.compress(b"abc").unwrap(), b"cba".to_vec());
}

#[test]
fn test_global_registry_has_builtins() {
    assert!(registry().get("identity").is_ok());
    assert!(registry().get("lz4").is_ok());
}
