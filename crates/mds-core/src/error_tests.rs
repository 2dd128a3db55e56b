//! Tests for `error` module

use super::error::*;

#[test]
fn test_error_codes_are_unique() {
    // Arrange
    let errors: Vec<Error> = vec![
        Error::Io(std::io::Error::other("test")),
        Error::Corrupted("test".into()),
        Error::Compression {
            compressor: "lz4".into(),
            message: "test".into(),
        },
        Error::UnknownCompressor("zz".into()),
        Error::UnknownMaker("zz".into()),
        Error::TypeMismatch {
            expected: "INTEGER".into(),
            actual: "STRING".into(),
        },
        Error::Unsupported("test".into()),
        Error::IllegalState("test".into()),
        Error::Config("test".into()),
    ];

    // Act
    let codes: Vec<&str> = errors.iter().map(Error::code).collect();

    // Assert
    let mut unique_codes = codes.clone();
    unique_codes.sort_unstable();
    unique_codes.dedup();
    assert_eq!(codes.len(), unique_codes.len(), "Error codes must be unique");
    for code in &codes {
        assert!(code.starts_with("MDS-"), "Code {code} should start with MDS-");
    }
}

#[test]
fn test_error_display_includes_code() {
    let err = Error::UnknownCompressor("snappy".into());

    let display = format!("{err}");

    assert!(display.contains("[MDS-004]"));
    assert!(display.contains("snappy"));
}

#[test]
fn test_io_error_converts() {
    let io = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "eof");

    let err: Error = io.into();

    assert_eq!(err.code(), "MDS-001");
    assert!(err.is_recoverable());
}

#[test]
fn test_contract_violations_are_not_recoverable() {
    assert!(!Error::Corrupted("x".into()).is_recoverable());
    assert!(!Error::Unsupported("x".into()).is_recoverable());
    assert!(!Error::IllegalState("x".into()).is_recoverable());
    assert!(Error::UnknownCompressor("x".into()).is_recoverable());
}
