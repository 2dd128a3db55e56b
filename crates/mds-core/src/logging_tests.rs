//! Tests for `logging` module

use super::config::LoggingConfig;
use super::error::Error;
use super::logging::init_logging;

#[test]
fn test_init_logging_rejects_unknown_level() {
    // Arrange
    let config = LoggingConfig {
        level: "verbose".to_string(),
        format: "text".to_string(),
    };

    // Act
    let result = init_logging(&config);

    // Assert
    assert!(matches!(result, Err(Error::Config(msg)) if msg.contains("verbose")));
}

#[test]
fn test_init_logging_rejects_unknown_format() {
    let config = LoggingConfig {
        level: "info".to_string(),
        format: "xml".to_string(),
    };

    assert!(matches!(init_logging(&config), Err(Error::Config(_))));
}

#[test]
fn test_init_logging_twice_is_ok() {
    // Arrange
    let config = LoggingConfig::default();

    // Act & Assert
    assert!(init_logging(&config).is_ok());
    assert!(init_logging(&config).is_ok());
}
