//! Domain error types
//!
//! Infrastructure-level failures only: a store that cannot be reached, a
//! malformed configuration, an unreadable extract. Per-field validation
//! failures and row rejections are data, carried on the records themselves,
//! and never surface through this enum.

use thiserror::Error;

/// Main Tamiz error type
///
/// Wraps specific failure classes without exposing third-party types.
#[derive(Debug, Error)]
pub enum TamizError {
    /// Configuration-related errors (missing salt, bad TOML, invalid values)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Target store errors (connectivity, transaction failure)
    #[error("Database error: {0}")]
    Database(String),

    /// Extract reading errors (unreadable CSV file)
    #[error("Extract error: {0}")]
    Extract(String),

    /// Error sink write failures
    #[error("Reject sink error: {0}")]
    Sink(String),

    /// Load orchestration errors
    #[error("Load error: {0}")]
    Load(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for TamizError {
    fn from(err: std::io::Error) -> Self {
        TamizError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for TamizError {
    fn from(err: serde_json::Error) -> Self {
        TamizError::Serialization(err.to_string())
    }
}

impl From<csv::Error> for TamizError {
    fn from(err: csv::Error) -> Self {
        TamizError::Extract(err.to_string())
    }
}

impl From<toml::de::Error> for TamizError {
    fn from(err: toml::de::Error) -> Self {
        TamizError::Configuration(format!("TOML parse error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TamizError::Configuration("salt missing".to_string());
        assert_eq!(err.to_string(), "Configuration error: salt missing");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err: TamizError = io_err.into();
        assert!(matches!(err, TamizError::Io(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("a = b = c").unwrap_err();
        let err: TamizError = toml_err.into();
        assert!(matches!(err, TamizError::Configuration(_)));
        assert!(err.to_string().contains("TOML parse error"));
    }

    #[test]
    fn test_implements_std_error() {
        let err = TamizError::Database("down".to_string());
        let _: &dyn std::error::Error = &err;
    }
}
