//! Error types for the cache and configuration store
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Store Error Enum ==
/// Unified error type for the storage engine.
///
/// Absence (a cache miss, an unknown configuration) is never an error; it is
/// reported through `Option` or an empty `Vec`.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The storage engine rejected or failed an operation
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// The database location could not be prepared
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A delivered configuration snapshot could not be decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration versions are non-negative
    #[error("Invalid configuration version: {0}")]
    InvalidVersion(i64),
}

// == Result Type Alias ==
/// Convenience Result type for the storage engine.
pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_display() {
        let err = StoreError::from(rusqlite::Error::QueryReturnedNoRows);
        assert!(err.to_string().starts_with("Storage error:"));
    }

    #[test]
    fn test_serialization_error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: StoreError = json_err.into();
        assert!(matches!(err, StoreError::Serialization(_)));
    }

    #[test]
    fn test_invalid_version_display() {
        assert_eq!(
            StoreError::InvalidVersion(-3).to_string(),
            "Invalid configuration version: -3"
        );
    }
}
