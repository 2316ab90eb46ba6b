//! Storage error types.

use thiserror::Error;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// A record that must be unique already exists.
    #[error("{0} already exists")]
    AlreadyExists(&'static str),

    /// Stored data could not be interpreted.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Filesystem error.
    #[error("I/O error: {0}")]
    Io(String),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Connection(String),

    /// Database query error.
    #[error("Database query error: {0}")]
    Query(String),
}

impl StorageError {
    /// Checks if this is a uniqueness violation.
    #[must_use]
    pub const fn is_already_exists(&self) -> bool {
        matches!(self, Self::AlreadyExists(_))
    }
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn already_exists_error() {
        let err = StorageError::AlreadyExists("OTP secret");
        assert!(err.is_already_exists());
        assert_eq!(err.to_string(), "OTP secret already exists");
    }

    #[test]
    fn io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = StorageError::from(io);
        assert!(!err.is_already_exists());
        assert!(err.to_string().contains("denied"));
    }
}
