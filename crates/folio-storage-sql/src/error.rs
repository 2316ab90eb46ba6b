//! SQL storage error conversion.

use folio_storage::StorageError;
use sqlx::Error as SqlxError;

/// Converts a `SQLx` error to a storage error.
#[allow(clippy::needless_pass_by_value)]
pub fn from_sqlx_error(err: SqlxError) -> StorageError {
    match err {
        SqlxError::Database(db_err) if db_err.is_unique_violation() => {
            StorageError::AlreadyExists("OTP secret")
        }
        SqlxError::Database(db_err) => StorageError::Query(db_err.to_string()),
        SqlxError::ColumnDecode { .. } | SqlxError::Decode(_) => {
            StorageError::InvalidData(err.to_string())
        }
        SqlxError::PoolTimedOut => StorageError::Connection("Connection pool timeout".to_string()),
        SqlxError::PoolClosed => StorageError::Connection("Connection pool closed".to_string()),
        SqlxError::Io(_) | SqlxError::Tls(_) => StorageError::Connection(err.to_string()),
        _ => StorageError::Query(err.to_string()),
    }
}
