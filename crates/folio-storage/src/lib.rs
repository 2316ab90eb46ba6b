//! # folio-storage
//!
//! Storage abstraction for the admin OTP secret.
//!
//! Exactly one secret record exists per deployment. [`SecretProvider`] is
//! the interface the auth core reads it through; backends:
//!
//! - [`FileSecretProvider`] - a single file with owner-only permissions
//! - [`InMemorySecretProvider`] - volatile, for tests and throwaway runs
//! - `PgSecretProvider` in `folio-storage-sql` - one row in Postgres

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod file;
pub mod memory;
pub mod secret;

pub use error::{StorageError, StorageResult};
pub use file::FileSecretProvider;
pub use memory::InMemorySecretProvider;
pub use secret::{SecretProvider, SecretRecord};
