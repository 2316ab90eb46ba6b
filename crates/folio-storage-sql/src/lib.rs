//! # folio-storage-sql
//!
//! SQLx-based storage for the admin OTP secret.
//!
//! The secret lives in a one-row table (`otp_secret`); the primary key is a
//! constant `TRUE`, so the database itself refuses a second record.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod pool;
pub mod secret;

pub use pool::{create_pool, run_migrations};
pub use secret::PgSecretProvider;
