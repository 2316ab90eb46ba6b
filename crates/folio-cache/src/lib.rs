//! # folio-cache
//!
//! The key cache behind folio's bearer tokens.
//!
//! Issued API keys live in one shared bucket with one expiration clock. Every
//! new key refreshes that clock, and when it finally runs out all keys expire
//! together. [`KeyCache`] is the seam handlers depend on;
//! [`InMemoryKeyCache`] is the process-local implementation.
//!
//! ## Example
//!
//! ```
//! use std::time::Duration;
//! use folio_cache::{InMemoryKeyCache, KeyCache};
//!
//! let cache = InMemoryKeyCache::new(Duration::from_secs(3600));
//! cache.add("a1b2c3d4e5f60718");
//! assert!(cache.contains("a1b2c3d4e5f60718"));
//! assert!(!cache.contains("ffffffffffffffff"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod memory;
pub mod provider;

pub use memory::{spawn_janitor, InMemoryKeyCache, MAX_TTL};
pub use provider::KeyCache;
