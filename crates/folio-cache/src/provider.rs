//! Key cache trait.

use std::time::Duration;

/// Shared store of currently valid API keys.
///
/// Implementations hold a single bucket of tokens with a single expiry.
/// All methods are synchronous and must not block on I/O: the bearer gate
/// calls [`KeyCache::contains`] on every request.
///
/// Implementations must be linearizable: once `add` returns, every
/// `contains` that starts afterwards, on any thread, observes the token.
pub trait KeyCache: Send + Sync {
    /// Adds a token to the bucket.
    ///
    /// Creates the bucket with a fresh TTL if it is absent or expired,
    /// otherwise appends the token and refreshes the bucket's TTL.
    fn add(&self, token: &str);

    /// Returns `true` iff the bucket is live and holds `token`.
    fn contains(&self, token: &str) -> bool;

    /// Drops the whole bucket, invalidating every issued key.
    fn clear(&self);

    /// Number of tokens in the live bucket (zero once expired).
    fn len(&self) -> usize;

    /// Returns `true` when no live token exists.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Time left before the bucket expires, or `None` if there is no live bucket.
    fn remaining_ttl(&self) -> Option<Duration>;

    /// Removes the bucket if its TTL has elapsed.
    ///
    /// Returns `true` if an expired bucket was removed.
    fn purge_expired(&self) -> bool;
}
