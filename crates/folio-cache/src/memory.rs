//! In-memory key cache.

use std::collections::HashSet;
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use tokio::task::JoinHandle;

use crate::provider::KeyCache;

/// Longest bucket lifetime the cache accepts; longer TTLs are clamped.
pub const MAX_TTL: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// The single bucket of issued keys.
#[derive(Debug)]
struct Bucket {
    tokens: HashSet<String>,
    expires_at: Instant,
}

impl Bucket {
    fn is_live(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// Process-local [`KeyCache`].
///
/// A `RwLock` guards the bucket: `contains` shares the read lock, `add`
/// takes the write lock for the whole read-append-refresh step so
/// concurrent logins never lose a token.
///
/// Expiry is checked lazily on every read. [`spawn_janitor`] additionally
/// frees the memory of a bucket nobody touches anymore.
#[derive(Debug)]
pub struct InMemoryKeyCache {
    bucket: RwLock<Option<Bucket>>,
    ttl: Duration,
}

impl InMemoryKeyCache {
    /// Creates an empty cache whose bucket lives for `ttl` after the last `add`.
    ///
    /// `ttl` is clamped to [`MAX_TTL`].
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            bucket: RwLock::new(None),
            ttl: ttl.min(MAX_TTL),
        }
    }

    fn add_at(&self, token: &str, now: Instant) {
        let expires_at = now.checked_add(self.ttl).unwrap_or(now);
        let mut bucket = self.bucket.write();
        match bucket.as_mut() {
            Some(live) if live.is_live(now) => {
                live.tokens.insert(token.to_string());
                live.expires_at = expires_at;
            }
            _ => {
                *bucket = Some(Bucket {
                    tokens: HashSet::from([token.to_string()]),
                    expires_at,
                });
            }
        }
    }

    fn contains_at(&self, token: &str, now: Instant) -> bool {
        self.bucket
            .read()
            .as_ref()
            .is_some_and(|b| b.is_live(now) && b.tokens.contains(token))
    }

    fn len_at(&self, now: Instant) -> usize {
        self.bucket
            .read()
            .as_ref()
            .filter(|b| b.is_live(now))
            .map_or(0, |b| b.tokens.len())
    }

    fn remaining_ttl_at(&self, now: Instant) -> Option<Duration> {
        self.bucket
            .read()
            .as_ref()
            .filter(|b| b.is_live(now))
            .map(|b| b.expires_at - now)
    }

    fn purge_expired_at(&self, now: Instant) -> bool {
        let mut bucket = self.bucket.write();
        if bucket.as_ref().is_some_and(|b| !b.is_live(now)) {
            *bucket = None;
            true
        } else {
            false
        }
    }
}

impl KeyCache for InMemoryKeyCache {
    fn add(&self, token: &str) {
        self.add_at(token, Instant::now());
    }

    fn contains(&self, token: &str) -> bool {
        self.contains_at(token, Instant::now())
    }

    fn clear(&self) {
        *self.bucket.write() = None;
    }

    fn len(&self) -> usize {
        self.len_at(Instant::now())
    }

    fn remaining_ttl(&self) -> Option<Duration> {
        self.remaining_ttl_at(Instant::now())
    }

    fn purge_expired(&self) -> bool {
        self.purge_expired_at(Instant::now())
    }
}

/// Starts a background task that purges the expired bucket every `interval`.
///
/// The task holds only a weak reference and stops on its own once the
/// cache is dropped.
#[must_use]
pub fn spawn_janitor(cache: &Arc<InMemoryKeyCache>, interval: Duration) -> JoinHandle<()> {
    let cache: Weak<InMemoryKeyCache> = Arc::downgrade(cache);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // The first tick completes immediately.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let Some(cache) = cache.upgrade() else {
                break;
            };
            if cache.purge_expired() {
                tracing::debug!("expired API key bucket purged");
            }
        }
    })
}
