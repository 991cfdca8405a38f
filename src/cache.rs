//! Single-slot TTL cache.
//!
//! [`TtlCache`] holds at most one value together with an expiration instant.
//! Readers share a read lock; `set`, `clear` and `cleanup` take the write lock
//! for their whole read-modify-write, so a reader never observes a half-written
//! slot.
//!
//! The cache itself never special-cases a zero TTL. A value set with a zero TTL
//! is simply already expired; callers that want "caching disabled" semantics
//! must check [`CacheSettings::is_enabled`] themselves.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;

/// Default interval between cleanup passes (10 seconds).
pub const DEFAULT_CLEANUP_INTERVAL: Duration = Duration::from_secs(10);

/// Construction parameters for a [`TtlCache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheSettings {
    /// Time-to-live of a stored value. Zero disables caching at the caller.
    pub ttl: Duration,
    /// Byte budget. Advisory only, never enforced.
    pub max_size: u64,
    /// Minimum time between two cleanup passes.
    pub cleanup_interval: Duration,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl: Duration::ZERO,
            max_size: 0,
            cleanup_interval: DEFAULT_CLEANUP_INTERVAL,
        }
    }
}

impl CacheSettings {
    /// Create settings with the given TTL and default size/cleanup values.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl,
            ..Self::default()
        }
    }

    /// Whether the owner of the cache should consult it at all.
    pub fn is_enabled(&self) -> bool {
        !self.ttl.is_zero()
    }
}

#[derive(Debug)]
struct Slot<T> {
    value: Option<T>,
    /// `None` is the zero expiration: nothing stored, or dropped by cleanup.
    expiration: Option<Instant>,
    last_cleanup: Instant,
}

impl<T> Slot<T> {
    fn is_live(&self, now: Instant) -> bool {
        match (&self.value, self.expiration) {
            (Some(_), Some(expiration)) => now < expiration,
            _ => false,
        }
    }

    fn reset(&mut self) {
        self.value = None;
        self.expiration = None;
    }
}

/// Thread-safe holder of one value with a time-to-live.
pub struct TtlCache<T> {
    slot: RwLock<Slot<T>>,
    ttl: Duration,
    max_size: u64,
    current_size: AtomicU64,
    cleanup_interval: Duration,
}

impl<T> std::fmt::Debug for TtlCache<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtlCache")
            .field("ttl", &self.ttl)
            .field("max_size", &self.max_size)
            .field("cleanup_interval", &self.cleanup_interval)
            .finish_non_exhaustive()
    }
}

impl<T: Clone> TtlCache<T> {
    /// Create an empty cache. The cleanup clock starts now.
    pub fn new(settings: CacheSettings) -> Self {
        Self {
            slot: RwLock::new(Slot {
                value: None,
                expiration: None,
                last_cleanup: Instant::now(),
            }),
            ttl: settings.ttl,
            max_size: settings.max_size,
            current_size: AtomicU64::new(0),
            cleanup_interval: settings.cleanup_interval,
        }
    }

    /// Return a clone of the stored value if present and not yet expired.
    ///
    /// A miss does not evict; that is left to [`set`](Self::set),
    /// [`clear`](Self::clear) or [`cleanup`](Self::cleanup).
    pub async fn get(&self) -> Option<T> {
        let slot = self.slot.read().await;
        if slot.is_live(Instant::now()) {
            slot.value.clone()
        } else {
            None
        }
    }

    /// Replace the slot and restart the TTL.
    pub async fn set(&self, value: T) {
        let mut slot = self.slot.write().await;
        slot.value = Some(value);
        slot.expiration = Some(Instant::now() + self.ttl);
    }

    /// Equivalent to "`get` would miss", without cloning the value.
    pub async fn is_expired(&self) -> bool {
        !self.slot.read().await.is_live(Instant::now())
    }

    /// Drop the stored value unconditionally.
    pub async fn clear(&self) {
        self.slot.write().await.reset();
        self.current_size.store(0, Ordering::Relaxed);
    }

    /// Drop an expired value if the cleanup interval has elapsed.
    ///
    /// Returns `false` without touching anything when called before the
    /// interval is up. Otherwise records the pass and returns `true`, whether
    /// or not a value was dropped.
    pub async fn cleanup(&self) -> bool {
        let mut slot = self.slot.write().await;
        let now = Instant::now();
        if now.duration_since(slot.last_cleanup) < self.cleanup_interval {
            return false;
        }

        if slot.value.is_some() && !slot.is_live(now) {
            slot.reset();
            self.current_size.store(0, Ordering::Relaxed);
            tracing::trace!("Dropped expired cache entry");
        }

        slot.last_cleanup = now;
        true
    }

    /// Whether the cleanup interval has elapsed since the last pass.
    pub async fn should_cleanup(&self) -> bool {
        let slot = self.slot.read().await;
        Instant::now().duration_since(slot.last_cleanup) >= self.cleanup_interval
    }
}

impl<T> TtlCache<T> {
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn max_size(&self) -> u64 {
        self.max_size
    }

    /// Estimated size in bytes. Not tracked by `set`, so this stays at zero.
    pub fn current_size(&self) -> u64 {
        self.current_size.load(Ordering::Relaxed)
    }

    pub fn cleanup_interval(&self) -> Duration {
        self.cleanup_interval
    }
}
