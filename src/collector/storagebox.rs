//! Cached Storage Box collector.
//!
//! Each [`collect`](Collector::collect) call runs one pass of:
//!
//! 1. cache lookup (skipped entirely when the TTL is zero),
//! 2. upstream fetch on a miss, bounded by [`DEFAULT_FETCH_TIMEOUT`],
//! 3. projection of every record, followed by the scrape duration gauge,
//!
//! or, when the fetch fails, classification of the error. The engine counters
//! are emitted at the end of every pass regardless of the outcome.
//!
//! Concurrent scrapes racing on a cold or expired cache may each fetch and
//! each store their result; the last write wins.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::{Instant, timeout};

use crate::cache::{CacheSettings, TtlCache};
use crate::hetzner::{ApiError, StorageBox};
use crate::metrics::{Measurement, MetricDesc, MetricSink};

use super::classify::ErrorKind;
use super::counters::{CounterSnapshot, EngineCounters};
use super::descriptors::{COUNTER_DESCRIPTORS, RESOURCE_DESCRIPTORS, SCRAPE_DURATION};
use super::projection::project_storage_box;
use super::traits::{Collector, StorageBoxSource};

/// Upper bound for one upstream call (30 seconds).
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Records of one successful fetch, shared between the cache and scrapes.
pub type Snapshot = Arc<Vec<StorageBox>>;

/// Collector that republishes Storage Box records as measurements.
pub struct StorageBoxCollector<S> {
    source: S,
    cache: TtlCache<Snapshot>,
    cache_enabled: bool,
    counters: EngineCounters,
    fetch_timeout: Duration,
}

impl<S> std::fmt::Debug for StorageBoxCollector<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageBoxCollector")
            .field("cache", &self.cache)
            .field("cache_enabled", &self.cache_enabled)
            .field("fetch_timeout", &self.fetch_timeout)
            .finish_non_exhaustive()
    }
}

impl<S: StorageBoxSource> StorageBoxCollector<S> {
    /// Create a collector. A zero `settings.ttl` disables caching: every
    /// scrape then fetches upstream and the cache counters stay at zero.
    pub fn new(source: S, settings: CacheSettings) -> Self {
        let cache_enabled = settings.is_enabled();
        if cache_enabled {
            tracing::info!(
                ttl = ?settings.ttl,
                cleanup_interval = ?settings.cleanup_interval,
                max_size = settings.max_size,
                "Storage box cache enabled"
            );
        } else {
            tracing::info!("Storage box cache disabled, fetching on every scrape");
        }

        Self {
            source,
            cache: TtlCache::new(settings),
            cache_enabled,
            counters: EngineCounters::new(),
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }

    /// Override the upstream deadline.
    pub fn with_fetch_timeout(mut self, fetch_timeout: Duration) -> Self {
        self.fetch_timeout = fetch_timeout;
        self
    }

    pub fn cache_enabled(&self) -> bool {
        self.cache_enabled
    }

    pub fn cache(&self) -> &TtlCache<Snapshot> {
        &self.cache
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Current values of the engine counters.
    pub fn counters(&self) -> CounterSnapshot {
        self.counters.snapshot()
    }

    /// Resolve the records for this scrape, from cache or upstream.
    async fn snapshot(&self) -> Result<Snapshot, ApiError> {
        if !self.cache_enabled {
            return self.fetch().await;
        }

        if self.cache.should_cleanup().await {
            self.cache.cleanup().await;
        }

        if let Some(snapshot) = self.cache.get().await {
            self.counters.record_cache_hit();
            tracing::debug!(count = snapshot.len(), "Serving storage boxes from cache");
            return Ok(snapshot);
        }

        self.counters.record_cache_miss();
        tracing::debug!("Storage box cache miss");

        let snapshot = self.fetch().await?;
        self.cache.set(Arc::clone(&snapshot)).await;
        Ok(snapshot)
    }

    /// One upstream call. Dropping the call on timeout leaves the cache alone.
    async fn fetch(&self) -> Result<Snapshot, ApiError> {
        let start = Instant::now();
        let boxes = timeout(self.fetch_timeout, self.source.list_storage_boxes())
            .await
            .map_err(|_| ApiError::Timeout(self.fetch_timeout))??;

        tracing::debug!(
            count = boxes.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Fetched storage boxes from upstream"
        );
        Ok(Arc::new(boxes))
    }

    fn handle_failure(&self, err: &ApiError) {
        let kind = ErrorKind::of(err);
        self.counters.record_failure(kind);

        let status = err.status_code();
        let request_id = err.request_id();
        match kind {
            ErrorKind::Auth => tracing::error!(
                kind = %kind, status = ?status, request_id = ?request_id, error = %err,
                "Authentication failed fetching storage boxes, check the API token"
            ),
            ErrorKind::RateLimit => tracing::warn!(
                kind = %kind, status = ?status, request_id = ?request_id, error = %err,
                "Rate limited fetching storage boxes"
            ),
            ErrorKind::Server => tracing::warn!(
                kind = %kind, status = ?status, request_id = ?request_id, error = %err,
                "Hetzner API server error fetching storage boxes"
            ),
            ErrorKind::Client => tracing::error!(
                kind = %kind, status = ?status, request_id = ?request_id, error = %err,
                "Hetzner API rejected storage box request"
            ),
            ErrorKind::Network => tracing::warn!(
                kind = %kind, error = %err,
                "Network error fetching storage boxes"
            ),
        }
    }
}

#[async_trait]
impl<S: StorageBoxSource> Collector for StorageBoxCollector<S> {
    fn describe(&self) -> Vec<&'static MetricDesc> {
        RESOURCE_DESCRIPTORS
            .iter()
            .copied()
            .chain(std::iter::once(&SCRAPE_DURATION))
            .chain(COUNTER_DESCRIPTORS.iter().copied())
            .collect()
    }

    async fn collect(&self, sink: &mut dyn MetricSink) {
        let start = Instant::now();

        match self.snapshot().await {
            Ok(snapshot) => {
                for record in snapshot.iter() {
                    project_storage_box(record, sink);
                }
                sink.emit(Measurement::unlabeled(
                    &SCRAPE_DURATION,
                    start.elapsed().as_secs_f64(),
                ));
            }
            Err(err) => self.handle_failure(&err),
        }

        self.counters.emit(sink);
    }
}
