//! Engine self-observability counters.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::metrics::{Measurement, MetricSink};

use super::classify::ErrorKind;
use super::descriptors::{CACHE_HITS, CACHE_MISSES, SCRAPE_ERRORS};

/// Monotonic counters scoped to one collector instance.
///
/// Increments are atomic and may come from any number of concurrent scrapes.
#[derive(Debug, Default)]
pub struct EngineCounters {
    scrape_errors: AtomicU64,
    cache_hits: AtomicU64,
    cache_misses: AtomicU64,
    auth_errors: AtomicU64,
    rate_limit_errors: AtomicU64,
    server_errors: AtomicU64,
    client_errors: AtomicU64,
    network_errors: AtomicU64,
}

/// Point-in-time copy of [`EngineCounters`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CounterSnapshot {
    pub scrape_errors: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub auth_errors: u64,
    pub rate_limit_errors: u64,
    pub server_errors: u64,
    pub client_errors: u64,
    pub network_errors: u64,
}

impl CounterSnapshot {
    pub fn errors_of(&self, kind: ErrorKind) -> u64 {
        match kind {
            ErrorKind::Auth => self.auth_errors,
            ErrorKind::RateLimit => self.rate_limit_errors,
            ErrorKind::Server => self.server_errors,
            ErrorKind::Client => self.client_errors,
            ErrorKind::Network => self.network_errors,
        }
    }
}

impl EngineCounters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cache_miss(&self) {
        self.cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Count one failed scrape of the given kind (per-kind and total).
    pub fn record_failure(&self, kind: ErrorKind) {
        self.kind_counter(kind).fetch_add(1, Ordering::Relaxed);
        self.scrape_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            scrape_errors: self.scrape_errors.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.cache_misses.load(Ordering::Relaxed),
            auth_errors: self.auth_errors.load(Ordering::Relaxed),
            rate_limit_errors: self.rate_limit_errors.load(Ordering::Relaxed),
            server_errors: self.server_errors.load(Ordering::Relaxed),
            client_errors: self.client_errors.load(Ordering::Relaxed),
            network_errors: self.network_errors.load(Ordering::Relaxed),
        }
    }

    /// Emit every counter, zero-valued ones included.
    pub fn emit(&self, sink: &mut dyn MetricSink) {
        let snapshot = self.snapshot();
        sink.emit(Measurement::unlabeled(&SCRAPE_ERRORS, snapshot.scrape_errors as f64));
        sink.emit(Measurement::unlabeled(&CACHE_HITS, snapshot.cache_hits as f64));
        sink.emit(Measurement::unlabeled(&CACHE_MISSES, snapshot.cache_misses as f64));
        for kind in ErrorKind::ALL {
            sink.emit(Measurement::unlabeled(
                kind.counter_desc(),
                snapshot.errors_of(kind) as f64,
            ));
        }
    }

    fn kind_counter(&self, kind: ErrorKind) -> &AtomicU64 {
        match kind {
            ErrorKind::Auth => &self.auth_errors,
            ErrorKind::RateLimit => &self.rate_limit_errors,
            ErrorKind::Server => &self.server_errors,
            ErrorKind::Client => &self.client_errors,
            ErrorKind::Network => &self.network_errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::descriptors::COUNTER_DESCRIPTORS;

    #[test]
    fn test_record_failure_increments_kind_and_total() {
        let counters = EngineCounters::new();
        counters.record_failure(ErrorKind::RateLimit);
        counters.record_failure(ErrorKind::RateLimit);
        counters.record_failure(ErrorKind::Network);

        let snapshot = counters.snapshot();
        assert_eq!(snapshot.scrape_errors, 3);
        assert_eq!(snapshot.rate_limit_errors, 2);
        assert_eq!(snapshot.network_errors, 1);
        assert_eq!(snapshot.auth_errors, 0);
        assert_eq!(snapshot.errors_of(ErrorKind::RateLimit), 2);
    }

    #[test]
    fn test_cache_counters() {
        let counters = EngineCounters::new();
        counters.record_cache_miss();
        counters.record_cache_hit();
        counters.record_cache_hit();

        let snapshot = counters.snapshot();
        assert_eq!(snapshot.cache_hits, 2);
        assert_eq!(snapshot.cache_misses, 1);
        assert_eq!(snapshot.scrape_errors, 0);
    }

    #[test]
    fn test_emit_all_counters() {
        let counters = EngineCounters::new();
        counters.record_failure(ErrorKind::Auth);

        let mut sink: Vec<Measurement> = Vec::new();
        counters.emit(&mut sink);

        let names: Vec<_> = sink.iter().map(|m| m.name()).collect();
        let expected: Vec<_> = COUNTER_DESCRIPTORS.iter().map(|d| d.name).collect();
        assert_eq!(names, expected);

        let auth = sink
            .iter()
            .find(|m| m.name() == "storagebox_exporter_auth_errors_total")
            .unwrap();
        assert_eq!(auth.value, 1.0);
    }

    #[test]
    fn test_concurrent_increments() {
        let counters = std::sync::Arc::new(EngineCounters::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let counters = std::sync::Arc::clone(&counters);
                std::thread::spawn(move || {
                    for _ in 0..1000 {
                        counters.record_failure(ErrorKind::Server);
                        counters.record_cache_miss();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let snapshot = counters.snapshot();
        assert_eq!(snapshot.server_errors, 8000);
        assert_eq!(snapshot.scrape_errors, 8000);
        assert_eq!(snapshot.cache_misses, 8000);
    }
}
