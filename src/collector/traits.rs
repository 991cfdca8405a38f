//! Core collector traits.

use async_trait::async_trait;

use crate::hetzner::{ApiError, StorageBox};
use crate::metrics::{MetricDesc, MetricSink};

/// Upstream source of Storage Box records.
///
/// [`HetznerClient`](crate::hetzner::HetznerClient) is the production
/// implementation; tests substitute in-memory fakes. Implementations do not
/// need to enforce a deadline: the caller bounds every call with its own
/// timeout and drops the future when it elapses.
#[async_trait]
pub trait StorageBoxSource: Send + Sync + 'static {
    /// List all Storage Boxes, in API order.
    async fn list_storage_boxes(&self) -> Result<Vec<StorageBox>, ApiError>;
}

/// Pull-model metrics collector.
///
/// # Error Handling Philosophy
///
/// `collect()` has no error channel. Upstream failures are observations, not
/// collector errors: they are counted, logged and reflected in the emitted
/// counters, so every invocation produces a valid, non-empty measurement set.
/// "Exporter reachable" and "exporter reporting errors" stay separate signals
/// for whoever scrapes the output.
///
/// Both methods may be called concurrently from independent scrapes.
#[async_trait]
pub trait Collector: Send + Sync + 'static {
    /// Every descriptor this collector may ever emit, independent of data.
    fn describe(&self) -> Vec<&'static MetricDesc>;

    /// Perform one collection and emit the resulting measurements into `sink`.
    async fn collect(&self, sink: &mut dyn MetricSink);
}
