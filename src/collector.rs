//! Collector Layer
//!
//! Turns upstream Storage Box listings into Prometheus measurements.
//!
//! # Architecture
//!
//! - [`StorageBoxSource`]: Upstream listing of Storage Boxes (the Hetzner client in production)
//! - [`Collector`]: Produces one scrape's worth of measurements into a [`MetricSink`](crate::metrics::MetricSink)
//! - [`StorageBoxCollector`]: Cached orchestrator tying the two together
//! - [`ErrorKind`]: Status-based classification of upstream failures
//! - [`EngineCounters`]: Cache and error counters reported on every scrape
//!
//! # Example
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use storagebox_exporter::{
//!     CacheSettings, Collector, HetznerClient, Measurement, StorageBoxCollector,
//! };
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HetznerClient::new("token")?;
//! let collector = StorageBoxCollector::new(client, CacheSettings::with_ttl(Duration::from_secs(60)));
//!
//! let mut measurements: Vec<Measurement> = Vec::new();
//! collector.collect(&mut measurements).await;
//! # Ok(())
//! # }
//! ```

mod classify;
mod counters;
pub mod descriptors;
mod projection;
mod storagebox;
mod traits;

pub use classify::ErrorKind;
pub use counters::{CounterSnapshot, EngineCounters};
pub use projection::{bool_value, project_storage_box};
pub use storagebox::{DEFAULT_FETCH_TIMEOUT, Snapshot, StorageBoxCollector};
pub use traits::{Collector, StorageBoxSource};
