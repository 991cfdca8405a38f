//! Storage Box Exporter
//!
//! Prometheus exporter for Hetzner Storage Boxes. It can be used as a library
//! by other Rust projects, or run as a standalone binary with the
//! `storagebox-exporter` executable.
//!
//! # Architecture
//!
//! - **Hetzner**: Typed client for the Storage Box listing endpoint
//! - **Cache**: Single-slot TTL cache in front of the upstream API
//! - **Collectors**: Projection of Storage Boxes into measurements, plus engine counters
//! - **Metrics**: Measurement model and Prometheus text exposition
//! - **Presentation**: `/metrics`, `/health` and a landing page
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use storagebox_exporter::{
//!     AppState, CacheSettings, HetznerClient, StorageBoxCollector, create_router,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = HetznerClient::new(std::env::var("HETZNER_TOKEN")?)?;
//!     let collector = StorageBoxCollector::new(client, CacheSettings::default());
//!     let app = create_router(AppState::new(Arc::new(collector), "/metrics"));
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:9509").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

pub mod build_info;
pub mod cache;
pub mod collector;
pub mod config;
pub mod hetzner;
pub mod metrics;
pub mod server;

pub use cache::{CacheSettings, TtlCache};
pub use collector::{Collector, ErrorKind, StorageBoxCollector, StorageBoxSource};
pub use config::{AppConfig, ConfigError};
pub use hetzner::{ApiError, HetznerClient, StorageBox};
pub use metrics::{Measurement, MetricDesc, MetricSink, encode_text};
pub use server::{AppState, create_router};
