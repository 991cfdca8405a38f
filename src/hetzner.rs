//! Hetzner API client for Storage Boxes.
//!
//! - [`HetznerClient`]: authenticated `GET /storage_boxes` client
//! - [`ApiError`]: upstream failure carrying the HTTP status when one was received
//! - [`StorageBox`]: decoded resource record

mod client;
mod error;
mod types;

pub use client::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT, HetznerClient};
pub use error::ApiError;
pub use types::{AccessSettings, Location, Protection, SnapshotPlan, Stats, StorageBox, StorageBoxType};
