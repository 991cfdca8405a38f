//! Storage Box resource records as returned by the Hetzner API.
//!
//! Missing or `null` fields decode to their zero value, so an absent access
//! flag is `false` rather than unknown.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Treat an explicit JSON `null` like a missing field.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One Storage Box at fetch time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageBox {
    #[serde(default, deserialize_with = "nullable")]
    pub id: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub username: String,
    /// Raw status string; only `"active"` counts as up.
    #[serde(default, deserialize_with = "nullable")]
    pub status: String,
    #[serde(default, deserialize_with = "nullable")]
    pub server: String,
    #[serde(default, deserialize_with = "nullable")]
    pub system: String,
    #[serde(default, deserialize_with = "nullable")]
    pub storage_box_type: StorageBoxType,
    #[serde(default, deserialize_with = "nullable")]
    pub location: Location,
    #[serde(default, deserialize_with = "nullable")]
    pub stats: Stats,
    #[serde(default, deserialize_with = "nullable")]
    pub access_settings: AccessSettings,
    /// Automatic snapshot plan; `None` means no plan is configured.
    #[serde(default)]
    pub snapshot_plan: Option<SnapshotPlan>,
    #[serde(default, deserialize_with = "nullable")]
    pub protection: Protection,
    #[serde(default, deserialize_with = "nullable")]
    pub labels: BTreeMap<String, String>,
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
}

impl StorageBox {
    /// Whether the box reports the `active` status.
    pub fn is_active(&self) -> bool {
        self.status == "active"
    }

    /// Whether an automatic snapshot plan exists and is enabled.
    pub fn snapshot_plan_enabled(&self) -> bool {
        self.snapshot_plan.as_ref().is_some_and(|plan| plan.enabled)
    }

    /// Creation time as Unix seconds, `0` when the API omitted it.
    ///
    /// Go's zero `time.Time` would give -62135596800 here; 0 reads as "unset"
    /// on dashboards instead.
    pub fn created_timestamp(&self) -> i64 {
        self.created.map_or(0, |created| created.timestamp())
    }
}

/// Product type of a Storage Box.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageBoxType {
    pub name: String,
    /// Total quota in bytes.
    pub size: i64,
}

/// Data center location.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Location {
    pub name: String,
    pub description: String,
    pub country: String,
    pub city: String,
}

/// Disk usage in bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Stats {
    /// Total usage.
    pub size: i64,
    /// Usage by files.
    pub size_data: i64,
    /// Usage by snapshots.
    pub size_snapshots: i64,
}

/// Access protocols and reachability.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessSettings {
    pub ssh_enabled: bool,
    pub samba_enabled: bool,
    pub webdav_enabled: bool,
    pub zfs_enabled: bool,
    pub reachable_externally: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotPlan {
    pub enabled: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Protection {
    pub delete: bool,
}

/// Envelope of `GET /storage_boxes`.
#[derive(Debug, Deserialize)]
pub(crate) struct StorageBoxesResponse {
    #[serde(default)]
    pub storage_boxes: Vec<StorageBox>,
}
