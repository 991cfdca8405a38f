//! Static descriptors of every metric the Storage Box collector emits.

use crate::metrics::MetricDesc;

const USAGE_LABELS: &[&str] = &["id", "name", "server", "location"];
const ID_LABELS: &[&str] = &["id", "name"];

// Usage and quota

pub static DISK_QUOTA: MetricDesc = MetricDesc::gauge(
    "storagebox_disk_quota_bytes",
    "Total allocated diskspace in bytes",
    USAGE_LABELS,
);
pub static DISK_USAGE: MetricDesc = MetricDesc::gauge(
    "storagebox_disk_usage_bytes",
    "Total used diskspace in bytes",
    USAGE_LABELS,
);
pub static DISK_USAGE_DATA: MetricDesc = MetricDesc::gauge(
    "storagebox_disk_usage_data_bytes",
    "Diskspace used by files in bytes",
    USAGE_LABELS,
);
pub static DISK_USAGE_SNAPSHOTS: MetricDesc = MetricDesc::gauge(
    "storagebox_disk_usage_snapshots_bytes",
    "Diskspace used by snapshots in bytes",
    USAGE_LABELS,
);

// Info and status

pub static INFO: MetricDesc = MetricDesc::gauge(
    "storagebox_info",
    "Storage box information",
    &[
        "id",
        "name",
        "username",
        "server",
        "location",
        "storage_type",
        "system",
    ],
);
pub static STATUS: MetricDesc = MetricDesc::gauge(
    "storagebox_status",
    "Current status of storage box (1=active, 0=inactive)",
    &["id", "name", "status"],
);

// Access settings

pub static ACCESS_SSH: MetricDesc = MetricDesc::gauge(
    "storagebox_access_ssh_enabled",
    "SSH access enabled (1=enabled, 0=disabled)",
    ID_LABELS,
);
pub static ACCESS_SAMBA: MetricDesc = MetricDesc::gauge(
    "storagebox_access_samba_enabled",
    "Samba/CIFS access enabled (1=enabled, 0=disabled)",
    ID_LABELS,
);
pub static ACCESS_WEBDAV: MetricDesc = MetricDesc::gauge(
    "storagebox_access_webdav_enabled",
    "WebDAV access enabled (1=enabled, 0=disabled)",
    ID_LABELS,
);
pub static ACCESS_ZFS: MetricDesc = MetricDesc::gauge(
    "storagebox_access_zfs_enabled",
    "ZFS access enabled (1=enabled, 0=disabled)",
    ID_LABELS,
);
pub static REACHABLE_EXTERNALLY: MetricDesc = MetricDesc::gauge(
    "storagebox_reachable_externally",
    "Storage box reachable from external networks (1=reachable, 0=not reachable)",
    ID_LABELS,
);

// Snapshot plan, protection, lifecycle

pub static SNAPSHOT_PLAN: MetricDesc = MetricDesc::gauge(
    "storagebox_snapshot_plan_enabled",
    "Automatic snapshot plan configured (1=enabled, 0=disabled)",
    ID_LABELS,
);
pub static PROTECTION_DELETE: MetricDesc = MetricDesc::gauge(
    "storagebox_protection_delete",
    "Delete protection status (1=protected, 0=unprotected)",
    ID_LABELS,
);
pub static CREATED_TIMESTAMP: MetricDesc = MetricDesc::gauge(
    "storagebox_created_timestamp",
    "Unix timestamp of storage box creation",
    ID_LABELS,
);

// Exporter self-observability

pub static SCRAPE_DURATION: MetricDesc = MetricDesc::gauge(
    "storagebox_exporter_scrape_duration_seconds",
    "Duration of the scrape in seconds",
    &[],
);
pub static SCRAPE_ERRORS: MetricDesc = MetricDesc::counter(
    "storagebox_exporter_scrape_errors_total",
    "Total number of scrape errors",
);
pub static CACHE_HITS: MetricDesc = MetricDesc::counter(
    "storagebox_exporter_cache_hits_total",
    "Total number of scrapes served from cache",
);
pub static CACHE_MISSES: MetricDesc = MetricDesc::counter(
    "storagebox_exporter_cache_misses_total",
    "Total number of scrapes that missed the cache",
);
pub static AUTH_ERRORS: MetricDesc = MetricDesc::counter(
    "storagebox_exporter_auth_errors_total",
    "Total number of authentication/authorization errors (401/403)",
);
pub static RATE_LIMIT_ERRORS: MetricDesc = MetricDesc::counter(
    "storagebox_exporter_rate_limit_errors_total",
    "Total number of rate limit errors (429)",
);
pub static SERVER_ERRORS: MetricDesc = MetricDesc::counter(
    "storagebox_exporter_server_errors_total",
    "Total number of Hetzner API server errors (5xx)",
);
pub static CLIENT_ERRORS: MetricDesc = MetricDesc::counter(
    "storagebox_exporter_client_errors_total",
    "Total number of Hetzner API client errors (4xx)",
);
pub static NETWORK_ERRORS: MetricDesc = MetricDesc::counter(
    "storagebox_exporter_network_errors_total",
    "Total number of network errors without an HTTP status",
);

/// Descriptors emitted once per Storage Box, in emission order.
pub static RESOURCE_DESCRIPTORS: [&MetricDesc; 14] = [
    &DISK_QUOTA,
    &DISK_USAGE,
    &DISK_USAGE_DATA,
    &DISK_USAGE_SNAPSHOTS,
    &INFO,
    &STATUS,
    &ACCESS_SSH,
    &ACCESS_SAMBA,
    &ACCESS_WEBDAV,
    &ACCESS_ZFS,
    &REACHABLE_EXTERNALLY,
    &SNAPSHOT_PLAN,
    &PROTECTION_DELETE,
    &CREATED_TIMESTAMP,
];

/// Engine counters, in emission order.
pub static COUNTER_DESCRIPTORS: [&MetricDesc; 8] = [
    &SCRAPE_ERRORS,
    &CACHE_HITS,
    &CACHE_MISSES,
    &AUTH_ERRORS,
    &RATE_LIMIT_ERRORS,
    &SERVER_ERRORS,
    &CLIENT_ERRORS,
    &NETWORK_ERRORS,
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_descriptor_names_unique() {
        let names: HashSet<_> = RESOURCE_DESCRIPTORS
            .iter()
            .chain(COUNTER_DESCRIPTORS.iter())
            .chain(std::iter::once(&&SCRAPE_DURATION))
            .map(|d| d.name)
            .collect();
        assert_eq!(names.len(), 14 + 8 + 1);
    }

    #[test]
    fn test_resource_descriptors_tagged_with_identity() {
        for desc in RESOURCE_DESCRIPTORS {
            assert_eq!(&desc.labels[..2], &["id", "name"], "{}", desc.name);
        }
        for desc in [&DISK_QUOTA, &DISK_USAGE, &DISK_USAGE_DATA, &DISK_USAGE_SNAPSHOTS] {
            assert!(desc.labels.contains(&"server"));
            assert!(desc.labels.contains(&"location"));
        }
    }
}
