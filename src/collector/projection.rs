//! Projection of one Storage Box into its measurement set.
//!
//! Byte counts and timestamps stay `i64` up to this point and are converted to
//! `f64` only here; values above 2^53 lose precision.

use crate::hetzner::StorageBox;
use crate::metrics::{Measurement, MetricDesc, MetricSink};

use super::descriptors::{
    ACCESS_SAMBA, ACCESS_SSH, ACCESS_WEBDAV, ACCESS_ZFS, CREATED_TIMESTAMP, DISK_QUOTA, DISK_USAGE,
    DISK_USAGE_DATA, DISK_USAGE_SNAPSHOTS, INFO, PROTECTION_DELETE, REACHABLE_EXTERNALLY,
    SNAPSHOT_PLAN, STATUS,
};

/// Emit the full measurement set of `record`, in descriptor order.
pub fn project_storage_box(record: &StorageBox, sink: &mut dyn MetricSink) {
    let id = record.id.to_string();
    let name = record.name.as_str();
    let server = record.server.as_str();
    let location = record.location.name.as_str();

    let usage_labels = || labels(&[&id, name, server, location]);
    let id_labels = || labels(&[&id, name]);

    sink.emit(Measurement::new(
        &DISK_QUOTA,
        usage_labels(),
        record.storage_box_type.size as f64,
    ));
    sink.emit(Measurement::new(&DISK_USAGE, usage_labels(), record.stats.size as f64));
    sink.emit(Measurement::new(
        &DISK_USAGE_DATA,
        usage_labels(),
        record.stats.size_data as f64,
    ));
    sink.emit(Measurement::new(
        &DISK_USAGE_SNAPSHOTS,
        usage_labels(),
        record.stats.size_snapshots as f64,
    ));

    sink.emit(Measurement::new(
        &INFO,
        labels(&[
            &id,
            name,
            &record.username,
            server,
            location,
            &record.storage_box_type.name,
            &record.system,
        ]),
        1.0,
    ));
    sink.emit(Measurement::new(
        &STATUS,
        labels(&[&id, name, &record.status]),
        bool_value(record.is_active()),
    ));

    let access = &record.access_settings;
    let flags: [(&'static MetricDesc, bool); 7] = [
        (&ACCESS_SSH, access.ssh_enabled),
        (&ACCESS_SAMBA, access.samba_enabled),
        (&ACCESS_WEBDAV, access.webdav_enabled),
        (&ACCESS_ZFS, access.zfs_enabled),
        (&REACHABLE_EXTERNALLY, access.reachable_externally),
        (&SNAPSHOT_PLAN, record.snapshot_plan_enabled()),
        (&PROTECTION_DELETE, record.protection.delete),
    ];
    for (desc, flag) in flags {
        sink.emit(Measurement::new(desc, id_labels(), bool_value(flag)));
    }

    sink.emit(Measurement::new(
        &CREATED_TIMESTAMP,
        id_labels(),
        record.created_timestamp() as f64,
    ));
}

pub fn bool_value(flag: bool) -> f64 {
    if flag { 1.0 } else { 0.0 }
}

fn labels(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}
