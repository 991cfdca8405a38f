//! Prometheus text exposition.
//!
//! Measurements are grouped per descriptor (first-seen order), loaded into
//! fresh `GaugeVec`/`CounterVec` families and rendered with the `prometheus`
//! crate's `TextEncoder`. Nothing is registered globally; every call builds
//! its families from scratch.

use prometheus::core::Collector as _;
use prometheus::proto::MetricFamily;
use prometheus::{CounterVec, Encoder, GaugeVec, Opts, TextEncoder};
use thiserror::Error;

use super::{Measurement, MetricDesc, MetricKind};

/// `Content-Type` of the text exposition format.
pub const TEXT_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Errors that can occur while encoding measurements.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Invalid metric/label name, label arity mismatch or encoder failure.
    #[error("prometheus error: {0}")]
    Prometheus(#[from] prometheus::Error),

    /// Counter measurements must not be negative.
    #[error("negative value {value} for counter {name}")]
    NegativeCounter { name: &'static str, value: f64 },

    /// Encoder produced invalid UTF-8.
    #[error("invalid utf-8 in exposition output: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Render measurements in the Prometheus text format.
///
/// # Errors
/// Returns `EncodeError` if a measurement does not fit its descriptor.
pub fn encode_text(measurements: &[Measurement]) -> Result<String, EncodeError> {
    let mut groups: Vec<(&'static MetricDesc, Vec<&Measurement>)> = Vec::new();
    for measurement in measurements {
        match groups
            .iter_mut()
            .find(|(desc, _)| desc.name == measurement.desc.name)
        {
            Some((_, members)) => members.push(measurement),
            None => groups.push((measurement.desc, vec![measurement])),
        }
    }

    let mut families = Vec::with_capacity(groups.len());
    for (desc, members) in &groups {
        families.extend(encode_family(desc, members)?);
    }

    let mut buffer = Vec::new();
    TextEncoder::new().encode(&families, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

fn encode_family(
    desc: &'static MetricDesc,
    members: &[&Measurement],
) -> Result<Vec<MetricFamily>, EncodeError> {
    let opts = Opts::new(desc.name, desc.help);

    match desc.kind {
        MetricKind::Gauge => {
            let family = GaugeVec::new(opts, desc.labels)?;
            for m in members {
                let labels = label_refs(m);
                family
                    .get_metric_with_label_values(labels.as_slice())?
                    .set(m.value);
            }
            Ok(family.collect())
        }
        MetricKind::Counter => {
            let family = CounterVec::new(opts, desc.labels)?;
            for m in members {
                if m.value < 0.0 {
                    return Err(EncodeError::NegativeCounter {
                        name: desc.name,
                        value: m.value,
                    });
                }
                let labels = label_refs(m);
                family
                    .get_metric_with_label_values(labels.as_slice())?
                    .inc_by(m.value);
            }
            Ok(family.collect())
        }
    }
}

fn label_refs(measurement: &Measurement) -> Vec<&str> {
    measurement
        .label_values
        .iter()
        .map(String::as_str)
        .collect()
}
