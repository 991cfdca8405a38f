//! Measurement model and Prometheus exposition.
//!
//! - [`MetricDesc`]: static name, help text, label names and kind
//! - [`Measurement`]: one labeled data point of a descriptor
//! - [`MetricSink`]: destination that collectors emit measurements into
//! - [`encode_text`]: render measurements in the Prometheus text format

mod desc;
mod encode;
mod sink;

pub use desc::{Measurement, MetricDesc, MetricKind};
pub use encode::{EncodeError, TEXT_CONTENT_TYPE, encode_text};
pub use sink::MetricSink;
