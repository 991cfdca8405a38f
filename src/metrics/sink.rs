//! Measurement sinks.

use tokio::sync::mpsc::UnboundedSender;

use super::Measurement;

/// Destination for emitted measurements.
pub trait MetricSink: Send {
    fn emit(&mut self, measurement: Measurement);
}

impl MetricSink for Vec<Measurement> {
    fn emit(&mut self, measurement: Measurement) {
        self.push(measurement);
    }
}

/// Channel sink. Measurements sent after the receiver is gone are dropped.
impl MetricSink for UnboundedSender<Measurement> {
    fn emit(&mut self, measurement: Measurement) {
        if let Err(e) = self.send(measurement) {
            tracing::trace!(metric = e.0.name(), "Receiver closed, dropping measurement");
        }
    }
}
