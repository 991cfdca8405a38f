//! Metric descriptors and measurements.

/// Prometheus metric type of a descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Gauge,
    Counter,
}

impl MetricKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gauge => "gauge",
            Self::Counter => "counter",
        }
    }
}

/// Static description of a metric family.
#[derive(Debug, PartialEq, Eq)]
pub struct MetricDesc {
    pub name: &'static str,
    pub help: &'static str,
    pub labels: &'static [&'static str],
    pub kind: MetricKind,
}

impl MetricDesc {
    pub const fn gauge(
        name: &'static str,
        help: &'static str,
        labels: &'static [&'static str],
    ) -> Self {
        Self {
            name,
            help,
            labels,
            kind: MetricKind::Gauge,
        }
    }

    pub const fn counter(name: &'static str, help: &'static str) -> Self {
        Self {
            name,
            help,
            labels: &[],
            kind: MetricKind::Counter,
        }
    }
}

/// One labeled data point.
///
/// Label values are positional and must line up with `desc.labels`; the
/// encoder rejects a mismatch.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    pub desc: &'static MetricDesc,
    pub label_values: Vec<String>,
    pub value: f64,
}

impl Measurement {
    pub fn new(desc: &'static MetricDesc, label_values: Vec<String>, value: f64) -> Self {
        Self {
            desc,
            label_values,
            value,
        }
    }

    /// Measurement of an unlabeled descriptor.
    pub fn unlabeled(desc: &'static MetricDesc, value: f64) -> Self {
        Self::new(desc, Vec::new(), value)
    }

    pub fn name(&self) -> &'static str {
        self.desc.name
    }

    /// Value of the named label, if the descriptor has it.
    pub fn label(&self, name: &str) -> Option<&str> {
        self.desc
            .labels
            .iter()
            .position(|label| *label == name)
            .and_then(|idx| self.label_values.get(idx))
            .map(String::as_str)
    }
}
