use crate::kind::MetricKind;
use std::sync::Arc;

/// Emitted by the sampler after every completed read.
///
/// Consumers:
/// - Title / label observer → `reading`, `average`, `peak`
/// - Chart renderer         → `snapshot` (redraw requested)
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesUpdate {
    /// Metric the reading belongs to.
    pub kind: MetricKind,
    /// Latest value, or `None` when the source was unavailable this tick.
    /// The history still records a `0.0` for it.
    pub reading: Option<f64>,
    /// Buffer contents after the push, oldest first.
    pub snapshot: Arc<[f64]>,
    /// Buffer capacity at the time of the push.
    pub capacity: usize,
    /// Mean of the buffered samples.
    pub average: f64,
    /// Largest buffered sample.
    pub peak: f64,
}
