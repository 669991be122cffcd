use graphmon_core::MetricKind;
use thiserror::Error;

/// Failures reported by a [`MetricSource`](crate::MetricSource).
///
/// Never escalated past the sampler: it records a `0.0` and logs instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SystemError {
    #[error("{0} source unavailable on this system")]
    Unavailable(MetricKind),

    #[error("counter read failed: {0}")]
    Counter(String),

    #[error("metric source lock poisoned")]
    Poisoned,
}
