use crate::kind::MetricKind;
use std::time::Duration;

/// Periodic sampling interval, always within `[MIN_SECS, MAX_SECS]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingSchedule {
    interval_secs: f64,
}

impl SamplingSchedule {
    pub const MIN_SECS: f64 = 0.5;
    pub const MAX_SECS: f64 = 60.0;
    pub const DEFAULT_SECS: f64 = 3.0;

    /// Build a schedule from a configured interval. Out-of-range values are
    /// clamped; NaN falls back to the default.
    pub fn from_secs(secs: f64) -> Self {
        let interval_secs = if secs.is_nan() {
            Self::DEFAULT_SECS
        } else {
            secs.clamp(Self::MIN_SECS, Self::MAX_SECS)
        };
        Self { interval_secs }
    }

    pub fn secs(&self) -> f64 {
        self.interval_secs
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs_f64(self.interval_secs)
    }
}

impl Default for SamplingSchedule {
    fn default() -> Self {
        Self::from_secs(Self::DEFAULT_SECS)
    }
}

/// Everything the sampler / buffer pair needs at construction.
///
/// Replaces ambient application state: the caller builds one of these from
/// config and CLI flags and hands it over.
#[derive(Debug, Clone, PartialEq)]
pub struct SamplerContext {
    pub kind:           MetricKind,
    pub schedule:       SamplingSchedule,
    /// Chart area width in logical pixels.
    pub display_width:  f32,
    /// Chart area height in logical pixels.
    pub display_height: f32,
}

impl Default for SamplerContext {
    fn default() -> Self {
        Self {
            kind:           MetricKind::default(),
            schedule:       SamplingSchedule::default(),
            display_width:  400.0,
            display_height: 200.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schedule_clamps_interval() {
        assert_eq!(SamplingSchedule::from_secs(0.1).secs(), 0.5);
        assert_eq!(SamplingSchedule::from_secs(120.0).secs(), 60.0);
        assert_eq!(SamplingSchedule::from_secs(2.5).secs(), 2.5);
    }

    #[test]
    fn schedule_nan_uses_default() {
        assert_eq!(SamplingSchedule::from_secs(f64::NAN).secs(), 3.0);
    }

    #[test]
    fn schedule_duration_matches_secs() {
        assert_eq!(
            SamplingSchedule::from_secs(1.5).interval(),
            Duration::from_millis(1500)
        );
    }
}
