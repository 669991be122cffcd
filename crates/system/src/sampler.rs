//! The sampling state machine.
//!
//! ```text
//! Stopped --start()--> Scheduled --tick()--> Sampling --complete()--> Scheduled
//!    ^                     |                     |
//!    +------- stop() ------+------- stop() ------+
//! ```
//!
//! The sampler never blocks and never spawns: [`MetricSampler::tick`] hands
//! back a [`PendingRead`] that the caller resolves wherever it likes, then
//! feeds the [`ReadOutcome`] back through [`MetricSampler::complete`] on the
//! same context that owns the sampler.

use crate::buffer::ScrollingSeriesBuffer;
use crate::capacity::{capacity_for_width, LabelMode};
use crate::error::SystemError;
use crate::source::MetricSource;
use graphmon_core::{MetricKind, SamplerContext, SamplingSchedule, SeriesUpdate};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplerState {
    /// No ticks are dispatched.
    Stopped,
    /// Waiting for the next tick.
    Scheduled,
    /// A read is in flight; ticks are suppressed until it completes.
    Sampling,
}

/// Periodically pulls one scalar from a [`MetricSource`] into a bounded
/// history.
pub struct MetricSampler {
    kind:       MetricKind,
    schedule:   SamplingSchedule,
    source:     Arc<dyn MetricSource>,
    buffer:     ScrollingSeriesBuffer,
    label_mode: LabelMode,
    state:      SamplerState,
    /// Bumped on every stop; outcomes from an older generation are dropped.
    generation: u64,
    cancel:     CancellationToken,
}

impl fmt::Debug for MetricSampler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetricSampler")
            .field("kind", &self.kind)
            .field("schedule", &self.schedule)
            .field("state", &self.state)
            .field("generation", &self.generation)
            .field("buffer", &self.buffer)
            .finish_non_exhaustive()
    }
}

impl MetricSampler {
    /// Create a stopped sampler with an empty history sized for the
    /// context's display.
    pub fn new(ctx: &SamplerContext, source: Arc<dyn MetricSource>) -> Self {
        let label_mode = LabelMode::for_height(ctx.display_height);
        let capacity = capacity_for_width(ctx.display_width, label_mode);
        Self {
            kind: ctx.kind,
            schedule: ctx.schedule,
            source,
            buffer: ScrollingSeriesBuffer::new(capacity),
            label_mode,
            state: SamplerState::Stopped,
            generation: 0,
            cancel: CancellationToken::new(),
        }
    }

    pub fn kind(&self) -> MetricKind {
        self.kind
    }

    pub fn state(&self) -> SamplerState {
        self.state
    }

    pub fn label_mode(&self) -> LabelMode {
        self.label_mode
    }

    pub fn buffer(&self) -> &ScrollingSeriesBuffer {
        &self.buffer
    }

    /// Copy of the history, oldest first.
    pub fn snapshot(&self) -> Arc<[f64]> {
        self.buffer.snapshot()
    }

    /// Current tick period.
    pub fn interval(&self) -> Duration {
        self.schedule.interval()
    }

    /// Begin dispatching ticks. No-op unless stopped.
    pub fn start(&mut self) {
        if self.state != SamplerState::Stopped {
            return;
        }
        self.cancel = CancellationToken::new();
        self.state = SamplerState::Scheduled;
        info!(
            "Sampling {} every {:.1}s (history {})",
            self.kind,
            self.schedule.secs(),
            self.buffer.capacity()
        );
    }

    /// Halt ticking. Any read still in flight is cancelled and its outcome,
    /// should it arrive anyway, is discarded.
    pub fn stop(&mut self) {
        if self.state == SamplerState::Stopped {
            return;
        }
        self.cancel.cancel();
        self.generation += 1;
        self.state = SamplerState::Stopped;
        debug!("Sampler stopped (generation {})", self.generation);
    }

    /// Replace the schedule. Takes effect on the next scheduled tick; a read
    /// already in flight is unaffected.
    pub fn set_interval(&mut self, secs: f64) {
        self.schedule = SamplingSchedule::from_secs(secs);
        debug!("Sampling interval set to {:.1}s", self.schedule.secs());
    }

    /// Resize the history for a chart `width` pixels wide.
    pub fn set_display(&mut self, width: f32, mode: LabelMode) {
        self.label_mode = mode;
        let capacity = capacity_for_width(width, mode);
        if capacity != self.buffer.capacity() {
            debug!(
                "History capacity {} -> {capacity} ({width}px, {mode:?})",
                self.buffer.capacity()
            );
            self.buffer.set_capacity(capacity);
        }
    }

    /// One firing of the schedule.
    ///
    /// Returns the read to perform, or `None` when stopped or when the
    /// previous read has not completed yet.
    pub fn tick(&mut self) -> Option<PendingRead> {
        match self.state {
            SamplerState::Scheduled => {
                self.state = SamplerState::Sampling;
                Some(PendingRead {
                    generation: self.generation,
                    kind:       self.kind,
                    source:     Arc::clone(&self.source),
                    cancel:     self.cancel.clone(),
                })
            }
            SamplerState::Sampling => {
                debug!("Tick suppressed: {} read still in flight", self.kind);
                None
            }
            SamplerState::Stopped => None,
        }
    }

    /// Record the result of a read started by [`tick`](Self::tick).
    ///
    /// A failed read is recorded as `0.0` with `reading: None`. Outcomes from
    /// before the last [`stop`](Self::stop) return `None` and change nothing.
    pub fn complete(&mut self, outcome: ReadOutcome) -> Option<SeriesUpdate> {
        if outcome.generation != self.generation || self.state != SamplerState::Sampling {
            debug!("Discarding stale {} read", self.kind);
            return None;
        }
        self.state = SamplerState::Scheduled;

        let reading = match outcome.result? {
            Ok(value) if value.is_finite() => Some(value),
            Ok(value) => {
                warn!("{} source returned {value}; recording 0", self.kind);
                None
            }
            Err(e) => {
                warn!("{} source failed: {e}; recording 0", self.kind);
                None
            }
        };

        self.buffer.push(reading.unwrap_or(0.0));

        Some(SeriesUpdate {
            kind:     self.kind,
            reading,
            snapshot: self.buffer.snapshot(),
            capacity: self.buffer.capacity(),
            average:  self.buffer.average(),
            peak:     self.buffer.peak(),
        })
    }
}

/// One external read, detached from the sampler so it can run elsewhere.
pub struct PendingRead {
    generation: u64,
    kind:       MetricKind,
    source:     Arc<dyn MetricSource>,
    cancel:     CancellationToken,
}

impl fmt::Debug for PendingRead {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingRead")
            .field("generation", &self.generation)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

impl PendingRead {
    pub fn kind(&self) -> MetricKind {
        self.kind
    }

    /// Run the read on tokio's blocking pool, giving up early if the sampler
    /// is stopped meanwhile. The blocking call itself cannot be interrupted;
    /// its late result is simply dropped.
    pub async fn resolve(self) -> ReadOutcome {
        let PendingRead { generation, kind, source, cancel } = self;
        if cancel.is_cancelled() {
            return ReadOutcome::cancelled(generation);
        }

        let read = tokio::task::spawn_blocking(move || source.read_scalar(kind));

        tokio::select! {
            _ = cancel.cancelled() => ReadOutcome::cancelled(generation),
            joined = read => {
                let result = joined.unwrap_or_else(|e| {
                    Err(SystemError::Counter(format!("read task failed: {e}")))
                });
                ReadOutcome { generation, result: Some(result) }
            }
        }
    }

    /// Run the read on the current thread.
    pub fn resolve_blocking(self) -> ReadOutcome {
        if self.cancel.is_cancelled() {
            return ReadOutcome::cancelled(self.generation);
        }
        let result = self.source.read_scalar(self.kind);
        ReadOutcome { generation: self.generation, result: Some(result) }
    }
}

/// Result of a [`PendingRead`], to be handed back to
/// [`MetricSampler::complete`].
#[derive(Debug, Clone)]
pub struct ReadOutcome {
    generation: u64,
    /// `None` when the read was cancelled before it finished.
    result:     Option<Result<f64, SystemError>>,
}

impl ReadOutcome {
    fn cancelled(generation: u64) -> Self {
        Self { generation, result: None }
    }

    pub fn is_cancelled(&self) -> bool {
        self.result.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{mpsc, Mutex};

    /// Returns scripted values in order, counting every call.
    struct ScriptedSource {
        values: Mutex<Vec<Result<f64, SystemError>>>,
        calls:  AtomicUsize,
    }

    impl ScriptedSource {
        fn new(mut values: Vec<Result<f64, SystemError>>) -> Arc<Self> {
            values.reverse();
            Arc::new(Self { values: Mutex::new(values), calls: AtomicUsize::new(0) })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl MetricSource for ScriptedSource {
        fn read_scalar(&self, _kind: MetricKind) -> Result<f64, SystemError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.values.lock().unwrap().pop().unwrap_or(Ok(0.0))
        }
    }

    /// Blocks each read until the test releases a value through the gate.
    struct GatedSource {
        gate:  Mutex<mpsc::Receiver<f64>>,
        calls: AtomicUsize,
    }

    impl MetricSource for GatedSource {
        fn read_scalar(&self, _kind: MetricKind) -> Result<f64, SystemError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.gate
                .lock()
                .unwrap()
                .recv()
                .map_err(|_| SystemError::Counter("gate closed".into()))
        }
    }

    fn ctx(kind: MetricKind) -> SamplerContext {
        SamplerContext { kind, ..SamplerContext::default() }
    }

    fn running(source: Arc<dyn MetricSource>) -> MetricSampler {
        let mut sampler = MetricSampler::new(&ctx(MetricKind::Cpu), source);
        sampler.start();
        sampler
    }

    fn sample_once(sampler: &mut MetricSampler) -> Option<SeriesUpdate> {
        let read = sampler.tick()?;
        sampler.complete(read.resolve_blocking())
    }

    #[test]
    fn new_sampler_is_stopped_and_empty() {
        let mut sampler = MetricSampler::new(&ctx(MetricKind::Memory), ScriptedSource::new(vec![]));
        assert_eq!(sampler.state(), SamplerState::Stopped);
        assert!(sampler.buffer().is_empty());
        assert!(sampler.tick().is_none());
    }

    #[test]
    fn tick_pushes_and_reports_latest() {
        let source = ScriptedSource::new(vec![Ok(12.0), Ok(34.0)]);
        let mut sampler = running(source.clone());

        let first = sample_once(&mut sampler).unwrap();
        assert_eq!(first.reading, Some(12.0));
        let second = sample_once(&mut sampler).unwrap();
        assert_eq!(second.reading, Some(34.0));
        assert_eq!(&*second.snapshot, &[12.0, 34.0]);
        assert_eq!(second.average, 23.0);
        assert_eq!(second.peak, 34.0);
        assert_eq!(source.calls(), 2);
        assert_eq!(sampler.state(), SamplerState::Scheduled);
    }

    #[test]
    fn tick_while_pending_is_suppressed() {
        let source = ScriptedSource::new(vec![Ok(5.0)]);
        let mut sampler = running(source.clone());

        let read = sampler.tick().unwrap();
        assert_eq!(sampler.state(), SamplerState::Sampling);
        assert!(sampler.tick().is_none());
        assert!(sampler.tick().is_none());
        assert_eq!(source.calls(), 0);

        let update = sampler.complete(read.resolve_blocking()).unwrap();
        assert_eq!(source.calls(), 1);
        assert_eq!(&*update.snapshot, &[5.0]);
        assert!(sampler.tick().is_some());
    }

    #[test]
    fn outcome_cannot_be_applied_twice() {
        let mut sampler = running(ScriptedSource::new(vec![Ok(1.0)]));
        let outcome = sampler.tick().unwrap().resolve_blocking();

        assert!(sampler.complete(outcome.clone()).is_some());
        assert!(sampler.complete(outcome).is_none());
        assert_eq!(sampler.buffer().len(), 1);
    }

    #[test]
    fn failed_read_records_zero_without_error() {
        let source = ScriptedSource::new(vec![
            Err(SystemError::Unavailable(MetricKind::Cpu)),
            Ok(f64::NAN),
        ]);
        let mut sampler = running(source);

        let update = sample_once(&mut sampler).unwrap();
        assert_eq!(update.reading, None);
        assert_eq!(update.peak, 0.0);
        let update = sample_once(&mut sampler).unwrap();
        assert_eq!(update.reading, None);
        assert_eq!(&*update.snapshot, &[0.0, 0.0]);
    }

    #[test]
    fn stop_discards_pending_read() {
        let source = ScriptedSource::new(vec![Ok(7.0)]);
        let mut sampler = running(source.clone());

        let read = sampler.tick().unwrap();
        sampler.stop();
        let outcome = read.resolve_blocking();

        assert!(outcome.is_cancelled());
        assert!(sampler.complete(outcome).is_none());
        assert!(sampler.buffer().is_empty());
        assert_eq!(source.calls(), 0);
        assert!(sampler.tick().is_none());
    }

    #[test]
    fn late_result_from_before_restart_is_dropped() {
        let mut sampler = running(ScriptedSource::new(vec![Ok(1.0), Ok(2.0)]));

        let stale = sampler.tick().unwrap().resolve_blocking();
        sampler.stop();
        sampler.start();
        let fresh = sampler.tick().unwrap();

        assert!(sampler.complete(stale).is_none());
        assert_eq!(sampler.state(), SamplerState::Sampling);
        let update = sampler.complete(fresh.resolve_blocking()).unwrap();
        assert_eq!(&*update.snapshot, &[2.0]);
    }

    #[test]
    fn shrinking_display_truncates_history() {
        let values = (1..=20).map(|v| Ok(v as f64)).collect();
        let mut sampler = MetricSampler::new(
            &SamplerContext {
                display_width: 2000.0,
                display_height: 600.0,
                ..ctx(MetricKind::Cpu)
            },
            ScriptedSource::new(values),
        );
        sampler.start();
        for _ in 0..20 {
            sample_once(&mut sampler);
        }
        assert_eq!(sampler.buffer().len(), 20);

        sampler.set_display(100.0, LabelMode::Full);
        assert_eq!(&*sampler.snapshot(), &[17.0, 18.0, 19.0, 20.0]);
    }

    #[test]
    fn interval_change_keeps_read_in_flight() {
        let mut sampler = running(ScriptedSource::new(vec![Ok(3.0)]));
        let read = sampler.tick().unwrap();

        sampler.set_interval(10.0);
        assert_eq!(sampler.interval(), Duration::from_secs(10));
        assert!(sampler.complete(read.resolve_blocking()).is_some());
    }

    #[tokio::test]
    async fn stop_cancels_slow_read() {
        let (release, gate) = mpsc::channel();
        let source = Arc::new(GatedSource { gate: Mutex::new(gate), calls: AtomicUsize::new(0) });
        let mut sampler = running(source.clone());

        let pending = tokio::spawn(sampler.tick().unwrap().resolve());
        // Let the blocking read start.
        while source.calls.load(Ordering::SeqCst) == 0 {
            tokio::task::yield_now().await;
        }
        sampler.stop();

        let outcome = tokio::time::timeout(Duration::from_secs(5), pending)
            .await
            .expect("cancelled read should resolve promptly")
            .unwrap();
        assert!(outcome.is_cancelled());
        assert!(sampler.complete(outcome).is_none());
        assert!(sampler.buffer().is_empty());

        // Unblock the worker thread so the runtime can shut down.
        release.send(1.0).unwrap();
    }

    #[tokio::test]
    async fn async_read_resolves_value() {
        let mut sampler = running(ScriptedSource::new(vec![Ok(42.0)]));
        let outcome = sampler.tick().unwrap().resolve().await;
        let update = sampler.complete(outcome).unwrap();
        assert_eq!(update.reading, Some(42.0));
    }
}
