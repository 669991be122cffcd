use crate::capacity::LabelMode;
use crate::sampler::{MetricSampler, ReadOutcome, SamplerState};
use graphmon_core::SeriesUpdate;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{self, Instant, Interval, MissedTickBehavior};
use tracing::debug;

/// Requests accepted by a running sampler task.
#[derive(Debug)]
pub enum SamplerCommand {
    /// New interval in seconds (clamped); applies from the next tick.
    SetInterval(f64),
    /// Chart width changed.
    SetDisplay { width: f32, mode: LabelMode },
    Start,
    /// Stop ticking; the sender is notified once the sampler has stopped.
    Stop(oneshot::Sender<()>),
    /// Stop and end the task.
    Shutdown,
}

/// Cloneable control handle for a task started by [`spawn_sampler`].
#[derive(Debug, Clone)]
pub struct SamplerHandle {
    tx: mpsc::Sender<SamplerCommand>,
}

impl SamplerHandle {
    pub async fn set_interval(&self, secs: f64) -> bool {
        self.send(SamplerCommand::SetInterval(secs)).await
    }

    pub async fn set_display(&self, width: f32, mode: LabelMode) -> bool {
        self.send(SamplerCommand::SetDisplay { width, mode }).await
    }

    pub async fn start(&self) -> bool {
        self.send(SamplerCommand::Start).await
    }

    /// Resolves once the task has stopped the sampler: no update produced
    /// after this returns comes from a read started before it.
    pub async fn stop(&self) -> bool {
        let (ack, done) = oneshot::channel();
        self.send(SamplerCommand::Stop(ack)).await && done.await.is_ok()
    }

    pub async fn shutdown(&self) -> bool {
        self.send(SamplerCommand::Shutdown).await
    }

    async fn send(&self, cmd: SamplerCommand) -> bool {
        self.tx.send(cmd).await.is_ok()
    }
}

/// Move `sampler` into a background Tokio task that ticks it on its own
/// schedule and forwards every [`SeriesUpdate`] through the returned channel.
///
/// The task owns the sampler and its history outright; reads run on the
/// blocking pool and their outcomes are funnelled back into the task before
/// anything is pushed. It stops automatically when the receiver is dropped.
pub fn spawn_sampler(mut sampler: MetricSampler) -> (SamplerHandle, mpsc::Receiver<SeriesUpdate>) {
    let (cmd_tx, mut cmd_rx) = mpsc::channel(8);
    let (tx, rx) = mpsc::channel(16);

    tokio::spawn(async move {
        let (done_tx, mut done_rx) = mpsc::channel::<ReadOutcome>(1);
        let mut ticker = ticker_for(sampler.interval());
        sampler.start();

        loop {
            tokio::select! {
                cmd = cmd_rx.recv() => match cmd {
                    Some(SamplerCommand::SetInterval(secs)) => {
                        sampler.set_interval(secs);
                        ticker = ticker_for(sampler.interval());
                    }
                    Some(SamplerCommand::SetDisplay { width, mode }) => {
                        sampler.set_display(width, mode);
                    }
                    Some(SamplerCommand::Start) => {
                        if sampler.state() == SamplerState::Stopped {
                            sampler.start();
                            ticker = ticker_for(sampler.interval());
                        }
                    }
                    Some(SamplerCommand::Stop(ack)) => {
                        sampler.stop();
                        let _ = ack.send(());
                    }
                    Some(SamplerCommand::Shutdown) | None => {
                        sampler.stop();
                        break;
                    }
                },

                _ = ticker.tick(), if sampler.state() != SamplerState::Stopped => {
                    if let Some(read) = sampler.tick() {
                        let done = done_tx.clone();
                        tokio::spawn(async move {
                            let _ = done.send(read.resolve().await).await;
                        });
                    }
                }

                Some(outcome) = done_rx.recv() => {
                    if let Some(update) = sampler.complete(outcome) {
                        if tx.send(update).await.is_err() {
                            break; // all receivers dropped
                        }
                    }
                }
            }
        }

        debug!("Sampler task for {} exited", sampler.kind());
    });

    (SamplerHandle { tx: cmd_tx }, rx)
}

/// First tick one full period from now; a slow read delays the schedule
/// instead of queueing a burst of catch-up ticks.
fn ticker_for(period: Duration) -> Interval {
    let mut ticker = time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}
