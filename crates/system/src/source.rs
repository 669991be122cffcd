use crate::{error::SystemError, procfs};
use graphmon_core::MetricKind;
use std::sync::Mutex;
use std::time::Instant;
use sysinfo::{
    Disks, Networks, ProcessRefreshKind, ProcessesToUpdate, System, MINIMUM_CPU_UPDATE_INTERVAL,
};

/// Anything that can produce one scalar for a [`MetricKind`].
///
/// Reads may block (counter initialisation can take a second or more), so
/// callers run them off the scheduling context.
pub trait MetricSource: Send + Sync {
    fn read_scalar(&self, kind: MetricKind) -> Result<f64, SystemError>;
}

/// [`MetricSource`] backed by `sysinfo` and, for the kernel call rate, `/proc`.
///
/// Rate kinds diff two consecutive counter readings, so their first read
/// returns `0.0`.
#[derive(Debug, Default)]
pub struct SysinfoSource {
    probe: Mutex<Probe>,
}

impl SysinfoSource {
    /// Cheap; all OS handles are opened lazily on the first read.
    pub fn new() -> Self {
        Self::default()
    }
}

impl MetricSource for SysinfoSource {
    fn read_scalar(&self, kind: MetricKind) -> Result<f64, SystemError> {
        let mut probe = self.probe.lock().map_err(|_| SystemError::Poisoned)?;
        match kind {
            MetricKind::Cpu         => Ok(probe.cpu()),
            MetricKind::Memory      => probe.memory(),
            MetricKind::Network     => Ok(probe.network()),
            MetricKind::Disk        => Ok(probe.disk()),
            MetricKind::FileSystem  => Ok(probe.filesystem()),
            MetricKind::SystemCalls => probe.kernel_calls(),
        }
    }
}

/// Elapsed seconds between consecutive reads of one counter.
#[derive(Debug, Default)]
struct RateClock {
    last: Option<Instant>,
}

impl RateClock {
    /// Seconds since the previous lap, `None` on the first.
    fn lap(&mut self) -> Option<f64> {
        let now = Instant::now();
        let elapsed = self.last.map(|t| now.duration_since(t).as_secs_f64());
        self.last = Some(now);
        elapsed
    }
}

fn per_sec(delta: u64, secs: Option<f64>) -> f64 {
    match secs {
        Some(s) if s > 0.0 => delta as f64 / s,
        _ => 0.0,
    }
}

#[derive(Debug, Default)]
struct Probe {
    system:     System,
    cpu_primed: bool,
    networks:   Option<Networks>,
    net_clock:  RateClock,
    disks:      Option<Disks>,
    disk_clock: RateClock,
    fs_primed:  bool,
    fs_clock:   RateClock,
    last_ctxt:  Option<u64>,
    ctxt_clock: RateClock,
}

impl Probe {
    fn cpu(&mut self) -> f64 {
        // Usage is a delta between two refreshes; the first one needs a
        // second refresh after the minimum interval or it reads 0.
        if !self.cpu_primed {
            self.system.refresh_cpu_usage();
            std::thread::sleep(MINIMUM_CPU_UPDATE_INTERVAL);
            self.cpu_primed = true;
        }
        self.system.refresh_cpu_usage();
        f64::from(self.system.global_cpu_usage())
    }

    fn memory(&mut self) -> Result<f64, SystemError> {
        self.system.refresh_memory();
        if self.system.total_memory() == 0 {
            return Err(SystemError::Unavailable(MetricKind::Memory));
        }
        Ok(self.system.available_memory() as f64)
    }

    fn network(&mut self) -> f64 {
        match self.networks.as_mut() {
            None => {
                self.networks = Some(Networks::new_with_refreshed_list());
                self.net_clock.lap();
                0.0
            }
            Some(networks) => {
                // `received()` / `transmitted()` are deltas since the last refresh.
                networks.refresh(false);
                let bytes: u64 = networks
                    .iter()
                    .map(|(_, data)| data.received() + data.transmitted())
                    .sum();
                per_sec(bytes, self.net_clock.lap())
            }
        }
    }

    fn disk(&mut self) -> f64 {
        match self.disks.as_mut() {
            None => {
                self.disks = Some(Disks::new_with_refreshed_list());
                self.disk_clock.lap();
                0.0
            }
            Some(disks) => {
                disks.refresh(false);
                let bytes: u64 = disks
                    .iter()
                    .map(|d| {
                        let usage = d.usage();
                        usage.read_bytes + usage.written_bytes
                    })
                    .sum();
                per_sec(bytes, self.disk_clock.lap())
            }
        }
    }

    fn filesystem(&mut self) -> f64 {
        self.system.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::nothing().with_disk_usage(),
        );
        let secs = self.fs_clock.lap();
        if !self.fs_primed {
            self.fs_primed = true;
            return 0.0;
        }
        let bytes: u64 = self
            .system
            .processes()
            .values()
            .map(|p| {
                let usage = p.disk_usage();
                usage.read_bytes + usage.written_bytes
            })
            .sum();
        per_sec(bytes, secs)
    }

    fn kernel_calls(&mut self) -> Result<f64, SystemError> {
        let now = procfs::read_context_switches()
            .ok_or(SystemError::Unavailable(MetricKind::SystemCalls))?;
        let secs = self.ctxt_clock.lap();
        let delta = self.last_ctxt.map(|prev| now.saturating_sub(prev));
        self.last_ctxt = Some(now);
        Ok(delta.map_or(0.0, |d| per_sec(d, secs)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn per_sec_handles_first_and_zero_elapsed() {
        assert_eq!(per_sec(1000, None), 0.0);
        assert_eq!(per_sec(1000, Some(0.0)), 0.0);
        assert_eq!(per_sec(1000, Some(2.0)), 500.0);
    }

    #[test]
    fn rate_clock_first_lap_is_none() {
        let mut clock = RateClock::default();
        assert!(clock.lap().is_none());
        assert!(clock.lap().is_some());
    }

    #[test]
    fn rate_kinds_start_at_zero() {
        let source = SysinfoSource::new();
        assert_eq!(source.read_scalar(MetricKind::Network), Ok(0.0));
        assert_eq!(source.read_scalar(MetricKind::Disk), Ok(0.0));
    }

    #[test]
    fn cpu_reading_is_a_percentage() {
        let source = SysinfoSource::new();
        let pct = source.read_scalar(MetricKind::Cpu).unwrap();
        assert!((0.0..=100.0 + f64::EPSILON).contains(&pct), "cpu read {pct}");
    }
}
