use crate::error::MonError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which system resource the overlay is charting.
///
/// Exactly one kind is active per running instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MetricKind {
    /// Total processor load, percent.
    #[default]
    Cpu,
    /// Available physical memory, bytes.
    Memory,
    /// Bytes per second received + transmitted over all interfaces.
    Network,
    /// Bytes per second read + written by all disks.
    Disk,
    /// Bytes per second of process-level file I/O.
    FileSystem,
    /// Kernel call rate per second.
    SystemCalls,
}

impl MetricKind {
    pub const ALL: [MetricKind; 6] = [
        MetricKind::Cpu,
        MetricKind::Memory,
        MetricKind::Network,
        MetricKind::Disk,
        MetricKind::FileSystem,
        MetricKind::SystemCalls,
    ];

    /// Short tag shown in front of the value in the window title.
    pub fn tag(self) -> &'static str {
        match self {
            MetricKind::Cpu         => "CPU",
            MetricKind::Memory      => "RAM",
            MetricKind::Network     => "NET",
            MetricKind::Disk        => "DISK",
            MetricKind::FileSystem  => "FS",
            MetricKind::SystemCalls => "SYS",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MetricKind::Cpu         => "cpu",
            MetricKind::Memory      => "memory",
            MetricKind::Network     => "network",
            MetricKind::Disk        => "disk",
            MetricKind::FileSystem  => "filesystem",
            MetricKind::SystemCalls => "systemcalls",
        };
        f.write_str(name)
    }
}

/// Loose, case-insensitive matching: `"Processor"` selects CPU, `"ssd"` selects
/// disk, and so on. The first matching rule wins.
impl FromStr for MetricKind {
    type Err = MonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        const RULES: [(&[&str], MetricKind); 6] = [
            (&["cpu", "processor"], MetricKind::Cpu),
            (&["memory", "ram"], MetricKind::Memory),
            (&["net", "lan"], MetricKind::Network),
            (&["disk", "ssd"], MetricKind::Disk),
            (&["file", "fs"], MetricKind::FileSystem),
            (&["sys", "calls"], MetricKind::SystemCalls),
        ];

        let needle = s.trim().to_lowercase();
        if needle.is_empty() {
            return Err(MonError::Config("empty metric kind".into()));
        }

        RULES
            .iter()
            .find(|(words, _)| words.iter().any(|w| needle.contains(w)))
            .map(|(_, kind)| *kind)
            .ok_or_else(|| MonError::Config(format!("unknown metric kind '{s}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_loose_aliases() {
        assert_eq!("Processor".parse::<MetricKind>().unwrap(), MetricKind::Cpu);
        assert_eq!("RAM".parse::<MetricKind>().unwrap(), MetricKind::Memory);
        assert_eq!("lan".parse::<MetricKind>().unwrap(), MetricKind::Network);
        assert_eq!("ssd".parse::<MetricKind>().unwrap(), MetricKind::Disk);
        assert_eq!("filesystem".parse::<MetricKind>().unwrap(), MetricKind::FileSystem);
        assert_eq!("syscalls".parse::<MetricKind>().unwrap(), MetricKind::SystemCalls);
    }

    #[test]
    fn display_round_trips_through_parse() {
        for kind in MetricKind::ALL {
            assert_eq!(kind.to_string().parse::<MetricKind>().unwrap(), kind);
        }
    }

    #[test]
    fn rejects_unknown_and_empty() {
        assert!("gpu".parse::<MetricKind>().is_err());
        assert!("  ".parse::<MetricKind>().is_err());
    }
}
