//! Unit formatting for displayed values. Pure functions of kind and value.

use crate::kind::MetricKind;

const UNITS: [&str; 6] = ["KB", "MB", "GB", "TB", "PB", "EB"];

/// Format a byte count the way a browser download list does: binary
/// multiples, no decimals (`"512 Bytes"`, `"12KB"`, `"3GB"`).
pub fn format_bytes(bytes: f64) -> String {
    let bytes = bytes.max(0.0);
    if bytes < 1024.0 {
        return format!("{bytes:.0} Bytes");
    }

    let mut scaled = bytes / 1024.0;
    for unit in &UNITS[..UNITS.len() - 1] {
        if scaled < 1024.0 {
            return format!("{scaled:.0}{unit}");
        }
        scaled /= 1024.0;
    }
    format!("{scaled:.0}{}", UNITS[UNITS.len() - 1])
}

/// Format a per-second rate with thousands separators (`"1,234/s"`).
pub fn format_rate(per_sec: f64) -> String {
    format!("{}/s", group_thousands(per_sec.max(0.0).round() as u64))
}

/// Format a percentage with no decimals (`"42%"`).
pub fn format_percent(pct: f64) -> String {
    format!("{pct:.0}%")
}

/// Format `value` with the unit rule that belongs to `kind`.
pub fn format_value(kind: MetricKind, value: f64) -> String {
    match kind {
        MetricKind::Cpu => format_percent(value),
        MetricKind::Memory | MetricKind::Network | MetricKind::FileSystem => format_bytes(value),
        MetricKind::Disk | MetricKind::SystemCalls => format_rate(value),
    }
}

/// Window title / label text, e.g. `"CPU 42%"`. `None` means the source had
/// nothing to report this tick.
pub fn title_for(kind: MetricKind, reading: Option<f64>) -> String {
    match reading {
        Some(value) => format!("{} {}", kind.tag(), format_value(kind, value)),
        None => format!("{} n/a", kind.tag()),
    }
}

/// `"avg 12% · peak 40%"`, each value formatted with the kind's rule.
pub fn summary_for(kind: MetricKind, average: f64, peak: f64) -> String {
    format!("avg {} · peak {}", format_value(kind, average), format_value(kind, peak))
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
