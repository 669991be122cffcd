/// Read the cumulative context-switch counter from `/proc/stat`.
///
/// Linux exposes no system-wide syscall counter, so this is the closest
/// kernel-activity figure available. Returns `None` anywhere `/proc/stat` is
/// missing or malformed.
pub fn read_context_switches() -> Option<u64> {
    let raw = std::fs::read_to_string("/proc/stat").ok()?;
    parse_context_switches(&raw)
}

fn parse_context_switches(stat: &str) -> Option<u64> {
    stat.lines()
        .find_map(|line| line.strip_prefix("ctxt "))
        .and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_ctxt_line() {
        let stat = "cpu  10 0 5 100 0 0 0 0 0 0\nintr 12345 0 0\nctxt 987654321\nbtime 1700000000\n";
        assert_eq!(parse_context_switches(stat), Some(987_654_321));
    }

    #[test]
    fn missing_or_garbled_ctxt() {
        assert_eq!(parse_context_switches("cpu 1 2 3\n"), None);
        assert_eq!(parse_context_switches("ctxt lots\n"), None);
    }
}
