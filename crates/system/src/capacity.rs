//! How many points fit on the chart at a given window size.

/// Fewest points ever plotted.
pub const MIN_CAPACITY: usize = 4;
/// Most points ever plotted.
pub const MAX_CAPACITY: usize = 45;

/// Windows at most this tall drop the per-point value labels.
const COMPACT_MAX_HEIGHT: f32 = 300.0;

/// `(width strictly greater than, compact capacity, full-label capacity)`,
/// widest first.
const BREAKPOINTS: [(f32, usize, usize); 10] = [
    (2500.0, 45, 40),
    (2200.0, 40, 35),
    (1900.0, 37, 32),
    (1500.0, 34, 29),
    (1200.0, 31, 26),
    (1000.0, 28, 23),
    (800.0,  24, 19),
    (600.0,  19, 14),
    (400.0,  13, 8),
    (200.0,  8,  4),
];

/// Whether each plotted point carries a value label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LabelMode {
    /// No labels; the chart takes the whole window.
    Compact,
    /// A value label above every point.
    #[default]
    Full,
}

impl LabelMode {
    /// Short windows switch to compact mode.
    pub fn for_height(height: f32) -> Self {
        if height > 0.0 && height <= COMPACT_MAX_HEIGHT {
            LabelMode::Compact
        } else {
            LabelMode::Full
        }
    }

    pub fn shows_labels(self) -> bool {
        self == LabelMode::Full
    }
}

/// Buffer capacity for a chart `width` pixels wide.
///
/// Non-decreasing in `width`, always within `[MIN_CAPACITY, MAX_CAPACITY]`,
/// and compact mode never holds fewer points than full-label mode.
pub fn capacity_for_width(width: f32, mode: LabelMode) -> usize {
    BREAKPOINTS
        .iter()
        .find(|(above, _, _)| width > *above)
        .map(|&(_, compact, full)| match mode {
            LabelMode::Compact => compact,
            LabelMode::Full => full,
        })
        .unwrap_or(MIN_CAPACITY)
        .clamp(MIN_CAPACITY, MAX_CAPACITY)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widths() -> impl Iterator<Item = f32> {
        (0..=4000).step_by(10).map(|w| w as f32)
    }

    #[test]
    fn monotonic_in_width() {
        for mode in [LabelMode::Compact, LabelMode::Full] {
            let mut prev = 0;
            for w in widths() {
                let cap = capacity_for_width(w, mode);
                assert!(cap >= prev, "{mode:?} dropped from {prev} to {cap} at {w}px");
                prev = cap;
            }
        }
    }

    #[test]
    fn bounded_for_all_widths() {
        for w in widths().chain([-50.0, f32::NAN, f32::INFINITY]) {
            for mode in [LabelMode::Compact, LabelMode::Full] {
                let cap = capacity_for_width(w, mode);
                assert!((MIN_CAPACITY..=MAX_CAPACITY).contains(&cap));
            }
        }
    }

    #[test]
    fn compact_holds_at_least_as_many_points() {
        for w in widths() {
            assert!(
                capacity_for_width(w, LabelMode::Compact) >= capacity_for_width(w, LabelMode::Full)
            );
        }
    }

    #[test]
    fn extremes_hit_the_clamps() {
        assert_eq!(capacity_for_width(10.0, LabelMode::Full), MIN_CAPACITY);
        assert_eq!(capacity_for_width(5000.0, LabelMode::Compact), MAX_CAPACITY);
    }

    #[test]
    fn short_windows_are_compact() {
        assert_eq!(LabelMode::for_height(150.0), LabelMode::Compact);
        assert_eq!(LabelMode::for_height(400.0), LabelMode::Full);
        assert_eq!(LabelMode::for_height(0.0), LabelMode::Full);
    }

    #[test]
    fn compact_cutoff_is_inclusive_at_300px() {
        assert_eq!(LabelMode::for_height(300.0), LabelMode::Compact);
        assert_eq!(LabelMode::for_height(300.5), LabelMode::Full);
        assert_eq!(LabelMode::for_height(301.0), LabelMode::Full);
    }
}
