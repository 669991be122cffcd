use crate::colors::Color;

/// Visual settings for the scrolling chart.
#[derive(Debug, Clone)]
pub struct ChartStyle {
    /// Line color for non-CPU kinds.
    pub line:       Color,
    /// Horizontal guide lines.
    pub grid:       Color,
    /// Per-point value labels (full label mode only).
    pub label:      Color,
    pub line_width: f32,
    pub label_size: f32,
}
