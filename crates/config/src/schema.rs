use graphmon_core::{MetricKind, SamplingSchedule};
use serde::{Deserialize, Serialize};

/// Root configuration structure parsed from `graphmon.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MonitorConfig {
    /// What to sample and how often.
    pub sampling: SamplingConfig,
    /// Overlay window geometry and behaviour.
    pub window: WindowConfig,
    /// Theme / visual settings.
    pub theme: ThemeConfig,
}

/// Sampling settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    /// Seconds between samples. Clamped to `[0.5, 60.0]` when used.
    pub interval_secs: f64,
    /// Metric to chart.
    pub kind: MetricKind,
}

impl SamplingConfig {
    /// The clamped schedule this config describes.
    pub fn schedule(&self) -> SamplingSchedule {
        SamplingSchedule::from_secs(self.interval_secs)
    }
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            interval_secs: SamplingSchedule::DEFAULT_SECS,
            kind:          MetricKind::Cpu,
        }
    }
}

/// Window geometry. Persisted on close so the overlay reopens where it was.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub x: i32,
    pub y: i32,
    /// Width in logical pixels.
    pub width: u32,
    /// Height in logical pixels.
    pub height: u32,
    /// Ignore `x` / `y` and centre on the primary screen.
    pub center_screen: bool,
    /// Keep the overlay above other windows.
    pub always_on_top: bool,
    /// Background opacity (0.0 – 1.0).
    pub opacity: f32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            x:             100,
            y:             100,
            width:         400,
            height:        200,
            center_screen: false,
            always_on_top: true,
            opacity:       0.9,
        }
    }
}

/// Theme / styling configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// Window background color (hex, e.g. `"#1e1e2e"`).
    pub background: String,
    /// Label / title text color.
    pub foreground: String,
    /// Line color for every kind except CPU, which uses the pressure palette.
    pub accent: String,
    /// Font size in points.
    pub font_size: f32,
    /// Chart line width (pixels).
    pub line_width: f32,
    /// Inner padding around the chart (pixels).
    pub padding: u16,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            background: "#1e1e2e".to_string(), // Catppuccin Mocha base
            foreground: "#cdd6f4".to_string(), // Catppuccin Mocha text
            accent:     "#89b4fa".to_string(), // Catppuccin Mocha blue
            font_size:  13.0,
            line_width: 2.0,
            padding:    6,
        }
    }
}
