pub mod colors;
pub mod style;

pub use colors::{pressure_color, Color};
pub use style::ChartStyle;

use graphmon_config::ThemeConfig;

/// Compiled theme derived from [`ThemeConfig`].
///
/// All colors are pre-parsed from hex strings into normalised `[0, 1]` RGBA.
/// Calling [`Theme::from_config`] is infallible; invalid color strings fall
/// back to safe defaults.
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub foreground: Color,
    pub accent:     Color,
    pub font_size:  f32,
    pub line_width: f32,
    pub padding:    u16,
}

impl Theme {
    /// Build a [`Theme`] from the config file's `[theme]` section.
    pub fn from_config(cfg: &ThemeConfig) -> Self {
        Self {
            background: Color::from_hex(&cfg.background).unwrap_or(Color::DARK),
            foreground: Color::from_hex(&cfg.foreground).unwrap_or(Color::WHITE),
            accent:     Color::from_hex(&cfg.accent).unwrap_or(Color::BLUE),
            font_size:  cfg.font_size.max(6.0),
            line_width: cfg.line_width.max(0.5),
            padding:    cfg.padding,
        }
    }

    /// Chart styling derived from this theme.
    pub fn chart_style(&self) -> ChartStyle {
        ChartStyle {
            line:       self.accent,
            grid:       self.foreground.with_alpha(0.12),
            label:      self.foreground.with_alpha(0.8),
            line_width: self.line_width,
            label_size: (self.font_size - 3.0).max(6.0),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_config(&ThemeConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_hex_falls_back() {
        let cfg = ThemeConfig {
            background: "not a color".into(),
            ..ThemeConfig::default()
        };
        assert_eq!(Theme::from_config(&cfg).background, Color::DARK);
    }
}
