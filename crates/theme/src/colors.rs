/// Normalised RGBA colour (each channel in `[0.0, 1.0]`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const DARK:  Self = Self { r: 0.118, g: 0.118, b: 0.180, a: 1.0 }; // #1e1e2e
    pub const WHITE: Self = Self { r: 0.804, g: 0.839, b: 0.957, a: 1.0 }; // #cdd6f4
    pub const BLUE:  Self = Self { r: 0.537, g: 0.706, b: 0.980, a: 1.0 }; // #89b4fa

    /// Parse a CSS-style hex color string (`#RRGGBB` or `#RRGGBBAA`).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        if !hex.is_ascii() {
            return None;
        }

        let byte = |s: &str| -> Option<u8> { u8::from_str_radix(s, 16).ok() };

        match hex.len() {
            6 => Some(Self {
                r: byte(&hex[0..2])? as f32 / 255.0,
                g: byte(&hex[2..4])? as f32 / 255.0,
                b: byte(&hex[4..6])? as f32 / 255.0,
                a: 1.0,
            }),
            8 => Some(Self {
                r: byte(&hex[0..2])? as f32 / 255.0,
                g: byte(&hex[2..4])? as f32 / 255.0,
                b: byte(&hex[4..6])? as f32 / 255.0,
                a: byte(&hex[6..8])? as f32 / 255.0,
            }),
            _ => None,
        }
    }

    fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r: r as f32 / 255.0, g: g as f32 / 255.0, b: b as f32 / 255.0, a: 1.0 }
    }

    /// Convert to an [`iced::Color`] for use in Iced widgets.
    #[inline]
    pub fn to_iced(self) -> iced::Color {
        iced::Color::from_rgba(self.r, self.g, self.b, self.a)
    }

    /// Return a copy with the alpha channel set to `alpha`.
    #[inline]
    #[must_use]
    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.a = alpha.clamp(0.0, 1.0);
        self
    }
}

/// Seven-step palette for CPU pressure, cool to hot.
pub fn pressure_color(cpu_pct: f64) -> Color {
    match cpu_pct {
        p if p > 89.0 => Color::rgb(0xff, 0x45, 0x00), // orange red
        p if p > 79.0 => Color::rgb(0xff, 0xa5, 0x00), // orange
        p if p > 49.0 => Color::rgb(0xff, 0xff, 0x00), // yellow
        p if p > 29.0 => Color::rgb(0x9a, 0xcd, 0x32), // yellow green
        p if p > 19.0 => Color::rgb(0x00, 0xff, 0x7f), // spring green
        p if p > 9.0  => Color::rgb(0x66, 0xcd, 0xaa), // medium aquamarine
        _             => Color::rgb(0x1e, 0x90, 0xff), // dodger blue
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rgb_and_rgba() {
        assert_eq!(Color::from_hex("#ffffff").map(|c| c.a), Some(1.0));
        assert_eq!(Color::from_hex("00000080").map(|c| (c.a * 255.0).round()), Some(128.0));
        assert!(Color::from_hex("#fff").is_none());
        assert!(Color::from_hex("#gg0000").is_none());
    }

    #[test]
    fn pressure_palette_steps() {
        assert_eq!(pressure_color(95.0), pressure_color(90.0));
        assert_ne!(pressure_color(89.0), pressure_color(90.0));
        assert_eq!(pressure_color(0.0), pressure_color(9.0));
        assert_ne!(pressure_color(9.0), pressure_color(10.0));
    }
}
