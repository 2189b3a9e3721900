use egui::Color32;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Preset swatches offered by settings UIs
pub const PALETTE: [&str; 10] = [
    "#00f5ff", // cyan
    "#39ff14", // neon green
    "#ff00ff", // magenta
    "#ff3131", // red
    "#ffff00", // yellow
    "#ffffff", // white
    "#1a1a1a", // dark gray
    "#9d00ff", // purple
    "#00ff9d", // mint
    "#0066ff", // blue
];

/// An opaque drawing color, always written as `#RRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const DEFAULT: Color = Color::rgb(0x00, 0xf5, 0xff);
    pub const WHITE: Color = Color::rgb(0xff, 0xff, 0xff);
    pub const BLACK: Color = Color::rgb(0x00, 0x00, 0x00);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Strict parse: exactly `#` followed by six hex digits.
    pub fn parse_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#')?;
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        Some(Self {
            r: u8::from_str_radix(&digits[0..2], 16).ok()?,
            g: u8::from_str_radix(&digits[2..4], 16).ok()?,
            b: u8::from_str_radix(&digits[4..6], 16).ok()?,
        })
    }

    /// Parse, substituting `fallback` for anything that is not `#RRGGBB`.
    pub fn parse_or(hex: &str, fallback: Color) -> Self {
        match Self::parse_hex(hex) {
            Some(color) => color,
            None => {
                log::debug!("Rejected color '{}', using {}", hex, fallback);
                fallback
            }
        }
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Straight RGBA with the given alpha
    pub fn with_alpha(&self, a: u8) -> [u8; 4] {
        [self.r, self.g, self.b, a]
    }

    pub fn to_color32(&self) -> Color32 {
        Color32::from_rgb(self.r, self.g, self.b)
    }

    /// Linear interpolation between two colors, `t` in [0, 1].
    pub fn lerp(&self, other: Color, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Color::rgb(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::parse_hex(&value).ok_or_else(|| format!("'{}' is not a #RRGGBB color", value))
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_mixed_case_hex() {
        assert_eq!(Color::parse_hex("#00F5ff"), Some(Color::rgb(0, 0xf5, 0xff)));
    }

    #[test]
    fn rejects_short_long_and_unprefixed_values() {
        for bad in ["#fff", "00f5ff", "#00f5ff00", "#0g0000", "", "#", "#ééé"] {
            assert_eq!(Color::parse_hex(bad), None, "{bad}");
        }
    }

    #[test]
    fn invalid_input_falls_back() {
        assert_eq!(Color::parse_or("red", Color::DEFAULT), Color::DEFAULT);
        assert_eq!(Color::parse_or("#123456", Color::DEFAULT).to_hex(), "#123456");
    }

    #[test]
    fn palette_entries_are_valid() {
        assert!(PALETTE.iter().all(|hex| Color::parse_hex(hex).is_some()));
    }
}
