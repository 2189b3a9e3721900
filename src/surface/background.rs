use crate::color::Color;
use crate::surface::pixel_buffer::PixelBuffer;

/// Display underlay shown beneath the committed layer. Never part of the
/// history.
#[derive(Debug, Clone, PartialEq)]
pub enum Background {
    Transparent,
    Solid(Color),
    /// Evenly spaced stops along a 135° diagonal (top-left to bottom-right)
    Gradient(Vec<Color>),
}

/// Known preset identifiers
pub const PRESETS: &[&str] = &[
    "transparent",
    "white",
    "black",
    "dark-gray",
    "navy",
    "deep-purple",
    "canvas-texture",
    "circuit",
    "hex-grid",
    "digital-noise",
    "neon-gradient",
    "cyber-gradient",
    "green-gradient",
    "parchment",
    "sketch",
    "holographic",
    "matrix",
    "geometric",
    "grid",
    "dots",
    "canvas",
];

impl Background {
    /// Resolves a preset id or a `#RRGGBB` color. Unknown ids yield `None`.
    pub fn from_id(id: &str) -> Option<Self> {
        if let Some(color) = Color::parse_hex(id) {
            return Some(Background::Solid(color));
        }
        let hex = |s: &str| Color::parse_or(s, Color::BLACK);
        let solid = |s: &str| Some(Background::Solid(hex(s)));
        let gradient = |stops: &[&str]| Some(Background::Gradient(stops.iter().map(|s| hex(*s)).collect()));
        match id {
            "transparent" | "canvas" => Some(Background::Transparent),
            "white" => solid("#ffffff"),
            "black" | "matrix" => solid("#000000"),
            "dark-gray" => solid("#1a1a1a"),
            "navy" => solid("#000080"),
            "deep-purple" => solid("#301934"),
            // Textured presets render as their base color
            "canvas-texture" => solid("#f5f5dc"),
            "circuit" | "geometric" => solid("#0a0a0a"),
            "hex-grid" => solid("#0a192f"),
            "digital-noise" => solid("#111111"),
            "parchment" => solid("#f5f0e1"),
            "sketch" | "grid" | "dots" => solid("#ffffff"),
            "neon-gradient" => gradient(&["#00f5ff", "#9d00ff"]),
            "cyber-gradient" => gradient(&["#ff00ff", "#00f5ff"]),
            "green-gradient" => gradient(&["#39ff14", "#00f5ff"]),
            "holographic" => gradient(&["#ff00ff", "#00f5ff", "#39ff14"]),
            _ => None,
        }
    }

    /// The single color a clear operation should paint, if any.
    pub fn base_color(&self) -> Option<Color> {
        match self {
            Background::Transparent => None,
            Background::Solid(color) => Some(*color),
            Background::Gradient(stops) => stops.first().copied(),
        }
    }

    /// Color at normalized position `t` along the gradient axis.
    fn sample(stops: &[Color], t: f32) -> Color {
        match stops {
            [] => Color::BLACK,
            [only] => *only,
            _ => {
                let segments = (stops.len() - 1) as f32;
                let position = t.clamp(0.0, 1.0) * segments;
                let index = (position.floor() as usize).min(stops.len() - 2);
                stops[index].lerp(stops[index + 1], position - index as f32)
            }
        }
    }

    /// Renders the underlay at the given device size. `None` for a
    /// transparent background.
    pub fn render(&self, width: u32, height: u32) -> Option<PixelBuffer> {
        match self {
            Background::Transparent => None,
            Background::Solid(color) => Some(PixelBuffer::filled(width, height, color.with_alpha(255))),
            Background::Gradient(stops) => {
                let mut buffer = PixelBuffer::new(width, height);
                let span = (width + height).saturating_sub(2).max(1) as f32;
                for y in 0..height {
                    for x in 0..width {
                        let color = Self::sample(stops, (x + y) as f32 / span);
                        buffer.put_pixel(x as i32, y as i32, color.with_alpha(255));
                    }
                }
                Some(buffer)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_preset_resolves() {
        for id in PRESETS {
            assert!(Background::from_id(id).is_some(), "{id}");
        }
        assert_eq!(Background::from_id("nope"), None);
    }

    #[test]
    fn hex_ids_are_solid_colors() {
        assert_eq!(
            Background::from_id("#102030"),
            Some(Background::Solid(Color::rgb(0x10, 0x20, 0x30)))
        );
    }

    #[test]
    fn gradient_runs_corner_to_corner() {
        let bg = Background::Gradient(vec![Color::BLACK, Color::WHITE]);
        let buffer = bg.render(4, 4).expect("opaque");
        assert_eq!(buffer.pixel(0, 0), Some([0, 0, 0, 255]));
        assert_eq!(buffer.pixel(3, 3), Some([255, 255, 255, 255]));
    }

    #[test]
    fn transparent_renders_nothing() {
        assert!(Background::Transparent.render(4, 4).is_none());
        assert_eq!(Background::Transparent.base_color(), None);
    }
}
