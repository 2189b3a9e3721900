use crate::color::Color;
use crate::surface::pixel_buffer::CompositeMode;
use egui::{Pos2, Rect, Vec2};

/// Dash pattern of the selection marquee: 5 on, 5 off
pub const MARQUEE_DASH: [f32; 2] = [5.0, 5.0];

/// Something that can be rasterized onto a surface layer.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Rect(Rect),
    Ellipse { center: Pos2, radius: Vec2 },
    Line { from: Pos2, to: Pos2 },
    /// Closed path through the points
    Polygon(Vec<Pos2>),
    /// Open path chain through the points
    Polyline(Vec<Pos2>),
    /// A single line of glyphs; `origin` is the top-left of the run.
    Text {
        origin: Pos2,
        text: String,
        font: FontSpec,
    },
}

impl Primitive {
    /// Ellipse inscribed in the given box
    pub fn ellipse_in(rect: Rect) -> Self {
        Primitive::Ellipse {
            center: rect.center(),
            radius: rect.size() / 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    /// Size in logical pixels
    pub size: f32,
    pub family: String,
}

impl FontSpec {
    pub fn new(size: f32, family: impl Into<String>) -> Self {
        Self {
            size,
            family: family.into(),
        }
    }
}

/// Whether a shape is outlined or filled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawMode {
    Stroke {
        width: f32,
        dash: Option<[f32; 2]>,
    },
    Fill,
}

/// Complete style of a single draw call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Paint {
    pub color: Color,
    pub mode: DrawMode,
    pub composite: CompositeMode,
}

impl Paint {
    /// Solid round-capped stroke
    pub fn stroke(color: Color, width: f32) -> Self {
        Self {
            color,
            mode: DrawMode::Stroke { width, dash: None },
            composite: CompositeMode::SourceOver,
        }
    }

    pub fn fill(color: Color) -> Self {
        Self {
            color,
            mode: DrawMode::Fill,
            composite: CompositeMode::SourceOver,
        }
    }

    /// Outline or fill depending on the fill-mode toggle
    pub fn shape(color: Color, width: f32, filled: bool) -> Self {
        if filled {
            Self::fill(color)
        } else {
            Self::stroke(color, width)
        }
    }

    /// Stroke that removes alpha instead of painting
    pub fn eraser(width: f32) -> Self {
        Self {
            color: Color::BLACK,
            mode: DrawMode::Stroke { width, dash: None },
            composite: CompositeMode::DestinationOut,
        }
    }

    /// The fixed white dashed hairline drawn around selections
    pub fn marquee() -> Self {
        Self {
            color: Color::WHITE,
            mode: DrawMode::Stroke {
                width: 1.0,
                dash: Some(MARQUEE_DASH),
            },
            composite: CompositeMode::SourceOver,
        }
    }
}
