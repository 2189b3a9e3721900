use crate::color::Color;
use crate::config::SessionConfig;
use crate::fill::FillConfig;
use crate::surface::{Layer, Paint, Primitive, RasterSurface};
use egui::{Modifiers, Pos2};
use serde::{Deserialize, Serialize};

/// Identity of every tool the session can activate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolId {
    Brush,
    Eraser,
    Line,
    Rectangle,
    Circle,
    Polygon,
    Text,
    Fill,
    #[serde(rename = "eyedropper")]
    ColorPick,
    Selection,
}

impl ToolId {
    pub const ALL: [ToolId; 10] = [
        ToolId::Brush,
        ToolId::Eraser,
        ToolId::Line,
        ToolId::Rectangle,
        ToolId::Circle,
        ToolId::Polygon,
        ToolId::Text,
        ToolId::Fill,
        ToolId::ColorPick,
        ToolId::Selection,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ToolId::Brush => "brush",
            ToolId::Eraser => "eraser",
            ToolId::Line => "line",
            ToolId::Rectangle => "rectangle",
            ToolId::Circle => "circle",
            ToolId::Polygon => "polygon",
            ToolId::Text => "text",
            ToolId::Fill => "fill",
            ToolId::ColorPick => "eyedropper",
            ToolId::Selection => "selection",
        }
    }

    /// Human readable label for tool buttons
    pub fn label(&self) -> &'static str {
        match self {
            ToolId::Brush => "Brush",
            ToolId::Eraser => "Eraser",
            ToolId::Line => "Line",
            ToolId::Rectangle => "Rectangle",
            ToolId::Circle => "Circle",
            ToolId::Polygon => "Polygon",
            ToolId::Text => "Text",
            ToolId::Fill => "Fill",
            ToolId::ColorPick => "Color Picker",
            ToolId::Selection => "Select",
        }
    }

    /// Single-letter shortcut a host may bind
    pub fn hotkey(&self) -> char {
        match self {
            ToolId::Brush => 'b',
            ToolId::Eraser => 'e',
            ToolId::Line => 'l',
            ToolId::Rectangle => 'r',
            ToolId::Circle => 'c',
            ToolId::Polygon => 'p',
            ToolId::Text => 't',
            ToolId::Fill => 'f',
            ToolId::ColorPick => 'i',
            ToolId::Selection => 's',
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.name() == name)
    }

    pub fn from_hotkey(key: char) -> Option<Self> {
        let key = key.to_ascii_lowercase();
        Self::ALL.into_iter().find(|id| id.hotkey() == key)
    }
}

/// Settings owned by the session that tools read at every event.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolSettings {
    pub color: Color,
    pub brush_width: u32,
    pub fill_mode: bool,
    pub fill: FillConfig,
    pub font_size: f32,
    pub font_family: String,
    pub selection_slop: f32,
}

impl ToolSettings {
    pub fn from_config(config: &SessionConfig) -> Self {
        Self {
            color: config.default_color,
            brush_width: config.default_brush_width,
            fill_mode: false,
            fill: config.fill,
            font_size: config.default_font_size,
            font_family: config.default_font_family.clone(),
            selection_slop: config.selection_hit_slop,
        }
    }

    /// Stroke width in logical units
    pub fn width(&self) -> f32 {
        self.brush_width as f32
    }
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self::from_config(&SessionConfig::default())
    }
}

/// Everything a tool transition may touch.
pub struct ToolContext<'a> {
    pub surface: &'a mut RasterSurface,
    pub settings: &'a ToolSettings,
}

/// Asks the text-entry collaborator for a string to place at `origin`.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRequest {
    pub origin: Pos2,
    pub font_size: f32,
    pub font_family: String,
}

/// Outcome of a tool transition, interpreted by the session.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolResponse {
    None,
    /// The committed layer changed and a snapshot should be recorded
    Committed,
    ColorPicked(Color),
    TextRequested(TextRequest),
}

/// Tool trait defines the interface for all drawing tools
pub trait Tool {
    fn name(&self) -> &'static str;

    /// Name of the current state, for logging and tests
    fn current_state_name(&self) -> &'static str;

    fn is_idle(&self) -> bool;

    fn on_pointer_down(&mut self, pos: Pos2, modifiers: Modifiers, ctx: &mut ToolContext<'_>) -> ToolResponse;

    fn on_pointer_move(&mut self, pos: Pos2, modifiers: Modifiers, ctx: &mut ToolContext<'_>) -> ToolResponse;

    fn on_pointer_up(&mut self, pos: Pos2, modifiers: Modifiers, ctx: &mut ToolContext<'_>) -> ToolResponse;

    fn on_double_click(&mut self, _ctx: &mut ToolContext<'_>) -> ToolResponse {
        ToolResponse::None
    }

    /// Escape: abandon whatever is in progress.
    fn on_cancel(&mut self, ctx: &mut ToolContext<'_>) -> ToolResponse;

    /// Called before another tool becomes active or a history action runs.
    /// Defaults to cancelling.
    fn deactivate(&mut self, ctx: &mut ToolContext<'_>) -> ToolResponse {
        self.on_cancel(ctx)
    }
}

/// Draws onto the surface, logging instead of failing.
pub(crate) fn draw_logged(ctx: &mut ToolContext<'_>, layer: Layer, primitive: &Primitive, paint: &Paint) -> bool {
    match ctx.surface.draw(layer, primitive, paint) {
        Ok(()) => true,
        Err(err) => {
            log::warn!("Draw failed: {}", err);
            false
        }
    }
}

mod color_pick_tool;
mod fill_tool;
mod freehand_tool;
mod line_tool;
mod polygon_tool;
mod selection_tool;
mod shape_tool;
mod text_tool;

pub use color_pick_tool::ColorPickTool;
pub use fill_tool::FillTool;
pub use freehand_tool::{FreehandMode, FreehandTool};
pub use line_tool::LineTool;
pub use polygon_tool::PolygonTool;
pub use selection_tool::{SelectionPayload, SelectionTool};
pub use shape_tool::{ShapeKind, ShapeTool};
pub use text_tool::TextTool;

/// Enum representing all available tool types
#[derive(Debug, Clone)]
pub enum ToolType {
    Freehand(FreehandTool),
    Line(LineTool),
    Shape(ShapeTool),
    Polygon(PolygonTool),
    Text(TextTool),
    Fill(FillTool),
    ColorPick(ColorPickTool),
    Selection(SelectionTool),
}

macro_rules! each_tool {
    ($value:expr, $tool:ident => $body:expr) => {
        match $value {
            ToolType::Freehand($tool) => $body,
            ToolType::Line($tool) => $body,
            ToolType::Shape($tool) => $body,
            ToolType::Polygon($tool) => $body,
            ToolType::Text($tool) => $body,
            ToolType::Fill($tool) => $body,
            ToolType::ColorPick($tool) => $body,
            ToolType::Selection($tool) => $body,
        }
    };
}

impl ToolType {
    pub fn new(id: ToolId) -> Self {
        match id {
            ToolId::Brush => ToolType::Freehand(FreehandTool::new(FreehandMode::Paint)),
            ToolId::Eraser => ToolType::Freehand(FreehandTool::new(FreehandMode::Erase)),
            ToolId::Line => ToolType::Line(LineTool::new()),
            ToolId::Rectangle => ToolType::Shape(ShapeTool::new(ShapeKind::Rectangle)),
            ToolId::Circle => ToolType::Shape(ShapeTool::new(ShapeKind::Ellipse)),
            ToolId::Polygon => ToolType::Polygon(PolygonTool::new()),
            ToolId::Text => ToolType::Text(TextTool::new()),
            ToolId::Fill => ToolType::Fill(FillTool),
            ToolId::ColorPick => ToolType::ColorPick(ColorPickTool),
            ToolId::Selection => ToolType::Selection(SelectionTool::new()),
        }
    }

    pub fn id(&self) -> ToolId {
        match self {
            ToolType::Freehand(tool) => match tool.mode() {
                FreehandMode::Paint => ToolId::Brush,
                FreehandMode::Erase => ToolId::Eraser,
            },
            ToolType::Line(_) => ToolId::Line,
            ToolType::Shape(tool) => match tool.kind() {
                ShapeKind::Rectangle => ToolId::Rectangle,
                ShapeKind::Ellipse => ToolId::Circle,
            },
            ToolType::Polygon(_) => ToolId::Polygon,
            ToolType::Text(_) => ToolId::Text,
            ToolType::Fill(_) => ToolId::Fill,
            ToolType::ColorPick(_) => ToolId::ColorPick,
            ToolType::Selection(_) => ToolId::Selection,
        }
    }

    pub fn as_selection_tool(&self) -> Option<&SelectionTool> {
        match self {
            Self::Selection(tool) => Some(tool),
            _ => None,
        }
    }

    pub fn as_polygon_tool(&self) -> Option<&PolygonTool> {
        match self {
            Self::Polygon(tool) => Some(tool),
            _ => None,
        }
    }

    pub fn as_text_tool_mut(&mut self) -> Option<&mut TextTool> {
        match self {
            Self::Text(tool) => Some(tool),
            _ => None,
        }
    }
}

impl Tool for ToolType {
    fn name(&self) -> &'static str {
        each_tool!(self, tool => tool.name())
    }

    fn current_state_name(&self) -> &'static str {
        each_tool!(self, tool => tool.current_state_name())
    }

    fn is_idle(&self) -> bool {
        each_tool!(self, tool => tool.is_idle())
    }

    fn on_pointer_down(&mut self, pos: Pos2, modifiers: Modifiers, ctx: &mut ToolContext<'_>) -> ToolResponse {
        each_tool!(self, tool => tool.on_pointer_down(pos, modifiers, ctx))
    }

    fn on_pointer_move(&mut self, pos: Pos2, modifiers: Modifiers, ctx: &mut ToolContext<'_>) -> ToolResponse {
        each_tool!(self, tool => tool.on_pointer_move(pos, modifiers, ctx))
    }

    fn on_pointer_up(&mut self, pos: Pos2, modifiers: Modifiers, ctx: &mut ToolContext<'_>) -> ToolResponse {
        each_tool!(self, tool => tool.on_pointer_up(pos, modifiers, ctx))
    }

    fn on_double_click(&mut self, ctx: &mut ToolContext<'_>) -> ToolResponse {
        each_tool!(self, tool => tool.on_double_click(ctx))
    }

    fn on_cancel(&mut self, ctx: &mut ToolContext<'_>) -> ToolResponse {
        each_tool!(self, tool => tool.on_cancel(ctx))
    }

    fn deactivate(&mut self, ctx: &mut ToolContext<'_>) -> ToolResponse {
        each_tool!(self, tool => tool.deactivate(ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip_through_names_and_hotkeys() {
        for id in ToolId::ALL {
            assert_eq!(ToolId::from_name(id.name()), Some(id));
            assert_eq!(ToolId::from_hotkey(id.hotkey()), Some(id));
            assert_eq!(ToolType::new(id).id(), id);
        }
        assert_eq!(ToolId::from_hotkey('I'), Some(ToolId::ColorPick));
    }

    #[test]
    fn ids_serialize_with_their_names() {
        let json = serde_json::to_string(&ToolId::ColorPick).expect("serialize");
        assert_eq!(json, "\"eyedropper\"");
    }

    #[test]
    fn new_tools_start_idle() {
        for id in ToolId::ALL {
            assert!(ToolType::new(id).is_idle(), "{:?}", id);
        }
    }
}
