use crate::color::Color;
use crate::tools::{Tool, ToolContext, ToolResponse};
use egui::{Modifiers, Pos2};

/// Eyedropper: samples the committed layer under the pointer.
#[derive(Debug, Clone, Default)]
pub struct ColorPickTool;

impl Tool for ColorPickTool {
    fn name(&self) -> &'static str {
        "Color Picker"
    }

    fn current_state_name(&self) -> &'static str {
        "Idle"
    }

    fn is_idle(&self) -> bool {
        true
    }

    fn on_pointer_down(&mut self, pos: Pos2, _modifiers: Modifiers, ctx: &mut ToolContext<'_>) -> ToolResponse {
        match ctx.surface.sample(pos) {
            Some([r, g, b, a]) if a > 0 => ToolResponse::ColorPicked(Color::rgb(r, g, b)),
            // Transparent or off-surface pixels have no color to take
            _ => ToolResponse::None,
        }
    }

    fn on_pointer_move(&mut self, _pos: Pos2, _modifiers: Modifiers, _ctx: &mut ToolContext<'_>) -> ToolResponse {
        ToolResponse::None
    }

    fn on_pointer_up(&mut self, _pos: Pos2, _modifiers: Modifiers, _ctx: &mut ToolContext<'_>) -> ToolResponse {
        ToolResponse::None
    }

    fn on_cancel(&mut self, _ctx: &mut ToolContext<'_>) -> ToolResponse {
        ToolResponse::None
    }
}
