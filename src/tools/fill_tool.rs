use crate::fill::flood_fill;
use crate::tools::{Tool, ToolContext, ToolResponse};
use egui::{Modifiers, Pos2};
use log::debug;

/// Bucket fill, applied once per click.
#[derive(Debug, Clone, Default)]
pub struct FillTool;

impl Tool for FillTool {
    fn name(&self) -> &'static str {
        "Fill"
    }

    fn current_state_name(&self) -> &'static str {
        "Idle"
    }

    fn is_idle(&self) -> bool {
        true
    }

    fn on_pointer_down(&mut self, pos: Pos2, _modifiers: Modifiers, ctx: &mut ToolContext<'_>) -> ToolResponse {
        let seed = ctx.surface.to_pixel(pos);
        let mut pixels = ctx.surface.committed().clone();
        let painted = flood_fill(&mut pixels, seed, ctx.settings.color, &ctx.settings.fill);
        if painted == 0 {
            return ToolResponse::None;
        }
        debug!("Filled {} pixels from {:?}", painted, seed);
        ctx.surface.replace_committed(pixels);
        ToolResponse::Committed
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
