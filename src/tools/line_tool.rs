use crate::geometry::{is_degenerate_drag, line_endpoint};
use crate::surface::{Layer, Paint, Primitive};
use crate::tools::{Tool, ToolContext, ToolResponse, draw_logged};
use egui::{Modifiers, Pos2};
use log::debug;

#[derive(Debug, Clone, PartialEq)]
enum LineState {
    Idle,
    Dragging { anchor: Pos2 },
}

/// Straight segment previewed while dragging, Shift snaps to 45°.
#[derive(Debug, Clone)]
pub struct LineTool {
    state: LineState,
}

impl LineTool {
    pub fn new() -> Self {
        Self { state: LineState::Idle }
    }

    fn paint(ctx: &ToolContext<'_>) -> Paint {
        Paint::stroke(ctx.settings.color, ctx.settings.width())
    }
}

impl Default for LineTool {
    fn default() -> Self {
        Self::new()
    }
}

impl Tool for LineTool {
    fn name(&self) -> &'static str {
        "Line"
    }

    fn current_state_name(&self) -> &'static str {
        match self.state {
            LineState::Idle => "Idle",
            LineState::Dragging { .. } => "Dragging",
        }
    }

    fn is_idle(&self) -> bool {
        self.state == LineState::Idle
    }

    fn on_pointer_down(&mut self, pos: Pos2, _modifiers: Modifiers, _ctx: &mut ToolContext<'_>) -> ToolResponse {
        self.state = LineState::Dragging { anchor: pos };
        ToolResponse::None
    }

    fn on_pointer_move(&mut self, pos: Pos2, modifiers: Modifiers, ctx: &mut ToolContext<'_>) -> ToolResponse {
        if let LineState::Dragging { anchor } = self.state {
            let end = line_endpoint(anchor, pos, modifiers.shift);
            ctx.surface.clear_preview();
            let paint = Self::paint(ctx);
            draw_logged(ctx, Layer::Preview, &Primitive::Line { from: anchor, to: end }, &paint);
        }
        ToolResponse::None
    }

    fn on_pointer_up(&mut self, pos: Pos2, modifiers: Modifiers, ctx: &mut ToolContext<'_>) -> ToolResponse {
        let LineState::Dragging { anchor } = std::mem::replace(&mut self.state, LineState::Idle) else {
            return ToolResponse::None;
        };
        ctx.surface.clear_preview();

        let end = line_endpoint(anchor, pos, modifiers.shift);
        if is_degenerate_drag(anchor, end) {
            debug!("Discarding zero-length line at {:?}", anchor);
            return ToolResponse::None;
        }
        let paint = Self::paint(ctx);
        if draw_logged(ctx, Layer::Committed, &Primitive::Line { from: anchor, to: end }, &paint) {
            ToolResponse::Committed
        } else {
            ToolResponse::None
        }
    }

    fn on_cancel(&mut self, ctx: &mut ToolContext<'_>) -> ToolResponse {
        self.state = LineState::Idle;
        ctx.surface.clear_preview();
        ToolResponse::None
    }
}
