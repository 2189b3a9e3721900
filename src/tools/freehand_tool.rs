use crate::surface::{Layer, Paint, Primitive};
use crate::tools::{Tool, ToolContext, ToolResponse, draw_logged};
use egui::{Modifiers, Pos2};
use log::debug;

/// Whether the freehand tool paints or erases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FreehandMode {
    Paint,
    Erase,
}

#[derive(Debug, Clone, PartialEq)]
enum FreehandState {
    Idle,
    Drawing { last: Pos2, marked: bool },
}

/// Brush and eraser: every move strokes one segment straight onto the
/// committed layer.
#[derive(Debug, Clone)]
pub struct FreehandTool {
    mode: FreehandMode,
    state: FreehandState,
}

impl FreehandTool {
    pub fn new(mode: FreehandMode) -> Self {
        Self {
            mode,
            state: FreehandState::Idle,
        }
    }

    pub fn mode(&self) -> FreehandMode {
        self.mode
    }

    fn stroke_segment(&self, from: Pos2, to: Pos2, ctx: &mut ToolContext<'_>) {
        let width = ctx.settings.width();
        match self.mode {
            FreehandMode::Paint => {
                let paint = Paint::stroke(ctx.settings.color, width);
                draw_logged(ctx, Layer::Committed, &Primitive::Line { from, to }, &paint);
            }
            FreehandMode::Erase => ctx.surface.erase_segment(from, to, width),
        }
    }

    fn finish(&mut self) -> ToolResponse {
        match std::mem::replace(&mut self.state, FreehandState::Idle) {
            FreehandState::Drawing { marked: true, .. } => ToolResponse::Committed,
            FreehandState::Drawing { marked: false, .. } => {
                debug!("Freehand stroke ended without any segment");
                ToolResponse::None
            }
            FreehandState::Idle => ToolResponse::None,
        }
    }
}

impl Tool for FreehandTool {
    fn name(&self) -> &'static str {
        match self.mode {
            FreehandMode::Paint => "Brush",
            FreehandMode::Erase => "Eraser",
        }
    }

    fn current_state_name(&self) -> &'static str {
        match self.state {
            FreehandState::Idle => "Idle",
            FreehandState::Drawing { .. } => "Drawing",
        }
    }

    fn is_idle(&self) -> bool {
        self.state == FreehandState::Idle
    }

    fn on_pointer_down(&mut self, pos: Pos2, _modifiers: Modifiers, _ctx: &mut ToolContext<'_>) -> ToolResponse {
        self.state = FreehandState::Drawing {
            last: pos,
            marked: false,
        };
        ToolResponse::None
    }

    fn on_pointer_move(&mut self, pos: Pos2, _modifiers: Modifiers, ctx: &mut ToolContext<'_>) -> ToolResponse {
        if let FreehandState::Drawing { last, .. } = self.state {
            if last != pos {
                self.stroke_segment(last, pos, ctx);
                self.state = FreehandState::Drawing { last: pos, marked: true };
            }
        }
        ToolResponse::None
    }

    fn on_pointer_up(&mut self, _pos: Pos2, _modifiers: Modifiers, _ctx: &mut ToolContext<'_>) -> ToolResponse {
        self.finish()
    }

    /// Segments are already on the committed layer, so cancelling finalizes.
    fn on_cancel(&mut self, _ctx: &mut ToolContext<'_>) -> ToolResponse {
        self.finish()
    }
}
