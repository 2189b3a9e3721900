use crate::surface::{FontSpec, Layer, Paint, Primitive};
use crate::tools::{TextRequest, Tool, ToolContext, ToolResponse, draw_logged};
use egui::{Modifiers, Pos2};
use log::debug;

#[derive(Debug, Clone, PartialEq)]
enum TextState {
    Idle,
    /// Waiting for the text-entry collaborator to answer
    AwaitingInput { origin: Pos2 },
}

/// Places a line of text, top-aligned at the clicked point.
#[derive(Debug, Clone)]
pub struct TextTool {
    state: TextState,
}

impl TextTool {
    pub fn new() -> Self {
        Self { state: TextState::Idle }
    }

    /// Placement waiting for text, if any
    pub fn pending_origin(&self) -> Option<Pos2> {
        match self.state {
            TextState::AwaitingInput { origin } => Some(origin),
            TextState::Idle => None,
        }
    }

    /// Renders the submitted text at the pending placement.
    pub fn submit(&mut self, text: &str, font: FontSpec, ctx: &mut ToolContext<'_>) -> ToolResponse {
        let TextState::AwaitingInput { origin } = std::mem::replace(&mut self.state, TextState::Idle) else {
            debug!("Text submitted without a pending placement");
            return ToolResponse::None;
        };
        if text.trim().is_empty() {
            debug!("Ignoring empty text at {:?}", origin);
            return ToolResponse::None;
        }
        let primitive = Primitive::Text {
            origin,
            text: text.to_owned(),
            font,
        };
        if draw_logged(ctx, Layer::Committed, &primitive, &Paint::fill(ctx.settings.color)) {
            ToolResponse::Committed
        } else {
            ToolResponse::None
        }
    }
}

impl Default for TextTool {
    fn default() -> Self {
        Self::new()
    }
}

impl Tool for TextTool {
    fn name(&self) -> &'static str {
        "Text"
    }

    fn current_state_name(&self) -> &'static str {
        match self.state {
            TextState::Idle => "Idle",
            TextState::AwaitingInput { .. } => "AwaitingInput",
        }
    }

    fn is_idle(&self) -> bool {
        self.state == TextState::Idle
    }

    /// A second click while waiting moves the placement.
    fn on_pointer_down(&mut self, pos: Pos2, _modifiers: Modifiers, ctx: &mut ToolContext<'_>) -> ToolResponse {
        self.state = TextState::AwaitingInput { origin: pos };
        ToolResponse::TextRequested(TextRequest {
            origin: pos,
            font_size: ctx.settings.font_size,
            font_family: ctx.settings.font_family.clone(),
        })
    }

    fn on_pointer_move(&mut self, _pos: Pos2, _modifiers: Modifiers, _ctx: &mut ToolContext<'_>) -> ToolResponse {
        ToolResponse::None
    }

    fn on_pointer_up(&mut self, _pos: Pos2, _modifiers: Modifiers, _ctx: &mut ToolContext<'_>) -> ToolResponse {
        ToolResponse::None
    }

    fn on_cancel(&mut self, _ctx: &mut ToolContext<'_>) -> ToolResponse {
        self.state = TextState::Idle;
        ToolResponse::None
    }
}
