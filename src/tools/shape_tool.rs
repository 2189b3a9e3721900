use crate::geometry::{box_endpoint, drag_rect, is_degenerate_drag};
use crate::surface::{Layer, Paint, Primitive};
use crate::tools::{Tool, ToolContext, ToolResponse, draw_logged};
use egui::{Modifiers, Pos2};
use log::debug;

/// Shape produced by a box drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Rectangle,
    /// Ellipse inscribed in the dragged box
    Ellipse,
}

#[derive(Debug, Clone, PartialEq)]
enum ShapeState {
    Idle,
    Dragging { anchor: Pos2, filled: bool },
}

/// Rectangle and circle tools. Shift locks the box to a square.
#[derive(Debug, Clone)]
pub struct ShapeTool {
    kind: ShapeKind,
    state: ShapeState,
}

impl ShapeTool {
    pub fn new(kind: ShapeKind) -> Self {
        Self {
            kind,
            state: ShapeState::Idle,
        }
    }

    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    fn primitive(&self, anchor: Pos2, pointer: Pos2, constrain: bool) -> Primitive {
        let rect = drag_rect(anchor, box_endpoint(anchor, pointer, constrain));
        match self.kind {
            ShapeKind::Rectangle => Primitive::Rect(rect),
            ShapeKind::Ellipse => Primitive::ellipse_in(rect),
        }
    }
}

impl Tool for ShapeTool {
    fn name(&self) -> &'static str {
        match self.kind {
            ShapeKind::Rectangle => "Rectangle",
            ShapeKind::Ellipse => "Circle",
        }
    }

    fn current_state_name(&self) -> &'static str {
        match self.state {
            ShapeState::Idle => "Idle",
            ShapeState::Dragging { .. } => "Dragging",
        }
    }

    fn is_idle(&self) -> bool {
        self.state == ShapeState::Idle
    }

    fn on_pointer_down(&mut self, pos: Pos2, _modifiers: Modifiers, ctx: &mut ToolContext<'_>) -> ToolResponse {
        self.state = ShapeState::Dragging {
            anchor: pos,
            filled: ctx.settings.fill_mode,
        };
        ToolResponse::None
    }

    fn on_pointer_move(&mut self, pos: Pos2, modifiers: Modifiers, ctx: &mut ToolContext<'_>) -> ToolResponse {
        if let ShapeState::Dragging { anchor, filled } = self.state {
            let primitive = self.primitive(anchor, pos, modifiers.shift);
            let paint = Paint::shape(ctx.settings.color, ctx.settings.width(), filled);
            ctx.surface.clear_preview();
            draw_logged(ctx, Layer::Preview, &primitive, &paint);
        }
        ToolResponse::None
    }

    fn on_pointer_up(&mut self, pos: Pos2, modifiers: Modifiers, ctx: &mut ToolContext<'_>) -> ToolResponse {
        let ShapeState::Dragging { anchor, filled } = std::mem::replace(&mut self.state, ShapeState::Idle) else {
            return ToolResponse::None;
        };
        ctx.surface.clear_preview();

        let end = box_endpoint(anchor, pos, modifiers.shift);
        if is_degenerate_drag(anchor, end) {
            debug!("Discarding degenerate {} at {:?}", self.name(), anchor);
            return ToolResponse::None;
        }
        let primitive = self.primitive(anchor, pos, modifiers.shift);
        let paint = Paint::shape(ctx.settings.color, ctx.settings.width(), filled);
        if draw_logged(ctx, Layer::Committed, &primitive, &paint) {
            ToolResponse::Committed
        } else {
            ToolResponse::None
        }
    }

    fn on_cancel(&mut self, ctx: &mut ToolContext<'_>) -> ToolResponse {
        self.state = ShapeState::Idle;
        ctx.surface.clear_preview();
        ToolResponse::None
    }
}
