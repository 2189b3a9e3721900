use crate::geometry::drag_rect;
use crate::geometry::hit_testing::hits_selection;
use crate::surface::{Layer, Paint, PixelBuffer, Primitive, RasterSurface};
use crate::tools::{Tool, ToolContext, ToolResponse, draw_logged};
use egui::{Modifiers, Pos2, Rect};
use log::{debug, info};

/// Pixels lifted off the committed layer by a marquee.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionPayload {
    pixels: PixelBuffer,
    /// Device position the pixels were taken from
    origin: (i32, i32),
}

impl SelectionPayload {
    pub fn pixels(&self) -> &PixelBuffer {
        &self.pixels
    }

    pub fn origin(&self) -> (i32, i32) {
        self.origin
    }

    fn placed_at(&self, offset: (i32, i32)) -> (i32, i32) {
        (self.origin.0 + offset.0, self.origin.1 + offset.1)
    }

    /// Logical rectangle covered by the payload at `offset`
    fn logical_rect(&self, surface: &RasterSurface, offset: (i32, i32)) -> Rect {
        let (x, y) = self.placed_at(offset);
        surface.to_logical_rect(x, y, self.pixels.width(), self.pixels.height())
    }
}

#[derive(Debug, Clone, PartialEq)]
enum SelectionState {
    Idle,
    Selecting {
        start: Pos2,
    },
    /// Payload floats over its cleared source, waiting for a grab
    Captured {
        payload: SelectionPayload,
    },
    Dragging {
        payload: SelectionPayload,
        grab: Pos2,
        offset: (i32, i32),
    },
}

/// Rectangular marquee that lifts pixels and moves them.
#[derive(Debug, Clone)]
pub struct SelectionTool {
    state: SelectionState,
}

impl SelectionTool {
    pub fn new() -> Self {
        Self {
            state: SelectionState::Idle,
        }
    }

    /// The floating payload, if one has been captured
    pub fn payload(&self) -> Option<&SelectionPayload> {
        match &self.state {
            SelectionState::Captured { payload } | SelectionState::Dragging { payload, .. } => Some(payload),
            _ => None,
        }
    }

    fn drag_offset(surface: &RasterSurface, grab: Pos2, pos: Pos2) -> (i32, i32) {
        let delta = (pos - grab) * surface.pixels_per_point();
        (delta.x.round() as i32, delta.y.round() as i32)
    }

    /// Shows the payload and its marquee on the preview layer.
    fn show_floating(payload: &SelectionPayload, offset: (i32, i32), ctx: &mut ToolContext<'_>) {
        ctx.surface.clear_preview();
        let (x, y) = payload.placed_at(offset);
        ctx.surface.overlay(Layer::Preview, &payload.pixels, x, y);
        let rect = payload.logical_rect(ctx.surface, offset);
        draw_logged(ctx, Layer::Preview, &Primitive::Rect(rect), &Paint::marquee());
    }

    /// Writes the payload onto the committed layer at `offset`.
    fn place(payload: &SelectionPayload, offset: (i32, i32), ctx: &mut ToolContext<'_>) {
        let (x, y) = payload.placed_at(offset);
        ctx.surface.write_region(&payload.pixels, x, y);
        ctx.surface.clear_preview();
    }

    fn capture(start: Pos2, end: Pos2, ctx: &mut ToolContext<'_>) -> Option<SelectionPayload> {
        let (x, y, w, h) = ctx.surface.to_pixel_rect(drag_rect(start, end));
        if w == 0 || h == 0 {
            debug!("Discarding empty marquee at {:?}", start);
            return None;
        }
        let (pixels, origin) = ctx.surface.read_region(x, y, w, h)?;
        ctx.surface.clear_region(origin.0, origin.1, pixels.width(), pixels.height());
        info!("Captured {}x{} selection at {:?}", pixels.width(), pixels.height(), origin);
        Some(SelectionPayload { pixels, origin })
    }
}

impl Default for SelectionTool {
    fn default() -> Self {
        Self::new()
    }
}

impl Tool for SelectionTool {
    fn name(&self) -> &'static str {
        "Selection"
    }

    fn current_state_name(&self) -> &'static str {
        match self.state {
            SelectionState::Idle => "Idle",
            SelectionState::Selecting { .. } => "Selecting",
            SelectionState::Captured { .. } => "Captured",
            SelectionState::Dragging { .. } => "Dragging",
        }
    }

    fn is_idle(&self) -> bool {
        self.state == SelectionState::Idle
    }

    fn on_pointer_down(&mut self, pos: Pos2, _modifiers: Modifiers, ctx: &mut ToolContext<'_>) -> ToolResponse {
        self.state = match std::mem::replace(&mut self.state, SelectionState::Idle) {
            SelectionState::Captured { payload } => {
                let rect = payload.logical_rect(ctx.surface, (0, 0));
                if hits_selection(pos, rect, ctx.settings.selection_slop) {
                    Self::show_floating(&payload, (0, 0), ctx);
                    SelectionState::Dragging {
                        payload,
                        grab: pos,
                        offset: (0, 0),
                    }
                } else {
                    // Put the pixels back where they came from and start over
                    Self::place(&payload, (0, 0), ctx);
                    SelectionState::Selecting { start: pos }
                }
            }
            dragging @ SelectionState::Dragging { .. } => dragging,
            SelectionState::Idle | SelectionState::Selecting { .. } => SelectionState::Selecting { start: pos },
        };
        ToolResponse::None
    }

    fn on_pointer_move(&mut self, pos: Pos2, _modifiers: Modifiers, ctx: &mut ToolContext<'_>) -> ToolResponse {
        match &mut self.state {
            SelectionState::Selecting { start } => {
                let rect = drag_rect(*start, pos);
                ctx.surface.clear_preview();
                draw_logged(ctx, Layer::Preview, &Primitive::Rect(rect), &Paint::marquee());
            }
            SelectionState::Dragging { payload, grab, offset } => {
                *offset = Self::drag_offset(ctx.surface, *grab, pos);
                Self::show_floating(payload, *offset, ctx);
            }
            SelectionState::Idle | SelectionState::Captured { .. } => {}
        }
        ToolResponse::None
    }

    fn on_pointer_up(&mut self, pos: Pos2, _modifiers: Modifiers, ctx: &mut ToolContext<'_>) -> ToolResponse {
        match std::mem::replace(&mut self.state, SelectionState::Idle) {
            SelectionState::Selecting { start } => {
                match Self::capture(start, pos, ctx) {
                    Some(payload) => {
                        Self::show_floating(&payload, (0, 0), ctx);
                        self.state = SelectionState::Captured { payload };
                    }
                    None => ctx.surface.clear_preview(),
                }
                ToolResponse::None
            }
            SelectionState::Dragging { payload, grab, .. } => {
                let offset = Self::drag_offset(ctx.surface, grab, pos);
                Self::place(&payload, offset, ctx);
                if offset == (0, 0) {
                    debug!("Selection released where it was captured");
                    return ToolResponse::None;
                }
                info!("Moved selection by {:?}", offset);
                ToolResponse::Committed
            }
            other => {
                self.state = other;
                ToolResponse::None
            }
        }
    }

    /// Drops a floating payload. Its source stays cleared, and the result is
    /// recorded so the cut can be undone.
    fn on_cancel(&mut self, ctx: &mut ToolContext<'_>) -> ToolResponse {
        let previous = std::mem::replace(&mut self.state, SelectionState::Idle);
        ctx.surface.clear_preview();
        match previous {
            SelectionState::Captured { .. } | SelectionState::Dragging { .. } => {
                debug!("Discarded floating selection");
                ToolResponse::Committed
            }
            _ => ToolResponse::None,
        }
    }

    /// Settles a floating payload where it currently sits.
    fn deactivate(&mut self, ctx: &mut ToolContext<'_>) -> ToolResponse {
        match std::mem::replace(&mut self.state, SelectionState::Idle) {
            SelectionState::Captured { payload } => {
                Self::place(&payload, (0, 0), ctx);
                ToolResponse::None
            }
            SelectionState::Dragging { payload, offset, .. } => {
                Self::place(&payload, offset, ctx);
                if offset == (0, 0) {
                    ToolResponse::None
                } else {
                    ToolResponse::Committed
                }
            }
            SelectionState::Idle | SelectionState::Selecting { .. } => {
                ctx.surface.clear_preview();
                ToolResponse::None
            }
        }
    }
}
