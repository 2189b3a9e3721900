use crate::geometry::is_degenerate_drag;
use crate::surface::{Layer, Paint, Primitive};
use crate::tools::{Tool, ToolContext, ToolResponse, draw_logged};
use egui::{Modifiers, Pos2};
use log::{debug, info};

/// Fewest vertices a closed polygon needs
pub const MIN_POLYGON_VERTICES: usize = 3;

#[derive(Debug, Clone, PartialEq)]
enum PolygonState {
    Idle,
    /// Collecting clicks until a double-click closes the shape
    AwaitingVertex { vertices: Vec<Pos2>, filled: bool },
}

#[derive(Debug, Clone)]
pub struct PolygonTool {
    state: PolygonState,
}

impl PolygonTool {
    pub fn new() -> Self {
        Self {
            state: PolygonState::Idle,
        }
    }

    pub fn vertices(&self) -> &[Pos2] {
        match &self.state {
            PolygonState::Idle => &[],
            PolygonState::AwaitingVertex { vertices, .. } => vertices,
        }
    }

    fn preview(vertices: &[Pos2], cursor: Option<Pos2>, ctx: &mut ToolContext<'_>) {
        ctx.surface.clear_preview();
        let mut chain = vertices.to_vec();
        chain.extend(cursor);
        if chain.len() < 2 {
            return;
        }
        let paint = Paint::stroke(ctx.settings.color, ctx.settings.width());
        draw_logged(ctx, Layer::Preview, &Primitive::Polyline(chain), &paint);
    }
}

impl Default for PolygonTool {
    fn default() -> Self {
        Self::new()
    }
}

impl Tool for PolygonTool {
    fn name(&self) -> &'static str {
        "Polygon"
    }

    fn current_state_name(&self) -> &'static str {
        match self.state {
            PolygonState::Idle => "Idle",
            PolygonState::AwaitingVertex { .. } => "AwaitingVertex",
        }
    }

    fn is_idle(&self) -> bool {
        self.state == PolygonState::Idle
    }

    fn on_pointer_down(&mut self, pos: Pos2, _modifiers: Modifiers, ctx: &mut ToolContext<'_>) -> ToolResponse {
        match &mut self.state {
            PolygonState::Idle => {
                self.state = PolygonState::AwaitingVertex {
                    vertices: vec![pos],
                    filled: ctx.settings.fill_mode,
                };
            }
            PolygonState::AwaitingVertex { vertices, .. } => {
                // The clicks of a double-click land on the same spot
                let repeated = vertices.last().is_some_and(|last| is_degenerate_drag(*last, pos));
                if !repeated {
                    vertices.push(pos);
                }
            }
        }
        if let PolygonState::AwaitingVertex { vertices, .. } = &self.state {
            let vertices = vertices.clone();
            Self::preview(&vertices, None, ctx);
        }
        ToolResponse::None
    }

    fn on_pointer_move(&mut self, pos: Pos2, _modifiers: Modifiers, ctx: &mut ToolContext<'_>) -> ToolResponse {
        if let PolygonState::AwaitingVertex { vertices, .. } = &self.state {
            let vertices = vertices.clone();
            Self::preview(&vertices, Some(pos), ctx);
        }
        ToolResponse::None
    }

    fn on_pointer_up(&mut self, _pos: Pos2, _modifiers: Modifiers, _ctx: &mut ToolContext<'_>) -> ToolResponse {
        ToolResponse::None
    }

    fn on_double_click(&mut self, ctx: &mut ToolContext<'_>) -> ToolResponse {
        let PolygonState::AwaitingVertex { vertices, filled } = &self.state else {
            return ToolResponse::None;
        };
        if vertices.len() < MIN_POLYGON_VERTICES {
            debug!("Polygon has {} vertices, waiting for more", vertices.len());
            return ToolResponse::None;
        }
        info!("Closing polygon with {} vertices", vertices.len());
        let primitive = Primitive::Polygon(vertices.clone());
        let paint = Paint::shape(ctx.settings.color, ctx.settings.width(), *filled);
        self.state = PolygonState::Idle;
        ctx.surface.clear_preview();

        if draw_logged(ctx, Layer::Committed, &primitive, &paint) {
            ToolResponse::Committed
        } else {
            ToolResponse::None
        }
    }

    fn on_cancel(&mut self, ctx: &mut ToolContext<'_>) -> ToolResponse {
        self.state = PolygonState::Idle;
        ctx.surface.clear_preview();
        ToolResponse::None
    }
}
