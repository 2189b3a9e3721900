use egui::{Pos2, Rect};

/// Extra distance around a floating selection that still counts as a grab
pub const SELECTION_HIT_SLOP: f32 = 4.0;

/// Whether `pos` grabs the floating selection occupying `rect`.
pub fn hits_selection(pos: Pos2, rect: Rect, slop: f32) -> bool {
    distance_to_rect(pos, rect) <= slop.max(0.0)
}

/// Distance from `pos` to the closest edge of `rect`, zero when inside.
pub fn distance_to_rect(pos: Pos2, rect: Rect) -> f32 {
    let dx = (rect.min.x - pos.x).max(pos.x - rect.max.x).max(0.0);
    let dy = (rect.min.y - pos.y).max(pos.y - rect.max.y).max(0.0);
    (dx * dx + dy * dy).sqrt()
}
