//! Pure geometry used by the drag tools.

pub mod hit_testing;

use egui::{Pos2, Rect, pos2};
use std::f32::consts::FRAC_PI_4;

/// Endpoint of a line from `start` towards `end`, snapped to the nearest
/// multiple of 45°. The length of the drag is kept.
pub fn constrain_line(start: Pos2, end: Pos2) -> Pos2 {
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let distance = (dx * dx + dy * dy).sqrt();
    let angle = dy.atan2(dx);
    let snapped = (angle / FRAC_PI_4).round() * FRAC_PI_4;
    pos2(
        start.x + distance * snapped.cos(),
        start.y + distance * snapped.sin(),
    )
}

/// Endpoint of a square box anchored at `start`: the larger axis of the drag
/// wins and the direction of each axis is kept.
pub fn constrain_square(start: Pos2, end: Pos2) -> Pos2 {
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let size = dx.abs().max(dy.abs());
    pos2(
        start.x + if dx >= 0.0 { size } else { -size },
        start.y + if dy >= 0.0 { size } else { -size },
    )
}

/// Effective endpoint for a line tool event.
pub fn line_endpoint(start: Pos2, pointer: Pos2, constrain: bool) -> Pos2 {
    if constrain { constrain_line(start, pointer) } else { pointer }
}

/// Effective endpoint for a box tool event.
pub fn box_endpoint(start: Pos2, pointer: Pos2, constrain: bool) -> Pos2 {
    if constrain { constrain_square(start, pointer) } else { pointer }
}

/// Normalized rectangle spanned by two drag corners.
pub fn drag_rect(a: Pos2, b: Pos2) -> Rect {
    Rect::from_two_pos(a, b)
}

/// True when two points are less than one unit apart on both axes.
pub fn is_degenerate_drag(a: Pos2, b: Pos2) -> bool {
    (a.x - b.x).abs() < 1.0 && (a.y - b.y).abs() < 1.0
}

/// Integer pixel rectangle `(x, y, w, h)` covering a drag, rounded to the
/// nearest pixel edges.
pub fn pixel_rect(rect: Rect) -> (i32, i32, u32, u32) {
    let x0 = rect.min.x.round() as i32;
    let y0 = rect.min.y.round() as i32;
    let x1 = rect.max.x.round() as i32;
    let y1 = rect.max.y.round() as i32;
    (x0, y0, (x1 - x0).max(0) as u32, (y1 - y0).max(0) as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn shallow_drag_snaps_to_horizontal() {
        let end = constrain_line(pos2(0.0, 0.0), pos2(10.0, 4.0));
        let expected = (10.0f32 * 10.0 + 4.0 * 4.0).sqrt();
        assert!(close(end.x, expected), "{:?}", end);
        assert!(close(end.y, 0.0), "{:?}", end);
    }

    #[test]
    fn steep_drag_snaps_to_diagonal() {
        let end = constrain_line(pos2(0.0, 0.0), pos2(10.0, 9.0));
        assert!(close(end.x, end.y));
    }

    #[test]
    fn negative_drag_snaps_to_vertical() {
        let end = constrain_line(pos2(5.0, 5.0), pos2(6.0, -20.0));
        assert!(close(end.x, 5.0), "{:?}", end);
        assert!(end.y < 5.0);
    }

    #[test]
    fn square_takes_the_larger_axis() {
        assert_eq!(constrain_square(pos2(0.0, 0.0), pos2(30.0, 10.0)), pos2(30.0, 30.0));
        assert_eq!(constrain_square(pos2(0.0, 0.0), pos2(-5.0, 20.0)), pos2(-20.0, 20.0));
    }

    #[test]
    fn unconstrained_endpoints_pass_through() {
        let p = pos2(3.0, 7.0);
        assert_eq!(line_endpoint(Pos2::ZERO, p, false), p);
        assert_eq!(box_endpoint(Pos2::ZERO, p, false), p);
    }

    #[test]
    fn degenerate_drag_threshold() {
        assert!(is_degenerate_drag(pos2(1.0, 1.0), pos2(1.5, 1.9)));
        assert!(!is_degenerate_drag(pos2(1.0, 1.0), pos2(2.0, 1.0)));
    }

    #[test]
    fn pixel_rect_normalizes_drag_direction() {
        let rect = drag_rect(pos2(15.0, 15.0), pos2(5.0, 5.0));
        assert_eq!(pixel_rect(rect), (5, 5, 10, 10));
    }
}
