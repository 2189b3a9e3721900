//! Coverage rasterization of vector primitives.
//!
//! Paths are built in logical coordinates, scaled to device pixels, turned
//! into outlines and filled into an anti-aliased coverage mask that is only as
//! large as the shape's bounds. The mask is then blended into the straight
//! alpha pixel buffer.

use crate::surface::pixel_buffer::PixelBuffer;
use crate::surface::primitive::{DrawMode, Paint, Primitive};
use egui::Pos2;
use tiny_skia::{FillRule, LineCap, LineJoin, Mask, Path, PathBuilder, Stroke, StrokeDash, Transform};

/// Rasterizes a geometric primitive. Text is handled by the glyph rasterizer
/// and ignored here.
pub(crate) fn draw_shape(buffer: &mut PixelBuffer, primitive: &Primitive, paint: &Paint, scale: f32) {
    let Some((path, mode)) = build_path(primitive, paint.mode) else {
        log::debug!("Skipping primitive without a drawable path: {:?}", primitive);
        return;
    };
    let Some(outline) = outline(path, mode, scale) else {
        log::debug!("Primitive produced an empty outline");
        return;
    };
    fill_coverage(buffer, &outline, paint);
}

fn build_path(primitive: &Primitive, mode: DrawMode) -> Option<(Path, DrawMode)> {
    let path = match primitive {
        Primitive::Rect(rect) => {
            let mut pb = PathBuilder::new();
            pb.move_to(rect.min.x, rect.min.y);
            pb.line_to(rect.max.x, rect.min.y);
            pb.line_to(rect.max.x, rect.max.y);
            pb.line_to(rect.min.x, rect.max.y);
            pb.close();
            pb.finish()?
        }
        Primitive::Ellipse { center, radius } => {
            let (rx, ry) = (radius.x.abs(), radius.y.abs());
            let oval = tiny_skia::Rect::from_ltrb(center.x - rx, center.y - ry, center.x + rx, center.y + ry)?;
            PathBuilder::from_oval(oval)?
        }
        Primitive::Line { from, to } => {
            if let DrawMode::Stroke { width, .. } = mode {
                // A zero-length stroked segment leaves a round dot
                if from.distance(*to) < f32::EPSILON {
                    let dot = PathBuilder::from_circle(from.x, from.y, (width / 2.0).max(0.5))?;
                    return Some((dot, DrawMode::Fill));
                }
            }
            chain(&[*from, *to], false)?
        }
        Primitive::Polygon(points) => chain(points, true)?,
        Primitive::Polyline(points) => chain(points, false)?,
        Primitive::Text { .. } => return None,
    };
    Some((path, mode))
}

fn chain(points: &[Pos2], closed: bool) -> Option<Path> {
    let (first, rest) = points.split_first()?;
    let mut pb = PathBuilder::new();
    pb.move_to(first.x, first.y);
    for point in rest {
        pb.line_to(point.x, point.y);
    }
    if closed {
        pb.close();
    }
    pb.finish()
}

/// Converts a logical path into the device-space area to be covered.
fn outline(path: Path, mode: DrawMode, scale: f32) -> Option<Path> {
    let path = path.transform(Transform::from_scale(scale, scale))?;
    match mode {
        DrawMode::Fill => Some(path),
        DrawMode::Stroke { width, dash } => {
            let mut stroke = Stroke {
                width: (width * scale).max(0.1),
                line_cap: LineCap::Round,
                line_join: LineJoin::Round,
                ..Stroke::default()
            };
            let path = match dash {
                Some([on, off]) => {
                    stroke.line_cap = LineCap::Butt;
                    stroke.line_join = LineJoin::Miter;
                    let dash = StrokeDash::new(vec![on * scale, off * scale], 0.0)?;
                    path.dash(&dash, 1.0)?
                }
                None => path,
            };
            path.stroke(&stroke, 1.0)
        }
    }
}

fn fill_coverage(buffer: &mut PixelBuffer, path: &Path, paint: &Paint) {
    let bounds = path.bounds();
    let x0 = (bounds.left().floor() as i32).saturating_sub(1).max(0);
    let y0 = (bounds.top().floor() as i32).saturating_sub(1).max(0);
    let x1 = (bounds.right().ceil() as i32).saturating_add(1).min(buffer.width() as i32);
    let y1 = (bounds.bottom().ceil() as i32).saturating_add(1).min(buffer.height() as i32);
    if x1 <= x0 || y1 <= y0 {
        return;
    }
    let (w, h) = ((x1 - x0) as u32, (y1 - y0) as u32);
    let Some(mut mask) = Mask::new(w, h) else {
        return;
    };
    mask.fill_path(
        path,
        FillRule::Winding,
        true,
        Transform::from_translate(-(x0 as f32), -(y0 as f32)),
    );
    let rgb = [paint.color.r, paint.color.g, paint.color.b];
    buffer.blend_mask(mask.data(), w, h, x0, y0, rgb, paint.composite);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use egui::{Rect, pos2, vec2};

    const RED: Color = Color::rgb(255, 0, 0);

    #[test]
    fn filled_rect_covers_interior() {
        let mut buffer = PixelBuffer::new(20, 20);
        let rect = Rect::from_min_max(pos2(2.0, 2.0), pos2(10.0, 10.0));
        draw_shape(&mut buffer, &Primitive::Rect(rect), &Paint::fill(RED), 1.0);
        assert_eq!(buffer.pixel(5, 5), Some([255, 0, 0, 255]));
        assert_eq!(buffer.pixel(15, 15), Some([0, 0, 0, 0]));
    }

    #[test]
    fn stroked_rect_leaves_center_empty() {
        let mut buffer = PixelBuffer::new(40, 40);
        let rect = Rect::from_min_max(pos2(5.0, 5.0), pos2(35.0, 35.0));
        draw_shape(&mut buffer, &Primitive::Rect(rect), &Paint::stroke(RED, 2.0), 1.0);
        assert_eq!(buffer.pixel(20, 20), Some([0, 0, 0, 0]));
        assert_eq!(buffer.pixel(20, 5).map(|p| p[3]), Some(255));
    }

    #[test]
    fn scale_is_applied_to_geometry_and_width() {
        let mut buffer = PixelBuffer::new(40, 40);
        let line = Primitive::Line {
            from: pos2(2.0, 10.0),
            to: pos2(18.0, 10.0),
        };
        draw_shape(&mut buffer, &line, &Paint::stroke(RED, 4.0), 2.0);
        // Logical y=10 lands on device row 20 with a device width of 8
        assert_eq!(buffer.pixel(20, 20).map(|p| p[3]), Some(255));
        assert_eq!(buffer.pixel(20, 17).map(|p| p[3]), Some(255));
        assert_eq!(buffer.pixel(20, 10), Some([0, 0, 0, 0]));
    }

    #[test]
    fn zero_length_stroke_draws_a_dot() {
        let mut buffer = PixelBuffer::new(20, 20);
        let dot = Primitive::Line {
            from: pos2(10.0, 10.0),
            to: pos2(10.0, 10.0),
        };
        draw_shape(&mut buffer, &dot, &Paint::stroke(RED, 6.0), 1.0);
        assert_eq!(buffer.pixel(10, 10).map(|p| p[3]), Some(255));
    }

    #[test]
    fn ellipse_fill_stays_inside_its_box() {
        let mut buffer = PixelBuffer::new(30, 30);
        let ellipse = Primitive::Ellipse {
            center: pos2(15.0, 15.0),
            radius: vec2(10.0, 5.0),
        };
        draw_shape(&mut buffer, &ellipse, &Paint::fill(RED), 1.0);
        assert_eq!(buffer.pixel(15, 15).map(|p| p[3]), Some(255));
        assert_eq!(buffer.pixel(15, 25), Some([0, 0, 0, 0]));
        assert_eq!(buffer.pixel(6, 6), Some([0, 0, 0, 0]));
    }

    #[test]
    fn eraser_stroke_clears_alpha() {
        let mut buffer = PixelBuffer::filled(20, 20, [10, 20, 30, 255]);
        let line = Primitive::Line {
            from: pos2(0.0, 10.0),
            to: pos2(20.0, 10.0),
        };
        draw_shape(&mut buffer, &line, &Paint::eraser(4.0), 1.0);
        assert_eq!(buffer.pixel(10, 10), Some([0, 0, 0, 0]));
        assert_eq!(buffer.pixel(10, 2), Some([10, 20, 30, 255]));
    }

    #[test]
    fn offscreen_shapes_are_ignored() {
        let mut buffer = PixelBuffer::new(10, 10);
        let rect = Rect::from_min_max(pos2(50.0, 50.0), pos2(60.0, 60.0));
        draw_shape(&mut buffer, &Primitive::Rect(rect), &Paint::fill(RED), 1.0);
        assert!(buffer.is_clear());
    }
}
