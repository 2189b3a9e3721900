use crate::error::{SurfaceError, SurfaceResult};
use crate::surface::pixel_buffer::{CompositeMode, PixelBuffer};
use crate::surface::primitive::FontSpec;
use ab_glyph::{Font, FontArc, GlyphId, PxScale, ScaleFont, point};
use egui::Pos2;
use std::sync::OnceLock;

/// Bundled face used for proportional family names
const PROPORTIONAL_FACE: &str = "Ubuntu-Light";
/// Bundled face used for monospace family names
const MONOSPACE_FACE: &str = "Hack";

struct FontLibrary {
    proportional: Option<FontArc>,
    monospace: Option<FontArc>,
}

fn library() -> &'static FontLibrary {
    static LIBRARY: OnceLock<FontLibrary> = OnceLock::new();
    LIBRARY.get_or_init(|| {
        let definitions = egui::FontDefinitions::default();
        let load = |name: &str| {
            let data = definitions.font_data.get(name)?;
            match FontArc::try_from_vec(data.font.to_vec()) {
                Ok(font) => Some(font),
                Err(err) => {
                    log::warn!("Could not parse bundled font {}: {}", name, err);
                    None
                }
            }
        };
        FontLibrary {
            proportional: load(PROPORTIONAL_FACE),
            monospace: load(MONOSPACE_FACE),
        }
    })
}

fn is_monospace_family(family: &str) -> bool {
    let family = family.to_ascii_lowercase();
    ["mono", "courier", "consol", "hack"]
        .iter()
        .any(|hint| family.contains(hint))
}

/// Resolves a family name onto one of the bundled faces.
fn face_for(family: &str) -> SurfaceResult<&'static FontArc> {
    let library = library();
    let preferred = if is_monospace_family(family) {
        library.monospace.as_ref().or(library.proportional.as_ref())
    } else {
        library.proportional.as_ref().or(library.monospace.as_ref())
    };
    preferred.ok_or_else(|| SurfaceError::FontUnavailable(family.to_owned()))
}

/// Draws `text` with its top-left corner at `origin` (logical units).
/// Newlines start a new line below the previous one.
pub(crate) fn draw_text(
    buffer: &mut PixelBuffer,
    origin: Pos2,
    text: &str,
    font: &FontSpec,
    rgb: [u8; 3],
    scale: f32,
) -> SurfaceResult<()> {
    let face = face_for(&font.family)?;
    let px = PxScale::from((font.size * scale).max(1.0));
    let scaled = face.as_scaled(px);
    let line_height = scaled.height() + scaled.line_gap();

    let mut baseline = origin.y * scale + scaled.ascent();
    for line in text.lines() {
        let mut caret = origin.x * scale;
        let mut previous: Option<GlyphId> = None;
        for ch in line.chars().filter(|c| !c.is_control()) {
            let id = scaled.glyph_id(ch);
            if let Some(prev) = previous {
                caret += scaled.kern(prev, id);
            }
            let glyph = id.with_scale_and_position(px, point(caret, baseline));
            caret += scaled.h_advance(id);
            previous = Some(id);

            let Some(outlined) = face.outline_glyph(glyph) else {
                continue;
            };
            let bounds = outlined.px_bounds();
            outlined.draw(|gx, gy, coverage| {
                let x = bounds.min.x as i32 + gx as i32;
                let y = bounds.min.y as i32 + gy as i32;
                let alpha = (coverage.clamp(0.0, 1.0) * 255.0).round() as u8;
                buffer.blend_pixel(x, y, rgb, alpha, CompositeMode::SourceOver);
            });
        }
        baseline += line_height;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    #[test]
    fn family_names_map_to_bundled_faces() {
        assert!(is_monospace_family("Courier New"));
        assert!(is_monospace_family("monospace"));
        assert!(!is_monospace_family("Arial"));
        assert!(face_for("Arial").is_ok());
    }

    #[test]
    fn text_is_top_aligned_at_origin() {
        let mut buffer = PixelBuffer::new(120, 60);
        let font = FontSpec::new(20.0, "Arial");
        draw_text(&mut buffer, pos2(10.0, 10.0), "HI", &font, [255, 255, 255], 1.0)
            .expect("bundled font");
        assert!(!buffer.is_clear());
        // Nothing above the origin or left of it
        for x in 0..120 {
            for y in 0..10 {
                assert_eq!(buffer.pixel(x, y).map(|p| p[3]), Some(0), "({x},{y})");
            }
        }
        for y in 0..60 {
            for x in 0..9 {
                assert_eq!(buffer.pixel(x, y).map(|p| p[3]), Some(0), "({x},{y})");
            }
        }
    }
}
