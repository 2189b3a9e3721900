use crate::error::{ExportError, ExportResult, SurfaceError};
use crate::surface::{PixelBuffer, RasterSurface};
use image::ImageFormat;
use image::imageops::FilterType;
use std::io::Cursor;
use uuid::Uuid;

pub const PNG_MIME: &str = "image/png";

/// A finished, encoded image handed to whoever stores or downloads it.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedImage {
    pub id: Uuid,
    pub file_name: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl ExportedImage {
    /// Opaque handle a host can use to refer to this image
    pub fn object_url(&self) -> String {
        format!("blob:sketchpad/{}", self.id)
    }
}

/// Receives each image produced by a save.
pub trait ExportSink {
    fn on_image_generated(&mut self, image: &ExportedImage);
}

impl<F: FnMut(&ExportedImage)> ExportSink for F {
    fn on_image_generated(&mut self, image: &ExportedImage) {
        self(image)
    }
}

/// Encodes the committed layer at `scale` times its device size, optionally
/// over an underlay.
pub fn export_png(
    surface: &RasterSurface,
    underlay: Option<&PixelBuffer>,
    scale: f32,
    file_name: &str,
) -> ExportResult<ExportedImage> {
    if !(scale.is_finite() && scale > 0.0) {
        return Err(ExportError::InvalidScale(scale));
    }

    let mut flattened = match underlay {
        Some(under) => {
            let mut base = PixelBuffer::new(surface.width(), surface.height());
            base.blit(under, 0, 0);
            base
        }
        None => PixelBuffer::new(surface.width(), surface.height()),
    };
    flattened.draw_over(surface.committed(), 0, 0);

    let width = ((surface.width() as f32 * scale).round() as u32).max(1);
    let height = ((surface.height() as f32 * scale).round() as u32).max(1);
    let image = if (width, height) == flattened.dimensions() {
        flattened.into_image()
    } else {
        image::imageops::resize(flattened.as_image(), width, height, FilterType::Triangle)
    };

    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(SurfaceError::Encode)?;

    log::info!("Exported {} ({}x{}, {} bytes)", file_name, width, height, bytes.len());
    Ok(ExportedImage {
        id: Uuid::new_v4(),
        file_name: file_name.to_owned(),
        mime: PNG_MIME,
        bytes,
        width,
        height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;

    #[test]
    fn export_doubles_the_surface() {
        let surface = RasterSurface::new(30.0, 20.0, 1.0).expect("valid");
        let image = export_png(&surface, None, 2.0, "sketch.png").expect("export");
        assert_eq!((image.width, image.height), (60, 40));
        assert_eq!(image.mime, "image/png");
        let decoded = image::load_from_memory(&image.bytes).expect("png");
        assert_eq!((decoded.width(), decoded.height()), (60, 40));
        assert!(image.object_url().starts_with("blob:sketchpad/"));
    }

    #[test]
    fn underlay_is_flattened() {
        let mut surface = RasterSurface::new(4.0, 4.0, 1.0).expect("valid");
        surface.clear(None);
        let under = PixelBuffer::filled(4, 4, Color::WHITE.with_alpha(255));
        let image = export_png(&surface, Some(&under), 1.0, "a.png").expect("export");
        let decoded = image::load_from_memory(&image.bytes).expect("png").into_rgba8();
        assert_eq!(decoded.get_pixel(2, 2).0, [255, 255, 255, 255]);
    }

    #[test]
    fn rejects_non_positive_scale() {
        let surface = RasterSurface::new(4.0, 4.0, 1.0).expect("valid");
        assert!(matches!(
            export_png(&surface, None, 0.0, "a.png"),
            Err(ExportError::InvalidScale(_))
        ));
    }
}
