use crate::surface::PixelBuffer;
use egui::{ColorImage, Context, TextureHandle, TextureId, TextureOptions};

/// GPU texture mirroring the composited canvas, re-uploaded only when the
/// canvas changed.
pub struct CanvasTexture {
    name: String,
    handle: Option<TextureHandle>,
    stale: bool,
}

impl CanvasTexture {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            handle: None,
            stale: true,
        }
    }

    /// Forces an upload on the next [`Self::update`]
    pub fn invalidate(&mut self) {
        self.stale = true;
    }

    pub fn is_stale(&self) -> bool {
        self.stale || self.handle.is_none()
    }

    /// Uploads `pixels` if stale and returns the texture to paint.
    pub fn update(&mut self, ctx: &Context, pixels: impl FnOnce() -> PixelBuffer) -> TextureId {
        if self.is_stale() {
            let image = to_color_image(&pixels());
            match &mut self.handle {
                Some(handle) => handle.set(image, TextureOptions::NEAREST),
                slot @ None => *slot = Some(ctx.load_texture(&self.name, image, TextureOptions::NEAREST)),
            }
            self.stale = false;
        }
        self.handle.as_ref().map_or(TextureId::default(), TextureHandle::id)
    }
}

pub fn to_color_image(pixels: &PixelBuffer) -> ColorImage {
    let (width, height) = pixels.dimensions();
    ColorImage::from_rgba_unmultiplied([width as usize, height as usize], pixels.as_raw())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_image_matches_buffer_size() {
        let pixels = PixelBuffer::filled(7, 3, [10, 20, 30, 255]);
        let image = to_color_image(&pixels);
        assert_eq!(image.size, [7, 3]);
        assert_eq!(image.pixels[0], egui::Color32::from_rgb(10, 20, 30));
    }

    #[test]
    fn new_texture_is_stale() {
        let mut texture = CanvasTexture::new("canvas");
        assert!(texture.is_stale());
        texture.stale = false;
        assert!(texture.is_stale());
    }
}
