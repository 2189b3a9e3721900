//! The drawing surface: an authoritative committed layer plus a transient
//! preview layer of identical size.
//!
//! Coordinates passed in are logical points; the buffers are stored in device
//! pixels and every draw applies `pixels_per_point`.

pub mod background;
pub mod pixel_buffer;
pub mod primitive;
mod raster;
mod text;

pub use background::Background;
pub use pixel_buffer::{CompositeMode, PixelBuffer};
pub use primitive::{DrawMode, FontSpec, Paint, Primitive};

use crate::error::{SurfaceError, SurfaceResult};
use egui::{Pos2, Rect, Vec2};
use image::ImageFormat;
use image::imageops::FilterType;
use std::io::Cursor;

/// Which of the two buffers an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Committed,
    Preview,
}

pub struct RasterSurface {
    committed: PixelBuffer,
    preview: PixelBuffer,
    pixels_per_point: f32,
}

fn device_size(logical_w: f32, logical_h: f32, pixels_per_point: f32) -> SurfaceResult<(u32, u32)> {
    let width = (logical_w * pixels_per_point).round();
    let height = (logical_h * pixels_per_point).round();
    if !(width >= 1.0 && height >= 1.0 && pixels_per_point > 0.0) || width > u32::MAX as f32 || height > u32::MAX as f32 {
        return Err(SurfaceError::InvalidDimensions {
            width: width.max(0.0) as u32,
            height: height.max(0.0) as u32,
        });
    }
    Ok((width as u32, height as u32))
}

/// Rescales `pixels` to exactly `size`, passing it through when it already
/// matches.
fn fit_to(pixels: PixelBuffer, size: (u32, u32)) -> PixelBuffer {
    if pixels.dimensions() == size {
        return pixels;
    }
    PixelBuffer::from_image(image::imageops::resize(pixels.as_image(), size.0, size.1, FilterType::Triangle))
}

impl RasterSurface {
    /// Creates a transparent surface of `logical_w` × `logical_h` points.
    pub fn new(logical_w: f32, logical_h: f32, pixels_per_point: f32) -> SurfaceResult<Self> {
        let (width, height) = device_size(logical_w, logical_h, pixels_per_point)?;
        log::debug!(
            "Creating surface {}x{} px ({}x{} pt @ {})",
            width, height, logical_w, logical_h, pixels_per_point
        );
        Ok(Self {
            committed: PixelBuffer::new(width, height),
            preview: PixelBuffer::new(width, height),
            pixels_per_point,
        })
    }

    /// Device width in pixels
    pub fn width(&self) -> u32 {
        self.committed.width()
    }

    /// Device height in pixels
    pub fn height(&self) -> u32 {
        self.committed.height()
    }

    pub fn pixels_per_point(&self) -> f32 {
        self.pixels_per_point
    }

    pub fn logical_size(&self) -> Vec2 {
        Vec2::new(self.width() as f32, self.height() as f32) / self.pixels_per_point
    }

    pub fn committed(&self) -> &PixelBuffer {
        &self.committed
    }

    pub fn preview(&self) -> &PixelBuffer {
        &self.preview
    }

    fn layer_mut(&mut self, layer: Layer) -> &mut PixelBuffer {
        match layer {
            Layer::Committed => &mut self.committed,
            Layer::Preview => &mut self.preview,
        }
    }

    /// Device pixel under a logical point
    pub fn to_pixel(&self, pos: Pos2) -> (i32, i32) {
        (
            (pos.x * self.pixels_per_point).floor() as i32,
            (pos.y * self.pixels_per_point).floor() as i32,
        )
    }

    /// Device rectangle `(x, y, w, h)` covering a logical rectangle
    pub fn to_pixel_rect(&self, rect: Rect) -> (i32, i32, u32, u32) {
        let scaled = Rect::from_min_max(
            (rect.min.to_vec2() * self.pixels_per_point).to_pos2(),
            (rect.max.to_vec2() * self.pixels_per_point).to_pos2(),
        );
        crate::geometry::pixel_rect(scaled)
    }

    /// Logical rectangle occupied by a device rectangle
    pub fn to_logical_rect(&self, x: i32, y: i32, w: u32, h: u32) -> Rect {
        let ppp = self.pixels_per_point;
        Rect::from_min_size(
            Pos2::new(x as f32 / ppp, y as f32 / ppp),
            Vec2::new(w as f32 / ppp, h as f32 / ppp),
        )
    }

    /// Committed pixel at a logical point
    pub fn sample(&self, pos: Pos2) -> Option<[u8; 4]> {
        let (x, y) = self.to_pixel(pos);
        self.committed.pixel(x, y)
    }

    /// Copies committed pixels in a device rectangle, clamped to the surface.
    /// Returns the pixels and the origin they were taken from.
    pub fn read_region(&self, x: i32, y: i32, w: u32, h: u32) -> Option<(PixelBuffer, (i32, i32))> {
        self.committed.crop(x, y, w, h)
    }

    /// Overwrites committed pixels with `pixels` at device position `(x, y)`.
    pub fn write_region(&mut self, pixels: &PixelBuffer, x: i32, y: i32) {
        self.committed.blit(pixels, x, y);
    }

    /// Makes a device rectangle of the committed layer transparent.
    pub fn clear_region(&mut self, x: i32, y: i32, w: u32, h: u32) {
        self.committed.clear_rect(x, y, w, h);
    }

    /// Source-over composite of `pixels` onto a layer at device `(x, y)`.
    pub fn overlay(&mut self, layer: Layer, pixels: &PixelBuffer, x: i32, y: i32) {
        self.layer_mut(layer).draw_over(pixels, x, y);
    }

    /// Replaces the committed layer. Pixels of another size are stretched
    /// over the whole surface.
    pub fn replace_committed(&mut self, pixels: PixelBuffer) {
        self.committed = fit_to(pixels, self.committed.dimensions());
    }

    /// Rasterizes a primitive onto a layer. Only text can fail, when no font
    /// is available.
    pub fn draw(&mut self, layer: Layer, primitive: &Primitive, paint: &Paint) -> SurfaceResult<()> {
        let scale = self.pixels_per_point;
        let buffer = self.layer_mut(layer);
        match primitive {
            Primitive::Text { origin, text, font } => {
                let rgb = [paint.color.r, paint.color.g, paint.color.b];
                text::draw_text(buffer, *origin, text, font, rgb, scale)
            }
            _ => {
                raster::draw_shape(buffer, primitive, paint, scale);
                Ok(())
            }
        }
    }

    /// Destination-out stroke on the committed layer.
    pub fn erase_segment(&mut self, from: Pos2, to: Pos2, width: f32) {
        let scale = self.pixels_per_point;
        raster::draw_shape(&mut self.committed, &Primitive::Line { from, to }, &Paint::eraser(width), scale);
    }

    pub fn clear_preview(&mut self) {
        self.preview.clear();
    }

    /// Clears the committed layer to transparent, or to `fill` when given.
    pub fn clear(&mut self, fill: Option<crate::color::Color>) {
        match fill {
            Some(color) => self.committed.fill(color.with_alpha(255)),
            None => self.committed.clear(),
        }
    }

    /// Reallocates both layers for a new viewport. The drawing is stretched
    /// to the new device size.
    pub fn resize(&mut self, logical_w: f32, logical_h: f32, pixels_per_point: f32) -> SurfaceResult<()> {
        let (width, height) = device_size(logical_w, logical_h, pixels_per_point)?;
        if (width, height) == self.committed.dimensions() && pixels_per_point == self.pixels_per_point {
            return Ok(());
        }

        log::debug!("Resizing surface to {}x{} px @ {}", width, height, pixels_per_point);
        let previous = std::mem::replace(&mut self.committed, PixelBuffer::new(1, 1));
        self.committed = fit_to(previous, (width, height));
        self.preview = PixelBuffer::new(width, height);
        self.pixels_per_point = pixels_per_point;
        Ok(())
    }

    /// Lossless PNG encoding of the committed layer.
    pub fn encode_png(&self) -> SurfaceResult<Vec<u8>> {
        let mut bytes = Vec::new();
        self.committed
            .as_image()
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .map_err(SurfaceError::Encode)?;
        Ok(bytes)
    }

    /// Decodes a PNG produced by [`Self::encode_png`] without touching the
    /// surface.
    pub fn decode_png(bytes: &[u8]) -> SurfaceResult<PixelBuffer> {
        let image = image::load_from_memory_with_format(bytes, ImageFormat::Png).map_err(SurfaceError::Decode)?;
        Ok(PixelBuffer::from_image(image.into_rgba8()))
    }

    /// Replaces committed content from an encoded snapshot. On a decode
    /// error the surface is left untouched.
    pub fn restore_png(&mut self, bytes: &[u8]) -> SurfaceResult<()> {
        let pixels = Self::decode_png(bytes)?;
        self.replace_committed(pixels);
        Ok(())
    }

    /// Display image: optional underlay, then committed, then preview.
    pub fn composite(&self, underlay: Option<&PixelBuffer>) -> PixelBuffer {
        let mut out = match underlay {
            Some(under) => {
                let mut base = PixelBuffer::new(self.width(), self.height());
                base.blit(under, 0, 0);
                base.draw_over(&self.committed, 0, 0);
                base
            }
            None => self.committed.clone(),
        };
        out.draw_over(&self.preview, 0, 0);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use egui::pos2;

    #[test]
    fn rejects_empty_surfaces() {
        assert!(RasterSurface::new(0.0, 10.0, 1.0).is_err());
        assert!(RasterSurface::new(10.0, 10.0, 0.0).is_err());
    }

    #[test]
    fn device_scale_multiplies_dimensions() {
        let surface = RasterSurface::new(100.0, 50.0, 2.0).expect("valid");
        assert_eq!((surface.width(), surface.height()), (200, 100));
        assert_eq!(surface.logical_size(), Vec2::new(100.0, 50.0));
        assert_eq!(surface.to_pixel(pos2(10.5, 3.2)), (21, 6));
    }

    #[test]
    fn png_round_trip_is_exact() {
        let mut surface = RasterSurface::new(16.0, 16.0, 1.0).expect("valid");
        let paint = Paint::stroke(Color::rgb(10, 200, 30), 3.0);
        let line = Primitive::Line {
            from: pos2(1.0, 1.0),
            to: pos2(14.0, 9.0),
        };
        surface.draw(Layer::Committed, &line, &paint).expect("shape");
        let before = surface.committed().clone();
        let bytes = surface.encode_png().expect("encode");
        surface.clear(None);
        surface.restore_png(&bytes).expect("decode");
        assert_eq!(surface.committed(), &before);
    }

    #[test]
    fn corrupt_snapshot_leaves_surface_untouched() {
        let mut surface = RasterSurface::new(4.0, 4.0, 1.0).expect("valid");
        surface.clear(Some(Color::WHITE));
        assert!(surface.restore_png(b"definitely not a png").is_err());
        assert_eq!(surface.committed().pixel(0, 0), Some([255, 255, 255, 255]));
    }

    #[test]
    fn resize_stretches_content_to_the_new_size() {
        let mut surface = RasterSurface::new(10.0, 10.0, 1.0).expect("valid");
        surface
            .draw(
                Layer::Committed,
                &Primitive::Rect(Rect::from_min_max(pos2(0.0, 0.0), pos2(5.0, 10.0))),
                &Paint::fill(Color::WHITE),
            )
            .expect("shape");
        surface.resize(20.0, 5.0, 1.0).expect("valid");
        assert_eq!((surface.width(), surface.height()), (20, 5));
        assert!(surface.committed().pixel(3, 2).is_some_and(|p| p[3] >= 250));
        assert!(surface.committed().pixel(8, 4).is_some_and(|p| p[3] >= 250));
        assert_eq!(surface.committed().pixel(15, 0).map(|p| p[3]), Some(0));
        assert!(surface.preview().is_clear());
    }

    #[test]
    fn restoring_a_smaller_snapshot_scales_it_up() {
        let mut surface = RasterSurface::new(10.0, 10.0, 1.0).expect("valid");
        surface
            .draw(
                Layer::Committed,
                &Primitive::Rect(Rect::from_min_max(pos2(6.0, 6.0), pos2(9.0, 9.0))),
                &Paint::fill(Color::WHITE),
            )
            .expect("shape");
        let bytes = surface.encode_png().expect("encode");
        surface.resize(10.0, 10.0, 2.0).expect("valid");
        surface.clear(None);

        surface.restore_png(&bytes).expect("decode");
        assert_eq!((surface.width(), surface.height()), (20, 20));
        assert!(surface.sample(pos2(7.5, 7.5)).is_some_and(|p| p[3] >= 250));
        assert_eq!(surface.sample(pos2(3.75, 3.75)).map(|p| p[3]), Some(0));
    }

    #[test]
    fn resize_rescales_for_new_density() {
        let mut surface = RasterSurface::new(10.0, 10.0, 1.0).expect("valid");
        surface.clear(Some(Color::WHITE));
        surface.resize(10.0, 10.0, 2.0).expect("valid");
        assert_eq!((surface.width(), surface.height()), (20, 20));
        assert_eq!(surface.committed().pixel(19, 19).map(|p| p[3]), Some(255));
    }

    #[test]
    fn composite_layers_preview_over_committed() {
        let mut surface = RasterSurface::new(4.0, 4.0, 1.0).expect("valid");
        surface.clear(Some(Color::BLACK));
        let rect = Rect::from_min_max(pos2(0.0, 0.0), pos2(2.0, 2.0));
        surface
            .draw(Layer::Preview, &Primitive::Rect(rect), &Paint::fill(Color::WHITE))
            .expect("shape");
        let out = surface.composite(None);
        assert_eq!(out.pixel(0, 0), Some([255, 255, 255, 255]));
        assert_eq!(out.pixel(3, 3), Some([0, 0, 0, 255]));
        assert_eq!(surface.committed().pixel(0, 0), Some([0, 0, 0, 255]));
    }

    #[test]
    fn region_round_trip() {
        let mut surface = RasterSurface::new(8.0, 8.0, 1.0).expect("valid");
        surface.clear(Some(Color::WHITE));
        let (block, origin) = surface.read_region(2, 2, 3, 3).expect("inside");
        assert_eq!(origin, (2, 2));
        surface.clear_region(2, 2, 3, 3);
        assert_eq!(surface.committed().pixel(3, 3), Some([0, 0, 0, 0]));
        surface.write_region(&block, 5, 5);
        assert_eq!(surface.committed().pixel(7, 7), Some([255, 255, 255, 255]));
    }
}
