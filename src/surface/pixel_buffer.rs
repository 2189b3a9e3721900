use image::{Rgba, RgbaImage};

/// How a coverage value combines a color with the pixel underneath.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositeMode {
    /// Paint the color over the destination
    SourceOver,
    /// Remove destination alpha where covered
    DestinationOut,
}

/// A width × height grid of straight (non-premultiplied) RGBA pixels.
#[derive(Clone, PartialEq)]
pub struct PixelBuffer {
    image: RgbaImage,
}

impl std::fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish_non_exhaustive()
    }
}

impl PixelBuffer {
    /// A fully transparent buffer
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
        }
    }

    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        Self {
            image: RgbaImage::from_pixel(width, height, Rgba(rgba)),
        }
    }

    pub fn from_image(image: RgbaImage) -> Self {
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    pub fn as_image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Raw row-major RGBA bytes
    pub fn as_raw(&self) -> &[u8] {
        self.image.as_raw()
    }

    fn index(&self, x: i32, y: i32) -> Option<(u32, u32)> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as u32, y as u32);
        (x < self.width() && y < self.height()).then_some((x, y))
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.index(x, y).is_some()
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<[u8; 4]> {
        let (x, y) = self.index(x, y)?;
        Some(self.image.get_pixel(x, y).0)
    }

    /// Writes one pixel; out-of-bounds writes are dropped.
    pub fn put_pixel(&mut self, x: i32, y: i32, rgba: [u8; 4]) {
        if let Some((x, y)) = self.index(x, y) {
            self.image.put_pixel(x, y, Rgba(rgba));
        }
    }

    pub fn fill(&mut self, rgba: [u8; 4]) {
        for pixel in self.image.pixels_mut() {
            pixel.0 = rgba;
        }
    }

    pub fn clear(&mut self) {
        self.fill([0, 0, 0, 0]);
    }

    /// True when every pixel is fully transparent
    pub fn is_clear(&self) -> bool {
        self.image.pixels().all(|p| p.0[3] == 0)
    }

    /// Clips `(x, y, w, h)` against the buffer, returning the visible part.
    pub fn clip_rect(&self, x: i32, y: i32, w: u32, h: u32) -> Option<(u32, u32, u32, u32)> {
        let x0 = (x as i64).max(0);
        let y0 = (y as i64).max(0);
        let x1 = (x as i64 + w as i64).min(self.width() as i64);
        let y1 = (y as i64 + h as i64).min(self.height() as i64);
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some((x0 as u32, y0 as u32, (x1 - x0) as u32, (y1 - y0) as u32))
    }

    /// Copies a region, clamped to the buffer. Returns the copy together with
    /// the origin it was actually taken from.
    pub fn crop(&self, x: i32, y: i32, w: u32, h: u32) -> Option<(PixelBuffer, (i32, i32))> {
        let (cx, cy, cw, ch) = self.clip_rect(x, y, w, h)?;
        let view = image::imageops::crop_imm(&self.image, cx, cy, cw, ch).to_image();
        Some((PixelBuffer::from_image(view), (cx as i32, cy as i32)))
    }

    /// Overwrites pixels with `src` placed at `(x, y)`, clipped to bounds.
    pub fn blit(&mut self, src: &PixelBuffer, x: i32, y: i32) {
        image::imageops::replace(&mut self.image, &src.image, x as i64, y as i64);
    }

    /// Source-over composite of `src` at `(x, y)`, clipped to bounds.
    pub fn draw_over(&mut self, src: &PixelBuffer, x: i32, y: i32) {
        image::imageops::overlay(&mut self.image, &src.image, x as i64, y as i64);
    }

    /// Sets a region to fully transparent.
    pub fn clear_rect(&mut self, x: i32, y: i32, w: u32, h: u32) {
        let Some((cx, cy, cw, ch)) = self.clip_rect(x, y, w, h) else {
            return;
        };
        for py in cy..cy + ch {
            for px in cx..cx + cw {
                self.image.put_pixel(px, py, Rgba([0, 0, 0, 0]));
            }
        }
    }

    /// Combines `rgb` into one pixel with the given coverage.
    pub fn blend_pixel(&mut self, x: i32, y: i32, rgb: [u8; 3], coverage: u8, mode: CompositeMode) {
        if let Some((x, y)) = self.index(x, y) {
            let dst = self.image.get_pixel_mut(x, y);
            dst.0 = blend(dst.0, rgb, coverage, mode);
        }
    }

    /// Applies a coverage mask of `mask_w` × `mask_h` whose top-left corner
    /// sits at `(x, y)`.
    pub fn blend_mask(
        &mut self,
        coverage: &[u8],
        mask_w: u32,
        mask_h: u32,
        x: i32,
        y: i32,
        rgb: [u8; 3],
        mode: CompositeMode,
    ) {
        debug_assert_eq!(coverage.len(), (mask_w * mask_h) as usize);
        for my in 0..mask_h {
            for mx in 0..mask_w {
                let c = coverage[(my * mask_w + mx) as usize];
                if c != 0 {
                    self.blend_pixel(x + mx as i32, y + my as i32, rgb, c, mode);
                }
            }
        }
    }
}

/// Straight-alpha compositing of a single color sample.
pub(crate) fn blend(dst: [u8; 4], rgb: [u8; 3], coverage: u8, mode: CompositeMode) -> [u8; 4] {
    if coverage == 0 {
        return dst;
    }
    let sa = coverage as u32;
    match mode {
        CompositeMode::SourceOver => {
            if sa == 255 {
                return [rgb[0], rgb[1], rgb[2], 255];
            }
            let da = (dst[3] as u32 * (255 - sa) + 127) / 255;
            let out_a = sa + da;
            if out_a == 0 {
                return [0, 0, 0, 0];
            }
            let mix = |s: u8, d: u8| ((s as u32 * sa + d as u32 * da + out_a / 2) / out_a) as u8;
            [
                mix(rgb[0], dst[0]),
                mix(rgb[1], dst[1]),
                mix(rgb[2], dst[2]),
                out_a.min(255) as u8,
            ]
        }
        CompositeMode::DestinationOut => {
            let out_a = (dst[3] as u32 * (255 - sa) + 127) / 255;
            if out_a == 0 {
                [0, 0, 0, 0]
            } else {
                [dst[0], dst[1], dst[2], out_a as u8]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_coverage_overwrites() {
        assert_eq!(blend([1, 2, 3, 40], [9, 8, 7], 255, CompositeMode::SourceOver), [9, 8, 7, 255]);
    }

    #[test]
    fn partial_coverage_over_transparent_keeps_color() {
        let out = blend([0, 0, 0, 0], [200, 100, 50], 128, CompositeMode::SourceOver);
        assert_eq!(out, [200, 100, 50, 128]);
    }

    #[test]
    fn destination_out_removes_alpha() {
        assert_eq!(blend([5, 5, 5, 255], [0, 0, 0], 255, CompositeMode::DestinationOut), [0, 0, 0, 0]);
        let half = blend([5, 5, 5, 255], [0, 0, 0], 128, CompositeMode::DestinationOut);
        assert_eq!(half[3], 127);
    }

    #[test]
    fn crop_clamps_to_bounds() {
        let buffer = PixelBuffer::filled(10, 10, [1, 1, 1, 255]);
        let (part, origin) = buffer.crop(-5, 8, 10, 10).expect("overlaps");
        assert_eq!(origin, (0, 8));
        assert_eq!(part.dimensions(), (5, 2));
        assert!(buffer.crop(20, 20, 4, 4).is_none());
    }

    #[test]
    fn blit_clips_and_overwrites() {
        let mut dst = PixelBuffer::filled(4, 4, [9, 9, 9, 255]);
        let src = PixelBuffer::new(3, 3);
        dst.blit(&src, 2, -1);
        assert_eq!(dst.pixel(2, 0), Some([0, 0, 0, 0]));
        assert_eq!(dst.pixel(3, 1), Some([0, 0, 0, 0]));
        assert_eq!(dst.pixel(3, 2), Some([9, 9, 9, 255]));
        assert_eq!(dst.pixel(1, 0), Some([9, 9, 9, 255]));
    }

    #[test]
    fn draw_over_skips_transparent_source_pixels() {
        let mut dst = PixelBuffer::filled(4, 4, [9, 9, 9, 255]);
        let mut src = PixelBuffer::new(2, 2);
        src.blend_pixel(1, 1, [200, 0, 0], 255, CompositeMode::SourceOver);
        dst.draw_over(&src, -1, -1);
        assert_eq!(dst.pixel(0, 0), Some([200, 0, 0, 255]));
        assert_eq!(dst.pixel(1, 0), Some([9, 9, 9, 255]));
        assert_eq!(dst.pixel(1, 1), Some([9, 9, 9, 255]));
    }

    #[test]
    fn clear_rect_is_clipped() {
        let mut buffer = PixelBuffer::filled(4, 4, [1, 2, 3, 255]);
        buffer.clear_rect(3, 3, 10, 10);
        assert_eq!(buffer.pixel(3, 3), Some([0, 0, 0, 0]));
        assert_eq!(buffer.pixel(2, 3), Some([1, 2, 3, 255]));
    }
}
