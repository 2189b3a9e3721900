//! Tolerance-based 4-connected flood fill.

use crate::color::Color;
use crate::surface::PixelBuffer;
use serde::{Deserialize, Serialize};

/// Per-channel distance still treated as "the same color"
pub const DEFAULT_FILL_TOLERANCE: u8 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FillConfig {
    pub tolerance: u8,
    /// Whether a fully transparent seed pixel starts a fill. Off by default:
    /// clicking empty canvas does nothing.
    pub fill_transparent: bool,
}

impl Default for FillConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_FILL_TOLERANCE,
            fill_transparent: false,
        }
    }
}

fn within(a: [u8; 4], b: [u8; 4], tolerance: u8) -> bool {
    a.iter().zip(b.iter()).all(|(x, y)| x.abs_diff(*y) <= tolerance)
}

/// Replaces the region connected to `seed` with `color` at full opacity.
/// Returns the number of pixels painted; zero means the buffer is unchanged.
pub fn flood_fill(buffer: &mut PixelBuffer, seed: (i32, i32), color: Color, config: &FillConfig) -> usize {
    let Some(target) = buffer.pixel(seed.0, seed.1) else {
        log::debug!("Fill seed {:?} is outside the surface", seed);
        return 0;
    };
    if target[3] == 0 && !config.fill_transparent {
        log::debug!("Fill seed {:?} is transparent", seed);
        return 0;
    }
    let replacement = color.with_alpha(255);
    if within(target, replacement, config.tolerance) {
        log::debug!("Fill seed already matches {}", color);
        return 0;
    }

    let (width, height) = buffer.dimensions();
    let mut visited = vec![false; width as usize * height as usize];
    let mut stack = vec![seed];
    let mut painted = 0;

    while let Some((x, y)) = stack.pop() {
        if x < 0 || y < 0 || x >= width as i32 || y >= height as i32 {
            continue;
        }
        let index = y as usize * width as usize + x as usize;
        if visited[index] {
            continue;
        }
        visited[index] = true;

        match buffer.pixel(x, y) {
            Some(current) if within(current, target, config.tolerance) => {}
            _ => continue,
        }
        buffer.put_pixel(x, y, replacement);
        painted += 1;

        stack.push((x + 1, y));
        stack.push((x - 1, y));
        stack.push((x, y + 1));
        stack.push((x, y - 1));
    }

    painted
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Color = Color::rgb(255, 0, 0);

    fn boxed() -> PixelBuffer {
        // 10x10 white with a black wall at x=5
        let mut buffer = PixelBuffer::filled(10, 10, [255, 255, 255, 255]);
        for y in 0..10 {
            buffer.put_pixel(5, y, [0, 0, 0, 255]);
        }
        buffer
    }

    #[test]
    fn fill_stops_at_boundaries() {
        let mut buffer = boxed();
        let painted = flood_fill(&mut buffer, (1, 1), RED, &FillConfig::default());
        assert_eq!(painted, 50);
        assert_eq!(buffer.pixel(4, 9), Some([255, 0, 0, 255]));
        assert_eq!(buffer.pixel(5, 0), Some([0, 0, 0, 255]));
        assert_eq!(buffer.pixel(6, 0), Some([255, 255, 255, 255]));
    }

    #[test]
    fn near_colors_fill_within_tolerance() {
        let mut buffer = PixelBuffer::filled(3, 1, [100, 100, 100, 255]);
        buffer.put_pixel(1, 0, [108, 95, 100, 255]);
        buffer.put_pixel(2, 0, [120, 100, 100, 255]);
        let painted = flood_fill(&mut buffer, (0, 0), RED, &FillConfig::default());
        assert_eq!(painted, 2);
        assert_eq!(buffer.pixel(2, 0), Some([120, 100, 100, 255]));
    }

    #[test]
    fn same_color_is_a_no_op() {
        let mut buffer = PixelBuffer::filled(4, 4, RED.with_alpha(255));
        let before = buffer.clone();
        assert_eq!(flood_fill(&mut buffer, (2, 2), RED, &FillConfig::default()), 0);
        assert_eq!(buffer, before);
    }

    #[test]
    fn out_of_bounds_seed_is_a_no_op() {
        let mut buffer = PixelBuffer::new(4, 4);
        assert_eq!(flood_fill(&mut buffer, (-1, 2), RED, &FillConfig::default()), 0);
        assert_eq!(flood_fill(&mut buffer, (4, 0), RED, &FillConfig::default()), 0);
        assert!(buffer.is_clear());
    }

    #[test]
    fn transparent_seed_respects_config() {
        let mut buffer = PixelBuffer::new(4, 4);
        assert_eq!(flood_fill(&mut buffer, (0, 0), RED, &FillConfig::default()), 0);
        assert!(buffer.is_clear());

        let config = FillConfig {
            fill_transparent: true,
            ..FillConfig::default()
        };
        assert_eq!(flood_fill(&mut buffer, (0, 0), RED, &config), 16);
    }

    #[test]
    fn large_regions_do_not_recurse() {
        let mut buffer = PixelBuffer::filled(600, 600, [255, 255, 255, 255]);
        assert_eq!(flood_fill(&mut buffer, (300, 300), RED, &FillConfig::default()), 360_000);
    }
}
