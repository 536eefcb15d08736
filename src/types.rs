// Core types shared by the camera, compositor, overlays and window.

use image::{Rgb, RgbImage};

/// Procedural overlays treat pure black as "see-through".
pub const KEY_BLACK: u32 = 0x00_00_00_00;
/// Hand-drawn overlays treat pure white (the paper) as "see-through".
pub const KEY_WHITE: u32 = 0x00_FF_FF_FF;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameBuffer {
    pub width: usize,      // how wide the frame is on screen (pixels)
    pub height: usize,     // how tall the frame is on screen (pixels)
    pub pixels: Vec<u32>,  // each entry is 0x00RRGGBB for minifb
}

impl FrameBuffer {
    /// A buffer of `width x height` where every pixel is `color`.
    pub fn filled(width: usize, height: usize, color: u32) -> Self {
        Self { width, height, pixels: vec![color; width * height] }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u32 {
        self.pixels[y * self.width + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, color: u32) {
        self.pixels[y * self.width + x] = color;
    }

    /// Fill the axis-aligned rectangle, clipped to the buffer.
    pub fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        let x1 = (x + w).min(self.width);
        let y1 = (y + h).min(self.height);
        for yy in y.min(y1)..y1 {
            let row = yy * self.width;
            self.pixels[row + x.min(x1)..row + x1].fill(color);
        }
    }

    /// Mirror left/right in place (selfie view).
    pub fn flip_horizontal(&mut self) {
        for row in self.pixels.chunks_exact_mut(self.width.max(1)) {
            row.reverse();
        }
    }

    /// Copy into an `image` RGB buffer (for resizing and PNG encoding).
    pub fn to_rgb_image(&self) -> RgbImage {
        RgbImage::from_fn(self.width as u32, self.height as u32, |x, y| {
            let (r, g, b) = unpack_rgb(self.get(x as usize, y as usize));
            Rgb([r, g, b])
        })
    }

    /// Pack an `image` RGB buffer back into 0x00RRGGBB pixels.
    pub fn from_rgb_image(img: &RgbImage) -> Self {
        let (w, h) = img.dimensions();
        let pixels = img.pixels().map(|p| pack_rgb(p[0], p[1], p[2])).collect();
        Self { width: w as usize, height: h as usize, pixels }
    }
}

/// Pack three channels as 0x00RRGGBB.
#[inline]
pub fn pack_rgb(r: u8, g: u8, b: u8) -> u32 {
    ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

/// Split 0x00RRGGBB into (r, g, b).
#[inline]
pub fn unpack_rgb(px: u32) -> (u8, u8, u8) {
    (((px >> 16) & 0xFF) as u8, ((px >> 8) & 0xFF) as u8, (px & 0xFF) as u8)
}

/// Axis-aligned rectangle in frame pixels, as reported by a detector.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Region {
    pub x: usize,
    pub y: usize,
    pub w: usize,
    pub h: usize,
}

impl Region {
    pub const fn new(x: usize, y: usize, w: usize, h: usize) -> Self {
        Self { x, y, w, h }
    }

    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    /// True when the whole rectangle lies inside a `width x height` frame.
    /// A rectangle whose far edge overflows `usize` never fits.
    pub fn fits_within(&self, width: usize, height: usize) -> bool {
        self.x.checked_add(self.w).is_some_and(|right| right <= width)
            && self.y.checked_add(self.h).is_some_and(|bottom| bottom <= height)
    }

    /// Intersect with a `width x height` frame. May come back empty.
    pub fn clipped_to(&self, width: usize, height: usize) -> Region {
        let x = self.x.min(width);
        let y = self.y.min(height);
        Region {
            x,
            y,
            w: self.x.saturating_add(self.w).min(width) - x,
            h: self.y.saturating_add(self.h).min(height) - y,
        }
    }
}

/// Pixels plus the one color that means "don't paint here".
/// No alpha channel: a pixel is either the key color (skipped) or painted as-is.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OverlayBuffer {
    pub image: FrameBuffer,
    pub key: u32,
}

impl OverlayBuffer {
    /// Fully transparent overlay: every pixel is the key color.
    pub fn blank(width: usize, height: usize, key: u32) -> Self {
        Self { image: FrameBuffer::filled(width, height, key), key }
    }

    pub fn width(&self) -> usize {
        self.image.width
    }

    pub fn height(&self) -> usize {
        self.image.height
    }

    /// Does this pixel get painted onto the frame?
    #[inline]
    pub fn is_paint(&self, px: u32) -> bool {
        (px & 0x00_FF_FF_FF) != (self.key & 0x00_FF_FF_FF)
    }
}
