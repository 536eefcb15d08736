// Procedural sunglasses, drawn fresh for every face box.
// Visual: two dark lenses joined by a thin white bridge, sitting a quarter of
// the way down the box. Everything else is black = transparent.

use crate::types::{FrameBuffer, OverlayBuffer, KEY_BLACK};

pub const LENS_COLOR: u32 = 0x00_32_32_32;   // dark gray, never equal to the key
pub const BRIDGE_COLOR: u32 = 0x00_FF_FF_FF; // white

/// Rectangles that make up the glasses, in overlay-local pixels.
/// Each is (x, y, w, h).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GlassesLayout {
    pub canvas: (usize, usize, usize, usize),
    pub left_lens: (usize, usize, usize, usize),
    pub right_lens: (usize, usize, usize, usize),
    pub bridge: (usize, usize, usize, usize),
}

impl GlassesLayout {
    /// Integer-only layout for a `w x h` face box. Same input, same rectangles.
    pub fn for_size(w: usize, h: usize) -> Self {
        // Glasses canvas: two thirds of the face wide, a quarter tall,
        // centered horizontally and a quarter of the way down.
        let glass_w = (w as f64 / 1.5).round() as usize;
        let glass_h = h / 4;
        let gx = (w - glass_w.min(w)) / 2;
        let gy = h / 4;

        // Lenses hug both ends of the canvas.
        let lens_w = 2 * (glass_w / 5);
        let left_lens = (gx, gy, lens_w, glass_h);
        let right_lens = (gx + glass_w - lens_w, gy, lens_w, glass_h);

        // Bridge: thin bar in the gap between the lenses.
        let bridge_w = glass_w / 5;
        let bridge_h = glass_h / 7;
        let bridge = (
            gx + (glass_w - bridge_w) / 2,
            gy + 3 * (glass_h / 7),
            bridge_w,
            bridge_h,
        );

        Self { canvas: (gx, gy, glass_w, glass_h), left_lens, right_lens, bridge }
    }
}

/// Render sunglasses sized for a `w x h` region (both > 0; the caller rejects zero).
/// Visual: once composited, the face gets a pair of shades.
pub fn generate(w: usize, h: usize) -> OverlayBuffer {
    let layout = GlassesLayout::for_size(w, h);
    let mut img = FrameBuffer::filled(w, h, KEY_BLACK);

    for (x, y, rw, rh) in [layout.left_lens, layout.right_lens] {
        img.fill_rect(x, y, rw, rh, LENS_COLOR);
    }
    let (x, y, rw, rh) = layout.bridge;
    img.fill_rect(x, y, rw, rh, BRIDGE_COLOR);

    OverlayBuffer { image: img, key: KEY_BLACK }
}
