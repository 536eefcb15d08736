// Stamps an overlay onto a face box in the live frame.
// Visual: wherever the overlay is not its key color, that pixel replaces the
// camera pixel. Key-colored pixels leave the camera image alone (hard edge,
// no blending).

use std::borrow::Cow;

use image::imageops::{self, FilterType};

use crate::error::Error;
use crate::types::{FrameBuffer, OverlayBuffer, Region};

/// Resize `overlay` to exactly `w x h` with bilinear filtering.
/// Returns the input untouched (borrowed) when it already has that size.
pub fn fit_overlay(overlay: &OverlayBuffer, w: usize, h: usize) -> Cow<'_, OverlayBuffer> {
    if overlay.width() == w && overlay.height() == h {
        return Cow::Borrowed(overlay);
    }
    let src = overlay.image.to_rgb_image();
    let resized = imageops::resize(&src, w as u32, h as u32, FilterType::Triangle);
    Cow::Owned(OverlayBuffer { image: FrameBuffer::from_rgb_image(&resized), key: overlay.key })
}

/// Paint `overlay` into `frame` at `region`, resizing it to the region first.
/// Zero-sized or out-of-frame regions are refused; the frame is not touched.
pub fn composite(frame: &mut FrameBuffer, region: Region, overlay: &OverlayBuffer) -> Result<(), Error> {
    if region.is_empty() {
        return Err(Error::InvalidRegion { w: region.w, h: region.h });
    }
    if !region.fits_within(frame.width, frame.height) {
        return Err(Error::RegionOutOfBounds {
            x: region.x,
            y: region.y,
            w: region.w,
            h: region.h,
            frame_w: frame.width,
            frame_h: frame.height,
        });
    }

    let sized = fit_overlay(overlay, region.w, region.h);
    for j in 0..region.h {
        let src_row = &sized.image.pixels[j * region.w..(j + 1) * region.w];
        let dst_ofs = (region.y + j) * frame.width + region.x;
        let dst_row = &mut frame.pixels[dst_ofs..dst_ofs + region.w];
        for (dst, &src) in dst_row.iter_mut().zip(src_row) {
            if sized.is_paint(src) {
                *dst = src;
            }
        }
    }
    Ok(())
}
