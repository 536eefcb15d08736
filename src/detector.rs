// Where do overlays go? A detector looks at a frame and returns boxes.
// The booth does not care how boxes are found, only that they are inside
// the frame. Two detectors ship here:
//   * FixedDetector  - boxes given on the command line (handy for testing)
//   * MotionDetector - learns the empty scene, then boxes whatever moved in
//     front of it (you, usually)

use log::{debug, info};

use crate::error::Error;
use crate::types::{pack_rgb, unpack_rgb, FrameBuffer, Region};

/// Frame -> boxes. Boxes must lie inside the frame; order does not matter.
pub trait Detector {
    fn detect(&mut self, frame: &FrameBuffer) -> Vec<Region>;

    /// Something worth telling the user (shown in the HUD), if any.
    fn status(&self) -> Option<&'static str> {
        None
    }
}

/* ------------------------------ FixedDetector ------------------------------ */

/// Always reports the same boxes (clipped to each frame, empty ones dropped).
pub struct FixedDetector {
    regions: Vec<Region>,
}

impl FixedDetector {
    pub fn new(regions: Vec<Region>) -> Result<Self, Error> {
        if regions.is_empty() {
            return Err(Error::DetectorInit("fixed detector needs at least one --region".into()));
        }
        Ok(Self { regions })
    }
}

impl Detector for FixedDetector {
    fn detect(&mut self, frame: &FrameBuffer) -> Vec<Region> {
        self.regions
            .iter()
            .map(|r| r.clipped_to(frame.width, frame.height))
            .filter(|r| !r.is_empty())
            .collect()
    }
}

/* ------------------------------ MotionDetector ----------------------------- */

pub const BG_CAPTURE_COUNT: usize = 35; // ~1–2 seconds of frames at 30 FPS

/// Tuning knobs for MotionDetector.
#[derive(Clone, Copy, Debug)]
pub struct MotionConfig {
    pub warmup_frames: usize, // frames averaged (median) into the background
    pub cell: usize,          // grid cell size in pixels
    pub diff_threshold: u8,   // per-channel difference that counts as "changed"
    pub cell_fill: f32,       // fraction of changed pixels that makes a cell foreground
    pub min_cells: usize,     // blobs smaller than this are noise
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self { warmup_frames: BG_CAPTURE_COUNT, cell: 16, diff_threshold: 40, cell_fill: 0.3, min_cells: 6 }
    }
}

/// Learns the empty scene from the first frames, then boxes connected blobs
/// of changed grid cells.
/// Visual: for the first second or so nothing is detected (step out of frame!).
pub struct MotionDetector {
    config: MotionConfig,
    warmup: Vec<FrameBuffer>,
    background: Option<FrameBuffer>,
}

impl MotionDetector {
    pub fn new(config: MotionConfig) -> Result<Self, Error> {
        if config.cell == 0 || config.warmup_frames == 0 {
            return Err(Error::DetectorInit("motion detector: cell size and warmup must be > 0".into()));
        }
        Ok(Self { config, warmup: Vec::with_capacity(config.warmup_frames), background: None })
    }

    pub fn is_ready(&self) -> bool {
        self.background.is_some()
    }

    /// Mark each grid cell as foreground (true) or background.
    fn foreground_cells(&self, frame: &FrameBuffer, bg: &FrameBuffer) -> (Vec<bool>, usize, usize) {
        let c = self.config.cell;
        let gw = frame.width.div_ceil(c);
        let gh = frame.height.div_ceil(c);
        let mut changed = vec![0usize; gw * gh];
        let mut total = vec![0usize; gw * gh];

        for y in 0..frame.height {
            for x in 0..frame.width {
                let cell = (y / c) * gw + x / c;
                total[cell] += 1;
                if channel_diff(frame.get(x, y), bg.get(x, y)) > self.config.diff_threshold {
                    changed[cell] += 1;
                }
            }
        }

        let fg = changed
            .iter()
            .zip(&total)
            .map(|(&n, &t)| t > 0 && n as f32 >= self.config.cell_fill * t as f32)
            .collect();
        (fg, gw, gh)
    }
}

impl Detector for MotionDetector {
    fn detect(&mut self, frame: &FrameBuffer) -> Vec<Region> {
        // Resolution changed under us: start learning again.
        let size_changed = self
            .background
            .as_ref()
            .is_some_and(|bg| bg.width != frame.width || bg.height != frame.height);
        if size_changed {
            info!("Frame size changed, relearning background");
            self.background = None;
        }

        if self.background.is_none() {
            self.warmup.push(frame.clone());
            if self.warmup.len() >= self.config.warmup_frames {
                match median_background(&self.warmup) {
                    Ok(bg) => {
                        info!("Background learned from {} frames", self.warmup.len());
                        self.background = Some(bg);
                    }
                    Err(e) => debug!("{e}"),
                }
                self.warmup.clear();
            }
            return Vec::new();
        }
        let Some(bg) = self.background.as_ref() else {
            return Vec::new();
        };

        let (fg, gw, gh) = self.foreground_cells(frame, bg);
        let c = self.config.cell;
        cell_blobs(&fg, gw, gh)
            .into_iter()
            .filter(|&(_, count)| count >= self.config.min_cells)
            .map(|((cx0, cy0, cx1, cy1), _)| {
                Region::new(cx0 * c, cy0 * c, (cx1 - cx0 + 1) * c, (cy1 - cy0 + 1) * c)
                    .clipped_to(frame.width, frame.height)
            })
            .filter(|r| !r.is_empty())
            .collect()
    }

    fn status(&self) -> Option<&'static str> {
        (!self.is_ready()).then_some("LEARNING BACKGROUND - STEP OUT OF VIEW")
    }
}

/// Largest per-channel absolute difference between two 0x00RRGGBB pixels.
#[inline]
fn channel_diff(a: u32, b: u32) -> u8 {
    [16u32, 8, 0]
        .into_iter()
        .map(|s| (((a >> s) & 0xFF) as i32 - ((b >> s) & 0xFF) as i32).unsigned_abs() as u8)
        .max()
        .unwrap_or(0)
}

/// 4-connected blobs of `true` cells: (cell bounding box x0,y0,x1,y1 inclusive, cell count).
fn cell_blobs(fg: &[bool], gw: usize, gh: usize) -> Vec<((usize, usize, usize, usize), usize)> {
    let mut seen = vec![false; fg.len()];
    let mut blobs = Vec::new();
    let mut stack = Vec::new();

    for start in 0..fg.len() {
        if !fg[start] || seen[start] {
            continue;
        }
        seen[start] = true;
        stack.push(start);
        let (mut x0, mut y0, mut x1, mut y1) = (usize::MAX, usize::MAX, 0, 0);
        let mut count = 0;

        while let Some(i) = stack.pop() {
            let (x, y) = (i % gw, i / gw);
            x0 = x0.min(x);
            y0 = y0.min(y);
            x1 = x1.max(x);
            y1 = y1.max(y);
            count += 1;

            let mut visit = |n: usize| {
                if fg[n] && !seen[n] {
                    seen[n] = true;
                    stack.push(n);
                }
            };
            if x > 0 { visit(i - 1); }
            if x + 1 < gw { visit(i + 1); }
            if y > 0 { visit(i - gw); }
            if y + 1 < gh { visit(i + gw); }
        }
        blobs.push(((x0, y0, x1, y1), count));
    }
    blobs
}

/// Compute per-pixel median across the provided frames (all same size).
/// What you *see* afterward: a clean background image with moving objects removed.
pub fn median_background(frames: &[FrameBuffer]) -> Result<FrameBuffer, Error> {
    // 1) Must have at least 1 frame; otherwise we cannot build a background.
    let Some(first) = frames.first() else {
        return Err(Error::DetectorInit("median_background: no frames".into()));
    };

    // 2) Verify all frames share the same resolution.
    let (w, h) = (first.width, first.height);
    if frames.iter().any(|f| f.width != w || f.height != h) {
        return Err(Error::DetectorInit("median_background: frames must share identical dimensions".into()));
    }

    // 3) Median per pixel, channel by channel. Scratch buffers are reused.
    let k = frames.len();
    let mut rbuf = vec![0u8; k];
    let mut gbuf = vec![0u8; k];
    let mut bbuf = vec![0u8; k];
    let mut out = Vec::with_capacity(w * h);

    for idx in 0..(w * h) {
        for (i, f) in frames.iter().enumerate() {
            (rbuf[i], gbuf[i], bbuf[i]) = unpack_rgb(f.pixels[idx]);
        }
        rbuf.sort_unstable();
        gbuf.sort_unstable();
        bbuf.sort_unstable();
        let mid = k / 2;
        out.push(pack_rgb(rbuf[mid], gbuf[mid], bbuf[mid]));
    }

    Ok(FrameBuffer { width: w, height: h, pixels: out })
}

#[cfg(test)]
mod tests {
    use super::*;

    const GRAY: u32 = 0x00_40_40_40;

    fn quick_config() -> MotionConfig {
        MotionConfig { warmup_frames: 3, cell: 8, diff_threshold: 40, cell_fill: 0.3, min_cells: 4 }
    }

    #[test]
    fn fixed_detector_clips_and_drops_empty() {
        let mut d = FixedDetector::new(vec![
            Region::new(10, 10, 20, 20),
            Region::new(90, 90, 50, 50),
            Region::new(500, 0, 10, 10),
        ])
        .unwrap();
        let frame = FrameBuffer::filled(100, 100, 0);
        assert_eq!(d.detect(&frame), vec![Region::new(10, 10, 20, 20), Region::new(90, 90, 10, 10)]);
    }

    #[test]
    fn fixed_detector_drops_region_past_usize_max() {
        let mut d = FixedDetector::new(vec![Region::new(usize::MAX, 0, 5, 5), Region::new(1, 2, 3, 4)]).unwrap();
        let frame = FrameBuffer::filled(50, 50, 0);
        assert_eq!(d.detect(&frame), vec![Region::new(1, 2, 3, 4)]);
    }

    #[test]
    fn fixed_detector_requires_regions() {
        assert!(matches!(FixedDetector::new(Vec::new()), Err(Error::DetectorInit(_))));
    }

    #[test]
    fn median_ignores_outliers() {
        let frames = vec![
            FrameBuffer::filled(2, 2, 0x00_10_20_30),
            FrameBuffer::filled(2, 2, 0x00_FF_FF_FF),
            FrameBuffer::filled(2, 2, 0x00_10_20_30),
        ];
        let bg = median_background(&frames).unwrap();
        assert!(bg.pixels.iter().all(|&p| p == 0x00_10_20_30));
    }

    #[test]
    fn median_rejects_mixed_sizes_and_empty_input() {
        assert!(median_background(&[]).is_err());
        let frames = vec![FrameBuffer::filled(2, 2, 0), FrameBuffer::filled(3, 2, 0)];
        assert!(median_background(&frames).is_err());
    }

    #[test]
    fn motion_detector_waits_for_background() {
        let mut d = MotionDetector::new(quick_config()).unwrap();
        let empty = FrameBuffer::filled(64, 48, GRAY);
        for _ in 0..3 {
            assert!(d.status().is_some());
            assert!(d.detect(&empty).is_empty());
        }
        assert!(d.is_ready());
        assert_eq!(d.status(), None);
        assert!(d.detect(&empty).is_empty());
    }

    #[test]
    fn motion_detector_boxes_a_new_object() {
        let mut d = MotionDetector::new(quick_config()).unwrap();
        let empty = FrameBuffer::filled(64, 48, GRAY);
        for _ in 0..3 {
            d.detect(&empty);
        }

        let mut scene = empty.clone();
        scene.fill_rect(16, 8, 24, 24, 0x00_F0_C0_A0);
        let boxes = d.detect(&scene);
        assert_eq!(boxes, vec![Region::new(16, 8, 24, 24)]);
        assert!(boxes.iter().all(|r| r.fits_within(64, 48)));
    }

    #[test]
    fn motion_detector_drops_small_specks() {
        let mut d = MotionDetector::new(quick_config()).unwrap();
        let empty = FrameBuffer::filled(64, 48, GRAY);
        for _ in 0..3 {
            d.detect(&empty);
        }
        let mut scene = empty.clone();
        scene.fill_rect(0, 0, 8, 8, 0x00_FF_FF_FF); // one cell
        assert!(d.detect(&scene).is_empty());
    }

    #[test]
    fn blobs_are_four_connected() {
        // X .
        // . X   -> two blobs
        let fg = [true, false, false, true];
        let blobs = cell_blobs(&fg, 2, 2);
        assert_eq!(blobs.len(), 2);
        assert!(blobs.iter().all(|&(_, n)| n == 1));
    }

    #[test]
    fn channel_diff_takes_the_max() {
        assert_eq!(channel_diff(0x00_10_20_30, 0x00_10_25_00), 0x30);
        assert_eq!(channel_diff(0, 0), 0);
    }
}
