// Everything the booth remembers between frames, and the per-frame steps
// that use it. No window or camera in here, so all of it runs in tests.
//
// One frame, in order:
//   composite_overlays  - overlay on every detected box
//   handle              - react to at most one key (a photo is taken here)
//   draw_hud            - face count, mode, hints, "saved" message

use chrono::{DateTime, Local};
use log::{debug, info, warn};

use crate::compositor::composite;
use crate::draw::{draw_rect_outline, draw_text_5x7, draw_text_scaled, text_width, Command, GLYPH_HEIGHT};
use crate::feedback::CaptureFeedback;
use crate::mode::{ModeController, OverlayAuthor};
use crate::photo::{photo_name, PhotoSink};
use crate::types::{FrameBuffer, Region};

const BOX_COLOR: u32 = 0x00_00_00_FF;      // blue detection boxes
const HUD_COLOR: u32 = 0x00_FF_FF_FF;      // white HUD
const FEEDBACK_COLOR: u32 = 0x00_00_FF_00; // green "saved" text
const FEEDBACK_SCALE: i32 = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Booth {
    mode: ModeController,
    feedback: CaptureFeedback,
    show_boxes: bool,
}

impl Booth {
    pub fn new(show_boxes: bool) -> Self {
        Self { mode: ModeController::new(), feedback: CaptureFeedback::new(), show_boxes }
    }

    /// Stamp the current overlay on every box. Returns how many got one.
    /// Zero-sized or off-frame boxes are skipped before an overlay is sized for them.
    pub fn composite_overlays(&self, frame: &mut FrameBuffer, regions: &[Region]) -> usize {
        let mut applied = 0;
        for &region in regions {
            if self.show_boxes {
                let b = region.clipped_to(frame.width, frame.height);
                draw_rect_outline(frame, b.x as i32, b.y as i32, b.w as i32, b.h as i32, BOX_COLOR, 2);
            }
            if region.is_empty() || !region.fits_within(frame.width, frame.height) {
                debug!("Skipping region {region:?}");
                continue;
            }
            let Some(overlay) = self.mode.overlay_for(region.w, region.h) else { continue };
            match composite(frame, region, &overlay) {
                Ok(()) => applied += 1,
                Err(e) => debug!("Skipping region: {e}"),
            }
        }
        applied
    }

    /// Apply one command. `frame` is what a photo would capture.
    pub fn handle(
        &mut self,
        cmd: Command,
        frame: &FrameBuffer,
        author: &mut dyn OverlayAuthor,
        sink: &mut dyn PhotoSink,
        now: DateTime<Local>,
    ) -> Flow {
        match cmd {
            Command::Quit => return Flow::Quit,
            Command::ToggleOverlay => {
                self.mode.toggle();
                info!("Overlay: {}", self.mode.active_overlay().label());
            }
            Command::SavePhoto => {
                let name = photo_name(now);
                match sink.save(frame, &name) {
                    Ok(()) => {
                        info!("Saved {name}");
                        self.feedback.start(format!("PHOTO SAVED: {name}"));
                    }
                    Err(e) => {
                        warn!("{e}");
                        self.feedback.start("SAVE FAILED");
                    }
                }
            }
            Command::CreateOverlay => match self.mode.create(author) {
                Ok(true) => info!("Custom overlay active"),
                Ok(false) => info!("Custom overlay unchanged"),
                Err(e) => {
                    warn!("{e}");
                    self.feedback.start("SKETCH PAD FAILED");
                }
            },
        }
        Flow::Continue
    }

    /// HUD on top of everything. Ticks the feedback timer once.
    /// `note` is an optional second line (e.g. the detector warming up).
    pub fn draw_hud(&mut self, frame: &mut FrameBuffer, faces: usize, note: Option<&str>) {
        let status = format!("FACES: {faces} | OVERLAY: {}", self.mode.active_overlay().label());
        draw_text_5x7(frame, 8, 8, &status, HUD_COLOR);
        if let Some(note) = note {
            draw_text_5x7(frame, 8, 8 + GLYPH_HEIGHT + 4, note, HUD_COLOR);
        }

        let hint = "T: TOGGLE  C: DRAW  S: SAVE  Q: QUIT";
        draw_text_5x7(frame, 8, frame.height as i32 - GLYPH_HEIGHT - 8, hint, HUD_COLOR);

        if let Some(msg) = self.feedback.tick() {
            let x = (frame.width as i32 - text_width(msg, FEEDBACK_SCALE)) / 2;
            let y = frame.height as i32 - GLYPH_HEIGHT * FEEDBACK_SCALE - 30;
            draw_text_scaled(frame, x.max(0), y, msg, FEEDBACK_COLOR, FEEDBACK_SCALE);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::{Detector, FixedDetector};
    use crate::error::Error;
    use crate::glasses::{LENS_COLOR, BRIDGE_COLOR};
    use crate::types::{OverlayBuffer, KEY_BLACK, KEY_WHITE};
    use chrono::TimeZone;

    #[derive(Default)]
    struct MemorySink {
        saved: Vec<(String, FrameBuffer)>,
        fail: bool,
    }

    impl PhotoSink for MemorySink {
        fn save(&mut self, frame: &FrameBuffer, name: &str) -> Result<(), Error> {
            if self.fail {
                return Err(Error::PhotoSave { name: name.into(), reason: "disk full".into() });
            }
            self.saved.push((name.to_string(), frame.clone()));
            Ok(())
        }
    }

    /// Inks the top-left quarter of the page.
    struct Doodle;

    impl OverlayAuthor for Doodle {
        fn author(&mut self) -> Result<Option<OverlayBuffer>, Error> {
            let mut ov = OverlayBuffer::blank(400, 300, KEY_WHITE);
            ov.image.fill_rect(0, 0, 200, 150, 0x00_00_00_00);
            Ok(Some(ov))
        }
    }

    fn noon() -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 1, 2, 12, 0, 0).unwrap()
    }

    fn press(booth: &mut Booth, cmd: Command, sink: &mut MemorySink) -> Flow {
        let frame = FrameBuffer::filled(4, 4, 0);
        booth.handle(cmd, &frame, &mut Doodle, sink, noon())
    }

    #[test]
    fn nothing_is_drawn_while_off() {
        let booth = Booth::new(false);
        let mut frame = FrameBuffer::filled(120, 120, KEY_BLACK);
        assert_eq!(booth.composite_overlays(&mut frame, &[Region::new(10, 10, 100, 100)]), 0);
        assert!(frame.pixels.iter().all(|&p| p == KEY_BLACK));
    }

    #[test]
    fn toggled_glasses_land_on_detected_boxes() {
        let mut booth = Booth::new(false);
        let mut sink = MemorySink::default();
        press(&mut booth, Command::ToggleOverlay, &mut sink);

        let mut frame = FrameBuffer::filled(200, 150, KEY_BLACK);
        let mut det = FixedDetector::new(vec![Region::new(10, 10, 100, 100)]).unwrap();
        let regions = det.detect(&frame);
        assert_eq!(booth.composite_overlays(&mut frame, &regions), 1);

        assert_eq!(frame.get(10 + 20, 10 + 30), LENS_COLOR);
        assert_eq!(frame.get(10 + 45, 10 + 35), BRIDGE_COLOR);
        assert_eq!(frame.get(5, 5), KEY_BLACK);
        assert_eq!(frame.get(150, 100), KEY_BLACK);
    }

    #[test]
    fn bad_boxes_are_skipped_not_fatal() {
        let mut booth = Booth::new(false);
        booth.mode.toggle();
        let mut frame = FrameBuffer::filled(100, 100, KEY_BLACK);
        let regions = [Region::new(0, 0, 0, 5), Region::new(80, 80, 40, 40), Region::new(0, 0, 40, 40)];
        assert_eq!(booth.composite_overlays(&mut frame, &regions), 1);
    }

    #[test]
    fn custom_drawing_is_resized_into_the_box() {
        let mut booth = Booth::new(false);
        let mut sink = MemorySink::default();
        press(&mut booth, Command::CreateOverlay, &mut sink);
        assert!(booth.mode.has_custom());

        let mut frame = FrameBuffer::filled(100, 100, KEY_WHITE);
        assert_eq!(booth.composite_overlays(&mut frame, &[Region::new(20, 20, 40, 30)]), 1);
        assert_eq!(frame.get(25, 25), 0);          // top-left quarter is ink
        assert_ne!(frame.get(55, 45), 0);          // bottom-right carries no ink
        assert_eq!(frame.get(5, 5), KEY_WHITE);    // outside the box
    }

    #[test]
    fn save_names_photo_and_shows_feedback() {
        let mut booth = Booth::new(false);
        let mut sink = MemorySink::default();
        assert_eq!(press(&mut booth, Command::SavePhoto, &mut sink), Flow::Continue);

        assert_eq!(sink.saved.len(), 1);
        assert_eq!(sink.saved[0].0, "photo_20250102_120000.png");
        assert_eq!(booth.feedback.tick(), Some("PHOTO SAVED: photo_20250102_120000.png"));
    }

    #[test]
    fn save_failure_keeps_running() {
        let mut booth = Booth::new(false);
        let mut sink = MemorySink { fail: true, ..Default::default() };
        assert_eq!(press(&mut booth, Command::SavePhoto, &mut sink), Flow::Continue);
        assert_eq!(booth.feedback.tick(), Some("SAVE FAILED"));
    }

    #[test]
    fn quit_stops_the_loop() {
        let mut booth = Booth::new(false);
        let mut sink = MemorySink::default();
        assert_eq!(press(&mut booth, Command::Quit, &mut sink), Flow::Quit);
    }

    #[test]
    fn hud_shows_feedback_for_fifty_frames() {
        let mut booth = Booth::new(false);
        booth.feedback.start("OK");
        for n in 1..=51 {
            let mut frame = FrameBuffer::filled(320, 240, 0x00_80_80_80);
            booth.draw_hud(&mut frame, 2, None);
            let shown = frame.pixels.iter().any(|&p| p == FEEDBACK_COLOR);
            assert_eq!(shown, n <= 50, "frame {n}");
        }
    }

    #[test]
    fn boxes_are_outlined_when_enabled() {
        let booth = Booth::new(true);
        let mut frame = FrameBuffer::filled(50, 50, 0);
        booth.composite_overlays(&mut frame, &[Region::new(10, 10, 20, 20)]);
        assert_eq!(frame.get(10, 10), BOX_COLOR);
        assert_eq!(frame.get(20, 20), 0);
    }

    #[test]
    fn outlining_a_huge_box_stays_in_frame() {
        let mut booth = Booth::new(true);
        booth.mode.toggle();
        let mut frame = FrameBuffer::filled(50, 50, 0);
        let regions = [Region::new(usize::MAX, 0, 5, 5), Region::new(40, 40, usize::MAX, usize::MAX)];
        assert_eq!(booth.composite_overlays(&mut frame, &regions), 0);
        assert_eq!(frame.get(40, 40), BOX_COLOR);
        assert_eq!(frame.get(10, 10), 0);
    }
}
