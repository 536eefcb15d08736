// Sketch pad for drawing your own overlay.
// Visual: a separate 400x300 white window. Hold the left mouse button and
// drag to draw black lines. Enter (or S) keeps the drawing, Esc (or Q, or
// closing the window) throws it away, C wipes the page.
//
// While it is open the booth is paused: this window owns the screen and input
// until you finish, then it closes and the camera feed carries on.

use log::{debug, info};
use minifb::Key;

use crate::draw::{draw_crosshair, draw_line, Drawer};
use crate::error::Error;
use crate::mode::OverlayAuthor;
use crate::types::{FrameBuffer, OverlayBuffer, KEY_WHITE};

pub const CANVAS_WIDTH: usize = 400;
pub const CANVAS_HEIGHT: usize = 300;
pub const INK_COLOR: u32 = 0x00_00_00_00; // black
pub const INK_WIDTH: i32 = 2;

/// Pointer input, already in canvas pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerEvent {
    Press { x: i32, y: i32 },
    Move { x: i32, y: i32 },
    Release,
}

/// The drawing itself, independent of any window.
/// `anchor` is where the current stroke last ended; None between strokes.
pub struct SketchPad {
    page: OverlayBuffer,
    anchor: Option<(i32, i32)>,
}

impl Default for SketchPad {
    fn default() -> Self {
        Self::new()
    }
}

impl SketchPad {
    pub fn new() -> Self {
        Self { page: OverlayBuffer::blank(CANVAS_WIDTH, CANVAS_HEIGHT, KEY_WHITE), anchor: None }
    }

    /// Press starts a stroke, Move extends it with a short segment, Release ends it.
    /// Moves with the button up are ignored.
    pub fn handle(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Press { x, y } => self.anchor = Some((x, y)),
            PointerEvent::Move { x, y } => {
                if let Some((ax, ay)) = self.anchor {
                    draw_line(&mut self.page.image, ax, ay, x, y, INK_COLOR, INK_WIDTH);
                    self.anchor = Some((x, y));
                }
            }
            PointerEvent::Release => self.anchor = None,
        }
    }

    pub fn is_drawing(&self) -> bool {
        self.anchor.is_some()
    }

    /// Back to a blank white page.
    pub fn clear(&mut self) {
        self.page.image.pixels.fill(self.page.key);
        self.anchor = None;
    }

    pub fn canvas(&self) -> &FrameBuffer {
        &self.page.image
    }

    /// Hand the page over as an overlay; white is see-through.
    pub fn into_overlay(self) -> OverlayBuffer {
        self.page
    }
}

/// Turns per-frame mouse polling (button held? where?) into press/move/release.
#[derive(Default)]
pub struct PointerTracker {
    was_down: bool,
    last: Option<(i32, i32)>,
}

impl PointerTracker {
    pub fn update(&mut self, down: bool, pos: Option<(i32, i32)>) -> Option<PointerEvent> {
        let event = match (self.was_down, down, pos) {
            (false, true, Some((x, y))) => Some(PointerEvent::Press { x, y }),
            (true, true, Some((x, y))) if self.last != Some((x, y)) => Some(PointerEvent::Move { x, y }),
            (true, false, _) => Some(PointerEvent::Release),
            _ => None,
        };
        // Only a press that actually landed counts as "down".
        self.was_down = down && (self.was_down || pos.is_some());
        if pos.is_some() {
            self.last = pos;
        }
        event
    }
}

/// Opens the sketch window when the booth asks for a new overlay.
pub struct AuthoringSession;

impl OverlayAuthor for AuthoringSession {
    /// Modal: blocks until the user keeps or discards the drawing.
    /// The window is dropped (closed) on every way out of here.
    fn author(&mut self) -> Result<Option<OverlayBuffer>, Error> {
        let mut window = Drawer::new("Draw overlay - Enter keep | Esc cancel | C clear", CANVAS_WIDTH, CANVAS_HEIGHT)?;
        let mut pad = SketchPad::new();
        let mut pointer = PointerTracker::default();
        let mut view = pad.canvas().clone();
        info!("Sketch pad open");

        loop {
            if !window.is_open() || window.pressed_once(Key::Escape) || window.pressed_once(Key::Q) {
                info!("Sketch discarded");
                return Ok(None);
            }
            if window.pressed_once(Key::Enter) || window.pressed_once(Key::S) {
                info!("Sketch kept as custom overlay");
                return Ok(Some(pad.into_overlay()));
            }
            if window.pressed_once(Key::C) {
                debug!("Sketch cleared");
                pad.clear();
            }

            let pos = window.mouse_pos();
            if let Some(event) = pointer.update(window.left_mouse_down(), pos) {
                pad.handle(event);
            }

            // Visual: the page, plus a crosshair where the pen is (red while inking).
            view.pixels.copy_from_slice(&pad.canvas().pixels);
            if let Some((mx, my)) = pos {
                let color = if pad.is_drawing() { 0x00_E0_30_30 } else { 0x00_90_90_90 };
                draw_crosshair(&mut view, mx, my, 6, color);
            }
            window.present(&view)?;
        }
    }
}
