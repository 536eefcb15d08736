// Which overlay (if any) goes on the faces this frame.
//
// Two pieces of state: is the overlay visible, and which one is selected
// (procedural glasses or the hand-drawn one). The hand-drawn buffer lives
// here too, so "custom" can only be selected once one has been drawn.

use std::borrow::Cow;

use crate::error::Error;
use crate::glasses;
use crate::types::OverlayBuffer;

/// What the render step should put on each face.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OverlayMode {
    Off,
    Procedural,
    Custom,
}

impl OverlayMode {
    /// HUD label.
    pub fn label(self) -> &'static str {
        match self {
            OverlayMode::Off => "OFF",
            OverlayMode::Procedural => "GLASSES",
            OverlayMode::Custom => "CUSTOM",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Selection {
    Procedural,
    Custom,
}

/// Anything that can produce a freshly drawn overlay.
/// `Ok(None)` means the user cancelled.
pub trait OverlayAuthor {
    fn author(&mut self) -> Result<Option<OverlayBuffer>, Error>;
}

#[derive(Debug)]
pub struct ModeController {
    visible: bool,
    selection: Selection,
    custom: Option<OverlayBuffer>, // replaced wholesale on every committed sketch
}

impl Default for ModeController {
    fn default() -> Self {
        Self { visible: false, selection: Selection::Procedural, custom: None }
    }
}

impl ModeController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_custom(&self) -> bool {
        self.custom.is_some()
    }

    /// Show/hide the overlay.
    ///
    /// Hiding a visible custom overlay also drops the selection back to the
    /// procedural glasses, so the next toggle shows glasses, not the drawing.
    /// The drawing itself is kept; only a new sketch reselects it.
    pub fn toggle(&mut self) {
        if self.visible && self.selection == Selection::Custom && self.has_custom() {
            self.selection = Selection::Procedural;
        }
        self.visible = !self.visible;
    }

    /// Run a sketch session. On commit the drawing becomes the visible overlay.
    /// Returns whether a new overlay was stored. On cancel or error nothing changes.
    pub fn create(&mut self, author: &mut dyn OverlayAuthor) -> Result<bool, Error> {
        match author.author()? {
            Some(buffer) => {
                self.custom = Some(buffer);
                self.selection = Selection::Custom;
                self.visible = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn active_overlay(&self) -> OverlayMode {
        match (self.visible, self.selection) {
            (false, _) => OverlayMode::Off,
            (true, Selection::Procedural) => OverlayMode::Procedural,
            (true, Selection::Custom) if self.has_custom() => OverlayMode::Custom,
            (true, Selection::Custom) => OverlayMode::Procedural,
        }
    }

    /// The buffer to stamp on a `w x h` face box, or None when overlays are off.
    /// Glasses are regenerated at the exact size every call; the drawing is
    /// borrowed and left for the compositor to resize.
    pub fn overlay_for(&self, w: usize, h: usize) -> Option<Cow<'_, OverlayBuffer>> {
        match self.active_overlay() {
            OverlayMode::Off => None,
            OverlayMode::Procedural => Some(Cow::Owned(glasses::generate(w, h))),
            OverlayMode::Custom => self.custom.as_ref().map(Cow::Borrowed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::KEY_WHITE;

    /// Hands back a scripted result instead of opening a window.
    struct Scripted(Option<Result<Option<OverlayBuffer>, Error>>);

    impl OverlayAuthor for Scripted {
        fn author(&mut self) -> Result<Option<OverlayBuffer>, Error> {
            self.0.take().unwrap_or(Ok(None))
        }
    }

    fn drawing() -> OverlayBuffer {
        let mut ov = OverlayBuffer::blank(400, 300, KEY_WHITE);
        ov.image.set(10, 10, 0);
        ov
    }

    #[test]
    fn starts_off_without_custom() {
        let mc = ModeController::new();
        assert_eq!(mc.active_overlay(), OverlayMode::Off);
        assert!(!mc.has_custom());
        assert!(mc.overlay_for(10, 10).is_none());
    }

    #[test]
    fn toggle_cycles_procedural_and_off() {
        let mut mc = ModeController::new();
        mc.toggle();
        assert_eq!(mc.active_overlay(), OverlayMode::Procedural);
        mc.toggle();
        assert_eq!(mc.active_overlay(), OverlayMode::Off);
        mc.toggle();
        assert_eq!(mc.active_overlay(), OverlayMode::Procedural);
    }

    #[test]
    fn committed_sketch_becomes_visible_custom() {
        let mut mc = ModeController::new();
        let stored = mc.create(&mut Scripted(Some(Ok(Some(drawing()))))).unwrap();
        assert!(stored);
        assert!(mc.has_custom());
        assert_eq!(mc.active_overlay(), OverlayMode::Custom);
        let ov = mc.overlay_for(50, 50).unwrap();
        assert!(matches!(ov, Cow::Borrowed(_)));
        assert_eq!(ov.width(), 400);
    }

    #[test]
    fn hiding_custom_demotes_next_toggle_to_procedural() {
        let mut mc = ModeController::new();
        mc.create(&mut Scripted(Some(Ok(Some(drawing()))))).unwrap();
        mc.toggle();
        assert_eq!(mc.active_overlay(), OverlayMode::Off);
        mc.toggle();
        assert_eq!(mc.active_overlay(), OverlayMode::Procedural);
        assert!(mc.has_custom());
    }

    #[test]
    fn cancelled_sketch_changes_nothing() {
        let mut mc = ModeController::new();
        mc.toggle();
        let stored = mc.create(&mut Scripted(Some(Ok(None)))).unwrap();
        assert!(!stored);
        assert_eq!(mc.active_overlay(), OverlayMode::Procedural);
        assert!(!mc.has_custom());
    }

    #[test]
    fn failed_sketch_window_changes_nothing() {
        let mut mc = ModeController::new();
        let err = Error::WindowInit("no display".into());
        assert!(mc.create(&mut Scripted(Some(Err(err)))).is_err());
        assert_eq!(mc.active_overlay(), OverlayMode::Off);
        assert!(!mc.has_custom());
    }

    #[test]
    fn new_sketch_replaces_old_and_reselects_custom() {
        let mut mc = ModeController::new();
        mc.create(&mut Scripted(Some(Ok(Some(drawing()))))).unwrap();
        mc.toggle();
        mc.toggle();
        assert_eq!(mc.active_overlay(), OverlayMode::Procedural);

        let mut second = OverlayBuffer::blank(400, 300, KEY_WHITE);
        second.image.set(0, 0, 0x00_11_22_33);
        mc.create(&mut Scripted(Some(Ok(Some(second.clone()))))).unwrap();
        assert_eq!(mc.active_overlay(), OverlayMode::Custom);
        assert_eq!(mc.overlay_for(1, 1).as_deref(), Some(&second));
    }

    #[test]
    fn procedural_overlay_matches_region_size() {
        let mut mc = ModeController::new();
        mc.toggle();
        let ov = mc.overlay_for(80, 60).unwrap();
        assert_eq!((ov.width(), ov.height()), (80, 60));
        assert_eq!(*ov, glasses::generate(80, 60));
    }
}
