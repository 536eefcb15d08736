// Short-lived on-screen message after a capture ("PHOTO SAVED: ...").
// Visual: the text shows for FEEDBACK_TICKS frames, then disappears.

/// How many rendered frames a message stays up (~1.7 s at 30 FPS).
pub const FEEDBACK_TICKS: u32 = 50;

#[derive(Debug, Default)]
pub struct CaptureFeedback {
    message: String,
    remaining: u32,
}

impl CaptureFeedback {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show `message` from the next frame on. Replaces whatever was showing.
    pub fn start(&mut self, message: impl Into<String>) {
        self.message = message.into();
        self.remaining = FEEDBACK_TICKS;
    }

    /// Call once per rendered frame. Returns the text to draw this frame, if any.
    pub fn tick(&mut self) -> Option<&str> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        Some(&self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_timer_renders_nothing() {
        let mut fb = CaptureFeedback::new();
        assert_eq!(fb.tick(), None);
    }

    #[test]
    fn message_shows_for_fifty_frames() {
        let mut fb = CaptureFeedback::new();
        fb.start("X");
        for n in 1..=50 {
            assert_eq!(fb.tick(), Some("X"), "frame {n}");
        }
        assert_eq!(fb.tick(), None);
        assert_eq!(fb.tick(), None);
    }

    #[test]
    fn restart_overwrites_and_resets() {
        let mut fb = CaptureFeedback::new();
        fb.start("first");
        for _ in 0..40 {
            fb.tick();
        }
        fb.start("second");
        for _ in 0..FEEDBACK_TICKS {
            assert_eq!(fb.tick(), Some("second"));
        }
        assert_eq!(fb.tick(), None);
    }
}
