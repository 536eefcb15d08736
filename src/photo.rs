// Where captured photos go.
// The booth only decides *when* and *what name*; a sink does the writing.

use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Local};

use crate::error::Error;
use crate::types::FrameBuffer;

pub const PHOTO_EXT: &str = "png";

pub trait PhotoSink {
    fn save(&mut self, frame: &FrameBuffer, name: &str) -> Result<(), Error>;
}

/// `photo_YYYYMMDD_HHMMSS.png` for the given moment.
pub fn photo_name(at: DateTime<Local>) -> String {
    format!("photo_{}.{PHOTO_EXT}", at.format("%Y%m%d_%H%M%S"))
}

/// Writes PNGs into a directory (created on first save).
pub struct DiskPhotoSink {
    dir: PathBuf,
}

impl DiskPhotoSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl PhotoSink for DiskPhotoSink {
    fn save(&mut self, frame: &FrameBuffer, name: &str) -> Result<(), Error> {
        let fail = |reason: String| Error::PhotoSave { name: name.to_string(), reason };
        fs::create_dir_all(&self.dir).map_err(|e| fail(e.to_string()))?;
        frame
            .to_rgb_image()
            .save(self.dir.join(name))
            .map_err(|e| fail(e.to_string()))
    }
}
