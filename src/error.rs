// One error type for the whole booth.
// Every variant states *where* things went wrong.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Window init error: {0}")]
    WindowInit(String), // Creating a window failed (booth or sketch pad)
    #[error("Window update error: {0}")]
    WindowUpdate(String), // Pushing a buffer to a window failed
    #[error("Camera init error: {0}")]
    CameraInit(String), // Opening/starting the camera failed
    #[error("Camera frame error: {0}")]
    CameraFrame(String), // Grabbing/decoding a frame failed
    #[error("Detector init error: {0}")]
    DetectorInit(String), // Detector could not be configured

    // Geometry the compositor refuses to touch (the caller skips the region).
    #[error("Invalid region {w}x{h}: width and height must be positive")]
    InvalidRegion { w: usize, h: usize },
    #[error("Region ({x},{y},{w},{h}) exceeds frame {frame_w}x{frame_h}")]
    RegionOutOfBounds {
        x: usize,
        y: usize,
        w: usize,
        h: usize,
        frame_w: usize,
        frame_h: usize,
    },

    #[error("Photo save error ({name}): {reason}")]
    PhotoSave { name: String, reason: String },
}
