// What you SEE:
// • Live camera (mirrored) is always the base image.
// • T toggles sunglasses on every detected face box.
// • C opens a sketch pad; whatever you draw becomes the overlay instead.
// • S / Space saves a photo (with overlays) to ./photos; a green note confirms.
// • Q / Esc quits. RUST_LOG=debug for FPS and skipped boxes.

mod args;
mod booth;
mod camera;
mod compositor;
mod detector;
mod draw;
mod error;
mod feedback;
mod glasses;
mod mode;
mod photo;
mod sketch;
mod types;

use std::time::{Duration, Instant};

use args::{Args, DetectorKind};
use booth::{Booth, Flow};
use camera::CameraCapture;
use chrono::Local;
use clap::Parser;
use detector::{Detector, FixedDetector, MotionConfig, MotionDetector};
use draw::Drawer;
use error::Error;
use log::{debug, error, info};
use photo::DiskPhotoSink;
use sketch::AuthoringSession;

fn main() -> Result<(), Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    run(args).inspect_err(|e| error!("{e}"))
}

fn build_detector(args: &Args) -> Result<Box<dyn Detector>, Error> {
    Ok(match args.detector {
        DetectorKind::Motion => Box::new(MotionDetector::new(MotionConfig::default())?),
        DetectorKind::Fixed => Box::new(FixedDetector::new(args.regions.iter().map(|r| r.0).collect())?),
    })
}

fn run(args: Args) -> Result<(), Error> {
    /* --- Camera, detector, window ---
       Any of these failing ends things before the first frame. */
    let mut cam = CameraCapture::new(args.camera, args.width, args.height, !args.no_mirror)?;
    let mut detector = build_detector(&args)?;
    let (w, h) = cam.resolution();
    let mut drawer = Drawer::new("Face Photo Booth", w as usize, h as usize)?;
    let mut sink = DiskPhotoSink::new(&args.output);
    let mut booth = Booth::new(args.boxes);
    info!("Face Photo Booth started, photos go to {}", args.output.display());

    let mut last_fps_time = Instant::now();
    let mut frames_this_second: u32 = 0;

    /* ------------------------------ Main loop ------------------------------ */
    while drawer.is_open() {
        /* 1) Fresh frame. A failed grab ends the session (no retry). */
        let mut screen = match cam.next_frame() {
            Ok(frame) => frame,
            Err(e) => {
                error!("{e}");
                break;
            }
        };

        /* 2) Boxes, then overlays on them. */
        let regions = detector.detect(&screen);
        booth.composite_overlays(&mut screen, &regions);

        /* 3) One key per frame. A photo captures the overlays but not the HUD.
              C blocks here until the sketch pad closes. */
        if let Some(cmd) = drawer.poll_command() {
            if booth.handle(cmd, &screen, &mut AuthoringSession, &mut sink, Local::now()) == Flow::Quit {
                break;
            }
        }

        /* 4) HUD + "saved" note, then show it. */
        booth.draw_hud(&mut screen, regions.len(), detector.status());
        drawer.present(&screen)?;

        /* 5) FPS, once per second. */
        frames_this_second += 1;
        let now = Instant::now();
        if now.duration_since(last_fps_time) >= Duration::from_secs(1) {
            let fps = frames_this_second as f32 / now.duration_since(last_fps_time).as_secs_f32();
            debug!("FPS: {fps:.1}");
            frames_this_second = 0;
            last_fps_time = now;
        }
    }

    info!("Bye");
    Ok(())
}
