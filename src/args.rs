// Launcher flags. Only main.rs reads these; the booth itself takes plain values.

use std::path::PathBuf;
use std::str::FromStr;

use clap::{Parser, ValueEnum};

use crate::types::Region;

#[derive(Parser, Debug)]
#[command(version, about = "Webcam photo booth: sunglasses (or your own doodle) on every face")]
pub struct Args {
    /// Camera index (0 = default webcam)
    #[arg(long, default_value_t = 0)]
    pub camera: u32,

    /// Requested capture width (the camera may pick the closest it supports)
    #[arg(long, default_value_t = 640)]
    pub width: u32,

    /// Requested capture height
    #[arg(long, default_value_t = 480)]
    pub height: u32,

    /// Directory photos are saved into
    #[arg(short, long, default_value = "photos")]
    pub output: PathBuf,

    /// How overlay boxes are found
    #[arg(long, value_enum, default_value_t = DetectorKind::Motion)]
    pub detector: DetectorKind,

    /// Box for the fixed detector as x,y,w,h (repeatable)
    #[arg(long = "region", value_name = "X,Y,W,H")]
    pub regions: Vec<RegionArg>,

    /// Show the camera as-is instead of mirrored
    #[arg(long)]
    pub no_mirror: bool,

    /// Outline every detected box
    #[arg(long)]
    pub boxes: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum DetectorKind {
    /// Learn the empty scene, then box whatever moves in front of it
    Motion,
    /// Use the boxes given with --region
    Fixed,
}

/// `x,y,w,h` from the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RegionArg(pub Region);

impl FromStr for RegionArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = s
            .split(',')
            .map(|p| p.trim().parse::<usize>().map_err(|e| format!("bad number '{p}': {e}")))
            .collect::<Result<Vec<_>, _>>()?;
        match parts[..] {
            [x, y, w, h] if w > 0 && h > 0 => Ok(RegionArg(Region::new(x, y, w, h))),
            [_, _, _, _] => Err("width and height must be positive".to_string()),
            _ => Err(format!("expected x,y,w,h, got '{s}'")),
        }
    }
}
