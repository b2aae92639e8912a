// A small error type, one variant per failure site.
use std::fmt::{self, Display};

#[derive(Debug)]
pub enum Error {
    InvalidSurface(String),   // argument does not describe a usable surface
    ImageLoad(String),        // reading or decoding an image file failed
    ChromaRangeNotCalibrated, // apply requested before calibrate
    InvalidRadius(f32),       // stroke begun with a non-positive brush radius
    StrokeInProgress,         // begin while another stroke is active
    StrokeNotActive,          // move/tick/end with no active stroke
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidSurface(s) => write!(f, "invalid surface: {s}"),
            Error::ImageLoad(s) => write!(f, "image load error: {s}"),
            Error::ChromaRangeNotCalibrated => {
                write!(f, "chroma key applied before calibration")
            }
            Error::InvalidRadius(r) => write!(f, "brush radius must be positive, got {r}"),
            Error::StrokeInProgress => write!(f, "an erase stroke is already active"),
            Error::StrokeNotActive => write!(f, "no erase stroke is active"),
        }
    }
}

impl std::error::Error for Error {}
