// Surface wrapper: owns the raster and the paint state both engines act on.

use crate::draw;
use crate::error::Error;
use crate::eraser::StrokeSession;
use crate::types::{ChromaRange, Paint, Raster};
use image::RgbaImage;
use log::debug;
use std::path::Path;

/// Paint ticks per second used by a stroke when none is configured.
pub const DEFAULT_FRAME_RATE: u32 = 100;

/// One drawing area. Owns the RGBA raster, the current paint plus its save
/// stack, the calibrated chroma range (if any) and the state of the active
/// erase stroke (if any).
#[derive(Debug)]
pub struct Surface {
    raster: Raster,
    paint: Paint,
    saved_paints: Vec<Paint>,
    frame_rate: u32,
    pub(crate) chroma_range: Option<ChromaRange>,
    pub(crate) stroke: Option<StrokeSession>,
    last_frame_count: u32,
}

impl Surface {
    /// Fresh transparent surface with the default frame rate.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            raster: Raster::new(width, height),
            paint: Paint::default(),
            saved_paints: Vec::new(),
            frame_rate: DEFAULT_FRAME_RATE,
            chroma_range: None,
            stroke: None,
            last_frame_count: 0,
        }
    }

    /// Wrap an existing raster. The buffer length must match the stated
    /// dimensions, otherwise the argument is not a drawing-capable surface.
    pub fn with_raster(raster: Raster, frame_rate: u32) -> Result<Self, Error> {
        let need = raster.width * raster.height * 4;
        if raster.data.len() != need {
            return Err(Error::InvalidSurface(format!(
                "buffer holds {} bytes but {}x{} RGBA needs {}",
                raster.data.len(),
                raster.width,
                raster.height,
                need
            )));
        }
        if frame_rate == 0 {
            return Err(Error::InvalidSurface("frame rate must be at least 1".into()));
        }
        let mut surface = Self::new(0, 0);
        surface.raster = raster;
        surface.frame_rate = frame_rate;
        Ok(surface)
    }

    pub fn width(&self) -> usize {
        self.raster.width
    }

    pub fn height(&self) -> usize {
        self.raster.height
    }

    /// Paint ticks per second driven by a stroke.
    pub fn frame_rate(&self) -> u32 {
        self.frame_rate
    }

    pub fn set_frame_rate(&mut self, fps: u32) {
        self.frame_rate = fps.max(1);
    }

    /// Resize the raster. Contents are cleared, matching the platform
    /// semantics of resizing a drawing area; no pixels are preserved.
    pub fn set_size(&mut self, width: usize, height: usize) {
        self.raster = Raster::new(width, height);
    }

    /// Decode an image file and draw it at the origin. Failures surface as
    /// [`Error::ImageLoad`] rather than being dropped.
    pub fn load_image<P: AsRef<Path>>(&mut self, path: P) -> Result<(), Error> {
        let path = path.as_ref();
        let img = image::open(path)
            .map_err(|e| Error::ImageLoad(format!("{}: {e}", path.display())))?
            .to_rgba8();
        debug!("loaded {}x{} image from {}", img.width(), img.height(), path.display());
        self.draw_image(&img, 0, 0);
        Ok(())
    }

    /// Source-over blit of a decoded image at (x, y).
    pub fn draw_image(&mut self, img: &RgbaImage, x: i32, y: i32) {
        draw::blit_rgba(&mut self.raster, img, x, y);
    }

    /// Clear a rectangular region to transparent black, clipped to the surface.
    pub fn clear_rect(&mut self, x: i32, y: i32, w: usize, h: usize) {
        draw::clear_rect(&mut self.raster, x, y, w, h);
    }

    pub fn paint(&self) -> &Paint {
        &self.paint
    }

    pub fn paint_mut(&mut self) -> &mut Paint {
        &mut self.paint
    }

    /// Push the current paint onto the save stack.
    pub fn save_paint(&mut self) {
        self.saved_paints.push(self.paint);
    }

    /// Pop the most recently saved paint. An unbalanced restore keeps the
    /// current paint, like an unmatched context restore.
    pub fn restore_paint(&mut self) {
        if let Some(p) = self.saved_paints.pop() {
            self.paint = p;
        }
    }

    pub fn raster(&self) -> &Raster {
        &self.raster
    }

    pub fn raster_mut(&mut self) -> &mut Raster {
        &mut self.raster
    }

    /// Frame count published by the most recently finished stroke.
    pub fn last_frame_count(&self) -> u32 {
        self.last_frame_count
    }

    pub(crate) fn publish_frame_count(&mut self, frames: u32) {
        self.last_frame_count = frames;
    }
}
