// Chroma-key engine: calibrate a color range from a reference image, then
// punch transparency into whatever the surface currently shows.

use crate::error::Error;
use crate::surface::Surface;
use crate::types::{ChromaRange, Raster};
use log::debug;
use std::path::Path;

impl ChromaRange {
    /// Reduce a raster to the per-channel [min, max] over R, G and B,
    /// visiting every pixel exactly once. Alpha is ignored and scan order
    /// does not matter. Returns None for a raster with no pixels, which has
    /// no well-formed range.
    pub fn scan(raster: &Raster) -> Option<ChromaRange> {
        if raster.width == 0 || raster.height == 0 {
            return None;
        }
        let mut low = [255u8; 3];
        let mut high = [0u8; 3];
        for px in raster.data.chunks_exact(4) {
            for c in 0..3 {
                if px[c] < low[c] {
                    low[c] = px[c];
                }
                if px[c] > high[c] {
                    high[c] = px[c];
                }
            }
        }
        Some(ChromaRange { low, high })
    }
}

impl Surface {
    /// Load the reference image, derive the chroma range from its pixels and
    /// store it on the surface (replacing any earlier range), then clear the
    /// displayed calibration frame.
    pub fn calibrate_chroma_key<P: AsRef<Path>>(&mut self, source: P) -> Result<(), Error> {
        self.load_image(source)?;
        let range = ChromaRange::scan(self.raster()).ok_or_else(|| {
            Error::InvalidSurface("cannot calibrate from a zero-pixel surface".into())
        })?;
        debug!("calibrated chroma range low={:?} high={:?}", range.low, range.high);
        self.chroma_range = Some(range);
        // Resizing to the current dimensions blanks the buffer, clearing the
        // calibration frame from the surface.
        let (w, h) = (self.width(), self.height());
        self.set_size(w, h);
        Ok(())
    }

    /// Clear every pixel whose three color channels all fall inside the
    /// calibrated range, writing transparent black straight into the buffer
    /// in a single pass. Fails before touching any pixel when no range has
    /// been calibrated. Returns the number of pixels cleared.
    pub fn apply_chroma_key(&mut self) -> Result<usize, Error> {
        let range = self.chroma_range.ok_or(Error::ChromaRangeNotCalibrated)?;
        let mut cleared = 0usize;
        for px in self.raster_mut().data.chunks_exact_mut(4) {
            if range.contains([px[0], px[1], px[2]]) {
                px.fill(0);
                cleared += 1;
            }
        }
        debug!("chroma key cleared {cleared} pixels");
        Ok(cleared)
    }

    /// Calibrated range currently stored on the surface, if any.
    pub fn chroma_range(&self) -> Option<ChromaRange> {
        self.chroma_range
    }
}
