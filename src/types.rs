// Core types shared by the surface wrapper and both engines.

/// In-memory raster surface data: RGBA, 4 bytes per pixel, row-major.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Raster {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>, // length = width * height * 4
}

impl Raster {
    /// Fresh fully transparent raster (every byte zero).
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0u8; width * height * 4],
        }
    }

    /// Byte offset of pixel (x, y), or None when out of bounds.
    #[inline]
    pub fn offset(&self, x: usize, y: usize) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some((y * self.width + x) * 4)
    }

    /// RGBA bytes of pixel (x, y), or None when out of bounds.
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        let i = self.offset(x, y)?;
        Some([self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]])
    }
}

/// Calibrated color range: per-channel [low, high] over R, G, B.
/// Invariant: `low[c] <= high[c]` for every channel.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ChromaRange {
    pub low: [u8; 3],
    pub high: [u8; 3],
}

impl ChromaRange {
    /// True when all three color channels sit inside the inclusive range.
    #[inline]
    pub fn contains(&self, rgb: [u8; 3]) -> bool {
        rgb[0] >= self.low[0]
            && rgb[0] <= self.high[0]
            && rgb[1] >= self.low[1]
            && rgb[1] <= self.high[1]
            && rgb[2] >= self.low[2]
            && rgb[2] <= self.high[2]
    }
}

/// Compositing mode applied by drawing operations.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Composite {
    /// Standard source-over alpha blending.
    SourceOver,
    /// Destination-out: painted shapes remove (clear) destination pixels.
    Erase,
}

/// Paint state carried by the surface; saved/restored around erase strokes.
#[derive(Clone, Copy, Debug)]
pub struct Paint {
    pub composite: Composite,
    pub color: [u8; 4],
    pub line_width: f32,
}

impl Default for Paint {
    fn default() -> Self {
        Self {
            composite: Composite::SourceOver,
            color: [0, 0, 0, 255],
            line_width: 1.0,
        }
    }
}

/// One sample from the input-event stream feeding an erase stroke.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum TouchEvent {
    /// The contact point moved to this position.
    Move(f32, f32),
    /// The contact lifted; the stroke ends.
    End,
}
