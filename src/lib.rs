//! Touch-driven erasing and chroma keying over an in-memory RGBA surface.
//!
//! Two pipelines share one [`Surface`]:
//!
//! - the **eraser stroke engine** clears a moving circular brush region,
//!   bridging successive brush positions on every paint tick so fast strokes
//!   leave no gaps;
//! - the **chroma-key engine** calibrates a per-channel color range from a
//!   reference image, then clears every pixel of the current contents whose
//!   three color channels all fall inside that range.
//!
//! Erasing is an explicit begin/move/tick/end state machine, driven either by
//! the host's own frame loop or by [`run_stroke`] over an [`InputSource`]:
//!
//! ```
//! use chroma_eraser::Surface;
//!
//! # fn main() -> Result<(), chroma_eraser::Error> {
//! let mut surface = Surface::new(64, 64);
//! surface.begin_stroke(4.0, 4.0, 8.0)?;
//! surface.stroke_move(40.0, 20.0)?;
//! surface.stroke_tick()?;
//! let frames = surface.end_stroke()?;
//! assert_eq!(frames, 1);
//! # Ok(()) }
//! ```
//!
//! The chroma-key pass is calibrate-then-apply:
//!
//! ```no_run
//! use chroma_eraser::Surface;
//!
//! # fn main() -> Result<(), chroma_eraser::Error> {
//! let mut surface = Surface::new(640, 480);
//! surface.calibrate_chroma_key("reference.png")?;
//! surface.load_image("scene.png")?;
//! let cleared = surface.apply_chroma_key()?;
//! # Ok(()) }
//! ```

mod chroma;
mod draw;
mod error;
mod eraser;
mod surface;
mod types;

pub use error::Error;
pub use eraser::{run_stroke, InputSource};
pub use surface::{Surface, DEFAULT_FRAME_RATE};
pub use types::{ChromaRange, Composite, Paint, Raster, TouchEvent};
