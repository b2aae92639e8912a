// Eraser stroke engine.
//
// A stroke is an explicit Idle -> Active -> Idle state machine on the
// Surface. While active, the paint is switched to erase compositing and each
// tick stamps the capsule bridging the previous brush position and the
// current one, so fast motion between ticks leaves no gaps. Move events only
// update the target position (last event wins); painting happens on ticks.

use crate::draw;
use crate::error::Error;
use crate::surface::Surface;
use crate::types::{Composite, TouchEvent};
use log::{debug, trace};
use std::thread;
use std::time::{Duration, Instant};

/// State of one active erase gesture.
#[derive(Clone, Copy, Debug)]
pub(crate) struct StrokeSession {
    x: f32,
    y: f32,
    last_x: f32,
    last_y: f32,
    radius: f32,
    frames: u32,
}

impl Surface {
    /// Start an erase stroke: save the paint, switch to erase compositing
    /// with a line width of `2 * radius`, and clear the initial brush circle
    /// at (x, y). Exactly one stroke may be active per surface; a second
    /// begin is rejected with [`Error::StrokeInProgress`].
    pub fn begin_stroke(&mut self, x: f32, y: f32, radius: f32) -> Result<(), Error> {
        if !(radius > 0.0) {
            return Err(Error::InvalidRadius(radius));
        }
        if self.stroke.is_some() {
            return Err(Error::StrokeInProgress);
        }
        self.save_paint();
        self.paint_mut().composite = Composite::Erase;
        self.paint_mut().line_width = 2.0 * radius;
        let paint = *self.paint();
        draw::fill_circle(self.raster_mut(), &paint, x, y, radius);
        self.stroke = Some(StrokeSession {
            x,
            y,
            last_x: x,
            last_y: y,
            radius,
            frames: 0,
        });
        Ok(())
    }

    /// Record the latest contact position. Intermediate positions between
    /// ticks are not queued; the next tick interpolates a straight bridge
    /// from wherever the last tick left off.
    pub fn stroke_move(&mut self, x: f32, y: f32) -> Result<(), Error> {
        let s = self.stroke.as_mut().ok_or(Error::StrokeNotActive)?;
        s.x = x;
        s.y = y;
        Ok(())
    }

    /// One paint tick: clear the 2r-wide band from the previous position to
    /// the current one plus the brush circle at the current position, then
    /// advance the previous position and the frame counter. Runs whether or
    /// not the position changed since the last tick.
    pub fn stroke_tick(&mut self) -> Result<(), Error> {
        let mut s = self.stroke.ok_or(Error::StrokeNotActive)?;
        let paint = *self.paint();
        draw::stroke_segment(self.raster_mut(), &paint, s.last_x, s.last_y, s.x, s.y);
        draw::fill_circle(self.raster_mut(), &paint, s.x, s.y, s.radius);
        s.last_x = s.x;
        s.last_y = s.y;
        s.frames += 1;
        trace!("stroke tick {} at ({}, {})", s.frames, s.x, s.y);
        self.stroke = Some(s);
        Ok(())
    }

    /// Finish the stroke: bridge any movement since the last tick, restore
    /// the saved paint, publish the frame counter on the surface and return
    /// it. The surface is Idle again afterwards.
    pub fn end_stroke(&mut self) -> Result<u32, Error> {
        let s = self.stroke.take().ok_or(Error::StrokeNotActive)?;
        let paint = *self.paint();
        draw::stroke_segment(self.raster_mut(), &paint, s.last_x, s.last_y, s.x, s.y);
        self.restore_paint();
        self.publish_frame_count(s.frames);
        debug!("stroke ended after {} frames", s.frames);
        Ok(s.frames)
    }

    /// True while an erase stroke is active on this surface.
    pub fn stroke_active(&self) -> bool {
        self.stroke.is_some()
    }
}

/// Source of touch/pointer events feeding a stroke. `poll` returns the next
/// pending event, or None once the queue is drained for now.
pub trait InputSource {
    fn poll(&mut self) -> Option<TouchEvent>;
}

impl InputSource for std::collections::VecDeque<TouchEvent> {
    fn poll(&mut self) -> Option<TouchEvent> {
        self.pop_front()
    }
}

/// Drive a whole stroke from an event stream: begin at (x, y), then
/// alternate between draining pending events (moves update the brush target,
/// `End` finishes the stroke) and ticking at the surface frame rate. Blocks
/// the calling thread between ticks and does not return until the source
/// reports `End`. Returns the painted frame count.
pub fn run_stroke<I: InputSource>(
    surface: &mut Surface,
    input: &mut I,
    x: f32,
    y: f32,
    radius: f32,
) -> Result<u32, Error> {
    surface.begin_stroke(x, y, radius)?;
    let tick = Duration::from_secs_f64(1.0 / f64::from(surface.frame_rate()));
    let mut next_tick = Instant::now() + tick;
    loop {
        while let Some(ev) = input.poll() {
            match ev {
                TouchEvent::Move(nx, ny) => surface.stroke_move(nx, ny)?,
                TouchEvent::End => return surface.end_stroke(),
            }
        }
        let now = Instant::now();
        if now < next_tick {
            thread::sleep(next_tick - now);
        }
        surface.stroke_tick()?;
        next_tick += tick;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opaque_surface(width: usize, height: usize) -> Surface {
        let mut surface = Surface::new(width, height);
        surface.raster_mut().data.fill(255);
        surface
    }

    fn dist_to_segment(x: f32, y: f32, x0: f32, y0: f32, x1: f32, y1: f32) -> f32 {
        let dx = x1 - x0;
        let dy = y1 - y0;
        let len2 = dx * dx + dy * dy;
        let t = if len2 <= f32::EPSILON {
            0.0
        } else {
            (((x - x0) * dx + (y - y0) * dy) / len2).clamp(0.0, 1.0)
        };
        let ex = x - x0 - t * dx;
        let ey = y - y0 - t * dy;
        (ex * ex + ey * ey).sqrt()
    }

    #[test]
    fn begin_rejects_a_non_positive_radius() {
        let mut surface = Surface::new(8, 8);
        assert!(matches!(
            surface.begin_stroke(1.0, 1.0, 0.0),
            Err(Error::InvalidRadius(_))
        ));
        assert!(matches!(
            surface.begin_stroke(1.0, 1.0, -2.0),
            Err(Error::InvalidRadius(_))
        ));
        assert!(!surface.stroke_active());
    }

    #[test]
    fn begin_rejects_a_second_stroke() {
        let mut surface = Surface::new(8, 8);
        surface.begin_stroke(2.0, 2.0, 1.0).unwrap();
        assert!(matches!(
            surface.begin_stroke(5.0, 5.0, 1.0),
            Err(Error::StrokeInProgress)
        ));
        // The first stroke is still the active one.
        assert!(surface.stroke_active());
        surface.end_stroke().unwrap();
        surface.begin_stroke(5.0, 5.0, 1.0).unwrap();
    }

    #[test]
    fn move_tick_and_end_require_an_active_stroke() {
        let mut surface = Surface::new(8, 8);
        assert!(matches!(surface.stroke_move(1.0, 1.0), Err(Error::StrokeNotActive)));
        assert!(matches!(surface.stroke_tick(), Err(Error::StrokeNotActive)));
        assert!(matches!(surface.end_stroke(), Err(Error::StrokeNotActive)));
    }

    #[test]
    fn one_tick_clears_the_interpolated_capsule() {
        // Stroke from (0,0) to (10,0) with radius 2, one tick: the cleared
        // region is the union of both end circles and the connecting band.
        let mut surface = opaque_surface(16, 8);
        surface.begin_stroke(0.0, 0.0, 2.0).unwrap();
        surface.stroke_move(10.0, 0.0).unwrap();
        surface.stroke_tick().unwrap();
        let frames = surface.end_stroke().unwrap();
        assert_eq!(frames, 1);
        assert_eq!(surface.last_frame_count(), 1);

        for y in 0..8 {
            for x in 0..16 {
                let inside = dist_to_segment(x as f32, y as f32, 0.0, 0.0, 10.0, 0.0) <= 2.0;
                let px = surface.raster().pixel(x, y).unwrap();
                if inside {
                    assert_eq!(px, [0, 0, 0, 0], "pixel ({x},{y}) should be cleared");
                } else {
                    assert_eq!(px, [255; 4], "pixel ({x},{y}) should be untouched");
                }
            }
        }
    }

    #[test]
    fn begin_clears_the_initial_circle_before_any_tick() {
        let mut surface = opaque_surface(8, 8);
        surface.begin_stroke(4.0, 4.0, 2.0).unwrap();
        assert_eq!(surface.raster().pixel(4, 4).unwrap(), [0, 0, 0, 0]);
        assert_eq!(surface.raster().pixel(0, 0).unwrap(), [255; 4]);
    }

    #[test]
    fn end_bridges_movement_since_the_last_tick() {
        let mut surface = opaque_surface(16, 8);
        surface.begin_stroke(2.0, 4.0, 2.0).unwrap();
        surface.stroke_move(12.0, 4.0).unwrap();
        // No tick: the end fill still connects the two positions.
        let frames = surface.end_stroke().unwrap();
        assert_eq!(frames, 0);
        assert_eq!(surface.raster().pixel(7, 4).unwrap(), [0, 0, 0, 0]);
        assert_eq!(surface.raster().pixel(12, 4).unwrap(), [0, 0, 0, 0]);
    }

    #[test]
    fn end_restores_the_saved_paint() {
        let mut surface = Surface::new(8, 8);
        surface.paint_mut().line_width = 3.0;
        surface.begin_stroke(1.0, 1.0, 2.0).unwrap();
        assert_eq!(surface.paint().composite, Composite::Erase);
        assert_eq!(surface.paint().line_width, 4.0);
        surface.end_stroke().unwrap();
        assert_eq!(surface.paint().composite, Composite::SourceOver);
        assert_eq!(surface.paint().line_width, 3.0);
    }

    #[test]
    fn ticks_run_even_when_the_position_is_unchanged() {
        let mut surface = opaque_surface(8, 8);
        surface.begin_stroke(4.0, 4.0, 1.0).unwrap();
        surface.stroke_tick().unwrap();
        surface.stroke_tick().unwrap();
        surface.stroke_tick().unwrap();
        assert_eq!(surface.end_stroke().unwrap(), 3);
    }

    /// Input source that replays a fixed script; `None` entries model a
    /// drained queue between ticks.
    struct Scripted {
        steps: Vec<Option<TouchEvent>>,
        at: usize,
    }

    impl InputSource for Scripted {
        fn poll(&mut self) -> Option<TouchEvent> {
            let ev = self.steps.get(self.at).copied().flatten();
            self.at += 1;
            ev
        }
    }

    #[test]
    fn run_stroke_ends_immediately_on_end() {
        let mut surface = opaque_surface(8, 8);
        let mut input = std::collections::VecDeque::from([TouchEvent::End]);
        let frames = run_stroke(&mut surface, &mut input, 2.0, 2.0, 1.0).unwrap();
        assert_eq!(frames, 0);
        assert!(!surface.stroke_active());
        // The initial circle was still cleared.
        assert_eq!(surface.raster().pixel(2, 2).unwrap(), [0, 0, 0, 0]);
    }

    #[test]
    fn run_stroke_ticks_between_events() {
        let mut surface = opaque_surface(16, 8);
        surface.set_frame_rate(1000);
        let mut input = Scripted {
            steps: vec![
                Some(TouchEvent::Move(10.0, 2.0)),
                None, // queue drained: one tick fires here
                Some(TouchEvent::End),
            ],
            at: 0,
        };
        let frames = run_stroke(&mut surface, &mut input, 2.0, 2.0, 2.0).unwrap();
        assert_eq!(frames, 1);
        assert_eq!(surface.last_frame_count(), 1);
        assert_eq!(surface.raster().pixel(10, 2).unwrap(), [0, 0, 0, 0]);
    }
}
