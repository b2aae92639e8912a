// Interactive demo:
// • The window shows an image over a checkerboard (so transparency is visible).
// • Hold Left Mouse: erase under the cursor with a round brush.
// • K calibrates the chroma range from the reference image; A applies it.
// • R reloads the image. ESC quits.

use chroma_eraser::{Raster, Surface};
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};
use std::time::{Duration, Instant};

const BRUSH_RADIUS: f32 = 16.0;

fn usage() -> ! {
    eprintln!("usage: chroma-eraser <image> [chroma-reference]");
    std::process::exit(2);
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let image_path = args.next().unwrap_or_else(|| usage());
    let chroma_ref = args.next();

    // Decode once up front; R reuses it to reset the surface.
    let source = image::open(&image_path)?.to_rgba8();
    let (w, h) = (source.width() as usize, source.height() as usize);

    let mut surface = Surface::new(w, h);
    surface.draw_image(&source, 0, 0);

    let mut window = Window::new("Chroma Eraser", w, h, WindowOptions::default())
        .map_err(|e| e.to_string())?;

    let mut screen = vec![0u32; w * h];
    let tick = Duration::from_secs_f64(1.0 / f64::from(surface.frame_rate()));
    let mut next_tick = Instant::now();

    while window.is_open() && !window.is_key_down(Key::Escape) {
        if window.is_key_pressed(Key::K, KeyRepeat::No) {
            match &chroma_ref {
                Some(path) => {
                    surface.calibrate_chroma_key(path)?;
                    // Calibration blanks the surface; put the working image back.
                    surface.draw_image(&source, 0, 0);
                    println!("calibrated: {:?}", surface.chroma_range().unwrap());
                }
                None => eprintln!("no chroma reference image given"),
            }
        }
        if window.is_key_pressed(Key::A, KeyRepeat::No) {
            match surface.apply_chroma_key() {
                Ok(n) => println!("chroma key cleared {n} pixels"),
                Err(e) => eprintln!("{e}"),
            }
        }
        if window.is_key_pressed(Key::R, KeyRepeat::No) {
            surface.set_size(w, h);
            surface.draw_image(&source, 0, 0);
        }

        // Mouse → stroke state machine. Moves only retarget the brush; the
        // fixed-rate ticks below do the painting.
        let pos = window.get_mouse_pos(MouseMode::Clamp);
        let down = window.get_mouse_down(MouseButton::Left);
        match (down, surface.stroke_active()) {
            (true, false) => {
                if let Some((mx, my)) = pos {
                    surface.begin_stroke(mx, my, BRUSH_RADIUS)?;
                    next_tick = Instant::now() + tick;
                }
            }
            (true, true) => {
                if let Some((mx, my)) = pos {
                    surface.stroke_move(mx, my)?;
                }
                while Instant::now() >= next_tick {
                    surface.stroke_tick()?;
                    next_tick += tick;
                }
            }
            (false, true) => {
                let frames = surface.end_stroke()?;
                println!("stroke painted {frames} frames");
            }
            (false, false) => {}
        }

        compose(&mut screen, surface.raster());
        window
            .update_with_buffer(&screen, w, h)
            .map_err(|e| e.to_string())?;
    }

    Ok(())
}

/// Compose the RGBA surface over a light/dark checkerboard and pack it as
/// 0x00RRGGBB for the window, so cleared pixels show up as checker squares.
fn compose(screen: &mut [u32], raster: &Raster) {
    for (i, px) in raster.data.chunks_exact(4).enumerate() {
        let x = i % raster.width;
        let y = i / raster.width;
        let bg: u16 = if ((x / 8) + (y / 8)) % 2 == 0 { 0xB0 } else { 0x70 };
        let a = px[3] as u16;
        let inv = 255 - a;
        let r = (px[0] as u16 * a + bg * inv) / 255;
        let g = (px[1] as u16 * a + bg * inv) / 255;
        let b = (px[2] as u16 * a + bg * inv) / 255;
        screen[i] = (u32::from(r) << 16) | (u32::from(g) << 8) | u32::from(b);
    }
}
