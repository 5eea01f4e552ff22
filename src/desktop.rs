//! The real screen and mouse.

use super::error::{Error, Result};
use super::interaction::{InputDevice, MouseButton, ScreenCapture};
use super::profile::ScreenPoint;
use captrs::{Bgr8, Capturer};
use enigo::{Enigo, MouseControllable};
use image::{imageops, RgbImage};
use tracing::warn;

/// How many times a frame is requested before giving up. Desktop duplication
/// reports a timeout instead of a frame when nothing changed on screen.
const FRAME_ATTEMPTS: u8 = 10;

pub struct DesktopScreen {
    capturer: Capturer,
}

impl DesktopScreen {
    /// Captures monitor `id`, zero indexed.
    pub fn new(id: usize) -> Result<DesktopScreen> {
        let capturer = Capturer::new(id).map_err(Error::Capture)?;
        Ok(DesktopScreen { capturer })
    }

    fn frame(&mut self) -> Result<RgbImage> {
        let (width, height) = self.capturer.geometry();
        let mut last_error = String::new();
        for _ in 0..FRAME_ATTEMPTS {
            match self.capturer.capture_frame() {
                Ok(frame) => {
                    let mut rgb = Vec::with_capacity(frame.len() * 3);
                    for Bgr8 { r, g, b, .. } in frame {
                        rgb.extend_from_slice(&[r, g, b]);
                    }
                    return RgbImage::from_raw(width, height, rgb).ok_or_else(|| {
                        Error::Capture("frame does not match monitor geometry".to_owned())
                    });
                }
                Err(e) => {
                    warn!(error = ?e, "no frame");
                    last_error = format!("{:?}", e);
                }
            }
        }
        Err(Error::Capture(last_error))
    }
}

impl ScreenCapture for DesktopScreen {
    fn capture(&mut self, origin: ScreenPoint, width: u32, height: u32) -> Result<RgbImage> {
        if origin.x < 0 || origin.y < 0 {
            return Err(Error::Capture(format!("region origin {:?} is off screen", origin)));
        }
        let frame = self.frame()?;
        let region = imageops::crop_imm(&frame, origin.x as u32, origin.y as u32, width, height);
        Ok(region.to_image())
    }
}

pub struct DesktopMouse {
    enigo: Enigo,
}

impl DesktopMouse {
    pub fn new() -> DesktopMouse {
        DesktopMouse { enigo: Enigo::new() }
    }
}

impl Default for DesktopMouse {
    fn default() -> Self {
        DesktopMouse::new()
    }
}

fn button(button: MouseButton) -> enigo::MouseButton {
    match button {
        MouseButton::Left => enigo::MouseButton::Left,
        MouseButton::Right => enigo::MouseButton::Right,
    }
}

impl InputDevice for DesktopMouse {
    fn move_cursor(&mut self, x: i32, y: i32) {
        self.enigo.mouse_move_to(x, y);
    }

    fn press(&mut self, b: MouseButton) {
        self.enigo.mouse_down(button(b));
    }

    fn release(&mut self, b: MouseButton) {
        self.enigo.mouse_up(button(b));
    }
}
