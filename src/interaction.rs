use super::board::Point;
use super::error::Result;
use super::profile::{Profile, ScreenPoint};
use super::Timing;
use image::RgbImage;
use std::fmt;
use std::thread;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Flag(Point),
    Open(Point),
}

impl Action {
    pub fn point(&self) -> Point {
        match *self {
            Action::Flag(point) | Action::Open(point) => point,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Flag(point) => write!(f, "Flag: {}", point),
            Action::Open(point) => write!(f, "Open: {}", point),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
}

/// Pointer control. Every call completes before it returns.
pub trait InputDevice {
    fn move_cursor(&mut self, x: i32, y: i32);
    fn press(&mut self, button: MouseButton);
    fn release(&mut self, button: MouseButton);
}

/// Grabs a rectangle of the screen with exact pixel colors.
pub trait ScreenCapture {
    fn capture(&mut self, origin: ScreenPoint, width: u32, height: u32) -> Result<RgbImage>;
}

/// Turns solver actions into clicks on the board.
pub struct Clicker<D> {
    device: D,
    profile: Profile,
    hold: Duration,
    click_flags: bool,
}

impl<D: InputDevice> Clicker<D> {
    /// With `click_flags` off, flags stay in the solver's own bookkeeping and
    /// are never placed on screen.
    pub fn new(device: D, profile: Profile, timing: &Timing, click_flags: bool) -> Clicker<D> {
        Clicker {
            device,
            profile,
            hold: timing.click_hold,
            click_flags,
        }
    }

    #[cfg(test)]
    fn device(&self) -> &D {
        &self.device
    }

    pub fn perform(&mut self, actions: &[Action]) {
        for action in actions {
            let button = match action {
                Action::Open(_) => MouseButton::Left,
                Action::Flag(_) if self.click_flags => MouseButton::Right,
                Action::Flag(_) => continue,
            };
            self.click(&action.point(), button);
        }
        self.park();
    }

    fn click(&mut self, point: &Point, button: MouseButton) {
        let target = self.profile.point_center(point);
        debug!(?button, x = target.x, y = target.y, "click");
        self.device.move_cursor(target.x, target.y);
        self.device.press(button);
        if !self.hold.is_zero() {
            thread::sleep(self.hold);
        }
        self.device.release(button);
    }

    /// Moves the cursor just left of the board so hover highlights stay out
    /// of the next capture.
    fn park(&mut self) {
        let parked = self.profile.cell_center(-1, 0);
        self.device.move_cursor(parked.x, parked.y);
    }
}
