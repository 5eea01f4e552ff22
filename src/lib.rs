//! Plays Minesweeper by looking at the screen.
//!
//! Each iteration captures the board, classifies every cell from its pixel
//! colors, deduces which cells are certainly mines or certainly safe, clicks the
//! safe ones, and waits for the board to finish animating before looking again.

pub mod ai;
pub mod board;
pub mod classify;
#[cfg(feature = "desktop")]
pub mod desktop;
pub mod error;
pub mod exit_codes;
pub mod interaction;
pub mod logging;
pub mod palette;
pub mod profile;
pub mod render;
pub mod session;
pub mod sim;

pub use error::{Error, Result};

use image::RgbImage;
use interaction::{Action, Clicker, InputDevice, ScreenCapture};
use session::Session;
use std::io::Write;
use std::thread;
use std::time::Duration;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    /// Wait after each batch of clicks. Capturing mid-animation misreads cells.
    pub anim_delay: Duration,
    /// How long a button stays down for one click.
    pub click_hold: Duration,
}

impl Timing {
    /// No waiting at all, for surfaces that do not animate.
    #[cfg(test)]
    pub(crate) fn instant() -> Timing {
        Timing {
            anim_delay: Duration::ZERO,
            click_hold: Duration::ZERO,
        }
    }
}

impl Default for Timing {
    fn default() -> Self {
        Timing {
            anim_delay: Duration::from_millis(620),
            click_hold: Duration::from_millis(10),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The last pass found nothing certain to do.
    NoProgress,
    /// Every mine of the profile has been flagged.
    AllMinesFlagged,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub iterations: usize,
    pub flagged: usize,
    pub opened: usize,
    pub remaining_mines: usize,
    pub stop: StopReason,
}

/// Where the grid and action lines are written.
pub struct Console<W> {
    pub out: W,
    /// Clear the terminal before each grid.
    pub clear: bool,
}

fn capture<S: ScreenCapture>(screen: &mut S, session: &Session) -> Result<RgbImage> {
    let (width, height) = session.profile.pixel_size();
    screen.capture(session.profile.origin, width, height)
}

/// Plays until a pass makes no progress or the mine budget runs out.
pub fn run<S, D, W>(
    session: &mut Session,
    screen: &mut S,
    clicker: &mut Clicker<D>,
    timing: &Timing,
    console: &mut Console<W>,
) -> Result<RunSummary>
where
    S: ScreenCapture,
    D: InputDevice,
    W: Write,
{
    let mut iterations = 0;
    let mut flagged = 0;
    let mut opened = 0;

    session.observe(&capture(screen, session)?);
    let stop = loop {
        iterations += 1;
        render::print_grid(&mut console.out, &session.grid, &session.flags, console.clear)?;

        let deduction = session.deduce();
        for action in &deduction.actions {
            writeln!(console.out, "{}", action)?;
            match action {
                Action::Flag(_) => flagged += 1,
                Action::Open(_) => opened += 1,
            }
        }
        clicker.perform(&deduction.actions);
        info!(
            iteration = iterations,
            actions = deduction.actions.len(),
            remaining_mines = session.remaining_mines,
            "pass complete"
        );

        if !timing.anim_delay.is_zero() {
            thread::sleep(timing.anim_delay);
        }
        session.observe(&capture(screen, session)?);

        if !deduction.progressed {
            break StopReason::NoProgress;
        }
        if session.all_mines_flagged() {
            break StopReason::AllMinesFlagged;
        }
    };

    info!(?stop, iterations, flagged, opened, "stopped");
    Ok(RunSummary {
        iterations,
        flagged,
        opened,
        remaining_mines: session.remaining_mines,
        stop,
    })
}

#[cfg(test)]
use proptest::prelude::*;
