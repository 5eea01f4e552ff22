use super::ai::{self, Deduction};
use super::board::{FlagSet, Grid};
use super::classify;
use super::palette::Palette;
use super::profile::Profile;
use image::RgbImage;

/// Everything one run of the bot knows, owned by the control loop.
#[derive(Debug, Clone)]
pub struct Session {
    pub profile: Profile,
    pub palette: Palette,
    pub grid: Grid,
    pub flags: FlagSet,
    /// Mines not yet flagged. Only used to decide when to stop.
    pub remaining_mines: usize,
}

impl Session {
    pub fn new(profile: Profile, palette: Palette) -> Session {
        Session {
            grid: Grid::new(profile.size),
            flags: FlagSet::new(),
            remaining_mines: profile.mine_count,
            profile,
            palette,
        }
    }

    /// Rebuilds the grid in place from a capture.
    pub fn observe(&mut self, image: &RgbImage) {
        classify::classify_into(&mut self.grid, image, &self.profile, &self.palette);
    }

    pub fn deduce(&mut self) -> Deduction {
        ai::deduce(&self.grid, &mut self.flags, &mut self.remaining_mines)
    }

    pub fn all_mines_flagged(&self) -> bool {
        self.remaining_mines == 0
    }
}
