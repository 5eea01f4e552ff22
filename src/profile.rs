use super::board::{BoardSize, Point};
use super::error::{Error, Result};
use std::fmt;

/// An absolute screen position in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenPoint {
    pub x: i32,
    pub y: i32,
}

impl ScreenPoint {
    pub fn new(x: i32, y: i32) -> ScreenPoint {
        ScreenPoint { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn from_index(i: usize) -> Option<Difficulty> {
        Difficulty::ALL.get(i).copied()
    }

    /// Parses the answer to the difficulty prompt. Anything but 0, 1 or 2 is rejected.
    pub fn parse(input: &str) -> Result<Difficulty> {
        input
            .trim()
            .parse::<usize>()
            .ok()
            .and_then(Difficulty::from_index)
            .ok_or_else(|| Error::InvalidDifficulty(input.trim().to_owned()))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn profile(&self) -> Profile {
        match self {
            Difficulty::Easy => Profile::new(ScreenPoint::new(727, 406), 10, 8, 45, 10),
            Difficulty::Medium => Profile::new(ScreenPoint::new(682, 376), 18, 14, 30, 40),
            Difficulty::Hard => Profile::new(ScreenPoint::new(652, 336), 24, 20, 25, 99),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where the board sits on screen and how big it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Profile {
    pub origin: ScreenPoint,
    pub size: BoardSize,
    /// Side of one square cell in pixels.
    pub cell_size: u32,
    pub mine_count: usize,
}

impl Profile {
    pub fn new(
        origin: ScreenPoint,
        width: usize,
        height: usize,
        cell_size: u32,
        mine_count: usize,
    ) -> Profile {
        Profile {
            origin,
            size: BoardSize::new(width, height),
            cell_size,
            mine_count,
        }
    }

    /// Pixel dimensions of the captured region.
    pub fn pixel_size(&self) -> (u32, u32) {
        (
            self.size.width as u32 * self.cell_size,
            self.size.height as u32 * self.cell_size,
        )
    }

    /// Screen position of the centre of cell `(x, y)`. Coordinates may be off the
    /// board, which is how the cursor gets parked.
    pub fn cell_center(&self, x: i32, y: i32) -> ScreenPoint {
        let b = self.cell_size as i32;
        ScreenPoint::new(self.origin.x + x * b + b / 2, self.origin.y + y * b + b / 2)
    }

    pub fn point_center(&self, point: &Point) -> ScreenPoint {
        self.cell_center(point.0 as i32, point.1 as i32)
    }

    /// The cell under a screen position, if any.
    pub fn point_at(&self, screen: ScreenPoint) -> Option<Point> {
        let b = self.cell_size as i32;
        let dx = screen.x - self.origin.x;
        let dy = screen.y - self.origin.y;
        if dx < 0 || dy < 0 {
            return None;
        }
        let point = Point((dx / b) as usize, (dy / b) as usize);
        if self.size.contains(&point) {
            Some(point)
        } else {
            None
        }
    }
}
