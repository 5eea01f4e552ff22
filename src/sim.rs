//! An in-memory Minesweeper game that draws itself with the board palette and
//! takes mouse events, so the whole capture/solve/click loop can run offline.

use super::board::{BoardSize, Point};
use super::error::Result;
use super::interaction::{InputDevice, MouseButton, ScreenCapture};
use super::palette::Palette;
use super::profile::{Profile, ScreenPoint};
use image::{Rgb, RgbImage};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

/// Drawn for counts the palette has no color for.
const UNKNOWN_GLYPH: Rgb<u8> = Rgb([66, 66, 66]);
/// Cells this close to the first click never hold a mine.
const SAFE_RADIUS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Content {
    Mine,
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KnowledgeState {
    Unknown,
    Flag,
    Known,
}

#[derive(Debug, Clone)]
struct Cell {
    content: Content,
    mined_neighbor_count: usize,
    knowledge: KnowledgeState,
}

impl Cell {
    fn create_empty() -> Cell {
        Cell {
            content: Content::Empty,
            mined_neighbor_count: 0,
            knowledge: KnowledgeState::Unknown,
        }
    }

    fn toggle_flag(&mut self) {
        self.knowledge = match self.knowledge {
            KnowledgeState::Known => KnowledgeState::Known,
            KnowledgeState::Flag => KnowledgeState::Unknown,
            KnowledgeState::Unknown => KnowledgeState::Flag,
        };
    }
}

fn sample_points(size: &BoardSize, n: usize, disallowed: &Point, rng: &mut StdRng) -> Vec<Point> {
    let mut possible: Vec<Point> = size
        .points()
        .filter(|point| disallowed.distance(point) > SAFE_RADIUS)
        .collect();
    possible.shuffle(rng);
    possible.truncate(n);
    possible
}

/// The hidden game behind the simulated screen.
pub struct Minefield {
    profile: Profile,
    palette: Palette,
    field: Vec<Cell>,
    rng: StdRng,
    initialized: bool,
    exploded: bool,
}

impl Minefield {
    pub fn new(profile: Profile, palette: Palette, seed: u64) -> Minefield {
        Minefield {
            field: vec![Cell::create_empty(); profile.size.area()],
            rng: StdRng::seed_from_u64(seed),
            initialized: false,
            exploded: false,
            profile,
            palette,
        }
    }

    /// A board with mines at exactly `mines`, already initialized.
    pub fn with_mines(profile: Profile, palette: Palette, mines: &[Point]) -> Minefield {
        let mut field = Minefield::new(profile, palette, 0);
        field.place(mines);
        field
    }

    fn size(&self) -> BoardSize {
        self.profile.size
    }

    fn index(&self, point: &Point) -> usize {
        point.0 * self.size().height + point.1
    }

    fn retrieve_cell(&self, point: &Point) -> &Cell {
        &self.field[self.index(point)]
    }

    fn retrieve_cell_mutable(&mut self, point: &Point) -> &mut Cell {
        let i = self.index(point);
        &mut self.field[i]
    }

    fn place(&mut self, mines: &[Point]) {
        for point in mines {
            self.retrieve_cell_mutable(point).content = Content::Mine;
            for neighbor in self.size().neighbor_points(point) {
                self.retrieve_cell_mutable(&neighbor).mined_neighbor_count += 1;
            }
        }
        self.initialized = true;
    }

    fn initialize(&mut self, first: &Point) {
        let size = self.size();
        let mine_count = self.profile.mine_count;
        let mines = sample_points(&size, mine_count, first, &mut self.rng);
        self.place(&mines);
    }

    #[cfg(test)]
    pub(crate) fn is_mine(&self, point: &Point) -> bool {
        self.retrieve_cell(point).content == Content::Mine
    }

    #[cfg(test)]
    pub(crate) fn is_revealed(&self, point: &Point) -> bool {
        self.retrieve_cell(point).knowledge == KnowledgeState::Known
    }

    pub fn exploded(&self) -> bool {
        self.exploded
    }

    /// Every safe cell is open.
    pub fn is_won(&self) -> bool {
        !self.exploded
            && self.field.iter().all(|cell| {
                cell.content == Content::Mine || cell.knowledge == KnowledgeState::Known
            })
    }

    pub fn toggle_flag(&mut self, point: &Point) {
        self.retrieve_cell_mutable(point).toggle_flag();
    }

    /// Reveals `point`, flooding through cells with no adjacent mines.
    /// Flagged cells are left alone.
    pub fn probe(&mut self, point: &Point) {
        if !self.initialized {
            self.initialize(point);
        }
        if self.retrieve_cell(point).knowledge != KnowledgeState::Unknown {
            return;
        }

        let mut region = HashSet::with_capacity(16);
        region.insert(*point);
        self.find_region(*point, &mut region);
        for point in region {
            let cell = self.retrieve_cell_mutable(&point);
            if cell.knowledge == KnowledgeState::Unknown {
                cell.knowledge = KnowledgeState::Known;
                let hit = cell.content == Content::Mine;
                self.exploded |= hit;
            }
        }
    }

    fn find_region(&self, point: Point, acc: &mut HashSet<Point>) {
        let mut stack = vec![point];
        while let Some(point) = stack.pop() {
            let cell = self.retrieve_cell(&point);
            if cell.content == Content::Mine || cell.mined_neighbor_count > 0 {
                continue;
            }
            for neighbor in self.size().neighbor_points(&point) {
                let unknown = self.retrieve_cell(&neighbor).knowledge == KnowledgeState::Unknown;
                if unknown && acc.insert(neighbor) {
                    stack.push(neighbor);
                }
            }
        }
    }

    /// Paints the board as the classifier expects the real renderer to.
    pub fn render(&self) -> RgbImage {
        let (width, height) = self.profile.pixel_size();
        let mut image = RgbImage::new(width, height);
        let b = self.profile.cell_size;
        for point in self.size().points() {
            let cell = self.retrieve_cell(&point);
            let parity = (point.0 + point.1) % 2;
            let unopened = self.palette.unopened[parity];
            let marker = Some(self.palette.mine_marker);
            let (background, glyph) = match (cell.knowledge, cell.content) {
                (KnowledgeState::Unknown, _) => (unopened, None),
                (KnowledgeState::Flag, _) | (KnowledgeState::Known, Content::Mine) => {
                    (unopened, marker)
                }
                (KnowledgeState::Known, Content::Empty) => {
                    let glyph = match cell.mined_neighbor_count {
                        0 => None,
                        n => {
                            let number = self.palette.numbers.get(n - 1).copied();
                            Some(number.unwrap_or(UNKNOWN_GLYPH))
                        }
                    };
                    (self.palette.empty[parity], glyph)
                }
            };
            let left = point.0 as u32 * b;
            let top = point.1 as u32 * b;
            for x in left..left + b {
                for y in top..top + b {
                    image.put_pixel(x, y, background);
                }
            }
            if let Some(glyph) = glyph.filter(|_| b > 0) {
                // The glyph square stays inside its own cell.
                let center = b / 2;
                let arm = (b / 8).max(1).min(center).min(b - 1 - center);
                for x in left + center - arm..=left + center + arm {
                    for y in top + center - arm..=top + center + arm {
                        image.put_pixel(x, y, glyph);
                    }
                }
            }
        }
        image
    }
}

/// Shared handle to a `Minefield`, used as both the screen and the mouse.
#[derive(Clone)]
pub struct Simulator {
    field: Rc<RefCell<Minefield>>,
}

impl Simulator {
    pub fn new(field: Minefield) -> Simulator {
        Simulator {
            field: Rc::new(RefCell::new(field)),
        }
    }

    pub fn screen(&self) -> SimScreen {
        SimScreen { field: Rc::clone(&self.field) }
    }

    pub fn mouse(&self) -> SimMouse {
        SimMouse {
            field: Rc::clone(&self.field),
            cursor: ScreenPoint::new(0, 0),
            pressed: None,
        }
    }

    pub fn with_field<T>(&self, f: impl FnOnce(&Minefield) -> T) -> T {
        f(&*self.field.borrow())
    }
}

pub struct SimScreen {
    field: Rc<RefCell<Minefield>>,
}

impl ScreenCapture for SimScreen {
    fn capture(&mut self, origin: ScreenPoint, width: u32, height: u32) -> Result<RgbImage> {
        let field = self.field.borrow();
        let board = field.render();
        let board_origin = field.profile.origin;
        let mut image = RgbImage::new(width, height);
        for (x, y, pixel) in image.enumerate_pixels_mut() {
            let bx = origin.x + x as i32 - board_origin.x;
            let by = origin.y + y as i32 - board_origin.y;
            if bx >= 0 && by >= 0 {
                if let Some(p) = board.get_pixel_checked(bx as u32, by as u32) {
                    *pixel = *p;
                }
            }
        }
        Ok(image)
    }
}

pub struct SimMouse {
    field: Rc<RefCell<Minefield>>,
    cursor: ScreenPoint,
    pressed: Option<(MouseButton, ScreenPoint)>,
}

impl InputDevice for SimMouse {
    fn move_cursor(&mut self, x: i32, y: i32) {
        self.cursor = ScreenPoint::new(x, y);
    }

    fn press(&mut self, button: MouseButton) {
        self.pressed = Some((button, self.cursor));
    }

    /// A click only counts if press and release happen at the same spot.
    fn release(&mut self, button: MouseButton) {
        let pressed = self.pressed.take();
        if pressed != Some((button, self.cursor)) {
            return;
        }
        let mut field = self.field.borrow_mut();
        let point = match field.profile.point_at(self.cursor) {
            Some(point) => point,
            None => return,
        };
        match button {
            MouseButton::Left => field.probe(&point),
            MouseButton::Right => field.toggle_flag(&point),
        }
    }
}

#[cfg(test)]
mod sim_tests {
    use super::*;
    use crate::board::CellState;
    use crate::classify::classify;
    use crate::profile::Difficulty;

    fn mines(field: &Minefield) -> Vec<Point> {
        field.size().points().filter(|p| field.is_mine(p)).collect()
    }

    fn tiny_profile() -> Profile {
        Profile::new(ScreenPoint::new(100, 50), 4, 3, 20, 1)
    }

    #[test]
    fn first_probe_is_safe_and_opens_an_area() {
        for seed in 0..20 {
            let mut field = Minefield::new(Difficulty::Easy.profile(), Palette::default(), seed);
            field.probe(&Point(0, 0));
            assert!(!field.exploded());
            let mines = mines(&field);
            assert_eq!(mines.len(), 10);
            assert!(mines.iter().all(|m| m.distance(&Point(0, 0)) > SAFE_RADIUS));
            assert!(field.is_revealed(&Point(1, 1)));
        }
    }

    #[test]
    fn rendering_classifies_back() {
        let profile = tiny_profile();
        let palette = Palette::default();
        let mut field = Minefield::with_mines(profile, palette.clone(), &[Point(3, 0)]);
        field.probe(&Point(0, 2));
        field.toggle_flag(&Point(3, 0));
        let grid = classify(&field.render(), &profile, &palette);
        assert_eq!(grid.get(&Point(0, 0)), CellState::Empty);
        assert_eq!(grid.get(&Point(2, 0)), CellState::Count(1));
        assert_eq!(grid.get(&Point(2, 1)), CellState::Count(1));
        assert_eq!(grid.get(&Point(3, 1)), CellState::Count(1));
        assert_eq!(grid.get(&Point(3, 0)), CellState::MineMarker);
        assert_eq!(grid.get(&Point(3, 2)), CellState::Empty);
    }

    #[test]
    fn eight_is_drawn_off_palette() {
        let profile = Profile::new(ScreenPoint::new(0, 0), 3, 3, 20, 8);
        let palette = Palette::default();
        let ring: Vec<Point> = profile.size.points().filter(|p| *p != Point(1, 1)).collect();
        let mut field = Minefield::with_mines(profile, palette.clone(), &ring);
        field.probe(&Point(1, 1));
        let image = field.render();
        assert_eq!(*image.get_pixel(30, 30), UNKNOWN_GLYPH);
        // The background is an empty color, so the unknown glyph reads as a blank cell.
        let grid = classify(&image, &profile, &palette);
        assert_eq!(grid.get(&Point(1, 1)), CellState::Empty);
    }

    #[test]
    fn mouse_clicks_reach_the_field() {
        let profile = tiny_profile();
        let field = Minefield::with_mines(profile, Palette::default(), &[Point(0, 0)]);
        let sim = Simulator::new(field);
        let mut mouse = sim.mouse();
        let target = profile.point_center(&Point(0, 0));

        mouse.move_cursor(target.x, target.y);
        mouse.press(MouseButton::Right);
        mouse.release(MouseButton::Right);
        mouse.press(MouseButton::Left);
        mouse.release(MouseButton::Left);
        assert!(!sim.with_field(|f| f.exploded()));

        let other = profile.point_center(&Point(3, 2));
        mouse.move_cursor(other.x, other.y);
        mouse.press(MouseButton::Left);
        mouse.move_cursor(target.x, target.y);
        mouse.release(MouseButton::Left);
        assert!(!sim.with_field(|f| f.is_revealed(&Point(3, 2))));

        mouse.move_cursor(other.x, other.y);
        mouse.press(MouseButton::Left);
        mouse.release(MouseButton::Left);
        assert!(sim.with_field(|f| f.is_revealed(&Point(3, 2))));
        assert!(sim.with_field(|f| f.is_won()));
    }

    #[test]
    fn glyphs_fit_in_small_cells() {
        let palette = Palette::default();
        for cell_size in 1..=4 {
            let profile = Profile::new(ScreenPoint::new(0, 0), 3, 1, cell_size, 1);
            let mut field = Minefield::with_mines(profile, palette.clone(), &[Point(1, 0)]);
            field.toggle_flag(&Point(1, 0));
            field.probe(&Point(0, 0));
            field.probe(&Point(2, 0));
            let image = field.render();
            let center = cell_size / 2;
            let number = palette.numbers[0];
            assert_eq!(*image.get_pixel(center, center), number);
            assert_eq!(*image.get_pixel(cell_size + center, center), palette.mine_marker);
            assert_eq!(*image.get_pixel(2 * cell_size + center, center), number);
        }
    }

    #[test]
    fn screen_capture_is_offset_by_the_origin() {
        let profile = tiny_profile();
        let palette = Palette::default();
        let sim = Simulator::new(Minefield::new(profile, palette.clone(), 1));
        let mut screen = sim.screen();
        let (w, h) = profile.pixel_size();
        let image = screen.capture(profile.origin, w, h).unwrap();
        assert_eq!(*image.get_pixel(0, 0), palette.unopened[0]);
        assert_eq!(*image.get_pixel(20, 0), palette.unopened[1]);

        let shifted = screen.capture(ScreenPoint::new(90, 50), w, h).unwrap();
        assert_eq!(*shifted.get_pixel(0, 0), Rgb([0, 0, 0]));
        assert_eq!(*shifted.get_pixel(10, 0), palette.unopened[0]);
    }
}
