use super::board::{CellState, FlagSet, Grid, Point};
use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};
use std::io::{self, Write};

const COUNT_COLORS: [Color; 7] = [
    Color::White,
    Color::Blue,
    Color::Green,
    Color::DarkRed,
    Color::Magenta,
    Color::Yellow,
    Color::Cyan,
];

/// Glyph and tint for one cell. Solver flags win over whatever the screen shows.
pub fn cell_glyph(grid: &Grid, flags: &FlagSet, point: &Point) -> (char, Color) {
    if flags.contains(point) {
        return ('P', Color::Red);
    }
    match grid.get(point) {
        CellState::Unopened => ('.', Color::Grey),
        CellState::MineMarker => ('P', Color::Red),
        CellState::Empty => ('0', COUNT_COLORS[0]),
        CellState::Count(n) => {
            let glyph = std::char::from_digit(n as u32, 10).unwrap_or('?');
            let color = COUNT_COLORS.get(n as usize).copied().unwrap_or(Color::White);
            (glyph, color)
        }
    }
}

pub fn print_grid<W: Write>(
    out: &mut W,
    grid: &Grid,
    flags: &FlagSet,
    clear: bool,
) -> io::Result<()> {
    if clear {
        queue!(out, Clear(ClearType::All), MoveTo(0, 0))?;
    }
    let size = grid.size();
    for y in 0..size.height {
        for x in 0..size.width {
            let (glyph, color) = cell_glyph(grid, flags, &Point(x, y));
            queue!(out, SetForegroundColor(color), Print(glyph), Print(' '), ResetColor)?;
        }
        queue!(out, Print("\n"))?;
    }
    queue!(out, Print("\n"))?;
    out.flush()
}

#[cfg(test)]
mod render_tests {
    use super::*;
    use crate::board::BoardSize;

    /// The grid without colors, one line per row.
    fn plain(grid: &Grid, flags: &FlagSet) -> String {
        let size = grid.size();
        let mut result = String::with_capacity(size.area() * 2 + size.height);
        for y in 0..size.height {
            for x in 0..size.width {
                result.push(cell_glyph(grid, flags, &Point(x, y)).0);
                result.push(' ');
            }
            result.push('\n');
        }
        result
    }

    #[test]
    fn plain_rendering() {
        let mut grid = Grid::new(BoardSize::new(3, 2));
        grid.set(&Point(0, 0), CellState::Empty);
        grid.set(&Point(1, 0), CellState::Count(3));
        grid.set(&Point(0, 1), CellState::MineMarker);
        let mut flags = FlagSet::new();
        flags.insert(Point(2, 1));
        assert_eq!(plain(&grid, &flags), "0 3 . \nP . P \n");
    }

    #[test]
    fn colors_follow_the_count() {
        let mut grid = Grid::new(BoardSize::new(2, 1));
        grid.set(&Point(0, 0), CellState::Count(4));
        let flags = FlagSet::new();
        assert_eq!(cell_glyph(&grid, &flags, &Point(0, 0)), ('4', Color::Magenta));
        assert_eq!(cell_glyph(&grid, &flags, &Point(1, 0)), ('.', Color::Grey));
    }

    #[test]
    fn printed_grid_contains_every_glyph() {
        let mut grid = Grid::new(BoardSize::new(2, 2));
        grid.set(&Point(1, 1), CellState::Count(6));
        let mut out = Vec::new();
        print_grid(&mut out, &grid, &FlagSet::new(), false).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches('.').count(), 3);
        assert!(text.contains('6'));
        assert!(text.ends_with("\n\n"));
    }
}
