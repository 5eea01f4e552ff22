use indexmap::IndexSet;
use itertools::iproduct;
use std::fmt;

/// What the classifier believes a single cell shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellState {
    Unopened,
    Empty,
    /// Opened with 1..=6 adjacent mines.
    Count(u8),
    /// A rendered flag or a triggered mine. Not the same thing as an entry in the `FlagSet`.
    MineMarker,
}

impl CellState {
    pub fn is_unopened(&self) -> bool {
        matches!(self, CellState::Unopened)
    }

    /// Adjacent mine count for a numbered cell, `None` for anything else.
    pub fn count(&self) -> Option<usize> {
        match *self {
            CellState::Count(n) if n > 0 => Some(n as usize),
            _ => None,
        }
    }
}

/// A cell coordinate, `Point(column, row)`.
#[derive(Debug, Eq, PartialEq, Clone, Copy, Hash)]
pub struct Point(pub usize, pub usize);

impl Point {
    pub fn distance(&self, other: &Point) -> usize {
        //l-inf norm seems most appropriate for minesweeper
        let dx = (self.0 as i64 - other.0 as i64).abs();
        let dy = (self.1 as i64 - other.1 as i64).abs();
        dx.max(dy) as usize
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.0, self.1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardSize {
    pub width: usize,
    pub height: usize,
}

impl BoardSize {
    pub fn new(width: usize, height: usize) -> BoardSize {
        BoardSize { width, height }
    }

    pub fn area(&self) -> usize {
        self.width * self.height
    }

    /// Every cell, column by column, top to bottom inside a column.
    /// This is the order captures are read in and the order both solver passes scan.
    pub fn points(&self) -> impl Iterator<Item = Point> {
        iproduct!(0..self.width, 0..self.height).map(|(x, y)| Point(x, y))
    }

    /// Inverse of the position of a point in `points()`.
    pub fn point_from_integer(&self, i: usize) -> Option<Point> {
        if i >= self.area() {
            return None;
        }
        Some(Point(i / self.height, i % self.height))
    }

    pub fn contains(&self, point: &Point) -> bool {
        point.0 < self.width && point.1 < self.height
    }

    /// The up-to-eight cells around `point`, clamped to the board. No wraparound.
    pub fn neighbor_points(&self, point: &Point) -> impl Iterator<Item = Point> {
        let Point(x, y) = *point;
        let xs = x.saturating_sub(1)..=(x + 1).min(self.width.saturating_sub(1));
        let ys = y.saturating_sub(1)..=(y + 1).min(self.height.saturating_sub(1));
        iproduct!(xs, ys)
            .map(|(i, j)| Point(i, j))
            .filter(move |p| *p != Point(x, y))
    }
}

/// The logical board rebuilt from every capture. Its size never changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    size: BoardSize,
    cells: Vec<CellState>,
}

impl Grid {
    pub fn new(size: BoardSize) -> Grid {
        Grid {
            size,
            cells: vec![CellState::Unopened; size.area()],
        }
    }

    pub fn size(&self) -> BoardSize {
        self.size
    }

    fn index(&self, point: &Point) -> usize {
        assert!(self.size.contains(point), "{:?} is off the board", point);
        point.0 * self.size.height + point.1
    }

    pub fn get(&self, point: &Point) -> CellState {
        self.cells[self.index(point)]
    }

    pub fn set(&mut self, point: &Point, state: CellState) {
        let i = self.index(point);
        self.cells[i] = state;
    }

    pub fn all_unopened(&self) -> bool {
        self.cells.iter().all(CellState::is_unopened)
    }

    pub fn count_unopened(&self) -> usize {
        self.cells.iter().filter(|c| c.is_unopened()).count()
    }
}

/// The cells the solver has decided are mines, in the order it decided.
/// Cells only ever get added.
#[derive(Debug, Default, Clone)]
pub struct FlagSet {
    points: IndexSet<Point>,
}

impl FlagSet {
    pub fn new() -> FlagSet {
        FlagSet::default()
    }

    /// Returns false if the point was already flagged.
    pub fn insert(&mut self, point: Point) -> bool {
        self.points.insert(point)
    }

    pub fn contains(&self, point: &Point) -> bool {
        self.points.contains(point)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Point> {
        self.points.iter()
    }
}

#[cfg(test)]
use proptest::prelude::*;

#[cfg(test)]
mod board_tests {
    use super::*;
    use itertools::Itertools;

    #[test]
    fn points_scan_columns_first() {
        let size = BoardSize::new(3, 2);
        let points: Vec<Point> = size.points().collect();
        assert_eq!(
            points,
            vec![Point(0, 0), Point(0, 1), Point(1, 0), Point(1, 1), Point(2, 0), Point(2, 1)]
        );
    }

    #[test]
    fn corner_has_three_neighbors() {
        let size = BoardSize::new(10, 8);
        let neighbors: Vec<Point> = size.neighbor_points(&Point(0, 0)).collect();
        assert_eq!(neighbors, vec![Point(0, 1), Point(1, 0), Point(1, 1)]);
        assert_eq!(size.neighbor_points(&Point(9, 7)).count(), 3);
        assert_eq!(size.neighbor_points(&Point(9, 3)).count(), 5);
        assert_eq!(size.neighbor_points(&Point(4, 4)).count(), 8);
    }

    #[test]
    fn grid_starts_unopened() {
        let mut grid = Grid::new(BoardSize::new(4, 3));
        assert!(grid.all_unopened());
        grid.set(&Point(3, 2), CellState::Count(2));
        assert!(!grid.all_unopened());
        assert_eq!(grid.get(&Point(3, 2)), CellState::Count(2));
        assert_eq!(grid.get(&Point(2, 2)), CellState::Unopened);
        assert_eq!(grid.count_unopened(), 11);
    }

    #[test]
    fn flag_set_rejects_duplicates_and_keeps_order() {
        let mut flags = FlagSet::new();
        assert!(flags.insert(Point(2, 1)));
        assert!(flags.insert(Point(0, 0)));
        assert!(!flags.insert(Point(2, 1)));
        assert_eq!(flags.len(), 2);
        assert_eq!(flags.iter().copied().collect::<Vec<_>>(), vec![Point(2, 1), Point(0, 0)]);
    }

    #[test]
    fn only_positive_counts_have_a_count() {
        assert_eq!(CellState::Count(3).count(), Some(3));
        assert_eq!(CellState::Count(0).count(), None);
        assert_eq!(CellState::Empty.count(), None);
        assert_eq!(CellState::Unopened.count(), None);
        assert_eq!(CellState::MineMarker.count(), None);
    }

    proptest! {
        #[test]
        fn area_correctness(width in 0..1000usize, height in 0..1000usize) {
            prop_assert_eq!(BoardSize::new(width, height).area(), width * height);
        }

        #[test]
        fn points_visit_every_cell_once(width in 1..40usize, height in 1..40usize) {
            let size = BoardSize::new(width, height);
            let points: Vec<Point> = size.points().collect();
            prop_assert_eq!(points.len(), size.area());
            prop_assert!(points.iter().all(|p| size.contains(p)));
            prop_assert_eq!(points.iter().unique().count(), size.area());
            for (i, point) in points.iter().enumerate() {
                prop_assert_eq!(size.point_from_integer(i), Some(*point));
            }
            prop_assert_eq!(size.point_from_integer(size.area()), None);
        }

        #[test]
        fn neighbors_are_adjacent_and_on_board(width in 1..30usize, height in 1..30usize,
                                               x in 0..30usize, y in 0..30usize) {
            let size = BoardSize::new(width, height);
            let point = Point(x % width, y % height);
            let neighbors: Vec<Point> = size.neighbor_points(&point).collect();
            prop_assert!(neighbors.len() <= 8);
            for neighbor in &neighbors {
                prop_assert!(size.contains(neighbor));
                prop_assert_eq!(neighbor.distance(&point), 1);
            }
            let expected = size.points().filter(|p| p.distance(&point) == 1).count();
            prop_assert_eq!(neighbors.len(), expected);
        }

        #[test]
        fn distance_is_symmetric(x1 in 0..1000usize, y1 in 0..1000usize,
                                 x2 in 0..1000usize, y2 in 0..1000usize) {
            let point1 = Point(x1, y1);
            let point2 = Point(x2, y2);
            prop_assert_eq!(point1.distance(&point2), point2.distance(&point1));
            prop_assert_eq!(point1 == point2, point1.distance(&point2) == 0);
        }
    }
}
