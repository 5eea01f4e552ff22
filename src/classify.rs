//! Turns a captured picture of the board into a `Grid`.
//!
//! Each cell is read in two tiers. The middle half of the cell is scanned row by
//! row for a number glyph or a mine marker, stopping at the first hit. Failing
//! that, a single pixel near the top-left corner decides between an opened blank
//! cell and anything else.
//!
//! Anything that matches nothing is reported as `Unopened`. That includes glyphs
//! the palette does not know (7, 8, some mine renderings) drawn over a background
//! that is not an empty color, which therefore look exactly like unopened cells.

use super::board::{CellState, Grid, Point};
use super::palette::Palette;
use super::profile::Profile;
use image::RgbImage;
use tracing::debug;

/// Offset of the background reference pixel from the cell's top-left corner.
const REFERENCE_OFFSET: u32 = 3;

pub fn classify(image: &RgbImage, profile: &Profile, palette: &Palette) -> Grid {
    let mut grid = Grid::new(profile.size);
    classify_into(&mut grid, image, profile, palette);
    grid
}

/// Overwrites every cell of `grid` from `image`.
pub fn classify_into(grid: &mut Grid, image: &RgbImage, profile: &Profile, palette: &Palette) {
    for point in profile.size.points() {
        grid.set(&point, classify_cell(image, &point, profile.cell_size, palette));
    }
    debug!(unopened = grid.count_unopened(), "classified capture");
}

pub fn classify_cell(
    image: &RgbImage,
    point: &Point,
    cell_size: u32,
    palette: &Palette,
) -> CellState {
    let left = point.0 as u32 * cell_size;
    let top = point.1 as u32 * cell_size;
    let (start, end) = sample_span(cell_size);

    for j in top + start..top + end {
        for i in left + start..left + end {
            let pixel = match image.get_pixel_checked(i, j) {
                Some(pixel) => pixel,
                None => continue,
            };
            if let Some(n) = palette.number_for(pixel) {
                return CellState::Count(n);
            }
            if palette.is_mine_marker(pixel) {
                return CellState::MineMarker;
            }
        }
    }

    match image.get_pixel_checked(left + REFERENCE_OFFSET, top + REFERENCE_OFFSET) {
        Some(reference) if palette.is_empty(reference) => CellState::Empty,
        _ => CellState::Unopened,
    }
}

/// Start and end (exclusive) of the sampled square, relative to the cell's corner:
/// from `center - cell_size/4` to `center + cell_size/4`.
pub fn sample_span(cell_size: u32) -> (u32, u32) {
    let center = cell_size / 2;
    let quarter = cell_size / 4;
    (center - quarter, center + quarter)
}

#[cfg(test)]
use proptest::prelude::*;
