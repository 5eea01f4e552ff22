use super::board::{FlagSet, Grid, Point};
use super::interaction::Action;
use std::collections::HashSet;
use tracing::debug;

/// What one call to `deduce` decided.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Deduction {
    pub actions: Vec<Action>,
    pub progressed: bool,
}

/// Split of a numbered cell's neighbourhood.
struct Neighborhood {
    flagged: usize,
    candidates: Vec<Point>,
}

fn neighborhood(grid: &Grid, flags: &FlagSet, point: &Point) -> Neighborhood {
    let mut flagged = 0;
    let mut candidates = Vec::with_capacity(8);
    for neighbor in grid.size().neighbor_points(point) {
        if flags.contains(&neighbor) {
            flagged += 1;
        } else if grid.get(&neighbor).is_unopened() {
            candidates.push(neighbor);
        }
    }
    Neighborhood { flagged, candidates }
}

/// One solving step over a freshly classified grid.
///
/// An entirely unopened grid only gets `Open(0, 0)`. Otherwise a flagging pass runs
/// over every numbered cell, then an opening pass that sees the flags just added.
/// Flags are recorded in `flags` and charged against `remaining_mines`.
pub fn deduce(grid: &Grid, flags: &mut FlagSet, remaining_mines: &mut usize) -> Deduction {
    if grid.all_unopened() {
        debug!("nothing opened yet, starting in the corner");
        return Deduction {
            actions: vec![Action::Open(Point(0, 0))],
            progressed: true,
        };
    }

    let mut actions = flag_saturated(grid, flags, remaining_mines);
    actions.extend(open_satisfied(grid, flags));
    Deduction {
        progressed: !actions.is_empty(),
        actions,
    }
}

/// Flags every unopened neighbour of a number whose missing mines equal its unopened neighbours.
fn flag_saturated(grid: &Grid, flags: &mut FlagSet, remaining_mines: &mut usize) -> Vec<Action> {
    let mut actions = vec![];
    for point in grid.size().points() {
        let n = match grid.get(&point).count() {
            Some(n) => n,
            None => continue,
        };
        let Neighborhood { flagged, candidates } = neighborhood(grid, flags, &point);
        if flagged < n && candidates.len() == n - flagged {
            for candidate in candidates {
                if flags.insert(candidate) {
                    *remaining_mines = remaining_mines.saturating_sub(1);
                    debug!(cell = %candidate, from = %point, "flag");
                    actions.push(Action::Flag(candidate));
                }
            }
        }
    }
    actions
}

/// Opens every unopened neighbour of a number that already has all its mines flagged.
fn open_satisfied(grid: &Grid, flags: &FlagSet) -> Vec<Action> {
    let mut clicked = HashSet::new();
    let mut actions = vec![];
    for point in grid.size().points() {
        let n = match grid.get(&point).count() {
            Some(n) => n,
            None => continue,
        };
        let Neighborhood { flagged, candidates } = neighborhood(grid, flags, &point);
        if flagged == n {
            for candidate in candidates {
                if clicked.insert(candidate) {
                    debug!(cell = %candidate, from = %point, "open");
                    actions.push(Action::Open(candidate));
                }
            }
        }
    }
    actions
}

#[cfg(test)]
use proptest::prelude::*;
