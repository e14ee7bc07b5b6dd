//! Weighted A*: `f = g + w*h`, `w` coerced to 1.0 if `w <= 0`. Not admissible
//! for `w > 1`, but expands fewer nodes.

use crate::navsys::coord::Coord;
use crate::navsys::grid::NavGrid;
use crate::navsys::route::Route;

use super::astar::{self, FinderOptions};

pub fn find(grid: &NavGrid, start: Coord, goal: Coord, opts: FinderOptions) -> Route {
    astar::run(grid, start, goal, opts, true)
}
