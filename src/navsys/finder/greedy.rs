//! Greedy-Best-First: priority queue keyed on `h` alone.

use crate::navsys::coord::Coord;
use crate::navsys::grid::NavGrid;
use crate::navsys::route::Route;

use super::astar::{self, FinderOptions};

pub fn find(grid: &NavGrid, start: Coord, goal: Coord, opts: FinderOptions) -> Route {
    astar::run(grid, start, goal, opts, false)
}
