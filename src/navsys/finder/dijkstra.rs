//! Dijkstra: A* with `h` identically zero.

use crate::navsys::coord::Coord;
use crate::navsys::grid::NavGrid;
use crate::navsys::route::Route;

use super::astar::{self, FinderOptions};

pub fn find(grid: &NavGrid, start: Coord, goal: Coord, mut opts: FinderOptions) -> Route {
    opts.use_heuristic = false;
    astar::run(grid, start, goal, opts, true)
}
