//! Breadth-first search: unweighted, FIFO frontier. Cost of the resulting
//! route equals its edge count.

use std::collections::VecDeque;

use crate::navsys::coord::Coord;
use crate::navsys::coord_hash::CoordHash;
use crate::navsys::grid::NavGrid;
use crate::navsys::route::Route;

pub fn find(grid: &NavGrid, start: Coord, goal: Coord) -> Route {
    let mut route = Route::new();
    route.enable_visit_log();

    if !grid.in_bounds(start) || !grid.in_bounds(goal) || grid.is_blocked(start) || grid.is_blocked(goal) {
        return route;
    }

    let mut frontier: VecDeque<Coord> = VecDeque::new();
    let mut visited: CoordHash<()> = CoordHash::new();
    let mut came_from: CoordHash<Coord> = CoordHash::new();

    frontier.push_back(start);
    visited.insert(start, ());
    let mut last = start;

    while let Some(current) = frontier.pop_front() {
        route.record_visit(current);
        last = current;
        if current == goal {
            route.success = route.reconstruct(&came_from, start, goal);
            route.cost = route.coords.len().saturating_sub(1) as f32;
            return route;
        }
        for next in grid.neighbors(current) {
            if !visited.contains(next) {
                visited.insert(next, ());
                came_from.insert(next, current);
                frontier.push_back(next);
            }
        }
    }

    route.reconstruct(&came_from, start, last);
    route.cost = route.coords.len().saturating_sub(1) as f32;
    route.success = false;
    log::debug!("finder bfs: unreachable goal, nodes expanded={}", visited.len());
    route
}
