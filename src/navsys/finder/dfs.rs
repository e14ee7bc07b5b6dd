//! Depth-first search: unweighted, stack-driven frontier. Finds *a* path,
//! not necessarily a short one; cost still equals edge count.

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

    let mut stack: Vec<Coord> = vec![start];
    let mut visited: CoordHash<()> = CoordHash::new();
    let mut came_from: CoordHash<Coord> = CoordHash::new();
    visited.insert(start, ());
    let mut last = start;

    while let Some(current) = stack.pop() {
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
                stack.push(next);
            }
        }
    }

    route.reconstruct(&came_from, start, last);
    route.cost = route.coords.len().saturating_sub(1) as f32;
    route.success = false;
    log::debug!("finder dfs: unreachable goal, nodes expanded={}", visited.len());
    route
}
