//! Simplified Memory-Bounded A*: A* with a hard cap on `open.len() +
//! closed.len()`. When the cap is exceeded, the highest-`f` open node (and
//! its `came_from` entry) is dropped. This can lose optimality; if the cap
//! is too small the search reports failure rather than thrashing forever.

use crate::navsys::coord::Coord;
use crate::navsys::coord_hash::CoordHash;
use crate::navsys::grid::NavGrid;
use crate::navsys::metrics::{default_cost, euclidean_heuristic, CostFn, HeuristicFn};
use crate::navsys::pq::PriorityQueue;
use crate::navsys::route::Route;

pub fn find(
    grid: &NavGrid,
    start: Coord,
    goal: Coord,
    cost_fn: Option<CostFn>,
    heuristic_fn: Option<HeuristicFn>,
    memory_limit: usize,
) -> Route {
    let mut route = Route::new();
    route.enable_visit_log();

    if !grid.in_bounds(start) || !grid.in_bounds(goal) || grid.is_blocked(start) || grid.is_blocked(goal) {
        return route;
    }

    let cost_fn = cost_fn.unwrap_or(default_cost as CostFn);
    let heuristic_fn = heuristic_fn.unwrap_or(euclidean_heuristic as HeuristicFn);

    let mut open = PriorityQueue::new();
    let mut g_score: CoordHash<f32> = CoordHash::new();
    let mut came_from: CoordHash<Coord> = CoordHash::new();
    let mut closed: CoordHash<()> = CoordHash::new();

    g_score.insert(start, 0.0);
    open.push(heuristic_fn(start, goal), start);

    let mut last = start;

    while let Some((_, current)) = open.pop() {
        route.record_visit(current);
        last = current;

        if current == goal {
            route.success = route.reconstruct(&came_from, start, goal);
            route.cost = *g_score.get(current).unwrap_or(&0.0);
            return route;
        }

        closed.insert(current, ());
        let g_cur = *g_score.get(current).unwrap_or(&0.0);

        for next in grid.neighbors(current) {
            if closed.contains(next) {
                continue;
            }
            let tentative_g = g_cur + cost_fn(grid, current, next);
            let better = match g_score.get(next) {
                Some(&existing) => tentative_g < existing,
                None => true,
            };
            if better {
                g_score.insert(next, tentative_g);
                came_from.insert(next, current);
                let f = tentative_g + heuristic_fn(next, goal);
                open.push(f, next);
            }
        }

        if open.len() + closed.len() > memory_limit {
            let dropped = open.len() + closed.len() - memory_limit;
            log::trace!("finder sma_star: memory cap exceeded, dropping {dropped} worst open node(s)");
            open.trim_worst(dropped);
        }
    }

    route.reconstruct(&came_from, start, last);
    route.success = false;
    log::debug!("finder sma_star: exhausted memory-bounded search without reaching goal");
    route
}
