//! Shared open/closed-list engine behind A*, Dijkstra, Greedy-Best-First, and
//! Weighted A* — they differ only in how `f` is built from `g` and `h`.

use crate::navsys::coord::Coord;
use crate::navsys::coord_hash::CoordHash;
use crate::navsys::grid::NavGrid;
use crate::navsys::metrics::{default_cost, euclidean_heuristic, CostFn, HeuristicFn};
use crate::navsys::pq::PriorityQueue;
use crate::navsys::route::Route;

#[derive(Debug, Clone, Copy)]
pub struct FinderOptions {
    pub cost_fn: Option<CostFn>,
    pub heuristic_fn: Option<HeuristicFn>,
    pub max_retry: i32,
    pub weight: f32,
    pub use_heuristic: bool,
}

impl Default for FinderOptions {
    fn default() -> Self {
        FinderOptions {
            cost_fn: None,
            heuristic_fn: None,
            max_retry: 0,
            weight: 1.0,
            use_heuristic: true,
        }
    }
}

/// `f = g*use_g + weight*h`. A* is `(g=1, w=1)`, Dijkstra is `h=0`
/// (`use_heuristic=false`), Greedy-Best-First is `g=0` (via `use_g=false`),
/// Weighted A* is `w` coerced to `1.0` if `w <= 0`.
pub fn run(
    grid: &NavGrid,
    start: Coord,
    goal: Coord,
    opts: FinderOptions,
    use_g_in_key: bool,
) -> Route {
    let cost_fn = opts.cost_fn.unwrap_or(default_cost as CostFn);
    let heuristic_fn = opts.heuristic_fn.unwrap_or(euclidean_heuristic as HeuristicFn);
    let weight = if opts.weight <= 0.0 { 1.0 } else { opts.weight };

    let mut route = Route::new();
    route.enable_visit_log();

    if !grid.in_bounds(start) || !grid.in_bounds(goal) || grid.is_blocked(start) || grid.is_blocked(goal) {
        return route;
    }

    let h0 = if opts.use_heuristic { heuristic_fn(start, goal) } else { 0.0 };

    let mut open = PriorityQueue::new();
    let mut g_score: CoordHash<f32> = CoordHash::new();
    let mut came_from: CoordHash<Coord> = CoordHash::new();
    let mut closed: CoordHash<()> = CoordHash::new();

    g_score.insert(start, 0.0);
    open.push(
        if use_g_in_key { weight * h0 } else { weight * h0 },
        start,
    );

    let mut retries: i32 = 0;
    let mut best_seen = start;
    let mut best_f = f32::INFINITY;

    while let Some((_, current)) = open.pop() {
        route.record_visit(current);

        let h_cur = if opts.use_heuristic { heuristic_fn(current, goal) } else { 0.0 };
        let f_cur = if use_g_in_key {
            *g_score.get(current).unwrap_or(&0.0) + weight * h_cur
        } else {
            weight * h_cur
        };
        if f_cur < best_f {
            best_f = f_cur;
            best_seen = current;
        }

        if current == goal {
            route.success = route.reconstruct(&came_from, start, goal);
            route.cost = *g_score.get(current).unwrap_or(&0.0);
            return route;
        }

        if closed.contains(current) {
            continue;
        }
        closed.insert(current, ());

        if opts.max_retry > 0 {
            retries += 1;
            if retries > opts.max_retry {
                break;
            }
        }

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
                let h_next = if opts.use_heuristic { heuristic_fn(next, goal) } else { 0.0 };
                let key = if use_g_in_key {
                    tentative_g + weight * h_next
                } else {
                    weight * h_next
                };
                open.push(key, next);
            }
        }
    }

    // Failure: best-effort partial path to the node that minimized f.
    route.reconstruct(&came_from, start, best_seen);
    route.cost = *g_score.get(best_seen).unwrap_or(&0.0);
    route.success = false;
    log::debug!(
        "finder astar-family: terminated without reaching goal, nodes expanded={}",
        closed.len()
    );
    route
}
