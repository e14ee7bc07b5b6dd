//! Real-Time A*: a depth-limited lookahead that commits to one step at a
//! time. [`step`] is the primitive an external driver (e.g. a game loop)
//! calls once per decision; [`find`] loops it internally so RTA* still
//! satisfies this module's uniform `find(...) -> Route` surface.

use crate::navsys::coord::Coord;
use crate::navsys::coord_hash::CoordHash;
use crate::navsys::grid::NavGrid;
use crate::navsys::metrics::{default_cost, euclidean_heuristic, CostFn, HeuristicFn};
use crate::navsys::route::Route;

fn backed_up_value(
    grid: &NavGrid,
    node: Coord,
    goal: Coord,
    cost_fn: CostFn,
    heuristic_fn: HeuristicFn,
    h_table: &CoordHash<f32>,
    plies_left: u32,
) -> f32 {
    if node == goal {
        return 0.0;
    }
    if plies_left == 0 {
        return h_table.get(node).copied().unwrap_or_else(|| heuristic_fn(node, goal));
    }
    let neighbors = grid.neighbors(node);
    if neighbors.is_empty() {
        return h_table.get(node).copied().unwrap_or_else(|| heuristic_fn(node, goal));
    }
    neighbors
        .into_iter()
        .map(|n| cost_fn(grid, node, n) + backed_up_value(grid, n, goal, cost_fn, heuristic_fn, h_table, plies_left - 1))
        .fold(f32::INFINITY, f32::min)
}

/// Picks the next step from `current`, updating `h_table[current]` to the
/// second-best child backed-up value (standard RTA* learning rule).
/// Returns `None` on a dead end (no neighbors).
pub fn step(
    grid: &NavGrid,
    current: Coord,
    goal: Coord,
    cost_fn: CostFn,
    heuristic_fn: HeuristicFn,
    depth_limit: u32,
    h_table: &mut CoordHash<f32>,
) -> Option<Coord> {
    let neighbors = grid.neighbors(current);
    if neighbors.is_empty() {
        return None;
    }

    let mut scored: Vec<(f32, Coord)> = neighbors
        .into_iter()
        .map(|n| {
            let v = cost_fn(grid, current, n)
                + backed_up_value(grid, n, goal, cost_fn, heuristic_fn, h_table, depth_limit.saturating_sub(1));
            (v, n)
        })
        .collect();
    scored.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());

    let best = scored[0];
    let second_best = scored.get(1).map(|s| s.0).unwrap_or(best.0);
    h_table.insert(current, second_best);

    Some(best.1)
}

pub fn find(
    grid: &NavGrid,
    start: Coord,
    goal: Coord,
    cost_fn: Option<CostFn>,
    heuristic_fn: Option<HeuristicFn>,
    depth_limit: u32,
    max_retry: i32,
) -> Route {
    let mut route = Route::new();
    route.enable_visit_log();

    if !grid.in_bounds(start) || !grid.in_bounds(goal) || grid.is_blocked(start) || grid.is_blocked(goal) {
        return route;
    }

    let cost_fn = cost_fn.unwrap_or(default_cost as CostFn);
    let heuristic_fn = heuristic_fn.unwrap_or(euclidean_heuristic as HeuristicFn);
    use crate::navsys::settings::{RTA_STAR_MAX_DEPTH, RTA_STAR_MIN_DEPTH};
    let depth_limit = depth_limit.clamp(RTA_STAR_MIN_DEPTH, RTA_STAR_MAX_DEPTH);

    let mut h_table: CoordHash<f32> = CoordHash::new();
    let mut current = start;
    route.coords.push(current);
    route.record_visit(current);

    let unlimited_cap = (grid.width() as usize) * (grid.height() as usize) * 8 + 64;
    let limit = if max_retry > 0 { max_retry as usize } else { unlimited_cap };
    let mut steps = 0usize;

    while current != goal && steps < limit {
        steps += 1;
        match step(grid, current, goal, cost_fn, heuristic_fn, depth_limit, &mut h_table) {
            Some(next) => {
                current = next;
                route.coords.push(current);
                route.record_visit(current);
            }
            None => break,
        }
    }

    route.success = current == goal;
    route.cost = route.coords.len().saturating_sub(1) as f32;
    if !route.success {
        log::debug!("finder rta_star: stalled after {steps} steps without reaching goal");
    }
    route
}
