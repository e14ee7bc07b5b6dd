//! Fast Marching Method: propagates a distance field outward from `start`
//! by solving the local Eikonal update at each cell, then recovers a path
//! to `goal` by steepest descent against the finished field.

use crate::navsys::coord::Coord;
use crate::navsys::coord_hash::CoordHash;
use crate::navsys::grid::NavGrid;
use crate::numal::geom::solve_quadratic_stable;
use crate::navsys::metrics::{default_cost, CostFn};
use crate::navsys::pq::PriorityQueue;
use crate::navsys::route::Route;
use crate::navsys::settings::FMM_DEFAULT_RADIUS_LIMIT;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CellState {
    Far,
    Narrow,
    Known,
}

/// Solves the local Eikonal update given the minimum finalized neighbor
/// value on each axis (`None` if that axis has no known neighbor) and the
/// per-cell slowness `w`.
fn eikonal_update(axis_mins: &[f32], w: f32) -> f32 {
    if axis_mins.is_empty() {
        return w;
    }
    if axis_mins.len() == 1 {
        return axis_mins[0] + w;
    }
    let sum: f32 = axis_mins.iter().sum();
    let sum_sq: f32 = axis_mins.iter().map(|t| t * t).sum();
    let n = axis_mins.len() as f32;
    let roots = solve_quadratic_stable(n, -2.0 * sum, sum_sq - w * w);
    match roots {
        Some((lo, hi)) => {
            let max_neighbor = axis_mins.iter().cloned().fold(f32::MIN, f32::max);
            if hi >= max_neighbor {
                hi
            } else {
                lo.max(max_neighbor)
            }
        }
        None => axis_mins.iter().cloned().fold(f32::INFINITY, f32::min) + w,
    }
}

pub fn find(
    grid: &NavGrid,
    start: Coord,
    goal: Coord,
    cost_fn: Option<CostFn>,
    radius_limit: f32,
    max_retry: i32,
) -> Route {
    let mut route = Route::new();
    route.enable_visit_log();

    if !grid.in_bounds(start) || !grid.in_bounds(goal) || grid.is_blocked(start) || grid.is_blocked(goal) {
        return route;
    }

    let cost_fn = cost_fn.unwrap_or(default_cost as CostFn);
    let radius_limit = if radius_limit <= 0.0 { FMM_DEFAULT_RADIUS_LIMIT } else { radius_limit };

    let mut dist: CoordHash<f32> = CoordHash::new();
    let mut state: CoordHash<CellState> = CoordHash::new();
    let mut narrow = PriorityQueue::new();

    dist.insert(start, 0.0);
    state.insert(start, CellState::Known);

    let axis_pairs = |c: Coord| -> Vec<[Coord; 2]> {
        vec![
            [Coord::new(c.x - 1, c.y), Coord::new(c.x + 1, c.y)],
            [Coord::new(c.x, c.y - 1), Coord::new(c.x, c.y + 1)],
        ]
    };

    let mut seed_narrow = |c: Coord, dist: &mut CoordHash<f32>, state: &mut CoordHash<CellState>, narrow: &mut PriorityQueue| {
        for next in grid.neighbors(c) {
            match state.get(next) {
                Some(CellState::Known) => continue,
                _ => {}
            }
            let w = cost_fn(grid, next, next);
            let mut axis_mins = vec![];
            for pair in axis_pairs(next) {
                let mins: Vec<f32> = pair
                    .iter()
                    .filter(|p| state.get(**p) == Some(&CellState::Known))
                    .filter_map(|p| dist.get(*p).copied())
                    .collect();
                if let Some(&m) = mins.iter().min_by(|a, b| a.partial_cmp(b).unwrap()) {
                    axis_mins.push(m);
                }
            }
            let t = eikonal_update(&axis_mins, w);
            if t > radius_limit {
                continue;
            }
            let better = match dist.get(next) {
                Some(&existing) => t < existing,
                None => true,
            };
            if better {
                dist.insert(next, t);
                state.insert(next, CellState::Narrow);
                narrow.push(t, next);
            }
        }
    };

    seed_narrow(start, &mut dist, &mut state, &mut narrow);

    let mut retries: i32 = 0;
    while let Some((t, c)) = narrow.pop() {
        if state.get(c) == Some(&CellState::Known) {
            continue;
        }
        if dist.get(c).copied() != Some(t) {
            continue; // stale heap entry
        }
        state.insert(c, CellState::Known);
        route.record_visit(c);

        if max_retry > 0 {
            retries += 1;
            if retries > max_retry {
                log::trace!("finder fast_marching: max_retry reached at {retries} finalized cells");
                break;
            }
        }

        seed_narrow(c, &mut dist, &mut state, &mut narrow);
    }

    if state.get(goal) != Some(&CellState::Known) {
        route.success = false;
        log::debug!("finder fast_marching: goal unreachable within radius_limit/max_retry");
        return route;
    }

    // Steepest-descent path recovery from goal back to start.
    let mut path = vec![goal];
    let mut current = goal;
    let mut guard = 0usize;
    while current != start && guard < (grid.width() as usize * grid.height() as usize + 1) {
        guard += 1;
        let current_t = *dist.get(current).unwrap_or(&f32::INFINITY);
        let mut best: Option<(Coord, f32)> = None;
        for next in grid.neighbors(current) {
            if let Some(&t) = dist.get(next) {
                if t < current_t {
                    if best.map(|(_, bt)| t < bt).unwrap_or(true) {
                        best = Some((next, t));
                    }
                }
            }
        }
        match best {
            Some((next, _)) => {
                path.push(next);
                current = next;
            }
            None => {
                route.success = false;
                return route;
            }
        }
    }

    path.reverse();
    route.coords = path.into_iter().collect();
    route.cost = *dist.get(goal).unwrap_or(&0.0);
    route.success = true;
    route
}
