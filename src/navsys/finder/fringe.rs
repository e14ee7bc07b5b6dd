//! Fringe Search: a threshold-driven alternative to iterative deepening.
//! Nodes with `f <= flim` expand immediately; nodes that exceed it are
//! deferred to a "next pass" queue and their `f` becomes a candidate for
//! the next threshold.

use std::collections::VecDeque;

use crate::navsys::coord::Coord;
use crate::navsys::coord_hash::CoordHash;
use crate::navsys::grid::NavGrid;
use crate::navsys::metrics::{default_cost, euclidean_heuristic, CostFn, HeuristicFn};
use crate::navsys::route::Route;
use crate::navsys::settings::FRINGE_DEFAULT_DELTA_EPSILON;

pub fn find(
    grid: &NavGrid,
    start: Coord,
    goal: Coord,
    cost_fn: Option<CostFn>,
    heuristic_fn: Option<HeuristicFn>,
    delta_epsilon: f32,
) -> Route {
    let mut route = Route::new();
    route.enable_visit_log();

    if !grid.in_bounds(start) || !grid.in_bounds(goal) || grid.is_blocked(start) || grid.is_blocked(goal) {
        return route;
    }

    let cost_fn = cost_fn.unwrap_or(default_cost as CostFn);
    let heuristic_fn = heuristic_fn.unwrap_or(euclidean_heuristic as HeuristicFn);
    let delta_epsilon = if delta_epsilon <= 0.0 { FRINGE_DEFAULT_DELTA_EPSILON } else { delta_epsilon };

    let mut now: VecDeque<Coord> = VecDeque::from([start]);
    let mut later: VecDeque<Coord> = VecDeque::new();
    let mut g_score: CoordHash<f32> = CoordHash::new();
    let mut came_from: CoordHash<Coord> = CoordHash::new();

    g_score.insert(start, 0.0);
    let mut flim = heuristic_fn(start, goal);
    let mut next_candidate = f32::INFINITY;
    let mut last = start;

    loop {
        if now.is_empty() {
            if later.is_empty() {
                break;
            }
            std::mem::swap(&mut now, &mut later);
            flim = if next_candidate <= flim { flim + delta_epsilon } else { next_candidate };
            next_candidate = f32::INFINITY;
            continue;
        }

        let current = now.pop_front().unwrap();
        route.record_visit(current);
        last = current;

        if current == goal {
            route.success = route.reconstruct(&came_from, start, goal);
            route.cost = *g_score.get(current).unwrap_or(&0.0);
            return route;
        }

        let g_cur = *g_score.get(current).unwrap_or(&0.0);
        let f = g_cur + heuristic_fn(current, goal);
        if f > flim {
            later.push_back(current);
            next_candidate = next_candidate.min(f);
            continue;
        }

        for next in grid.neighbors(current) {
            let tentative_g = g_cur + cost_fn(grid, current, next);
            let better = match g_score.get(next) {
                Some(&existing) => tentative_g < existing,
                None => true,
            };
            if better {
                g_score.insert(next, tentative_g);
                came_from.insert(next, current);
                now.push_front(next);
            }
        }
    }

    route.reconstruct(&came_from, start, last);
    route.success = false;
    log::debug!("finder fringe: exhausted without reaching goal, final flim={flim}");
    route
}
