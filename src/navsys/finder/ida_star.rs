//! Iterative-deepening A*: depth-first search bounded by an `f`-threshold
//! that grows each pass to the smallest over-threshold `f` seen in the
//! previous pass. Heuristic defaults to Manhattan distance if the caller
//! passes none.

use crate::navsys::coord::Coord;
use crate::navsys::coord_hash::CoordHash;
use crate::navsys::grid::NavGrid;
use crate::navsys::metrics::{default_cost, manhattan_heuristic, CostFn, HeuristicFn};
use crate::navsys::route::Route;

const MAX_ITERATIONS: u32 = 10_000;

struct Search<'a> {
    grid: &'a NavGrid,
    goal: Coord,
    cost_fn: CostFn,
    heuristic_fn: HeuristicFn,
    came_from: CoordHash<Coord>,
    next_threshold: f32,
    max_retry: i32,
    retries: i32,
}

enum Outcome {
    Found,
    Pruned,
    Exhausted,
    RetryLimit,
}

impl<'a> Search<'a> {
    #[allow(clippy::too_many_arguments)]
    fn dfs(&mut self, current: Coord, g: f32, threshold: f32, visited: &mut Vec<Coord>) -> Outcome {
        let f = g + (self.heuristic_fn)(current, self.goal);
        if f > threshold {
            if f < self.next_threshold {
                self.next_threshold = f;
            }
            return Outcome::Pruned;
        }
        visited.push(current);
        if current == self.goal {
            return Outcome::Found;
        }

        if self.max_retry > 0 {
            self.retries += 1;
            if self.retries > self.max_retry {
                return Outcome::RetryLimit;
            }
        }

        let mut any_pruned = false;
        for next in self.grid.neighbors(current) {
            if visited.contains(&next) {
                continue;
            }
            self.came_from.insert(next, current);
            let g_next = g + (self.cost_fn)(self.grid, current, next);
            match self.dfs(next, g_next, threshold, visited) {
                Outcome::Found => return Outcome::Found,
                Outcome::RetryLimit => return Outcome::RetryLimit,
                Outcome::Pruned => any_pruned = true,
                Outcome::Exhausted => {}
            }
        }

        if any_pruned {
            Outcome::Pruned
        } else {
            Outcome::Exhausted
        }
    }
}

pub fn find(
    grid: &NavGrid,
    start: Coord,
    goal: Coord,
    cost_fn: Option<CostFn>,
    heuristic_fn: Option<HeuristicFn>,
    max_retry: i32,
) -> Route {
    let mut route = Route::new();
    route.enable_visit_log();

    if !grid.in_bounds(start) || !grid.in_bounds(goal) || grid.is_blocked(start) || grid.is_blocked(goal) {
        return route;
    }

    let cost_fn = cost_fn.unwrap_or(default_cost as CostFn);
    let heuristic_fn = heuristic_fn.unwrap_or(manhattan_heuristic as HeuristicFn);

    let mut threshold = heuristic_fn(start, goal);
    let mut last_visited: Vec<Coord> = vec![start];

    for iteration in 0..MAX_ITERATIONS {
        let mut search = Search {
            grid,
            goal,
            cost_fn,
            heuristic_fn,
            came_from: CoordHash::new(),
            next_threshold: f32::INFINITY,
            max_retry,
            retries: 0,
        };
        let mut visited = vec![];
        match search.dfs(start, 0.0, threshold, &mut visited) {
            Outcome::Found => {
                for c in &visited {
                    route.record_visit(*c);
                }
                route.success = route.reconstruct(&search.came_from, start, goal);
                route.cost = route.coords.len().saturating_sub(1) as f32;
                return route;
            }
            Outcome::RetryLimit => {
                route.total_retry_count = search.retries;
                break;
            }
            Outcome::Exhausted => {
                last_visited = visited;
                break;
            }
            Outcome::Pruned => {
                if search.next_threshold.is_infinite() {
                    last_visited = visited;
                    break;
                }
                threshold = search.next_threshold;
                last_visited = visited;
                log::trace!("finder ida_star: iteration {iteration} raised threshold to {threshold}");
            }
        }
    }

    for c in &last_visited {
        route.record_visit(*c);
    }
    route.success = false;
    log::debug!("finder ida_star: exhausted without reaching goal");
    route
}
