//! D*-Lite incremental route planner (Koenig & Likhachev's optimized
//! variant). Plans once via [`DStarLite::find_proto`], then stays cheap to
//! re-plan around localized map changes via [`DStarLite::update_vertex`] /
//! [`DStarLite::compute_shortest_route`] rather than a full re-search.

use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashMap};

use super::coord::Coord;
use super::coord_hash::CoordHash;
use super::coord_list::CoordList;
use super::grid::{Connectivity, NavGrid};

const INF: f32 = f32::INFINITY;
const MAX_PROTO_STEPS: usize = 1_000_000;

/// `inf` if either endpoint is blocked, otherwise `|a-b|` under the grid's
/// active metric (Euclidean on 8-connectivity, Manhattan on 4-connectivity).
pub fn dstar_lite_cost(grid: &NavGrid, a: Coord, b: Coord) -> f32 {
    if grid.is_blocked(a) || grid.is_blocked(b) {
        return INF;
    }
    metric(grid, a, b)
}

pub fn dstar_lite_heuristic(grid: &NavGrid, a: Coord, b: Coord) -> f32 {
    metric(grid, a, b)
}

fn metric(grid: &NavGrid, a: Coord, b: Coord) -> f32 {
    match grid.connectivity() {
        Connectivity::Eight => a.euclidean(b),
        Connectivity::Four => a.manhattan(b) as f32,
    }
}

#[derive(Debug, Clone, Copy)]
struct DEntry {
    k1: f32,
    k2: f32,
    coord: Coord,
}

impl PartialEq for DEntry {
    fn eq(&self, other: &Self) -> bool {
        self.k1 == other.k1 && self.k2 == other.k2
    }
}
impl Eq for DEntry {}
impl PartialOrd for DEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for DEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.k1
            .partial_cmp(&other.k1)
            .unwrap_or(Ordering::Equal)
            .then(self.k2.partial_cmp(&other.k2).unwrap_or(Ordering::Equal))
    }
}

/// Lexicographic-key min-heap with lazy deletion, the shape D*-Lite's open
/// list needs (arbitrary key-removal/update, not just push/pop).
#[derive(Debug, Default)]
struct DLiteQueue {
    heap: BinaryHeap<Reverse<DEntry>>,
    current: HashMap<Coord, (f32, f32)>,
}

impl DLiteQueue {
    fn clean_top(&mut self) {
        while let Some(Reverse(e)) = self.heap.peek() {
            if self.current.get(&e.coord) == Some(&(e.k1, e.k2)) {
                break;
            }
            self.heap.pop();
        }
    }

    fn peek_min(&mut self) -> Option<((f32, f32), Coord)> {
        self.clean_top();
        self.heap.peek().map(|Reverse(e)| ((e.k1, e.k2), e.coord))
    }

    fn pop_min(&mut self) -> Option<((f32, f32), Coord)> {
        self.clean_top();
        self.heap.pop().map(|Reverse(e)| {
            self.current.remove(&e.coord);
            ((e.k1, e.k2), e.coord)
        })
    }

    fn insert_or_update(&mut self, c: Coord, key: (f32, f32)) {
        self.current.insert(c, key);
        self.heap.push(Reverse(DEntry { k1: key.0, k2: key.1, coord: c }));
    }

    fn remove(&mut self, c: Coord) {
        self.current.remove(&c);
    }
}

pub struct DStarLite {
    pub start: Coord,
    pub goal: Coord,
    pub km: f32,
    pub s_last: Coord,
    pub force_quit: bool,
    pub debug: bool,
    pub real_route: CoordList,
    pub proto_route: CoordList,
    visit_counts: CoordHash<i32>,
    g: CoordHash<f32>,
    rhs: CoordHash<f32>,
    open: DLiteQueue,
}

impl DStarLite {
    pub fn new(grid: &NavGrid, start: Coord, goal: Coord) -> Self {
        let mut planner = DStarLite {
            start,
            goal,
            km: 0.0,
            s_last: start,
            force_quit: false,
            debug: false,
            real_route: [start].into_iter().collect(),
            proto_route: CoordList::new(),
            visit_counts: CoordHash::new(),
            g: CoordHash::new(),
            rhs: CoordHash::new(),
            open: DLiteQueue::default(),
        };
        planner.rhs.insert(goal, 0.0);
        let k = planner.key(grid, goal);
        planner.open.insert_or_update(goal, k);
        planner
    }

    fn g_of(&self, c: Coord) -> f32 {
        self.g.get(c).copied().unwrap_or(INF)
    }

    fn rhs_of(&self, c: Coord) -> f32 {
        self.rhs.get(c).copied().unwrap_or(INF)
    }

    /// Current one-step lookahead estimate for `c` (`inf` if never relaxed).
    pub fn rhs(&self, c: Coord) -> f32 {
        self.rhs_of(c)
    }

    fn key(&self, grid: &NavGrid, c: Coord) -> (f32, f32) {
        let m = self.g_of(c).min(self.rhs_of(c));
        (m + dstar_lite_heuristic(grid, self.start, c) + self.km, m)
    }

    fn record_visit(&mut self, c: Coord) {
        if self.debug {
            let count = self.visit_counts.get(c).copied().unwrap_or(0);
            self.visit_counts.insert(c, count + 1);
        }
    }

    pub fn visit_count(&self, c: Coord) -> i32 {
        self.visit_counts.get(c).copied().unwrap_or(0)
    }

    pub fn update_vertex(&mut self, grid: &NavGrid, c: Coord) {
        if c != self.goal {
            let mut best = INF;
            for succ in grid.all_neighbors(c) {
                let edge = dstar_lite_cost(grid, c, succ);
                if edge.is_finite() {
                    best = best.min(edge + self.g_of(succ));
                }
            }
            self.rhs.insert(c, best);
        }
        self.open.remove(c);
        if self.g_of(c) != self.rhs_of(c) {
            let k = self.key(grid, c);
            self.open.insert_or_update(c, k);
        }
    }

    pub fn compute_shortest_route(&mut self, grid: &NavGrid) {
        loop {
            let start_key = self.key(grid, self.start);
            let top = match self.open.peek_min() {
                Some(t) => t,
                None => break,
            };
            if !(top.0 < start_key) && self.rhs_of(self.start) == self.g_of(self.start) {
                break;
            }

            let (k_top, u) = self.open.pop_min().unwrap();
            self.record_visit(u);
            let k_new = self.key(grid, u);

            if k_top < k_new {
                self.open.insert_or_update(u, k_new);
            } else if self.g_of(u) > self.rhs_of(u) {
                self.g.insert(u, self.rhs_of(u));
                self.open.remove(u);
                for pred in grid.all_neighbors(u) {
                    self.update_vertex(grid, pred);
                }
            } else {
                self.g.insert(u, INF);
                self.update_vertex(grid, u);
                for pred in grid.all_neighbors(u) {
                    self.update_vertex(grid, pred);
                }
            }
        }
    }

    /// One-shot initial plan: follows the minimum `cost + g` successor from
    /// `start` to `goal`, filling both `real_route` and `proto_route`.
    pub fn find_proto(&mut self, grid: &NavGrid) -> bool {
        self.compute_shortest_route(grid);
        if self.rhs_of(self.start).is_infinite() {
            return false;
        }

        let mut path = vec![self.start];
        let mut current = self.start;
        let mut steps = 0;
        while current != self.goal && steps < MAX_PROTO_STEPS {
            steps += 1;
            let next = grid
                .neighbors(current)
                .into_iter()
                .filter(|&n| dstar_lite_cost(grid, current, n).is_finite())
                .min_by(|&a, &b| {
                    let fa = dstar_lite_cost(grid, current, a) + self.g_of(a);
                    let fb = dstar_lite_cost(grid, current, b) + self.g_of(b);
                    fa.partial_cmp(&fb).unwrap_or(Ordering::Equal)
                });
            match next {
                Some(n) => {
                    path.push(n);
                    current = n;
                }
                None => return false,
            }
        }
        if current != self.goal {
            return false;
        }
        self.proto_route = path.iter().copied().collect();
        self.real_route = [self.start].into_iter().collect();
        true
    }

    /// Picks the deterministic successor the executor should step to next:
    /// the neighbor minimizing `cost(start, n) + g(n)`.
    pub fn next_step(&self, grid: &NavGrid) -> Option<Coord> {
        grid.neighbors(self.start)
            .into_iter()
            .filter(|&n| dstar_lite_cost(grid, self.start, n).is_finite())
            .min_by(|&a, &b| {
                let fa = dstar_lite_cost(grid, self.start, a) + self.g_of(a);
                let fb = dstar_lite_cost(grid, self.start, b) + self.g_of(b);
                fa.partial_cmp(&fb).unwrap_or(Ordering::Equal)
            })
    }

    /// Folds externally-reported changed cells into the plan: bumps `km`,
    /// updates `s_last`, re-evaluates each changed cell, and re-solves.
    pub fn notify_changed_cells(&mut self, grid: &NavGrid, changed: &[Coord]) {
        if changed.is_empty() {
            return;
        }
        self.km += dstar_lite_heuristic(grid, self.s_last, self.start);
        self.s_last = self.start;
        for &c in changed {
            self.update_vertex(grid, c);
        }
        self.compute_shortest_route(grid);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navsys::grid::Connectivity;

    #[test]
    fn finds_straight_line_route_on_open_grid() {
        let grid = NavGrid::create(5, 1, Connectivity::Four).unwrap();
        let start = Coord::new(0, 0);
        let goal = Coord::new(4, 0);
        let mut planner = DStarLite::new(&grid, start, goal);
        assert!(planner.find_proto(&grid));
        assert_eq!(planner.proto_route.first(), Some(start));
        assert_eq!(planner.proto_route.last(), Some(goal));
    }

    #[test]
    fn unreachable_goal_fails_cleanly() {
        let mut grid = NavGrid::create(3, 1, Connectivity::Four).unwrap();
        grid.set_blocked(Coord::new(1, 0), true);
        let start = Coord::new(0, 0);
        let goal = Coord::new(2, 0);
        let mut planner = DStarLite::new(&grid, start, goal);
        assert!(!planner.find_proto(&grid));
    }

    #[test]
    fn replans_around_newly_blocked_cell() {
        let mut grid = NavGrid::create(3, 3, Connectivity::Four).unwrap();
        let start = Coord::new(0, 1);
        let goal = Coord::new(2, 1);
        let mut planner = DStarLite::new(&grid, start, goal);
        assert!(planner.find_proto(&grid));

        grid.set_blocked(Coord::new(1, 1), true);
        planner.notify_changed_cells(&grid, &[Coord::new(1, 1)]);
        let next = planner.next_step(&grid);
        assert!(next.is_some());
        assert_ne!(next, Some(Coord::new(1, 1)));
    }
}
