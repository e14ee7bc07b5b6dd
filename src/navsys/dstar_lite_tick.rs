//! Ties a [`DStarLite`] planner to the [`Tick`] scheduler with a
//! unit-distance/speed movement model: one grid step consumes
//! `unit_m / speed_sec` seconds of tick time.

use std::cell::RefCell;
use std::rc::Rc;

use super::coord::Coord;
use super::coord_hash::CoordHash;
use super::coord_list::CoordList;
use super::dstar_lite::DStarLite;
use super::grid::NavGrid;
use super::settings::DSTAR_LITE_MAX_STEP;
use crate::tick::{Tick, TickId};

pub struct DStarLiteTick {
    planner: DStarLite,
    grid: NavGrid,
    max_time: f32,
    unit_m: f32,
    speed_sec: f32,
    cur_time: f32,
    cur_elapsed_time: f32,
    s_last: Coord,
    ticked: bool,
    max_elapsed_time: f32,
    success: Option<bool>,
    visit_counts: CoordHash<i32>,
    tick_id: Option<TickId>,
    on_move: Option<Box<dyn FnMut(Coord, Coord)>>,
    changed_coords_fn: Option<Box<dyn FnMut(&NavGrid) -> CoordList>>,
}

impl DStarLiteTick {
    pub fn new(grid: NavGrid, start: Coord, goal: Coord) -> Self {
        let planner = DStarLite::new(&grid, start, goal);
        DStarLiteTick {
            planner,
            grid,
            max_time: f32::INFINITY,
            unit_m: 1.0,
            speed_sec: 1.0,
            cur_time: 0.0,
            cur_elapsed_time: 0.0,
            s_last: start,
            ticked: false,
            max_elapsed_time: 0.0,
            success: None,
            visit_counts: CoordHash::new(),
            tick_id: None,
            on_move: None,
            changed_coords_fn: None,
        }
    }

    pub fn set_on_move(&mut self, cb: Box<dyn FnMut(Coord, Coord)>) {
        self.on_move = Some(cb);
    }

    pub fn set_changed_coords_fn(&mut self, cb: Box<dyn FnMut(&NavGrid) -> CoordList>) {
        self.changed_coords_fn = Some(cb);
    }

    pub fn real_route(&self) -> &CoordList {
        &self.planner.real_route
    }

    pub fn success(&self) -> Option<bool> {
        self.success
    }

    pub fn visit_count(&self, c: Coord) -> i32 {
        self.visit_counts.get(c).copied().unwrap_or(0)
    }

    /// Whether at least one grid step has been consumed since the last `arm`.
    pub fn has_ticked(&self) -> bool {
        self.ticked
    }

    /// High-water mark of `cur_elapsed_time` observed just before a step
    /// consumption, for diagnosing pacing relative to `unit_m/speed_sec`.
    pub fn max_elapsed_time(&self) -> f32 {
        self.max_elapsed_time
    }

    fn arm(&mut self) {
        self.planner.real_route = [self.planner.start].into_iter().collect();
        self.visit_counts.clear();
        self.cur_time = 0.0;
        self.cur_elapsed_time = 0.0;
        self.max_elapsed_time = 0.0;
        self.ticked = false;
        self.success = None;
        self.planner.find_proto(&self.grid);
    }

    /// Attaches to `tick` with the current `unit_m`/`speed_sec`/`max_time`.
    /// `tick` is an `Rc` because the attached closure needs to call back
    /// into it (`request_detach`) once the route finishes or fails.
    pub fn prepare(this: &Rc<RefCell<Self>>, tick: &Rc<Tick>) {
        this.borrow_mut().arm();
        let weak = this.clone();
        let tick_ref = tick.clone();
        let id = tick.attach(Box::new(move |dt| {
            weak.borrow_mut().update_with(&tick_ref, dt);
        }));
        this.borrow_mut().tick_id = Some(id);
    }

    pub fn prepare_full(
        this: &Rc<RefCell<Self>>,
        unit_m: f32,
        speed_sec: f32,
        max_time: f32,
        tick: &Rc<Tick>,
    ) {
        {
            let mut state = this.borrow_mut();
            state.unit_m = unit_m;
            state.speed_sec = speed_sec;
            state.max_time = max_time;
        }
        Self::prepare(this, tick);
    }

    fn step_seconds(&self) -> f32 {
        if self.speed_sec <= 0.0 {
            self.unit_m
        } else {
            self.unit_m / self.speed_sec
        }
    }

    fn finalize(&mut self, tick: &Tick) {
        self.success = Some(self.planner.start == self.planner.goal);
        log::debug!(
            "dstar_lite_tick: finalize success={:?} at {:?}",
            self.success,
            self.planner.start
        );
        if let Some(id) = self.tick_id.take() {
            tick.request_detach(id);
        }
    }

    /// Drives one tick's worth of movement. `tick` is only needed to queue
    /// the deferred detach on completion.
    pub fn update_with(&mut self, tick: &Tick, dt: f32) {
        self.cur_time += dt;
        self.cur_elapsed_time += dt;

        if self.planner.start == self.planner.goal || self.cur_time >= self.max_time || self.planner.force_quit {
            self.finalize(tick);
            return;
        }

        let step_seconds = self.step_seconds();
        let mut steps_taken = 0u32;
        while self.cur_elapsed_time >= step_seconds && steps_taken < DSTAR_LITE_MAX_STEP {
            steps_taken += 1;
            self.max_elapsed_time = self.max_elapsed_time.max(self.cur_elapsed_time);
            self.cur_elapsed_time -= step_seconds;
            self.ticked = true;

            if self.planner.rhs(self.planner.start).is_infinite() {
                log::debug!("dstar_lite_tick: start rhs is infinite, failing");
                self.finalize(tick);
                return;
            }

            let next = match self.planner.next_step(&self.grid) {
                Some(n) if n != self.planner.start => n,
                _ => {
                    log::debug!("dstar_lite_tick: no successor or self-loop, failing");
                    self.finalize(tick);
                    return;
                }
            };

            let prev = self.planner.start;
            self.planner.start = next;
            self.planner.update_vertex(&self.grid, next);
            self.planner.real_route.push(next);
            let count = self.visit_counts.get(next).copied().unwrap_or(0);
            self.visit_counts.insert(next, count + 1);
            log::trace!("dstar_lite_tick: consumed step {prev:?} -> {next:?}");

            if let Some(cb) = self.on_move.as_mut() {
                cb(prev, next);
            }

            if let Some(changed_fn) = self.changed_coords_fn.as_mut() {
                let changed = changed_fn(&self.grid);
                if !changed.is_empty() {
                    let coords: Vec<Coord> = changed.iter().copied().collect();
                    self.planner.notify_changed_cells(&self.grid, &coords);
                    self.s_last = self.planner.s_last;
                }
            }

            if self.planner.start == self.planner.goal {
                self.finalize(tick);
                return;
            }
        }

        if self.cur_time >= self.max_time {
            self.finalize(tick);
        }
    }

    /// Requests a deferred detach; the executor finalizes on the next tick.
    pub fn complete(&mut self, tick: &Tick) {
        if let Some(id) = self.tick_id {
            tick.request_detach(id);
        }
    }

    /// Convenience for tests/callers that drive map changes externally:
    /// blocks `c` on the executor's own grid.
    pub fn block_cell(&mut self, c: Coord) {
        self.grid.set_blocked(c, true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navsys::grid::Connectivity;

    #[test]
    fn executor_reaches_goal_on_open_grid() {
        let grid = NavGrid::create(5, 1, Connectivity::Four).unwrap();
        let start = Coord::new(0, 0);
        let goal = Coord::new(4, 0);
        let mut exec = DStarLiteTick::new(grid, start, goal);
        exec.arm();
        let tick = Tick::new();

        for _ in 0..4 {
            exec.update_with(&tick, 1.0);
        }

        assert_eq!(exec.success(), Some(true));
        assert_eq!(exec.real_route().last(), Some(goal));
        assert!(exec.visit_count(goal) >= 1);
    }

    #[test]
    fn executor_fails_cleanly_when_goal_unreachable() {
        let mut grid = NavGrid::create(3, 1, Connectivity::Four).unwrap();
        grid.set_blocked(Coord::new(1, 0), true);
        let start = Coord::new(0, 0);
        let goal = Coord::new(2, 0);
        let mut exec = DStarLiteTick::new(grid, start, goal);
        exec.arm();
        let tick = Tick::new();

        exec.update_with(&tick, 1.0);

        assert_eq!(exec.success(), Some(false));
    }

    #[test]
    fn changed_coords_fn_triggers_replan_around_new_block() {
        let grid = NavGrid::create(3, 3, Connectivity::Four).unwrap();
        let start = Coord::new(0, 1);
        let goal = Coord::new(2, 1);
        let mut exec = DStarLiteTick::new(grid, start, goal);
        exec.arm();

        let mut reported = false;
        exec.set_changed_coords_fn(Box::new(move |_grid| {
            if reported {
                CoordList::new()
            } else {
                reported = true;
                [Coord::new(1, 1)].into_iter().collect()
            }
        }));
        exec.block_cell(Coord::new(1, 1));

        let tick = Tick::new();
        for _ in 0..6 {
            if exec.success().is_some() {
                break;
            }
            exec.update_with(&tick, 1.0);
        }

        assert_eq!(exec.success(), Some(true));
        assert!(!exec.real_route().contains(Coord::new(1, 1)));
    }
}
