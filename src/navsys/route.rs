//! Route object: the result any finder hands back, plus the direction/
//! average-facing bookkeeping used by steering code downstream.

use super::coord::Coord;
use super::coord_hash::CoordHash;
use super::coord_list::CoordList;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction8 {
    East,
    NorthEast,
    North,
    NorthWest,
    West,
    SouthWest,
    South,
    SouthEast,
    Unknown,
}

#[derive(Debug, Clone, Default)]
pub struct Route {
    pub coords: CoordList,
    pub visited_order: Option<Vec<Coord>>,
    pub visited_count: CoordHash<i32>,
    pub cost: f32,
    pub success: bool,
    pub total_retry_count: i32,

    avg_vec_x: f32,
    avg_vec_y: f32,
    vec_count: u32,
}

impl Route {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_visit(&mut self, c: Coord) {
        if let Some(log) = self.visited_order.as_mut() {
            log.push(c);
        }
        let count = self.visited_count.get(c).copied().unwrap_or(0);
        self.visited_count.insert(c, count + 1);
    }

    pub fn enable_visit_log(&mut self) {
        if self.visited_order.is_none() {
            self.visited_order = Some(Vec::new());
        }
    }

    /// Walks `came_from` backward from `goal`, prepending each predecessor.
    /// Fails (returns `false`, leaving `self.coords` untouched) if a
    /// predecessor is missing before reaching `start`.
    pub fn reconstruct(&mut self, came_from: &CoordHash<Coord>, start: Coord, goal: Coord) -> bool {
        let mut path = vec![goal];
        let mut cur = goal;
        while cur != start {
            match came_from.get(cur) {
                Some(&prev) => {
                    path.push(prev);
                    cur = prev;
                }
                None => return false,
            }
        }
        path.reverse();
        self.coords = path.into_iter().collect();
        true
    }

    /// Step direction at index `i`: forward difference except at the last
    /// index, which uses the backward difference. `(0,0)` if `len < 2`.
    pub fn direction(&self, i: usize) -> (i32, i32) {
        let len = self.coords.len();
        if len < 2 {
            return (0, 0);
        }
        if i + 1 < len {
            let a = self.coords.get(i).unwrap();
            let b = self.coords.get(i + 1).unwrap();
            (b.x - a.x, b.y - a.y)
        } else {
            let a = self.coords.get(i - 1).unwrap();
            let b = self.coords.get(i).unwrap();
            (b.x - a.x, b.y - a.y)
        }
    }

    pub fn direction_enum(dxdy: (i32, i32)) -> Direction8 {
        let (dx, dy) = dxdy;
        let sx = dx.signum();
        let sy = dy.signum();
        match (sx, sy) {
            (1, 0) => Direction8::East,
            (1, 1) => Direction8::NorthEast,
            (0, 1) => Direction8::North,
            (-1, 1) => Direction8::NorthWest,
            (-1, 0) => Direction8::West,
            (-1, -1) => Direction8::SouthWest,
            (0, -1) => Direction8::South,
            (1, -1) => Direction8::SouthEast,
            _ => Direction8::Unknown,
        }
    }

    /// Folds a new unit step into the running `(avg_x, avg_y, count)`
    /// accumulator and returns `(changed, angle_deg)` against the
    /// previously accumulated direction, using `threshold_deg`. The first
    /// call initializes the accumulator without signaling a change.
    pub fn has_changed_with_angle(&mut self, step: (f32, f32), threshold_deg: f32) -> (bool, f32) {
        let (sx, sy) = step;
        let len = (sx * sx + sy * sy).sqrt();
        let (ux, uy) = if len > 1.0e-9 { (sx / len, sy / len) } else { (0.0, 0.0) };

        if self.vec_count == 0 {
            self.avg_vec_x = ux;
            self.avg_vec_y = uy;
            self.vec_count = 1;
            return (false, 0.0);
        }

        let acc_len = (self.avg_vec_x * self.avg_vec_x + self.avg_vec_y * self.avg_vec_y).sqrt();
        let angle_deg = if acc_len > 1.0e-9 {
            let anx = self.avg_vec_x / acc_len;
            let any = self.avg_vec_y / acc_len;
            let cos = (ux * anx + uy * any).clamp(-1.0, 1.0);
            cos.acos().to_degrees()
        } else {
            0.0
        };

        self.avg_vec_x += ux;
        self.avg_vec_y += uy;
        self.vec_count += 1;

        (angle_deg > threshold_deg, angle_deg)
    }

    pub fn has_changed(&mut self, step: (f32, f32), threshold_deg: f32) -> bool {
        self.has_changed_with_angle(step, threshold_deg).0
    }

    pub fn average_facing(&self) -> (f32, f32) {
        self.average_dir()
    }

    pub fn average_dir(&self) -> (f32, f32) {
        if self.vec_count == 0 {
            return (0.0, 0.0);
        }
        let len = (self.avg_vec_x * self.avg_vec_x + self.avg_vec_y * self.avg_vec_y).sqrt();
        if len <= 1.0e-9 {
            (0.0, 0.0)
        } else {
            (self.avg_vec_x / len, self.avg_vec_y / len)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reconstruct_walks_came_from_to_start() {
        let mut came_from = CoordHash::new();
        came_from.insert(Coord::new(2, 0), Coord::new(1, 0));
        came_from.insert(Coord::new(1, 0), Coord::new(0, 0));

        let mut route = Route::new();
        assert!(route.reconstruct(&came_from, Coord::new(0, 0), Coord::new(2, 0)));
        assert_eq!(route.coords.first(), Some(Coord::new(0, 0)));
        assert_eq!(route.coords.last(), Some(Coord::new(2, 0)));
        assert_eq!(route.coords.len(), 3);
    }

    #[test]
    fn reconstruct_fails_on_missing_predecessor() {
        let came_from: CoordHash<Coord> = CoordHash::new();
        let mut route = Route::new();
        assert!(!route.reconstruct(&came_from, Coord::new(0, 0), Coord::new(2, 0)));
    }

    #[test]
    fn direction_is_zero_for_short_routes() {
        let route = Route::new();
        assert_eq!(route.direction(0), (0, 0));
    }

    #[test]
    fn first_has_changed_call_never_signals_change() {
        let mut route = Route::new();
        let (changed, angle) = route.has_changed_with_angle((1.0, 0.0), 10.0);
        assert!(!changed);
        assert_eq!(angle, 0.0);
    }

    #[test]
    fn sharp_turn_is_detected() {
        let mut route = Route::new();
        route.has_changed_with_angle((1.0, 0.0), 10.0);
        let (changed, angle) = route.has_changed_with_angle((0.0, 1.0), 10.0);
        assert!(changed);
        assert!((angle - 90.0).abs() < 1.0);
    }
}
