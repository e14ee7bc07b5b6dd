//! Queryable navigation surface. `NavGrid` only tracks which cells are
//! blocked; obstacle/maze generation is the caller's job, same as the
//! teacher's broad-phase accelerator only indexes shapes someone else built.

use crate::error::{BuylError, BuylResult};

use super::coord::Coord;
use super::coord_hash::CoordHash;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connectivity {
    Four,
    Eight,
}

#[derive(Debug, Clone)]
pub struct NavGrid {
    width: u32,
    height: u32,
    connectivity: Connectivity,
    blocked: CoordHash<()>,
}

const FOUR_DIRS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const EIGHT_DIRS: [(i32, i32); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

impl NavGrid {
    pub fn create(width: u32, height: u32, connectivity: Connectivity) -> BuylResult<Self> {
        if width == 0 || height == 0 {
            return Err(BuylError::InvalidGrid { width, height });
        }
        Ok(NavGrid {
            width,
            height,
            connectivity,
            blocked: CoordHash::new(),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn connectivity(&self) -> Connectivity {
        self.connectivity
    }

    pub fn in_bounds(&self, c: Coord) -> bool {
        c.x >= 0 && c.y >= 0 && (c.x as u32) < self.width && (c.y as u32) < self.height
    }

    pub fn set_blocked(&mut self, c: Coord, flag: bool) {
        if flag {
            self.blocked.insert(c, ());
        } else {
            self.blocked.remove(c);
        }
    }

    pub fn is_blocked(&self, c: Coord) -> bool {
        self.blocked.contains(c)
    }

    /// Yields the in-bounds, unblocked neighbors of `c`. 8-connectivity
    /// includes diagonals unconditionally — no corner-cutting filter, so
    /// heuristic admissibility proofs elsewhere in this module stay valid.
    pub fn neighbors(&self, c: Coord) -> Vec<Coord> {
        self.all_neighbors(c)
            .into_iter()
            .filter(|n| !self.is_blocked(*n))
            .collect()
    }

    /// Yields the in-bounds neighbors of `c` regardless of blocked state.
    /// D*-Lite relaxation needs to revisit a cell that just became blocked
    /// (to pick up the `∞` edge cost via `dstar_lite_cost`), so it walks
    /// this instead of the pre-filtered [`NavGrid::neighbors`].
    pub fn all_neighbors(&self, c: Coord) -> Vec<Coord> {
        let dirs: &[(i32, i32)] = match self.connectivity {
            Connectivity::Four => &FOUR_DIRS,
            Connectivity::Eight => &EIGHT_DIRS,
        };
        dirs.iter()
            .map(|&(dx, dy)| Coord::new(c.x + dx, c.y + dy))
            .filter(|n| self.in_bounds(*n))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_dimension_is_rejected() {
        assert!(matches!(
            NavGrid::create(0, 5, Connectivity::Four),
            Err(BuylError::InvalidGrid { .. })
        ));
    }

    #[test]
    fn neighbors_exclude_blocked_and_out_of_bounds() {
        let mut g = NavGrid::create(3, 3, Connectivity::Four).unwrap();
        g.set_blocked(Coord::new(1, 0), true);
        let ns = g.neighbors(Coord::new(0, 0));
        assert!(ns.contains(&Coord::new(0, 1)));
        assert!(!ns.contains(&Coord::new(1, 0)));
        assert!(!ns.contains(&Coord::new(-1, 0)));
    }

    #[test]
    fn eight_connectivity_includes_diagonals_unconditionally() {
        let g = NavGrid::create(3, 3, Connectivity::Eight).unwrap();
        let ns = g.neighbors(Coord::new(1, 1));
        assert_eq!(ns.len(), 8);
    }

    #[test]
    fn all_neighbors_includes_blocked_but_not_out_of_bounds() {
        let mut g = NavGrid::create(3, 3, Connectivity::Four).unwrap();
        g.set_blocked(Coord::new(1, 0), true);
        let ns = g.all_neighbors(Coord::new(0, 0));
        assert!(ns.contains(&Coord::new(1, 0)));
        assert!(!ns.contains(&Coord::new(-1, 0)));
        assert_eq!(ns.len(), 2);
    }
}
