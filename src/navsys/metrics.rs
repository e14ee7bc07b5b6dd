//! Cost and heuristic functions shared by the route finders. Callers pass
//! `None` to mean "use the module default" rather than the crate inventing
//! an implicit global.

use super::coord::Coord;
use super::grid::NavGrid;

pub type CostFn = fn(&NavGrid, Coord, Coord) -> f32;
pub type HeuristicFn = fn(Coord, Coord) -> f32;

pub fn default_cost(_grid: &NavGrid, _a: Coord, _b: Coord) -> f32 {
    1.0
}

pub fn zero_cost(_grid: &NavGrid, _a: Coord, _b: Coord) -> f32 {
    0.0
}

/// 1.0 for a cardinal step, `sqrt(2)` for a diagonal step.
pub fn diagonal_cost(_grid: &NavGrid, a: Coord, b: Coord) -> f32 {
    if a.x != b.x && a.y != b.y {
        std::f32::consts::SQRT_2
    } else {
        1.0
    }
}

pub fn euclidean_heuristic(a: Coord, b: Coord) -> f32 {
    a.euclidean(b)
}

pub fn manhattan_heuristic(a: Coord, b: Coord) -> f32 {
    a.manhattan(b) as f32
}

pub fn chebyshev_heuristic(a: Coord, b: Coord) -> f32 {
    a.chebyshev(b) as f32
}

pub fn octile_heuristic(a: Coord, b: Coord) -> f32 {
    a.octile(b)
}

pub fn zero_heuristic(_a: Coord, _b: Coord) -> f32 {
    0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagonal_cost_distinguishes_cardinal_and_diagonal() {
        let g = NavGrid::create(5, 5, super::super::grid::Connectivity::Eight).unwrap();
        assert_eq!(diagonal_cost(&g, Coord::new(0, 0), Coord::new(1, 0)), 1.0);
        assert!((diagonal_cost(&g, Coord::new(0, 0), Coord::new(1, 1)) - std::f32::consts::SQRT_2).abs() < 1.0e-6);
    }
}
