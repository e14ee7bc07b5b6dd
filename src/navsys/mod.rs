//! Grid-based pathfinding: the grid model, coord containers, the priority
//! queue and route object every finder shares, the route finder family, and
//! the D*-Lite incremental planner plus its tick-driven executor.

pub mod coord;
pub mod coord_hash;
pub mod coord_list;
pub mod dstar_lite;
pub mod dstar_lite_tick;
pub mod finder;
pub mod grid;
pub mod metrics;
pub mod pq;
pub mod route;
pub mod settings;

pub use coord::Coord;
pub use grid::{Connectivity, NavGrid};
pub use route::Route;
