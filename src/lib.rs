//! Deterministic physics-and-navigation runtime: a closed-form numeric
//! kernel (`numal`), continuous collision detection (`collision`), ground
//! surface queries (`ground`), state integrators (`integrate`), grid-based
//! pathfinding with an incremental D*-Lite executor (`navsys`), and the
//! cooperative tick scheduler (`tick`) that drives it all.
//!
//! Public API policy
//! -----------------
//! Every module here is pure/closed-form or, for `tick` and the D*-Lite
//! executor, holds only the state needed to resume a cooperative step.
//! Nothing in this crate spawns threads or blocks.

pub mod collision;
pub mod error;
pub mod ground;
pub mod integrate;
pub mod navsys;
pub mod numal;
pub mod tick;

pub use error::{BuylError, BuylResult};
