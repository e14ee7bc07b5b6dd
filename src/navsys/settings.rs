//! Tunable constants for the navigation subsystem.

/// Default step-threshold increment for Fringe Search when the next pass's
/// minimum `f` did not advance past the current threshold.
pub const FRINGE_DEFAULT_DELTA_EPSILON: f32 = 0.5;

/// Fast Marching Method's default propagation radius when the caller passes
/// a non-positive `radius_limit`.
pub const FMM_DEFAULT_RADIUS_LIMIT: f32 = 1.0e6;

/// RTA* lookahead depth is clamped into this range regardless of caller input.
pub const RTA_STAR_MIN_DEPTH: u32 = 3;
pub const RTA_STAR_MAX_DEPTH: u32 = 10;

/// Tick budget the D*-Lite executor may consume per `update()` call before
/// yielding back to the scheduler.
pub const DSTAR_LITE_MAX_STEP: u32 = 64;
