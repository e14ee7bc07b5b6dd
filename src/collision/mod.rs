/*!
Collision root module.

Closed-form continuous collision detection (CCD) against planes, spheres, and
triangles. Every routine solves a bounded-degree polynomial for the earliest
time-of-impact within a tick instead of stepping through substeps, matching
the rest of this crate's "closed-form first" posture (see [`crate::numal`]).

The code is split for clarity:

- settings: tolerance and threshold constants shared by every `detect_*` routine
- ccd:      the plane/sphere/triangle detectors themselves

Public API policy
------------------
Only the `detect_*` functions and [`Impact`] are exported. Internal helpers
(segment-TOI equation setup, Newton refinement, colinearity branch selection)
stay private to `ccd` so the branch-selection policy can change without
breaking callers.
*/

pub mod ccd;
pub mod settings;

pub use ccd::{
    detect_plane_collision, detect_sphere_collision, detect_sphere_collision_moving,
    detect_sphere_collision_moving_precise, detect_sphere_collision_precise,
    detect_triangle_collision_moving, detect_triangle_collision_rotating,
    detect_triangle_collision_rotating_alpha, Impact,
};
