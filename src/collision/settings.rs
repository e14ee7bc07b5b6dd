/*!
Continuous-collision-detection (CCD) tolerances.

These constants centralize the thresholds used to pick between the 1-D exact
TOI branch, the general segment-TOI branch, and the single-Newton-refinement
branch. Keeping them together makes the branch selection auditable in one
place instead of scattered through each `detect_*_collision` routine.

Notes
- Distances are in meters, time in seconds.
- Favor practical world-space tolerances over machine epsilon for robust behavior.
*/

/// Cosine threshold above which `(u0, v, a)` are treated as colinear enough to
/// take the 1-D exact-time branch instead of the general segment TOI.
pub const BYUL_TOI_COLINEAR_COS: f32 = 0.999;

/// Curvature metric threshold above which a single Newton refinement step is
/// applied to the segment-TOI estimate.
pub const BYUL_TOI_CURVATURE_THRESH: f32 = 0.25;

/// Squared-motion threshold below which a CCD call is treated as "no motion"
/// and returns a miss without evaluating the quadratic.
pub const MIN_MOTION_SQ: f32 = 1.0e-20;

/// Barycentric containment tolerance used by the triangle CCD routines.
pub const TRIANGLE_BARYCENTRIC_EPS: f32 = 1.0e-5;
