//! Closed-form continuous collision detection (CCD). Every routine here is
//! O(1): a bounded-degree polynomial solve plus, at most, a couple of single
//! Newton refinement steps. None of them loop over time.
//!
//! The common recipe (see module doc on [`crate::collision`]) is: normalize
//! inputs, reject degenerate calls (`dt <= 0`, negative radius, no motion),
//! special-case "already overlapping at `t_prev`", then solve the primitive's
//! closed-form time-of-impact equation via
//! [`crate::numal::geom::solve_quadratic_stable`].

use crate::numal::geom::{
    barycentric, barycentric_inside, earliest_root_in_range, rotate_axis_angle,
    solve_quadratic_stable, triangle_normal,
};
use crate::numal::vec3::{is_zero, kinematic, length_sq, normalize_or_zero, Vec3};
use crate::numal::Plane;

use super::settings::{BYUL_TOI_CURVATURE_THRESH, MIN_MOTION_SQ, TRIANGLE_BARYCENTRIC_EPS};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Impact {
    pub t_impact: f32,
    pub point: Vec3,
    pub normal: Vec3,
}

fn common_early_exit(dt: f32, radius: Option<f32>, motion_sq: f32) -> bool {
    if dt <= 0.0 {
        return true;
    }
    if let Some(r) = radius {
        if r < 0.0 {
            return true;
        }
    }
    motion_sq <= MIN_MOTION_SQ
}

/// Snap direction/point for "projectile already inside target at `t_prev`".
fn snap_from_center(u0: Vec3, radius: f32) -> (Vec3, Vec3) {
    let dir = if is_zero(u0) {
        Vec3::new(0.0, 1.0, 0.0)
    } else {
        normalize_or_zero(u0)
    };
    (dir, dir * radius)
}

// ---------------------------------------------------------------------
// Plane CCD
// ---------------------------------------------------------------------

pub fn detect_plane_collision(
    p0: Vec3,
    v: Vec3,
    a: Vec3,
    plane: Plane,
    t_prev: f32,
    dt: f32,
) -> Option<Impact> {
    let delta = v * dt + a * (0.5 * dt * dt);
    if common_early_exit(dt, None, length_sq(delta)) {
        return None;
    }

    let n = plane.normal;
    let s0 = plane.signed_distance(p0);
    let vn = n.dot(&v);
    let an = n.dot(&a);

    let a_coef = 0.5 * an;
    let b_coef = vn;
    let c_coef = s0;

    if let Some(roots) = solve_quadratic_stable(a_coef, b_coef, c_coef) {
        if let Some(t) = earliest_root_in_range(roots, 0.0, dt) {
            let pos = kinematic(p0, v, a, t);
            let point = plane.project(pos);
            log::trace!("detect_plane_collision: quadratic root t={t}");
            return Some(Impact {
                t_impact: t_prev + t,
                point,
                normal: n,
            });
        }
    }

    // Fallback: linear segment test between the tick endpoints.
    let pos_curr = kinematic(p0, v, a, dt);
    let s = plane.segment_intersect(p0, pos_curr)?;
    let t = s * dt;
    let pos = crate::numal::vec3::lerp(p0, pos_curr, s);
    let point = plane.project(pos);
    log::trace!("detect_plane_collision: linear fallback s={s}");
    Some(Impact {
        t_impact: t_prev + t,
        point,
        normal: n,
    })
}

// ---------------------------------------------------------------------
// Static sphere
// ---------------------------------------------------------------------

/// Earliest `s in [0,1]` such that `|u0 + s*d| = radius`, the segment-TOI
/// equation shared by every sphere routine.
fn sphere_segment_toi(u0: Vec3, d: Vec3, radius: f32) -> Option<f32> {
    let a_coef = d.dot(&d);
    let b_coef = 2.0 * u0.dot(&d);
    let c_coef = u0.dot(&u0) - radius * radius;
    let roots = solve_quadratic_stable(a_coef, b_coef, c_coef)?;
    earliest_root_in_range(roots, 0.0, 1.0)
}

pub fn detect_sphere_collision(
    p0: Vec3,
    v: Vec3,
    a: Vec3,
    center: Vec3,
    radius: f32,
    t_prev: f32,
    dt: f32,
) -> Option<Impact> {
    let u0 = p0 - center;
    let delta = v * dt + a * (0.5 * dt * dt);
    if common_early_exit(dt, Some(radius), length_sq(delta)) {
        return None;
    }

    if length_sq(u0) <= radius * radius {
        let (normal, offset) = snap_from_center(u0, radius);
        return Some(Impact {
            t_impact: t_prev,
            point: center + offset,
            normal,
        });
    }

    let d = delta;
    let s = sphere_segment_toi(u0, d, radius)?;
    let t = s * dt;
    let pos = kinematic(p0, v, a, t);
    let normal = normalize_or_zero(pos - center);
    Some(Impact {
        t_impact: t_prev + t,
        point: center + normal * radius,
        normal,
    })
}

/// Curvature metric `kappa = |a_perp| * dt / (|v_mid| + 1e-6)` used to decide
/// whether the segment-TOI estimate needs a Newton refinement.
fn curvature_metric(v: Vec3, a: Vec3, dt: f32) -> f32 {
    let v_mid = v + a * (0.5 * dt);
    let v_mid_sq = v_mid.dot(&v_mid);
    let a_perp = if v_mid_sq > 1.0e-12 {
        a - v_mid * (a.dot(&v_mid) / v_mid_sq)
    } else {
        a
    };
    a_perp.norm() * dt / (v_mid.norm() + 1.0e-6)
}

fn sphere_toi_residual(p0: Vec3, v: Vec3, a: Vec3, center: Vec3, radius: f32, t: f32) -> f32 {
    let pos = kinematic(p0, v, a, t);
    length_sq(pos - center) - radius * radius
}

fn sphere_toi_residual_deriv(p0: Vec3, v: Vec3, a: Vec3, center: Vec3, t: f32) -> f32 {
    let pos = kinematic(p0, v, a, t);
    let vel = v + a * t;
    2.0 * (pos - center).dot(&vel)
}

fn newton_step(
    p0: Vec3,
    v: Vec3,
    a: Vec3,
    center: Vec3,
    radius: f32,
    t0: f32,
    dt: f32,
) -> f32 {
    let f = sphere_toi_residual(p0, v, a, center, radius, t0);
    let fp = sphere_toi_residual_deriv(p0, v, a, center, t0);
    if fp.abs() <= 1.0e-9 {
        return t0;
    }
    (t0 - f / fp).clamp(0.0, dt)
}

pub fn detect_sphere_collision_precise(
    p0: Vec3,
    v: Vec3,
    a: Vec3,
    center: Vec3,
    radius: f32,
    t_prev: f32,
    dt: f32,
) -> Option<Impact> {
    let u0 = p0 - center;
    let delta = v * dt + a * (0.5 * dt * dt);
    if common_early_exit(dt, Some(radius), length_sq(delta)) {
        return None;
    }

    if length_sq(u0) <= radius * radius {
        let (normal, offset) = snap_from_center(u0, radius);
        return Some(Impact {
            t_impact: t_prev,
            point: center + offset,
            normal,
        });
    }

    if let Some(t) = colinear_1d_sphere_toi(u0, v, a, radius, dt) {
        let pos = kinematic(p0, v, a, t);
        let normal = normalize_or_zero(pos - center);
        log::trace!("detect_sphere_collision_precise: 1D exact branch t={t}");
        return Some(Impact {
            t_impact: t_prev + t,
            point: center + normal * radius,
            normal,
        });
    }

    let s0 = sphere_segment_toi(u0, delta, radius)?;
    let mut t = s0 * dt;

    let kappa = curvature_metric(v, a, dt);
    if kappa > BYUL_TOI_CURVATURE_THRESH {
        t = newton_step(p0, v, a, center, radius, t, dt);
        log::trace!("detect_sphere_collision_precise: newton refine kappa={kappa} t={t}");
    }

    let pos = kinematic(p0, v, a, t);
    let normal = normalize_or_zero(pos - center);
    Some(Impact {
        t_impact: t_prev + t,
        point: center + normal * radius,
        normal,
    })
}

/// 1-D exact branch used when `(u0, v, a)` are nearly colinear: project onto
/// a principal axis picked in priority order `(v, a, u0)` and solve
/// `x(t) = +-radius` directly.
fn colinear_1d_sphere_toi(u0: Vec3, v: Vec3, a: Vec3, radius: f32, dt: f32) -> Option<f32> {
    use crate::numal::vec3::nearly_colinear_default as colinear;

    let reference = if !is_zero(v) {
        v
    } else if !is_zero(a) {
        a
    } else if !is_zero(u0) {
        u0
    } else {
        return None;
    };

    let all_colinear = colinear(v, reference) && colinear(a, reference) && colinear(u0, reference);
    if !all_colinear {
        return None;
    }

    let axis = normalize_or_zero(reference);
    let u0s = u0.dot(&axis);
    let vs = v.dot(&axis);
    let as_ = a.dot(&axis);

    let mut best: Option<f32> = None;
    for target in [radius, -radius] {
        if let Some(roots) = solve_quadratic_stable(0.5 * as_, vs, u0s - target) {
            if let Some(t) = earliest_root_in_range(roots, 0.0, dt) {
                best = Some(match best {
                    Some(b) if b <= t => b,
                    _ => t,
                });
            }
        }
    }
    best
}

// ---------------------------------------------------------------------
// Moving sphere
// ---------------------------------------------------------------------

pub fn detect_sphere_collision_moving(
    p0: Vec3,
    v_p: Vec3,
    a_p: Vec3,
    c0: Vec3,
    v_c: Vec3,
    a_c: Vec3,
    radius: f32,
    t_prev: f32,
    dt: f32,
) -> Option<Impact> {
    let u0 = p0 - c0;
    let v_rel = v_p - v_c;
    let a_rel = a_p - a_c;
    let delta = v_rel * dt + a_rel * (0.5 * dt * dt);

    if common_early_exit(dt, Some(radius), length_sq(delta)) {
        return None;
    }

    if length_sq(u0) <= radius * radius {
        let (normal, offset) = snap_from_center(u0, radius);
        return Some(Impact {
            t_impact: t_prev,
            point: c0 + offset,
            normal,
        });
    }

    let s = sphere_segment_toi(u0, delta, radius)?;
    let t = s * dt;
    let proj_pos = kinematic(p0, v_p, a_p, t);
    let target_pos = kinematic(c0, v_c, a_c, t);
    let normal = normalize_or_zero(proj_pos - target_pos);
    Some(Impact {
        t_impact: t_prev + t,
        point: target_pos + normal * radius,
        normal,
    })
}

pub fn detect_sphere_collision_moving_precise(
    p0: Vec3,
    v_p: Vec3,
    a_p: Vec3,
    c0: Vec3,
    v_c: Vec3,
    a_c: Vec3,
    radius: f32,
    t_prev: f32,
    dt: f32,
) -> Option<Impact> {
    let u0 = p0 - c0;
    let v_rel = v_p - v_c;
    let a_rel = a_p - a_c;
    let delta = v_rel * dt + a_rel * (0.5 * dt * dt);

    if common_early_exit(dt, Some(radius), length_sq(delta)) {
        return None;
    }

    if length_sq(u0) <= radius * radius {
        let (normal, offset) = snap_from_center(u0, radius);
        return Some(Impact {
            t_impact: t_prev,
            point: c0 + offset,
            normal,
        });
    }

    let impact_from_t = |t: f32| -> Impact {
        let proj_pos = kinematic(p0, v_p, a_p, t);
        let target_pos = kinematic(c0, v_c, a_c, t);
        let normal = normalize_or_zero(proj_pos - target_pos);
        Impact {
            t_impact: t_prev + t,
            point: target_pos + normal * radius,
            normal,
        }
    };

    let relative_residual = |t: f32| -> f32 {
        let rel_pos = kinematic(u0, v_rel, a_rel, t);
        length_sq(rel_pos) - radius * radius
    };

    if let Some(s) = sphere_segment_toi(u0, delta, radius) {
        log::trace!("detect_sphere_collision_moving_precise: segment toi s={s}");
        return Some(impact_from_t(s * dt));
    }

    // High-curvature miss fallback: seed Newton at the closest-approach
    // guess and a mirrored seed, pick whichever residual is smaller, then
    // apply two more single Newton refinements.
    let d_sq = delta.dot(&delta);
    if d_sq <= 1.0e-12 {
        return None;
    }
    let s_guess = (-u0.dot(&delta) / d_sq).clamp(0.0, 1.0);
    let t_guess = s_guess * dt;
    let t_mirror = (t_guess.min(dt - t_guess) * 2.0).clamp(0.0, dt);

    let residual_rel = |t: f32| -> f32 {
        let rel_pos = kinematic(u0, v_rel, a_rel, t);
        let vel_rel = v_rel + a_rel * t;
        2.0 * rel_pos.dot(&vel_rel)
    };

    let mut t = if relative_residual(t_guess).abs() <= relative_residual(t_mirror).abs() {
        t_guess
    } else {
        t_mirror
    };

    for _ in 0..2 {
        let f = relative_residual(t);
        let fp = residual_rel(t);
        if fp.abs() <= 1.0e-9 {
            break;
        }
        t = (t - f / fp).clamp(0.0, dt);
    }

    if relative_residual(t).abs() > radius.max(1.0) * 1.0e-2 {
        return None;
    }
    log::trace!("detect_sphere_collision_moving_precise: newton fallback t={t}");
    Some(impact_from_t(t))
}

// ---------------------------------------------------------------------
// Triangle
// ---------------------------------------------------------------------

/// Moving (translating, non-rotating) triangle. Normal is fixed at `t_prev`.
pub fn detect_triangle_collision_moving(
    p0: Vec3,
    v: Vec3,
    a: Vec3,
    tri: [Vec3; 3],
    tri_v: Vec3,
    tri_a: Vec3,
    t_prev: f32,
    dt: f32,
) -> Option<Impact> {
    let n = triangle_normal(tri[0], tri[1], tri[2]);
    let delta = (v - tri_v) * dt + (a - tri_a) * (0.5 * dt * dt);
    if common_early_exit(dt, None, length_sq(delta)) {
        return None;
    }

    let s0 = n.dot(&(p0 - tri[0]));
    let vn = n.dot(&(v - tri_v));
    let an = n.dot(&(a - tri_a));

    let roots = solve_quadratic_stable(0.5 * an, vn, s0)?;
    let t = earliest_root_in_range(roots, 0.0, dt)?;

    let pos = kinematic(p0, v, a, t);
    let tri_at_t = [
        kinematic(tri[0], tri_v, tri_a, t),
        kinematic(tri[1], tri_v, tri_a, t),
        kinematic(tri[2], tri_v, tri_a, t),
    ];
    let point = pos - n * n.dot(&(pos - tri_at_t[0]));
    let (u, v_b, w) = barycentric(point, tri_at_t[0], tri_at_t[1], tri_at_t[2]);
    if !barycentric_inside(u, v_b, w, TRIANGLE_BARYCENTRIC_EPS) {
        return None;
    }

    Some(Impact {
        t_impact: t_prev + t,
        point,
        normal: n,
    })
}

fn rotated_triangle(tri: [Vec3; 3], center: Vec3, axis: Vec3, theta: f32) -> [Vec3; 3] {
    [
        center + rotate_axis_angle(tri[0] - center, axis, theta),
        center + rotate_axis_angle(tri[1] - center, axis, theta),
        center + rotate_axis_angle(tri[2] - center, axis, theta),
    ]
}

/// Constant angular velocity about `tri_center`, plus translation.
pub fn detect_triangle_collision_rotating(
    p0: Vec3,
    v: Vec3,
    a: Vec3,
    tri: [Vec3; 3],
    tri_center: Vec3,
    omega: Vec3,
    tri_v: Vec3,
    tri_a: Vec3,
    t_prev: f32,
    dt: f32,
) -> Option<Impact> {
    let n0 = triangle_normal(tri[0], tri[1], tri[2]);
    let delta = (v - tri_v) * dt + (a - tri_a) * (0.5 * dt * dt);
    if common_early_exit(dt, None, length_sq(delta)) {
        return None;
    }

    let s0 = n0.dot(&(p0 - tri[0]));
    let vn = n0.dot(&(v - tri_v));
    let an = n0.dot(&(a - tri_a));
    let roots = solve_quadratic_stable(0.5 * an, vn, s0)?;

    let omega_mag = omega.norm();
    let omega_axis = normalize_or_zero(omega);

    let mut candidates = [roots.0, roots.1];
    candidates.sort_by(|a, b| a.partial_cmp(b).unwrap());

    for t in candidates {
        if !(0.0..=dt).contains(&t) {
            continue;
        }
        let theta = omega_mag * t;
        let translated_center = kinematic(tri_center, tri_v, tri_a, t);
        let tri_at_t = rotated_triangle(tri, tri_center, omega_axis, theta)
            .map(|vtx| vtx + (translated_center - tri_center));
        let n_t = triangle_normal(tri_at_t[0], tri_at_t[1], tri_at_t[2]);
        let pos = kinematic(p0, v, a, t);
        let point = pos - n_t * n_t.dot(&(pos - tri_at_t[0]));
        let (u, v_b, w) = barycentric(point, tri_at_t[0], tri_at_t[1], tri_at_t[2]);
        if barycentric_inside(u, v_b, w, TRIANGLE_BARYCENTRIC_EPS) {
            return Some(Impact {
                t_impact: t_prev + t,
                point,
                normal: n_t,
            });
        }
    }
    None
}

/// Constant angular acceleration about a fixed axis `k_hat`:
/// `theta(t) = (omega0.k)*t + 0.5*(alpha.k)*t^2`.
pub fn detect_triangle_collision_rotating_alpha(
    p0: Vec3,
    v: Vec3,
    a: Vec3,
    tri: [Vec3; 3],
    tri_center: Vec3,
    axis: Vec3,
    omega0: Vec3,
    alpha: Vec3,
    tri_v: Vec3,
    tri_a: Vec3,
    t_prev: f32,
    dt: f32,
) -> Option<Impact> {
    let n0 = triangle_normal(tri[0], tri[1], tri[2]);
    let delta = (v - tri_v) * dt + (a - tri_a) * (0.5 * dt * dt);
    if common_early_exit(dt, None, length_sq(delta)) {
        return None;
    }

    let s0 = n0.dot(&(p0 - tri[0]));
    let vn = n0.dot(&(v - tri_v));
    let an = n0.dot(&(a - tri_a));
    let roots = solve_quadratic_stable(0.5 * an, vn, s0)?;

    let k = normalize_or_zero(axis);
    let omega_k = omega0.dot(&k);
    let alpha_k = alpha.dot(&k);

    let mut candidates = [roots.0, roots.1];
    candidates.sort_by(|a, b| a.partial_cmp(b).unwrap());

    for t in candidates {
        if !(0.0..=dt).contains(&t) {
            continue;
        }
        let theta = omega_k * t + 0.5 * alpha_k * t * t;
        let translated_center = kinematic(tri_center, tri_v, tri_a, t);
        let tri_at_t = rotated_triangle(tri, tri_center, k, theta)
            .map(|vtx| vtx + (translated_center - tri_center));
        let n_t = triangle_normal(tri_at_t[0], tri_at_t[1], tri_at_t[2]);
        let pos = kinematic(p0, v, a, t);
        let point = pos - n_t * n_t.dot(&(pos - tri_at_t[0]));
        let (u, v_b, w) = barycentric(point, tri_at_t[0], tri_at_t[1], tri_at_t[2]);
        if barycentric_inside(u, v_b, w, TRIANGLE_BARYCENTRIC_EPS) {
            return Some(Impact {
                t_impact: t_prev + t,
                point,
                normal: n_t,
            });
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_plane_linear_crossing() {
        let plane = Plane::new(Vec3::new(0.0, 0.0, 1.0), 0.0);
        let hit = detect_plane_collision(
            Vec3::new(0.0, 0.0, -1.0),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::zeros(),
            plane,
            10.0,
            2.0,
        )
        .expect("expected a hit");
        assert!((hit.t_impact - 11.0).abs() < 1.0e-4);
        assert!((hit.point - Vec3::new(0.0, 0.0, 0.0)).norm() < 1.0e-4);
    }

    #[test]
    fn scenario_static_sphere_linear_approach() {
        let hit = detect_sphere_collision(
            Vec3::new(-2.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::zeros(),
            Vec3::zeros(),
            1.0,
            5.0,
            3.0,
        )
        .expect("expected a hit");
        assert!((hit.t_impact - 6.0).abs() < 1.0e-4);
        assert!((hit.point - Vec3::new(-1.0, 0.0, 0.0)).norm() < 1.0e-4);
    }

    #[test]
    fn scenario_moving_sphere_counter_move() {
        let hit = detect_sphere_collision_moving(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::zeros(),
            Vec3::new(3.0, 0.0, 0.0),
            Vec3::new(-1.0, 0.0, 0.0),
            Vec3::zeros(),
            0.5,
            0.0,
            2.0,
        )
        .expect("expected a hit");
        assert!((hit.t_impact - 1.25).abs() < 1.0e-4);
        assert!((hit.point.x - 1.25).abs() < 1.0e-3);
    }

    #[test]
    fn dt_non_positive_returns_none() {
        assert!(detect_sphere_collision(
            Vec3::zeros(),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::zeros(),
            Vec3::new(5.0, 0.0, 0.0),
            1.0,
            0.0,
            0.0,
        )
        .is_none());
    }

    #[test]
    fn start_inside_sphere_snaps_at_t_prev() {
        let hit = detect_sphere_collision(
            Vec3::new(0.2, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::zeros(),
            Vec3::zeros(),
            1.0,
            5.0,
            1.0,
        )
        .expect("expected inside hit");
        assert_eq!(hit.t_impact, 5.0);
        assert!((hit.point.norm() - 1.0).abs() < 1.0e-4);
    }

    #[test]
    fn no_motion_returns_none() {
        assert!(detect_sphere_collision(
            Vec3::new(-5.0, 0.0, 0.0),
            Vec3::zeros(),
            Vec3::zeros(),
            Vec3::zeros(),
            1.0,
            0.0,
            1.0,
        )
        .is_none());
    }
}
