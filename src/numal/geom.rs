//! Geometric primitives built on top of [`super::vec3`]: the stable quadratic
//! solver every CCD routine depends on, barycentric containment, triangle
//! normals, and Rodrigues rotation.

use super::vec3::Vec3;

/// Solves `A*t^2 + B*t + C = 0` using the Citardauq formulation
/// (`q = -0.5*(B + sign(B)*sqrt(disc))`, `t0 = q/A`, `t1 = C/q`) to avoid the
/// catastrophic cancellation of the naive quadratic formula.
///
/// Returns `(lo, hi)` with `lo <= hi`. Returns `None` only when the
/// discriminant is negative beyond rounding tolerance. Degenerates to the
/// linear case when `A` is negligible.
pub fn solve_quadratic_stable(a: f32, b: f32, c: f32) -> Option<(f32, f32)> {
    const A_EPS: f32 = 1.0e-9;

    if a.abs() <= A_EPS {
        if b.abs() <= A_EPS {
            return None;
        }
        let t = -c / b;
        return Some((t, t));
    }

    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        let tol = 1.0e-5 * (b * b).max((a * c).abs()).max(1.0);
        if disc < -tol {
            return None;
        }
        let t = -b / (2.0 * a);
        return Some((t, t));
    }

    let sqrt_disc = disc.sqrt();
    let sign_b = if b >= 0.0 { 1.0 } else { -1.0 };
    let q = -0.5 * (b + sign_b * sqrt_disc);

    if q.abs() <= f32::EPSILON {
        let t = 0.0;
        return Some((t, t));
    }

    let t0 = q / a;
    let t1 = c / q;
    Some(if t0 <= t1 { (t0, t1) } else { (t1, t0) })
}

/// Picks the earliest of the two roots that falls within `[lo, hi]`.
pub fn earliest_root_in_range(roots: (f32, f32), lo: f32, hi: f32) -> Option<f32> {
    let (t0, t1) = roots;
    if t0 >= lo && t0 <= hi {
        Some(t0)
    } else if t1 >= lo && t1 <= hi {
        Some(t1)
    } else {
        None
    }
}

/// Barycentric weights `(u, v, w)` such that `p = u*a + v*b + w*c`, assuming
/// `p` lies in the plane of the triangle.
pub fn barycentric(p: Vec3, a: Vec3, b: Vec3, c: Vec3) -> (f32, f32, f32) {
    let v0 = b - a;
    let v1 = c - a;
    let v2 = p - a;

    let d00 = v0.dot(&v0);
    let d01 = v0.dot(&v1);
    let d11 = v1.dot(&v1);
    let d20 = v2.dot(&v0);
    let d21 = v2.dot(&v1);

    let denom = d00 * d11 - d01 * d01;
    if denom.abs() <= 1.0e-12 {
        return (1.0, 0.0, 0.0);
    }

    let v = (d11 * d20 - d01 * d21) / denom;
    let w = (d00 * d21 - d01 * d20) / denom;
    let u = 1.0 - v - w;
    (u, v, w)
}

/// Containment test on barycentric weights with the spec's fixed tolerance.
pub fn barycentric_inside(u: f32, v: f32, w: f32, eps: f32) -> bool {
    let lo = -eps;
    u >= lo && v >= lo && w >= lo && (u + v + w - 1.0).abs() <= eps.max(1.0e-6)
}

pub fn triangle_normal(a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
    super::vec3::normalize_or_zero((b - a).cross(&(c - a)))
}

/// Rodrigues' rotation formula: rotates `v` about unit `axis` by `angle` radians.
pub fn rotate_axis_angle(v: Vec3, axis: Vec3, angle: f32) -> Vec3 {
    if super::vec3::is_zero(axis) || angle == 0.0 {
        return v;
    }
    let k = super::vec3::normalize_or_zero(axis);
    let (sin_a, cos_a) = angle.sin_cos();
    v * cos_a + k.cross(&v) * sin_a + k * (k.dot(&v) * (1.0 - cos_a))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solve_quadratic_stable_residual_is_small() {
        let cases: &[(f32, f32, f32)] = &[
            (1.0, -3.0, 2.0),
            (2.0, 5.0, -3.0),
            (1.0, 1.0e6, 1.0),
            (1.0, -1.0e6, 1.0),
        ];
        for &(a, b, c) in cases {
            let (t0, t1) = solve_quadratic_stable(a, b, c).expect("real roots expected");
            for t in [t0, t1] {
                let residual = (a * t * t + b * t + c).abs();
                let bound = 1.0e-3 * (1.0_f32.max(a.abs() * t * t + b.abs() * t.abs() + c.abs()));
                assert!(residual <= bound, "residual {residual} exceeds {bound}");
            }
        }
    }

    #[test]
    fn solve_quadratic_stable_no_real_roots() {
        assert_eq!(solve_quadratic_stable(1.0, 0.0, 1.0), None);
    }

    #[test]
    fn solve_quadratic_stable_linear_degenerate() {
        let (t0, t1) = solve_quadratic_stable(0.0, 2.0, -4.0).unwrap();
        assert_eq!(t0, 2.0);
        assert_eq!(t1, 2.0);
    }

    #[test]
    fn barycentric_round_trips_for_vertices() {
        let a = Vec3::new(0.0, 0.0, 0.0);
        let b = Vec3::new(1.0, 0.0, 0.0);
        let c = Vec3::new(0.0, 1.0, 0.0);
        let (u, v, w) = barycentric(a, a, b, c);
        assert!(barycentric_inside(u, v, w, 1.0e-5));
        assert!((u - 1.0).abs() < 1.0e-6);
    }

    #[test]
    fn rotate_axis_angle_quarter_turn() {
        let v = Vec3::new(1.0, 0.0, 0.0);
        let axis = Vec3::new(0.0, 0.0, 1.0);
        let r = rotate_axis_angle(v, axis, std::f32::consts::FRAC_PI_2);
        assert!((r - Vec3::new(0.0, 1.0, 0.0)).norm() < 1.0e-5);
    }
}
