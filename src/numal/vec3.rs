//! 3-vector kernel. `Vec3` is a bare alias over [`nalgebra::Vector3<f32>`];
//! component arithmetic, `dot`, and `cross` are used directly from nalgebra.
//! This module only adds the policy-bearing operations the rest of the crate
//! depends on: zero-length tests, relative-epsilon equality, colinearity, and
//! the kinematic projection used throughout collision and integration.

use nalgebra as na;

use super::settings::{COLINEAR_COS_DEFAULT, EPS_LEN, EPS_LEN2, FLOAT_EQUAL_EPS};

pub type Vec3 = na::Vector3<f32>;

/// Squared length. The universal "is this the zero vector" test compares this
/// against [`EPS_LEN2`], not against zero exactly.
#[inline]
pub fn length_sq(v: Vec3) -> f32 {
    v.norm_squared()
}

#[inline]
pub fn length(v: Vec3) -> f32 {
    v.norm()
}

#[inline]
pub fn is_zero(v: Vec3) -> bool {
    length_sq(v) <= EPS_LEN2
}

#[inline]
pub fn is_zero_length(v: Vec3) -> bool {
    length(v) <= EPS_LEN
}

/// Normalizes `v`, returning the zero vector instead of `NaN` when
/// `length_sq(v) <= EPS_LEN2`.
#[inline]
pub fn normalize_or_zero(v: Vec3) -> Vec3 {
    if is_zero(v) {
        Vec3::zeros()
    } else {
        v / length(v)
    }
}

#[inline]
pub fn lerp(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    a + (b - a) * t
}

/// Kinematic projection `p + v*t + 0.5*a*t^2`, the model used everywhere in
/// this crate in preference to linear interpolation between tick endpoints.
#[inline]
pub fn kinematic(p: Vec3, v: Vec3, a: Vec3, t: f32) -> Vec3 {
    p + v * t + a * (0.5 * t * t)
}

/// Relative-epsilon scalar equality: `|a-b| <= eps * max(1, |a|, |b|)`.
#[inline]
pub fn float_equal(a: f32, b: f32) -> bool {
    float_equal_eps(a, b, FLOAT_EQUAL_EPS)
}

#[inline]
pub fn float_equal_eps(a: f32, b: f32, eps: f32) -> bool {
    let scale = 1.0_f32.max(a.abs()).max(b.abs());
    (a - b).abs() <= eps * scale
}

/// Componentwise tolerant equality built on [`float_equal`].
#[inline]
pub fn nearly_equal(a: Vec3, b: Vec3) -> bool {
    float_equal(a.x, b.x) && float_equal(a.y, b.y) && float_equal(a.z, b.z)
}

/// Treats zero-length vectors as colinear so 1-D collision paths still work
/// when `v` or `a` vanishes.
pub fn nearly_colinear(a: Vec3, b: Vec3, cos_eps: f32) -> bool {
    let la2 = length_sq(a);
    let lb2 = length_sq(b);
    if la2 <= EPS_LEN2 || lb2 <= EPS_LEN2 {
        return true;
    }
    let cos = a.dot(&b).abs() / (la2.sqrt() * lb2.sqrt());
    cos >= cos_eps
}

pub fn nearly_colinear_default(a: Vec3, b: Vec3) -> bool {
    nearly_colinear(a, b, COLINEAR_COS_DEFAULT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_or_zero_handles_near_zero_input() {
        let v = Vec3::new(1.0e-7, 0.0, 0.0);
        assert_eq!(normalize_or_zero(v), Vec3::zeros());
    }

    #[test]
    fn normalize_or_zero_is_unit_length_otherwise() {
        let v = Vec3::new(3.0, 4.0, 0.0);
        let n = normalize_or_zero(v);
        assert!((length(n) - 1.0).abs() < 1.0e-6);
    }

    #[test]
    fn float_equal_is_relative_not_absolute() {
        assert!(float_equal(1.00001, 1.000019));
        assert!(!float_equal(1.00001, 1.000020_1));
    }

    #[test]
    fn zero_length_vectors_are_colinear_with_anything() {
        let zero = Vec3::zeros();
        let any = Vec3::new(1.0, 2.0, 3.0);
        assert!(nearly_colinear_default(zero, any));
        assert!(nearly_colinear_default(any, zero));
    }

    #[test]
    fn kinematic_matches_constant_velocity_when_accel_is_zero() {
        let p = Vec3::new(0.0, 0.0, 0.0);
        let v = Vec3::new(1.0, 0.0, 0.0);
        let a = Vec3::zeros();
        assert_eq!(kinematic(p, v, a, 2.0), Vec3::new(2.0, 0.0, 0.0));
    }
}
