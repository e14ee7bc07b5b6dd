//! Plane `(n_hat, d)` with unit normal; signed distance `dot(n_hat, x) + d`.

use super::geom::rotate_axis_angle;
use super::vec3::{is_zero, normalize_or_zero, Vec3};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub normal: Vec3,
    pub d: f32,
}

impl Plane {
    /// Normalizes `normal`; falls back to `+Y` if it is degenerate.
    pub fn new(normal: Vec3, d: f32) -> Self {
        let n = if is_zero(normal) {
            Vec3::new(0.0, 1.0, 0.0)
        } else {
            normalize_or_zero(normal)
        };
        Plane { normal: n, d }
    }

    /// Builds a plane through `point` with the given (possibly unnormalized) normal.
    pub fn from_point_normal(point: Vec3, normal: Vec3) -> Self {
        let n = if is_zero(normal) {
            Vec3::new(0.0, 1.0, 0.0)
        } else {
            normalize_or_zero(normal)
        };
        Plane {
            normal: n,
            d: -n.dot(&point),
        }
    }

    #[inline]
    pub fn signed_distance(&self, p: Vec3) -> f32 {
        self.normal.dot(&p) + self.d
    }

    pub fn project(&self, p: Vec3) -> Vec3 {
        p - self.normal * self.signed_distance(p)
    }

    /// A representative point on the plane: `-d * n_hat`.
    pub fn anchor_point(&self) -> Vec3 {
        self.normal * -self.d
    }

    pub fn flip(&self) -> Self {
        Plane {
            normal: -self.normal,
            d: -self.d,
        }
    }

    pub fn translate_along_normal(&self, delta_h: f32) -> Self {
        Plane {
            normal: self.normal,
            d: self.d - delta_h,
        }
    }

    /// Rotation about the origin: only the normal rotates, `d` is unchanged.
    pub fn rotate_axis_angle_origin(&self, axis: Vec3, angle: f32) -> Self {
        Plane {
            normal: normalize_or_zero(rotate_axis_angle(self.normal, axis, angle)),
            d: self.d,
        }
    }

    /// Rotation about an arbitrary pivot: the normal rotates and `d` is
    /// re-derived from the rotated anchor point relative to the pivot.
    pub fn rotate_axis_angle_pivot(&self, axis: Vec3, angle: f32, pivot: Vec3) -> Self {
        let new_normal = normalize_or_zero(rotate_axis_angle(self.normal, axis, angle));
        let anchor = self.anchor_point();
        let relative = anchor - pivot;
        let rotated_relative = rotate_axis_angle(relative, axis, angle);
        let new_anchor = pivot + rotated_relative;
        Plane {
            normal: new_normal,
            d: -new_normal.dot(&new_anchor),
        }
    }

    /// Ray/plane intersection; `None` if the ray is parallel to the plane.
    pub fn ray_intersect(&self, origin: Vec3, dir: Vec3) -> Option<f32> {
        let denom = self.normal.dot(&dir);
        if denom.abs() <= 1.0e-6 {
            return None;
        }
        let t = -self.signed_distance(origin) / denom;
        Some(t)
    }

    /// Segment/plane intersection parameter `s in [0,1]`, `None` if parallel
    /// or the crossing lies outside the segment.
    pub fn segment_intersect(&self, a: Vec3, b: Vec3) -> Option<f32> {
        let d = b - a;
        let denom = self.normal.dot(&d);
        if denom.abs() <= 1.0e-6 {
            return None;
        }
        let s = -self.signed_distance(a) / denom;
        if (0.0..=1.0).contains(&s) {
            Some(s)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_about_origin_preserves_d() {
        let p = Plane::new(Vec3::new(0.0, 1.0, 0.0), -5.0);
        let rotated = p.rotate_axis_angle_origin(Vec3::new(1.0, 0.0, 0.0), 0.4);
        assert_eq!(rotated.d, p.d);
    }

    #[test]
    fn rotation_about_pivot_rederives_d() {
        let p = Plane::new(Vec3::new(0.0, 1.0, 0.0), 0.0); // y = 0
        let pivot = Vec3::new(0.0, 0.0, 0.0);
        let rotated = p.rotate_axis_angle_pivot(
            Vec3::new(1.0, 0.0, 0.0),
            std::f32::consts::FRAC_PI_2,
            pivot,
        );
        // y=0 plane rotated 90deg about x through origin becomes z=0.
        assert!((rotated.normal - Vec3::new(0.0, 0.0, -1.0)).norm() < 1.0e-4
            || (rotated.normal - Vec3::new(0.0, 0.0, 1.0)).norm() < 1.0e-4);
    }

    #[test]
    fn signed_distance_sign_matches_side() {
        let p = Plane::new(Vec3::new(0.0, 0.0, 1.0), 0.0);
        assert!(p.signed_distance(Vec3::new(0.0, 0.0, 2.0)) > 0.0);
        assert!(p.signed_distance(Vec3::new(0.0, 0.0, -2.0)) < 0.0);
    }
}
