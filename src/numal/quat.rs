//! Quaternion kernel. `Quat` is [`nalgebra::UnitQuaternion<f32>`]; this module
//! adds the six-ordering Euler conversion and the short-arc slerp contract the
//! rest of the crate (especially [`super::dualquat`]) depends on.
//!
//! The library never silently renormalizes a `Quat` that arrives already
//! assumed-unit; callers are expected to construct it through one of the
//! constructors below, which do normalize.

use nalgebra as na;

pub type Quat = na::UnitQuaternion<f32>;

/// The six Tait-Bryan orderings the source supports. The order name lists the
/// quaternion multiplication left-to-right: `Zyx` composes `qz * qy * qx`,
/// i.e. `x` is applied to the vector first (innermost), `z` last (outermost).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EulerOrder {
    Zyx,
    Xyz,
    Xzy,
    Yxz,
    Yzx,
    Zxy,
}

/// Builds a unit quaternion from an axis-angle pair, treating a zero-length
/// axis as "no rotation" (identity) rather than producing `NaN`.
pub fn from_axis_angle(axis: super::vec3::Vec3, angle: f32) -> Quat {
    if super::vec3::is_zero(axis) {
        return Quat::identity();
    }
    let unit_axis = na::Unit::new_normalize(axis);
    Quat::from_axis_angle(&unit_axis, angle)
}

pub fn from_euler(order: EulerOrder, x: f32, y: f32, z: f32) -> Quat {
    let qx = Quat::from_axis_angle(&na::Vector3::x_axis(), x);
    let qy = Quat::from_axis_angle(&na::Vector3::y_axis(), y);
    let qz = Quat::from_axis_angle(&na::Vector3::z_axis(), z);
    match order {
        EulerOrder::Zyx => qz * qy * qx,
        EulerOrder::Xyz => qx * qy * qz,
        EulerOrder::Xzy => qx * qz * qy,
        EulerOrder::Yxz => qy * qx * qz,
        EulerOrder::Yzx => qy * qz * qx,
        EulerOrder::Zxy => qz * qx * qy,
    }
}

/// Recovers `(x, y, z)` radians for the given ordering. Within `1e-4` rad of
/// the same order's `from_euler` output except at gimbal locks, per spec.
pub fn to_euler(q: Quat, order: EulerOrder) -> (f32, f32, f32) {
    let m = q.to_rotation_matrix();
    let m = m.matrix();
    let asin_clamped = |v: f32| v.clamp(-1.0, 1.0).asin();

    match order {
        EulerOrder::Zyx => {
            let y = asin_clamped(-m[(2, 0)]);
            let x = m[(2, 1)].atan2(m[(2, 2)]);
            let z = m[(1, 0)].atan2(m[(0, 0)]);
            (x, y, z)
        }
        EulerOrder::Xyz => {
            let y = asin_clamped(m[(0, 2)]);
            let x = (-m[(1, 2)]).atan2(m[(2, 2)]);
            let z = (-m[(0, 1)]).atan2(m[(0, 0)]);
            (x, y, z)
        }
        EulerOrder::Xzy => {
            let z = asin_clamped(-m[(0, 1)]);
            let x = m[(2, 1)].atan2(m[(1, 1)]);
            let y = m[(0, 2)].atan2(m[(0, 0)]);
            (x, y, z)
        }
        EulerOrder::Yxz => {
            let x = asin_clamped(-m[(1, 2)]);
            let y = m[(0, 2)].atan2(m[(2, 2)]);
            let z = m[(1, 0)].atan2(m[(1, 1)]);
            (x, y, z)
        }
        EulerOrder::Yzx => {
            let z = asin_clamped(m[(1, 0)]);
            let x = (-m[(1, 2)]).atan2(m[(1, 1)]);
            let y = (-m[(2, 0)]).atan2(m[(0, 0)]);
            (x, y, z)
        }
        EulerOrder::Zxy => {
            let x = asin_clamped(m[(2, 1)]);
            let y = (-m[(2, 0)]).atan2(m[(2, 2)]);
            let z = (-m[(0, 1)]).atan2(m[(1, 1)]);
            (x, y, z)
        }
    }
}

/// Short-arc slerp: flips the sign of `b` when `a.dot(b) < 0` so interpolation
/// always takes the shorter of the two arcs, then defers to nalgebra's
/// quaternion slerp.
pub fn slerp(a: Quat, b: Quat, t: f32) -> Quat {
    let dot = a.into_inner().coords.dot(&b.into_inner().coords);
    let b = if dot < 0.0 { Quat::new_unchecked(-b.into_inner()) } else { b };
    a.slerp(&b, t)
}

pub fn identity() -> Quat {
    Quat::identity()
}

pub fn forward(q: Quat) -> super::vec3::Vec3 {
    q * super::vec3::Vec3::new(0.0, 0.0, -1.0)
}

pub fn up(q: Quat) -> super::vec3::Vec3 {
    q * super::vec3::Vec3::new(0.0, 1.0, 0.0)
}

pub fn right(q: Quat) -> super::vec3::Vec3 {
    q * super::vec3::Vec3::new(1.0, 0.0, 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::vec3::Vec3;

    fn assert_close(a: f32, b: f32, eps: f32) {
        assert!((a - b).abs() <= eps, "{a} != {b} within {eps}");
    }

    #[test]
    fn slerp_identity_returns_same_quat() {
        let q = from_axis_angle(Vec3::new(0.0, 1.0, 0.0), 0.7);
        let r = slerp(q, q, 0.5);
        assert_close(r.angle_to(&q), 0.0, 1.0e-5);
    }

    #[test]
    fn slerp_endpoints_match_inputs() {
        let a = Quat::identity();
        let b = from_axis_angle(Vec3::new(0.0, 0.0, 1.0), 1.2);
        assert_close(slerp(a, b, 0.0).angle_to(&a), 0.0, 1.0e-5);
        assert_close(slerp(a, b, 1.0).angle_to(&b), 0.0, 1.0e-5);
    }

    #[test]
    fn euler_round_trip_away_from_gimbal_lock() {
        for &order in &[
            EulerOrder::Zyx,
            EulerOrder::Xyz,
            EulerOrder::Xzy,
            EulerOrder::Yxz,
            EulerOrder::Yzx,
            EulerOrder::Zxy,
        ] {
            let (x0, y0, z0) = (0.3, 0.2, -0.4);
            let q = from_euler(order, x0, y0, z0);
            let (x1, y1, z1) = to_euler(q, order);
            let q2 = from_euler(order, x1, y1, z1);
            assert_close(q.angle_to(&q2), 0.0, 1.0e-3);
        }
    }

    #[test]
    fn from_axis_angle_zero_axis_is_identity() {
        let q = from_axis_angle(Vec3::zeros(), 1.0);
        assert_eq!(q, Quat::identity());
    }
}
