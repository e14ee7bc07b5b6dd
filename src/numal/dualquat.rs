//! Dual quaternion: a `(real, dual)` pair of raw [`nalgebra::Quaternion<f32>`]
//! representing a rigid motion. `real` is conceptually unit but stored as a
//! raw quaternion (not `UnitQuaternion`) because the dual part is never unit,
//! and keeping both halves the same underlying type keeps the componentwise
//! interpolation operations (`lerp`, weighted blend) simple.

use nalgebra as na;

use super::quat::Quat;
use super::vec3::Vec3;

pub type RawQuat = na::Quaternion<f32>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DualQuat {
    pub real: RawQuat,
    pub dual: RawQuat,
}

fn vec_quat(v: Vec3) -> RawQuat {
    RawQuat::new(0.0, v.x, v.y, v.z)
}

impl DualQuat {
    /// Builds a dual quaternion from a rotation `q` and a translation `t`:
    /// `real = q`, `dual = 0.5 * (t_q * q)`.
    pub fn from_rotation_translation(q: Quat, t: Vec3) -> Self {
        let real = *q.quaternion();
        let t_q = vec_quat(t);
        let dual = (t_q * real).scale(0.5);
        DualQuat { real, dual }
    }

    pub fn identity() -> Self {
        DualQuat {
            real: RawQuat::identity(),
            dual: RawQuat::new(0.0, 0.0, 0.0, 0.0),
        }
    }

    /// Recovers `(q, t)`, where `t = 2 * (dual * conj(real)).xyz`.
    pub fn to_rotation_translation(self) -> (Quat, Vec3) {
        let q = Quat::new_normalize(self.real);
        let t_raw = (self.dual * self.real.conjugate()).scale(2.0);
        (q, Vec3::new(t_raw.i, t_raw.j, t_raw.k))
    }

    /// Normalizes in place: zeroes to identity if `|real|` underflows,
    /// otherwise normalizes `real` and divides `dual` by the same norm so the
    /// two halves stay consistent.
    pub fn normalize(self) -> Self {
        let norm = self.real.norm();
        if norm < 1.0e-8 {
            return Self::identity();
        }
        DualQuat {
            real: self.real.scale(1.0 / norm),
            dual: self.dual.scale(1.0 / norm),
        }
    }

    /// Flips both halves if `real.w < 0`, keeping interpolation on the short arc.
    pub fn aligned_to(self, reference: Self) -> Self {
        if reference.real.coords.dot(&self.real.coords) < 0.0 {
            DualQuat {
                real: -self.real,
                dual: -self.dual,
            }
        } else {
            self
        }
    }

    pub fn apply_to_point(self, v: Vec3) -> Vec3 {
        let r = self.real.transform_vector(&v);
        let t_raw = (self.dual * self.real.conjugate()).scale(2.0);
        r + Vec3::new(t_raw.i, t_raw.j, t_raw.k)
    }

    pub fn mul(self, rhs: Self) -> Self {
        DualQuat {
            real: self.real * rhs.real,
            dual: self.real * rhs.dual + self.dual * rhs.real,
        }
    }

    pub fn conjugate(self) -> Self {
        DualQuat {
            real: self.real.conjugate(),
            dual: self.dual.conjugate(),
        }
    }
}

trait TransformVector {
    fn transform_vector(&self, v: &Vec3) -> Vec3;
}

impl TransformVector for RawQuat {
    fn transform_vector(&self, v: &Vec3) -> Vec3 {
        let vq = vec_quat(*v);
        let r = *self * vq * self.conjugate();
        Vec3::new(r.i, r.j, r.k)
    }
}

/// Linear interpolation: aligns `b` to `a`, lerps both halves componentwise,
/// then re-normalizes.
pub fn lerp(a: DualQuat, b: DualQuat, t: f32) -> DualQuat {
    let b = b.aligned_to(a);
    let real = a.real + (b.real - a.real).scale(t);
    let dual = a.dual + (b.dual - a.dual).scale(t);
    DualQuat { real, dual }.normalize()
}

/// Alias for [`lerp`]; kept distinct in the public surface because the source
/// exposes both names even though their bodies coincide.
pub fn nlerp(a: DualQuat, b: DualQuat, t: f32) -> DualQuat {
    lerp(a, b, t)
}

/// Slerps the rotation halves and linearly interpolates the translations
/// recovered from each operand's dual part.
pub fn slerp(a: DualQuat, b: DualQuat, t: f32) -> DualQuat {
    let b = b.aligned_to(a);
    let (qa, ta) = a.to_rotation_translation();
    let (qb, tb) = b.to_rotation_translation();
    let q = super::quat::slerp(qa, qb, t);
    let tr = super::vec3::lerp(ta, tb, t);
    DualQuat::from_rotation_translation(q, tr)
}

/// Weighted blend of any number of aligned dual quaternions, followed by
/// normalization.
pub fn blend_weighted(parts: &[(DualQuat, f32)]) -> DualQuat {
    let Some(&(first, _)) = parts.first() else {
        return DualQuat::identity();
    };
    let mut real_acc = RawQuat::new(0.0, 0.0, 0.0, 0.0);
    let mut dual_acc = RawQuat::new(0.0, 0.0, 0.0, 0.0);
    for &(dq, w) in parts {
        let dq = dq.aligned_to(first);
        real_acc += dq.real.scale(w);
        dual_acc += dq.dual.scale(w);
    }
    DualQuat {
        real: real_acc,
        dual: dual_acc,
    }
    .normalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numal::quat::from_axis_angle;

    #[test]
    fn from_rotation_translation_round_trips() {
        let q = from_axis_angle(Vec3::new(0.0, 1.0, 0.0), 0.6);
        let t = Vec3::new(1.0, -2.0, 3.5);
        let dq = DualQuat::from_rotation_translation(q, t);
        let (q2, t2) = dq.to_rotation_translation();
        assert!(q.angle_to(&q2) < 1.0e-5 || (-q2.into_inner()).into_inner() == q2.into_inner());
        assert!((t2 - t).norm() < 1.0e-4);
    }

    #[test]
    fn identity_applies_as_identity() {
        let dq = DualQuat::identity();
        let p = Vec3::new(1.0, 2.0, 3.0);
        assert!((dq.apply_to_point(p) - p).norm() < 1.0e-6);
    }

    #[test]
    fn lerp_at_zero_and_one_matches_endpoints() {
        let q0 = from_axis_angle(Vec3::new(1.0, 0.0, 0.0), 0.0);
        let q1 = from_axis_angle(Vec3::new(0.0, 0.0, 1.0), 1.0);
        let a = DualQuat::from_rotation_translation(q0, Vec3::new(0.0, 0.0, 0.0));
        let b = DualQuat::from_rotation_translation(q1, Vec3::new(2.0, 0.0, 0.0));
        let (_, t0) = lerp(a, b, 0.0).to_rotation_translation();
        let (_, t1) = lerp(a, b, 1.0).to_rotation_translation();
        assert!((t0 - Vec3::new(0.0, 0.0, 0.0)).norm() < 1.0e-4);
        assert!((t1 - Vec3::new(2.0, 0.0, 0.0)).norm() < 1.0e-4);
    }
}
