//! Rigid(+scale) transform: `(position, rotation, scale)`. Position is hard
//! clamped to `[XFORM_POS_MIN, XFORM_POS_MAX]` on every setter and translate.

use nalgebra as na;

use super::quat::Quat;
use super::settings::{XFORM_POS_MAX, XFORM_POS_MIN};
use super::vec3::Vec3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

fn clamp_position(p: Vec3) -> Vec3 {
    Vec3::new(
        p.x.clamp(XFORM_POS_MIN, XFORM_POS_MAX),
        p.y.clamp(XFORM_POS_MIN, XFORM_POS_MAX),
        p.z.clamp(XFORM_POS_MIN, XFORM_POS_MAX),
    )
}

impl Default for Transform {
    fn default() -> Self {
        Transform {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    pub fn new(position: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Transform {
            position: clamp_position(position),
            rotation,
            scale,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn set_position(&mut self, p: Vec3) {
        self.position = clamp_position(p);
    }

    pub fn translate(&mut self, delta: Vec3) {
        self.position = clamp_position(self.position + delta);
    }

    /// Applies this transform to a local-space point.
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        self.position + self.rotation * p.component_mul(&self.scale)
    }

    /// Inverse transform: `position = -R^-1 * p / scale`... expressed as
    /// applying the inverse rotation/scale/translation in reverse order.
    pub fn inverse_transform_point(&self, p: Vec3) -> Vec3 {
        let local = self.rotation.inverse() * (p - self.position);
        Vec3::new(
            if self.scale.x.abs() > 1.0e-12 { local.x / self.scale.x } else { 0.0 },
            if self.scale.y.abs() > 1.0e-12 { local.y / self.scale.y } else { 0.0 },
            if self.scale.z.abs() > 1.0e-12 { local.z / self.scale.z } else { 0.0 },
        )
    }

    /// Column-major 4x4 matrix export.
    pub fn to_matrix4(&self) -> na::Matrix4<f32> {
        let scale_mat = na::Matrix3::from_diagonal(&self.scale);
        let rot_mat = self.rotation.to_rotation_matrix().into_inner();
        let linear = rot_mat * scale_mat;

        let mut m = na::Matrix4::identity();
        m.fixed_view_mut::<3, 3>(0, 0).copy_from(&linear);
        m.fixed_view_mut::<3, 1>(0, 3).copy_from(&self.position);
        m
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numal::quat::from_axis_angle;

    #[test]
    fn inverse_round_trips_any_point() {
        let t = Transform::new(
            Vec3::new(3.0, -2.0, 5.0),
            from_axis_angle(Vec3::new(0.0, 1.0, 0.0), 0.9),
            Vec3::new(2.0, 2.0, 2.0),
        );
        let p = Vec3::new(1.0, 2.0, 3.0);
        let world = t.transform_point(p);
        let back = t.inverse_transform_point(world);
        assert!((back - p).norm() < 1.0e-4);
    }

    #[test]
    fn position_is_clamped() {
        let mut t = Transform::default();
        t.set_position(Vec3::new(1.0e9, -1.0e9, 0.0));
        assert!(t.position().x <= XFORM_POS_MAX);
        assert!(t.position().y >= XFORM_POS_MIN);
    }

    #[test]
    fn translate_accumulates_and_clamps() {
        let mut t = Transform::default();
        t.translate(Vec3::new(1.0, 0.0, 0.0));
        t.translate(Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(t.position(), Vec3::new(2.0, 0.0, 0.0));
    }
}
