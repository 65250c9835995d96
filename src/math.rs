//! Row-encoded 3x4 affine transforms.
//!
//! Cameras, lights and instances all store their transform as three
//! `vec4<f32>` rows: `xyz` is a row of the linear part and `w` is the
//! translation component. The fourth row is implicitly `[0, 0, 0, 1]`, so
//! transforming a point costs three dot products and no divide.
//!
//! Composition is written left to right: `a.then(&b)` applies `a` first.
//!
//! # Projectors
//!
//! A projector (scene camera or light) looks down its local `+Z` axis. Its
//! view transform is the inverse of its pose followed by a focal scale on X
//! and Y; the perspective divide by `z` happens later through clip `w`.

use glam::{Mat3, Quat, Vec2, Vec3, Vec4};

/// A 3x4 affine transform stored as three rows.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Affine3x4 {
    pub rows: [Vec4; 3],
}

impl Affine3x4 {
    pub const IDENTITY: Self = Self {
        rows: [Vec4::X, Vec4::Y, Vec4::Z],
    };

    pub const fn from_rows(row_0: Vec4, row_1: Vec4, row_2: Vec4) -> Self {
        Self {
            rows: [row_0, row_1, row_2],
        }
    }

    /// Build from a linear part and a translation.
    pub fn from_linear_translation(linear: Mat3, translation: Vec3) -> Self {
        let row = |i: usize| linear.row(i).extend(translation[i]);
        Self::from_rows(row(0), row(1), row(2))
    }

    /// Scale first, then rotate, then translate.
    pub fn from_scale_rotation_translation(scale: Vec3, rotation: Quat, translation: Vec3) -> Self {
        Self::from_linear_translation(
            Mat3::from_quat(rotation) * Mat3::from_diagonal(scale),
            translation,
        )
    }

    pub fn from_translation(translation: Vec3) -> Self {
        Self::from_linear_translation(Mat3::IDENTITY, translation)
    }

    pub fn from_rotation(rotation: Quat) -> Self {
        Self::from_linear_translation(Mat3::from_quat(rotation), Vec3::ZERO)
    }

    pub fn from_scale(scale: Vec3) -> Self {
        Self::from_linear_translation(Mat3::from_diagonal(scale), Vec3::ZERO)
    }

    pub fn linear(&self) -> Mat3 {
        Mat3::from_cols(
            Vec3::new(self.rows[0].x, self.rows[1].x, self.rows[2].x),
            Vec3::new(self.rows[0].y, self.rows[1].y, self.rows[2].y),
            Vec3::new(self.rows[0].z, self.rows[1].z, self.rows[2].z),
        )
    }

    pub fn translation(&self) -> Vec3 {
        Vec3::new(self.rows[0].w, self.rows[1].w, self.rows[2].w)
    }

    /// Transform a point: three dot products against `(p, 1)`.
    #[inline]
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        let p = point.extend(1.0);
        Vec3::new(self.rows[0].dot(p), self.rows[1].dot(p), self.rows[2].dot(p))
    }

    /// Transform a direction, ignoring translation.
    #[inline]
    pub fn transform_vector(&self, vector: Vec3) -> Vec3 {
        let v = vector.extend(0.0);
        Vec3::new(self.rows[0].dot(v), self.rows[1].dot(v), self.rows[2].dot(v))
    }

    /// Apply `self`, then `next`.
    pub fn then(&self, next: &Affine3x4) -> Affine3x4 {
        let linear = next.linear() * self.linear();
        let translation = next.transform_point(self.translation());
        Self::from_linear_translation(linear, translation)
    }

    pub fn then_scale(&self, scale: Vec3) -> Affine3x4 {
        Self::from_rows(self.rows[0] * scale.x, self.rows[1] * scale.y, self.rows[2] * scale.z)
    }

    pub fn then_translate(&self, translation: Vec3) -> Affine3x4 {
        let mut out = *self;
        out.rows[0].w += translation.x;
        out.rows[1].w += translation.y;
        out.rows[2].w += translation.z;
        out
    }

    pub fn then_rotate(&self, rotation: Quat) -> Affine3x4 {
        self.then(&Self::from_rotation(rotation))
    }

    /// Inverse of a rotation + translation transform.
    ///
    /// Only valid when the linear part is orthonormal; use [`Self::inverse`]
    /// for scaled transforms.
    pub fn rigid_inverse(&self) -> Affine3x4 {
        let linear_t = self.linear().transpose();
        Self::from_linear_translation(linear_t, -(linear_t * self.translation()))
    }

    /// General inverse, `None` when the linear part is singular.
    pub fn inverse(&self) -> Option<Affine3x4> {
        let linear = self.linear();
        let det = linear.determinant();
        if det.abs() <= f32::EPSILON || !det.is_finite() {
            return None;
        }
        let inv = linear.inverse();
        Some(Self::from_linear_translation(inv, -(inv * self.translation())))
    }
}

impl Default for Affine3x4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Focal scale for a vertical field of view and a width / height aspect.
///
/// Points at the edge of the field of view land on `x / z = +-1` and
/// `y / z = +-1` after the divide.
pub fn focal_from_fov(fov_y_radians: f32, aspect: f32) -> Vec2 {
    let fy = 1.0 / (fov_y_radians * 0.5).tan();
    Vec2::new(fy / aspect, fy)
}

/// View transform of a projector from its world pose.
///
/// The pose must be rigid (rotation + translation). The projector looks down
/// its local `+Z`.
pub fn view_from_pose(pose: &Affine3x4, focal: Vec2) -> Affine3x4 {
    pose.rigid_inverse().then_scale(Vec3::new(focal.x, focal.y, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn approx_vec3(a: Vec3, b: Vec3) -> bool {
        (a - b).abs().max_element() < 1e-5
    }

    #[test]
    fn test_identity_rows() {
        let id = Affine3x4::IDENTITY;
        assert_eq!(id.rows[0], Vec4::new(1.0, 0.0, 0.0, 0.0));
        assert_eq!(id.rows[1], Vec4::new(0.0, 1.0, 0.0, 0.0));
        assert_eq!(id.rows[2], Vec4::new(0.0, 0.0, 1.0, 0.0));
    }

    #[test]
    fn test_identity_leaves_points_unchanged() {
        let points = [
            Vec3::ZERO,
            Vec3::new(1.5, -2.25, 3.0),
            Vec3::new(-1e6, 1e-6, 42.0),
        ];
        for p in points {
            assert_eq!(Affine3x4::IDENTITY.transform_point(p), p);
        }
    }

    #[test]
    fn test_translation_only_moves_points() {
        let t = Affine3x4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(t.transform_point(Vec3::ZERO), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(t.transform_vector(Vec3::X), Vec3::X);
    }

    #[test]
    fn test_scale_rotation_translation_order() {
        let a = Affine3x4::from_scale_rotation_translation(
            Vec3::splat(2.0),
            Quat::from_rotation_z(FRAC_PI_2),
            Vec3::new(0.0, 0.0, 5.0),
        );
        // X scaled to 2, rotated onto +Y, then lifted to z = 5
        assert!(approx_vec3(a.transform_point(Vec3::X), Vec3::new(0.0, 2.0, 5.0)));
    }

    #[test]
    fn test_then_applies_left_first() {
        let scale = Affine3x4::from_scale(Vec3::splat(3.0));
        let shift = Affine3x4::from_translation(Vec3::X);
        let p = Vec3::new(1.0, 1.0, 1.0);

        assert!(approx_vec3(scale.then(&shift).transform_point(p), Vec3::new(4.0, 3.0, 3.0)));
        assert!(approx_vec3(shift.then(&scale).transform_point(p), Vec3::new(6.0, 3.0, 3.0)));
    }

    #[test]
    fn test_then_helpers_match_then() {
        let base = Affine3x4::from_rotation(Quat::from_rotation_y(0.3));
        let p = Vec3::new(0.2, -0.7, 1.1);
        let s = Vec3::new(1.0, 2.0, 0.5);
        let t = Vec3::new(-1.0, 0.5, 4.0);

        assert!(approx_vec3(
            base.then_scale(s).transform_point(p),
            base.then(&Affine3x4::from_scale(s)).transform_point(p)
        ));
        assert!(approx_vec3(
            base.then_translate(t).transform_point(p),
            base.then(&Affine3x4::from_translation(t)).transform_point(p)
        ));
    }

    #[test]
    fn test_rigid_inverse_round_trip() {
        let pose = Affine3x4::from_scale_rotation_translation(
            Vec3::ONE,
            Quat::from_euler(glam::EulerRot::YXZ, 0.4, -0.9, 0.2),
            Vec3::new(3.0, -1.0, 2.0),
        );
        let p = Vec3::new(0.5, 0.25, -4.0);
        let back = pose.then(&pose.rigid_inverse()).transform_point(p);
        assert!(approx_vec3(back, p));
    }

    #[test]
    fn test_inverse_handles_scale_and_rejects_singular() {
        let a = Affine3x4::from_scale_rotation_translation(
            Vec3::new(2.0, 0.5, 4.0),
            Quat::from_rotation_x(1.0),
            Vec3::new(1.0, 2.0, 3.0),
        );
        let inv = a.inverse().expect("invertible");
        let p = Vec3::new(-3.0, 0.5, 7.0);
        assert!(approx_vec3(inv.transform_point(a.transform_point(p)), p));

        assert!(Affine3x4::from_scale(Vec3::new(1.0, 0.0, 1.0)).inverse().is_none());
    }

    #[test]
    fn test_view_from_pose_looks_down_local_z() {
        // Light 5 units above the origin, local +Z rotated onto world -Y
        let pose = Affine3x4::from_scale_rotation_translation(
            Vec3::ONE,
            Quat::from_rotation_x(FRAC_PI_2),
            Vec3::new(0.0, 5.0, 0.0),
        );
        let view = view_from_pose(&pose, Vec2::ONE);
        let p = view.transform_point(Vec3::ZERO);
        assert!(approx_vec3(p, Vec3::new(0.0, 0.0, 5.0)));
    }

    #[test]
    fn test_focal_from_fov_edges() {
        let focal = focal_from_fov(FRAC_PI_2, 2.0);
        assert!((focal.y - 1.0).abs() < 1e-6);
        assert!((focal.x - 0.5).abs() < 1e-6);
    }
}
