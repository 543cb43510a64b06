use glam::{Affine3A, Mat4, Quat, Vec3};

use crate::values::blend;

/// Local TRS transform of a single joint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointTransform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl JointTransform {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    #[must_use]
    pub fn new(translation: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            translation,
            rotation,
            scale,
        }
    }

    /// Blends towards `other`: translation and scale linearly, rotation
    /// spherically.
    #[must_use]
    pub fn blend(&self, other: &Self, alpha: f32) -> Self {
        Self {
            translation: blend(self.translation, other.translation, alpha),
            rotation: blend(self.rotation, other.rotation, alpha),
            scale: blend(self.scale, other.scale, alpha),
        }
    }

    /// Decomposes an affine matrix. Shear and projection are discarded.
    #[must_use]
    pub fn from_matrix(matrix: &Mat4) -> Self {
        let (scale, rotation, translation) = matrix.to_scale_rotation_translation();
        Self {
            translation,
            rotation: rotation.normalize(),
            scale,
        }
    }

    #[must_use]
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }

    #[must_use]
    pub fn to_affine(&self) -> Affine3A {
        Affine3A::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

impl Default for JointTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// A full skeleton pose, indexed by joint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pose {
    pub joints: Vec<JointTransform>,
}

impl Pose {
    #[must_use]
    pub fn new(joints: Vec<JointTransform>) -> Self {
        Self { joints }
    }

    #[must_use]
    pub fn identity(joint_count: usize) -> Self {
        Self {
            joints: vec![JointTransform::IDENTITY; joint_count],
        }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.joints.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    /// Writes the blend of `from` and `to` into `out`, reusing its storage.
    ///
    /// `alpha = 0` reproduces `from` exactly and `alpha = 1` reproduces `to`
    /// exactly. Joints present in only one pose are taken from `to` when it
    /// has them, otherwise from `from`.
    pub fn blend_into(from: &Pose, to: &Pose, alpha: f32, out: &mut Pose) {
        if alpha <= 0.0 {
            out.clone_from(from);
            return;
        }
        if alpha >= 1.0 {
            out.clone_from(to);
            return;
        }

        let count = from.len().max(to.len());
        out.joints.clear();
        out.joints.reserve(count);
        for i in 0..count {
            let joint = match (from.joints.get(i), to.joints.get(i)) {
                (Some(a), Some(b)) => a.blend(b, alpha),
                (None, Some(b)) => *b,
                (Some(a), None) => *a,
                (None, None) => JointTransform::IDENTITY,
            };
            out.joints.push(joint);
        }
    }

    #[must_use]
    pub fn blend(from: &Pose, to: &Pose, alpha: f32) -> Pose {
        let mut out = Pose::default();
        Self::blend_into(from, to, alpha, &mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joint_blend_midpoint() {
        let a = JointTransform::IDENTITY;
        let b = JointTransform::new(
            Vec3::new(2.0, 0.0, 0.0),
            Quat::from_rotation_z(std::f32::consts::FRAC_PI_2),
            Vec3::splat(3.0),
        );
        let mid = a.blend(&b, 0.5);
        assert!((mid.translation.x - 1.0).abs() < 1e-6);
        assert!((mid.scale.y - 2.0).abs() < 1e-6);
        let expected = Quat::from_rotation_z(std::f32::consts::FRAC_PI_4);
        assert!(mid.rotation.angle_between(expected) < 1e-4);
    }

    #[test]
    fn mismatched_joint_counts_keep_extra_joints() {
        let from = Pose::identity(1);
        let to = Pose::new(vec![
            JointTransform::IDENTITY,
            JointTransform::new(Vec3::X, Quat::IDENTITY, Vec3::ONE),
        ]);
        let out = Pose::blend(&from, &to, 0.25);
        assert_eq!(out.len(), 2);
        assert_eq!(out.joints[1].translation, Vec3::X);
    }

    #[test]
    fn matrix_decomposition_recovers_trs() {
        let joint = JointTransform::new(
            Vec3::new(1.0, -2.0, 0.5),
            Quat::from_rotation_x(0.3),
            Vec3::new(2.0, 2.0, 2.0),
        );
        let back = JointTransform::from_matrix(&joint.to_matrix());
        assert!((back.translation - joint.translation).length() < 1e-5);
        assert!((back.scale - joint.scale).length() < 1e-5);
        assert!(back.rotation.angle_between(joint.rotation) < 1e-4);
    }

    #[test]
    fn joint_to_affine_places_translation() {
        let joint = JointTransform::new(Vec3::new(1.0, 2.0, 3.0), Quat::IDENTITY, Vec3::splat(2.0));
        let point = joint.to_affine().transform_point3(Vec3::X);
        assert!((point - Vec3::new(3.0, 2.0, 3.0)).length() < 1e-6);
    }
}
