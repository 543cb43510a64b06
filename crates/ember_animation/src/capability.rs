//! Capabilities provided by the external renderer.
//!
//! The animation managers never touch scene or GPU state directly; they drive
//! these traits, which the embedding host implements on top of its engine.

use ember_core::EntityId;
use glam::Mat4;

use crate::pose::{JointTransform, Pose};

/// Evaluates and applies skeletal clips for one rigged instance.
pub trait PoseEvaluator: Send {
    /// Number of clips the instance exposes.
    fn clip_count(&self) -> usize;

    /// Duration in seconds, or `None` for an unknown clip.
    fn clip_duration(&self, clip: usize) -> Option<f32>;

    /// Samples `clip` at `time` seconds into `out`.
    fn sample_clip(&mut self, clip: usize, time: f32, out: &mut Pose);

    /// Writes joint transforms. Matrices are not recomputed until
    /// [`commit_pose`](Self::commit_pose).
    fn apply_pose(&mut self, pose: &Pose);

    /// Recomputes and uploads bone matrices for everything applied so far.
    fn commit_pose(&mut self);

    /// Samples and applies in one call.
    fn apply_clip(&mut self, clip: usize, time: f32) {
        let mut pose = Pose::default();
        self.sample_clip(clip, time, &mut pose);
        self.apply_pose(&pose);
    }
}

/// Per-joint access to the skins of one rigged instance.
///
/// Joints are addressed by skin index and the joint's position within that
/// skin. Out-of-range indices are never passed; the bone manager checks them
/// against [`joint_count`](Self::joint_count) first.
pub trait BoneRig: Send {
    fn skin_count(&self) -> usize;

    fn joint_count(&self, skin: usize) -> usize;

    /// Current local transform of a joint, including anything applied earlier
    /// in the tick.
    fn joint_transform(&self, skin: usize, joint: usize) -> JointTransform;

    fn set_joint_transform(&mut self, skin: usize, joint: usize, transform: JointTransform);

    /// Local transform of a joint in the rest pose.
    fn rest_transform(&self, skin: usize, joint: usize) -> JointTransform;

    /// Overwrites one skinning matrix directly, bypassing joint transforms.
    fn set_bone_matrix(&mut self, skin: usize, bone: usize, matrix: Mat4);

    /// Recomputes and uploads bone matrices from the joint transforms.
    fn update_bone_matrices(&mut self);
}

/// Receives morph-target weights.
pub trait MorphWeightSink: Send {
    /// Sets the weight of the morph target at `slot` on the renderable
    /// `target`.
    fn set_weight(&mut self, target: EntityId, slot: usize, value: f32);
}

impl<F> MorphWeightSink for F
where
    F: FnMut(EntityId, usize, f32) + Send,
{
    #[inline]
    fn set_weight(&mut self, target: EntityId, slot: usize, value: f32) {
        self(target, slot, value);
    }
}
