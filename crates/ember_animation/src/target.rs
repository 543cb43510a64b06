use std::fmt;

use ember_core::EntityId;

use crate::capability::{BoneRig, PoseEvaluator};

/// A rigged instance: the root entity that keys its component, plus the
/// evaluator that samples and applies its clips.
pub struct SkeletalTarget {
    pub root: EntityId,
    pub evaluator: Box<dyn PoseEvaluator>,
}

impl SkeletalTarget {
    #[must_use]
    pub fn new(root: EntityId, evaluator: impl PoseEvaluator + 'static) -> Self {
        Self {
            root,
            evaluator: Box::new(evaluator),
        }
    }
}

impl fmt::Debug for SkeletalTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SkeletalTarget")
            .field("root", &self.root)
            .field("clips", &self.evaluator.clip_count())
            .finish()
    }
}

/// A rigged instance driven joint by joint from frame buffers.
pub struct BoneTarget {
    pub root: EntityId,
    pub rig: Box<dyn BoneRig>,
}

impl BoneTarget {
    #[must_use]
    pub fn new(root: EntityId, rig: impl BoneRig + 'static) -> Self {
        Self {
            root,
            rig: Box::new(rig),
        }
    }
}

impl fmt::Debug for BoneTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoneTarget")
            .field("root", &self.root)
            .field("skins", &self.rig.skin_count())
            .finish()
    }
}

/// What an animation component is attached to.
#[derive(Debug)]
pub enum AnimationTarget {
    /// Clip-based animation on a rigged instance.
    Skeletal(SkeletalTarget),
    /// Frame-buffer animation of individual joints on a rigged instance.
    Bones(BoneTarget),
    /// Morph-target animation on a bare renderable entity.
    RawEntity(EntityId),
}

impl AnimationTarget {
    #[must_use]
    pub fn skeletal(root: EntityId, evaluator: impl PoseEvaluator + 'static) -> Self {
        Self::Skeletal(SkeletalTarget::new(root, evaluator))
    }

    #[must_use]
    pub fn bones(root: EntityId, rig: impl BoneRig + 'static) -> Self {
        Self::Bones(BoneTarget::new(root, rig))
    }

    #[must_use]
    pub fn key(&self) -> TargetKey {
        match self {
            Self::Skeletal(target) => TargetKey::Skeletal(target.root),
            Self::Bones(target) => TargetKey::Bones(target.root),
            Self::RawEntity(entity) => TargetKey::RawEntity(*entity),
        }
    }
}

/// Identity of an [`AnimationTarget`], used for removal and lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKey {
    Skeletal(EntityId),
    Bones(EntityId),
    RawEntity(EntityId),
}

impl TargetKey {
    #[inline]
    #[must_use]
    pub fn entity(self) -> EntityId {
        match self {
            Self::Skeletal(entity) | Self::Bones(entity) | Self::RawEntity(entity) => entity,
        }
    }
}
