use ember_core::{AnimationError, EngineContext, EntityId};
use glam::Mat4;

use crate::bones::{BoneAnimationManager, BoneClip};
use crate::capability::MorphWeightSink;
use crate::manager::AnimationUpdate;
use crate::morph::{MorphAnimationManager, MorphClip, MorphPlayHandle};
use crate::skeletal::{ClipPlayOptions, SkeletalAnimationManager};
use crate::target::{AnimationTarget, TargetKey};

/// Animation system.
///
/// Owns the skeletal, bone and morph managers and routes component lifecycle
/// by [`AnimationTarget`]. Within one update, clip poses are applied first,
/// bone clips are layered over them, and morph weights come last.
pub struct AnimationSystem {
    skeletal: SkeletalAnimationManager,
    bones: BoneAnimationManager,
    morph: MorphAnimationManager,
}

impl AnimationSystem {
    #[must_use]
    pub fn new(context: &EngineContext, sink: impl MorphWeightSink + 'static) -> Self {
        Self {
            skeletal: SkeletalAnimationManager::new(context),
            bones: BoneAnimationManager::new(context),
            morph: MorphAnimationManager::new(context, sink),
        }
    }

    #[inline]
    #[must_use]
    pub fn skeletal(&self) -> &SkeletalAnimationManager {
        &self.skeletal
    }

    #[inline]
    pub fn skeletal_mut(&mut self) -> &mut SkeletalAnimationManager {
        &mut self.skeletal
    }

    #[inline]
    #[must_use]
    pub fn bones(&self) -> &BoneAnimationManager {
        &self.bones
    }

    #[inline]
    pub fn bones_mut(&mut self) -> &mut BoneAnimationManager {
        &mut self.bones
    }

    #[inline]
    #[must_use]
    pub fn morph(&self) -> &MorphAnimationManager {
        &self.morph
    }

    #[inline]
    pub fn morph_mut(&mut self) -> &mut MorphAnimationManager {
        &mut self.morph
    }

    /// Creates the component for `target`. Returns `false` if one already
    /// exists.
    pub fn add_component(&mut self, target: AnimationTarget) -> bool {
        match target {
            AnimationTarget::Skeletal(target) => self.skeletal.add_component(target),
            AnimationTarget::Bones(target) => self.bones.add_component(target),
            AnimationTarget::RawEntity(entity) => self.morph.add_component(entity),
        }
    }

    pub fn remove_component(&mut self, key: TargetKey) -> bool {
        match key {
            TargetKey::Skeletal(root) => self.skeletal.remove_component(root),
            TargetKey::Bones(root) => self.bones.remove_component(root),
            TargetKey::RawEntity(entity) => self.morph.remove_component(entity),
        }
    }

    #[must_use]
    pub fn has_component(&self, key: TargetKey) -> bool {
        match key {
            TargetKey::Skeletal(root) => self.skeletal.has_component(root),
            TargetKey::Bones(root) => self.bones.has_component(root),
            TargetKey::RawEntity(entity) => self.morph.has_component(entity),
        }
    }

    /// Drops every component keyed by `entity`, whichever manager holds it.
    pub fn on_entity_destroyed(&mut self, entity: EntityId) {
        let skeletal = self.skeletal.remove_component(entity);
        let bones = self.bones.remove_component(entity);
        let morph = self.morph.remove_component(entity);
        if skeletal || bones || morph {
            log::debug!("Released animation state of destroyed {entity}");
        }
    }

    pub fn play_clip(
        &mut self,
        root: EntityId,
        clip: usize,
        options: ClipPlayOptions,
    ) -> Result<(), AnimationError> {
        self.skeletal.play_clip(root, clip, options)
    }

    pub fn stop_clip(&mut self, root: EntityId, clip: usize) -> Result<(), AnimationError> {
        self.skeletal.stop_clip(root, clip)
    }

    pub fn play_bone_clip(&mut self, root: EntityId, clip: BoneClip) -> Result<(), AnimationError> {
        self.bones.play_bone_clip(root, clip)
    }

    pub fn clear_bone_clips(&mut self, root: EntityId) -> Result<(), AnimationError> {
        self.bones.clear_bone_clips(root)
    }

    pub fn set_bone_transform(
        &mut self,
        root: EntityId,
        skin: usize,
        bone: usize,
        matrix: Mat4,
    ) -> Result<(), AnimationError> {
        self.bones.set_bone_transform(root, skin, bone, matrix)
    }

    pub fn reset_to_rest_pose(&mut self, root: EntityId) -> Result<(), AnimationError> {
        self.bones.reset_to_rest_pose(root)
    }

    pub fn play_morph_clip(
        &mut self,
        entity: EntityId,
        clip: MorphClip,
    ) -> Result<MorphPlayHandle, AnimationError> {
        self.morph.play_morph_clip(entity, clip)
    }

    pub fn stop_morph_clip(
        &mut self,
        entity: EntityId,
        handle: MorphPlayHandle,
    ) -> Result<(), AnimationError> {
        self.morph.stop_morph_clip(entity, handle)
    }
}

impl AnimationUpdate for AnimationSystem {
    fn name(&self) -> &'static str {
        "animation"
    }

    fn update(&mut self, now: f64) {
        self.skeletal.update(now);
        self.bones.update(now);
        self.morph.update(now);
    }
}
