//! Bone Animation
//!
//! Frame-buffer animation of individual joints. A [`BoneClip`] holds one
//! local transform per frame for a single joint of one skin. Frames are
//! interpolated with their neighbour (translation and scale linearly,
//! rotation spherically) so clips authored at a low frame rate stay smooth.
//!
//! # Fades
//!
//! A play runs through three windows: fade-in, the frames themselves, and
//! fade-out. The first frame is held while fading in and the last one while
//! fading out. The sampled transform is blended over the joint's current
//! transform by the fade weight, so bone clips layer on top of whatever clip
//! pose was applied earlier in the same tick.

use glam::Mat4;

use ember_core::{
    AnimationError, ComponentTable, EngineContext, EntityId, SharedClock, elapsed_since,
};

use crate::capability::BoneRig;
use crate::manager::AnimationUpdate;
use crate::pose::JointTransform;
use crate::target::BoneTarget;

const MATRIX_LEN: usize = 16;

/// Description of a bone clip to play.
#[derive(Debug, Clone, PartialEq)]
pub struct BoneClip {
    pub skin: usize,
    pub bone: usize,
    pub frames: Vec<JointTransform>,
    pub frame_length_ms: f32,
    /// Seconds spent blending in from the current joint transform.
    pub fade_in: f32,
    /// Seconds spent blending back out after the last frame.
    pub fade_out: f32,
    /// Upper bound of the blend weight, in `[0, 1]`.
    pub max_weight: f32,
    pub looping: bool,
    pub reverse: bool,
}

impl BoneClip {
    #[must_use]
    pub fn new(
        skin: usize,
        bone: usize,
        frames: impl IntoIterator<Item = JointTransform>,
        frame_length_ms: f32,
    ) -> Self {
        Self {
            skin,
            bone,
            frames: frames.into_iter().collect(),
            frame_length_ms,
            fade_in: 0.0,
            fade_out: 0.0,
            max_weight: 1.0,
            looping: false,
            reverse: false,
        }
    }

    /// Builds a clip from `frame_count` column-major 4x4 matrices.
    pub fn from_matrices(
        skin: usize,
        bone: usize,
        data: &[f32],
        frame_count: usize,
        frame_length_ms: f32,
    ) -> Result<Self, AnimationError> {
        let required = frame_count * MATRIX_LEN;
        if data.len() < required {
            return Err(AnimationError::InvalidBoneClip(format!(
                "{} floats supplied, {required} required",
                data.len()
            )));
        }
        let frames = data[..required]
            .chunks_exact(MATRIX_LEN)
            .map(|cols| JointTransform::from_matrix(&Mat4::from_cols_slice(cols)));
        Ok(Self::new(skin, bone, frames, frame_length_ms))
    }

    #[must_use]
    pub fn fade_in(mut self, seconds: f32) -> Self {
        self.fade_in = seconds;
        self
    }

    #[must_use]
    pub fn fade_out(mut self, seconds: f32) -> Self {
        self.fade_out = seconds;
        self
    }

    #[must_use]
    pub fn max_weight(mut self, weight: f32) -> Self {
        self.max_weight = weight;
        self
    }

    #[must_use]
    pub fn looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    #[must_use]
    pub fn reversed(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }

    /// Length of the frames alone, without fades.
    #[must_use]
    pub fn duration(&self) -> f32 {
        self.frames.len() as f32 * self.frame_length_ms / 1000.0
    }

    /// Fade-in, frames and fade-out together.
    #[must_use]
    pub fn total_duration(&self) -> f32 {
        self.fade_in + self.duration() + self.fade_out
    }

    fn validate(&self) -> Result<(), AnimationError> {
        if self.frames.is_empty() {
            return Err(AnimationError::InvalidBoneClip("clip has no frames".into()));
        }
        if self.frame_length_ms <= 0.0 || !self.frame_length_ms.is_finite() {
            return Err(AnimationError::InvalidBoneClip(format!(
                "frame length {} ms is not positive",
                self.frame_length_ms
            )));
        }
        if !(self.fade_in >= 0.0 && self.fade_out >= 0.0) {
            return Err(AnimationError::InvalidBoneClip("fade times must not be negative".into()));
        }
        if !(0.0..=1.0).contains(&self.max_weight) {
            return Err(AnimationError::InvalidBoneClip(format!(
                "max weight {} is outside [0, 1]",
                self.max_weight
            )));
        }
        Ok(())
    }
}

/// One active play of a bone clip.
#[derive(Debug, Clone, PartialEq)]
pub struct BonePlay {
    pub clip: BoneClip,
    /// Clock time at which the current pass started.
    pub start: f64,
}

impl BonePlay {
    /// Interpolated transform `elapsed` seconds into the play.
    #[must_use]
    pub fn sample(&self, elapsed: f32) -> JointTransform {
        let clip = &self.clip;
        let last = clip.frames.len() - 1;
        let position = (elapsed - clip.fade_in) * 1000.0 / clip.frame_length_ms;
        let current = (position.floor().max(0.0) as usize).min(last);
        let next = (current + 1).min(last);
        let fraction = (position - current as f32).clamp(0.0, 1.0);

        let frame = |i: usize| {
            if clip.reverse {
                &clip.frames[last - i]
            } else {
                &clip.frames[i]
            }
        };
        frame(current).blend(frame(next), fraction)
    }

    /// Blend weight of the sampled transform over the joint's current one.
    #[must_use]
    pub fn weight(&self, elapsed: f32) -> f32 {
        let clip = &self.clip;
        let weight = if elapsed < clip.fade_in {
            elapsed / clip.fade_in
        } else {
            let into_fade_out = elapsed - clip.fade_in - clip.duration();
            if clip.fade_out > 0.0 && into_fade_out > 0.0 {
                1.0 - into_fade_out / clip.fade_out
            } else {
                1.0
            }
        };
        weight.clamp(0.0, clip.max_weight)
    }
}

/// Bone animation state of one rigged instance.
pub struct BoneAnimationComponent {
    rig: Box<dyn BoneRig>,
    plays: Vec<BonePlay>,
}

impl BoneAnimationComponent {
    #[must_use]
    pub fn plays(&self) -> &[BonePlay] {
        &self.plays
    }

    fn update(&mut self, now: f64) {
        let mut applied = false;
        let mut i = self.plays.len();
        while i > 0 {
            i -= 1;
            let play = &mut self.plays[i];
            let total = play.clip.total_duration();
            let mut elapsed = elapsed_since(play.start, now);

            if elapsed >= total {
                if !play.clip.looping {
                    let (skin, bone) = (play.clip.skin, play.clip.bone);
                    self.plays.remove(i);
                    log::debug!("Bone clip on skin {skin} joint {bone} completed");
                    continue;
                }
                let period = f64::from(total);
                play.start += ((now - play.start) / period).floor() * period;
                elapsed = elapsed_since(play.start, now);
            }

            let sampled = play.sample(elapsed);
            let weight = play.weight(elapsed);
            let (skin, bone) = (play.clip.skin, play.clip.bone);
            let current = self.rig.joint_transform(skin, bone);
            self.rig
                .set_joint_transform(skin, bone, current.blend(&sampled, weight));
            applied = true;
        }

        if applied {
            self.rig.update_bone_matrices();
        }
    }
}

fn check_joint(rig: &dyn BoneRig, skin: usize, joint: usize) -> Result<(), AnimationError> {
    let count = if skin < rig.skin_count() {
        rig.joint_count(skin)
    } else {
        0
    };
    if joint >= count {
        log::warn!("Joint {joint} out of range for skin {skin} ({count} joints)");
        return Err(AnimationError::JointOutOfRange { skin, joint, count });
    }
    Ok(())
}

/// Frame-buffer joint animation for every registered rigged instance.
pub struct BoneAnimationManager {
    components: ComponentTable<BoneAnimationComponent>,
    clock: SharedClock,
}

impl BoneAnimationManager {
    #[must_use]
    pub fn new(context: &EngineContext) -> Self {
        Self {
            components: ComponentTable::new(),
            clock: context.clock().clone(),
        }
    }

    /// Registers a rigged instance. Returns `false` if its root already has a
    /// component; the existing component is kept.
    pub fn add_component(&mut self, target: BoneTarget) -> bool {
        let component = BoneAnimationComponent {
            rig: target.rig,
            plays: Vec::new(),
        };
        let added = self.components.insert(target.root, component);
        if added {
            log::trace!("Added bone animation component for {}", target.root);
        }
        added
    }

    pub fn remove_component(&mut self, root: EntityId) -> bool {
        let removed = self.components.remove(root).is_some();
        if removed {
            log::trace!("Removed bone animation component for {root}");
        }
        removed
    }

    #[must_use]
    pub fn has_component(&self, root: EntityId) -> bool {
        self.components.contains(root)
    }

    #[must_use]
    pub fn component(&self, root: EntityId) -> Option<&BoneAnimationComponent> {
        self.components.get(root)
    }

    #[must_use]
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    #[must_use]
    pub fn play_count(&self, root: EntityId) -> usize {
        self.components.get(root).map_or(0, |c| c.plays.len())
    }

    /// Starts `clip` on `root` now.
    pub fn play_bone_clip(&mut self, root: EntityId, clip: BoneClip) -> Result<(), AnimationError> {
        if let Err(err) = clip.validate() {
            log::warn!("Rejected bone clip for {root}: {err}");
            return Err(err);
        }
        let now = self.clock.now();
        let component = self.component_for(root)?;
        check_joint(component.rig.as_ref(), clip.skin, clip.bone)?;

        log::debug!(
            "Playing bone clip on {root} skin {} joint {} ({} frames)",
            clip.skin,
            clip.bone,
            clip.frames.len()
        );
        component.plays.push(BonePlay { clip, start: now });
        Ok(())
    }

    /// Stops every bone clip on `root`. Joints keep their last transforms.
    pub fn clear_bone_clips(&mut self, root: EntityId) -> Result<(), AnimationError> {
        self.component_for(root)?.plays.clear();
        Ok(())
    }

    /// Overwrites one skinning matrix of `root`, outside the tick.
    pub fn set_bone_transform(
        &mut self,
        root: EntityId,
        skin: usize,
        bone: usize,
        matrix: Mat4,
    ) -> Result<(), AnimationError> {
        let component = self.component_for(root)?;
        check_joint(component.rig.as_ref(), skin, bone)?;
        component.rig.set_bone_matrix(skin, bone, matrix);
        Ok(())
    }

    /// Puts every joint of every skin back into its rest transform.
    pub fn reset_to_rest_pose(&mut self, root: EntityId) -> Result<(), AnimationError> {
        let rig = &mut self.component_for(root)?.rig;
        for skin in 0..rig.skin_count() {
            for joint in 0..rig.joint_count(skin) {
                let rest = rig.rest_transform(skin, joint);
                rig.set_joint_transform(skin, joint, rest);
            }
        }
        rig.update_bone_matrices();
        log::debug!("Reset {root} to its rest pose");
        Ok(())
    }

    fn component_for(&mut self, root: EntityId) -> Result<&mut BoneAnimationComponent, AnimationError> {
        self.components.get_mut(root).ok_or_else(|| {
            log::warn!("{root} has no bone animation component");
            AnimationError::UnknownComponent(root)
        })
    }
}

impl AnimationUpdate for BoneAnimationManager {
    fn name(&self) -> &'static str {
        "bones"
    }

    fn update(&mut self, now: f64) {
        for (_, component) in self.components.iter_mut() {
            if component.plays.is_empty() {
                continue;
            }
            component.update(now);
        }
    }
}
