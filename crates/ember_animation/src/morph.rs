//! Morph-Target Animation
//!
//! Frame-buffer driven animation of morph weights on bare renderables.
//! A [`MorphClip`] is a frame-major weight buffer: frame `f` holds one scalar
//! per entry of the clip's morph index map, and entry `i` is written to the
//! renderable's global morph slot `morph_indices[i]`.
//!
//! Plays are stored in a [`SlotMap`] so callers can hold a stable
//! [`MorphPlayHandle`] for stopping a single play. Each component keeps the
//! ordered handles of its own plays.

use slotmap::{SlotMap, new_key_type};
use smallvec::SmallVec;

use ember_core::{
    AnimationError, ComponentTable, EngineContext, EntityId, HostBuffer, SharedClock, elapsed_since,
};

use crate::capability::MorphWeightSink;
use crate::manager::AnimationUpdate;

new_key_type! {
    /// Stable handle to one morph play.
    pub struct MorphPlayHandle;
}

/// Local-to-global morph slot mapping. Most clips touch a handful of slots.
pub type MorphIndexMap = SmallVec<[usize; 8]>;

/// Description of a morph clip to play.
#[derive(Debug)]
pub struct MorphClip {
    /// Frame-major weights, `frame_count * morph_indices.len()` scalars.
    pub frame_data: HostBuffer<f32>,
    pub frame_count: usize,
    pub frame_length_ms: f32,
    pub looping: bool,
    pub reverse: bool,
    pub morph_indices: MorphIndexMap,
}

impl MorphClip {
    #[must_use]
    pub fn new(
        frame_data: impl Into<HostBuffer<f32>>,
        frame_count: usize,
        frame_length_ms: f32,
        morph_indices: impl IntoIterator<Item = usize>,
    ) -> Self {
        Self {
            frame_data: frame_data.into(),
            frame_count,
            frame_length_ms,
            looping: false,
            reverse: false,
            morph_indices: morph_indices.into_iter().collect(),
        }
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

    fn validate(&self) -> Result<(), AnimationError> {
        if self.frame_count == 0 {
            return Err(AnimationError::InvalidMorphBuffer("frame count is zero".into()));
        }
        if self.frame_length_ms <= 0.0 || !self.frame_length_ms.is_finite() {
            return Err(AnimationError::InvalidMorphBuffer(format!(
                "frame length {} ms is not positive",
                self.frame_length_ms
            )));
        }
        if self.morph_indices.is_empty() {
            return Err(AnimationError::InvalidMorphBuffer("morph index map is empty".into()));
        }
        let required = self.frame_count * self.morph_indices.len();
        if self.frame_data.len() < required {
            return Err(AnimationError::InvalidMorphBuffer(format!(
                "{} weights supplied, {required} required",
                self.frame_data.len()
            )));
        }
        Ok(())
    }
}

/// One active play of a morph clip.
#[derive(Debug)]
pub struct MorphPlay {
    pub target: EntityId,
    pub clip: MorphClip,
    /// Clock time at which the play started.
    pub start: f64,
}

impl MorphPlay {
    /// Playback length of one pass through every frame.
    #[must_use]
    pub fn duration(&self) -> f32 {
        self.clip.frame_count as f32 * self.clip.frame_length_ms / 1000.0
    }

    /// Frame shown `elapsed` seconds into the play.
    ///
    /// Reverse playback shows frame `frame_count - raw`, wrapped modulo the
    /// frame count so raw frame 0 stays on frame 0.
    #[must_use]
    pub fn frame_at(&self, elapsed: f32) -> usize {
        let count = self.clip.frame_count;
        let raw = (elapsed.max(0.0) * 1000.0 / self.clip.frame_length_ms).floor() as usize % count;
        if self.clip.reverse { (count - raw) % count } else { raw }
    }

    fn weights(&self, frame: usize) -> &[f32] {
        let width = self.clip.morph_indices.len();
        let offset = frame * width;
        &self.clip.frame_data[offset..offset + width]
    }
}

/// Morph animation state of one renderable.
#[derive(Debug, Default)]
pub struct MorphAnimationComponent {
    plays: Vec<MorphPlayHandle>,
}

impl MorphAnimationComponent {
    #[must_use]
    pub fn plays(&self) -> &[MorphPlayHandle] {
        &self.plays
    }
}

/// Morph-target animation for every registered renderable.
pub struct MorphAnimationManager {
    components: ComponentTable<MorphAnimationComponent>,
    plays: SlotMap<MorphPlayHandle, MorphPlay>,
    sink: Box<dyn MorphWeightSink>,
    clock: SharedClock,
}

impl MorphAnimationManager {
    #[must_use]
    pub fn new(context: &EngineContext, sink: impl MorphWeightSink + 'static) -> Self {
        Self {
            components: ComponentTable::new(),
            plays: SlotMap::with_key(),
            sink: Box::new(sink),
            clock: context.clock().clone(),
        }
    }

    /// Registers a renderable. Returns `false` if it already has a
    /// component.
    pub fn add_component(&mut self, entity: EntityId) -> bool {
        let added = self.components.insert(entity, MorphAnimationComponent::default());
        if added {
            log::trace!("Added morph animation component for {entity}");
        }
        added
    }

    /// Removes the component and every play it owns.
    pub fn remove_component(&mut self, entity: EntityId) -> bool {
        let Some(component) = self.components.remove(entity) else {
            return false;
        };
        for handle in component.plays {
            self.plays.remove(handle);
        }
        log::trace!("Removed morph animation component for {entity}");
        true
    }

    #[must_use]
    pub fn has_component(&self, entity: EntityId) -> bool {
        self.components.contains(entity)
    }

    #[must_use]
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    #[must_use]
    pub fn play_count(&self, entity: EntityId) -> usize {
        self.components.get(entity).map_or(0, |c| c.plays.len())
    }

    #[must_use]
    pub fn play(&self, handle: MorphPlayHandle) -> Option<&MorphPlay> {
        self.plays.get(handle)
    }

    /// Queues `clip` on `entity`, starting now.
    pub fn play_morph_clip(
        &mut self,
        entity: EntityId,
        clip: MorphClip,
    ) -> Result<MorphPlayHandle, AnimationError> {
        if let Err(err) = clip.validate() {
            log::warn!("Rejected morph clip for {entity}: {err}");
            return Err(err);
        }
        let Some(component) = self.components.get_mut(entity) else {
            log::warn!("{entity} has no morph animation component");
            return Err(AnimationError::UnknownComponent(entity));
        };

        let frames = clip.frame_count;
        let handle = self.plays.insert(MorphPlay {
            target: entity,
            clip,
            start: self.clock.now(),
        });
        component.plays.push(handle);
        log::debug!("Playing morph clip on {entity} ({frames} frames)");
        Ok(handle)
    }

    /// Stops a single play.
    pub fn stop_morph_clip(
        &mut self,
        entity: EntityId,
        handle: MorphPlayHandle,
    ) -> Result<(), AnimationError> {
        let Some(component) = self.components.get_mut(entity) else {
            log::warn!("{entity} has no morph animation component");
            return Err(AnimationError::UnknownComponent(entity));
        };
        let Some(position) = component.plays.iter().position(|&h| h == handle) else {
            log::warn!("Morph play not found on {entity}");
            return Err(AnimationError::UnknownMorphPlay(entity));
        };
        component.plays.remove(position);
        self.plays.remove(handle);
        Ok(())
    }

    /// Stops every play on `entity`. Weights keep their last written values.
    pub fn clear_morph_clips(&mut self, entity: EntityId) -> Result<(), AnimationError> {
        let Some(component) = self.components.get_mut(entity) else {
            log::warn!("{entity} has no morph animation component");
            return Err(AnimationError::UnknownComponent(entity));
        };
        for handle in component.plays.drain(..) {
            self.plays.remove(handle);
        }
        Ok(())
    }

    /// Writes `weights` directly into slots `0..weights.len()` of `entity`.
    pub fn set_morph_weights(&mut self, entity: EntityId, weights: &[f32]) {
        for (slot, &value) in weights.iter().enumerate() {
            self.sink.set_weight(entity, slot, value);
        }
    }
}

impl AnimationUpdate for MorphAnimationManager {
    fn name(&self) -> &'static str {
        "morph"
    }

    fn update(&mut self, now: f64) {
        let Self {
            components,
            plays,
            sink,
            ..
        } = self;

        for (entity, component) in components.iter_mut() {
            let mut i = component.plays.len();
            while i > 0 {
                i -= 1;
                let handle = component.plays[i];
                let Some(play) = plays.get(handle) else {
                    component.plays.remove(i);
                    continue;
                };

                let elapsed = elapsed_since(play.start, now);
                if !play.clip.looping && elapsed >= play.duration() {
                    component.plays.remove(i);
                    plays.remove(handle);
                    log::debug!("Morph clip on {entity} completed");
                    continue;
                }

                let frame = play.frame_at(elapsed);
                for (&slot, &value) in play.clip.morph_indices.iter().zip(play.weights(frame)) {
                    sink.set_weight(entity, slot, value);
                }
            }
        }
    }
}
