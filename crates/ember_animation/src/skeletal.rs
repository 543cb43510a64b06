//! Skeletal Animation
//!
//! Clip-based animation of rigged instances. Each component owns the
//! evaluator of its instance and an ordered list of [`ClipPlay`] records.
//!
//! # Per-tick state machine
//!
//! A play is *Playing* until a non-looping play's elapsed time reaches its
//! duration. It then *completes*: the pose just before the end of the clip is
//! applied, the play is removed and any pending crossfade on the component is
//! cleared. Plays are visited back-to-front so removals never disturb indices
//! that are still to be visited.
//!
//! While a crossfade is pending, the outgoing clip keeps advancing from the
//! cursor it had when it was replaced, and the applied pose is the blend of
//! outgoing and incoming poses with `alpha = elapsed / fade_duration`.
//!
//! Bone matrices are committed once per component per tick, after all of its
//! plays have been applied.

use ember_core::{
    AnimationError, ComponentTable, EngineContext, EntityId, SharedClock, elapsed_since,
};

use crate::manager::AnimationUpdate;
use crate::pose::Pose;
use crate::target::SkeletalTarget;
use crate::capability::PoseEvaluator;

/// Options for [`SkeletalAnimationManager::play_clip`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ClipPlayOptions {
    pub looping: bool,
    pub reverse: bool,
    /// Seconds added to the elapsed time of the play.
    pub start_offset: f32,
    /// Drop every active play on the component before starting this one.
    pub replace_active: bool,
    /// Blend out of the last active play over this many seconds. Requires
    /// `replace_active`.
    pub crossfade: Option<f32>,
}

impl ClipPlayOptions {
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

    #[must_use]
    pub fn start_offset(mut self, seconds: f32) -> Self {
        self.start_offset = seconds;
        self
    }

    #[must_use]
    pub fn replace_active(mut self, replace: bool) -> Self {
        self.replace_active = replace;
        self
    }

    /// Crossfades from the currently active clip; implies `replace_active`.
    #[must_use]
    pub fn crossfade(mut self, seconds: f32) -> Self {
        self.crossfade = Some(seconds);
        self.replace_active = true;
        self
    }
}

/// One active, independently timed play of a clip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipPlay {
    pub clip: usize,
    pub looping: bool,
    pub reverse: bool,
    /// Clock time at which the play started.
    pub start: f64,
    pub start_offset: f32,
    pub duration: f32,
}

impl ClipPlay {
    #[inline]
    #[must_use]
    pub fn elapsed(&self, now: f64) -> f32 {
        self.start_offset + elapsed_since(self.start, now)
    }

    /// Maps elapsed play time to a time inside the clip, honouring looping
    /// and reverse playback.
    #[must_use]
    pub fn sample_time(&self, elapsed: f32) -> f32 {
        let local = if self.looping && self.duration > 0.0 {
            elapsed.rem_euclid(self.duration)
        } else {
            elapsed.clamp(0.0, self.duration.max(0.0))
        };
        if self.reverse {
            (self.duration - local).max(0.0)
        } else {
            local
        }
    }
}

/// A pending blend out of a replaced play.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Crossfade {
    /// The play that was active when the fade started.
    pub from: ClipPlay,
    /// Elapsed time of `from` at the moment it was replaced.
    pub cursor: f32,
    pub duration: f32,
}

/// Animation state of one rigged instance.
pub struct SkeletalAnimationComponent {
    evaluator: Box<dyn PoseEvaluator>,
    plays: Vec<ClipPlay>,
    crossfade: Option<Crossfade>,

    // Scratch poses reused across ticks.
    incoming: Pose,
    outgoing: Pose,
    blended: Pose,
}

impl SkeletalAnimationComponent {
    fn new(evaluator: Box<dyn PoseEvaluator>) -> Self {
        Self {
            evaluator,
            plays: Vec::new(),
            crossfade: None,
            incoming: Pose::default(),
            outgoing: Pose::default(),
            blended: Pose::default(),
        }
    }

    #[must_use]
    pub fn plays(&self) -> &[ClipPlay] {
        &self.plays
    }

    #[must_use]
    pub fn crossfade(&self) -> Option<&Crossfade> {
        self.crossfade.as_ref()
    }

    fn update(&mut self, now: f64, end_epsilon: f32) {
        let mut i = self.plays.len();
        while i > 0 {
            i -= 1;
            let play = self.plays[i];
            let elapsed = play.elapsed(now);

            if !play.looping && elapsed >= play.duration {
                let time = play.sample_time(play.duration - end_epsilon);
                self.evaluator.sample_clip(play.clip, time, &mut self.incoming);
                self.evaluator.apply_pose(&self.incoming);
                self.plays.remove(i);
                self.crossfade = None;
                log::debug!("Clip {} completed", play.clip);
                continue;
            }

            self.evaluator
                .sample_clip(play.clip, play.sample_time(elapsed), &mut self.incoming);

            match self.crossfade {
                Some(fade) if elapsed < fade.duration => {
                    let alpha = (elapsed / fade.duration).max(0.0);
                    let from_time = fade.from.sample_time(fade.cursor + elapsed);
                    self.evaluator
                        .sample_clip(fade.from.clip, from_time, &mut self.outgoing);
                    Pose::blend_into(&self.outgoing, &self.incoming, alpha, &mut self.blended);
                    self.evaluator.apply_pose(&self.blended);
                }
                Some(_) => {
                    self.crossfade = None;
                    self.evaluator.apply_pose(&self.incoming);
                }
                None => self.evaluator.apply_pose(&self.incoming),
            }
        }

        self.evaluator.commit_pose();
    }
}

/// Clip-based animation for every registered rigged instance.
pub struct SkeletalAnimationManager {
    components: ComponentTable<SkeletalAnimationComponent>,
    clock: SharedClock,
    clip_end_epsilon: f32,
}

impl SkeletalAnimationManager {
    #[must_use]
    pub fn new(context: &EngineContext) -> Self {
        Self {
            components: ComponentTable::new(),
            clock: context.clock().clone(),
            clip_end_epsilon: context.settings().animation.clip_end_epsilon,
        }
    }

    /// Registers a rigged instance. Returns `false` if its root already has a
    /// component; the existing component is kept.
    pub fn add_component(&mut self, target: SkeletalTarget) -> bool {
        let added = self
            .components
            .insert(target.root, SkeletalAnimationComponent::new(target.evaluator));
        if added {
            log::trace!("Added skeletal animation component for {}", target.root);
        }
        added
    }

    pub fn remove_component(&mut self, root: EntityId) -> bool {
        let removed = self.components.remove(root).is_some();
        if removed {
            log::trace!("Removed skeletal animation component for {root}");
        }
        removed
    }

    #[must_use]
    pub fn has_component(&self, root: EntityId) -> bool {
        self.components.contains(root)
    }

    #[must_use]
    pub fn component(&self, root: EntityId) -> Option<&SkeletalAnimationComponent> {
        self.components.get(root)
    }

    #[must_use]
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Number of active plays on `root`, zero if it has no component.
    #[must_use]
    pub fn play_count(&self, root: EntityId) -> usize {
        self.components.get(root).map_or(0, |c| c.plays.len())
    }

    /// Clip indices currently playing on `root`, oldest first.
    #[must_use]
    pub fn active_clips(&self, root: EntityId) -> Vec<usize> {
        self.components
            .get(root)
            .map(|c| c.plays.iter().map(|p| p.clip).collect())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn clip_duration(&self, root: EntityId, clip: usize) -> Option<f32> {
        self.components.get(root)?.evaluator.clip_duration(clip)
    }

    /// Starts playing `clip` on `root`.
    ///
    /// A clip that is already playing on the component is left alone.
    pub fn play_clip(
        &mut self,
        root: EntityId,
        clip: usize,
        options: ClipPlayOptions,
    ) -> Result<(), AnimationError> {
        let now = self.clock.now();
        let component = self.component_for(root)?;

        let count = component.evaluator.clip_count();
        if clip >= count {
            log::warn!("Clip index {clip} out of range for {root} ({count} clips)");
            return Err(AnimationError::ClipOutOfRange { index: clip, count });
        }

        let fade = options.crossfade.filter(|&d| d > 0.0);
        if fade.is_some() && !options.replace_active {
            log::warn!("Crossfade requested on {root} without replacing active clips");
            return Err(AnimationError::CrossfadeRequiresReplace);
        }

        if options.replace_active {
            component.crossfade = match (component.plays.last(), fade) {
                (Some(last), Some(duration)) => Some(Crossfade {
                    from: *last,
                    cursor: last.elapsed(now),
                    duration,
                }),
                _ => None,
            };
            component.plays.clear();
        } else {
            component.crossfade = None;
        }

        if component.plays.iter().any(|p| p.clip == clip) {
            log::debug!("Clip {clip} already playing on {root}");
            return Ok(());
        }

        let duration = component.evaluator.clip_duration(clip).unwrap_or(0.0);
        component.plays.push(ClipPlay {
            clip,
            looping: options.looping,
            reverse: options.reverse,
            start: now,
            start_offset: options.start_offset,
            duration,
        });
        log::debug!("Playing clip {clip} on {root} ({duration:.3}s)");
        Ok(())
    }

    /// Stops every play of `clip` on `root`. Stopping a clip that is not
    /// playing is a no-op.
    pub fn stop_clip(&mut self, root: EntityId, clip: usize) -> Result<(), AnimationError> {
        let component = self.component_for(root)?;
        component.plays.retain(|p| p.clip != clip);
        if component.crossfade.is_some_and(|f| f.from.clip == clip) {
            component.crossfade = None;
        }
        Ok(())
    }

    /// Applies `clip` at `time` and commits immediately, outside the tick.
    pub fn seek_clip(&mut self, root: EntityId, clip: usize, time: f32) -> Result<(), AnimationError> {
        let component = self.component_for(root)?;
        let count = component.evaluator.clip_count();
        if clip >= count {
            log::warn!("Clip index {clip} out of range for {root} ({count} clips)");
            return Err(AnimationError::ClipOutOfRange { index: clip, count });
        }
        component.evaluator.apply_clip(clip, time);
        component.evaluator.commit_pose();
        Ok(())
    }

    fn component_for(
        &mut self,
        root: EntityId,
    ) -> Result<&mut SkeletalAnimationComponent, AnimationError> {
        self.components.get_mut(root).ok_or_else(|| {
            log::warn!("{root} has no skeletal animation component");
            AnimationError::UnknownComponent(root)
        })
    }
}

impl AnimationUpdate for SkeletalAnimationManager {
    fn name(&self) -> &'static str {
        "skeletal"
    }

    fn update(&mut self, now: f64) {
        log::trace!("Updating {} skeletal components", self.components.len());
        let epsilon = self.clip_end_epsilon;
        for (_, component) in self.components.iter_mut() {
            if component.plays.is_empty() {
                continue;
            }
            component.update(now, epsilon);
        }
    }
}
