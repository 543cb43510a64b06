//! Engine Facade
//!
//! This module contains [`Engine`], the entry point an embedding host talks
//! to. It owns a [`RenderScheduler`] driving a [`FrameDispatcher`] with an
//! [`AnimationSystem`] registered on it.
//!
//! # Threading
//!
//! Every method takes `&self` and may be called from any thread. Mutations
//! are expressed as tasks: the call returns immediately with a
//! [`TaskHandle`], and the mutation runs on the scheduler context in
//! submission order.
//!
//! # Example
//!
//! ```rust,ignore
//! use ember::{Engine, EngineContext, TargetId, ViewId};
//!
//! let engine = Engine::new(EngineContext::default(), renderer, weight_sink)?;
//! engine.set_renderable(TargetId(1), [ViewId(1)]);
//!
//! // Host frame callback
//! engine.request_frame();
//!
//! let dispatcher = engine.shutdown();
//! ```

use ember_animation::{
    AnimationSystem, AnimationTarget, BoneClip, ClipPlayOptions, MorphClip, MorphPlayHandle,
    MorphWeightSink, TargetKey,
};
use glam::Mat4;
use ember_core::{AnimationError, EngineContext, EntityId, Result, TargetId, ViewId};
use ember_render::{
    FrameDispatcher, FrameRenderer, FrameStats, RenderScheduler, SchedulerHandle, TaskHandle,
};

/// Result delivered by animation tasks.
pub type AnimationResult<T> = std::result::Result<T, AnimationError>;

/// The host-facing engine instance.
///
/// # Lifecycle
///
/// 1. Create with [`Engine::new`]; the scheduler starts immediately
/// 2. Register targets with [`Engine::set_renderable`]
/// 3. Call [`Engine::request_frame`] whenever the host wants a frame
/// 4. In cooperative mode, call [`Engine::step`] from the host loop
/// 5. Tear down with [`Engine::shutdown`], or drop the engine
pub struct Engine<R: FrameRenderer> {
    context: EngineContext,
    scheduler: RenderScheduler<FrameDispatcher<R>>,
}

impl<R: FrameRenderer> Engine<R> {
    /// Creates the engine and starts its scheduler.
    ///
    /// # Arguments
    ///
    /// * `context` - Settings and clock shared by every subsystem
    /// * `renderer` - The host renderer drawing views into targets
    /// * `weights` - Receives morph-target weights
    ///
    /// # Errors
    ///
    /// Fails if the dedicated render thread cannot be spawned.
    pub fn new(
        context: EngineContext,
        renderer: R,
        weights: impl MorphWeightSink + 'static,
    ) -> Result<Self> {
        let mut dispatcher = FrameDispatcher::new(renderer);
        dispatcher.add_animation_manager(AnimationSystem::new(&context, weights));
        let scheduler = RenderScheduler::new(&context, dispatcher)?;
        log::info!("Engine started in {:?} mode", scheduler.mode());
        Ok(Self { context, scheduler })
    }

    #[inline]
    #[must_use]
    pub fn context(&self) -> &EngineContext {
        &self.context
    }

    /// Returns a cloneable handle for producers on other threads.
    #[inline]
    #[must_use]
    pub fn handle(&self) -> SchedulerHandle<FrameDispatcher<R>> {
        self.scheduler.handle().clone()
    }

    #[must_use]
    pub fn stats(&self) -> FrameStats {
        self.scheduler.stats()
    }

    // ========================================================================
    // Scheduling
    // ========================================================================

    /// Queues arbitrary work against the dispatcher.
    pub fn enqueue<F, T>(&self, work: F) -> TaskHandle<T>
    where
        F: FnOnce(&mut FrameDispatcher<R>) -> T + Send + 'static,
        T: Send + 'static,
    {
        self.scheduler.enqueue(work)
    }

    /// Requests a frame. Returns `false` if one is already pending.
    pub fn request_frame(&self) -> bool {
        self.scheduler.request_frame()
    }

    /// Requests a frame and calls `on_complete` once it has been produced.
    /// A coalesced request never calls `on_complete`.
    pub fn request_frame_with(&self, on_complete: impl FnOnce() + Send + 'static) -> bool {
        self.scheduler.request_frame_with(on_complete)
    }

    /// Drives a cooperative scheduler for one time-boxed step.
    pub fn step(&mut self) -> bool {
        self.scheduler.step()
    }

    /// Stops the scheduler after running every queued task and returns the
    /// dispatcher.
    #[must_use]
    pub fn shutdown(mut self) -> Option<FrameDispatcher<R>> {
        self.scheduler.stop()
    }

    // ========================================================================
    // Renderables
    // ========================================================================

    pub fn set_renderable(
        &self,
        target: TargetId,
        views: impl IntoIterator<Item = ViewId>,
    ) -> TaskHandle<()> {
        let views: Vec<ViewId> = views.into_iter().collect();
        self.enqueue(move |dispatcher| dispatcher.set_renderable(target, views))
    }

    pub fn remove_renderable(&self, target: TargetId) -> TaskHandle<bool> {
        self.enqueue(move |dispatcher| dispatcher.remove_renderable(target))
    }

    // ========================================================================
    // Animation
    // ========================================================================

    /// Creates the animation component for `target`. Resolves to `false` if
    /// one already exists.
    pub fn add_animation_component(&self, target: AnimationTarget) -> TaskHandle<AnimationResult<bool>> {
        self.with_animation(move |animation| Ok(animation.add_component(target)))
    }

    pub fn remove_animation_component(&self, key: TargetKey) -> TaskHandle<AnimationResult<bool>> {
        self.with_animation(move |animation| Ok(animation.remove_component(key)))
    }

    /// Releases all animation state of an entity the host has destroyed.
    pub fn on_entity_destroyed(&self, entity: EntityId) -> TaskHandle<AnimationResult<()>> {
        self.with_animation(move |animation| {
            animation.on_entity_destroyed(entity);
            Ok(())
        })
    }

    pub fn play_clip(
        &self,
        root: EntityId,
        clip: usize,
        options: ClipPlayOptions,
    ) -> TaskHandle<AnimationResult<()>> {
        self.with_animation(move |animation| animation.play_clip(root, clip, options))
    }

    pub fn stop_clip(&self, root: EntityId, clip: usize) -> TaskHandle<AnimationResult<()>> {
        self.with_animation(move |animation| animation.stop_clip(root, clip))
    }

    pub fn seek_clip(
        &self,
        root: EntityId,
        clip: usize,
        time: f32,
    ) -> TaskHandle<AnimationResult<()>> {
        self.with_animation(move |animation| animation.skeletal_mut().seek_clip(root, clip, time))
    }

    /// Layers a frame-buffer clip over one joint of `root`.
    pub fn play_bone_clip(&self, root: EntityId, clip: BoneClip) -> TaskHandle<AnimationResult<()>> {
        self.with_animation(move |animation| animation.play_bone_clip(root, clip))
    }

    pub fn clear_bone_clips(&self, root: EntityId) -> TaskHandle<AnimationResult<()>> {
        self.with_animation(move |animation| animation.clear_bone_clips(root))
    }

    pub fn set_bone_transform(
        &self,
        root: EntityId,
        skin: usize,
        bone: usize,
        matrix: Mat4,
    ) -> TaskHandle<AnimationResult<()>> {
        self.with_animation(move |animation| animation.set_bone_transform(root, skin, bone, matrix))
    }

    pub fn reset_to_rest_pose(&self, root: EntityId) -> TaskHandle<AnimationResult<()>> {
        self.with_animation(move |animation| animation.reset_to_rest_pose(root))
    }

    pub fn play_morph_clip(
        &self,
        entity: EntityId,
        clip: MorphClip,
    ) -> TaskHandle<AnimationResult<MorphPlayHandle>> {
        self.with_animation(move |animation| animation.play_morph_clip(entity, clip))
    }

    pub fn stop_morph_clip(
        &self,
        entity: EntityId,
        handle: MorphPlayHandle,
    ) -> TaskHandle<AnimationResult<()>> {
        self.with_animation(move |animation| animation.stop_morph_clip(entity, handle))
    }

    pub fn clear_morph_clips(&self, entity: EntityId) -> TaskHandle<AnimationResult<()>> {
        self.with_animation(move |animation| animation.morph_mut().clear_morph_clips(entity))
    }

    pub fn set_morph_weights(
        &self,
        entity: EntityId,
        weights: impl Into<Vec<f32>>,
    ) -> TaskHandle<AnimationResult<()>> {
        let weights = weights.into();
        self.with_animation(move |animation| {
            animation.morph_mut().set_morph_weights(entity, &weights);
            Ok(())
        })
    }

    /// Runs `f` against the registered [`AnimationSystem`] on the scheduler.
    pub fn with_animation<F, T>(&self, f: F) -> TaskHandle<AnimationResult<T>>
    where
        F: FnOnce(&mut AnimationSystem) -> AnimationResult<T> + Send + 'static,
        T: Send + 'static,
    {
        self.enqueue(move |dispatcher| match dispatcher.animation_manager_mut::<AnimationSystem>() {
            Some(animation) => f(animation),
            None => {
                log::warn!("Animation request ignored: no animation system registered");
                Err(AnimationError::NotRegistered)
            }
        })
    }
}

impl<R: FrameRenderer> std::fmt::Debug for Engine<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("context", &self.context)
            .field("scheduler", &self.scheduler)
            .finish()
    }
}
