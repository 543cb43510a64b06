//! # Ember
//!
//! The frame-scheduling and per-frame animation core of an embedded
//! real-time renderer.
//!
//! Hosts submit work from any thread; a single scheduler context owns the
//! renderer, the renderable registry and every animation component table,
//! runs the submitted work in order and produces coalesced frames on request.
//!
//! ## Crates
//!
//! - [`ember_core`]: identifiers, errors, clocks, settings, the engine context
//! - [`ember_animation`]: skeletal, bone and morph-target animation managers
//! - [`ember_render`]: task queue, render scheduler and frame dispatcher
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ember::prelude::*;
//!
//! let engine = Engine::new(EngineContext::default(), renderer, sink)?;
//! engine.set_renderable(TargetId(1), [ViewId(1)]);
//! engine.add_animation_component(AnimationTarget::skeletal(EntityId(7), evaluator));
//! engine.play_clip(EntityId(7), 0, ClipPlayOptions::default().looping(true));
//! engine.request_frame();
//! ```

pub mod engine;

pub use ember_animation;
pub use ember_core;
pub use ember_render;
pub use glam;

pub use engine::{AnimationResult, Engine};

pub use ember_core::{
    AnimationError, AnimationSettings, EngineContext, EngineSettings, EntityId, Error, FpsCounter,
    HostBuffer, ManualClock, MonotonicClock, Result, SchedulerError, SchedulerMode,
    SchedulerSettings, SharedClock, TargetId, TaskError, TimeSource, ViewId, elapsed_since,
};

pub use ember_animation::{
    AnimationSystem, AnimationTarget, AnimationUpdate, BoneClip, BoneRig, BoneTarget,
    ClipPlayOptions, JointTransform, MorphClip, MorphPlayHandle, MorphWeightSink, Pose,
    PoseEvaluator, SkeletalTarget, TargetKey,
};

pub use ember_render::{
    FrameDispatcher, FrameRenderer, FrameSource, FrameStats, RenderScheduler, RenderableRegistry,
    SchedulerHandle, TaskHandle, TaskQueue,
};

pub mod prelude {
    pub use crate::engine::Engine;
    pub use ember_animation::{
        AnimationTarget, BoneClip, BoneRig, ClipPlayOptions, MorphClip, MorphWeightSink, Pose,
        PoseEvaluator, TargetKey,
    };
    pub use ember_core::{EngineContext, EngineSettings, EntityId, TargetId, ViewId};
    pub use ember_render::{FrameRenderer, TaskHandle};
}
