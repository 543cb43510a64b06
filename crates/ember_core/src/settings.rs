//! Engine Settings
//!
//! Construction-time configuration for the scheduler and the animation
//! managers.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use ember_core::settings::{EngineSettings, SchedulerMode};
//!
//! // Default: a dedicated render thread
//! let settings = EngineSettings::default();
//!
//! // Single-threaded host that drives `step()` from its own main loop
//! let mut settings = EngineSettings::default();
//! settings.scheduler.mode = SchedulerMode::Cooperative;
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// How the render scheduler obtains its execution context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SchedulerMode {
    /// A private worker thread owns all renderer state and loops until stopped.
    #[default]
    DedicatedThread,

    /// The host owns the main loop and calls `step()` repeatedly. Each step is
    /// bounded by [`SchedulerSettings::step_budget`].
    Cooperative,
}

/// Scheduler configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerSettings {
    pub mode: SchedulerMode,

    /// Upper bound on how long the dedicated thread sleeps waiting for work.
    ///
    /// Bounds the latency between a request and its service; it is never
    /// surfaced as an error.
    pub wait_timeout: Duration,

    /// Time box for a single cooperative `step()`.
    pub step_budget: Duration,

    /// Name given to the dedicated render thread.
    pub thread_name: String,
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self {
            mode: SchedulerMode::default(),
            wait_timeout: Duration::from_millis(2),
            step_budget: Duration::from_millis(12),
            thread_name: "ember-render".to_string(),
        }
    }
}

/// Animation manager configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationSettings {
    /// Distance from the end of a clip at which the final pose of a
    /// non-looping play is sampled, avoiding exact-boundary sampling.
    pub clip_end_epsilon: f32,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            clip_end_epsilon: 0.001,
        }
    }
}

/// Top-level engine configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub scheduler: SchedulerSettings,
    pub animation: AnimationSettings,
}
