//! Error Types
//!
//! This module defines the error types used throughout the engine.
//!
//! # Overview
//!
//! The main error type [`Error`] wraps the failure domains of the core:
//! - Task execution failures delivered through task handles
//! - Animation misuse (stale components, bad clip or joint indices, malformed buffers)
//! - Scheduler lifecycle failures
//!
//! Producer-side misuse never escalates beyond these values. The frame
//! production path reports nothing but "no frame was produced this tick".
//!
//! # Usage
//!
//! ```rust,ignore
//! use ember_core::errors::{Error, Result};
//!
//! fn play() -> Result<()> {
//!     Ok(())
//! }
//! ```

use thiserror::Error;

use crate::ids::EntityId;

/// The main error type for the Ember engine.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Task Errors
    // ========================================================================
    /// A queued unit of work failed.
    #[error(transparent)]
    Task(#[from] TaskError),

    // ========================================================================
    // Animation Errors
    // ========================================================================
    /// An animation request could not be honoured.
    #[error(transparent)]
    Animation(#[from] AnimationError),

    // ========================================================================
    // Scheduler Errors
    // ========================================================================
    /// The scheduler could not accept or run work.
    #[error(transparent)]
    Scheduler(#[from] SchedulerError),
}

/// Failure delivered through a task's result handle.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    /// The task panicked while running on the scheduler thread.
    #[error("Task panicked: {0}")]
    Panicked(String),

    /// The task was dropped before it produced a result.
    #[error("Task was dropped before completion")]
    Dropped,

    /// Waiting for the result timed out. The task itself may still run.
    #[error("Timed out waiting for task result")]
    Timeout,
}

/// Producer-side misuse of the animation API.
///
/// These are logged and ignored by the managers; the value is only handed
/// back so the caller's task handle can observe it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnimationError {
    /// No animation component is registered for the entity.
    #[error("Entity {0} has no animation component")]
    UnknownComponent(EntityId),

    /// The requested clip does not exist on the target.
    #[error("Clip index {index} out of range (target has {count} clips)")]
    ClipOutOfRange {
        /// Requested clip index
        index: usize,
        /// Number of clips the evaluator exposes
        count: usize,
    },

    /// A crossfade was requested without replacing the active clips.
    #[error("Crossfade is only supported when replacing active clips")]
    CrossfadeRequiresReplace,

    /// The morph frame buffer does not match its declared layout.
    #[error("Invalid morph buffer: {0}")]
    InvalidMorphBuffer(String),

    /// The morph play handle is stale or belongs to another entity.
    #[error("Morph play not found on entity {0}")]
    UnknownMorphPlay(EntityId),

    /// The bone clip does not match its declared layout.
    #[error("Invalid bone clip: {0}")]
    InvalidBoneClip(String),

    /// The requested joint does not exist on the skin.
    #[error("Joint {joint} out of range for skin {skin} ({count} joints)")]
    JointOutOfRange {
        skin: usize,
        joint: usize,
        count: usize,
    },

    /// No animation system is registered with the frame dispatcher.
    #[error("No animation system is registered")]
    NotRegistered,
}

/// Scheduler lifecycle failures.
#[derive(Error, Debug)]
pub enum SchedulerError {
    /// The dedicated render thread could not be spawned.
    #[error("Failed to spawn render thread: {0}")]
    ThreadSpawn(#[from] std::io::Error),
}

/// Alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
