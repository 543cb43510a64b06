//! Ember Core
//!
//! Foundational types shared by every Ember crate:
//!
//! - [`ids`]: opaque entity, presentation-target and view identities
//! - [`errors`]: the engine error taxonomy
//! - [`time`]: clocks and frame-rate measurement
//! - [`settings`]: construction-time configuration
//! - [`context`]: the explicit engine context passed to every subsystem
//! - [`component_table`]: sparse per-entity component storage
//! - [`buffer`]: host-owned buffers with delegated release

pub mod buffer;
pub mod component_table;
pub mod context;
pub mod errors;
pub mod ids;
pub mod settings;
pub mod time;

pub use buffer::HostBuffer;
pub use component_table::ComponentTable;
pub use context::EngineContext;
pub use errors::{AnimationError, Error, Result, SchedulerError, TaskError};
pub use ids::{EntityId, TargetId, ViewId};
pub use settings::{AnimationSettings, EngineSettings, SchedulerMode, SchedulerSettings};
pub use time::{FpsCounter, ManualClock, MonotonicClock, SharedClock, TimeSource, elapsed_since};
