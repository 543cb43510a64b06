//! Ember Render
//!
//! Frame scheduling for hosts that drive an external renderer:
//!
//! - [`task`]: the cross-thread task queue and result handles
//! - [`scheduler`]: the render scheduler and its strategies
//! - [`dispatcher`]: advances animation and draws every registered target
//! - [`registry`]: presentation targets and their view lists
//! - [`renderer`]: the renderer capability implemented by the host
//!
//! Producers never touch renderer or animation state directly. They enqueue
//! tasks and request frames; the scheduler owns the [`FrameDispatcher`] and
//! runs both on one execution context.

pub mod dispatcher;
pub mod frame;
pub mod registry;
pub mod renderer;
pub mod scheduler;
pub mod signal;
pub mod task;

pub use dispatcher::{FrameDispatcher, FrameSource};
pub use frame::{FrameCallback, PendingFrame};
pub use registry::{RenderableEntry, RenderableRegistry, Renderables, ViewList};
pub use renderer::FrameRenderer;
pub use scheduler::{
    Cooperative, DedicatedThread, FrameStats, RenderScheduler, SchedulerHandle, SchedulerStrategy,
};
pub use signal::WakeSignal;
pub use task::{Task, TaskHandle, TaskQueue};
