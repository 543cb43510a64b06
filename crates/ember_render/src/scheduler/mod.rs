//! Render Scheduler
//!
//! Owns a [`FrameSource`] on a single execution context and serialises every
//! mutation of it through the task queue. Two strategies are available:
//!
//! - [`DedicatedThread`]: a private thread waits on a condition variable for
//!   work, a pending frame or a stop request, with a short bounded timeout.
//! - [`Cooperative`]: the host calls [`RenderScheduler::step`] from its own
//!   loop; each step runs iterations until idle or the step budget is spent.
//!
//! Either way one iteration runs the tasks queued at its start in FIFO order,
//! then dispatches the pending frame. Frame requests coalesce: while a frame
//! is pending further requests are no-ops.
//!
//! Stopping is cooperative. Work in progress finishes, and tasks queued
//! before the queue closes still run, on the scheduler context, before the
//! source is handed back.

mod cooperative;
mod threaded;
mod worker;

use std::fmt;
use std::sync::Arc;

use ember_core::{EngineContext, SchedulerError, SchedulerMode};

use crate::dispatcher::FrameSource;
use crate::frame::FrameCallback;
use crate::task::TaskHandle;

pub use cooperative::Cooperative;
pub use threaded::DedicatedThread;

use worker::{Shared, Worker};

/// Counters maintained by the scheduler.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameStats {
    /// Dispatches that drew at least one target.
    pub frames_rendered: u64,
    /// Dispatches where no target was ready.
    pub frames_skipped: u64,
    /// Frames per second, refreshed once per second of frame time.
    pub fps: f32,
    /// Timestamp of the last rendered frame.
    pub last_frame_time: f64,
}

/// An execution strategy for the scheduler's worker.
pub trait SchedulerStrategy<C>: Send {
    fn mode(&self) -> SchedulerMode;

    /// Runs one time-boxed slice of work on the calling thread. Strategies
    /// that own their own thread do nothing and return `false`.
    fn step(&mut self) -> bool;

    /// Stops the worker after it has run every queued task and returns the
    /// source. Returns `None` if already stopped or the worker died.
    fn shutdown(&mut self) -> Option<C>;
}

/// Cloneable, thread-safe entry point into a running scheduler.
pub struct SchedulerHandle<C> {
    shared: Arc<Shared<C>>,
}

impl<C> Clone for SchedulerHandle<C> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<C: FrameSource> SchedulerHandle<C> {
    /// Queues `work` to run on the scheduler context.
    pub fn enqueue<F, R>(&self, work: F) -> TaskHandle<R>
    where
        F: FnOnce(&mut C) -> R + Send + 'static,
        R: Send + 'static,
    {
        self.shared.queue.enqueue(work)
    }

    /// Requests a frame. Returns `false` if one is already pending, in which
    /// case nothing changes.
    pub fn request_frame(&self) -> bool {
        self.shared.frame.request(None)
    }

    /// Requests a frame and runs `on_complete` on the scheduler once it has
    /// been produced. A coalesced request drops `on_complete` uncalled.
    pub fn request_frame_with(&self, on_complete: impl FnOnce() + Send + 'static) -> bool {
        let callback: FrameCallback = Box::new(on_complete);
        self.shared.frame.request(Some(callback))
    }

    #[must_use]
    pub fn is_frame_pending(&self) -> bool {
        self.shared.frame.is_pending()
    }

    #[must_use]
    pub fn stats(&self) -> FrameStats {
        *self.shared.stats.lock()
    }

    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.shared.is_stopping()
    }

    #[must_use]
    pub fn queued_tasks(&self) -> usize {
        self.shared.queue.len()
    }
}

impl<C> fmt::Debug for SchedulerHandle<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchedulerHandle")
            .field("queue", &self.shared.queue)
            .field("frame", &self.shared.frame)
            .finish_non_exhaustive()
    }
}

/// Sole owner of a frame source.
pub struct RenderScheduler<C: FrameSource> {
    handle: SchedulerHandle<C>,
    strategy: Box<dyn SchedulerStrategy<C>>,
}

impl<C: FrameSource> RenderScheduler<C> {
    /// Starts a scheduler with the strategy selected in the context's
    /// settings.
    pub fn new(context: &EngineContext, source: C) -> Result<Self, SchedulerError> {
        let settings = &context.settings().scheduler;
        let shared = Arc::new(Shared::new());
        let worker = Worker::new(shared.clone(), source, context.clock().clone());

        let strategy: Box<dyn SchedulerStrategy<C>> = match settings.mode {
            SchedulerMode::DedicatedThread => {
                Box::new(DedicatedThread::spawn(worker, shared.clone(), settings)?)
            }
            SchedulerMode::Cooperative => {
                Box::new(Cooperative::new(worker, shared.clone(), settings.step_budget))
            }
        };

        Ok(Self {
            handle: SchedulerHandle { shared },
            strategy,
        })
    }

    #[inline]
    #[must_use]
    pub fn handle(&self) -> &SchedulerHandle<C> {
        &self.handle
    }

    #[must_use]
    pub fn mode(&self) -> SchedulerMode {
        self.strategy.mode()
    }

    pub fn enqueue<F, R>(&self, work: F) -> TaskHandle<R>
    where
        F: FnOnce(&mut C) -> R + Send + 'static,
        R: Send + 'static,
    {
        self.handle.enqueue(work)
    }

    pub fn request_frame(&self) -> bool {
        self.handle.request_frame()
    }

    pub fn request_frame_with(&self, on_complete: impl FnOnce() + Send + 'static) -> bool {
        self.handle.request_frame_with(on_complete)
    }

    #[must_use]
    pub fn stats(&self) -> FrameStats {
        self.handle.stats()
    }

    /// Drives a cooperative scheduler for one step. Returns whether any task
    /// ran or frame was produced.
    pub fn step(&mut self) -> bool {
        self.strategy.step()
    }

    /// Stops the scheduler, runs every task still queued and returns the
    /// source. Later calls return `None`.
    pub fn stop(&mut self) -> Option<C> {
        self.strategy.shutdown()
    }
}

impl<C: FrameSource> Drop for RenderScheduler<C> {
    fn drop(&mut self) {
        drop(self.strategy.shutdown());
    }
}

impl<C: FrameSource> fmt::Debug for RenderScheduler<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderScheduler")
            .field("mode", &self.strategy.mode())
            .field("handle", &self.handle)
            .finish()
    }
}
