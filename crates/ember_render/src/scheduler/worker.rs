use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use ember_core::{FpsCounter, SharedClock};
use parking_lot::Mutex;

use crate::dispatcher::FrameSource;
use crate::frame::PendingFrame;
use crate::signal::WakeSignal;
use crate::task::TaskQueue;

use super::FrameStats;

/// State shared between producers and the worker.
pub(crate) struct Shared<C> {
    pub(crate) signal: Arc<WakeSignal>,
    pub(crate) queue: TaskQueue<C>,
    pub(crate) frame: PendingFrame,
    pub(crate) stopping: AtomicBool,
    pub(crate) stats: Mutex<FrameStats>,
}

impl<C> Shared<C> {
    pub(crate) fn new() -> Self {
        let signal = Arc::new(WakeSignal::new());
        Self {
            queue: TaskQueue::new(signal.clone()),
            frame: PendingFrame::new(signal.clone()),
            signal,
            stopping: AtomicBool::new(false),
            stats: Mutex::new(FrameStats::default()),
        }
    }

    #[inline]
    pub(crate) fn is_stopping(&self) -> bool {
        self.stopping.load(Ordering::Acquire)
    }

    pub(crate) fn request_stop(&self) {
        self.stopping.store(true, Ordering::Release);
        self.signal.notify();
    }
}

/// Owns the frame source and runs scheduler iterations against it.
pub(crate) struct Worker<C> {
    shared: Arc<Shared<C>>,
    source: C,
    clock: SharedClock,
    fps: FpsCounter,
    // Set after a dispatch produced nothing; the next wait then ignores the
    // pending frame so a target that is not ready is retried per timeout
    // instead of spinning.
    backoff: bool,
}

impl<C: FrameSource> Worker<C> {
    pub(crate) fn new(shared: Arc<Shared<C>>, source: C, clock: SharedClock) -> Self {
        Self {
            shared,
            source,
            clock,
            fps: FpsCounter::new(),
            backoff: false,
        }
    }

    /// One scheduler iteration: run the tasks queued so far, then dispatch
    /// the pending frame if there is one. Returns whether anything happened.
    pub(crate) fn iterate(&mut self) -> bool {
        let executed = self.shared.queue.drain_batch(&mut self.source);
        let rendered = self.dispatch();
        executed > 0 || rendered
    }

    fn dispatch(&mut self) -> bool {
        if !self.shared.frame.is_pending() {
            return false;
        }

        let now = self.clock.now();
        if !self.source.render(now) {
            self.backoff = true;
            self.shared.stats.lock().frames_skipped += 1;
            return false;
        }
        self.backoff = false;

        let on_complete = self.shared.frame.complete();
        {
            let mut stats = self.shared.stats.lock();
            stats.frames_rendered += 1;
            stats.last_frame_time = now;
            if let Some(fps) = self.fps.update(now) {
                stats.fps = fps;
            }
        }
        if let Some(callback) = on_complete {
            callback();
        }
        true
    }

    /// Whether the next iteration has something to do.
    pub(crate) fn has_work(&self) -> bool {
        ready(&self.shared, self.backoff)
    }

    /// Sleeps until work arrives, a stop is requested or `timeout` passes.
    pub(crate) fn wait(&mut self, timeout: Duration) {
        let shared = &self.shared;
        let backoff = self.backoff;
        shared.signal.wait_until(timeout, || ready(shared, backoff));
        self.backoff = false;
    }

    /// Refuses further work and runs everything still queued.
    pub(crate) fn finish(mut self) -> C {
        self.shared.queue.close();
        let drained = self.shared.queue.drain_all(&mut self.source);
        log::info!("Render scheduler stopped; drained {drained} queued tasks");
        self.source
    }
}

fn ready<C>(shared: &Shared<C>, backoff: bool) -> bool {
    shared.is_stopping()
        || !shared.queue.is_empty()
        || (!backoff && shared.frame.is_pending())
}
