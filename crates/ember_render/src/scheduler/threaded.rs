use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use ember_core::{SchedulerError, SchedulerMode, SchedulerSettings};

use crate::dispatcher::FrameSource;

use super::SchedulerStrategy;
use super::worker::{Shared, Worker};

/// Runs the worker on a private thread that sleeps on the wake signal.
pub struct DedicatedThread<C> {
    shared: Arc<Shared<C>>,
    thread: Option<JoinHandle<Option<C>>>,
}

impl<C: FrameSource> DedicatedThread<C> {
    pub(crate) fn spawn(
        worker: Worker<C>,
        shared: Arc<Shared<C>>,
        settings: &SchedulerSettings,
    ) -> Result<Self, SchedulerError> {
        let timeout = settings.wait_timeout;
        let thread_shared = shared.clone();
        let thread = thread::Builder::new()
            .name(settings.thread_name.clone())
            .spawn(move || run(worker, &thread_shared, timeout))?;
        log::info!("Render thread '{}' started", settings.thread_name);
        Ok(Self {
            shared,
            thread: Some(thread),
        })
    }
}

fn run<C: FrameSource>(mut worker: Worker<C>, shared: &Shared<C>, timeout: Duration) -> Option<C> {
    let outcome = panic::catch_unwind(AssertUnwindSafe(move || {
        while !shared.is_stopping() {
            if !worker.has_work() {
                worker.wait(timeout);
                continue;
            }
            worker.iterate();
        }
        worker.finish()
    }));

    match outcome {
        Ok(source) => Some(source),
        Err(_) => {
            shared.queue.close();
            let lost = shared.queue.discard();
            log::error!("Render thread terminated by a panic; {lost} queued tasks were dropped");
            None
        }
    }
}

impl<C: FrameSource> SchedulerStrategy<C> for DedicatedThread<C> {
    fn mode(&self) -> SchedulerMode {
        SchedulerMode::DedicatedThread
    }

    fn step(&mut self) -> bool {
        false
    }

    fn shutdown(&mut self) -> Option<C> {
        let thread = self.thread.take()?;
        self.shared.request_stop();
        match thread.join() {
            Ok(source) => source,
            Err(_) => {
                log::error!("Render thread could not be joined");
                None
            }
        }
    }
}
