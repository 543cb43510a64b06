use std::sync::Arc;
use std::time::Duration;

use ember_core::{MonotonicClock, SchedulerMode, TimeSource};

use crate::dispatcher::FrameSource;

use super::SchedulerStrategy;
use super::worker::{Shared, Worker};

/// Runs the worker inline, in time-boxed slices driven by the host's loop.
pub struct Cooperative<C> {
    shared: Arc<Shared<C>>,
    worker: Option<Worker<C>>,
    budget: Duration,
}

impl<C: FrameSource> Cooperative<C> {
    pub(crate) fn new(worker: Worker<C>, shared: Arc<Shared<C>>, budget: Duration) -> Self {
        log::info!("Cooperative render scheduler started ({budget:?} per step)");
        Self {
            shared,
            worker: Some(worker),
            budget,
        }
    }
}

impl<C: FrameSource> SchedulerStrategy<C> for Cooperative<C> {
    fn mode(&self) -> SchedulerMode {
        SchedulerMode::Cooperative
    }

    fn step(&mut self) -> bool {
        let Some(worker) = self.worker.as_mut() else {
            return false;
        };

        let stopwatch = MonotonicClock::new();
        let budget = self.budget.as_secs_f64();
        let mut progressed = false;
        while !self.shared.is_stopping() {
            if !worker.iterate() {
                break;
            }
            progressed = true;
            if stopwatch.now() >= budget {
                break;
            }
        }
        progressed
    }

    fn shutdown(&mut self) -> Option<C> {
        let worker = self.worker.take()?;
        self.shared.request_stop();
        Some(worker.finish())
    }
}
