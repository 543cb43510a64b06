//! Task Queue
//!
//! The cross-thread entry point for every mutation of scheduler-owned state.
//! Producers enqueue closures that receive `&mut C`, the context owned by the
//! scheduler; the scheduler executes them inline, oldest first, exactly once.
//!
//! Each enqueue returns a [`TaskHandle`] through which the closure's return
//! value, or the panic it raised, is delivered. A panicking task never
//! unwinds into the drain loop.

use std::any::Any;
use std::collections::VecDeque;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;

use ember_core::TaskError;
use parking_lot::Mutex;

use crate::signal::WakeSignal;

type TaskFn<C> = Box<dyn FnOnce(&mut C) + Send>;

/// A queued unit of work.
pub struct Task<C> {
    run: TaskFn<C>,
}

impl<C> Task<C> {
    fn wrap<F, R>(work: F) -> (Self, TaskHandle<R>)
    where
        F: FnOnce(&mut C) -> R + Send + 'static,
        R: Send + 'static,
    {
        let (tx, rx) = flume::bounded(1);
        let run: TaskFn<C> = Box::new(move |context: &mut C| {
            let result = panic::catch_unwind(AssertUnwindSafe(|| work(context)))
                .map_err(|payload| TaskError::Panicked(panic_message(&*payload)));
            if let Err(TaskError::Panicked(message)) = &result {
                log::error!("Task panicked: {message}");
            }
            // The caller may have discarded its handle.
            let _ = tx.send(result);
        });
        (Self { run }, TaskHandle { rx })
    }

    #[inline]
    pub fn run(self, context: &mut C) {
        (self.run)(context);
    }
}

impl<C> fmt::Debug for Task<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task").finish_non_exhaustive()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Receiving end of a task's result.
///
/// Dropping the handle does not cancel the task.
#[derive(Debug)]
pub struct TaskHandle<R> {
    rx: flume::Receiver<Result<R, TaskError>>,
}

impl<R> TaskHandle<R> {
    /// Blocks until the task has run.
    ///
    /// Must not be called from the scheduler thread for a task queued on the
    /// same scheduler.
    pub fn wait(self) -> Result<R, TaskError> {
        self.rx.recv().unwrap_or(Err(TaskError::Dropped))
    }

    /// Blocks for at most `timeout`. A timeout leaves the task queued.
    pub fn wait_timeout(&self, timeout: Duration) -> Result<R, TaskError> {
        match self.rx.recv_timeout(timeout) {
            Ok(result) => result,
            Err(flume::RecvTimeoutError::Timeout) => Err(TaskError::Timeout),
            Err(flume::RecvTimeoutError::Disconnected) => Err(TaskError::Dropped),
        }
    }

    /// Returns the result if the task has already run.
    pub fn try_take(&self) -> Option<Result<R, TaskError>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(flume::TryRecvError::Empty) => None,
            Err(flume::TryRecvError::Disconnected) => Some(Err(TaskError::Dropped)),
        }
    }

    /// Awaits the result without blocking the calling thread.
    pub async fn recv(self) -> Result<R, TaskError> {
        self.rx.recv_async().await.unwrap_or(Err(TaskError::Dropped))
    }
}

struct QueueState<C> {
    tasks: VecDeque<Task<C>>,
    closed: bool,
}

/// Thread-safe FIFO of tasks executed against a context `C`.
pub struct TaskQueue<C> {
    state: Mutex<QueueState<C>>,
    signal: Arc<WakeSignal>,
}

impl<C> Default for TaskQueue<C> {
    fn default() -> Self {
        Self::new(Arc::new(WakeSignal::new()))
    }
}

impl<C> TaskQueue<C> {
    /// Creates a queue that wakes `signal` on every enqueue.
    #[must_use]
    pub fn new(signal: Arc<WakeSignal>) -> Self {
        Self {
            state: Mutex::new(QueueState {
                tasks: VecDeque::new(),
                closed: false,
            }),
            signal,
        }
    }

    #[inline]
    #[must_use]
    pub fn signal(&self) -> &Arc<WakeSignal> {
        &self.signal
    }

    /// Queues `work` and returns the handle to its result.
    ///
    /// Callable from any thread. On a closed queue the work is dropped
    /// unexecuted and the handle reports [`TaskError::Dropped`].
    pub fn enqueue<F, R>(&self, work: F) -> TaskHandle<R>
    where
        F: FnOnce(&mut C) -> R + Send + 'static,
        R: Send + 'static,
    {
        let (task, handle) = Task::wrap(work);
        {
            let mut state = self.state.lock();
            if state.closed {
                log::warn!("Task enqueued after the scheduler stopped; dropping it");
                return handle;
            }
            state.tasks.push_back(task);
        }
        self.signal.notify();
        handle
    }

    /// Executes the oldest task on the calling thread. Returns whether a task
    /// ran.
    pub fn drain_one(&self, context: &mut C) -> bool {
        // The lock is released before the task runs so it may enqueue more.
        let task = self.state.lock().tasks.pop_front();
        match task {
            Some(task) => {
                task.run(context);
                true
            }
            None => false,
        }
    }

    /// Executes the tasks queued at the time of the call, oldest first.
    /// Tasks they enqueue are left for the next call.
    pub fn drain_batch(&self, context: &mut C) -> usize {
        let queued = self.len();
        let mut executed = 0;
        while executed < queued && self.drain_one(context) {
            executed += 1;
        }
        executed
    }

    /// Executes tasks until the queue is empty.
    pub fn drain_all(&self, context: &mut C) -> usize {
        let mut executed = 0;
        while self.drain_one(context) {
            executed += 1;
        }
        executed
    }

    /// Refuses further tasks. Already queued tasks are kept.
    pub fn close(&self) {
        self.state.lock().closed = true;
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    /// Drops every queued task unexecuted; their handles report
    /// [`TaskError::Dropped`].
    pub fn discard(&self) -> usize {
        let tasks = std::mem::take(&mut self.state.lock().tasks);
        tasks.len()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.state.lock().tasks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.lock().tasks.is_empty()
    }
}

impl<C> fmt::Debug for TaskQueue<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("TaskQueue")
            .field("len", &state.tasks.len())
            .field("closed", &state.closed)
            .finish()
    }
}
