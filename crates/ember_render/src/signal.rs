use std::time::Duration;

use parking_lot::{Condvar, Mutex};

/// Wakes the scheduler when work arrives.
///
/// Producers change their own state first and then call [`notify`]; the
/// waiter evaluates its readiness predicate while holding the signal lock.
/// A notification can therefore never fall between the predicate check and
/// the wait.
///
/// [`notify`]: WakeSignal::notify
#[derive(Debug, Default)]
pub struct WakeSignal {
    lock: Mutex<()>,
    condvar: Condvar,
}

impl WakeSignal {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notify(&self) {
        let _guard = self.lock.lock();
        self.condvar.notify_all();
    }

    /// Blocks until `ready` holds or `timeout` elapses. Returns the final
    /// value of `ready`.
    ///
    /// `ready` must not call [`notify`](Self::notify).
    pub fn wait_until(&self, timeout: Duration, ready: impl Fn() -> bool) -> bool {
        let mut guard = self.lock.lock();
        if ready() {
            return true;
        }
        self.condvar.wait_for(&mut guard, timeout);
        ready()
    }
}
