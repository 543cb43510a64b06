use std::sync::Arc;

use parking_lot::Mutex;

use crate::signal::WakeSignal;

/// Invoked on the scheduler thread once the requested frame was produced.
pub type FrameCallback = Box<dyn FnOnce() + Send>;

#[derive(Default)]
struct FrameState {
    pending: bool,
    on_complete: Option<FrameCallback>,
}

/// The single outstanding frame request.
///
/// Requests arriving while one is already pending are absorbed: they return
/// `false` and their callback is dropped without being called.
pub struct PendingFrame {
    state: Mutex<FrameState>,
    signal: Arc<WakeSignal>,
}

impl PendingFrame {
    #[must_use]
    pub fn new(signal: Arc<WakeSignal>) -> Self {
        Self {
            state: Mutex::new(FrameState::default()),
            signal,
        }
    }

    /// Marks a frame as requested. Returns `false` if one already was.
    pub fn request(&self, on_complete: Option<FrameCallback>) -> bool {
        {
            let mut state = self.state.lock();
            if state.pending {
                log::trace!("Frame already pending; request coalesced");
                return false;
            }
            state.pending = true;
            state.on_complete = on_complete;
        }
        self.signal.notify();
        true
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.state.lock().pending
    }

    /// Clears the request and hands back its callback.
    pub fn complete(&self) -> Option<FrameCallback> {
        let mut state = self.state.lock();
        state.pending = false;
        state.on_complete.take()
    }
}

impl Default for PendingFrame {
    fn default() -> Self {
        Self::new(Arc::new(WakeSignal::new()))
    }
}

impl std::fmt::Debug for PendingFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("PendingFrame")
            .field("pending", &state.pending)
            .field("has_callback", &state.on_complete.is_some())
            .finish()
    }
}
