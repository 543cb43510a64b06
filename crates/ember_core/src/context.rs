use std::sync::Arc;

use crate::settings::EngineSettings;
use crate::time::{MonotonicClock, SharedClock, TimeSource};

/// Explicit engine context.
///
/// Constructed once by the embedding host and handed by reference (or clone)
/// to the scheduler, the dispatcher and the animation managers. There is no
/// process-wide state; two contexts make two fully independent engines.
#[derive(Clone)]
pub struct EngineContext {
    clock: SharedClock,
    settings: Arc<EngineSettings>,
}

impl EngineContext {
    /// Creates a context driven by a monotonic wall clock.
    #[must_use]
    pub fn new(settings: EngineSettings) -> Self {
        Self::with_clock(settings, Arc::new(MonotonicClock::new()))
    }

    #[must_use]
    pub fn with_clock(settings: EngineSettings, clock: SharedClock) -> Self {
        Self {
            clock,
            settings: Arc::new(settings),
        }
    }

    /// Current frame time in seconds.
    #[inline]
    #[must_use]
    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    #[inline]
    #[must_use]
    pub fn clock(&self) -> &SharedClock {
        &self.clock
    }

    #[inline]
    #[must_use]
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }
}

impl Default for EngineContext {
    fn default() -> Self {
        Self::new(EngineSettings::default())
    }
}

impl std::fmt::Debug for EngineContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineContext")
            .field("now", &self.clock.now())
            .field("settings", &self.settings)
            .finish()
    }
}
