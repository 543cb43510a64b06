#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

#[cfg(target_arch = "wasm32")]
use web_time::Instant;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// A source of frame timestamps, in seconds since an arbitrary epoch.
///
/// The scheduler stamps every dispatched frame with `now()`, and the animation
/// managers stamp every new play with the same clock, so elapsed times are
/// always measured in one time base.
///
/// Timestamps are `f64` so that differences stay exact to well under a
/// millisecond after days of uptime. Subtract first, then narrow with
/// [`elapsed_since`].
pub trait TimeSource: Send + Sync {
    fn now(&self) -> f64;
}

/// Seconds from `start` to `now`, narrowed after the subtraction.
#[inline]
#[must_use]
pub fn elapsed_since(start: f64, now: f64) -> f32 {
    (now - start) as f32
}

/// Shared, thread-safe clock handle.
pub type SharedClock = Arc<dyn TimeSource>;

/// Wall clock measured from construction.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    epoch: Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl TimeSource for MonotonicClock {
    #[inline]
    fn now(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64()
    }
}

/// A clock that only moves when told to.
///
/// Used by hosts that own their own timeline (offline capture, tests).
/// Cloning shares the underlying time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    bits: Arc<AtomicU64>,
}

impl ManualClock {
    #[must_use]
    pub fn new(start: f64) -> Self {
        Self {
            bits: Arc::new(AtomicU64::new(start.to_bits())),
        }
    }

    pub fn set(&self, seconds: f64) {
        self.bits.store(seconds.to_bits(), Ordering::Release);
    }

    pub fn advance(&self, seconds: f64) {
        let now = self.now();
        self.set(now + seconds);
    }
}

impl TimeSource for ManualClock {
    #[inline]
    fn now(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::Acquire))
    }
}

/// Frame-rate estimate refreshed once per second of accumulated frame time.
#[derive(Debug, Clone, Default)]
pub struct FpsCounter {
    last_frame: Option<f64>,
    frame_count: u32,
    accumulated_time: f32,
    pub current_fps: f32,
}

impl FpsCounter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a frame at `now`. Returns the new estimate when one second
    /// has accumulated.
    pub fn update(&mut self, now: f64) -> Option<f32> {
        let delta = self
            .last_frame
            .map_or(0.0, |last| elapsed_since(last, now).max(0.0));
        self.last_frame = Some(now);
        self.frame_count += 1;
        self.accumulated_time += delta;

        if self.accumulated_time >= 1.0 {
            self.current_fps = self.frame_count as f32 / self.accumulated_time;
            self.accumulated_time = 0.0;
            self.frame_count = 0;
            return Some(self.current_fps);
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_is_shared_between_clones() {
        let clock = ManualClock::new(1.0);
        let other = clock.clone();
        other.advance(0.5);
        assert!((clock.now() - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn elapsed_stays_exact_after_a_day() {
        let clock = ManualClock::new(86_400.0);
        let start = clock.now();
        clock.advance(0.15);
        let elapsed = elapsed_since(start, clock.now());
        assert!((elapsed - 0.15).abs() < 1e-6, "got {elapsed}");
    }

    #[test]
    fn fps_counter_reports_after_one_second() {
        let mut fps = FpsCounter::new();
        let mut reported = None;
        for i in 0..=12 {
            if let Some(value) = fps.update(f64::from(i) * 0.1) {
                reported = Some(value);
            }
        }
        let value = reported.expect("estimate after one second");
        assert!((value - 10.0).abs() < 1.5, "got {value}");
    }
}
