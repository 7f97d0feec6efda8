//! Wall-clock time source
//!
//! The simulation is wall-clock driven: phase is a pure function of the
//! epoch millis sampled at the top of each tick.

use std::cell::Cell;

/// Elapsed simulation time in seconds since `start_time` (both epoch millis)
#[inline]
pub fn elapsed(now: f64, start_time: f64) -> f64 {
    (now - start_time) / 1000.0
}

/// A source of epoch milliseconds
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// Host wall clock (`Date.now()` in the browser, `SystemTime` natively)
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[cfg(target_arch = "wasm32")]
    fn now_ms(&self) -> f64 {
        js_sys::Date::now()
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn now_ms(&self) -> f64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs_f64() * 1000.0)
            .unwrap_or(0.0)
    }
}

/// Hand-advanced clock for headless stepping and tests
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<f64>,
}

impl ManualClock {
    pub fn new(now: f64) -> Self {
        Self { now: Cell::new(now) }
    }

    pub fn set(&self, now: f64) {
        self.now.set(now);
    }

    pub fn advance(&self, ms: f64) {
        self.now.set(self.now.get() + ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elapsed_seconds() {
        assert_eq!(elapsed(1_000.0, 1_000.0), 0.0);
        assert_eq!(elapsed(3_500.0, 1_000.0), 2.5);
    }

    #[test]
    fn test_manual_clock() {
        let clock = ManualClock::new(100.0);
        assert_eq!(clock.now_ms(), 100.0);
        clock.advance(16.0);
        assert_eq!(clock.now_ms(), 116.0);
        clock.set(5.0);
        assert_eq!(clock.now_ms(), 5.0);
    }

    #[test]
    fn test_system_clock_is_epoch_millis() {
        // Anything after 2020-01-01
        assert!(SystemClock.now_ms() > 1_577_836_800_000.0);
    }
}
