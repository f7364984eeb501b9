//! Frame Clock
//!
//! An explicitly owned clock handed to whatever drives the update loop.
//! It can follow wall time ([`Clock::tick`]) or be stepped by hand
//! ([`Clock::advance`]) for headless runs.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct Clock {
    running: bool,
    last_tick: Option<Instant>,
    elapsed: Duration,
    last_delta: Duration,
    frames: u64,
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock {
    /// Create a stopped clock at zero.
    pub fn new() -> Self {
        Self {
            running: false,
            last_tick: None,
            elapsed: Duration::ZERO,
            last_delta: Duration::ZERO,
            frames: 0,
        }
    }

    pub fn start(&mut self) {
        if !self.running {
            self.running = true;
            self.last_tick = Some(Instant::now());
        }
    }

    pub fn stop(&mut self) {
        self.running = false;
        self.last_tick = None;
        self.last_delta = Duration::ZERO;
    }

    /// Back to zero; keeps the running state.
    pub fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
        self.last_delta = Duration::ZERO;
        self.frames = 0;
        if self.running {
            self.last_tick = Some(Instant::now());
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Measure wall time since the previous tick. Returns seconds.
    pub fn tick(&mut self) -> f32 {
        if !self.running {
            return 0.0;
        }
        let now = Instant::now();
        let delta = self
            .last_tick
            .map(|prev| now.duration_since(prev))
            .unwrap_or(Duration::ZERO);
        self.last_tick = Some(now);
        self.record(delta)
    }

    /// Step by a fixed amount. Returns seconds.
    pub fn advance(&mut self, delta: Duration) -> f32 {
        if !self.running {
            return 0.0;
        }
        self.record(delta)
    }

    fn record(&mut self, delta: Duration) -> f32 {
        self.elapsed += delta;
        self.last_delta = delta;
        self.frames += 1;
        delta.as_secs_f32()
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn last_delta(&self) -> Duration {
        self.last_delta
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stopped_clock_reports_zero() {
        let mut clock = Clock::new();
        assert_eq!(clock.advance(Duration::from_millis(16)), 0.0);
        assert_eq!(clock.tick(), 0.0);
        assert_eq!(clock.frames(), 0);
    }

    #[test]
    fn test_advance_accumulates() {
        let mut clock = Clock::new();
        clock.start();
        clock.advance(Duration::from_millis(250));
        let dt = clock.advance(Duration::from_millis(250));
        assert!((dt - 0.25).abs() < 1e-6);
        assert_eq!(clock.elapsed(), Duration::from_millis(500));
        assert_eq!(clock.frames(), 2);
    }

    #[test]
    fn test_reset_keeps_running() {
        let mut clock = Clock::new();
        clock.start();
        clock.advance(Duration::from_secs(1));
        clock.reset();
        assert!(clock.is_running());
        assert_eq!(clock.elapsed(), Duration::ZERO);
        assert_eq!(clock.frames(), 0);
    }

    #[test]
    fn test_tick_is_monotonic() {
        let mut clock = Clock::new();
        clock.start();
        let dt = clock.tick();
        assert!(dt >= 0.0);
        clock.stop();
        assert!(!clock.is_running());
        assert_eq!(clock.last_delta(), Duration::ZERO);
    }
}
