//! Demo Abstraction
//!
//! Small capability interface for anything the update loop drives.
//! Demos are independent structs; the runner owns the clock and calls
//! them in registration order (disposal runs in reverse).

use std::time::Duration;

use super::clock::Clock;
use crate::terrain::TerrainError;

pub trait Demo {
    /// Unique name for this demo (for logging)
    fn name(&self) -> &'static str;

    /// Build initial state (called once before the first update)
    fn start(&mut self) -> Result<(), TerrainError>;

    /// Viewport size changed
    fn resize(&mut self, _width: u32, _height: u32) {}

    /// Advance by `delta` seconds
    fn update(&mut self, delta: f32) -> Result<(), TerrainError>;

    /// Release everything (called once after the last update)
    fn dispose(&mut self);
}

/// Drives a set of demos from one clock
pub struct DemoRunner {
    demos: Vec<Box<dyn Demo>>,
    clock: Clock,
    started: bool,
}

impl Default for DemoRunner {
    fn default() -> Self {
        Self::new(Clock::new())
    }
}

impl DemoRunner {
    pub fn new(clock: Clock) -> Self {
        Self {
            demos: Vec::new(),
            clock,
            started: false,
        }
    }

    pub fn add(&mut self, demo: Box<dyn Demo>) {
        self.demos.push(demo);
    }

    pub fn len(&self) -> usize {
        self.demos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.demos.is_empty()
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Start every demo and the clock.
    pub fn start(&mut self) -> Result<(), TerrainError> {
        for demo in &mut self.demos {
            log::info!("starting demo `{}`", demo.name());
            demo.start()?;
        }
        self.clock.start();
        self.started = true;
        Ok(())
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        for demo in &mut self.demos {
            demo.resize(width, height);
        }
    }

    /// One frame with a fixed step.
    pub fn step(&mut self, delta: Duration) -> Result<(), TerrainError> {
        let dt = self.clock.advance(delta);
        self.update_all(dt)
    }

    /// One frame measured against wall time.
    pub fn tick(&mut self) -> Result<(), TerrainError> {
        let dt = self.clock.tick();
        self.update_all(dt)
    }

    fn update_all(&mut self, dt: f32) -> Result<(), TerrainError> {
        if !self.started {
            return Ok(());
        }
        for demo in &mut self.demos {
            demo.update(dt)?;
        }
        Ok(())
    }

    /// Run `frames` fixed steps.
    pub fn run_fixed(&mut self, frames: u64, delta: Duration) -> Result<(), TerrainError> {
        for _ in 0..frames {
            self.step(delta)?;
        }
        Ok(())
    }

    /// Dispose demos in reverse order and stop the clock.
    pub fn dispose(&mut self) {
        for demo in self.demos.iter_mut().rev() {
            log::info!("disposing demo `{}`", demo.name());
            demo.dispose();
        }
        self.clock.stop();
        self.started = false;
    }
}
