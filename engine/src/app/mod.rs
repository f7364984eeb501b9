//! App Module
//!
//! Update-loop scaffolding: an owned clock, the demo capability trait and
//! the terrain demo built on it.

pub mod clock;
pub mod demo;
pub mod terrain_demo;

pub use clock::Clock;
pub use demo::{Demo, DemoRunner};
pub use terrain_demo::{DEFAULT_EDIT_INTERVAL, TerrainDemo};
