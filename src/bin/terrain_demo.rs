//! Headless Terrain Demo
//!
//! Run with: `cargo run --bin terrain_demo`
//!
//! Builds a randomized vector terrain, simulates a stream of control-node
//! drags at a fixed 60 Hz step and reports what changed.
//!
//! Environment:
//! - `TERRAIN_PARAMS`: path to a JSON parameter file (defaults otherwise)
//! - `TERRAIN_FRAMES`: number of frames to run (default 120)
//! - `TERRAIN_OBJ`: write the final mesh as a Wavefront OBJ to this path
//! - `RUST_LOG`: log filter, e.g. `RUST_LOG=debug`

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use vector_terrain_engine::app::{Clock, Demo, DemoRunner, TerrainDemo};
use vector_terrain_engine::scene::write_obj;
use vector_terrain_engine::terrain::{TerrainError, TerrainParams};

const DEFAULT_FRAMES: u64 = 120;
const FRAME_STEP: Duration = Duration::from_micros(16_667);

/// Lets the runner own the demo while `main` keeps reading its state.
struct Shared(std::rc::Rc<std::cell::RefCell<TerrainDemo>>);

impl Demo for Shared {
    fn name(&self) -> &'static str {
        "terrain"
    }

    fn start(&mut self) -> Result<(), TerrainError> {
        self.0.borrow_mut().start()
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.0.borrow_mut().resize(width, height);
    }

    fn update(&mut self, delta: f32) -> Result<(), TerrainError> {
        self.0.borrow_mut().update(delta)
    }

    fn dispose(&mut self) {
        self.0.borrow_mut().dispose();
    }
}

fn load_params() -> Result<TerrainParams, TerrainError> {
    match std::env::var_os("TERRAIN_PARAMS") {
        Some(path) => {
            let path = PathBuf::from(path);
            log::info!("loading parameters from {}", path.display());
            TerrainParams::load(&path)
        }
        None => Ok(TerrainParams::default()),
    }
}

fn frame_count() -> u64 {
    std::env::var("TERRAIN_FRAMES")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_FRAMES)
}

fn run() -> Result<(), TerrainError> {
    let params = load_params()?;
    log::info!("parameters: {params:?}");

    let demo = std::rc::Rc::new(std::cell::RefCell::new(TerrainDemo::new(params)?));
    let mut runner = DemoRunner::new(Clock::new());
    runner.add(Box::new(Shared(demo.clone())));

    runner.start()?;
    runner.resize(1280, 720);
    runner.run_fixed(frame_count(), FRAME_STEP)?;

    {
        let demo = demo.borrow();
        let terrain = demo.terrain();
        let bounds = demo.scene().bounds();
        log::info!(
            "{} edits over {:.2}s, {} vertices refreshed, {} triangles",
            demo.edits(),
            runner.clock().elapsed().as_secs_f32(),
            demo.vertices_refreshed(),
            terrain.triangles().len() / 3
        );
        if let Some(bounds) = bounds {
            log::info!("centered bounds: min {:?} max {:?}", bounds.min, bounds.max);
        }

        if let Some(path) = std::env::var_os("TERRAIN_OBJ") {
            write_obj(&PathBuf::from(path), &terrain.mesh_vertices(), terrain.offset())?;
        }
    }

    runner.dispose();
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("terrain demo failed: {e}");
            ExitCode::FAILURE
        }
    }
}
