//! Terrain Demo
//!
//! Headless stand-in for the interactive editor: on start it builds and
//! randomizes the terrain, then every `edit_interval` seconds it "drags"
//! one control-node handle to a new direction, the way a transform gizmo
//! would, and pushes the result to a retained scene.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::demo::Demo;
use crate::scene::{RetainedScene, TerrainScene};
use crate::terrain::{NodeHandle, Terrain, TerrainError, TerrainParams, random_unit_vector};

/// Default seconds between simulated handle drags
pub const DEFAULT_EDIT_INTERVAL: f32 = 0.5;

pub struct TerrainDemo {
    terrain: Terrain,
    scene: RetainedScene,
    edit_interval: f32,
    since_edit: f32,
    edits: u64,
    vertices_refreshed: usize,
    aspect: f32,
    rng: ChaCha8Rng,
}

impl TerrainDemo {
    pub fn new(params: TerrainParams) -> Result<Self, TerrainError> {
        Ok(Self {
            terrain: Terrain::new(params)?,
            scene: RetainedScene::new(),
            edit_interval: DEFAULT_EDIT_INTERVAL,
            since_edit: 0.0,
            edits: 0,
            vertices_refreshed: 0,
            aspect: 16.0 / 9.0,
            // Separate stream so drags don't perturb the terrain's own randomization
            rng: ChaCha8Rng::seed_from_u64(params.seed.wrapping_add(1)),
        })
    }

    pub fn with_edit_interval(mut self, seconds: f32) -> Self {
        self.edit_interval = seconds.max(f32::EPSILON);
        self
    }

    pub fn terrain(&self) -> &Terrain {
        &self.terrain
    }

    pub fn scene(&self) -> &RetainedScene {
        &self.scene
    }

    /// Simulated drags applied so far.
    pub fn edits(&self) -> u64 {
        self.edits
    }

    /// Total lattice vertices resampled by neighbourhood updates.
    pub fn vertices_refreshed(&self) -> usize {
        self.vertices_refreshed
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    fn drag_random_handle(&mut self) -> Result<(), TerrainError> {
        if !self.terrain.is_grid_valid() {
            return Err(TerrainError::PrecedenceViolation("demo update"));
        }
        let grid = self.terrain.grid();
        let count = (grid.count_x() * grid.count_z()) as u32;
        let handle = NodeHandle(self.rng.gen_range(0..count));
        // Bias upward so dragged handles stay readable above the surface
        let direction = (random_unit_vector(&mut self.rng) + Vec3::Y * 0.5).normalize_or(Vec3::Y);

        let region = self.terrain.set_node_direction_by_handle(handle, direction)?;
        self.vertices_refreshed += region.vertex_count();
        self.edits += 1;
        log::debug!("dragged handle {:?} to {:?}", handle, direction);

        self.terrain.sync_scene(&mut self.scene)
    }
}

impl Demo for TerrainDemo {
    fn name(&self) -> &'static str {
        "terrain"
    }

    fn start(&mut self) -> Result<(), TerrainError> {
        self.terrain.refresh()?;
        self.terrain.randomize_directions()?;
        self.terrain.sync_scene(&mut self.scene)?;
        let (w, d) = self.terrain.params().lattice_dims();
        log::info!(
            "terrain demo started: {}x{} lattice, offset {:?}",
            w,
            d,
            self.terrain.offset()
        );
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        if height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    fn update(&mut self, delta: f32) -> Result<(), TerrainError> {
        self.since_edit += delta;
        while self.since_edit >= self.edit_interval {
            self.since_edit -= self.edit_interval;
            self.drag_random_handle()?;
        }
        Ok(())
    }

    fn dispose(&mut self) {
        self.scene.clear();
        log::info!(
            "terrain demo disposed after {} edits ({} vertices refreshed, aspect {:.3})",
            self.edits,
            self.vertices_refreshed,
            self.aspect
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_params() -> TerrainParams {
        TerrainParams {
            world_size_x: 8.0,
            world_size_z: 8.0,
            node_count_x: 4,
            node_count_z: 4,
            quad_resolution_x: 2,
            quad_resolution_z: 2,
            seed: 11,
        }
    }

    #[test]
    fn test_start_populates_scene() {
        let mut demo = TerrainDemo::new(small_params()).unwrap();
        demo.start().unwrap();
        assert_eq!(demo.scene().handle_count(), 16);
        // 6x6 quads, two triangles each
        assert_eq!(demo.scene().vertices().len(), 36 * 6);
        assert_eq!(demo.scene().mesh_offset(), demo.terrain().offset());
    }

    #[test]
    fn test_update_applies_edits_on_interval() {
        let mut demo = TerrainDemo::new(small_params())
            .unwrap()
            .with_edit_interval(0.25);
        demo.start().unwrap();
        demo.update(0.1).unwrap();
        assert_eq!(demo.edits(), 0);
        demo.update(0.5).unwrap();
        assert_eq!(demo.edits(), 2);
        assert!(demo.vertices_refreshed() > 0);
    }

    #[test]
    fn test_update_before_start_is_precedence_violation() {
        let mut demo = TerrainDemo::new(TerrainParams::default()).unwrap();
        let err = demo.update(1.0).unwrap_err();
        assert!(matches!(err, TerrainError::PrecedenceViolation(_)));
        assert_eq!(demo.edits(), 0);
    }

    #[test]
    fn test_update_below_interval_before_start_is_noop() {
        let mut demo = TerrainDemo::new(small_params()).unwrap();
        demo.update(0.1).unwrap();
        assert_eq!(demo.edits(), 0);
    }

    #[test]
    fn test_resize_updates_aspect() {
        let mut demo = TerrainDemo::new(small_params()).unwrap();
        demo.resize(800, 400);
        assert_eq!(demo.aspect(), 2.0);
        demo.resize(800, 0);
        assert_eq!(demo.aspect(), 2.0);
    }
}
