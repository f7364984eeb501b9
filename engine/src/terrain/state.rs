//! Terrain State
//!
//! Owns the parameters, the control grid and the mesh lattice, and keeps
//! them consistent. Two layers can go stale independently:
//!
//! - the **grid layer** is rebuilt by [`Terrain::update_control_grid`] and
//!   goes stale when node counts or world size change;
//! - the **mesh layer** is rebuilt by [`Terrain::update_mesh`] and goes stale
//!   when quad resolution changes or the grid layer is rebuilt.
//!
//! After every rebuild the terrain is recentered: the bounding-box centroid
//! becomes an offset applied to the rendered transform, never to the stored
//! heights.

use glam::{Vec2, Vec3};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::control_grid::{ControlGrid, NodeHandle, NodeId};
use super::error::TerrainError;
use super::lattice::{LatticeRegion, MeshBuilder};
use super::params::{
    TerrainParams, checked_lattice_dims, validate_node_counts, validate_quad_resolution,
    validate_world_size,
};
use super::sampler::HeightFieldSampler;
use crate::scene::{Aabb, TerrainScene, TerrainVertex, triangles_to_vertices};

pub struct Terrain {
    params: TerrainParams,
    grid: ControlGrid,
    grid_valid: bool,
    lattice: Option<MeshBuilder>,
    triangles: Vec<[f32; 3]>,
    mesh_valid: bool,
    bounds: Option<Aabb>,
    offset: Vec3,
    rng: ChaCha8Rng,
}

impl Terrain {
    /// Validate `params`. Both layers start stale; call [`Self::refresh`] to build them.
    pub fn new(params: TerrainParams) -> Result<Self, TerrainError> {
        params.validate()?;
        Ok(Self {
            params,
            grid: ControlGrid::new(),
            grid_valid: false,
            lattice: None,
            triangles: Vec::new(),
            mesh_valid: false,
            bounds: None,
            offset: Vec3::ZERO,
            rng: ChaCha8Rng::seed_from_u64(params.seed),
        })
    }

    pub fn params(&self) -> &TerrainParams {
        &self.params
    }

    pub fn grid(&self) -> &ControlGrid {
        &self.grid
    }

    pub fn lattice(&self) -> Option<&MeshBuilder> {
        self.lattice.as_ref()
    }

    pub fn is_grid_valid(&self) -> bool {
        self.grid_valid
    }

    pub fn is_mesh_valid(&self) -> bool {
        self.mesh_valid
    }

    /// Flat position list of the last emitted mesh.
    pub fn triangles(&self) -> &[[f32; 3]] {
        &self.triangles
    }

    /// Translation that centers the terrain on the origin.
    pub fn offset(&self) -> Vec3 {
        self.offset
    }

    /// Bounds of the untranslated terrain as of the last recenter.
    pub fn bounds(&self) -> Option<Aabb> {
        self.bounds
    }

    // ------------------------------------------------------------------
    // Parameter changes
    // ------------------------------------------------------------------

    pub fn set_world_size(&mut self, size_x: f32, size_z: f32) -> Result<(), TerrainError> {
        validate_world_size(size_x, size_z)?;
        if self.params.world_size_x != size_x || self.params.world_size_z != size_z {
            self.params.world_size_x = size_x;
            self.params.world_size_z = size_z;
            self.invalidate_grid();
        }
        Ok(())
    }

    pub fn set_node_counts(&mut self, count_x: usize, count_z: usize) -> Result<(), TerrainError> {
        validate_node_counts(count_x, count_z)?;
        checked_lattice_dims(
            count_x,
            count_z,
            self.params.quad_resolution_x,
            self.params.quad_resolution_z,
        )?;
        if self.params.node_count_x != count_x || self.params.node_count_z != count_z {
            self.params.node_count_x = count_x;
            self.params.node_count_z = count_z;
            self.invalidate_grid();
        }
        Ok(())
    }

    pub fn set_quad_resolution(&mut self, res_x: usize, res_z: usize) -> Result<(), TerrainError> {
        validate_quad_resolution(res_x, res_z)?;
        checked_lattice_dims(self.params.node_count_x, self.params.node_count_z, res_x, res_z)?;
        if self.params.quad_resolution_x != res_x || self.params.quad_resolution_z != res_z {
            self.params.quad_resolution_x = res_x;
            self.params.quad_resolution_z = res_z;
            self.mesh_valid = false;
        }
        Ok(())
    }

    /// Restart the randomization stream.
    pub fn reseed(&mut self, seed: u64) {
        self.params.seed = seed;
        self.rng = ChaCha8Rng::seed_from_u64(seed);
    }

    fn invalidate_grid(&mut self) {
        self.grid_valid = false;
        self.mesh_valid = false;
    }

    // ------------------------------------------------------------------
    // Rebuilds
    // ------------------------------------------------------------------

    /// Rebuild whichever layers are stale.
    pub fn refresh(&mut self) -> Result<(), TerrainError> {
        if !self.grid_valid {
            self.update_control_grid()?;
        }
        if !self.mesh_valid {
            self.update_mesh()?;
        }
        Ok(())
    }

    /// Regenerate the control grid from the current parameters, then recenter.
    pub fn update_control_grid(&mut self) -> Result<(), TerrainError> {
        let p = self.params;
        self.grid
            .generate(p.node_count_x, p.node_count_z, p.world_size_x, p.world_size_z)?;
        self.grid_valid = true;
        self.mesh_valid = false;
        log::info!(
            "control grid rebuilt: {}x{} nodes over {}x{}",
            p.node_count_x,
            p.node_count_z,
            p.world_size_x,
            p.world_size_z
        );
        self.recenter();
        Ok(())
    }

    /// Allocate the lattice, sample every height, emit triangles, recenter.
    pub fn update_mesh(&mut self) -> Result<(), TerrainError> {
        if !self.grid_valid {
            return Err(TerrainError::PrecedenceViolation("mesh update"));
        }
        let p = self.params;
        let cell = self.grid.cell_size();
        let mut lattice = MeshBuilder::build_lattice(
            p.node_count_x,
            p.node_count_z,
            p.quad_resolution_x,
            p.quad_resolution_z,
            cell.x,
            cell.y,
        )?;
        let sampler = HeightFieldSampler::new(&self.grid)?;
        lattice.update_heights(&sampler);
        self.triangles = lattice.emit_triangles();
        self.lattice = Some(lattice);
        self.mesh_valid = true;

        log::debug!("mesh rebuilt: {} triangles", self.triangles.len() / 3);
        self.recenter();
        Ok(())
    }

    /// Give every node a random direction and rebuild the whole mesh.
    pub fn randomize_directions(&mut self) -> Result<(), TerrainError> {
        if !self.grid_valid {
            return Err(TerrainError::PrecedenceViolation("direction randomization"));
        }
        self.grid.randomize_all(&mut self.rng);
        self.update_mesh()
    }

    /// Point one node in a new direction (normalized on write) and refresh
    /// the heights it influences.
    ///
    /// Falls back to a full mesh update when the mesh layer is stale.
    /// Returns the refreshed lattice region.
    pub fn set_node_direction(
        &mut self,
        node: NodeId,
        direction: Vec3,
    ) -> Result<LatticeRegion, TerrainError> {
        if !self.grid_valid {
            return Err(TerrainError::PrecedenceViolation("direction edit"));
        }
        self.grid.set_direction(node, direction).inspect_err(|e| {
            log::warn!("rejected direction edit on ({}, {}): {e}", node.i, node.j);
        })?;

        let region = match self.lattice.as_mut().filter(|_| self.mesh_valid) {
            Some(lattice) => {
                let sampler = HeightFieldSampler::new(&self.grid)?;
                let region = lattice.update_heights_near(node, &sampler)?;
                self.triangles = lattice.emit_triangles();
                region
            }
            None => {
                self.update_mesh()?;
                return Ok(self.full_region());
            }
        };
        self.recenter();
        Ok(region)
    }

    /// Same as [`Self::set_node_direction`], addressed by editing handle.
    pub fn set_node_direction_by_handle(
        &mut self,
        handle: NodeHandle,
        direction: Vec3,
    ) -> Result<LatticeRegion, TerrainError> {
        if !self.grid_valid {
            return Err(TerrainError::PrecedenceViolation("direction edit"));
        }
        let node = self.grid.node_id(handle)?;
        self.set_node_direction(node, direction)
    }

    fn full_region(&self) -> LatticeRegion {
        let (w, d) = self
            .lattice
            .as_ref()
            .map(|l| (l.width(), l.depth()))
            .unwrap_or((1, 1));
        LatticeRegion {
            min_x: 0,
            min_z: 0,
            max_x: w - 1,
            max_z: d - 1,
        }
    }

    /// Recompute the offset that moves the bounding-box centroid to the origin.
    ///
    /// Uses the emitted mesh when it is current, otherwise the control node
    /// positions. Stored heights are never modified.
    pub fn recenter(&mut self) {
        let bounds = if self.mesh_valid {
            Aabb::from_points(self.triangles.iter().map(|p| Vec3::from_array(*p)))
        } else if self.grid_valid {
            Aabb::from_points(self.grid.nodes().iter().map(|n| n.position))
        } else {
            None
        };

        self.bounds = bounds;
        self.offset = bounds.map(|b| -b.center()).unwrap_or(Vec3::ZERO);
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Height at grid-local `(x, z)`.
    pub fn height_at(&self, x: f32, z: f32) -> Result<f32, TerrainError> {
        if !self.grid_valid {
            return Err(TerrainError::PrecedenceViolation("height sampling"));
        }
        Ok(HeightFieldSampler::new(&self.grid)?.height(x, z))
    }

    /// Height under a point given in the recentered frame, expressed in that frame.
    pub fn height_at_centered(&self, x: f32, z: f32) -> Result<f32, TerrainError> {
        let local = Vec2::new(x, z) - Vec2::new(self.offset.x, self.offset.z);
        Ok(self.height_at(local.x, local.y)? + self.offset.y)
    }

    /// Emitted mesh with per-triangle normals.
    pub fn mesh_vertices(&self) -> Vec<TerrainVertex> {
        triangles_to_vertices(&self.triangles)
    }

    /// Push mesh, handle poses and offsets to a scene.
    pub fn sync_scene<S: TerrainScene + ?Sized>(&self, scene: &mut S) -> Result<(), TerrainError> {
        if !self.grid_valid {
            return Err(TerrainError::PrecedenceViolation("scene sync"));
        }
        scene.clear();
        if self.mesh_valid {
            scene.replace_mesh(self.mesh_vertices());
        }
        for (id, node) in self.grid.iter() {
            scene.set_handle_pose(self.grid.handle(id)?, node.position, node.direction);
        }
        scene.set_mesh_offset(self.offset);
        scene.set_handle_offset(self.offset);
        Ok(())
    }
}
