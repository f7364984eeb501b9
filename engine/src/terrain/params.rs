//! Terrain Parameters
//!
//! Configurable parameters for the control grid and the mesh lattice.
//! Parameters are plain data handed to [`crate::terrain::Terrain`]
//! explicitly; there is no process-wide copy.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::error::TerrainError;

/// Largest lattice the mesh builder will allocate
pub const MAX_LATTICE_VERTICES: usize = 1 << 24;

/// Adjustable terrain generation parameters
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainParams {
    /// World extent along X used to derive the cell size
    pub world_size_x: f32,
    /// World extent along Z used to derive the cell size
    pub world_size_z: f32,
    /// Control nodes along X (>= 2)
    pub node_count_x: usize,
    /// Control nodes along Z (>= 2)
    pub node_count_z: usize,
    /// Lattice quads per control cell along X (>= 1)
    pub quad_resolution_x: usize,
    /// Lattice quads per control cell along Z (>= 1)
    pub quad_resolution_z: usize,
    /// Seed for direction randomization
    pub seed: u64,
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            world_size_x: 20.0,
            world_size_z: 20.0,
            node_count_x: 6,
            node_count_z: 6,
            quad_resolution_x: 6,
            quad_resolution_z: 6,
            seed: 1,
        }
    }
}

impl TerrainParams {
    /// Check every constraint, reporting the first one violated.
    pub fn validate(&self) -> Result<(), TerrainError> {
        validate_node_counts(self.node_count_x, self.node_count_z)?;
        validate_world_size(self.world_size_x, self.world_size_z)?;
        validate_quad_resolution(self.quad_resolution_x, self.quad_resolution_z)?;
        checked_lattice_dims(
            self.node_count_x,
            self.node_count_z,
            self.quad_resolution_x,
            self.quad_resolution_z,
        )?;
        Ok(())
    }

    /// Spacing between neighbouring control nodes.
    pub fn cell_size(&self) -> Vec2 {
        Vec2::new(
            self.world_size_x / self.node_count_x as f32,
            self.world_size_z / self.node_count_z as f32,
        )
    }

    /// Lattice width and depth in vertices. Saturates for params that fail [`Self::validate`].
    pub fn lattice_dims(&self) -> (usize, usize) {
        let axis = |count: usize, res: usize| count.saturating_sub(1).saturating_mul(res).saturating_add(1);
        (
            axis(self.node_count_x, self.quad_resolution_x),
            axis(self.node_count_z, self.quad_resolution_z),
        )
    }

    pub fn from_json_str(json: &str) -> Result<Self, TerrainError> {
        let params: Self = serde_json::from_str(json)?;
        params.validate()?;
        Ok(params)
    }

    pub fn to_json_string(&self) -> Result<String, TerrainError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load and validate parameters from a JSON file.
    pub fn load(path: &Path) -> Result<Self, TerrainError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Write parameters as pretty JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), TerrainError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_json_string()?)?;
        Ok(())
    }
}

pub(crate) fn validate_node_counts(count_x: usize, count_z: usize) -> Result<(), TerrainError> {
    if count_x < 2 {
        return Err(TerrainError::invalid(
            "node_count_x",
            format!("need at least 2 nodes, got {count_x}"),
        ));
    }
    if count_z < 2 {
        return Err(TerrainError::invalid(
            "node_count_z",
            format!("need at least 2 nodes, got {count_z}"),
        ));
    }
    // Node handles are u32 row-major indices
    match count_x.checked_mul(count_z) {
        Some(total) if total <= u32::MAX as usize => Ok(()),
        _ => Err(TerrainError::invalid(
            "node_count",
            format!("{count_x}x{count_z} nodes exceed the handle range"),
        )),
    }
}

pub(crate) fn validate_world_size(size_x: f32, size_z: f32) -> Result<(), TerrainError> {
    if !(size_x.is_finite() && size_x > 0.0) {
        return Err(TerrainError::invalid(
            "world_size_x",
            format!("must be positive, got {size_x}"),
        ));
    }
    if !(size_z.is_finite() && size_z > 0.0) {
        return Err(TerrainError::invalid(
            "world_size_z",
            format!("must be positive, got {size_z}"),
        ));
    }
    Ok(())
}

pub(crate) fn validate_quad_resolution(res_x: usize, res_z: usize) -> Result<(), TerrainError> {
    if res_x < 1 {
        return Err(TerrainError::invalid("quad_resolution_x", "must be at least 1"));
    }
    if res_z < 1 {
        return Err(TerrainError::invalid("quad_resolution_z", "must be at least 1"));
    }
    Ok(())
}

/// Lattice `(width, depth)` for the given counts, rejecting sizes that overflow
/// or exceed [`MAX_LATTICE_VERTICES`].
pub(crate) fn checked_lattice_dims(
    count_x: usize,
    count_z: usize,
    res_x: usize,
    res_z: usize,
) -> Result<(usize, usize), TerrainError> {
    let axis = |count: usize, res: usize| {
        count
            .checked_sub(1)?
            .checked_mul(res)?
            .checked_add(1)
    };
    let too_large = || {
        TerrainError::invalid(
            "quad_resolution",
            format!(
                "{count_x}x{count_z} nodes at {res_x}x{res_z} quads per cell \
                 exceed {MAX_LATTICE_VERTICES} lattice vertices"
            ),
        )
    };

    let width = axis(count_x, res_x).ok_or_else(too_large)?;
    let depth = axis(count_z, res_z).ok_or_else(too_large)?;
    match width.checked_mul(depth) {
        Some(total) if total <= MAX_LATTICE_VERTICES => Ok((width, depth)),
        _ => Err(too_large()),
    }
}
