//! Mesh Lattice
//!
//! Dense vertex grid sampled from the control grid at a finer resolution.
//! Each control cell is split into `quad_resolution_x * quad_resolution_z`
//! quads; every quad becomes two triangles in a non-indexed triangle soup.
//!
//! Heights can be refreshed wholesale or only around one edited node.
//! Both paths call the sampler with identical inputs, so a neighbourhood
//! refresh leaves the lattice exactly as a full pass would.

use glam::{Vec2, Vec3};

use super::control_grid::NodeId;
use super::error::TerrainError;
use super::params::{checked_lattice_dims, validate_node_counts, validate_quad_resolution};
use super::sampler::HeightFieldSampler;

/// Inclusive rectangle of lattice indices
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LatticeRegion {
    pub min_x: usize,
    pub min_z: usize,
    pub max_x: usize,
    pub max_z: usize,
}

impl LatticeRegion {
    pub fn vertex_count(&self) -> usize {
        (self.max_x - self.min_x + 1) * (self.max_z - self.min_z + 1)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MeshBuilder {
    width: usize,
    depth: usize,
    quad_resolution_x: usize,
    quad_resolution_z: usize,
    quad_size: Vec2,
    /// Row-major `z * width + x`
    vertices: Vec<Vec3>,
}

impl MeshBuilder {
    /// Allocate a flat lattice covering `(count - 1)` cells per axis.
    ///
    /// Vertex `(x, z)` sits at `(x * quad_size_x, 0, z * quad_size_z)` with
    /// `quad_size = cell_size / quad_resolution`.
    pub fn build_lattice(
        count_x: usize,
        count_z: usize,
        quad_resolution_x: usize,
        quad_resolution_z: usize,
        cell_size_x: f32,
        cell_size_z: f32,
    ) -> Result<Self, TerrainError> {
        validate_node_counts(count_x, count_z)?;
        validate_quad_resolution(quad_resolution_x, quad_resolution_z)?;
        if !(cell_size_x.is_finite() && cell_size_x > 0.0) {
            return Err(TerrainError::invalid(
                "cell_size_x",
                format!("must be positive, got {cell_size_x}"),
            ));
        }
        if !(cell_size_z.is_finite() && cell_size_z > 0.0) {
            return Err(TerrainError::invalid(
                "cell_size_z",
                format!("must be positive, got {cell_size_z}"),
            ));
        }

        let (width, depth) =
            checked_lattice_dims(count_x, count_z, quad_resolution_x, quad_resolution_z)?;
        let quad_size = Vec2::new(
            cell_size_x / quad_resolution_x as f32,
            cell_size_z / quad_resolution_z as f32,
        );

        let mut vertices = Vec::with_capacity(width * depth);
        for z in 0..depth {
            for x in 0..width {
                vertices.push(Vec3::new(
                    x as f32 * quad_size.x,
                    0.0,
                    z as f32 * quad_size.y,
                ));
            }
        }

        log::debug!(
            "lattice allocated: {}x{} vertices, quad size {:?}",
            width,
            depth,
            quad_size
        );

        Ok(Self {
            width,
            depth,
            quad_resolution_x,
            quad_resolution_z,
            quad_size,
            vertices,
        })
    }

    /// Vertices along X
    pub fn width(&self) -> usize {
        self.width
    }

    /// Vertices along Z
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn quad_size(&self) -> Vec2 {
        self.quad_size
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn vertex(&self, x: usize, z: usize) -> Option<Vec3> {
        if x >= self.width || z >= self.depth {
            return None;
        }
        Some(self.vertices[z * self.width + x])
    }

    /// Resample every vertex.
    pub fn update_heights(&mut self, sampler: &HeightFieldSampler) {
        for v in &mut self.vertices {
            v.y = sampler.height(v.x, v.z);
        }
    }

    /// Lattice rectangle whose cells touch the 3x3 node neighbourhood of `node`.
    pub fn region_near(&self, node: NodeId) -> LatticeRegion {
        let rx = self.quad_resolution_x;
        let rz = self.quad_resolution_z;
        LatticeRegion {
            min_x: (node.i.saturating_sub(1) * rx).min(self.width - 1),
            min_z: (node.j.saturating_sub(1) * rz).min(self.depth - 1),
            max_x: ((node.i + 1) * rx).min(self.width - 1),
            max_z: ((node.j + 1) * rz).min(self.depth - 1),
        }
    }

    /// Resample only the vertices a change to `node` can affect.
    ///
    /// Returns the region that was refreshed.
    pub fn update_heights_near(
        &mut self,
        node: NodeId,
        sampler: &HeightFieldSampler,
    ) -> Result<LatticeRegion, TerrainError> {
        let grid = sampler.grid();
        if node.i >= grid.count_x() || node.j >= grid.count_z() {
            return Err(TerrainError::OutOfBounds {
                i: node.i,
                j: node.j,
                count_x: grid.count_x(),
                count_z: grid.count_z(),
            });
        }

        let region = self.region_near(node);
        for z in region.min_z..=region.max_z {
            let row = z * self.width;
            for x in region.min_x..=region.max_x {
                let v = &mut self.vertices[row + x];
                v.y = sampler.height(v.x, v.z);
            }
        }

        log::debug!(
            "refreshed {} vertices around node ({}, {})",
            region.vertex_count(),
            node.i,
            node.j
        );
        Ok(region)
    }

    /// Two triangles per quad, `[v00, v10, v01]` then `[v01, v10, v11]`,
    /// as a flat list of positions. Shared vertices are duplicated.
    pub fn emit_triangles(&self) -> Vec<[f32; 3]> {
        let quads = (self.width - 1) * (self.depth - 1);
        let mut out = Vec::with_capacity(quads * 6);

        for z in 0..self.depth - 1 {
            for x in 0..self.width - 1 {
                let i00 = z * self.width + x;
                let i10 = i00 + 1;
                let i01 = i00 + self.width;
                let i11 = i01 + 1;

                for idx in [i00, i10, i01, i01, i10, i11] {
                    out.push(self.vertices[idx].to_array());
                }
            }
        }

        out
    }
}
