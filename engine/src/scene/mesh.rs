//! Terrain Mesh Vertices
//!
//! Converts the lattice's triangle soup into GPU-ready vertices with
//! flat per-triangle normals.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use static_assertions::const_assert_eq;

/// Vertex data for terrain mesh
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct TerrainVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

// position (12) + normal (12)
const_assert_eq!(std::mem::size_of::<TerrainVertex>(), 24);

/// Face normal of a triangle, oriented into the +Y hemisphere.
///
/// A height field is only ever seen from above, so the normal is flipped
/// to face up regardless of winding. Degenerate triangles get `+Y`.
pub fn face_normal(a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
    let n = (b - a).cross(c - a);
    let n = if n.y < 0.0 { -n } else { n };
    n.try_normalize().unwrap_or(Vec3::Y)
}

/// Build vertices from a flat position list; trailing positions that do not
/// complete a triangle are dropped.
pub fn triangles_to_vertices(positions: &[[f32; 3]]) -> Vec<TerrainVertex> {
    let mut out = Vec::with_capacity(positions.len() - positions.len() % 3);
    for tri in positions.chunks_exact(3) {
        let a = Vec3::from_array(tri[0]);
        let b = Vec3::from_array(tri[1]);
        let c = Vec3::from_array(tri[2]);
        let normal = face_normal(a, b, c).to_array();
        for p in tri {
            out.push(TerrainVertex {
                position: *p,
                normal,
            });
        }
    }
    out
}
