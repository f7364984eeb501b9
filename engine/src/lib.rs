//! Vector Terrain Engine
//!
//! Procedural height-field terrain from a sparse grid of directional
//! control nodes. Each node's direction biases the height of nearby points;
//! a quintic fade blends the four nodes around every point into a smooth
//! surface that is sampled into a dense triangle mesh.
//!
//! # Modules
//!
//! - [`terrain`] - Control grid, height sampler, mesh lattice and the `Terrain` orchestrator
//! - [`scene`] - Vertex layout, bounds, scene sink trait and OBJ export
//! - [`app`] - Owned clock, demo lifecycle trait and the headless terrain demo
//!
//! # Example
//!
//! ```
//! use glam::Vec3;
//! use vector_terrain_engine::terrain::{NodeId, Terrain, TerrainParams};
//!
//! let mut terrain = Terrain::new(TerrainParams::default()).unwrap();
//! terrain.refresh().unwrap();
//! terrain.randomize_directions().unwrap();
//!
//! // Tilt one node the way a transform gizmo would
//! terrain.set_node_direction(NodeId::new(2, 3), Vec3::new(1.0, 1.0, 0.0)).unwrap();
//!
//! let vertices = terrain.mesh_vertices();
//! assert_eq!(vertices.len(), terrain.triangles().len());
//! ```

pub mod app;
pub mod scene;
pub mod terrain;

// Re-export the most used types at crate level for convenience
pub use scene::{Aabb, RetainedScene, TerrainScene, TerrainVertex};
pub use terrain::{
    ControlGrid, HeightFieldSampler, MeshBuilder, NodeHandle, NodeId, Terrain, TerrainError,
    TerrainParams,
};
