//! Terrain Module
//!
//! Procedural height-field terrain driven by a sparse grid of directional
//! control nodes, blended into a dense lattice with a quintic fade.

pub mod control_grid;
pub mod error;
pub mod lattice;
pub mod params;
pub mod sampler;
pub mod state;

pub use control_grid::{Cell, ControlGrid, ControlNode, NodeHandle, NodeId, random_unit_vector};
pub use error::TerrainError;
pub use lattice::{LatticeRegion, MeshBuilder};
pub use params::{MAX_LATTICE_VERTICES, TerrainParams};
pub use sampler::{HeightFieldSampler, fade, lerp};
pub use state::Terrain;
