//! Scene Module
//!
//! The boundary between the terrain core and whatever draws it:
//! vertex layout, bounds, the scene sink trait and file export.

pub mod bounds;
pub mod export;
pub mod mesh;
pub mod retained;

pub use bounds::Aabb;
pub use export::{write_obj, write_obj_to};
pub use mesh::{TerrainVertex, face_normal, triangles_to_vertices};
pub use retained::{HandlePose, RetainedScene, TerrainScene};
