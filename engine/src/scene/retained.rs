//! Scene Collaborator
//!
//! The terrain core only pushes data into a scene: a triangle mesh, the
//! control-node handle poses, and the translations that keep the terrain
//! centered. [`RetainedScene`] keeps all of it on the CPU for headless runs
//! and tests.

use std::collections::BTreeMap;

use glam::Vec3;

use super::bounds::Aabb;
use super::mesh::TerrainVertex;
use crate::terrain::NodeHandle;

/// Output sink for terrain geometry
pub trait TerrainScene {
    /// Replace the renderable terrain mesh.
    fn replace_mesh(&mut self, vertices: Vec<TerrainVertex>);

    /// Translation applied to the terrain mesh transform.
    fn set_mesh_offset(&mut self, offset: Vec3);

    /// Translation applied to the group holding every control-node handle.
    fn set_handle_offset(&mut self, offset: Vec3);

    /// Place one control-node handle (local to the handle group).
    fn set_handle_pose(&mut self, handle: NodeHandle, position: Vec3, direction: Vec3);

    /// Drop all geometry and handles.
    fn clear(&mut self);
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HandlePose {
    pub position: Vec3,
    pub direction: Vec3,
}

/// CPU-side scene that remembers everything pushed into it
#[derive(Debug, Default)]
pub struct RetainedScene {
    vertices: Vec<TerrainVertex>,
    mesh_offset: Vec3,
    handle_offset: Vec3,
    handles: BTreeMap<NodeHandle, HandlePose>,
    mesh_uploads: u64,
}

impl RetainedScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertices(&self) -> &[TerrainVertex] {
        &self.vertices
    }

    pub fn mesh_offset(&self) -> Vec3 {
        self.mesh_offset
    }

    pub fn handle_offset(&self) -> Vec3 {
        self.handle_offset
    }

    pub fn handle(&self, handle: NodeHandle) -> Option<&HandlePose> {
        self.handles.get(&handle)
    }

    pub fn handle_count(&self) -> usize {
        self.handles.len()
    }

    /// Number of `replace_mesh` calls since creation.
    pub fn mesh_uploads(&self) -> u64 {
        self.mesh_uploads
    }

    /// Bounds of the mesh after its transform is applied.
    pub fn bounds(&self) -> Option<Aabb> {
        Aabb::from_points(self.vertices.iter().map(|v| Vec3::from_array(v.position)))
            .map(|aabb| aabb.translated(self.mesh_offset))
    }

    /// World-space position of a handle.
    pub fn handle_world_position(&self, handle: NodeHandle) -> Option<Vec3> {
        self.handles
            .get(&handle)
            .map(|pose| pose.position + self.handle_offset)
    }
}

impl TerrainScene for RetainedScene {
    fn replace_mesh(&mut self, vertices: Vec<TerrainVertex>) {
        self.vertices = vertices;
        self.mesh_uploads += 1;
    }

    fn set_mesh_offset(&mut self, offset: Vec3) {
        self.mesh_offset = offset;
    }

    fn set_handle_offset(&mut self, offset: Vec3) {
        self.handle_offset = offset;
    }

    fn set_handle_pose(&mut self, handle: NodeHandle, position: Vec3, direction: Vec3) {
        self.handles.insert(handle, HandlePose { position, direction });
    }

    fn clear(&mut self) {
        self.vertices.clear();
        self.handles.clear();
        self.mesh_offset = Vec3::ZERO;
        self.handle_offset = Vec3::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_include_offset() {
        let mut scene = RetainedScene::new();
        scene.replace_mesh(vec![
            TerrainVertex { position: [0.0, 0.0, 0.0], normal: [0.0, 1.0, 0.0] },
            TerrainVertex { position: [2.0, 1.0, 2.0], normal: [0.0, 1.0, 0.0] },
        ]);
        scene.set_mesh_offset(Vec3::new(-1.0, 0.0, -1.0));
        let bounds = scene.bounds().unwrap();
        assert_eq!(bounds.min, Vec3::new(-1.0, 0.0, -1.0));
        assert_eq!(bounds.max, Vec3::new(1.0, 1.0, 1.0));
        assert_eq!(scene.mesh_uploads(), 1);
    }

    #[test]
    fn test_clear_drops_handles() {
        let mut scene = RetainedScene::new();
        scene.set_handle_pose(NodeHandle(0), Vec3::ZERO, Vec3::Y);
        scene.set_handle_offset(Vec3::X);
        assert_eq!(scene.handle_world_position(NodeHandle(0)), Some(Vec3::X));
        scene.clear();
        assert_eq!(scene.handle_count(), 0);
        assert!(scene.bounds().is_none());
    }
}
