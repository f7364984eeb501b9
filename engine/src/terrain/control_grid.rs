//! Control Grid
//!
//! A sparse 2D array of control nodes. Each node sits on the ground plane
//! and carries a direction that biases the height of nearby points.
//!
//! Nodes are stored row-major (`j * count_x + i`), so the row-major index
//! doubles as the node's [`NodeHandle`].

use glam::{Vec2, Vec3};
use rand::Rng;

use super::error::TerrainError;
use super::params::{validate_node_counts, validate_world_size};

/// Grid coordinate of a control node
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId {
    pub i: usize,
    pub j: usize,
}

impl NodeId {
    pub fn new(i: usize, j: usize) -> Self {
        Self { i, j }
    }
}

/// Stable identity handed to editing tools; valid until the grid is regenerated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeHandle(pub u32);

/// A sparse grid point with a position and a slope direction
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ControlNode {
    pub position: Vec3,
    pub direction: Vec3,
}

impl ControlNode {
    /// Directional weight of this node at `point`.
    #[inline]
    pub fn weight(&self, point: Vec3) -> f32 {
        self.direction.dot(point - self.position)
    }
}

/// The four nodes bounding one cell, derived on demand
#[derive(Clone, Copy, Debug)]
pub struct Cell<'a> {
    pub bot_left: &'a ControlNode,
    pub bot_right: &'a ControlNode,
    pub top_right: &'a ControlNode,
    pub top_left: &'a ControlNode,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ControlGrid {
    nodes: Vec<ControlNode>,
    count_x: usize,
    count_z: usize,
    cell_size: Vec2,
}

impl ControlGrid {
    /// Create an empty grid. Nothing can be sampled until [`Self::generate`] succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Discard any existing nodes and lay out `count_x * count_z` fresh ones
    /// pointing straight up.
    ///
    /// Node `(i, j)` lands at `(i * cell_size_x, 0, j * cell_size_z)` where
    /// `cell_size = world_size / count`. On error the previous grid is kept.
    pub fn generate(
        &mut self,
        count_x: usize,
        count_z: usize,
        world_size_x: f32,
        world_size_z: f32,
    ) -> Result<(), TerrainError> {
        validate_node_counts(count_x, count_z)?;
        validate_world_size(world_size_x, world_size_z)?;

        let cell_size = Vec2::new(world_size_x / count_x as f32, world_size_z / count_z as f32);

        self.nodes.clear();
        self.nodes.reserve(count_x * count_z);
        for j in 0..count_z {
            for i in 0..count_x {
                self.nodes.push(ControlNode {
                    position: Vec3::new(i as f32 * cell_size.x, 0.0, j as f32 * cell_size.y),
                    direction: Vec3::Y,
                });
            }
        }
        self.count_x = count_x;
        self.count_z = count_z;
        self.cell_size = cell_size;

        log::debug!(
            "control grid generated: {}x{} nodes, cell size {:?}",
            count_x,
            count_z,
            cell_size
        );
        Ok(())
    }

    /// Whether [`Self::generate`] has produced a usable grid.
    pub fn is_generated(&self) -> bool {
        self.count_x >= 2 && self.count_z >= 2
    }

    pub fn count_x(&self) -> usize {
        self.count_x
    }

    pub fn count_z(&self) -> usize {
        self.count_z
    }

    pub fn cell_size(&self) -> Vec2 {
        self.cell_size
    }

    pub fn nodes(&self) -> &[ControlNode] {
        &self.nodes
    }

    /// Iterate nodes together with their grid coordinates.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &ControlNode)> + '_ {
        let count_x = self.count_x;
        self.nodes
            .iter()
            .enumerate()
            .map(move |(idx, node)| (NodeId::new(idx % count_x, idx / count_x), node))
    }

    fn index(&self, id: NodeId) -> Result<usize, TerrainError> {
        if id.i >= self.count_x || id.j >= self.count_z {
            return Err(TerrainError::OutOfBounds {
                i: id.i,
                j: id.j,
                count_x: self.count_x,
                count_z: self.count_z,
            });
        }
        Ok(id.j * self.count_x + id.i)
    }

    pub fn node(&self, id: NodeId) -> Result<&ControlNode, TerrainError> {
        let idx = self.index(id)?;
        Ok(&self.nodes[idx])
    }

    pub fn handle(&self, id: NodeId) -> Result<NodeHandle, TerrainError> {
        let idx = self.index(id)?;
        u32::try_from(idx).map(NodeHandle).map_err(|_| {
            TerrainError::invalid("node_count", format!("node index {idx} exceeds the handle range"))
        })
    }

    /// Map an editing handle back to grid coordinates.
    pub fn node_id(&self, handle: NodeHandle) -> Result<NodeId, TerrainError> {
        let idx = handle.0 as usize;
        if idx >= self.nodes.len() {
            return Err(TerrainError::OutOfBounds {
                i: idx % self.count_x.max(1),
                j: idx / self.count_x.max(1),
                count_x: self.count_x,
                count_z: self.count_z,
            });
        }
        Ok(NodeId::new(idx % self.count_x, idx / self.count_x))
    }

    /// Replace one node's direction. The stored direction is normalized.
    pub fn set_direction(&mut self, id: NodeId, direction: Vec3) -> Result<(), TerrainError> {
        let idx = self.index(id)?;
        let unit = direction.try_normalize().ok_or_else(|| {
            TerrainError::invalid(
                "direction",
                format!("cannot normalize {direction:?}"),
            )
        })?;
        self.nodes[idx].direction = unit;
        Ok(())
    }

    /// Give every node a uniformly distributed unit direction. Positions are untouched.
    pub fn randomize_all<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for node in &mut self.nodes {
            node.direction = random_unit_vector(rng);
        }
    }

    /// Cell containing `(x, z)`, clamped to `[0, count_x-2] x [0, count_z-2]`.
    pub fn cell_index(&self, x: f32, z: f32) -> (usize, usize) {
        let cx = clamp_cell((x / self.cell_size.x).floor(), self.count_x);
        let cz = clamp_cell((z / self.cell_size.y).floor(), self.count_z);
        (cx, cz)
    }

    /// Corner nodes of cell `(cx, cz)`.
    pub fn cell(&self, cx: usize, cz: usize) -> Result<Cell<'_>, TerrainError> {
        if cx >= self.count_x.saturating_sub(1) || cz >= self.count_z.saturating_sub(1) {
            return Err(TerrainError::OutOfBounds {
                i: cx,
                j: cz,
                count_x: self.count_x,
                count_z: self.count_z,
            });
        }
        Ok(self.corners(cx, cz))
    }

    /// Corner nodes of the cell containing `(x, z)`. Only valid on a generated grid.
    pub(crate) fn cell_at(&self, x: f32, z: f32) -> Cell<'_> {
        let (cx, cz) = self.cell_index(x, z);
        self.corners(cx, cz)
    }

    fn corners(&self, cx: usize, cz: usize) -> Cell<'_> {
        let row = self.count_x;
        let bl = cz * row + cx;
        let tl = (cz + 1) * row + cx;
        Cell {
            bot_left: &self.nodes[bl],
            bot_right: &self.nodes[bl + 1],
            top_right: &self.nodes[tl + 1],
            top_left: &self.nodes[tl],
        }
    }
}

fn clamp_cell(n: f32, count: usize) -> usize {
    let max = count.saturating_sub(2) as f32;
    // NaN collapses to the first cell
    n.max(0.0).min(max) as usize
}

/// Rejection-sample a point inside the unit ball and project it onto the sphere.
pub fn random_unit_vector<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    loop {
        let v = Vec3::new(
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
        );
        let len_sq = v.length_squared();
        if len_sq > 1e-6 && len_sq <= 1.0 {
            return v / len_sq.sqrt();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn grid(count_x: usize, count_z: usize, size_x: f32, size_z: f32) -> ControlGrid {
        let mut grid = ControlGrid::new();
        grid.generate(count_x, count_z, size_x, size_z).unwrap();
        grid
    }

    #[test]
    fn test_generate_layout() {
        let grid = grid(3, 2, 6.0, 4.0);
        assert_eq!(grid.nodes().len(), 6);
        assert_eq!(grid.cell_size(), Vec2::new(2.0, 2.0));
        let node = grid.node(NodeId::new(2, 1)).unwrap();
        assert_eq!(node.position, Vec3::new(4.0, 0.0, 2.0));
        assert!(grid.nodes().iter().all(|n| n.direction == Vec3::Y));
    }

    #[test]
    fn test_generate_rejects_bad_input_and_keeps_old_grid() {
        let mut g = grid(2, 2, 1.0, 1.0);
        assert!(g.generate(1, 4, 1.0, 1.0).is_err());
        assert!(g.generate(4, 4, 0.0, 1.0).is_err());
        assert!(g.generate(1 << 16, 1 << 16, 1.0, 1.0).is_err());
        assert_eq!(g.count_x(), 2);
        assert!(g.is_generated());
    }

    #[test]
    fn test_empty_grid_not_generated() {
        assert!(!ControlGrid::new().is_generated());
    }

    #[test]
    fn test_regenerate_clears_directions() {
        let mut g = grid(2, 2, 1.0, 1.0);
        g.set_direction(NodeId::new(0, 0), Vec3::X).unwrap();
        g.generate(2, 2, 1.0, 1.0).unwrap();
        assert_eq!(g.node(NodeId::new(0, 0)).unwrap().direction, Vec3::Y);
    }

    #[test]
    fn test_set_direction_normalizes() {
        let mut g = grid(2, 2, 1.0, 1.0);
        g.set_direction(NodeId::new(1, 1), Vec3::new(0.0, 3.0, 4.0)).unwrap();
        let dir = g.node(NodeId::new(1, 1)).unwrap().direction;
        assert!((dir - Vec3::new(0.0, 0.6, 0.8)).length() < 1e-6);
    }

    #[test]
    fn test_set_direction_out_of_bounds() {
        let mut g = grid(2, 3, 1.0, 1.0);
        let err = g.set_direction(NodeId::new(2, 0), Vec3::X).unwrap_err();
        assert!(matches!(err, TerrainError::OutOfBounds { i: 2, j: 0, .. }));
        assert!(g.set_direction(NodeId::new(1, 2), Vec3::X).is_ok());
    }

    #[test]
    fn test_set_direction_rejects_zero() {
        let mut g = grid(2, 2, 1.0, 1.0);
        let err = g.set_direction(NodeId::new(0, 0), Vec3::ZERO).unwrap_err();
        assert!(matches!(err, TerrainError::InvalidParameter { .. }));
    }

    #[test]
    fn test_handles_map_back_to_ids() {
        let g = grid(4, 3, 4.0, 3.0);
        for (id, _) in g.iter() {
            let handle = g.handle(id).unwrap();
            assert_eq!(g.node_id(handle).unwrap(), id);
        }
        assert!(g.node_id(NodeHandle(12)).is_err());
    }

    #[test]
    fn test_randomize_keeps_positions_and_yields_unit_vectors() {
        let mut g = grid(4, 4, 8.0, 8.0);
        let before: Vec<Vec3> = g.nodes().iter().map(|n| n.position).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        g.randomize_all(&mut rng);
        for (node, pos) in g.nodes().iter().zip(before) {
            assert_eq!(node.position, pos);
            assert!((node.direction.length() - 1.0).abs() < 1e-5);
        }
        assert!(g.nodes().iter().any(|n| n.direction != Vec3::Y));
    }

    #[test]
    fn test_randomize_reproducible_with_seed() {
        let mut a = grid(3, 3, 3.0, 3.0);
        let mut b = a.clone();
        a.randomize_all(&mut ChaCha8Rng::seed_from_u64(42));
        b.randomize_all(&mut ChaCha8Rng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_cell_index_clamps() {
        let g = grid(3, 3, 3.0, 3.0);
        assert_eq!(g.cell_index(0.5, 0.5), (0, 0));
        assert_eq!(g.cell_index(2.0, 1.0), (1, 1));
        assert_eq!(g.cell_index(50.0, -4.0), (1, 0));
    }

    #[test]
    fn test_cell_out_of_bounds() {
        let g = grid(2, 2, 2.0, 2.0);
        let err = g.cell(3, 3).unwrap_err();
        assert!(matches!(err, TerrainError::OutOfBounds { i: 3, j: 3, .. }));
        // A 2x2 grid has exactly one cell
        assert!(g.cell(1, 0).is_err());
        let cell = g.cell(0, 0).unwrap();
        assert_eq!(cell.top_right.position, Vec3::new(1.0, 0.0, 1.0));
    }

    #[test]
    fn test_cell_on_empty_grid_is_error() {
        assert!(ControlGrid::new().cell(0, 0).is_err());
    }

    #[test]
    fn test_cell_at_matches_cell_index() {
        let g = grid(4, 3, 8.0, 6.0);
        let cell = g.cell_at(5.5, 100.0);
        let (cx, cz) = g.cell_index(5.5, 100.0);
        assert_eq!((cx, cz), (2, 1));
        assert_eq!(cell.bot_left.position, g.cell(cx, cz).unwrap().bot_left.position);
    }
}
