//! Height Field Sampler
//!
//! Gradient-noise style height lookup over a [`ControlGrid`]:
//!
//! 1. Locate the enclosing cell (clamped to the edge cells).
//! 2. Evaluate each corner's directional weight `direction . (point - position)`.
//! 3. Blend the four weights bilinearly using the quintic fade of the
//!    cell-relative coordinates.
//!
//! The fade has zero first and second derivatives at 0 and 1, so the
//! surface is C2 across cell edges. Points outside the grid extrapolate from
//! the nearest edge cell instead of failing.

use glam::Vec3;

use super::control_grid::ControlGrid;
use super::error::TerrainError;

/// Quintic fade `t^3 * (t * (6t - 15) + 10)`.
///
/// # Examples
/// ```
/// use vector_terrain_engine::terrain::fade;
///
/// assert_eq!(fade(0.0), 0.0);
/// assert_eq!(fade(0.5), 0.5);
/// assert_eq!(fade(1.0), 1.0);
/// ```
#[inline]
pub fn fade(t: f32) -> f32 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

/// Linearly interpolate between two values. `t` is not clamped.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Read-only height lookup over a generated control grid
#[derive(Clone, Copy, Debug)]
pub struct HeightFieldSampler<'a> {
    grid: &'a ControlGrid,
}

impl<'a> HeightFieldSampler<'a> {
    /// Borrow a grid for sampling. Fails if the grid was never generated.
    pub fn new(grid: &'a ControlGrid) -> Result<Self, TerrainError> {
        if !grid.is_generated() {
            return Err(TerrainError::PrecedenceViolation("height sampling"));
        }
        Ok(Self { grid })
    }

    pub fn grid(&self) -> &'a ControlGrid {
        self.grid
    }

    /// Height of the ground-plane point `(x, 0, z)`.
    pub fn height(&self, x: f32, z: f32) -> f32 {
        let grid = self.grid;
        let cell_size = grid.cell_size();
        let cell = grid.cell_at(x, z);

        let point = Vec3::new(x, 0.0, z);
        let bot_left_w = cell.bot_left.weight(point);
        let bot_right_w = cell.bot_right.weight(point);
        let top_right_w = cell.top_right.weight(point);
        let top_left_w = cell.top_left.weight(point);

        let u = (x - cell.bot_left.position.x) / cell_size.x;
        let v = (z - cell.bot_left.position.z) / cell_size.y;
        let su = fade(u);
        let sv = fade(v);

        let nx0 = lerp(bot_left_w, bot_right_w, su);
        let nx1 = lerp(top_left_w, top_right_w, su);
        lerp(nx0, nx1, sv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::control_grid::NodeId;

    #[test]
    fn test_fade_endpoints_exact() {
        assert_eq!(fade(0.0), 0.0);
        assert_eq!(fade(1.0), 1.0);
        assert_eq!(fade(0.5), 0.5);
    }

    #[test]
    fn test_fade_symmetric() {
        for k in 1..10 {
            let t = k as f32 / 10.0;
            assert!((fade(t) + fade(1.0 - t) - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_fade_flat_at_ends() {
        let h = 1e-2;
        let slope_start = (fade(h) - fade(0.0)) / h;
        let slope_end = (fade(1.0) - fade(1.0 - h)) / h;
        assert!(slope_start.abs() < 1e-2);
        assert!(slope_end.abs() < 1e-2);
    }

    #[test]
    fn test_lerp_extrapolates() {
        assert_eq!(lerp(2.0, 4.0, 0.5), 3.0);
        assert_eq!(lerp(2.0, 4.0, 2.0), 6.0);
    }

    #[test]
    fn test_sampler_requires_generated_grid() {
        let grid = ControlGrid::new();
        assert!(matches!(
            HeightFieldSampler::new(&grid),
            Err(TerrainError::PrecedenceViolation(_))
        ));
    }

    #[test]
    fn test_cell_center_blends_all_corners_equally() {
        let mut grid = ControlGrid::new();
        grid.generate(2, 2, 2.0, 2.0).unwrap();
        grid.set_direction(NodeId::new(0, 0), Vec3::X).unwrap();
        let sampler = HeightFieldSampler::new(&grid).unwrap();

        // Only bot-left contributes: weight 0.5 scaled by a quarter.
        let h = sampler.height(0.5, 0.5);
        assert!((h - 0.125).abs() < 1e-6, "got {h}");
    }
}
