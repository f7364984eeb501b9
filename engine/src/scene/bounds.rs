//! Axis-aligned bounding boxes for recentering.

use glam::Vec3;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Tightest box around `points`, or `None` if there are none.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Vec3>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let (min, max) = iter.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
        Some(Self { min, max })
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn translated(&self, offset: Vec3) -> Self {
        Self::new(self.min + offset, self.max + offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_points_empty() {
        assert!(Aabb::from_points(std::iter::empty()).is_none());
    }

    #[test]
    fn test_from_points_center() {
        let aabb = Aabb::from_points([
            Vec3::new(0.0, -1.0, 0.0),
            Vec3::new(4.0, 3.0, 2.0),
            Vec3::new(1.0, 0.0, 1.0),
        ])
        .unwrap();
        assert_eq!(aabb.min, Vec3::new(0.0, -1.0, 0.0));
        assert_eq!(aabb.max, Vec3::new(4.0, 3.0, 2.0));
        assert_eq!(aabb.center(), Vec3::new(2.0, 1.0, 1.0));
        assert_eq!(aabb.size(), Vec3::new(4.0, 4.0, 2.0));
    }
}
