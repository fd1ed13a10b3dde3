//! Axis-aligned bounding box primitive

use crate::collision::primitives::Triangle;
use crate::foundation::math::Vec3;

/// Axis-Aligned Bounding Box for spatial queries
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner of the bounding box
    pub min: Vec3,
    /// Maximum corner of the bounding box
    pub max: Vec3,
}

impl Aabb {
    /// Create a new AABB from min and max points
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Compute the tight bounds of a set of triangles
    ///
    /// Returns `None` for an empty slice; callers that require non-empty
    /// input surface that as an error at their own level.
    pub fn from_triangles(triangles: &[Triangle]) -> Option<Self> {
        let first = triangles.first()?;
        let mut bounds = Self::new(first.v0, first.v0);
        for triangle in triangles {
            for vertex in [triangle.v0, triangle.v1, triangle.v2] {
                bounds.grow_to_contain(vertex);
            }
        }
        Some(bounds)
    }

    /// Expand the bounds to include a point
    pub fn grow_to_contain(&mut self, point: Vec3) {
        self.min = self.min.inf(&point);
        self.max = self.max.sup(&point);
    }

    /// Get the center of the AABB
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Get the size of the AABB along each axis
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Index of the axis with the largest extent (0 = x, 1 = y, 2 = z)
    pub fn longest_axis(&self) -> usize {
        let size = self.size();
        if size.x >= size.y && size.x >= size.z {
            0
        } else if size.y >= size.z {
            1
        } else {
            2
        }
    }

    /// Surface area of the box, `2 * (wh + hd + wd)`
    pub fn surface_area(&self) -> f32 {
        let size = self.size();
        2.0 * (size.x * size.y + size.y * size.z + size.x * size.z)
    }

    /// Return a copy of the box shifted by an offset
    pub fn translated(&self, offset: Vec3) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// Check if this AABB contains a point
    pub fn contains_point(&self, point: Vec3) -> bool {
        point.x >= self.min.x && point.x <= self.max.x &&
        point.y >= self.min.y && point.y <= self.max.y &&
        point.z >= self.min.z && point.z <= self.max.z
    }

    /// Check if this AABB intersects another AABB
    ///
    /// Two boxes are disjoint if their intervals fail to overlap on any
    /// single axis; otherwise they intersect.
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x && self.max.x >= other.min.x &&
        self.min.y <= other.max.y && self.max.y >= other.min.y &&
        self.min.z <= other.max.z && self.max.z >= other.min.z
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_box_at(origin: Vec3) -> Aabb {
        Aabb::new(origin, origin + Vec3::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn overlap_requires_all_three_axes() {
        let a = unit_box_at(Vec3::zeros());
        assert!(a.intersects(&unit_box_at(Vec3::new(0.5, 0.5, 0.5))));
        // Separated on exactly one axis
        assert!(!a.intersects(&unit_box_at(Vec3::new(1.5, 0.0, 0.0))));
        assert!(!a.intersects(&unit_box_at(Vec3::new(0.0, 0.0, -1.5))));
        // Touching faces count as overlap
        assert!(a.intersects(&unit_box_at(Vec3::new(1.0, 0.0, 0.0))));
    }

    #[test]
    fn surface_area_of_box() {
        let b = Aabb::new(Vec3::zeros(), Vec3::new(2.0, 3.0, 4.0));
        assert_relative_eq!(b.surface_area(), 2.0 * (6.0 + 12.0 + 8.0));
    }

    #[test]
    fn from_triangles_is_tight() {
        let triangles = [
            Triangle::new(
                Vec3::new(-1.0, 0.0, 0.0),
                Vec3::new(2.0, 5.0, -3.0),
                Vec3::new(0.0, -2.0, 1.0),
            ),
        ];
        let bounds = Aabb::from_triangles(&triangles).unwrap();
        assert_relative_eq!(bounds.min, Vec3::new(-1.0, -2.0, -3.0));
        assert_relative_eq!(bounds.max, Vec3::new(2.0, 5.0, 1.0));
        assert!(Aabb::from_triangles(&[]).is_none());
    }

    #[test]
    fn longest_axis_picks_widest_extent() {
        let b = Aabb::new(Vec3::zeros(), Vec3::new(1.0, 4.0, 2.0));
        assert_eq!(b.longest_axis(), 1);
    }

    #[test]
    fn translated_shifts_both_corners() {
        let b = unit_box_at(Vec3::zeros()).translated(Vec3::new(3.0, 0.0, -1.0));
        assert_relative_eq!(b.min, Vec3::new(3.0, 0.0, -1.0));
        assert_relative_eq!(b.max, Vec3::new(4.0, 1.0, 0.0));
    }
}
