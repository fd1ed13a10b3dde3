//! Math utilities and types
//!
//! Provides fundamental math types for 3D collision detection.

pub use nalgebra::{Matrix4, Vector3};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Extension trait for Mat4 with additional convenience methods
pub trait Mat4Ext {
    /// Extract the translation column of the matrix
    fn translation_part(&self) -> Vec3;

    /// Apply the full matrix to a position, including perspective divide
    fn apply_to_position(&self, position: Vec3) -> Vec3;
}

impl Mat4Ext for Mat4 {
    fn translation_part(&self) -> Vec3 {
        Vec3::new(self.m14, self.m24, self.m34)
    }

    fn apply_to_position(&self, position: Vec3) -> Vec3 {
        self.transform_point(&Point3::from(position)).coords
    }
}
