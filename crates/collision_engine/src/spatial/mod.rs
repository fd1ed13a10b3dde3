//! Spatial partitioning for broad-phase collision pruning
//!
//! Provides an axis-aligned bounding box hierarchy built over triangle
//! soups, plus a stack-based pairwise traversal that enumerates leaf
//! volumes in mutual overlap.
//!
//! # Module Organization
//!
//! - [`aabb`] - The bounding box primitive and interval overlap tests
//! - [`aabb_tree`] - Top-down tree construction and bound updates
//! - [`traversal`] - Dual-tree descent for overlap reporting

pub mod aabb;
pub mod aabb_tree;
pub mod traversal;

pub use aabb::Aabb;
pub use aabb_tree::{AabbNode, AabbTree, LeafId, NodeKind, SpatialError};
pub use traversal::{overlapping_leaf_pairs, overlapping_leaves};

slotmap::new_key_type! {
    /// Non-owning handle to a renderable debug volume
    ///
    /// The debug renderer owns the actual volume resources; tree nodes only
    /// carry this back-reference so overlap reports can be highlighted.
    pub struct VolumeId;
}
