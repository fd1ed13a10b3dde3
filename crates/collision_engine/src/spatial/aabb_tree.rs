//! Bounding volume hierarchy over triangle soups
//!
//! Builds a binary AABB tree top-down by recursively partitioning a
//! triangle array in place, and re-derives node bounds when the owning
//! collider moves. Built once per collider at load time; the tree itself
//! is immutable afterwards.

use crate::collision::primitives::Triangle;
use crate::foundation::math::{Mat4, Mat4Ext, Vec3};
use crate::spatial::{Aabb, VolumeId};

/// Errors produced by spatial structure construction
#[derive(thiserror::Error, Debug)]
pub enum SpatialError {
    /// A collider must supply at least one triangle
    #[error("Invalid input: cannot build an AABB tree from zero triangles")]
    EmptyTriangleSet,
}

/// Identifier of a leaf volume, dense within its owning tree
///
/// Assigned in build order starting at zero. Identifiers are tree-local;
/// callers comparing two distinct trees pair them with a collider handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LeafId(pub u32);

/// Payload distinguishing leaf and internal nodes
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// Terminal node owning a slice of the collider's triangles
    Leaf {
        /// Dense identifier used in overlap reports
        id: LeafId,
        /// Triangles enclosed by this leaf (at least one)
        triangles: Vec<Triangle>,
    },
    /// Interior node with exactly two children
    Internal {
        /// Left child subtree
        left: Box<AabbNode>,
        /// Right child subtree
        right: Box<AabbNode>,
    },
}

/// Single node in the bounding volume hierarchy
///
/// Invariant: `bounds` tightly encloses every triangle vertex in the
/// subtree at build time; after a transform update the bounds are the
/// built bounds shifted by the transform's translation.
#[derive(Debug, Clone)]
pub struct AabbNode {
    /// World-space bounds of this node
    pub bounds: Aabb,

    /// Back-reference to a renderable volume for debug highlighting
    pub visual_id: Option<VolumeId>,

    /// Leaf or internal payload
    pub kind: NodeKind,
}

impl AabbNode {
    /// Check if this node is a leaf
    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf { .. })
    }

    /// Leaf identifier, if this node is a leaf
    pub fn leaf_id(&self) -> Option<LeafId> {
        match &self.kind {
            NodeKind::Leaf { id, .. } => Some(*id),
            NodeKind::Internal { .. } => None,
        }
    }

    /// Both children, if this node is internal
    pub fn children(&self) -> Option<(&AabbNode, &AabbNode)> {
        match &self.kind {
            NodeKind::Internal { left, right } => Some((left, right)),
            NodeKind::Leaf { .. } => None,
        }
    }

    fn depth(&self) -> usize {
        match &self.kind {
            NodeKind::Leaf { .. } => 1,
            NodeKind::Internal { left, right } => 1 + left.depth().max(right.depth()),
        }
    }

    fn collect_leaves<'a>(&'a self, leaves: &mut Vec<&'a AabbNode>) {
        match &self.kind {
            NodeKind::Leaf { .. } => leaves.push(self),
            NodeKind::Internal { left, right } => {
                left.collect_leaves(leaves);
                right.collect_leaves(leaves);
            }
        }
    }
}

/// Binary AABB hierarchy for one collider
#[derive(Debug, Clone)]
pub struct AabbTree {
    /// Root node enclosing the whole collider
    pub root: AabbNode,

    leaf_count: u32,
}

impl AabbTree {
    /// Build a tree over the given triangles
    ///
    /// The slice is reordered in place during partitioning; the triangles
    /// themselves are copied into the leaves. Partitioning splits each
    /// range by triangle centroid against the bounds midpoint on the
    /// longest axis, retrying the remaining axes cyclically when one side
    /// comes up empty. If no axis separates the centroids the range is
    /// force-split at the array midpoint, which guarantees termination on
    /// fully degenerate input at the cost of split quality.
    pub fn build(triangles: &mut [Triangle], leaf_threshold: usize) -> Result<Self, SpatialError> {
        if triangles.is_empty() {
            return Err(SpatialError::EmptyTriangleSet);
        }
        let threshold = leaf_threshold.max(1);

        let mut next_leaf = 0u32;
        let root = build_node(triangles, threshold, &mut next_leaf);
        log::debug!(
            "built AABB tree: {} triangles, {} leaves, depth {}",
            triangles.len(),
            next_leaf,
            root.depth()
        );
        Ok(Self {
            root,
            leaf_count: next_leaf,
        })
    }

    /// Number of leaves in the tree
    pub fn leaf_count(&self) -> u32 {
        self.leaf_count
    }

    /// Length of the longest root-to-leaf path (root counts as 1)
    pub fn depth(&self) -> usize {
        self.root.depth()
    }

    /// All leaf nodes, in identifier order
    pub fn leaves(&self) -> Vec<&AabbNode> {
        let mut leaves = Vec::with_capacity(self.leaf_count as usize);
        self.root.collect_leaves(&mut leaves);
        leaves
    }

    /// Attach renderable volume handles to nodes for debug highlighting
    ///
    /// The callback sees each node top-down and returns the handle to
    /// store, or `None` to leave the node unhighlighted.
    pub fn assign_visuals<F>(&mut self, mut assign: F)
    where
        F: FnMut(&AabbNode) -> Option<VolumeId>,
    {
        assign_visual(&mut self.root, &mut assign);
    }

    /// Re-derive node bounds after the owning collider's transform changed
    ///
    /// Only the transform's translation column is applied; rotation and
    /// scale are ignored, so bounds drift from the true fit under rotated
    /// transforms. Downstream consumers expect this approximation.
    pub fn translated_by(&self, transform: &Mat4) -> Self {
        let offset = transform.translation_part();
        Self {
            root: translate_node(&self.root, offset),
            leaf_count: self.leaf_count,
        }
    }
}

fn build_node(triangles: &mut [Triangle], leaf_threshold: usize, next_leaf: &mut u32) -> AabbNode {
    // Range is never empty: build() rejects empty input and both split
    // strategies below leave at least one triangle on each side.
    let mut bounds = Aabb::new(triangles[0].v0, triangles[0].v0);
    for triangle in triangles.iter() {
        for vertex in [triangle.v0, triangle.v1, triangle.v2] {
            bounds.grow_to_contain(vertex);
        }
    }

    if triangles.len() <= leaf_threshold {
        let id = LeafId(*next_leaf);
        *next_leaf += 1;
        return AabbNode {
            bounds,
            visual_id: None,
            kind: NodeKind::Leaf {
                id,
                triangles: triangles.to_vec(),
            },
        };
    }

    let longest = bounds.longest_axis();
    let pivot_point = bounds.center();
    let mut split = None;
    for attempt in 0..3 {
        let axis = (longest + attempt) % 3;
        let mid = partition_by_centroid(triangles, axis, pivot_point[axis]);
        if mid > 0 && mid < triangles.len() {
            split = Some(mid);
            break;
        }
    }
    // No axis separated the centroids (all identical or collinear):
    // force an even array split rather than failing.
    let mid = split.unwrap_or(triangles.len() / 2);

    let (left_half, right_half) = triangles.split_at_mut(mid);
    let left = build_node(left_half, leaf_threshold, next_leaf);
    let right = build_node(right_half, leaf_threshold, next_leaf);

    AabbNode {
        bounds,
        visual_id: None,
        kind: NodeKind::Internal {
            left: Box::new(left),
            right: Box::new(right),
        },
    }
}

/// Reorder the slice so triangles with centroid below `pivot` on `axis`
/// come first; returns the index of the first triangle at or above it
fn partition_by_centroid(triangles: &mut [Triangle], axis: usize, pivot: f32) -> usize {
    let mut mid = 0;
    for i in 0..triangles.len() {
        if triangles[i].centroid()[axis] < pivot {
            triangles.swap(i, mid);
            mid += 1;
        }
    }
    mid
}

fn assign_visual<F>(node: &mut AabbNode, assign: &mut F)
where
    F: FnMut(&AabbNode) -> Option<VolumeId>,
{
    let id = assign(&*node);
    node.visual_id = id;
    if let NodeKind::Internal { left, right } = &mut node.kind {
        assign_visual(left, assign);
        assign_visual(right, assign);
    }
}

fn translate_node(node: &AabbNode, offset: Vec3) -> AabbNode {
    AabbNode {
        bounds: node.bounds.translated(offset),
        visual_id: node.visual_id,
        kind: match &node.kind {
            NodeKind::Leaf { id, triangles } => NodeKind::Leaf {
                id: *id,
                triangles: triangles.clone(),
            },
            NodeKind::Internal { left, right } => NodeKind::Internal {
                left: Box::new(translate_node(left, offset)),
                right: Box::new(translate_node(right, offset)),
            },
        },
    }
}
