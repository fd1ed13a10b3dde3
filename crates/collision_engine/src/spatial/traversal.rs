//! Dual-tree traversal for broad-phase overlap reporting
//!
//! Walks two bounding volume hierarchies (or one hierarchy against
//! itself) pairwise and collects every leaf pair found in mutual
//! overlap. The descent is iterative over an explicit stack, so
//! adversarially deep trees cannot exhaust the call stack; the stack
//! capacity is a configured bound instead.

use std::collections::HashSet;

use crate::foundation::math::{Mat4, Mat4Ext};
use crate::spatial::aabb_tree::{AabbNode, AabbTree, LeafId};

/// Enumerate leaf pairs of `a` and `b` whose world-space bounds overlap
///
/// World-space bounds are the built bounds shifted by each transform's
/// translation, matching the tree updater's approximation. Each element
/// is `(leaf of a, leaf of b)`; identifiers are local to their owning
/// tree, so the pair shape is what lets callers attribute a leaf to the
/// tree it came from. The returned set is fresh per call.
///
/// When neither current node is a leaf, the traversal descends into the
/// node with the greater surface area first (the descend-larger rule);
/// when exactly one is a leaf it descends the other side. Preserving
/// this order keeps leaf-pair enumeration identical across runs.
///
/// # Panics
///
/// Panics if the pending-pair stack exceeds `stack_capacity`. That means
/// the trees are deeper than the configured bound allows, which is a
/// builder/configuration mismatch rather than a runtime condition.
pub fn overlapping_leaf_pairs(
    a: &AabbTree,
    mat_a: &Mat4,
    b: &AabbTree,
    mat_b: &Mat4,
    stack_capacity: usize,
) -> HashSet<(LeafId, LeafId)> {
    let offset_a = mat_a.translation_part();
    let offset_b = mat_b.translation_part();

    let mut overlapping = HashSet::new();
    let mut stack: Vec<(&AabbNode, &AabbNode)> = Vec::with_capacity(stack_capacity);
    let mut current = (&a.root, &b.root);

    loop {
        let (node_a, node_b) = current;
        let world_a = node_a.bounds.translated(offset_a);
        let world_b = node_b.bounds.translated(offset_b);

        if world_a.intersects(&world_b) {
            match (node_a.children(), node_b.children()) {
                (None, None) => {
                    if let (Some(id_a), Some(id_b)) = (node_a.leaf_id(), node_b.leaf_id()) {
                        overlapping.insert((id_a, id_b));
                    }
                }
                (Some((left, right)), None) => {
                    push_pending(&mut stack, (right, node_b), stack_capacity);
                    current = (left, node_b);
                    continue;
                }
                (None, Some((left, right))) => {
                    push_pending(&mut stack, (node_a, right), stack_capacity);
                    current = (node_a, left);
                    continue;
                }
                (Some((a_left, a_right)), Some((b_left, b_right))) => {
                    // Descend-larger rule: subdivide the bigger volume first
                    if world_a.surface_area() >= world_b.surface_area() {
                        push_pending(&mut stack, (a_right, node_b), stack_capacity);
                        current = (a_left, node_b);
                    } else {
                        push_pending(&mut stack, (node_a, b_right), stack_capacity);
                        current = (node_a, b_left);
                    }
                    continue;
                }
            }
        }

        match stack.pop() {
            Some(pair) => current = pair,
            None => break,
        }
    }

    overlapping
}

/// Leaves of `a` and `b` found in mutual overlap at least once, merged
/// into a single set
///
/// # Panics
///
/// Panics as [`overlapping_leaf_pairs`] does when the pending-pair stack
/// exceeds `stack_capacity`.
pub fn overlapping_leaves(
    a: &AabbTree,
    mat_a: &Mat4,
    b: &AabbTree,
    mat_b: &Mat4,
    stack_capacity: usize,
) -> HashSet<LeafId> {
    overlapping_leaf_pairs(a, mat_a, b, mat_b, stack_capacity)
        .into_iter()
        .flat_map(|(id_a, id_b)| [id_a, id_b])
        .collect()
}

fn push_pending<'a>(
    stack: &mut Vec<(&'a AabbNode, &'a AabbNode)>,
    pair: (&'a AabbNode, &'a AabbNode),
    capacity: usize,
) {
    assert!(
        stack.len() < capacity,
        "traversal stack overflow: capacity {capacity} is smaller than the tree depth requires"
    );
    stack.push(pair);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::primitives::Triangle;
    use crate::foundation::math::Vec3;

    const STACK: usize = 300;

    fn floor_tile(x: f32, z: f32) -> Triangle {
        Triangle::new(
            Vec3::new(x, 0.0, z),
            Vec3::new(x + 1.0, 0.0, z),
            Vec3::new(x, 0.0, z + 1.0),
        )
    }

    fn grid_tree(width: usize, depth: usize) -> AabbTree {
        let mut triangles: Vec<Triangle> = (0..width)
            .flat_map(|x| (0..depth).map(move |z| floor_tile(x as f32 * 2.0, z as f32 * 2.0)))
            .collect();
        AabbTree::build(&mut triangles, 1).unwrap()
    }

    #[test]
    fn disjoint_trees_report_nothing() {
        let a = grid_tree(3, 3);
        let b = grid_tree(3, 3);
        let apart = Mat4::new_translation(&Vec3::new(100.0, 0.0, 0.0));
        let result = overlapping_leaves(&a, &Mat4::identity(), &b, &apart, STACK);
        assert!(result.is_empty());
    }

    #[test]
    fn coincident_trees_report_every_leaf() {
        let a = grid_tree(2, 2);
        let b = grid_tree(2, 2);
        let identity = Mat4::identity();
        let result = overlapping_leaves(&a, &identity, &b, &identity, STACK);
        assert_eq!(result.len(), a.leaf_count() as usize);
    }

    #[test]
    fn overlap_is_symmetric() {
        let a = grid_tree(4, 2);
        let b = grid_tree(2, 4);
        let ta = Mat4::identity();
        let tb = Mat4::new_translation(&Vec3::new(3.0, 0.0, 1.0));

        let forward = overlapping_leaves(&a, &ta, &b, &tb, STACK);
        let backward = overlapping_leaves(&b, &tb, &a, &ta, STACK);
        assert_eq!(forward, backward);
    }

    #[test]
    fn transform_translation_is_honored() {
        let a = grid_tree(2, 2);
        let b = grid_tree(2, 2);
        let far = Mat4::new_translation(&Vec3::new(1000.0, 0.0, 0.0));
        assert!(overlapping_leaves(&a, &Mat4::identity(), &b, &far, STACK).is_empty());

        // Moving the far tree back on top produces contacts again
        let back = Mat4::new_translation(&Vec3::new(0.5, 0.0, 0.5));
        let result = overlapping_leaves(&a, &Mat4::identity(), &b, &back, STACK);
        assert!(!result.is_empty());
    }

    #[test]
    fn pairs_attribute_leaves_to_their_tree() {
        let a = grid_tree(1, 1);
        let b = grid_tree(2, 2);
        let identity = Mat4::identity();
        let pairs = overlapping_leaf_pairs(&a, &identity, &b, &identity, STACK);

        // The single tile of `a` reaches only the co-located tile of `b`,
        // and the pair ordering says which side each id belongs to
        assert_eq!(pairs.len(), 1);
        assert!(pairs.iter().all(|(id_a, _)| *id_a == LeafId(0)));
    }

    #[test]
    fn self_traversal_reports_all_leaves() {
        let tree = grid_tree(3, 1);
        let identity = Mat4::identity();
        let result = overlapping_leaves(&tree, &identity, &tree, &identity, STACK);
        assert_eq!(result.len(), tree.leaf_count() as usize);
    }

    #[test]
    #[should_panic(expected = "traversal stack overflow")]
    fn undersized_stack_is_fatal() {
        let a = grid_tree(8, 8);
        let b = grid_tree(8, 8);
        let identity = Mat4::identity();
        overlapping_leaves(&a, &identity, &b, &identity, 1);
    }
}
