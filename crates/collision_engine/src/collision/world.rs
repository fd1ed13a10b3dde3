//! Per-frame collision orchestration
//!
//! Owns the registered collider set and combines broad-phase overlap
//! reporting with narrow-phase movement resolution. Invoked once per
//! simulation frame from the main loop; every query runs to completion
//! and returns fresh values.

use std::collections::HashSet;

use slotmap::SlotMap;

use crate::collision::narrow::{self, CollisionResult, Polygon};
use crate::collision::primitives::{Sphere, Triangle, EPSILON};
use crate::core::CollisionConfig;
use crate::foundation::math::{Mat4, Vec3};
use crate::spatial::{overlapping_leaf_pairs, AabbTree, LeafId, SpatialError};

slotmap::new_key_type! {
    /// Handle to a registered collider
    pub struct ColliderId;
}

/// A registered static collider: its faces, its bounding hierarchy, and
/// its current world transform
#[derive(Debug, Clone)]
struct Collider {
    polygons: Vec<Polygon>,
    tree: AabbTree,
    transform: Mat4,
}

/// Collision orchestrator over a registered collider list
///
/// Collider triangle lists and their AABB trees are built at
/// registration and treated as immutable during detection; replacing a
/// collider requires in-flight queries to have completed first.
pub struct CollisionWorld {
    colliders: SlotMap<ColliderId, Collider>,
    config: CollisionConfig,
}

impl CollisionWorld {
    /// Create a world with the given configuration
    pub fn new(config: CollisionConfig) -> Self {
        Self {
            colliders: SlotMap::with_key(),
            config,
        }
    }

    /// Register a collider from its world-space faces
    ///
    /// Builds the bounding hierarchy eagerly; the polygon list must be
    /// non-empty.
    pub fn register(&mut self, polygons: Vec<Polygon>) -> Result<ColliderId, SpatialError> {
        let mut triangles: Vec<Triangle> = polygons.iter().map(|p| p.triangle).collect();
        let tree = AabbTree::build(&mut triangles, self.config.leaf_threshold)?;
        log::info!(
            "registered collider: {} faces, {} leaves, depth {}",
            polygons.len(),
            tree.leaf_count(),
            tree.depth()
        );
        Ok(self.colliders.insert(Collider {
            polygons,
            tree,
            transform: Mat4::identity(),
        }))
    }

    /// Register a collider from bare triangles, deriving face normals
    /// from winding
    pub fn register_triangles(
        &mut self,
        triangles: Vec<Triangle>,
    ) -> Result<ColliderId, SpatialError> {
        self.register(triangles.into_iter().map(Polygon::new).collect())
    }

    /// Remove a collider; returns whether it existed
    pub fn remove(&mut self, id: ColliderId) -> bool {
        self.colliders.remove(id).is_some()
    }

    /// Number of registered colliders
    pub fn collider_count(&self) -> usize {
        self.colliders.len()
    }

    /// Update a collider's world transform
    ///
    /// Affects broad-phase bounds only; the narrow phase always consults
    /// the faces as they were registered.
    pub fn set_transform(&mut self, id: ColliderId, transform: Mat4) -> bool {
        match self.colliders.get_mut(id) {
            Some(collider) => {
                collider.transform = transform;
                true
            }
            None => false,
        }
    }

    /// The collider's hierarchy with bounds re-derived for its current
    /// transform, for debug rendering
    pub fn world_tree(&self, id: ColliderId) -> Option<AabbTree> {
        self.colliders
            .get(id)
            .map(|collider| collider.tree.translated_by(&collider.transform))
    }

    /// Leaf volumes of two colliders currently in mutual overlap, tagged
    /// with the collider that owns them
    ///
    /// Leaf identifiers are local to each collider's tree, so every
    /// entry carries its owning handle. The result is a fresh set per
    /// call. Returns `None` when either handle is stale.
    pub fn overlapping_volumes(
        &self,
        a: ColliderId,
        b: ColliderId,
    ) -> Option<HashSet<(ColliderId, LeafId)>> {
        let collider_a = self.colliders.get(a)?;
        let collider_b = self.colliders.get(b)?;
        Some(
            overlapping_leaf_pairs(
                &collider_a.tree,
                &collider_a.transform,
                &collider_b.tree,
                &collider_b.transform,
                self.config.traversal_stack_capacity,
            )
            .into_iter()
            .flat_map(|(leaf_a, leaf_b)| [(a, leaf_a), (b, leaf_b)])
            .collect(),
        )
    }

    /// Resolve a movement request against every registered collider
    ///
    /// Runs narrow-phase detection and, on contact, re-invokes it with
    /// the slide velocity for multi-surface sliding, up to the configured
    /// iteration limit. The reported contact and time of impact are those
    /// of the first obstruction; the corrected velocity is the final
    /// slide direction.
    pub fn resolve_movement(&self, sphere: &Sphere, velocity: Vec3) -> CollisionResult {
        let first = self.detect_all(sphere, velocity);
        let Some(first_contact) = first.contact_point else {
            return first;
        };

        let mut corrected = first.corrected_velocity;
        for _ in 1..self.config.max_slide_iterations {
            if corrected.magnitude() < EPSILON {
                break;
            }
            let next = self.detect_all(sphere, corrected);
            if next.contact_point.is_none() {
                break;
            }
            corrected = next.corrected_velocity;
        }

        CollisionResult {
            corrected_velocity: corrected,
            contact_point: Some(first_contact),
            time_of_impact: first.time_of_impact,
        }
    }

    /// One detection pass over all colliders, keeping the earliest contact
    fn detect_all(&self, sphere: &Sphere, velocity: Vec3) -> CollisionResult {
        let mut best: Option<CollisionResult> = None;
        for collider in self.colliders.values() {
            let result = narrow::detect(sphere, velocity, &collider.polygons);
            if result.contact_point.is_some()
                && best
                    .as_ref()
                    .map_or(true, |b| result.time_of_impact < b.time_of_impact)
            {
                best = Some(result);
            }
        }
        best.unwrap_or_else(|| CollisionResult::free(velocity))
    }
}
