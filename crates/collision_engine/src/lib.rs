//! # Collision Engine
//!
//! Swept-sphere collision detection against static triangle scenery,
//! with an AABB bounding volume hierarchy for broad-phase pruning.
//!
//! ## Features
//!
//! - **Broad Phase**: binary AABB tree per collider, built once at load
//!   time, with a stack-based dual-tree traversal for overlap reports
//! - **Narrow Phase**: plane/face/edge/vertex swept-sphere cascade with
//!   earliest-time-of-impact semantics
//! - **Sliding Response**: blocked movement is projected onto the
//!   contact's tangent plane instead of stopping
//! - **Hitbox Loading**: reduced-OBJ collider descriptions (`v`/`vn`/`f`)
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use collision_engine::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut world = CollisionWorld::new(CollisionConfig::default());
//!     let faces = HitboxLoader::load("assets/level.hitbox")?;
//!     world.register(faces)?;
//!
//!     // Per frame: ask for a corrected velocity
//!     let player = Sphere::new(Vec3::new(0.0, 1.0, 0.0), 1.0);
//!     let result = world.resolve_movement(&player, Vec3::new(0.0, -0.2, 0.1));
//!     let _new_position = player.center + result.corrected_velocity;
//!     Ok(())
//! }
//! ```

// Core engine modules
pub mod core;

pub mod assets;
pub mod collision;
pub mod foundation;
pub mod spatial;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        assets::{HitboxError, HitboxLoader},
        collision::{
            detect, respond, ColliderId, CollisionResult, CollisionWorld, Plane, Polygon, Sphere,
            Triangle,
        },
        core::{CollisionConfig, ConfigError},
        foundation::math::{Mat4, Vec3},
        spatial::{
            overlapping_leaf_pairs, overlapping_leaves, Aabb, AabbTree, LeafId, SpatialError,
            VolumeId,
        },
    };
}
