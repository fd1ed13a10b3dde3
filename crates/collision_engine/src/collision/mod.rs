//! Swept-sphere collision detection and response
//!
//! Narrow-phase detection of a single moving sphere against static
//! triangle scenery, with sliding response and a per-frame orchestrator.
//!
//! # Architecture
//!
//! - **Static world-space colliders**: hitbox faces are baked into world
//!   space once at load time and never move during detection
//! - **Earliest-contact semantics**: the cascade keeps the smallest time
//!   of impact across all candidate polygons and all stages
//! - **Per-call results**: every query returns a fresh value; no state
//!   is shared between frames except the immutable collider data
//!
//! # Module Organization
//!
//! - [`primitives`] - Value types and pure swept-sphere predicates
//! - [`narrow`] - The plane/face/edge/vertex cascade detector
//! - [`response`] - Sliding-plane velocity correction
//! - [`world`] - Registered-collider orchestration, one call per frame

pub mod narrow;
pub mod primitives;
pub mod response;
pub mod world;

// Re-export commonly used types
pub use narrow::{detect, CollisionResult, Polygon};
pub use primitives::{Plane, Sphere, Triangle};
pub use response::respond;
pub use world::{ColliderId, CollisionWorld};
