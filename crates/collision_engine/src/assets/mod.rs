//! Collider asset loading

pub mod hitbox_loader;

pub use hitbox_loader::{HitboxError, HitboxLoader};
