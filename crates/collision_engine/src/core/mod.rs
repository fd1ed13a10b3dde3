//! Core subsystem configuration

pub mod config;

pub use config::{CollisionConfig, ConfigError};
