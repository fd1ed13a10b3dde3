//! Foundation utilities shared by every subsystem
//!
//! Provides math type aliases and logging setup. Nothing in here knows
//! about collision geometry; higher layers build on these primitives.

pub mod logging;
pub mod math;
