//! Collision subsystem configuration
//!
//! Tuning knobs for tree construction and traversal, with TOML file
//! loading for embedding applications that ship config files.

use serde::{Deserialize, Serialize};

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid configuration value
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Configuration for collision detection behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollisionConfig {
    /// Maximum triangles per AABB tree leaf before the build recursion stops
    pub leaf_threshold: usize,

    /// Capacity of the dual-tree traversal stack; must cover the deepest
    /// tree pair that will ever be traversed
    pub traversal_stack_capacity: usize,

    /// Maximum number of detect/slide rounds per movement request
    pub max_slide_iterations: usize,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            leaf_threshold: 1,
            traversal_stack_capacity: 300,
            max_slide_iterations: 3,
        }
    }
}

impl CollisionConfig {
    /// Load configuration from a TOML file
    pub fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        let config: Self =
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate that the configured values are usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.leaf_threshold == 0 {
            return Err(ConfigError::Invalid(
                "leaf_threshold must be at least 1".to_string(),
            ));
        }
        if self.traversal_stack_capacity == 0 {
            return Err(ConfigError::Invalid(
                "traversal_stack_capacity must be at least 1".to_string(),
            ));
        }
        if self.max_slide_iterations == 0 {
            return Err(ConfigError::Invalid(
                "max_slide_iterations must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
