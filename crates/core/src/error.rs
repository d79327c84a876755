//! Configuration error model.
//!
//! The traversals themselves never fail: equality, hashing and formatting always
//! produce a result for well-formed input. Errors only arise while building or
//! loading a [`LayoutConfig`](crate::format::LayoutConfig).

use thiserror::Error;

/// Result type used by configuration constructors and loaders.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Layout configuration error.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A configuration value failed validation (e.g. a blank explicit name).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A naming strategy name did not match any known strategy.
    #[error("unknown naming strategy: {0}")]
    UnknownStrategy(String),

    /// The serialized configuration could not be parsed.
    #[error("malformed layout configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ConfigError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn unknown_strategy(name: impl Into<String>) -> Self {
        Self::UnknownStrategy(name.into())
    }
}
