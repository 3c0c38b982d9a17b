//! Error types for the cowspots core.

use thiserror::Error;

use crate::sprite::SpriteId;

/// Errors produced by layout generation, motion steps and scene setup.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SpriteError {
    /// Generation or motion parameters were unusable (negative count, empty
    /// asset pool, degenerate region, inverted range, ...).
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A tick was requested with a negative or non-finite time step.
    #[error("invalid timestep: {0} (must be finite and non-negative)")]
    InvalidTimestep(f64),

    /// Two sprites in one set shared an id.
    #[error("duplicate sprite id: {0}")]
    DuplicateSpriteId(SpriteId),

    /// A sprite would have left a step with a NaN or infinite position or velocity.
    #[error("sprite {0} reached a non-finite position or velocity")]
    NonFiniteState(SpriteId),

    /// A scene preset name was not recognized.
    #[error("unknown scene: {0}")]
    UnknownScene(String),

    /// Filesystem or encoding failure in an outer collaborator.
    #[error("I/O error: {0}")]
    Io(String),
}

impl SpriteError {
    /// Shorthand for [`SpriteError::InvalidConfiguration`].
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        SpriteError::InvalidConfiguration(msg.into())
    }
}
