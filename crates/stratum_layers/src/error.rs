//! # Layer Error Types
//!
//! All errors that can occur while building or querying a layer pipeline.
//!
//! Unknown biome codes met during a transform are NOT errors: they are
//! logged and passed through unchanged.

use thiserror::Error;

/// Errors that can occur in the layer pipeline.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayerError {
    /// A grid request with a non-positive width or height.
    #[error("invalid area: width {width} and height {height} must both be positive")]
    InvalidArea {
        /// Requested width.
        width: i32,
        /// Requested height.
        height: i32,
    },

    /// A parent layer returned a grid that does not cover the padded request.
    #[error("parent grid size mismatch: expected {expected} cells, got {actual}")]
    ParentSizeMismatch {
        /// Cells the padded request covers.
        expected: usize,
        /// Cells actually returned.
        actual: usize,
    },

    /// Grid data whose length does not match its area.
    #[error("grid data length {actual} does not match area of {expected} cells")]
    GridSizeMismatch {
        /// Cells the area covers.
        expected: usize,
        /// Length of the supplied data.
        actual: usize,
    },

    /// A symbolic biome name that the registry does not know.
    #[error("unknown biome name: {0}")]
    UnknownBiomeName(String),

    /// Two registry entries share the same id.
    #[error("duplicate biome id: {0}")]
    DuplicateBiomeId(u16),

    /// Two registry entries share the same name.
    #[error("duplicate biome name: {0}")]
    DuplicateBiomeName(String),

    /// A pipeline without any layer.
    #[error("pipeline has no layers")]
    EmptyPipeline,

    /// Invalid configuration file.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for layer operations.
pub type LayerResult<T> = Result<T, LayerError>;
