//! Error types for mesh decoding.

use thiserror::Error;

/// Errors that can occur when decoding a mesh segment.
#[derive(Debug, Error)]
pub enum Error {
    /// Common library error (segment too short for its layout fields).
    #[error("{0}")]
    Common(#[from] n3d_common::Error),
}

/// Result type for mesh operations.
pub type Result<T> = std::result::Result<T, Error>;
