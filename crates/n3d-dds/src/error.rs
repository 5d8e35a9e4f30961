//! Error types for texture decoding.

use thiserror::Error;

/// Errors that can occur when decoding a texture segment.
#[derive(Debug, Error)]
pub enum Error {
    /// Common library error.
    #[error("{0}")]
    Common(#[from] n3d_common::Error),

    /// The segment is too short for the pixel payload its dimensions imply.
    #[error("insufficient texture payload: need {needed} bytes, segment has {available}")]
    InsufficientPayload { needed: u64, available: usize },
}

/// Result type for texture operations.
pub type Result<T> = std::result::Result<T, Error>;
