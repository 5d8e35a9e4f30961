//! Error types for the container reader.

use thiserror::Error;

/// Errors that can occur when reading an N3D container.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Common library error (truncated index, unterminated segment name).
    #[error("{0}")]
    Common(#[from] n3d_common::Error),

    /// The index declares a negative number of segments.
    #[error("invalid segment count: {0}")]
    InvalidSegmentCount(i32),

    /// A table entry points past the end of the data file.
    #[error(
        "segment {index} lies outside the data file: \
         {length} bytes at offset {offset:#x}, but only {available} bytes available"
    )]
    MissingDataSegment {
        index: usize,
        offset: u32,
        length: u32,
        available: usize,
    },

    /// Segment index out of range.
    #[error("segment {index} not found (container has {count} segments)")]
    SegmentNotFound { index: usize, count: usize },
}

impl Error {
    /// Whether the error invalidates the whole container rather than a
    /// single segment.
    ///
    /// The index is either trustworthy as a whole or broken as a whole, so
    /// anything other than a per-segment lookup problem aborts the walk.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            Error::MissingDataSegment { .. } | Error::SegmentNotFound { .. }
        )
    }
}

/// Result type for container operations.
pub type Result<T> = std::result::Result<T, Error>;
