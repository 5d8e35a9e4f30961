//! Common utilities for n3d.
//!
//! This crate provides foundational types used across all n3d crates:
//!
//! - [`BinaryReader`] - Zero-copy binary reading from byte slices
//! - [`read_u16_at`], [`read_u32_at`], [`read_f32_at`] - Fixed-offset reads that never panic
//! - [`to_display_char`] - Printable-ASCII mapping used for segment names

mod error;
mod reader;

pub use error::{Error, Result};
pub use reader::{read_f32_at, read_u16_at, read_u32_at, to_display_char, BinaryReader};

/// Re-export zerocopy traits for convenience
pub use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

/// Re-export memchr for SIMD-accelerated byte searching
pub use memchr;
