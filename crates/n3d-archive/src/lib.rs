//! N3D container reader.
//!
//! An N3D container is a pair of files sharing a stem:
//!
//! - `<stem>.n3dhdr` - A fixed-layout index. The segment count lives at
//!   offset 256, followed by one 12-byte entry per segment
//!   (unknown, offset, length; all little-endian `u32`).
//! - `<stem>.n3ddta` - Raw segment bytes. Each segment starts with its own
//!   null-terminated name, which is part of the segment payload.
//!
//! Segments carry no type tag, so [`classify`] sniffs their kind from fixed
//! byte patterns.
//!
//! # Example
//!
//! ```no_run
//! use n3d_archive::N3dArchive;
//!
//! let archive = N3dArchive::open("stage1.n3dhdr")?;
//!
//! for segment in archive.segments() {
//!     let segment = segment?;
//!     println!("{} [{}]: {}", segment.index(), segment.kind(), segment.name());
//! }
//! # Ok::<(), n3d_archive::Error>(())
//! ```

mod archive;
mod entry;
mod error;
pub mod kind;

pub use archive::{container_stem, N3dArchive, Segment, Segments};
pub use entry::{SegmentDescriptor, SegmentEntry};
pub use error::{Error, Result};
pub use kind::{classify, SegmentKind};

/// Extension of the index file.
pub const HEADER_EXTENSION: &str = "n3dhdr";

/// Extension of the data file.
pub const DATA_EXTENSION: &str = "n3ddta";

/// Offset of the segment count in the index file.
pub const SEGMENT_COUNT_OFFSET: usize = 256;
