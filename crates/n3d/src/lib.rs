//! n3d - N3D container extraction and conversion library.
//!
//! This crate provides a unified interface to the n3d library crates and the
//! extraction pipeline that ties them together.
//!
//! # Crates
//!
//! - [`n3d_common`] - Common utilities (binary reading)
//! - [`n3d_archive`] - Container index walking and segment type sniffing
//! - [`n3d_dds`] - Texture segment to DDS conversion
//! - [`n3d_mesh`] - Mesh segment decoding and OBJ output
//!
//! # Example
//!
//! ```no_run
//! use n3d::prelude::*;
//!
//! let archive = N3dArchive::open("stage1.n3dhdr")?;
//!
//! for segment in archive.segments() {
//!     let segment = segment?;
//!     if segment.kind() == SegmentKind::Mesh {
//!         let mesh = decode_mesh(segment.data())?;
//!         println!("{}: {} triangles", segment.name(), mesh.faces.len());
//!     }
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;
pub mod extract;
pub mod material;
pub mod report;

// Re-export all sub-crates
pub use n3d_archive as archive;
pub use n3d_common as common;
pub use n3d_dds as dds;
pub use n3d_mesh as mesh;

pub use error::{BoxError, Error, Result};
pub use extract::{
    Conversion, ExtractOptions, Extractor, OutputFormat, RasterEncoder, SegmentSink,
};
pub use report::{ExtractionReport, Outcome, SegmentReport};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::extract::{
        Conversion, ExtractOptions, Extractor, OutputFormat, RasterEncoder, SegmentSink,
    };
    pub use crate::material::decode_material;
    pub use crate::report::{ExtractionReport, Outcome, SegmentReport};
    pub use n3d_archive::{classify, N3dArchive, Segment, SegmentDescriptor, SegmentKind};
    pub use n3d_common::BinaryReader;
    pub use n3d_dds::{decode_texture, TextureInfo};
    pub use n3d_mesh::{decode_mesh, DecodedMesh, MeshLayout};
}

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
