//! Mesh segment decoding for N3D containers.
//!
//! A mesh segment stores three sub-tables, located through count/offset
//! fields at fixed positions:
//!
//! - face indices (`u16` triples),
//! - vertex positions (`f32` triples in padded records),
//! - texture coordinates (`f32` pairs, interleaved in the same records).
//!
//! The record padding comes in two layouts, told apart by a sentinel probe
//! (see [`StrideLayout`]). Decoded meshes are written as Wavefront OBJ.
//!
//! # Example
//!
//! ```no_run
//! use n3d_mesh::decode_mesh;
//!
//! let segment = std::fs::read("7 - mdl_quote.sgmt")?;
//! let mesh = decode_mesh(&segment)?;
//! if mesh.corrupted {
//!     eprintln!("mesh contains NaN values");
//! }
//! std::fs::write("7 - mdl_quote.obj", mesh.to_obj())?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod decode;
mod error;
mod layout;
mod obj;

pub use decode::{decode_mesh, DecodedMesh};
pub use error::{Error, Result};
pub use layout::{MeshLayout, StrideLayout};
pub use obj::Obj;
