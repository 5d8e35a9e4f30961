//! DDS texture synthesis for N3D texture segments.
//!
//! Texture segments hold uncompressed 16-bit RGB565 pixels behind a
//! non-standard preamble. This crate replaces that preamble with a regular
//! 128-byte DDS header so the result can be opened by any DDS reader.
//!
//! # Example
//!
//! ```no_run
//! use n3d_dds::decode_texture;
//!
//! let segment = std::fs::read("12 - tex_title.sgmt")?;
//! let (info, dds) = decode_texture(&segment)?;
//! println!("{}x{}", info.width, info.height);
//! std::fs::write("12 - tex_title.dds", &dds)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;
mod header;
mod texture;

pub use error::{Error, Result};
pub use header::{DdsHeader, DdsPixelFormat, FourCC};
pub use texture::{decode_texture, rgb565_to_rgb8, TextureInfo, PIXEL_DATA_OFFSET};

/// DDS file magic bytes ("DDS ").
pub const DDS_MAGIC: &[u8; 4] = b"DDS ";

/// Length of the magic plus header.
pub const DDS_HEADER_LEN: usize = 128;
