//! Error types for the extraction pipeline.

use thiserror::Error;

/// Boxed error returned by injected collaborators such as raster encoders.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur while extracting a container.
#[derive(Debug, Error)]
pub enum Error {
    /// Container error.
    #[error("{0}")]
    Archive(#[from] n3d_archive::Error),

    /// Texture conversion error.
    #[error("texture: {0}")]
    Texture(#[from] n3d_dds::Error),

    /// Mesh conversion error.
    #[error("mesh: {0}")]
    Mesh(#[from] n3d_mesh::Error),

    /// The raster encoder rejected a texture.
    #[error("raster encoding failed: {0}")]
    Raster(#[source] BoxError),

    /// Raster output was requested without a raster encoder.
    #[error("raster output requested but no raster encoder was provided")]
    MissingRasterEncoder,

    /// The output sink failed.
    #[error("failed to write output: {0}")]
    Sink(#[from] std::io::Error),
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;
