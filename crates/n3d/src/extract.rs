//! Extraction pipeline: walk a container, convert what can be converted and
//! hand everything to a [`SegmentSink`].

use std::io;

use n3d_archive::{N3dArchive, Segment, SegmentKind};
use n3d_dds::decode_texture;
use n3d_mesh::decode_mesh;
use tracing::{debug, info, warn};

use crate::material::decode_material;
use crate::report::{ExtractionReport, Outcome, SegmentReport};
use crate::{BoxError, Error, Result};

/// How texture segments are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Standalone DDS files.
    #[default]
    Dds,
    /// Raster images produced by a [`RasterEncoder`].
    Raster,
}

/// Turns a synthesized DDS file into a raster image.
pub trait RasterEncoder {
    /// File extension of the encoded image, without the dot.
    fn extension(&self) -> &'static str;

    /// Encode a DDS file as produced by [`decode_texture`].
    fn encode(&self, dds: &[u8]) -> std::result::Result<Vec<u8>, BoxError>;
}

/// Converted output for one segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    /// File extension, without the dot.
    pub extension: &'static str,
    /// Encoded file contents.
    pub bytes: Vec<u8>,
    /// Problems found in the source that did not prevent conversion.
    pub warnings: Vec<String>,
}

impl Conversion {
    fn new(extension: &'static str, bytes: Vec<u8>) -> Self {
        Self {
            extension,
            bytes,
            warnings: Vec::new(),
        }
    }
}

/// Destination for extracted segments.
pub trait SegmentSink {
    /// Store the raw bytes of a segment.
    fn write_raw(&mut self, segment: &Segment<'_>) -> io::Result<()>;

    /// Store the converted form of a segment.
    fn write_converted(&mut self, segment: &Segment<'_>, conversion: &Conversion)
        -> io::Result<()>;

    /// Called once per segment after it has been handled, failed or not.
    fn finish_segment(&mut self, _report: &SegmentReport) {}
}

/// Extraction settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Texture output format.
    pub format: OutputFormat,
    /// Hand every readable segment's raw bytes to the sink.
    pub archive_raw: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            format: OutputFormat::Dds,
            archive_raw: true,
        }
    }
}

/// Runs the extraction pipeline over a container.
pub struct Extractor {
    options: ExtractOptions,
    raster: Option<Box<dyn RasterEncoder>>,
}

impl Extractor {
    pub fn new(options: ExtractOptions) -> Self {
        Self {
            options,
            raster: None,
        }
    }

    /// Set the encoder used for [`OutputFormat::Raster`].
    pub fn with_raster_encoder(mut self, encoder: Box<dyn RasterEncoder>) -> Self {
        self.raster = Some(encoder);
        self
    }

    /// Extract every segment of `archive` into `sink`, in table order.
    ///
    /// Problems confined to one segment are logged and recorded in the
    /// report. Broken indexes, unterminated names and sink failures abort
    /// the run.
    pub fn run<S: SegmentSink + ?Sized>(
        &self,
        archive: &N3dArchive,
        sink: &mut S,
    ) -> Result<ExtractionReport> {
        self.check_options()?;

        let mut report = ExtractionReport::new(archive.name());

        for (index, segment) in archive.segments().enumerate() {
            let entry = match segment {
                Ok(segment) => self.extract_segment(&segment, sink)?,
                Err(err) if !err.is_fatal() => {
                    warn!(index, "skipping segment: {err}");
                    let Some(entry) = archive.entries().get(index) else {
                        return Err(err.into());
                    };
                    SegmentReport::for_entry(index, entry, err.to_string())
                }
                Err(err) => return Err(err.into()),
            };

            sink.finish_segment(&entry);
            report.segments.push(entry);
        }

        info!(
            container = archive.name(),
            segments = report.segments.len(),
            converted = report.converted(),
            warnings = report.warnings(),
            failed = report.failed(),
            "extraction finished"
        );

        Ok(report)
    }

    fn extract_segment<S: SegmentSink + ?Sized>(
        &self,
        segment: &Segment<'_>,
        sink: &mut S,
    ) -> Result<SegmentReport> {
        let index = segment.index();
        let kind = segment.kind();
        debug!(index, kind = %kind, name = segment.name(), "extracting segment");

        if self.options.archive_raw {
            sink.write_raw(segment)?;
        }

        let outcome = match self.convert(segment) {
            Ok(Some(conversion)) => {
                sink.write_converted(segment, &conversion)?;
                for warning in &conversion.warnings {
                    warn!(index, kind = %kind, name = segment.name(), "{warning}");
                }
                if conversion.warnings.is_empty() {
                    Outcome::Converted {
                        extension: conversion.extension,
                    }
                } else {
                    Outcome::Warning {
                        extension: conversion.extension,
                        warnings: conversion.warnings,
                    }
                }
            }
            Ok(None) => {
                debug!(index, kind = %kind, "no converter for segment");
                Outcome::Unconverted
            }
            Err(err @ Error::MissingRasterEncoder) => return Err(err),
            Err(err) => {
                warn!(index, kind = %kind, name = segment.name(), "conversion failed: {err}");
                Outcome::Failed {
                    error: err.to_string(),
                }
            }
        };

        Ok(SegmentReport::for_segment(segment, outcome))
    }

    /// Convert a single segment according to its kind.
    ///
    /// Returns `None` for kinds that have no converter.
    pub fn convert(&self, segment: &Segment<'_>) -> Result<Option<Conversion>> {
        match segment.kind() {
            SegmentKind::Texture => self.convert_texture(segment.data()).map(Some),
            SegmentKind::Mesh => convert_mesh(segment.data()).map(Some),
            SegmentKind::Material => Ok(decode_material(segment.data())),
            _ => Ok(None),
        }
    }

    fn convert_texture(&self, data: &[u8]) -> Result<Conversion> {
        let (_, dds) = decode_texture(data)?;

        match self.options.format {
            OutputFormat::Dds => Ok(Conversion::new("dds", dds)),
            OutputFormat::Raster => {
                let encoder = self.raster.as_ref().ok_or(Error::MissingRasterEncoder)?;
                let bytes = encoder.encode(&dds).map_err(Error::Raster)?;
                Ok(Conversion::new(encoder.extension(), bytes))
            }
        }
    }

    fn check_options(&self) -> Result<()> {
        if self.options.format == OutputFormat::Raster && self.raster.is_none() {
            return Err(Error::MissingRasterEncoder);
        }
        Ok(())
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(ExtractOptions::default())
    }
}

fn convert_mesh(data: &[u8]) -> Result<Conversion> {
    let mesh = decode_mesh(data)?;

    let mut conversion = Conversion::new("obj", mesh.to_obj().into_bytes());
    if mesh.corrupted {
        conversion
            .warnings
            .push("mesh data is corrupted (NaN values)".to_string());
    }
    if mesh.missing_faces != 0 {
        conversion.warnings.push(format!(
            "face table runs past the end of the segment ({} triangles dropped)",
            mesh.missing_faces
        ));
    }
    if mesh.face_remainder != 0 {
        conversion.warnings.push(format!(
            "face index count is not a multiple of 3 ({} left over)",
            mesh.face_remainder
        ));
    }

    Ok(conversion)
}
