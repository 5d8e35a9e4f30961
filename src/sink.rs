//! Filesystem output for the extraction pipeline.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use indicatif::ProgressBar;
use n3d::archive::Segment;
use n3d::{Conversion, SegmentReport, SegmentSink};

/// Writes raw segments to `<root>/segments` and converted files to
/// `<root>/converted`, named `<index> - <name>.<ext>`.
pub struct DirectorySink {
    segments: PathBuf,
    converted: PathBuf,
    progress: Option<ProgressBar>,
}

impl DirectorySink {
    /// Create the output directories under `root`.
    pub fn create(root: &Path) -> io::Result<Self> {
        let segments = root.join("segments");
        let converted = root.join("converted");
        fs::create_dir_all(&segments)?;
        fs::create_dir_all(&converted)?;

        Ok(Self {
            segments,
            converted,
            progress: None,
        })
    }

    /// Advance `progress` once per finished segment.
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }
}

impl SegmentSink for DirectorySink {
    fn write_raw(&mut self, segment: &Segment<'_>) -> io::Result<()> {
        let path = self.segments.join(file_name(segment, "sgmt"));
        fs::write(path, segment.data())
    }

    fn write_converted(&mut self, segment: &Segment<'_>, conversion: &Conversion) -> io::Result<()> {
        let path = self.converted.join(file_name(segment, conversion.extension));
        fs::write(path, &conversion.bytes)
    }

    fn finish_segment(&mut self, _report: &SegmentReport) {
        if let Some(progress) = &self.progress {
            progress.inc(1);
        }
    }
}

/// Output file name for a segment. Path separators in the segment name are
/// replaced so every file stays inside its directory.
fn file_name(segment: &Segment<'_>, extension: &str) -> String {
    let name = sanitize(segment.name());
    format!("{} - {}.{}", segment.index(), name, extension)
}

fn sanitize(name: &str) -> String {
    let name = name.replace(['/', '\\'], "_");
    match name.as_str() {
        "." | ".." => name.replace('.', "_"),
        _ => name,
    }
}
