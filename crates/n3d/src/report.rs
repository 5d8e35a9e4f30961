//! Per-segment extraction results.

use n3d_archive::{Segment, SegmentEntry, SegmentKind};

/// What happened to one segment.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "manifest",
    derive(serde::Serialize),
    serde(tag = "status", rename_all = "snake_case")
)]
pub enum Outcome {
    /// Converted output was written.
    Converted { extension: &'static str },
    /// Converted output was written, but the source looked damaged.
    Warning {
        extension: &'static str,
        warnings: Vec<String>,
    },
    /// No converter exists for this kind; only the raw bytes were kept.
    Unconverted,
    /// The segment could not be read or converted.
    Failed { error: String },
}

/// Result for a single segment, in table order.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "manifest", derive(serde::Serialize))]
pub struct SegmentReport {
    /// Position in the segment table.
    pub index: usize,
    /// Segment name, empty if the segment could not be located.
    pub name: String,
    /// Offset in the data file.
    pub offset: u32,
    /// Length in bytes.
    pub length: u32,
    /// Sniffed kind, if the segment could be read.
    pub kind: Option<SegmentKind>,
    /// What happened to it.
    #[cfg_attr(feature = "manifest", serde(flatten))]
    pub outcome: Outcome,
}

impl SegmentReport {
    pub(crate) fn for_segment(segment: &Segment<'_>, outcome: Outcome) -> Self {
        let descriptor = segment.descriptor();
        Self {
            index: descriptor.index(),
            name: descriptor.name().to_string(),
            offset: descriptor.offset(),
            length: descriptor.length(),
            kind: Some(segment.kind()),
            outcome,
        }
    }

    pub(crate) fn for_entry(index: usize, entry: &SegmentEntry, error: String) -> Self {
        Self {
            index,
            name: String::new(),
            offset: entry.offset,
            length: entry.length,
            kind: None,
            outcome: Outcome::Failed { error },
        }
    }
}

/// Results of a whole extraction run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "manifest", derive(serde::Serialize))]
pub struct ExtractionReport {
    /// Container name.
    pub container: String,
    /// One entry per segment, in table order.
    pub segments: Vec<SegmentReport>,
}

impl ExtractionReport {
    pub(crate) fn new(container: &str) -> Self {
        Self {
            container: container.to_string(),
            segments: Vec::new(),
        }
    }

    /// Number of segments with converted output, warnings included.
    pub fn converted(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Converted { .. } | Outcome::Warning { .. }))
    }

    /// Number of segments converted with warnings.
    pub fn warnings(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Warning { .. }))
    }

    /// Number of segments that failed.
    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Failed { .. }))
    }

    fn count(&self, predicate: impl Fn(&Outcome) -> bool) -> usize {
        self.segments.iter().filter(|s| predicate(&s.outcome)).count()
    }

    /// Serialize the report as pretty-printed JSON.
    #[cfg(feature = "manifest")]
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> ExtractionReport {
        let entry = |offset| SegmentReport {
            index: 0,
            name: "seg".to_string(),
            offset,
            length: 4,
            kind: Some(SegmentKind::Mesh),
            outcome: Outcome::Unconverted,
        };

        let mut report = ExtractionReport::new("stage1");
        report.segments.push(SegmentReport {
            outcome: Outcome::Converted { extension: "obj" },
            ..entry(0)
        });
        report.segments.push(SegmentReport {
            outcome: Outcome::Warning {
                extension: "obj",
                warnings: vec!["NaN".to_string()],
            },
            ..entry(4)
        });
        report.segments.push(entry(8));
        report.segments.push(SegmentReport::for_entry(
            3,
            &SegmentEntry {
                unknown: 0,
                offset: 12,
                length: 99,
            },
            "missing".to_string(),
        ));
        report
    }

    #[test]
    fn test_counts() {
        let report = report();

        assert_eq!(report.converted(), 2);
        assert_eq!(report.warnings(), 1);
        assert_eq!(report.failed(), 1);
    }

    #[cfg(feature = "manifest")]
    #[test]
    fn test_json_shape() {
        let json: serde_json::Value = serde_json::from_str(&report().to_json().unwrap()).unwrap();

        assert_eq!(json["container"], "stage1");
        assert_eq!(json["segments"][0]["kind"], "MESH");
        assert_eq!(json["segments"][0]["status"], "converted");
        assert_eq!(json["segments"][0]["extension"], "obj");
        assert_eq!(json["segments"][1]["warnings"][0], "NaN");
        assert_eq!(json["segments"][2]["status"], "unconverted");
        assert_eq!(json["segments"][3]["status"], "failed");
        assert_eq!(json["segments"][3]["kind"], serde_json::Value::Null);
        assert_eq!(json["segments"][3]["length"], 99);
    }
}
