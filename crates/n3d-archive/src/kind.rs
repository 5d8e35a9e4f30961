//! Segment type sniffing.
//!
//! Segments have no type field. Their kind is inferred by comparing fixed
//! byte ranges against known patterns, in priority order. The patterns are
//! kept in a table ([`SIGNATURES`]) and evaluated by one matcher so the
//! heuristics can be tested in isolation.

use std::fmt;

/// Kind of a segment, as inferred from its bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentKind {
    /// RGB565 texture.
    Texture,
    /// Triangle mesh.
    Mesh,
    /// Skinning data.
    Skin,
    /// Pose data.
    Pose,
    /// Level data.
    LevelData,
    /// Scene node.
    Node,
    /// Material definition.
    Material,
    /// Container root.
    Root,
    /// No signature matched.
    Unknown,
}

impl SegmentKind {
    /// Four-character tag used in logs and manifests.
    pub const fn tag(self) -> &'static str {
        match self {
            SegmentKind::Texture => "TXTR",
            SegmentKind::Mesh => "MESH",
            SegmentKind::Skin => "SKIN",
            SegmentKind::Pose => "POSE",
            SegmentKind::LevelData => "LVLD",
            SegmentKind::Node => "NODE",
            SegmentKind::Material => "MATR",
            SegmentKind::Root => "ROOT",
            SegmentKind::Unknown => "UNKN",
        }
    }
}

impl fmt::Display for SegmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for SegmentKind {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.tag())
    }
}

/// A byte pattern expected at a fixed offset.
#[derive(Debug, Clone, Copy)]
pub struct Signature {
    /// Offset of the pattern within the segment.
    pub offset: usize,
    /// Expected bytes.
    pub expected: &'static [u8],
    /// Kind reported on a match.
    pub kind: SegmentKind,
}

impl Signature {
    /// Check the pattern. A range past the end of `data` never matches.
    #[inline]
    pub fn matches(&self, data: &[u8]) -> bool {
        self.offset
            .checked_add(self.expected.len())
            .and_then(|end| data.get(self.offset..end))
            == Some(self.expected)
    }
}

/// Known signatures, highest priority first.
pub const SIGNATURES: &[Signature] = &[
    Signature {
        offset: 0x30,
        expected: &[0x00, 0x00, 0x00, 0x00, 0x38, 0x00, 0x00, 0x00],
        kind: SegmentKind::Texture,
    },
    Signature {
        offset: 0x12C,
        expected: &[0x50, 0x01, 0x00, 0x00],
        kind: SegmentKind::Mesh,
    },
    Signature {
        offset: 0x300,
        expected: &[0x00, 0x00, 0x80, 0x3F, 0x00, 0x00, 0x00, 0x00],
        kind: SegmentKind::Skin,
    },
    Signature {
        offset: 0x100,
        expected: &[0xFF, 0xFF, 0x7F, 0x7F, 0xFF, 0xFF, 0x7F, 0xFF],
        kind: SegmentKind::Pose,
    },
    Signature {
        offset: 0x154,
        expected: &[0x80, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
        kind: SegmentKind::LevelData,
    },
    Signature {
        offset: 0x148,
        expected: &[0x00, 0x00, 0x80, 0x3F],
        kind: SegmentKind::Node,
    },
    Signature {
        offset: 0x110,
        expected: &[
            0x00, 0x00, 0x80, 0x3F, 0x00, 0x00, 0x80, 0x3F, //
            0x00, 0x00, 0x80, 0x3F, 0x00, 0x00, 0x80, 0x3F,
        ],
        kind: SegmentKind::Material,
    },
    Signature {
        offset: 0x8,
        expected: b"cs_ROOT_",
        kind: SegmentKind::Root,
    },
];

/// Infer a segment's kind from its bytes.
///
/// Total over all inputs: buffers too short for a pattern simply fail that
/// pattern, and [`SegmentKind::Unknown`] is returned when nothing matches.
pub fn classify(data: &[u8]) -> SegmentKind {
    SIGNATURES
        .iter()
        .find(|signature| signature.matches(data))
        .map_or(SegmentKind::Unknown, |signature| signature.kind)
}
