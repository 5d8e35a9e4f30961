//! Segment table entries.

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

/// One raw entry of the index file's segment table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct SegmentEntry {
    /// Unknown field, ignored.
    pub unknown: u32,
    /// Byte offset of the segment in the data file.
    pub offset: u32,
    /// Segment length in bytes.
    pub length: u32,
}

impl SegmentEntry {
    /// Size of one table entry in bytes.
    pub const SIZE: usize = 12;
}

/// A located segment: where it lives in the data file and what it is called.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SegmentDescriptor {
    index: usize,
    offset: u32,
    length: u32,
    name: String,
}

impl SegmentDescriptor {
    pub(crate) fn new(index: usize, entry: SegmentEntry, name: String) -> Self {
        Self {
            index,
            offset: entry.offset,
            length: entry.length,
            name,
        }
    }

    /// Position of the segment in the table.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Byte offset in the data file.
    #[inline]
    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// Length in bytes.
    #[inline]
    pub fn length(&self) -> u32 {
        self.length
    }

    /// Segment name, printable ASCII only.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_layout() {
        assert_eq!(std::mem::size_of::<SegmentEntry>(), SegmentEntry::SIZE);

        let raw = [
            0xAA, 0xBB, 0xCC, 0xDD, // unknown
            0x10, 0x00, 0x00, 0x00, // offset
            0x00, 0x01, 0x00, 0x00, // length
        ];
        let entry = SegmentEntry::read_from_bytes(&raw).unwrap();

        assert_eq!(entry.unknown, 0xDDCCBBAA);
        assert_eq!(entry.offset, 0x10);
        assert_eq!(entry.length, 0x100);
        assert_eq!(entry.as_bytes(), &raw);
    }
}
