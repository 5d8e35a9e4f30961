//! Mesh sub-table location.

use n3d_common::BinaryReader;

use crate::Result;

/// Offset of the first layout field (vertex count).
const LAYOUT_FIELDS_OFFSET: usize = 0x124;

/// Offset of the UV pair within a vertex record.
const UV_RECORD_OFFSET: usize = 28;

/// Record layout of the vertex table.
///
/// Both strides change together; which layout a segment uses is decided by a
/// single probe of four bytes at `vertex_offset + 52`. The probe is a layout
/// discriminant, not a data field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrideLayout {
    /// `FF FF FF FF` at the probe: 40-byte position and UV records.
    Wide,
    /// Anything else: 36-byte position and UV records.
    Narrow,
}

impl StrideLayout {
    /// Distance of the probe from the start of the vertex table.
    pub const PROBE_OFFSET: usize = 52;

    /// Bytes that select [`StrideLayout::Wide`].
    pub const SENTINEL: [u8; 4] = [0xFF; 4];

    /// Probe the vertex table. An out-of-range probe selects `Narrow`.
    pub fn probe(data: &[u8], vertex_offset: usize) -> Self {
        let probe = vertex_offset
            .checked_add(Self::PROBE_OFFSET)
            .and_then(|start| data.get(start..start.checked_add(4)?));

        if probe == Some(&Self::SENTINEL[..]) {
            StrideLayout::Wide
        } else {
            StrideLayout::Narrow
        }
    }

    /// Stride of a position record: 12 bytes of data plus padding.
    #[inline]
    pub const fn vertex_stride(self) -> usize {
        match self {
            StrideLayout::Wide => 12 + 28,
            StrideLayout::Narrow => 12 + 24,
        }
    }

    /// Stride of a UV record: 8 bytes of data plus padding.
    #[inline]
    pub const fn uv_stride(self) -> usize {
        match self {
            StrideLayout::Wide => 8 + 32,
            StrideLayout::Narrow => 8 + 28,
        }
    }
}

/// Where the sub-tables of a mesh segment live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshLayout {
    /// Offset of the face index table.
    pub face_offset: usize,
    /// Number of face index values (three per triangle).
    pub face_count: usize,
    /// Offset of the vertex table.
    pub vertex_offset: usize,
    /// Number of vertex records; UV records always match.
    pub vertex_count: usize,
    /// Record layout of the vertex table.
    pub strides: StrideLayout,
}

impl MeshLayout {
    /// Read the layout fields of a mesh segment.
    ///
    /// Fields, all little-endian `u32`: vertex count at 0x124, face count at
    /// 0x128, face offset at 0x130 and vertex offset at 0x134. The word at
    /// 0x12C is the mesh signature and carries no layout information.
    pub fn locate(data: &[u8]) -> Result<Self> {
        let mut reader = BinaryReader::new_at(data, LAYOUT_FIELDS_OFFSET);

        let vertex_count = reader.read_u32()? as usize;
        let face_count = reader.read_u32()? as usize;
        reader.advance(4);
        let face_offset = reader.read_u32()? as usize;
        let vertex_offset = reader.read_u32()? as usize;

        Ok(Self {
            face_offset,
            face_count,
            vertex_offset,
            vertex_count,
            strides: StrideLayout::probe(data, vertex_offset),
        })
    }

    /// Number of whole triangles in the face table.
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.face_count / 3
    }

    /// Face index values left over after the last whole triangle.
    #[inline]
    pub fn face_remainder(&self) -> usize {
        self.face_count % 3
    }

    /// Offset of the first UV pair.
    #[inline]
    pub fn uv_offset(&self) -> usize {
        self.vertex_offset.saturating_add(UV_RECORD_OFFSET)
    }

    /// Position record stride.
    #[inline]
    pub fn vertex_stride(&self) -> usize {
        self.strides.vertex_stride()
    }

    /// UV record stride.
    #[inline]
    pub fn uv_stride(&self) -> usize {
        self.strides.uv_stride()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment_with_layout(vertex_count: u32, face_count: u32, face_offset: u32, vertex_offset: u32) -> Vec<u8> {
        let mut data = vec![0u8; 0x200];
        data[0x124..0x128].copy_from_slice(&vertex_count.to_le_bytes());
        data[0x128..0x12C].copy_from_slice(&face_count.to_le_bytes());
        data[0x12C..0x130].copy_from_slice(&[0x50, 0x01, 0x00, 0x00]);
        data[0x130..0x134].copy_from_slice(&face_offset.to_le_bytes());
        data[0x134..0x138].copy_from_slice(&vertex_offset.to_le_bytes());
        data
    }

    #[test]
    fn test_locate_reads_fixed_offsets() {
        let data = segment_with_layout(5, 9, 0x140, 0x160);
        let layout = MeshLayout::locate(&data).unwrap();

        assert_eq!(layout.vertex_count, 5);
        assert_eq!(layout.face_count, 9);
        assert_eq!(layout.face_offset, 0x140);
        assert_eq!(layout.vertex_offset, 0x160);
        assert_eq!(layout.triangle_count(), 3);
        assert_eq!(layout.face_remainder(), 0);
        assert_eq!(layout.uv_offset(), 0x160 + 28);
    }

    #[test]
    fn test_sentinel_selects_wide_strides() {
        let mut data = segment_with_layout(1, 0, 0, 0x160);
        data[0x160 + 52..0x160 + 56].copy_from_slice(&[0xFF, 0xFF, 0xFF, 0xFF]);
        let layout = MeshLayout::locate(&data).unwrap();

        assert_eq!(layout.strides, StrideLayout::Wide);
        assert_eq!((layout.vertex_stride(), layout.uv_stride()), (40, 40));
    }

    #[test]
    fn test_other_bytes_select_narrow_strides() {
        let mut data = segment_with_layout(1, 0, 0, 0x160);
        data[0x160 + 52..0x160 + 56].copy_from_slice(&[0xFF, 0xFF, 0xFF, 0xFE]);
        let layout = MeshLayout::locate(&data).unwrap();

        assert_eq!(layout.strides, StrideLayout::Narrow);
        assert_eq!((layout.vertex_stride(), layout.uv_stride()), (36, 36));
    }

    #[test]
    fn test_probe_out_of_range_is_narrow() {
        assert_eq!(StrideLayout::probe(&[0xFF; 55], 0), StrideLayout::Narrow);
        assert_eq!(StrideLayout::probe(&[0xFF; 56], 0), StrideLayout::Wide);
        assert_eq!(StrideLayout::probe(&[0xFF; 56], usize::MAX), StrideLayout::Narrow);
    }

    #[test]
    fn test_segment_too_short() {
        let data = vec![0u8; 0x136];
        assert!(MeshLayout::locate(&data).is_err());
    }

    #[test]
    fn test_face_remainder() {
        let data = segment_with_layout(0, 7, 0, 0);
        let layout = MeshLayout::locate(&data).unwrap();

        assert_eq!(layout.triangle_count(), 2);
        assert_eq!(layout.face_remainder(), 1);
    }
}
