//! Mesh sub-table decoding.

use n3d_common::{read_f32_at, read_u16_at};

use crate::layout::MeshLayout;
use crate::Result;

/// A decoded mesh.
///
/// Positions and UVs share one index space, so every face corner references
/// the same index in both.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedMesh {
    /// Triangles as 1-based vertex indices.
    pub faces: Vec<[u32; 3]>,
    /// Vertex positions.
    pub vertices: Vec<[f32; 3]>,
    /// Texture coordinates.
    pub uvs: Vec<[f32; 2]>,
    /// Set when any decoded position or UV component is NaN.
    pub corrupted: bool,
    /// Face index values that did not form a whole triangle.
    pub face_remainder: usize,
    /// Declared triangles that lie past the end of the segment.
    pub missing_faces: usize,
}

/// Decode a mesh segment.
///
/// Truncated face, vertex or UV tables end decoding of that table early
/// without failing; a record is either decoded completely or not at all. NaN values
/// are kept and flagged through [`DecodedMesh::corrupted`].
pub fn decode_mesh(data: &[u8]) -> Result<DecodedMesh> {
    let layout = MeshLayout::locate(data)?;
    DecodedMesh::decode(data, &layout)
}

impl DecodedMesh {
    /// Decode a mesh segment using an already located layout.
    pub fn decode(data: &[u8], layout: &MeshLayout) -> Result<Self> {
        tracing::debug!(
            face_offset = format_args!("{:#x}", layout.face_offset),
            face_count = layout.face_count,
            vertex_offset = format_args!("{:#x}", layout.vertex_offset),
            vertex_count = layout.vertex_count,
            vertex_stride = layout.vertex_stride(),
            uv_offset = format_args!("{:#x}", layout.uv_offset()),
            uv_stride = layout.uv_stride(),
            "detected mesh offsets"
        );

        let faces = decode_faces(data, layout);
        let missing_faces = layout.triangle_count() - faces.len();
        if missing_faces != 0 {
            tracing::debug!(
                expected = layout.triangle_count(),
                faces = faces.len(),
                "face table ends early"
            );
        }
        let vertices: Vec<[f32; 3]> = decode_records(
            data,
            layout.vertex_offset,
            layout.vertex_count,
            layout.vertex_stride(),
        );
        let uvs: Vec<[f32; 2]> =
            decode_records(data, layout.uv_offset(), layout.vertex_count, layout.uv_stride());

        if vertices.len() < layout.vertex_count || uvs.len() < layout.vertex_count {
            tracing::debug!(
                expected = layout.vertex_count,
                vertices = vertices.len(),
                uvs = uvs.len(),
                "vertex table ends early"
            );
        }

        let corrupted = vertices.iter().flatten().any(|v| v.is_nan())
            || uvs.iter().flatten().any(|v| v.is_nan());

        Ok(Self {
            faces,
            vertices,
            uvs,
            corrupted,
            face_remainder: layout.face_remainder(),
            missing_faces,
        })
    }
}

fn decode_faces(data: &[u8], layout: &MeshLayout) -> Vec<[u32; 3]> {
    let triangle_count = layout.triangle_count();
    let mut faces = Vec::with_capacity(triangle_count.min(data.len() / 6));
    let mut offset = layout.face_offset;

    for _ in 0..triangle_count {
        let corner = |k: usize| {
            offset
                .checked_add(2 * k)
                .and_then(|at| read_u16_at(data, at))
                .map(|index| u32::from(index) + 1)
        };

        let (Some(a), Some(b), Some(c)) = (corner(0), corner(1), corner(2)) else {
            break;
        };
        faces.push([a, b, c]);
        offset = offset.saturating_add(6);
    }

    faces
}

/// Read up to `count` records of `N` floats, `stride` bytes apart.
fn decode_records<const N: usize>(
    data: &[u8],
    start: usize,
    count: usize,
    stride: usize,
) -> Vec<[f32; N]> {
    let mut records = Vec::with_capacity(count.min(data.len() / stride + 1));
    let mut offset = start;

    for _ in 0..count {
        let Some(record) = read_record::<N>(data, offset) else {
            break;
        };
        records.push(record);
        offset = offset.saturating_add(stride);
    }

    records
}

fn read_record<const N: usize>(data: &[u8], offset: usize) -> Option<[f32; N]> {
    let mut record = [0f32; N];
    for (i, value) in record.iter_mut().enumerate() {
        *value = read_f32_at(data, offset.checked_add(4 * i)?)?;
    }
    Some(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FACE_OFFSET: usize = 0x140;
    const VERTEX_OFFSET: usize = 0x180;

    /// Build a mesh segment with the given face bytes and vertex records.
    ///
    /// Each vertex is written as a position at the record start and a UV pair
    /// 28 bytes in, `stride` bytes apart.
    fn mesh_segment(
        face_count: u32,
        faces: &[u8],
        vertices: &[([f32; 3], [f32; 2])],
        stride: usize,
        wide: bool,
    ) -> Vec<u8> {
        let len = VERTEX_OFFSET + vertices.len() * stride + 64;
        let mut data = vec![0u8; len];
        data[0x124..0x128].copy_from_slice(&(vertices.len() as u32).to_le_bytes());
        data[0x128..0x12C].copy_from_slice(&face_count.to_le_bytes());
        data[0x12C..0x130].copy_from_slice(&[0x50, 0x01, 0x00, 0x00]);
        data[0x130..0x134].copy_from_slice(&(FACE_OFFSET as u32).to_le_bytes());
        data[0x134..0x138].copy_from_slice(&(VERTEX_OFFSET as u32).to_le_bytes());
        data[FACE_OFFSET..FACE_OFFSET + faces.len()].copy_from_slice(faces);

        for (i, (position, uv)) in vertices.iter().enumerate() {
            let base = VERTEX_OFFSET + i * stride;
            for (k, value) in position.iter().enumerate() {
                data[base + 4 * k..base + 4 * k + 4].copy_from_slice(&value.to_le_bytes());
            }
            for (k, value) in uv.iter().enumerate() {
                let at = base + 28 + 4 * k;
                data[at..at + 4].copy_from_slice(&value.to_le_bytes());
            }
        }

        let probe = VERTEX_OFFSET + 52;
        let sentinel = if wide { [0xFF; 4] } else { [0x00; 4] };
        data[probe..probe + 4].copy_from_slice(&sentinel);
        data
    }

    #[test]
    fn test_single_triangle() {
        let data = mesh_segment(
            3,
            &[0x00, 0x00, 0x01, 0x00, 0x02, 0x00],
            &[
                ([0.0, 0.0, 0.0], [0.0, 0.0]),
                ([1.0, 0.0, 0.0], [1.0, 0.0]),
                ([0.0, 1.0, 0.0], [0.0, 1.0]),
            ],
            36,
            false,
        );
        let mesh = decode_mesh(&data).unwrap();

        assert_eq!(mesh.faces, vec![[1, 2, 3]]);
        assert_eq!(mesh.vertices.len(), 3);
        assert_eq!(mesh.vertices[1], [1.0, 0.0, 0.0]);
        assert_eq!(mesh.uvs[2], [0.0, 1.0]);
        assert!(!mesh.corrupted);
        assert_eq!(mesh.face_remainder, 0);
    }

    #[test]
    fn test_wide_records() {
        let data = mesh_segment(
            0,
            &[],
            &[
                ([1.0, 2.0, 3.0], [0.25, 0.5]),
                ([4.0, 5.0, 6.0], [0.75, 1.0]),
            ],
            40,
            true,
        );
        let mesh = decode_mesh(&data).unwrap();

        assert_eq!(mesh.vertices, vec![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
        assert_eq!(mesh.uvs, vec![[0.25, 0.5], [0.75, 1.0]]);
        assert!(mesh.faces.is_empty());
    }

    #[test]
    fn test_face_count_not_multiple_of_three() {
        let data = mesh_segment(
            5,
            &[0x00, 0x00, 0x01, 0x00, 0x02, 0x00, 0x03, 0x00, 0x04, 0x00],
            &[],
            36,
            false,
        );
        let mesh = decode_mesh(&data).unwrap();

        assert_eq!(mesh.faces, vec![[1, 2, 3]]);
        assert_eq!(mesh.face_remainder, 2);
    }

    #[test]
    fn test_nan_sets_corrupted_and_keeps_vertex() {
        let data = mesh_segment(
            0,
            &[],
            &[([f32::NAN, 1.0, 2.0], [0.0, 0.0]), ([3.0, 4.0, 5.0], [1.0, 1.0])],
            36,
            false,
        );
        let mesh = decode_mesh(&data).unwrap();

        assert!(mesh.corrupted);
        assert_eq!(mesh.vertices.len(), 2);
        assert!(mesh.vertices[0][0].is_nan());
        assert_eq!(mesh.vertices[1], [3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_nan_in_uv_sets_corrupted() {
        let data = mesh_segment(0, &[], &[([0.0, 0.0, 0.0], [0.0, f32::NAN])], 36, false);
        assert!(decode_mesh(&data).unwrap().corrupted);
    }

    #[test]
    fn test_truncated_vertex_table_stops_early() {
        let mut data = mesh_segment(
            0,
            &[],
            &[([1.0, 1.0, 1.0], [0.5, 0.5]), ([2.0, 2.0, 2.0], [0.5, 0.5])],
            36,
            false,
        );
        // Claim three vertices, then cut the segment 8 bytes into the third.
        data[0x124..0x128].copy_from_slice(&3u32.to_le_bytes());
        data.truncate(VERTEX_OFFSET + 2 * 36 + 8);

        let mesh = decode_mesh(&data).unwrap();
        assert_eq!(mesh.vertices, vec![[1.0, 1.0, 1.0], [2.0, 2.0, 2.0]]);
        assert_eq!(mesh.uvs.len(), 2);
        assert!(!mesh.corrupted);
    }

    #[test]
    fn test_huge_vertex_count_is_bounded_by_data() {
        let mut data = mesh_segment(0, &[], &[([1.0, 2.0, 3.0], [0.0, 0.0])], 36, false);
        data[0x124..0x128].copy_from_slice(&u32::MAX.to_le_bytes());

        let mesh = decode_mesh(&data).unwrap();
        assert!(!mesh.vertices.is_empty());
        assert!(mesh.vertices.len() <= data.len() / 36 + 1);
    }

    #[test]
    fn test_truncated_face_table_keeps_vertices() {
        let mut data = mesh_segment(
            6,
            &[0x00, 0x00, 0x01, 0x00, 0x02, 0x00],
            &[
                ([0.0, 0.0, 0.0], [0.0, 0.0]),
                ([1.0, 0.0, 0.0], [1.0, 0.0]),
                ([0.0, 1.0, 0.0], [0.0, 1.0]),
            ],
            36,
            false,
        );
        // Second triangle starts 4 bytes before the end of the segment.
        let face_offset = data.len() as u32 - 10;
        data[0x130..0x134].copy_from_slice(&face_offset.to_le_bytes());
        let len = data.len();
        data[len - 10..len - 4].copy_from_slice(&[0x02, 0x00, 0x01, 0x00, 0x00, 0x00]);

        let mesh = decode_mesh(&data).unwrap();
        assert_eq!(mesh.faces, vec![[3, 2, 1]]);
        assert_eq!(mesh.missing_faces, 1);
        assert_eq!(mesh.vertices.len(), 3);
        assert_eq!(mesh.uvs.len(), 3);
    }

    #[test]
    fn test_face_table_past_end() {
        let mut data = mesh_segment(3, &[], &[], 36, false);
        data[0x130..0x134].copy_from_slice(&u32::MAX.to_le_bytes());

        let mesh = decode_mesh(&data).unwrap();
        assert!(mesh.faces.is_empty());
        assert_eq!(mesh.missing_faces, 1);
    }
}
