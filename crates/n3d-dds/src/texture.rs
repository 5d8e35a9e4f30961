//! Texture segment decoding.

use n3d_common::read_u32_at;
use zerocopy::IntoBytes;

use crate::header::DdsHeader;
use crate::{Error, Result, DDS_HEADER_LEN, DDS_MAGIC};

/// Offset of the first dimension field in a texture segment.
const WIDTH_OFFSET: usize = 0x24;

/// Offset of the second dimension field in a texture segment.
const HEIGHT_OFFSET: usize = 0x28;

/// Offset where pixel data starts in a texture segment. Everything before
/// it is the segment's own preamble, replaced by the DDS header.
pub const PIXEL_DATA_OFFSET: usize = 56;

/// Every N3D texture is 16 bits per pixel.
const BYTES_PER_PIXEL: u64 = 16 / 8;

/// Dimensions and payload size of a texture segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureInfo {
    /// Value of the field at 0x24.
    pub width: u32,
    /// Value of the field at 0x28.
    pub height: u32,
    /// Size of the RGB565 pixel payload in bytes.
    pub payload_size: u64,
}

impl TextureInfo {
    /// Read the dimensions from a texture segment.
    pub fn read(data: &[u8]) -> Result<Self> {
        let field = |offset: usize| {
            read_u32_at(data, offset).ok_or(n3d_common::Error::UnexpectedEof {
                needed: offset + 4,
                available: data.len(),
            })
        };

        let width = field(WIDTH_OFFSET)?;
        let height = field(HEIGHT_OFFSET)?;

        Ok(Self {
            width,
            height,
            payload_size: (u64::from(width) * u64::from(height)).saturating_mul(BYTES_PER_PIXEL),
        })
    }

    /// Total size of the synthesized DDS file.
    #[inline]
    pub fn dds_len(&self) -> u64 {
        self.payload_size.saturating_add(DDS_HEADER_LEN as u64)
    }
}

/// Convert a texture segment into a standalone DDS file.
///
/// The output is a fresh 128-byte header followed by `payload_size` bytes
/// taken from [`PIXEL_DATA_OFFSET`] onwards. The input is left untouched.
/// Segments shorter than `0x80 + payload_size` are rejected rather than
/// producing a partial texture.
pub fn decode_texture(data: &[u8]) -> Result<(TextureInfo, Vec<u8>)> {
    let info = TextureInfo::read(data)?;

    let needed = info.dds_len();
    let payload_size = usize::try_from(info.payload_size)
        .ok()
        .filter(|_| needed <= data.len() as u64)
        .ok_or(Error::InsufficientPayload {
            needed,
            available: data.len(),
        })?;

    tracing::debug!(
        width = info.width,
        height = info.height,
        payload_size,
        "detected texture size"
    );

    // Dimensions keep the segment's field order: 0x24 fills the first DDS
    // dimension slot, 0x28 the second.
    let header = DdsHeader::rgb565(info.width, info.height);

    let mut output = Vec::with_capacity(DDS_HEADER_LEN + payload_size);
    output.extend_from_slice(DDS_MAGIC);
    output.extend_from_slice(header.as_bytes());
    output.extend_from_slice(&data[PIXEL_DATA_OFFSET..PIXEL_DATA_OFFSET + payload_size]);

    Ok((info, output))
}

/// Expand RGB565 pixels to packed 8-bit RGB.
///
/// A trailing odd byte is ignored.
pub fn rgb565_to_rgb8(payload: &[u8]) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(payload.len() / 2 * 3);

    for pixel in payload.chunks_exact(2) {
        let value = u16::from_le_bytes([pixel[0], pixel[1]]);
        let r = ((value >> 11) & 0x1F) as u8;
        let g = ((value >> 5) & 0x3F) as u8;
        let b = (value & 0x1F) as u8;

        rgb.push((r << 3) | (r >> 2));
        rgb.push((g << 2) | (g >> 4));
        rgb.push((b << 3) | (b >> 2));
    }

    rgb
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A texture segment whose pixel bytes count up from `PIXEL_DATA_OFFSET`.
    fn texture_segment(width: u32, height: u32, len: usize) -> Vec<u8> {
        let mut data: Vec<u8> = (0..len).map(|i| i as u8).collect();
        data[0x24..0x28].copy_from_slice(&width.to_le_bytes());
        data[0x28..0x2C].copy_from_slice(&height.to_le_bytes());
        data
    }

    /// The 128-byte preamble, written out field by field.
    fn expected_header(first: u32, second: u32) -> Vec<u8> {
        let mut header = vec![0u8; 128];
        header[0..12].copy_from_slice(b"DDS \x7C\x00\x00\x00\x07\x10\x08\x00");
        header[12..16].copy_from_slice(&first.to_le_bytes());
        header[16..20].copy_from_slice(&second.to_le_bytes());
        header[22] = 0x08;
        header[76] = 0x20;
        header[80] = 0x40;
        header[88] = 0x10;
        header[93] = 0xF8;
        header[96..98].copy_from_slice(&[0xE0, 0x07]);
        header[100] = 0x1F;
        header[109] = 0x10;
        header
    }

    #[test]
    fn test_4x4_output_length() {
        let segment = texture_segment(4, 4, 0x80 + 32);
        let (info, dds) = decode_texture(&segment).unwrap();

        assert_eq!(info.payload_size, 32);
        assert_eq!(dds.len(), 160);
    }

    #[test]
    fn test_header_is_bit_exact() {
        let segment = texture_segment(8, 2, 0x80 + 32);
        let (_, dds) = decode_texture(&segment).unwrap();

        assert_eq!(&dds[..128], expected_header(8, 2).as_slice());
    }

    #[test]
    fn test_payload_starts_at_offset_56() {
        let segment = texture_segment(4, 4, 0x100);
        let (_, dds) = decode_texture(&segment).unwrap();

        assert_eq!(&dds[128..], &segment[56..56 + 32]);
        assert_eq!(dds[128], 56);
    }

    #[test]
    fn test_insufficient_payload() {
        let segment = texture_segment(4, 4, 0x80 + 31);

        assert!(matches!(
            decode_texture(&segment),
            Err(Error::InsufficientPayload { needed: 160, available: 159 })
        ));
    }

    #[test]
    fn test_huge_dimensions_do_not_overflow() {
        let segment = texture_segment(u32::MAX, u32::MAX, 0x100);

        match decode_texture(&segment) {
            Err(Error::InsufficientPayload { needed, .. }) => {
                assert_eq!(needed, u64::MAX);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_segment_too_short_for_dimensions() {
        let segment = vec![0u8; 0x2A];

        assert!(matches!(
            decode_texture(&segment),
            Err(Error::Common(n3d_common::Error::UnexpectedEof { needed: 0x2C, .. }))
        ));
    }

    #[test]
    fn test_extraction_is_stable() {
        let segment = texture_segment(16, 8, 0x200);

        let first = TextureInfo::read(&segment).unwrap();
        let second = TextureInfo::read(&segment).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.payload_size, 256);

        let (info, dds) = decode_texture(&segment).unwrap();
        assert_eq!(info, first);
        assert_eq!(decode_texture(&segment).unwrap().1, dds);
    }

    #[test]
    fn test_rgb565_expansion() {
        // Pure red, pure green, pure blue, white, then a dangling byte.
        let payload = [0x00, 0xF8, 0xE0, 0x07, 0x1F, 0x00, 0xFF, 0xFF, 0x12];

        assert_eq!(
            rgb565_to_rgb8(&payload),
            vec![
                255, 0, 0, //
                0, 255, 0, //
                0, 0, 255, //
                255, 255, 255,
            ]
        );
    }
}
