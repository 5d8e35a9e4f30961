//! DDS header structures.

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

/// DDS file header (follows the 4-byte magic).
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct DdsHeader {
    /// Header size (should be 124).
    pub size: u32,
    /// Header flags.
    pub flags: u32,
    /// Image height.
    pub height: u32,
    /// Image width.
    pub width: u32,
    /// Pitch or linear size.
    pub pitch_or_linear_size: u32,
    /// Depth (for volume textures).
    pub depth: u32,
    /// Number of mipmap levels.
    pub mipmap_count: u32,
    /// Reserved.
    pub reserved1: [u32; 11],
    /// Pixel format.
    pub pixel_format: DdsPixelFormat,
    /// Surface capabilities.
    pub caps: u32,
    /// Surface capabilities 2.
    pub caps2: u32,
    /// Surface capabilities 3.
    pub caps3: u32,
    /// Surface capabilities 4.
    pub caps4: u32,
    /// Reserved.
    pub reserved2: u32,
}

impl DdsHeader {
    /// Expected header size.
    pub const SIZE: u32 = 124;

    /// `DDSD_CAPS | DDSD_HEIGHT | DDSD_WIDTH | DDSD_PIXELFORMAT | DDSD_LINEARSIZE`.
    pub const FLAGS_UNCOMPRESSED: u32 = 0x0008_1007;

    /// `DDSCAPS_TEXTURE`.
    pub const CAPS_TEXTURE: u32 = 0x1000;

    /// Linear size written for every N3D texture, whatever its dimensions.
    pub const N3D_LINEAR_SIZE: u32 = 0x0008_0000;

    /// Header for a single-level, uncompressed RGB565 surface.
    pub fn rgb565(height: u32, width: u32) -> Self {
        Self {
            size: Self::SIZE,
            flags: Self::FLAGS_UNCOMPRESSED,
            height,
            width,
            pitch_or_linear_size: Self::N3D_LINEAR_SIZE,
            depth: 0,
            mipmap_count: 0,
            reserved1: [0; 11],
            pixel_format: DdsPixelFormat::RGB565,
            caps: Self::CAPS_TEXTURE,
            caps2: 0,
            caps3: 0,
            caps4: 0,
            reserved2: 0,
        }
    }
}

/// DDS pixel format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct DdsPixelFormat {
    /// Structure size (should be 32).
    pub size: u32,
    /// Pixel format flags.
    pub flags: u32,
    /// Four-character code for compression.
    pub four_cc: FourCC,
    /// Number of bits per pixel (for uncompressed).
    pub rgb_bit_count: u32,
    /// Red bit mask.
    pub r_bit_mask: u32,
    /// Green bit mask.
    pub g_bit_mask: u32,
    /// Blue bit mask.
    pub b_bit_mask: u32,
    /// Alpha bit mask.
    pub a_bit_mask: u32,
}

impl DdsPixelFormat {
    /// Structure size.
    pub const SIZE: u32 = 32;

    /// `DDPF_RGB`.
    pub const FLAG_RGB: u32 = 0x40;

    /// 16-bit 5-6-5 RGB without alpha.
    pub const RGB565: Self = Self {
        size: Self::SIZE,
        flags: Self::FLAG_RGB,
        four_cc: FourCC::NONE,
        rgb_bit_count: 16,
        r_bit_mask: 0xF800,
        g_bit_mask: 0x07E0,
        b_bit_mask: 0x001F,
        a_bit_mask: 0,
    };
}

/// Four-character code for compression type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(transparent)]
pub struct FourCC(pub [u8; 4]);

impl FourCC {
    /// No compression.
    pub const NONE: Self = Self([0; 4]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_struct_sizes() {
        assert_eq!(std::mem::size_of::<DdsHeader>(), DdsHeader::SIZE as usize);
        assert_eq!(
            std::mem::size_of::<DdsPixelFormat>(),
            DdsPixelFormat::SIZE as usize
        );
    }

    #[test]
    fn test_rgb565_round_trips_through_bytes() {
        let header = DdsHeader::rgb565(64, 32);
        let parsed = DdsHeader::read_from_bytes(header.as_bytes()).unwrap();

        assert_eq!(parsed, header);
        assert_eq!(parsed.height, 64);
        assert_eq!(parsed.width, 32);
        assert_eq!(parsed.pixel_format.rgb_bit_count, 16);
    }
}
