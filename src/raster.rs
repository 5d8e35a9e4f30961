//! PNG output for texture segments.

use std::io::Cursor;

use anyhow::{ensure, Context, Result};
use image::{imageops, ImageFormat, RgbImage};
use n3d::common::FromBytes;
use n3d::dds::{rgb565_to_rgb8, DdsHeader, DDS_HEADER_LEN, DDS_MAGIC};
use n3d::{BoxError, RasterEncoder};

/// Encodes synthesized RGB565 DDS files as PNG, flipped top to bottom.
pub struct PngEncoder;

impl RasterEncoder for PngEncoder {
    fn extension(&self) -> &'static str {
        "png"
    }

    fn encode(&self, dds: &[u8]) -> std::result::Result<Vec<u8>, BoxError> {
        Ok(encode_png(dds)?)
    }
}

fn encode_png(dds: &[u8]) -> Result<Vec<u8>> {
    ensure!(
        dds.len() >= DDS_HEADER_LEN && dds.starts_with(DDS_MAGIC),
        "not a DDS file"
    );

    // Dimensions are taken from the header as any DDS reader would see them.
    let header = DdsHeader::read_from_bytes(&dds[DDS_MAGIC.len()..DDS_HEADER_LEN])
        .map_err(|_| anyhow::anyhow!("malformed DDS header"))?;

    let rgb = rgb565_to_rgb8(&dds[DDS_HEADER_LEN..]);
    let image = RgbImage::from_raw(header.width, header.height, rgb).with_context(|| {
        format!(
            "pixel data too short for {}x{} image",
            header.width, header.height
        )
    })?;
    let image = imageops::flip_vertical(&image);

    let mut png = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .context("failed to encode PNG")?;

    Ok(png)
}
