//! Material segments.

use crate::extract::Conversion;

/// Decode a material segment.
///
/// The material layout has not been mapped out, so nothing is produced.
/// Callers treat materials as unconvertible; the raw segment can still be
/// archived.
pub fn decode_material(_data: &[u8]) -> Option<Conversion> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_material_produces_nothing() {
        let mut data = vec![0u8; 0x120];
        for chunk in data[0x110..0x120].chunks_exact_mut(4) {
            chunk.copy_from_slice(&[0x00, 0x00, 0x80, 0x3F]);
        }

        assert!(decode_material(&data).is_none());
        assert!(decode_material(&[]).is_none());
    }
}
