use image::{ImageBuffer, Luma, imageops};
use qrcode::{EcLevel, QrCode};

use crate::error::Result;

/// Pixel size of the rendered QR raster. The layout scales it down to
/// 92x92 on page 1 and up to 300x300 on page 2, so render at the larger
/// footprint once and share the image.
pub const QR_IMAGE_SIZE: u32 = 300;

pub type QrImage = ImageBuffer<Luma<u8>, Vec<u8>>;

/// Encode the payload as a grayscale QR raster at medium error correction.
///
/// Fails when the payload exceeds the symbol capacity for level M; there
/// is no fallback encoding.
pub fn encode(payload: &str) -> Result<QrImage> {
    let qr_code = QrCode::with_error_correction_level(payload, EcLevel::M)?;

    // Render with light=255 (white) and dark=0 (black)
    let img = qr_code
        .render::<Luma<u8>>()
        .light_color(Luma([255u8]))
        .dark_color(Luma([0u8]))
        .build();

    // Scale to the shared raster size
    let scaled = imageops::resize(
        &img,
        QR_IMAGE_SIZE,
        QR_IMAGE_SIZE,
        imageops::FilterType::Nearest,
    );
    Ok(scaled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CertificateError;

    #[test]
    fn test_encode_produces_fixed_size_raster() {
        let img = encode("Cree le: 2021-16-04 a 14:05").unwrap();
        assert_eq!(img.width(), QR_IMAGE_SIZE);
        assert_eq!(img.height(), QR_IMAGE_SIZE);
        // Both module colors must be present
        assert!(img.pixels().any(|p| p[0] == 0));
        assert!(img.pixels().any(|p| p[0] == 255));
    }

    #[test]
    fn test_encode_fails_on_oversized_payload() {
        // Version 40 at level M tops out well below 4000 bytes
        let oversized = "x".repeat(4000);
        match encode(&oversized) {
            Err(CertificateError::QrEncoding(_)) => {}
            other => panic!("expected QrEncoding error, got {other:?}"),
        }
    }
}
