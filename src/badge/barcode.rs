use crate::utils::error::Result;
use image::{ImageFormat, Luma};
use qrcode::QrCode;
use std::io::Cursor;

const MIN_SIZE_PX: u32 = 200;

/// QR code of a ticket token, the code scanned at the venue entrance.
pub struct Barcode {
    code: QrCode,
}

impl Barcode {
    pub fn new(token: &str) -> Result<Self> {
        Ok(Self {
            code: QrCode::new(token.as_bytes())?,
        })
    }

    /// Grayscale PNG with a quiet zone, at least 200px wide.
    pub fn to_png(&self) -> Result<Vec<u8>> {
        let image = self
            .code
            .render::<Luma<u8>>()
            .quiet_zone(true)
            .min_dimensions(MIN_SIZE_PX, MIN_SIZE_PX)
            .build();

        let mut buffer = Cursor::new(Vec::new());
        image.write_to(&mut buffer, ImageFormat::Png)?;
        Ok(buffer.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_png_output() {
        let png = Barcode::new("d41d8cd98f00b204").unwrap().to_png().unwrap();

        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
        let decoded = image::load_from_memory(&png).unwrap();
        assert!(decoded.width() >= MIN_SIZE_PX);
        assert_eq!(decoded.width(), decoded.height());
    }
}
