//! Image encoding: `RgbImage` → JPEG → base64 `data:` URI.
//!
//! Dossiers are single self-contained HTML files, so photos are embedded
//! inline rather than linked. JPEG keeps a 150×200 portrait to a few KB.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::codecs::jpeg::JpegEncoder;
use image::RgbImage;
use tracing::debug;

/// Encode a normalised photo as a `data:image/jpeg;base64,…` URI.
pub fn encode_jpeg_data_uri(img: &RgbImage, quality: u8) -> Result<String, image::ImageError> {
    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, quality).encode_image(img)?;

    let b64 = STANDARD.encode(&buf);
    debug!("Encoded photo → {} bytes base64", b64.len());

    Ok(format!("data:image/jpeg;base64,{b64}"))
}
