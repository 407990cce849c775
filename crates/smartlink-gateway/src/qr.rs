//! QR code rendering for short URLs.

use qrcode::render::svg;
use qrcode::types::QrError;
use qrcode::QrCode;

pub const CONTENT_TYPE: &str = "image/svg+xml";

/// Minimum width and height of the rendered image in pixels.
pub const MIN_DIMENSION: u32 = 200;

/// Renders `text` as an SVG QR code. Pure: equal input gives equal output.
pub fn render_qr(text: &str) -> Result<Vec<u8>, QrError> {
    let code = QrCode::new(text.as_bytes())?;
    let image = code
        .render::<svg::Color<'_>>()
        .min_dimensions(MIN_DIMENSION, MIN_DIMENSION)
        .build();
    Ok(image.into_bytes())
}
