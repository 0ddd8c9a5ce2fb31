//! Export gateway: serialize the surface to an encoded image payload.
//!
//! Export never depends on a render having run; a freshly provisioned
//! surface encodes as a valid blank payload.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{DynamicImage, ExtendedColorType, ImageEncoder};

use crate::error::{Error, Result};
use crate::surface::Surface;

/// Encodable output formats. The default is the lossy one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageFormat {
    Png,
    #[default]
    Jpeg,
}

impl ImageFormat {
    /// Lenient name parse ("png", "jpeg", "jpg").
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "png" => Some(ImageFormat::Png),
            "jpeg" | "jpg" => Some(ImageFormat::Jpeg),
            _ => None,
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
        }
    }
}

/// Default encoding quality: maximum.
pub const DEFAULT_QUALITY: f32 = 1.0;

/// Encode the surface. `quality` is `0.0..=1.0` and applies to JPEG; PNG is
/// lossless and ignores it.
pub fn encode(surface: &Surface, format: ImageFormat, quality: f32) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    match format {
        ImageFormat::Png => {
            PngEncoder::new(&mut buf)
                .write_image(
                    surface.image().as_raw(),
                    surface.width(),
                    surface.height(),
                    ExtendedColorType::Rgba8,
                )
                .map_err(|e| Error::EncodeError(e.to_string()))?;
        }
        ImageFormat::Jpeg => {
            // JPEG has no alpha channel; flatten first.
            let rgb = DynamicImage::ImageRgba8(surface.image().clone()).to_rgb8();
            let q = (quality.clamp(0.0, 1.0) * 100.0).round().max(1.0) as u8;
            JpegEncoder::new_with_quality(&mut buf, q)
                .write_image(
                    rgb.as_raw(),
                    rgb.width(),
                    rgb.height(),
                    ExtendedColorType::Rgb8,
                )
                .map_err(|e| Error::EncodeError(e.to_string()))?;
        }
    }
    Ok(buf)
}

/// Encode the surface and wrap it as a `data:` URI.
pub fn to_data_uri(surface: &Surface, format: ImageFormat, quality: f32) -> Result<String> {
    let bytes = encode(surface, format, quality)?;
    Ok(format!(
        "data:{};base64,{}",
        format.mime(),
        BASE64.encode(bytes)
    ))
}
