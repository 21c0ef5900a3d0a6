use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, RgbaImage};

use crate::{EncodeError, JpegQuality};

pub fn encode_png(frame: &RgbaImage) -> Result<Vec<u8>, EncodeError> {
    let mut out = Vec::new();
    PngEncoder::new(&mut out).write_image(
        frame.as_raw(),
        frame.width(),
        frame.height(),
        ExtendedColorType::Rgba8,
    )?;
    Ok(out)
}

/// JPEG has no alpha channel; the frame is flattened to RGB first.
pub fn encode_jpeg(frame: &RgbaImage, quality: JpegQuality) -> Result<Vec<u8>, EncodeError> {
    let rgb = DynamicImage::ImageRgba8(frame.clone()).to_rgb8();
    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, quality.percent()).write_image(
        rgb.as_raw(),
        rgb.width(),
        rgb.height(),
        ExtendedColorType::Rgb8,
    )?;
    Ok(out)
}
