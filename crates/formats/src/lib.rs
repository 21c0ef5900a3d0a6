pub mod export_kind;
pub mod pdf;
pub mod raster;
pub mod svg;

pub use export_kind::*;
pub use pdf::*;
pub use raster::*;
pub use svg::*;

use image::RgbaImage;

#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("jpeg quality {0} outside [0.1, 1.0]")]
    QualityOutOfRange(f32),
    #[error("cannot encode an empty {width}x{height} frame")]
    EmptyFrame { width: u32, height: u32 },
    #[error("image encoding failed: {0}")]
    Image(#[from] image::ImageError),
    #[error("pdf encoding failed: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Encodes a captured frame into the byte stream of `kind`.
///
/// `quality` only affects JPEG output.
pub fn encode(
    kind: ExportKind,
    frame: &RgbaImage,
    quality: JpegQuality,
) -> Result<Vec<u8>, EncodeError> {
    if frame.width() == 0 || frame.height() == 0 {
        return Err(EncodeError::EmptyFrame {
            width: frame.width(),
            height: frame.height(),
        });
    }
    match kind {
        ExportKind::Png => encode_png(frame),
        ExportKind::Jpg => encode_jpeg(frame, quality),
        ExportKind::Svg => encode_svg(frame),
        ExportKind::Pdf => encode_pdf(frame),
    }
}
