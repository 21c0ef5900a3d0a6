use base64::Engine as _;
use image::RgbaImage;

use crate::{EncodeError, encode_png};

/// Wraps the frame, as a base64 PNG, in a standalone SVG document of the
/// same pixel size.
pub fn encode_svg(frame: &RgbaImage) -> Result<Vec<u8>, EncodeError> {
    let png = encode_png(frame)?;
    let data = base64::engine::general_purpose::STANDARD.encode(png);
    let (w, h) = frame.dimensions();
    let doc = format!(
        concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" "#,
            r#"width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            r#"<image x="0" y="0" width="{w}" height="{h}" href="data:image/png;base64,{data}"/>"#,
            "</svg>\n"
        ),
        w = w,
        h = h,
        data = data
    );
    Ok(doc.into_bytes())
}
