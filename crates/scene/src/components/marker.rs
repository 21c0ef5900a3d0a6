use foundation::Color;
use foundation::math::Ecef;

/// Default marker size, in pixels.
pub const MARKER_PIXEL_SIZE: f32 = 5.0;

/// Screen-space point marker (sketch vertices, floating cursor).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Marker {
    pub position: Ecef,
    pub color: Color,
    pub pixel_size: f32,
    pub clamp_to_ground: bool,
}

impl Marker {
    pub fn new(position: Ecef, color: Color) -> Self {
        Self {
            position,
            color,
            pixel_size: MARKER_PIXEL_SIZE,
            clamp_to_ground: true,
        }
    }
}
