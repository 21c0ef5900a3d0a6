use foundation::math::Geodetic;

#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct HeadingPitchRoll {
    pub heading_rad: f64,
    pub pitch_rad: f64,
    pub roll_rad: f64,
}

impl HeadingPitchRoll {
    pub fn new(heading_rad: f64, pitch_rad: f64, roll_rad: f64) -> Self {
        Self {
            heading_rad,
            pitch_rad,
            roll_rad,
        }
    }
}

/// A 3D asset instance bound to a geographic anchor.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedModel {
    pub name: String,
    pub asset_id: u64,
    /// Resolved asset location (glTF/3D Tiles endpoint).
    pub uri: String,
    /// Per-asset token returned by the resolver, sent with tile requests.
    pub access_token: Option<String>,
    pub position: Geodetic,
    pub orientation: HeadingPitchRoll,
    pub minimum_pixel_size: f64,
    pub maximum_scale: f64,
}

impl PlacedModel {
    pub const DEFAULT_MINIMUM_PIXEL_SIZE: f64 = 128.0;
    pub const DEFAULT_MAXIMUM_SCALE: f64 = 10_000.0;

    pub fn new(name: impl Into<String>, asset_id: u64, uri: impl Into<String>, position: Geodetic) -> Self {
        Self {
            name: name.into(),
            asset_id,
            uri: uri.into(),
            access_token: None,
            position,
            orientation: HeadingPitchRoll::default(),
            minimum_pixel_size: Self::DEFAULT_MINIMUM_PIXEL_SIZE,
            maximum_scale: Self::DEFAULT_MAXIMUM_SCALE,
        }
    }
}
