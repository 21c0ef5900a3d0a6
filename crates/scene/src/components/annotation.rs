use std::fmt;
use std::str::FromStr;

use foundation::Color;
use foundation::math::{Ecef, Geodetic};
use serde::{Deserialize, Serialize};

/// Stroke width of drawn polylines, in pixels.
pub const POLYLINE_WIDTH_PX: f32 = 3.0;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationKind {
    Point,
    #[default]
    Line,
    Polygon,
    Rectangle,
    Circle,
    Ellipse,
}

impl AnnotationKind {
    pub const ALL: [AnnotationKind; 6] = [
        AnnotationKind::Point,
        AnnotationKind::Line,
        AnnotationKind::Polygon,
        AnnotationKind::Rectangle,
        AnnotationKind::Circle,
        AnnotationKind::Ellipse,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AnnotationKind::Point => "point",
            AnnotationKind::Line => "line",
            AnnotationKind::Polygon => "polygon",
            AnnotationKind::Rectangle => "rectangle",
            AnnotationKind::Circle => "circle",
            AnnotationKind::Ellipse => "ellipse",
        }
    }

    /// Kinds defined by exactly two anchors.
    pub fn is_two_point(&self) -> bool {
        matches!(
            self,
            AnnotationKind::Rectangle | AnnotationKind::Circle | AnnotationKind::Ellipse
        )
    }
}

impl fmt::Display for AnnotationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown annotation kind: {0:?}")]
pub struct UnknownAnnotationKind(pub String);

impl FromStr for AnnotationKind {
    type Err = UnknownAnnotationKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AnnotationKind::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownAnnotationKind(s.to_string()))
    }
}

/// Geographic rectangle in radians.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GeoRect {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl GeoRect {
    /// Bounding rectangle of two positions; longitude and latitude are
    /// ordered independently so the click order does not matter.
    pub fn from_corners(a: Geodetic, b: Geodetic) -> Self {
        Self {
            west: a.lon_rad.min(b.lon_rad),
            east: a.lon_rad.max(b.lon_rad),
            south: a.lat_rad.min(b.lat_rad),
            north: a.lat_rad.max(b.lat_rad),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationGeometry {
    Point {
        position: Ecef,
    },
    Polyline {
        positions: Vec<Ecef>,
        clamp_to_ground: bool,
        width_px: f32,
    },
    /// Closed ring; the last position connects back to the first.
    Polygon {
        hierarchy: Vec<Ecef>,
    },
    Rectangle {
        coordinates: GeoRect,
    },
    Ellipse {
        center: Ecef,
        semi_major_m: f64,
        semi_minor_m: f64,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub kind: AnnotationKind,
    /// Anchors the geometry was built from, in click order.
    pub anchors: Vec<Ecef>,
    pub geometry: AnnotationGeometry,
    pub color: Color,
}

impl Annotation {
    pub fn anchors_geodetic(&self) -> Vec<Geodetic> {
        self.anchors.iter().map(|p| p.to_geodetic()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{AnnotationKind, GeoRect};
    use foundation::math::Geodetic;

    #[test]
    fn kind_parses_case_insensitively() {
        assert_eq!("Polygon".parse::<AnnotationKind>(), Ok(AnnotationKind::Polygon));
        assert_eq!(" circle ".parse::<AnnotationKind>(), Ok(AnnotationKind::Circle));
        assert!("hexagon".parse::<AnnotationKind>().is_err());
    }

    #[test]
    fn two_point_kinds() {
        let two: Vec<_> = AnnotationKind::ALL
            .into_iter()
            .filter(AnnotationKind::is_two_point)
            .collect();
        assert_eq!(
            two,
            vec![
                AnnotationKind::Rectangle,
                AnnotationKind::Circle,
                AnnotationKind::Ellipse
            ]
        );
    }

    #[test]
    fn rect_orders_each_axis_independently() {
        // NE corner first on longitude, SW on latitude.
        let a = Geodetic::from_degrees(10.0, -5.0, 0.0);
        let b = Geodetic::from_degrees(-3.0, 7.0, 0.0);
        let r = GeoRect::from_corners(a, b);
        assert_eq!(r.west, (-3.0f64).to_radians());
        assert_eq!(r.east, 10.0f64.to_radians());
        assert_eq!(r.south, (-5.0f64).to_radians());
        assert_eq!(r.north, 7.0f64.to_radians());
    }
}
