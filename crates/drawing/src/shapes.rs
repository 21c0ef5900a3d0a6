use foundation::Color;
use foundation::math::Ecef;
use scene::components::{
    Annotation, AnnotationGeometry, AnnotationKind, GeoRect, POLYLINE_WIDTH_PX,
};

/// Opacity applied to every drawn shape and marker.
pub const SHAPE_ALPHA: f32 = 0.7;

/// Builds the shape for `kind` from anchors in click order.
///
/// Returns `None` when the anchors cannot form that kind: no anchors at all,
/// or a two-point kind with a count other than two.
pub fn finalize(kind: AnnotationKind, anchors: &[Ecef], color: Color) -> Option<Annotation> {
    let last = *anchors.last()?;
    let color = color.with_alpha(SHAPE_ALPHA);
    let annotation = |anchors: Vec<Ecef>, geometry| Annotation {
        kind,
        anchors,
        geometry,
        color,
    };

    let two = match anchors {
        [a, b] => Some((*a, *b)),
        _ => None,
    };

    match kind {
        AnnotationKind::Line => Some(annotation(
            anchors.to_vec(),
            AnnotationGeometry::Polyline {
                positions: anchors.to_vec(),
                clamp_to_ground: true,
                width_px: POLYLINE_WIDTH_PX,
            },
        )),
        AnnotationKind::Polygon => Some(annotation(
            anchors.to_vec(),
            AnnotationGeometry::Polygon {
                hierarchy: anchors.to_vec(),
            },
        )),
        AnnotationKind::Point => Some(annotation(
            vec![last],
            AnnotationGeometry::Point { position: last },
        )),
        AnnotationKind::Rectangle => {
            let (a, b) = two?;
            Some(annotation(
                vec![a, b],
                AnnotationGeometry::Rectangle {
                    coordinates: GeoRect::from_corners(a.to_geodetic(), b.to_geodetic()),
                },
            ))
        }
        AnnotationKind::Circle => {
            let (center, rim) = two?;
            let radius = center.distance(rim);
            Some(annotation(
                vec![center, rim],
                AnnotationGeometry::Ellipse {
                    center,
                    semi_major_m: radius,
                    semi_minor_m: radius,
                },
            ))
        }
        AnnotationKind::Ellipse => {
            let (center, rim) = two?;
            let semi_minor_m = center.distance(rim) * 0.5;
            Some(annotation(
                vec![center, rim],
                AnnotationGeometry::Ellipse {
                    center,
                    semi_major_m: semi_minor_m * 2.0,
                    semi_minor_m,
                },
            ))
        }
    }
}
