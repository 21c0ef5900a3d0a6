//! Frame capture.
//!
//! The host has no GPU surface, so a captured frame is a preview raster: the
//! ellipsoid shaded with a graticule, then annotations, sketch markers and
//! placed models drawn on top in screen space with tiny-skia.

use foundation::Color;
use foundation::math::{Ecef, Geodetic, Vec3};
use image::{Rgba, RgbaImage};
use scene::components::{Annotation, AnnotationGeometry, GeoRect, Marker};
use scene::picking::{PickOptions, ScreenPoint, pick_ellipsoid};
use tiny_skia::{FillRule, IntSize, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke, Transform};

use crate::viewer::Viewer;

const SPACE: Rgba<u8> = Rgba([4, 6, 14, 255]);
const OCEAN: [f32; 3] = [28.0, 72.0, 128.0];
const GRATICULE: [f32; 3] = [90.0, 130.0, 170.0];
const GRATICULE_STEP_DEG: f64 = 10.0;
const GRATICULE_WIDTH_DEG: f64 = 0.25;
/// Vertices per ellipse outline.
const ELLIPSE_SEGMENTS: usize = 64;
/// Vertices per rectangle edge, so long edges follow the curvature.
const RECT_EDGE_SEGMENTS: usize = 16;
const MODEL_ICON_PX: f32 = 12.0;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CaptureError {
    #[error("drawing buffer is not preserved; enable preserve_drawing_buffer to capture frames")]
    DrawingBufferNotPreserved,
    #[error("invalid canvas size {width}x{height}")]
    InvalidCanvas { width: u32, height: u32 },
}

impl Viewer {
    /// Renders the current frame into an owned RGBA image.
    pub fn capture_frame(&self) -> Result<RgbaImage, CaptureError> {
        let opts = self.options();
        if !opts.preserve_drawing_buffer {
            return Err(CaptureError::DrawingBufferNotPreserved);
        }
        let (w, h) = (opts.width, opts.height);
        let invalid = CaptureError::InvalidCanvas {
            width: w,
            height: h,
        };
        let size = IntSize::from_wh(w, h).ok_or(invalid.clone())?;

        let globe = self.render_globe(w, h);
        let mut pixmap = Pixmap::from_vec(globe.into_raw(), size).ok_or(invalid.clone())?;
        self.render_overlays(&mut pixmap);

        let frame = RgbaImage::from_raw(w, h, pixmap.take()).ok_or(invalid)?;
        tracing::debug!(width = w, height = h, "frame captured");
        Ok(frame)
    }

    fn render_globe(&self, w: u32, h: u32) -> RgbaImage {
        let camera = &self.camera;
        let sun = self.camera.eye().to_vec3().normalize();

        RgbaImage::from_fn(w, h, |x, y| {
            let screen = ScreenPoint::new(x as f64 + 0.5, y as f64 + 0.5);
            let Some(hit) = camera
                .pick_ray(screen)
                .and_then(|ray| pick_ellipsoid(ray, PickOptions::default()))
            else {
                return SPACE;
            };
            let geo = hit.to_geodetic();
            let base = if on_graticule(geo) { GRATICULE } else { OCEAN };
            let light = match (sun, hit.to_vec3().normalize()) {
                (Some(s), Some(n)) => 0.35 + 0.65 * s.dot(n).max(0.0),
                _ => 1.0,
            };
            let c = |v: f32| (v * light as f32).clamp(0.0, 255.0) as u8;
            Rgba([c(base[0]), c(base[1]), c(base[2]), 255])
        })
    }

    fn render_overlays(&self, pixmap: &mut Pixmap) {
        for (entity, annotation) in self.world.annotations() {
            if self.world.visibility(entity).visible {
                self.draw_annotation(pixmap, annotation);
            }
        }
        for (_, preview) in self.world.previews() {
            self.draw_annotation(pixmap, preview);
        }
        for (_, marker) in self.world.markers() {
            self.draw_marker(pixmap, marker);
        }
        for (entity, model) in self.world.models() {
            if !self.world.visibility(entity).visible {
                continue;
            }
            if let Some(p) = self.camera.project(model.position.to_ecef()) {
                let half = MODEL_ICON_PX / 2.0;
                if let Some(rect) = tiny_skia::Rect::from_xywh(
                    p.x as f32 - half,
                    p.y as f32 - half,
                    MODEL_ICON_PX,
                    MODEL_ICON_PX,
                ) {
                    let paint = paint_for(Color::YELLOW);
                    pixmap.fill_rect(rect, &paint, Transform::identity(), None);
                }
            }
        }
    }

    fn draw_annotation(&self, pixmap: &mut Pixmap, annotation: &Annotation) {
        let paint = paint_for(annotation.color);
        match &annotation.geometry {
            AnnotationGeometry::Point { position } => {
                self.draw_dot(pixmap, *position, scene::components::MARKER_PIXEL_SIZE, &paint);
            }
            AnnotationGeometry::Polyline {
                positions,
                width_px,
                ..
            } => {
                if let Some(path) = self.screen_path(positions.iter().copied(), false) {
                    pixmap.stroke_path(&path, &paint, &stroke(*width_px), Transform::identity(), None);
                }
            }
            AnnotationGeometry::Polygon { hierarchy } => {
                self.fill_ring(pixmap, hierarchy.iter().copied(), &paint);
            }
            AnnotationGeometry::Rectangle { coordinates } => {
                self.fill_ring(pixmap, rect_ring(*coordinates), &paint);
            }
            AnnotationGeometry::Ellipse {
                center,
                semi_major_m,
                semi_minor_m,
            } => {
                let ring = ellipse_ring(*center, *semi_major_m, *semi_minor_m);
                self.fill_ring(pixmap, ring, &paint);
            }
        }
    }

    fn draw_marker(&self, pixmap: &mut Pixmap, marker: &Marker) {
        let paint = paint_for(marker.color);
        self.draw_dot(pixmap, marker.position, marker.pixel_size, &paint);
    }

    fn draw_dot(&self, pixmap: &mut Pixmap, position: Ecef, size_px: f32, paint: &Paint<'_>) {
        let Some(p) = self.camera.project(position) else {
            return;
        };
        if let Some(path) = PathBuilder::from_circle(p.x as f32, p.y as f32, size_px / 2.0) {
            pixmap.fill_path(&path, paint, FillRule::Winding, Transform::identity(), None);
        }
    }

    fn fill_ring(&self, pixmap: &mut Pixmap, ring: impl Iterator<Item = Ecef>, paint: &Paint<'_>) {
        if let Some(path) = self.screen_path(ring, true) {
            pixmap.fill_path(&path, paint, FillRule::EvenOdd, Transform::identity(), None);
        }
    }

    /// Screen-space path through the projected points; points behind the eye
    /// are skipped.
    fn screen_path(
        &self,
        points: impl Iterator<Item = Ecef>,
        close: bool,
    ) -> Option<tiny_skia::Path> {
        let mut pb = PathBuilder::new();
        let mut started = false;
        for p in points.filter_map(|p| self.camera.project(p)) {
            if started {
                pb.line_to(p.x as f32, p.y as f32);
            } else {
                pb.move_to(p.x as f32, p.y as f32);
                started = true;
            }
        }
        if close {
            pb.close();
        }
        pb.finish()
    }
}

fn paint_for(color: Color) -> Paint<'static> {
    let [r, g, b, a] = color.to_rgba8();
    let mut paint = Paint::default();
    paint.set_color_rgba8(r, g, b, a);
    paint.anti_alias = true;
    paint
}

fn stroke(width: f32) -> Stroke {
    Stroke {
        width,
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..Default::default()
    }
}

fn on_graticule(geo: Geodetic) -> bool {
    let near = |deg: f64| {
        let r = deg.rem_euclid(GRATICULE_STEP_DEG);
        r < GRATICULE_WIDTH_DEG || r > GRATICULE_STEP_DEG - GRATICULE_WIDTH_DEG
    };
    near(geo.lon_deg()) || near(geo.lat_deg())
}

fn rect_ring(r: GeoRect) -> impl Iterator<Item = Ecef> {
    let corners = [
        (r.west, r.south),
        (r.east, r.south),
        (r.east, r.north),
        (r.west, r.north),
    ];
    (0..4).flat_map(move |i| {
        let (lon0, lat0) = corners[i];
        let (lon1, lat1) = corners[(i + 1) % 4];
        (0..RECT_EDGE_SEGMENTS).map(move |s| {
            let t = s as f64 / RECT_EDGE_SEGMENTS as f64;
            Geodetic::new(lat0 + (lat1 - lat0) * t, lon0 + (lon1 - lon0) * t, 0.0).to_ecef()
        })
    })
}

/// Outline in the local east/north plane at `center`, major axis east.
fn ellipse_ring(center: Ecef, semi_major_m: f64, semi_minor_m: f64) -> impl Iterator<Item = Ecef> {
    let geo = center.to_geodetic();
    let (sin_lat, cos_lat) = geo.lat_rad.sin_cos();
    let (sin_lon, cos_lon) = geo.lon_rad.sin_cos();
    let east = Vec3::new(-sin_lon, cos_lon, 0.0);
    let north = Vec3::new(-sin_lat * cos_lon, -sin_lat * sin_lon, cos_lat);
    let c = center.to_vec3();
    (0..ELLIPSE_SEGMENTS).map(move |i| {
        let theta = std::f64::consts::TAU * i as f64 / ELLIPSE_SEGMENTS as f64;
        let offset = east.scale(semi_major_m * theta.cos()) + north.scale(semi_minor_m * theta.sin());
        Ecef::from_vec3(c + offset)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::ViewerOptions;
    use scene::components::{AnnotationKind, POLYLINE_WIDTH_PX};

    fn small_viewer() -> Viewer {
        let mut viewer = Viewer::new(ViewerOptions {
            width: 64,
            height: 48,
            ..ViewerOptions::default()
        });
        viewer.camera.fly_to(Geodetic::from_degrees(0.0, 0.0, 10_000_000.0));
        viewer
    }

    #[test]
    fn capture_requires_preserved_buffer() {
        let viewer = Viewer::new(ViewerOptions {
            preserve_drawing_buffer: false,
            ..ViewerOptions::default()
        });
        assert_eq!(
            viewer.capture_frame(),
            Err(CaptureError::DrawingBufferNotPreserved)
        );
    }

    #[test]
    fn zero_sized_canvas_is_rejected() {
        let viewer = Viewer::new(ViewerOptions {
            width: 0,
            ..ViewerOptions::default()
        });
        assert!(matches!(
            viewer.capture_frame(),
            Err(CaptureError::InvalidCanvas { width: 0, .. })
        ));
    }

    #[test]
    fn frame_has_canvas_size_with_globe_in_center_and_space_in_corner() {
        let frame = small_viewer().capture_frame().expect("frame");
        assert_eq!(frame.dimensions(), (64, 48));
        assert_eq!(*frame.get_pixel(0, 0), SPACE);
        assert_ne!(*frame.get_pixel(32, 24), SPACE);
    }

    #[test]
    fn annotations_change_the_frame() {
        let mut viewer = small_viewer();
        let before = viewer.capture_frame().expect("frame");

        let a = Geodetic::from_degrees(-10.0, 0.0, 0.0).to_ecef();
        let b = Geodetic::from_degrees(10.0, 0.0, 0.0).to_ecef();
        viewer.world.spawn_annotation(Annotation {
            kind: AnnotationKind::Line,
            anchors: vec![a, b],
            geometry: AnnotationGeometry::Polyline {
                positions: vec![a, b],
                clamp_to_ground: true,
                width_px: POLYLINE_WIDTH_PX,
            },
            color: Color::RED,
        });

        let after = viewer.capture_frame().expect("frame");
        assert_ne!(before.as_raw(), after.as_raw());
    }

    #[test]
    fn ellipse_ring_stays_at_axis_distance() {
        let center = Geodetic::from_degrees(30.0, 45.0, 0.0).to_ecef();
        let ring: Vec<Ecef> = ellipse_ring(center, 2000.0, 1000.0).collect();
        assert_eq!(ring.len(), ELLIPSE_SEGMENTS);
        assert!((ring[0].distance(center) - 2000.0).abs() < 1e-6);
        assert!((ring[ELLIPSE_SEGMENTS / 4].distance(center) - 1000.0).abs() < 1e-6);
    }
}
