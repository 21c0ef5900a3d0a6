use foundation::math::{Ecef, Geodetic, Vec3};

use crate::entity::EntityId;
use crate::picking::{Ray, ScreenPoint};

/// Nadir-looking globe camera.
///
/// The eye sits at `position` and always looks at the ellipsoid center, with
/// north up on screen. That is all the host needs to turn a pointer position
/// into a pick ray.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera {
    pub position: Geodetic,
    pub fov_y_rad: f64,
    pub viewport_width: f64,
    pub viewport_height: f64,
    /// Entity the camera follows, if any.
    pub tracked: Option<EntityId>,
}

impl Camera {
    pub fn new(position: Geodetic, viewport_width: f64, viewport_height: f64) -> Self {
        Self {
            position,
            fov_y_rad: 60f64.to_radians(),
            viewport_width: viewport_width.max(1.0),
            viewport_height: viewport_height.max(1.0),
            tracked: None,
        }
    }

    /// Moves the eye to `destination`. Transitions are instantaneous.
    pub fn fly_to(&mut self, destination: Geodetic) {
        self.position = destination;
    }

    pub fn eye(&self) -> Ecef {
        self.position.to_ecef()
    }

    /// Orthonormal view basis `(forward, right, up)`.
    ///
    /// Returns `None` when the camera sits at the ellipsoid center.
    fn basis(&self) -> Option<(Vec3, Vec3, Vec3)> {
        let forward = self.eye().to_vec3().scale(-1.0).normalize()?;
        let up_hint = if forward.z.abs() < 0.99 {
            Vec3::new(0.0, 0.0, 1.0)
        } else {
            Vec3::new(0.0, 1.0, 0.0)
        };
        let right = forward.cross(up_hint).normalize()?;
        let up = right.cross(forward);
        Some((forward, right, up))
    }

    fn aspect(&self) -> f64 {
        self.viewport_width / self.viewport_height
    }

    /// Ray from the eye through the given pixel.
    pub fn pick_ray(&self, screen: ScreenPoint) -> Option<Ray> {
        let (forward, right, up) = self.basis()?;
        let tan_half = (0.5 * self.fov_y_rad).tan();
        let ndc_x = 2.0 * screen.x / self.viewport_width - 1.0;
        let ndc_y = 1.0 - 2.0 * screen.y / self.viewport_height;

        let dir = forward
            + right.scale(ndc_x * tan_half * self.aspect())
            + up.scale(ndc_y * tan_half);
        Some(Ray::new(self.eye().to_vec3(), dir))
    }

    /// Pixel position of `point`, or `None` if it is behind the eye.
    ///
    /// Points outside the viewport still project; callers clip.
    pub fn project(&self, point: Ecef) -> Option<ScreenPoint> {
        let (forward, right, up) = self.basis()?;
        let v = point.to_vec3() - self.eye().to_vec3();
        let depth = v.dot(forward);
        if depth <= 0.0 {
            return None;
        }
        let tan_half = (0.5 * self.fov_y_rad).tan();
        let ndc_x = v.dot(right) / (depth * tan_half * self.aspect());
        let ndc_y = v.dot(up) / (depth * tan_half);
        Some(ScreenPoint::new(
            0.5 * (ndc_x + 1.0) * self.viewport_width,
            0.5 * (1.0 - ndc_y) * self.viewport_height,
        ))
    }
}
