use foundation::math::{Ecef, Vec3, WGS84_A, WGS84_B};

/// Pointer position in canvas pixels (origin top-left, y down).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self { origin, dir }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PickOptions {
    pub max_distance: f64,
}

impl Default for PickOptions {
    fn default() -> Self {
        Self {
            max_distance: 1.0e30,
        }
    }
}

/// Resolves a pointer position to a position on the renderable surface.
///
/// `None` means the ray under the pointer misses the surface; callers treat
/// that as a no-op rather than an error.
pub trait SurfacePicker {
    fn pick_surface(&self, screen: ScreenPoint) -> Option<Ecef>;
}

/// Nearest intersection of `ray` with the WGS84 ellipsoid.
///
/// The ray origin may be inside the ellipsoid, in which case the exit point is
/// returned. Hits farther than `opts.max_distance` are ignored.
pub fn pick_ellipsoid(ray: Ray, opts: PickOptions) -> Option<Ecef> {
    let dir = ray.dir.normalize()?;

    // Scale to the unit sphere.
    let o = Vec3::new(ray.origin.x / WGS84_A, ray.origin.y / WGS84_A, ray.origin.z / WGS84_B);
    let d = Vec3::new(dir.x / WGS84_A, dir.y / WGS84_A, dir.z / WGS84_B);

    let a = d.dot(d);
    let b = 2.0 * o.dot(d);
    let c = o.dot(o) - 1.0;
    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return None;
    }

    let sqrt_disc = disc.sqrt();
    let t0 = (-b - sqrt_disc) / (2.0 * a);
    let t1 = (-b + sqrt_disc) / (2.0 * a);
    let t = if t0 >= 0.0 {
        t0
    } else if t1 >= 0.0 {
        t1
    } else {
        return None;
    };
    if t > opts.max_distance {
        return None;
    }

    Some(Ecef::from_vec3(ray.origin + dir.scale(t)))
}
