use std::cell::RefCell;
use std::rc::Rc;

use foundation::math::{Ecef, Geodetic};
use layers::ImageryLayers;
use runtime::EventBus;
use scene::World;
use scene::camera::Camera;
use scene::entity::EntityId;
use scene::picking::{PickOptions, ScreenPoint, SurfacePicker, pick_ellipsoid};

use crate::options::ViewerOptions;

/// Starting eye position: high over North America.
pub const HOME_VIEW_DEG: (f64, f64, f64) = (-95.0, 40.0, 20_000_000.0);

/// Handle every panel and the drawing controller hold on the one host.
///
/// The host is single-threaded; borrows are short and never held across an
/// `.await`.
pub type SharedViewer = Rc<RefCell<Viewer>>;

/// The globe host: scene objects, imagery overlays, camera and notices.
#[derive(Debug)]
pub struct Viewer {
    options: ViewerOptions,
    pub world: World,
    pub imagery: ImageryLayers,
    pub camera: Camera,
    pub notices: EventBus,
}

impl Viewer {
    pub fn new(options: ViewerOptions) -> Self {
        let (lon, lat, height) = HOME_VIEW_DEG;
        let camera = Camera::new(
            Geodetic::from_degrees(lon, lat, height),
            options.width as f64,
            options.height as f64,
        );
        tracing::debug!(?options, "viewer created");
        Self {
            options,
            world: World::new(),
            imagery: ImageryLayers::new(),
            camera,
            notices: EventBus::new(),
        }
    }

    pub fn shared(options: ViewerOptions) -> SharedViewer {
        Rc::new(RefCell::new(Self::new(options)))
    }

    pub fn options(&self) -> &ViewerOptions {
        &self.options
    }

    /// Follows `entity` with the camera; `None` stops following.
    pub fn track(&mut self, entity: Option<EntityId>) {
        self.camera.tracked = entity;
    }

    pub fn fly_to(&mut self, destination: Geodetic) {
        tracing::debug!(
            lon = destination.lon_deg(),
            lat = destination.lat_deg(),
            height = destination.alt_m,
            "camera fly-to"
        );
        self.camera.fly_to(destination);
    }

    /// Followed entity, ignoring one that has since been removed.
    pub fn tracked(&self) -> Option<EntityId> {
        self.camera.tracked.filter(|e| self.world.is_alive(*e))
    }
}

impl SurfacePicker for Viewer {
    fn pick_surface(&self, screen: ScreenPoint) -> Option<Ecef> {
        let ray = self.camera.pick_ray(screen)?;
        pick_ellipsoid(ray, PickOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scene::components::{PlacedModel, Visibility};

    #[test]
    fn center_pick_hits_below_the_eye() {
        let viewer = Viewer::new(ViewerOptions::default());
        let hit = viewer
            .pick_surface(ScreenPoint::new(640.0, 360.0))
            .expect("hit");
        let geo = hit.to_geodetic();
        assert!((geo.lon_deg() - HOME_VIEW_DEG.0).abs() < 1e-6);
        // Nadir ray goes through the center, so geocentric vs geodetic skews latitude.
        assert!((geo.lat_deg() - HOME_VIEW_DEG.1).abs() < 0.25);
        assert!(geo.alt_m.abs() < 1e-3);
    }

    #[test]
    fn corner_pick_from_far_away_misses() {
        let viewer = Viewer::new(ViewerOptions::default());
        assert!(viewer.pick_surface(ScreenPoint::new(0.0, 0.0)).is_none());
    }

    #[test]
    fn tracked_entity_is_dropped_once_despawned() {
        let mut viewer = Viewer::new(ViewerOptions::default());
        let model = viewer.world.spawn_model(
            PlacedModel::new("m", 1, "u", Geodetic::from_degrees(0.0, 0.0, 0.0)),
            Visibility::visible(),
        );
        viewer.track(Some(model));
        assert_eq!(viewer.tracked(), Some(model));
        viewer.world.despawn(model);
        assert_eq!(viewer.tracked(), None);
    }
}
