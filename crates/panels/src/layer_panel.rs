use layers::raster::WmsSource;
use layers::{Layer, LayerId};
use serde::{Deserialize, Serialize};
use viewer::SharedViewer;

pub const LAYER_CHANGED_NOTICE: &str = "Layer changed successfully";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerPanelConfig {
    /// WMS endpoint every overlay of the panel is fetched from.
    pub endpoint: String,
    pub initial_layer: String,
}

impl Default for LayerPanelConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8080/geoserver/wms".to_string(),
            initial_layer: "Tur-Map:Tur_cities".to_string(),
        }
    }
}

/// Owns the single WMS overlay slot of the host.
#[derive(Debug)]
pub struct LayerPanel {
    viewer: SharedViewer,
    endpoint: String,
    active: LayerId,
    visible: bool,
}

impl LayerPanel {
    /// Attaches the initial overlay, hidden.
    pub fn new(viewer: SharedViewer, config: LayerPanelConfig) -> Self {
        let source = WmsSource::new(config.endpoint.clone(), config.initial_layer);
        let active = viewer.borrow_mut().imagery.add(source, false);
        Self {
            viewer,
            endpoint: config.endpoint,
            active,
            visible: false,
        }
    }

    pub fn active_layer(&self) -> LayerId {
        self.active
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Layer name the active overlay is bound to.
    pub fn layer_name(&self) -> Option<String> {
        let viewer = self.viewer.borrow();
        viewer
            .imagery
            .get(self.active)
            .map(|l| l.source.layers.clone())
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
        if let Some(layer) = self.viewer.borrow_mut().imagery.get_mut(self.active) {
            layer.style.visible = visible;
        }
    }

    pub fn toggle_visibility(&mut self) {
        self.set_visible(!self.visible);
    }

    /// Rebinds the overlay slot to `name` on the same endpoint. The name is
    /// passed through unchecked; a bad name only shows up as failed tiles.
    pub fn change_layer(&mut self, name: &str) -> LayerId {
        let mut viewer = self.viewer.borrow_mut();
        viewer.imagery.remove(self.active);
        let replacement = viewer
            .imagery
            .add(WmsSource::new(self.endpoint.clone(), name), self.visible);
        tracing::info!(layer = name, visible = self.visible, "imagery layer changed");
        viewer.notices.success(LAYER_CHANGED_NOTICE);
        self.active = replacement;
        replacement
    }

    /// Whether the overlay in the host currently renders.
    pub fn overlay_visible(&self) -> bool {
        self.viewer
            .borrow()
            .imagery
            .get(self.active)
            .is_some_and(|l| l.is_visible())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use viewer::{Viewer, ViewerOptions};

    fn panel() -> (SharedViewer, LayerPanel) {
        let viewer = Viewer::shared(ViewerOptions::default());
        let panel = LayerPanel::new(viewer.clone(), LayerPanelConfig::default());
        (viewer, panel)
    }

    #[test]
    fn starts_with_one_hidden_overlay() {
        let (viewer, panel) = panel();
        assert_eq!(viewer.borrow().imagery.len(), 1);
        assert!(!panel.is_visible());
        assert!(!panel.overlay_visible());
        assert_eq!(panel.layer_name().as_deref(), Some("Tur-Map:Tur_cities"));

        let v = viewer.borrow();
        let layer = v.imagery.get(panel.active_layer()).expect("overlay");
        assert_eq!(layer.source.format, "image/png");
        assert!(layer.source.transparent);
    }

    #[test]
    fn double_toggle_restores_visibility_and_source() {
        let (viewer, mut panel) = panel();
        let source_before = viewer
            .borrow()
            .imagery
            .get(panel.active_layer())
            .map(|l| l.source.clone());

        panel.toggle_visibility();
        assert!(panel.overlay_visible());
        panel.toggle_visibility();
        assert!(!panel.overlay_visible());

        let source_after = viewer
            .borrow()
            .imagery
            .get(panel.active_layer())
            .map(|l| l.source.clone());
        assert_eq!(source_before, source_after);
    }

    #[test]
    fn change_layer_replaces_overlay_and_keeps_visibility() {
        let (viewer, mut panel) = panel();
        panel.set_visible(true);
        let old = panel.active_layer();

        let new = panel.change_layer("Tur-Map:roads");
        assert_ne!(old, new);
        assert_eq!(viewer.borrow().imagery.len(), 1);
        assert!(viewer.borrow().imagery.get(old).is_none());
        assert!(panel.overlay_visible());
        assert_eq!(panel.layer_name().as_deref(), Some("Tur-Map:roads"));

        let v = viewer.borrow();
        let notices = v.notices.notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].message, LAYER_CHANGED_NOTICE);
    }

    #[test]
    fn change_layer_accepts_any_name() {
        let (_, mut panel) = panel();
        panel.change_layer("");
        assert_eq!(panel.layer_name().as_deref(), Some(""));
        assert!(!panel.overlay_visible());
    }
}
