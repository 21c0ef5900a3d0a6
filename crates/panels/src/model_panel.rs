use std::sync::Arc;

use catalog::{AssetResolver, CatalogError, CatalogStore, ModelEntry, ResolveError};
use foundation::math::Geodetic;
use scene::ObjectKind;
use scene::components::{PlacedModel, Visibility};
use scene::entity::EntityId;
use serde::{Deserialize, Serialize};
use viewer::SharedViewer;

pub const MODEL_ADDED_NOTICE: &str = "Model added successfully";

/// Where placed models go and where the camera flies to afterwards.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelPanelConfig {
    pub anchor_lon_deg: f64,
    pub anchor_lat_deg: f64,
    pub anchor_height_m: f64,
    pub fly_to_height_m: f64,
}

impl ModelPanelConfig {
    pub fn anchor(&self) -> Geodetic {
        Geodetic::from_degrees(self.anchor_lon_deg, self.anchor_lat_deg, self.anchor_height_m)
    }

    pub fn fly_to(&self) -> Geodetic {
        Geodetic::from_degrees(self.anchor_lon_deg, self.anchor_lat_deg, self.fly_to_height_m)
    }
}

impl Default for ModelPanelConfig {
    fn default() -> Self {
        Self {
            anchor_lon_deg: -123.0744619,
            anchor_lat_deg: 44.0503706,
            anchor_height_m: 0.0,
            fly_to_height_m: 10_000.0,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ModelPanelError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

/// Catalog of placeable assets plus the single model slot of the host.
///
/// Selecting an entry or changing visibility replaces the placed model
/// wholesale; nothing else in the scene is touched.
pub struct ModelPanel {
    viewer: SharedViewer,
    catalog: Box<dyn CatalogStore>,
    resolver: Arc<dyn AssetResolver>,
    config: ModelPanelConfig,
    selected: Option<u64>,
    show: bool,
}

impl ModelPanel {
    pub fn new(
        viewer: SharedViewer,
        catalog: impl CatalogStore + 'static,
        resolver: Arc<dyn AssetResolver>,
        config: ModelPanelConfig,
    ) -> Self {
        Self {
            viewer,
            catalog: Box::new(catalog),
            resolver,
            config,
            selected: None,
            show: true,
        }
    }

    pub fn entries(&self) -> Vec<ModelEntry> {
        self.catalog.list()
    }

    pub fn selected(&self) -> Option<u64> {
        self.selected
    }

    pub fn is_shown(&self) -> bool {
        self.show
    }

    /// Adds an entry from the add-model form. The id text must be an integer.
    pub fn add(&mut self, name: &str, asset_id_text: &str) -> Result<ModelEntry, CatalogError> {
        let entry = ModelEntry::parse(name, asset_id_text)?;
        self.catalog.add(entry.clone());
        self.viewer.borrow_mut().notices.success(MODEL_ADDED_NOTICE);
        Ok(entry)
    }

    /// Removes the first entry with `asset_id`.
    pub fn delete(&mut self, asset_id: u64) -> bool {
        let removed = self.catalog.delete(asset_id);
        tracing::debug!(asset_id, removed, "catalog delete");
        removed
    }

    pub async fn select(&mut self, asset_id: u64) -> Result<Option<EntityId>, ModelPanelError> {
        self.selected = Some(asset_id);
        self.refresh().await
    }

    pub async fn show(&mut self) -> Result<Option<EntityId>, ModelPanelError> {
        self.show = true;
        self.refresh().await
    }

    pub async fn hide(&mut self) -> Result<Option<EntityId>, ModelPanelError> {
        self.show = false;
        self.refresh().await
    }

    /// Removes placed models, then places the selection (if any) anew.
    ///
    /// Failures are logged and returned; the model slot stays empty.
    async fn refresh(&mut self) -> Result<Option<EntityId>, ModelPanelError> {
        self.viewer.borrow_mut().world.despawn_kind(ObjectKind::Model);
        let Some(asset_id) = self.selected else {
            return Ok(None);
        };
        let result = self.place(asset_id).await;
        if let Err(err) = &result {
            tracing::error!(asset_id, error = %err, "error loading 3D model");
        }
        result.map(Some)
    }

    async fn place(&self, asset_id: u64) -> Result<EntityId, ModelPanelError> {
        let entry = self
            .catalog
            .get(asset_id)
            .ok_or(CatalogError::NotFound(asset_id))?;
        let resolved = self.resolver.resolve(asset_id).await?;

        let mut model = PlacedModel::new(entry.name, asset_id, resolved.url, self.config.anchor());
        model.access_token = resolved.access_token;

        let mut viewer = self.viewer.borrow_mut();
        let entity = viewer
            .world
            .spawn_model(model, Visibility::from(self.show));
        viewer.track(Some(entity));
        viewer.fly_to(self.config.fly_to());
        tracing::info!(asset_id, show = self.show, "model placed");
        Ok(entity)
    }
}

impl std::fmt::Debug for ModelPanel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelPanel")
            .field("config", &self.config)
            .field("selected", &self.selected)
            .field("show", &self.show)
            .finish_non_exhaustive()
    }
}
