use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use catalog::{AssetResolver, InMemoryCatalogStore};
use drawing::{DrawingController, PointerEvent};
use foundation::math::Geodetic;
use formats::ExportKind;
use panels::{ExportPanel, ExportSink, LayerPanel, ModelPanel};
use scene::components::{Annotation, AnnotationKind};
use scene::picking::ScreenPoint;
use serde::{Deserialize, Serialize};
use viewer::{SharedViewer, Viewer};

use crate::config::PresenterConfig;

/// A scripted sequence of user interactions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub steps: Vec<SessionStep>,
}

impl Session {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading session {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("parsing session {}", path.display()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum SessionStep {
    SetDrawMode { mode: AnnotationKind },
    SetColor { color: String },
    Click { x: f64, y: f64 },
    Move { x: f64, y: f64 },
    #[serde(alias = "terminate")]
    RightClick,
    ClearDrawings,
    LayerVisible { visible: bool },
    ToggleLayer,
    ChangeLayer { name: String },
    /// `asset_id` is form text and may fail to parse.
    AddModel { name: String, asset_id: String },
    DeleteModel { asset_id: u64 },
    SelectModel { asset_id: u64 },
    ShowModel,
    HideModel,
    Export {
        #[serde(default)]
        kind: Option<ExportKind>,
        #[serde(default)]
        quality: Option<f32>,
    },
    FlyTo { lon: f64, lat: f64, height: f64 },
}

impl SessionStep {
    fn op(&self) -> &'static str {
        match self {
            SessionStep::SetDrawMode { .. } => "set_draw_mode",
            SessionStep::SetColor { .. } => "set_color",
            SessionStep::Click { .. } => "click",
            SessionStep::Move { .. } => "move",
            SessionStep::RightClick => "right_click",
            SessionStep::ClearDrawings => "clear_drawings",
            SessionStep::LayerVisible { .. } => "layer_visible",
            SessionStep::ToggleLayer => "toggle_layer",
            SessionStep::ChangeLayer { .. } => "change_layer",
            SessionStep::AddModel { .. } => "add_model",
            SessionStep::DeleteModel { .. } => "delete_model",
            SessionStep::SelectModel { .. } => "select_model",
            SessionStep::ShowModel => "show_model",
            SessionStep::HideModel => "hide_model",
            SessionStep::Export { .. } => "export",
            SessionStep::FlyTo { .. } => "fly_to",
        }
    }
}

/// Finished annotation as printed by `presenter run`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotationRecord {
    pub kind: AnnotationKind,
    pub color: [u8; 4],
    /// `[lon_deg, lat_deg, height_m]` per anchor.
    pub anchors: Vec<[f64; 3]>,
}

impl From<&Annotation> for AnnotationRecord {
    fn from(annotation: &Annotation) -> Self {
        Self {
            kind: annotation.kind,
            color: annotation.color.to_rgba8(),
            anchors: annotation
                .anchors_geodetic()
                .into_iter()
                .map(|g| [g.lon_deg(), g.lat_deg(), g.alt_m])
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelRecord {
    pub asset_id: u64,
    pub name: String,
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerRecord {
    pub name: Option<String>,
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepFailure {
    pub step: usize,
    pub op: &'static str,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionReport {
    pub annotations: Vec<AnnotationRecord>,
    pub models: Vec<ModelRecord>,
    pub layer: LayerRecord,
    pub notices: Vec<String>,
    pub exports: Vec<PathBuf>,
    pub failures: Vec<StepFailure>,
}

/// The host plus every panel wired to it.
pub struct Presenter {
    viewer: SharedViewer,
    drawing: DrawingController,
    layers: LayerPanel,
    models: ModelPanel,
    export: ExportPanel,
    exports: Vec<PathBuf>,
}

impl Presenter {
    pub fn new(
        config: &PresenterConfig,
        resolver: Arc<dyn AssetResolver>,
        sink: Arc<dyn ExportSink>,
    ) -> anyhow::Result<Self> {
        let viewer = Viewer::shared(config.viewer);
        let drawing = DrawingController::new(viewer.clone());
        let layers = LayerPanel::new(viewer.clone(), config.layer.clone());
        let models = ModelPanel::new(
            viewer.clone(),
            InMemoryCatalogStore::from_entries(config.catalog.iter().cloned()),
            resolver,
            config.model,
        );
        let mut export = ExportPanel::new(viewer.clone(), sink);
        export.set_kind(config.export.kind);
        export
            .set_quality(config.export.jpeg_quality)
            .context("export.jpeg_quality")?;
        Ok(Self {
            viewer,
            drawing,
            layers,
            models,
            export,
            exports: Vec::new(),
        })
    }

    /// Runs every step in order. A failing step is recorded and the run
    /// continues.
    pub async fn run(&mut self, session: &Session) -> SessionReport {
        let mut failures = Vec::new();
        for (index, step) in session.steps.iter().enumerate() {
            if let Err(err) = self.apply(step).await {
                tracing::warn!(step = index, op = step.op(), error = %err, "session step failed");
                failures.push(StepFailure {
                    step: index,
                    op: step.op(),
                    error: format!("{err:#}"),
                });
            }
        }
        self.report(failures)
    }

    pub async fn apply(&mut self, step: &SessionStep) -> anyhow::Result<()> {
        match step {
            SessionStep::SetDrawMode { mode } => self.drawing.set_kind(*mode),
            SessionStep::SetColor { color } => self.drawing.set_color_css(color)?,
            SessionStep::Click { x, y } => {
                self.drawing
                    .handle(PointerEvent::PrimaryPress(ScreenPoint::new(*x, *y)));
            }
            SessionStep::Move { x, y } => {
                self.drawing.handle(PointerEvent::Move(ScreenPoint::new(*x, *y)));
            }
            SessionStep::RightClick => {
                self.drawing.terminate();
            }
            SessionStep::ClearDrawings => {
                self.drawing.clear_drawings();
            }
            SessionStep::LayerVisible { visible } => self.layers.set_visible(*visible),
            SessionStep::ToggleLayer => self.layers.toggle_visibility(),
            SessionStep::ChangeLayer { name } => {
                self.layers.change_layer(name);
            }
            SessionStep::AddModel { name, asset_id } => {
                self.models.add(name, asset_id)?;
            }
            SessionStep::DeleteModel { asset_id } => {
                if !self.models.delete(*asset_id) {
                    tracing::debug!(asset_id, "no catalog entry to delete");
                }
            }
            SessionStep::SelectModel { asset_id } => {
                self.models.select(*asset_id).await?;
            }
            SessionStep::ShowModel => {
                self.models.show().await?;
            }
            SessionStep::HideModel => {
                self.models.hide().await?;
            }
            SessionStep::Export { kind, quality } => {
                if let Some(kind) = kind {
                    self.export.set_kind(*kind);
                }
                if let Some(quality) = quality {
                    self.export.set_quality(*quality)?;
                }
                let outcome = self.export.export().await?;
                self.exports.push(outcome.path);
            }
            SessionStep::FlyTo { lon, lat, height } => self
                .viewer
                .borrow_mut()
                .fly_to(Geodetic::from_degrees(*lon, *lat, *height)),
        }
        Ok(())
    }

    fn report(&mut self, failures: Vec<StepFailure>) -> SessionReport {
        let viewer = self.viewer.borrow();
        let annotations = viewer
            .world
            .annotations()
            .into_iter()
            .map(|(_, a)| AnnotationRecord::from(a))
            .collect();
        let models = viewer
            .world
            .models()
            .into_iter()
            .map(|(entity, m)| ModelRecord {
                asset_id: m.asset_id,
                name: m.name.clone(),
                visible: viewer.world.visibility(entity).visible,
            })
            .collect();
        let notices = viewer
            .notices
            .notices()
            .iter()
            .map(|n| n.message.clone())
            .collect();
        SessionReport {
            annotations,
            models,
            layer: LayerRecord {
                name: self.layers.layer_name(),
                visible: self.layers.is_visible(),
            },
            notices,
            exports: std::mem::take(&mut self.exports),
            failures,
        }
    }
}
