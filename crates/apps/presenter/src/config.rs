use std::path::{Path, PathBuf};

use catalog::{DEFAULT_ION_API, ModelEntry, default_entries};
use formats::ExportKind;
use panels::{LayerPanelConfig, ModelPanelConfig};
use serde::{Deserialize, Serialize};
use viewer::ViewerOptions;

use crate::cli::CliArgs;

/// Environment variable holding the asset service token.
pub const ION_TOKEN_ENV: &str = "PRESENTER_ION_TOKEN";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Top-level presenter configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PresenterConfig {
    pub viewer: ViewerOptions,
    pub layer: LayerPanelConfig,
    pub model: ModelPanelConfig,
    /// Catalog the model panel starts with.
    pub catalog: Vec<ModelEntry>,
    pub ion: IonConfig,
    pub export: ExportConfig,
    /// Default log filter when `RUST_LOG` is unset.
    pub log_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct IonConfig {
    pub api_url: String,
    /// Never written back out.
    #[serde(skip_serializing)]
    pub token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExportConfig {
    pub out_dir: PathBuf,
    pub kind: ExportKind,
    /// JPEG quality fraction in `[0.1, 1.0]`.
    pub jpeg_quality: f32,
}

impl Default for PresenterConfig {
    fn default() -> Self {
        Self {
            viewer: ViewerOptions::default(),
            layer: LayerPanelConfig::default(),
            model: ModelPanelConfig::default(),
            catalog: default_entries(),
            ion: IonConfig::default(),
            export: ExportConfig::default(),
            log_level: "info".to_string(),
        }
    }
}

impl Default for IonConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_ION_API.to_string(),
            token: None,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("."),
            kind: ExportKind::default(),
            jpeg_quality: 0.8,
        }
    }
}

impl PresenterConfig {
    /// Loads `path`, or the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::ParseError {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Applies environment overrides through `lookup`.
    pub fn apply_env_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(token) = lookup(ION_TOKEN_ENV).filter(|t| !t.trim().is_empty()) {
            self.ion.token = Some(token);
        }
    }

    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(w) = args.width {
            self.viewer.width = w;
        }
        if let Some(h) = args.height {
            self.viewer.height = h;
        }
        if let Some(ref dir) = args.out_dir {
            self.export.out_dir = dir.clone();
        }
        if let Some(ref level) = args.log_level {
            self.log_level = level.clone();
        }
    }
}
