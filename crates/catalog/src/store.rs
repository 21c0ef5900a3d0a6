use serde::{Deserialize, Serialize};

/// One selectable 3D asset: a hosted asset id plus a display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelEntry {
    pub asset_id: u64,
    pub name: String,
}

impl ModelEntry {
    pub fn new(asset_id: u64, name: impl Into<String>) -> Self {
        Self {
            asset_id,
            name: name.into(),
        }
    }

    /// Builds an entry from the add-model form: a free-text name and the id
    /// as typed by the user.
    pub fn parse(name: &str, asset_id_text: &str) -> Result<Self, CatalogError> {
        let trimmed = asset_id_text.trim();
        let asset_id = trimmed
            .parse::<u64>()
            .map_err(|_| CatalogError::InvalidAssetId(trimmed.to_string()))?;
        Ok(Self::new(asset_id, name))
    }
}

/// Demonstration assets the catalog starts with when nothing is configured.
pub fn default_entries() -> Vec<ModelEntry> {
    vec![
        ModelEntry::new(2415711, "Cesium_Air"),
        ModelEntry::new(2415931, "CesiumDrone"),
        ModelEntry::new(2416324, "PointCloudWave"),
        ModelEntry::new(2415940, "Wood_Tower"),
        ModelEntry::new(2415942, "Shadow_Tester"),
    ]
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    NotFound(u64),
    InvalidAssetId(String),
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::NotFound(id) => write!(f, "catalog entry not found: {id}"),
            CatalogError::InvalidAssetId(text) => {
                write!(f, "asset id is not an integer: {text:?}")
            }
        }
    }
}

impl std::error::Error for CatalogError {}

/// Insertion-ordered model catalog. Duplicate ids are allowed; lookups and
/// deletes act on the first match.
pub trait CatalogStore {
    fn list(&self) -> Vec<ModelEntry>;
    fn get(&self, asset_id: u64) -> Option<ModelEntry>;
    fn add(&mut self, entry: ModelEntry);
    /// Removes the first entry with `asset_id`. Returns `false` if none matched.
    fn delete(&mut self, asset_id: u64) -> bool;
}

#[derive(Debug, Default)]
pub struct InMemoryCatalogStore {
    entries: Vec<ModelEntry>,
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: impl IntoIterator<Item = ModelEntry>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl CatalogStore for InMemoryCatalogStore {
    fn list(&self) -> Vec<ModelEntry> {
        self.entries.clone()
    }

    fn get(&self, asset_id: u64) -> Option<ModelEntry> {
        self.entries.iter().find(|e| e.asset_id == asset_id).cloned()
    }

    fn add(&mut self, entry: ModelEntry) {
        self.entries.push(entry);
    }

    fn delete(&mut self, asset_id: u64) -> bool {
        match self.entries.iter().position(|e| e.asset_id == asset_id) {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }
}
