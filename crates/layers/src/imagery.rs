use crate::layer::{Layer, LayerId};
use crate::raster::{RasterLayer, WmsSource};

/// Ordered collection of imagery overlays attached to the globe.
///
/// Overlays are never mutated in place apart from their style; rebinding a
/// source means `remove` + `add`, which allocates a fresh id.
#[derive(Debug, Default)]
pub struct ImageryLayers {
    next_id: u64,
    layers: Vec<RasterLayer>,
}

impl ImageryLayers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an overlay on top of the stack.
    pub fn add(&mut self, source: WmsSource, visible: bool) -> LayerId {
        let id = LayerId(self.next_id);
        self.next_id += 1;
        let mut layer = RasterLayer::new(id, source);
        layer.style.visible = visible;
        tracing::debug!(layer = id.0, name = %layer.source.layers, "imagery overlay added");
        self.layers.push(layer);
        id
    }

    pub fn remove(&mut self, id: LayerId) -> Option<RasterLayer> {
        let pos = self.layers.iter().position(|l| l.id() == id)?;
        Some(self.layers.remove(pos))
    }

    pub fn get(&self, id: LayerId) -> Option<&RasterLayer> {
        self.layers.iter().find(|l| l.id() == id)
    }

    pub fn get_mut(&mut self, id: LayerId) -> Option<&mut RasterLayer> {
        self.layers.iter_mut().find(|l| l.id() == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RasterLayer> {
        self.layers.iter()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}
