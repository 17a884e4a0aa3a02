use std::collections::{BTreeMap, BTreeSet};

use tilestream_common::{GridLayer, LAYER_COUNT, SoilType, TileCoord};
use tilestream_kernel::VisualGrid;

/// Layered tilemap kept in memory, one sparse map per [`GridLayer`].
#[derive(Debug, Clone, Default)]
pub struct LayeredGrid {
    layers: [BTreeMap<TileCoord, SoilType>; LAYER_COUNT],
    draw_calls: u64,
    erase_calls: u64,
}

impl LayeredGrid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn soil_at(&self, layer: GridLayer, coord: TileCoord) -> Option<SoilType> {
        self.layers[layer.index()].get(&coord).copied()
    }

    /// Topmost drawn soil at a cell.
    pub fn top_at(&self, coord: TileCoord) -> Option<SoilType> {
        GridLayer::ALL
            .iter()
            .rev()
            .find_map(|layer| self.soil_at(*layer, coord))
    }

    /// Whether any layer has something drawn at `coord`.
    pub fn is_drawn(&self, coord: TileCoord) -> bool {
        self.layers.iter().any(|layer| layer.contains_key(&coord))
    }

    /// Distinct cells with at least one drawn layer.
    pub fn drawn_cells(&self) -> BTreeSet<TileCoord> {
        self.layers
            .iter()
            .flat_map(|layer| layer.keys().copied())
            .collect()
    }

    pub fn draw_calls(&self) -> u64 {
        self.draw_calls
    }

    pub fn erase_calls(&self) -> u64 {
        self.erase_calls
    }

    /// Drop every drawn cell on every layer.
    pub fn clear(&mut self) {
        for layer in &mut self.layers {
            layer.clear();
        }
        tracing::debug!("visual grid cleared");
    }
}

impl VisualGrid for LayeredGrid {
    fn draw_layer(&mut self, layer: GridLayer, position: TileCoord, soil: SoilType) {
        self.draw_calls += 1;
        self.layers[layer.index()].insert(position, soil);
    }

    fn erase_layer(&mut self, layer: GridLayer, position: TileCoord) {
        self.erase_calls += 1;
        self.layers[layer.index()].remove(&position);
    }
}
