use serde::{Deserialize, Serialize};
use tilestream_common::{GridLayer, LAYER_COUNT, SoilType};

/// Ground layers of one tile: at most one soil per [`GridLayer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LayerStack {
    slots: [Option<SoilType>; LAYER_COUNT],
}

impl LayerStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stack with a single soil on one layer.
    pub fn with(layer: GridLayer, soil: SoilType) -> Self {
        let mut stack = Self::new();
        stack.set(layer, soil);
        stack
    }

    pub fn get(&self, layer: GridLayer) -> Option<SoilType> {
        self.slots[layer.index()]
    }

    pub fn set(&mut self, layer: GridLayer, soil: SoilType) {
        self.slots[layer.index()] = Some(soil);
    }

    pub fn clear(&mut self, layer: GridLayer) {
        self.slots[layer.index()] = None;
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Occupied layers, bottom to top.
    pub fn occupied(&self) -> impl Iterator<Item = (GridLayer, SoilType)> + '_ {
        GridLayer::ALL
            .into_iter()
            .filter_map(|layer| self.get(layer).map(|soil| (layer, soil)))
    }

    /// Topmost soil, if any. Used by text rendering.
    pub fn top(&self) -> Option<SoilType> {
        self.occupied().last().map(|(_, soil)| soil)
    }
}
