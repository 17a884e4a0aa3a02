use glam::Vec2;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Number of ground layers carried by every tile.
pub const LAYER_COUNT: usize = 4;

/// Integer cell coordinate in the world grid.
///
/// Ordered by `x`, then `y`, so ordered collections of coordinates iterate
/// the same way on every platform.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct TileCoord {
    pub x: i32,
    pub y: i32,
}

impl TileCoord {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Cell containing a world-space position.
    pub fn from_position(pos: Vec2) -> Self {
        Self {
            x: pos.x.floor() as i32,
            y: pos.y.floor() as i32,
        }
    }

    /// World-space center of the cell. Interactables are attached here.
    pub fn center(self) -> Vec2 {
        Vec2::new(self.x as f32 + 0.5, self.y as f32 + 0.5)
    }

    /// Shifted cell, clamped to the `i32` range.
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x.saturating_add(dx), self.y.saturating_add(dy))
    }

    /// Shifted cell, or `None` if it would leave the `i32` range.
    pub fn checked_offset(self, dx: i32, dy: i32) -> Option<Self> {
        Some(Self::new(self.x.checked_add(dx)?, self.y.checked_add(dy)?))
    }

    /// Per-axis absolute distance to another cell.
    pub fn axis_distance(self, other: TileCoord) -> (u32, u32) {
        (self.x.abs_diff(other.x), self.y.abs_diff(other.y))
    }
}

impl std::fmt::Display for TileCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Ground material drawn on a layer. "No soil" is `Option::None` at the use site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoilType {
    Water,
    Swamp,
    Sand,
    FertileGrass,
    ForestGrass,
    PlainsGrass,
}

impl SoilType {
    pub const ALL: [SoilType; 6] = [
        SoilType::Water,
        SoilType::Swamp,
        SoilType::Sand,
        SoilType::FertileGrass,
        SoilType::ForestGrass,
        SoilType::PlainsGrass,
    ];

    /// Single-character glyph used by text renderers.
    pub fn glyph(self) -> char {
        match self {
            SoilType::Water => '~',
            SoilType::Swamp => '%',
            SoilType::Sand => ':',
            SoilType::FertileGrass => '"',
            SoilType::ForestGrass => ',',
            SoilType::PlainsGrass => '.',
        }
    }
}

/// One of the fixed ground layers of a tile, bottom to top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GridLayer {
    Ground,
    Plains,
    Sand,
    Water,
}

impl GridLayer {
    pub const ALL: [GridLayer; LAYER_COUNT] = [
        GridLayer::Ground,
        GridLayer::Plains,
        GridLayer::Sand,
        GridLayer::Water,
    ];

    /// Storage slot for this layer. Exhaustive, so every layer has a slot.
    pub fn index(self) -> usize {
        match self {
            GridLayer::Ground => 0,
            GridLayer::Plains => 1,
            GridLayer::Sand => 2,
            GridLayer::Water => 3,
        }
    }
}

/// Stable identifier of one interactable instance, preserved across snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InstanceId(pub Uuid);

impl InstanceId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Deterministic id from raw bits, for seeded generation.
    pub fn from_bits(bits: u128) -> Self {
        Self(Uuid::from_u128(bits))
    }

    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl Default for InstanceId {
    fn default() -> Self {
        Self::new()
    }
}
