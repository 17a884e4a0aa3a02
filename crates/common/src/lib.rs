//! Shared types for the tile streaming workspace.
//!
//! # Invariants
//! - Tile coordinates are plain integer cells; world-space positions are
//!   derived from them, never the other way around except through `floor`.
//! - Layer indexing goes through [`GridLayer`], never through raw integers.

mod types;

pub use types::{GridLayer, InstanceId, LAYER_COUNT, SoilType, TileCoord};
