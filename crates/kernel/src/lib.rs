//! Tile Kernel: per-tile lifecycle, the owned tile world, and the contracts
//! collaborators implement (interactables, visual grid, generator).
//!
//! # Invariants
//! - A tile holds at most one of: nothing, a snapshot, a live handle.
//! - Snapshots exist only on `Unloaded` tiles; handles only on `Loaded` or
//!   `CachedHidden` tiles.
//! - `CachedHidden` is only reachable for tiles that own an interactable.
//! - A spent handle is destroyed outright; it is never hidden or snapshotted.

pub mod contract;
pub mod error;
pub mod layers;
pub mod tile;
pub mod world;

pub use contract::{Generator, Interactable, InteractableFactory, SnapshotOf, TileSeed, VisualGrid};
pub use error::{InteractableError, WorldError};
pub use layers::LayerStack;
pub use tile::{LoadKind, Occupant, Tile, TileState, UnloadKind};
pub use world::{StateCounts, TileWorld};

#[cfg(test)]
pub(crate) mod testing;
