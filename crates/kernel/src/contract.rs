//! Boundary contracts consumed by the kernel and the streamer.
//!
//! Everything here is implemented by collaborators. The kernel only calls
//! these methods and never waits on any visual effect they start.

use glam::Vec2;
use tilestream_common::{GridLayer, SoilType, TileCoord};

use crate::error::InteractableError;
use crate::layers::LayerStack;

/// A live, possibly hidden, instance of a tile's interactable.
pub trait Interactable {
    /// Immutable copy of the instance's mutable state.
    type Snapshot: std::fmt::Debug;

    /// Show or hide the instance. Setting the current value again is a no-op.
    fn set_active(&mut self, active: bool);

    fn is_active(&self) -> bool;

    /// Move the instance to a world-space position.
    fn set_position(&mut self, position: Vec2);

    /// Copy the current state. Must not mutate the handle.
    fn capture_snapshot(&self) -> Self::Snapshot;

    /// Called every time the owning tile becomes `Loaded`, after positioning.
    fn on_tile_loaded(&mut self, tile: TileCoord);

    /// Whether the instance has run its course and should be removed from its
    /// tile instead of being hidden or snapshotted.
    fn is_spent(&self) -> bool {
        false
    }

    /// Release the instance for good.
    fn destroy(self);
}

/// Snapshot type of a handle.
pub type SnapshotOf<H> = <H as Interactable>::Snapshot;

/// Builds handles from snapshots.
pub trait InteractableFactory {
    type Handle: Interactable;

    /// Instantiate a handle at `attach_point` from `snapshot`.
    ///
    /// Fails only when the snapshot is malformed.
    fn create(
        &mut self,
        attach_point: Vec2,
        snapshot: &SnapshotOf<Self::Handle>,
    ) -> Result<Self::Handle, InteractableError>;
}

/// Layered visual grid that ground layers are drawn onto.
///
/// Both operations are idempotent.
pub trait VisualGrid {
    fn draw_layer(&mut self, layer: GridLayer, position: TileCoord, soil: SoilType);

    fn erase_layer(&mut self, layer: GridLayer, position: TileCoord);
}

/// Initial content of one tile as produced by a [`Generator`].
#[derive(Debug, Clone, PartialEq)]
pub struct TileSeed<S> {
    pub layers: LayerStack,
    pub interactable: Option<S>,
}

impl<S> Default for TileSeed<S> {
    fn default() -> Self {
        Self {
            layers: LayerStack::default(),
            interactable: None,
        }
    }
}

/// Produces the full grid of tile seeds once, before the first tick.
pub trait Generator {
    type Snapshot;

    /// Seeds in row-major order: index `y * width + x`.
    fn generate(&mut self, width: u32, height: u32) -> Vec<TileSeed<Self::Snapshot>>;
}
