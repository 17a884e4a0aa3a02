use tilestream_common::TileCoord;

use crate::contract::{Interactable, InteractableFactory, SnapshotOf, VisualGrid};
use crate::error::InteractableError;
use crate::layers::LayerStack;

/// Lifecycle state of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TileState {
    /// Nothing drawn, no live handle.
    #[default]
    Unloaded,
    /// Layers drawn, handle (if any) active.
    Loaded,
    /// Layers erased, handle kept but deactivated, resident in the eviction cache.
    CachedHidden,
}

/// What a tile owns in place of, or alongside, its ground layers.
pub enum Occupant<H: Interactable> {
    /// No interactable at all.
    Vacant,
    /// Interactable torn down; its state waits here to be restored.
    Dormant(SnapshotOf<H>),
    /// Instantiated handle, active or hidden.
    Live(H),
}

impl<H: Interactable> Occupant<H> {
    fn kind(&self) -> &'static str {
        match self {
            Occupant::Vacant => "vacant",
            Occupant::Dormant(_) => "dormant",
            Occupant::Live(_) => "live",
        }
    }
}

impl<H: Interactable> std::fmt::Debug for Occupant<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Occupant::Dormant(snapshot) => f.debug_tuple("Dormant").field(snapshot).finish(),
            other => f.write_str(other.kind()),
        }
    }
}

/// How a tile reached `Loaded`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadKind {
    /// Tile owns no interactable; only layers were drawn.
    Ground,
    /// A new handle was built from the stored snapshot.
    Restored,
    /// The cached handle was reactivated.
    Reactivated,
    /// Tile was already loaded; nothing happened.
    AlreadyLoaded,
}

/// Where a tile went when it left `Loaded`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnloadKind {
    /// Handle deactivated and kept; the tile must be registered with the cache.
    Hidden,
    /// No handle to keep; tile is `Unloaded`.
    Released,
    /// Tile was not loaded; nothing happened.
    NotLoaded,
}

/// One cell of the world.
pub struct Tile<H: Interactable> {
    coord: TileCoord,
    layers: LayerStack,
    state: TileState,
    occupant: Occupant<H>,
}

impl<H: Interactable> Tile<H> {
    /// A fresh `Unloaded` tile, optionally owning an interactable in snapshot form.
    pub fn new(coord: TileCoord, layers: LayerStack, interactable: Option<SnapshotOf<H>>) -> Self {
        Self {
            coord,
            layers,
            state: TileState::Unloaded,
            occupant: match interactable {
                Some(snapshot) => Occupant::Dormant(snapshot),
                None => Occupant::Vacant,
            },
        }
    }

    pub fn coord(&self) -> TileCoord {
        self.coord
    }

    pub fn layers(&self) -> &LayerStack {
        &self.layers
    }

    pub fn state(&self) -> TileState {
        self.state
    }

    pub fn occupant(&self) -> &Occupant<H> {
        &self.occupant
    }

    pub fn has_interactable(&self) -> bool {
        !matches!(self.occupant, Occupant::Vacant)
    }

    /// Live handle, whether active or hidden.
    pub fn handle(&self) -> Option<&H> {
        match &self.occupant {
            Occupant::Live(handle) => Some(handle),
            _ => None,
        }
    }

    pub fn handle_mut(&mut self) -> Option<&mut H> {
        match &mut self.occupant {
            Occupant::Live(handle) => Some(handle),
            _ => None,
        }
    }

    /// Stored snapshot, present only while the tile is `Unloaded`.
    pub fn snapshot(&self) -> Option<&SnapshotOf<H>> {
        match &self.occupant {
            Occupant::Dormant(snapshot) => Some(snapshot),
            _ => None,
        }
    }

    /// Bring the tile to `Loaded`.
    ///
    /// The interactable is materialized before anything is drawn, so a factory
    /// failure leaves the tile untouched, snapshot included.
    pub fn load<F, V>(
        &mut self,
        factory: &mut F,
        visual: &mut V,
    ) -> Result<LoadKind, InteractableError>
    where
        F: InteractableFactory<Handle = H>,
        V: VisualGrid + ?Sized,
    {
        if self.state == TileState::Loaded {
            return Ok(LoadKind::AlreadyLoaded);
        }

        let kind = match &mut self.occupant {
            Occupant::Vacant => LoadKind::Ground,
            Occupant::Live(handle) => {
                handle.set_active(true);
                LoadKind::Reactivated
            }
            Occupant::Dormant(snapshot) => {
                let handle = factory.create(self.coord.center(), snapshot)?;
                // Replacing the occupant drops the consumed snapshot.
                self.occupant = Occupant::Live(handle);
                LoadKind::Restored
            }
        };

        self.draw(visual);
        if let Occupant::Live(handle) = &mut self.occupant {
            handle.set_position(self.coord.center());
            handle.on_tile_loaded(self.coord);
        }
        self.state = TileState::Loaded;
        Ok(kind)
    }

    /// Leave `Loaded`: erase layers, then hide the handle or release the tile.
    /// A spent handle is destroyed rather than hidden.
    pub fn unload<V: VisualGrid + ?Sized>(&mut self, visual: &mut V) -> UnloadKind {
        if self.state != TileState::Loaded {
            return UnloadKind::NotLoaded;
        }

        self.erase(visual);
        if self.has_spent_handle() {
            self.discard_handle();
            self.state = TileState::Unloaded;
            return UnloadKind::Released;
        }
        match &mut self.occupant {
            Occupant::Live(handle) => {
                handle.set_active(false);
                self.state = TileState::CachedHidden;
                UnloadKind::Hidden
            }
            Occupant::Vacant | Occupant::Dormant(_) => {
                self.state = TileState::Unloaded;
                UnloadKind::Released
            }
        }
    }

    /// Tear down a cached handle: capture its snapshot, destroy it, go `Unloaded`.
    /// A spent handle is destroyed without a snapshot and the tile goes vacant.
    ///
    /// # Panics
    /// If the tile is not `CachedHidden`. Only cache overflow or a full
    /// teardown may evict, and both only ever hold hidden tiles.
    pub fn evict(&mut self) {
        assert_eq!(
            self.state,
            TileState::CachedHidden,
            "evicting tile {} that is not cached",
            self.coord
        );
        let handle = match std::mem::replace(&mut self.occupant, Occupant::Vacant) {
            Occupant::Live(handle) => handle,
            other => panic!("cached tile {} has no live handle ({})", self.coord, other.kind()),
        };
        if handle.is_spent() {
            tracing::debug!(coord = %self.coord, "spent interactable dropped on eviction");
            handle.destroy();
            self.state = TileState::Unloaded;
            return;
        }
        let snapshot = handle.capture_snapshot();
        handle.destroy();
        tracing::trace!(coord = %self.coord, ?snapshot, "snapshot captured");
        self.occupant = Occupant::Dormant(snapshot);
        self.state = TileState::Unloaded;
    }

    /// Destroy a spent handle on a `Loaded` tile, leaving the tile vacant but
    /// still drawn. Returns whether a handle was removed.
    pub fn release_spent(&mut self) -> bool {
        if self.state != TileState::Loaded || !self.has_spent_handle() {
            return false;
        }
        self.discard_handle();
        true
    }

    fn has_spent_handle(&self) -> bool {
        matches!(&self.occupant, Occupant::Live(handle) if handle.is_spent())
    }

    fn discard_handle(&mut self) {
        match std::mem::replace(&mut self.occupant, Occupant::Vacant) {
            Occupant::Live(handle) => {
                tracing::debug!(coord = %self.coord, "spent interactable released");
                handle.destroy();
            }
            other => self.occupant = other,
        }
    }

    fn draw<V: VisualGrid + ?Sized>(&self, visual: &mut V) {
        for (layer, soil) in self.layers.occupied() {
            visual.draw_layer(layer, self.coord, soil);
        }
    }

    fn erase<V: VisualGrid + ?Sized>(&self, visual: &mut V) {
        for (layer, _) in self.layers.occupied() {
            visual.erase_layer(layer, self.coord);
        }
    }
}

impl<H: Interactable> std::fmt::Debug for Tile<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tile")
            .field("coord", &self.coord)
            .field("layers", &self.layers)
            .field("state", &self.state)
            .field("occupant", &self.occupant)
            .finish()
    }
}
