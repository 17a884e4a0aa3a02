//! Minimal collaborators for kernel unit tests.

use std::cell::Cell;
use std::collections::BTreeMap;
use std::rc::Rc;

use glam::Vec2;
use tilestream_common::{GridLayer, SoilType, TileCoord};

use crate::contract::{Interactable, InteractableFactory, VisualGrid};
use crate::error::InteractableError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StubState {
    pub id: u32,
    pub hits: i64,
    pub done: bool,
}

#[derive(Debug)]
pub struct Stub {
    pub state: StubState,
    pub active: bool,
    pub position: Vec2,
    pub loads_seen: u32,
    pub spent: bool,
    pub destroyed: Option<Rc<Cell<u32>>>,
}

impl Interactable for Stub {
    type Snapshot = StubState;

    fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    fn capture_snapshot(&self) -> StubState {
        self.state.clone()
    }

    fn on_tile_loaded(&mut self, _tile: TileCoord) {
        self.loads_seen += 1;
    }

    fn is_spent(&self) -> bool {
        self.spent
    }

    fn destroy(self) {
        if let Some(count) = &self.destroyed {
            count.set(count.get() + 1);
        }
    }
}

#[derive(Debug, Default)]
pub struct StubFactory {
    pub created: u32,
    /// Shared counter handed to every stub, bumped when one is destroyed.
    pub destroyed: Option<Rc<Cell<u32>>>,
}

impl InteractableFactory for StubFactory {
    type Handle = Stub;

    fn create(
        &mut self,
        attach_point: Vec2,
        snapshot: &StubState,
    ) -> Result<Stub, InteractableError> {
        if snapshot.id == 0 {
            return Err(InteractableError::MissingIdentifier);
        }
        if snapshot.hits < 0 {
            return Err(InteractableError::NegativeCounter {
                field: "hits",
                value: snapshot.hits,
            });
        }
        self.created += 1;
        Ok(Stub {
            state: snapshot.clone(),
            active: true,
            position: attach_point,
            loads_seen: 0,
            spent: false,
            destroyed: self.destroyed.clone(),
        })
    }
}

#[derive(Debug, Default)]
pub struct MapGrid {
    pub cells: BTreeMap<(TileCoord, GridLayer), SoilType>,
}

impl VisualGrid for MapGrid {
    fn draw_layer(&mut self, layer: GridLayer, position: TileCoord, soil: SoilType) {
        self.cells.insert((position, layer), soil);
    }

    fn erase_layer(&mut self, layer: GridLayer, position: TileCoord) {
        self.cells.remove(&(position, layer));
    }
}
