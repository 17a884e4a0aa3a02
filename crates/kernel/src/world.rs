use tilestream_common::TileCoord;

use crate::contract::{Generator, Interactable, SnapshotOf, TileSeed};
use crate::error::WorldError;
use crate::tile::{Tile, TileState};

/// The authoritative, finite tile grid.
///
/// Owned by exactly one streamer; there is no shared or global grid. Tiles are
/// stored row-major (`y * width + x`) and the dimensions never change after
/// construction.
pub struct TileWorld<H: Interactable> {
    width: u32,
    height: u32,
    tiles: Vec<Tile<H>>,
}

/// Number of tiles in each lifecycle state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StateCounts {
    pub unloaded: usize,
    pub loaded: usize,
    pub cached_hidden: usize,
}

impl<H: Interactable> TileWorld<H> {
    /// Build a world from generator seeds in row-major order.
    pub fn from_seeds(
        width: u32,
        height: u32,
        seeds: Vec<TileSeed<SnapshotOf<H>>>,
    ) -> Result<Self, WorldError> {
        if width == 0 || height == 0 {
            return Err(WorldError::EmptyWorld { width, height });
        }
        if seeds.len() != width as usize * height as usize {
            return Err(WorldError::SeedCountMismatch {
                width,
                height,
                actual: seeds.len(),
            });
        }

        let tiles = seeds
            .into_iter()
            .enumerate()
            .map(|(i, seed)| {
                let coord =
                    TileCoord::new((i % width as usize) as i32, (i / width as usize) as i32);
                Tile::new(coord, seed.layers, seed.interactable)
            })
            .collect();

        Ok(Self {
            width,
            height,
            tiles,
        })
    }

    /// Run a generator once and build the world from its output.
    pub fn generate<G>(width: u32, height: u32, generator: &mut G) -> Result<Self, WorldError>
    where
        G: Generator<Snapshot = SnapshotOf<H>>,
    {
        let _span = tracing::info_span!("world_generate", width, height).entered();
        let seeds = generator.generate(width, height);
        let world = Self::from_seeds(width, height, seeds)?;
        tracing::debug!(
            tiles = world.tiles.len(),
            interactables = world.interactable_count(),
            "world generated"
        );
        Ok(world)
    }

    /// A world of bare tiles: no layers, no interactables.
    pub fn empty(width: u32, height: u32) -> Result<Self, WorldError> {
        let seeds = (0..width as usize * height as usize)
            .map(|_| TileSeed::default())
            .collect();
        Self::from_seeds(width, height, seeds)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Inclusive lower bound, exclusive upper bound, on both axes.
    pub fn contains(&self, coord: TileCoord) -> bool {
        coord.x >= 0
            && coord.y >= 0
            && (coord.x as i64) < self.width as i64
            && (coord.y as i64) < self.height as i64
    }

    fn index(&self, coord: TileCoord) -> Option<usize> {
        self.contains(coord)
            .then(|| coord.y as usize * self.width as usize + coord.x as usize)
    }

    pub fn tile(&self, coord: TileCoord) -> Option<&Tile<H>> {
        self.index(coord).map(|i| &self.tiles[i])
    }

    pub fn tile_mut(&mut self, coord: TileCoord) -> Option<&mut Tile<H>> {
        self.index(coord).map(|i| &mut self.tiles[i])
    }

    /// Like [`tile`](Self::tile), but out-of-range coordinates are an error.
    pub fn try_tile(&self, coord: TileCoord) -> Result<&Tile<H>, WorldError> {
        self.tile(coord).ok_or(WorldError::OutOfBounds(coord))
    }

    pub fn try_tile_mut(&mut self, coord: TileCoord) -> Result<&mut Tile<H>, WorldError> {
        self.tile_mut(coord).ok_or(WorldError::OutOfBounds(coord))
    }

    /// All tiles, row-major.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile<H>> {
        self.tiles.iter()
    }

    pub fn tiles_mut(&mut self) -> impl Iterator<Item = &mut Tile<H>> {
        self.tiles.iter_mut()
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    pub fn interactable_count(&self) -> usize {
        self.tiles.iter().filter(|t| t.has_interactable()).count()
    }

    /// Tiles currently holding an instantiated handle (active or hidden).
    pub fn live_handle_count(&self) -> usize {
        self.tiles.iter().filter(|t| t.handle().is_some()).count()
    }

    pub fn state_counts(&self) -> StateCounts {
        let mut counts = StateCounts::default();
        for tile in &self.tiles {
            match tile.state() {
                TileState::Unloaded => counts.unloaded += 1,
                TileState::Loaded => counts.loaded += 1,
                TileState::CachedHidden => counts.cached_hidden += 1,
            }
        }
        counts
    }
}

impl<H: Interactable> std::fmt::Debug for TileWorld<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TileWorld")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("states", &self.state_counts())
            .finish()
    }
}
