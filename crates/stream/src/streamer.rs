use std::collections::BTreeSet;
use std::num::NonZeroUsize;
use std::time::Instant;

use glam::Vec2;
use tilestream_common::TileCoord;
use tilestream_kernel::{
    InteractableFactory, LoadKind, TileState, TileWorld, UnloadKind, VisualGrid, WorldError,
};

use crate::cache::{EvictionCache, Insertion};
use crate::config::{ConfigError, MAX_VIEW_RANGE, StreamConfig, check_hysteresis};
use crate::error::StreamError;
use crate::stats::StreamStats;
use crate::window::Window;

/// Cells touched by one tick (or one teardown), in the order they were handled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    pub loaded: Vec<TileCoord>,
    pub unloaded: Vec<TileCoord>,
    /// Cached tiles torn down to make room, in eviction order.
    pub evicted: Vec<TileCoord>,
    /// Loaded tiles whose interactable was spent and has been removed.
    pub cleared: Vec<TileCoord>,
}

/// What happened to a tile taken out of `Loaded`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnloadOutcome {
    pub kind: UnloadKind,
    pub evicted: Vec<TileCoord>,
}

/// Per-tick driver: loads the window around the viewpoint and unloads tiles
/// that drift out of the window plus its hysteresis margin.
///
/// Owns the world, the eviction cache and both collaborators outright. All
/// state changes happen synchronously inside [`tick`](Self::tick) or the
/// explicit per-tile calls.
pub struct Streamer<F: InteractableFactory, V: VisualGrid> {
    world: TileWorld<F::Handle>,
    cache: EvictionCache,
    factory: F,
    visual: V,
    config: StreamConfig,
    loaded: BTreeSet<TileCoord>,
    viewpoint: Option<TileCoord>,
    stats: StreamStats,
    ticks: u64,
}

impl<F: InteractableFactory, V: VisualGrid> Streamer<F, V> {
    pub fn new(
        world: TileWorld<F::Handle>,
        factory: F,
        visual: V,
        config: StreamConfig,
    ) -> Result<Self, StreamError> {
        let capacity = config.validate()?;
        tracing::debug!(
            width = world.width(),
            height = world.height(),
            ?config,
            "streamer created"
        );
        Ok(Self {
            world,
            cache: EvictionCache::new(capacity),
            factory,
            visual,
            config,
            loaded: BTreeSet::new(),
            viewpoint: None,
            stats: StreamStats::default(),
            ticks: 0,
        })
    }

    /// Run one streaming pass for a viewpoint in world space.
    ///
    /// Spent interactables on loaded tiles are removed first. Loads follow,
    /// in row-major window order, then unloads in coordinate order. Cells
    /// outside the world are skipped.
    ///
    /// A tile whose snapshot fails to restore stays `Unloaded` and is retried
    /// next tick. The rest of the window still loads and the unload pass
    /// still runs; the first such failure is returned once the tick is done.
    pub fn tick(&mut self, viewpoint: Vec2) -> Result<TickReport, StreamError> {
        self.ticks += 1;
        let _span = tracing::info_span!("stream_tick", tick = self.ticks).entered();
        let started = Instant::now();

        let center = TileCoord::from_position(viewpoint);
        self.viewpoint = Some(center);
        let window = Window::new(center, self.config.view_range_x, self.config.view_range_y);
        let mut report = TickReport {
            cleared: self.release_spent(),
            ..TickReport::default()
        };

        let mut failure = None;
        for target in window.cells() {
            let Some(tile) = self.world.tile(target) else {
                continue;
            };
            if tile.state() == TileState::Loaded {
                continue;
            }
            match self.load_tile(target) {
                Ok(_) => report.loaded.push(target),
                Err(err) => {
                    tracing::warn!(coord = %target, error = %err, "tile failed to load");
                    failure.get_or_insert(err);
                }
            }
        }

        let stale: Vec<TileCoord> = self
            .loaded
            .iter()
            .copied()
            .filter(|c| !window.within(*c, self.config.hysteresis))
            .collect();
        let mut cached = 0;
        for coord in stale {
            let outcome = self.unload_in_bounds(coord);
            if outcome.kind == UnloadKind::Hidden {
                cached += 1;
            }
            report.unloaded.push(coord);
            report.evicted.extend(outcome.evicted);
        }

        self.stats = StreamStats {
            tick: self.ticks,
            tiles_loaded_this_tick: report.loaded.len(),
            tiles_unloaded_this_tick: report.unloaded.len(),
            tiles_cached_this_tick: cached,
            tiles_evicted_this_tick: report.evicted.len(),
            total_loaded_tiles: self.loaded.len(),
            cache_size: self.cache.len(),
            tick_time: started.elapsed(),
        };

        tracing::trace!(
            loaded = report.loaded.len(),
            unloaded = report.unloaded.len(),
            cached,
            evicted = report.evicted.len(),
            cleared = report.cleared.len(),
            total = self.loaded.len(),
            "stream tick complete"
        );

        match failure {
            Some(err) => Err(err),
            None => Ok(report),
        }
    }

    /// Remove spent interactables from loaded tiles. Returns their cells.
    pub fn release_spent(&mut self) -> Vec<TileCoord> {
        let mut released = Vec::new();
        for &coord in &self.loaded {
            let Some(tile) = self.world.tile_mut(coord) else {
                continue;
            };
            if tile.release_spent() {
                released.push(coord);
            }
        }
        released
    }

    /// Bring one tile to `Loaded`, promoting it out of the cache if it is there.
    ///
    /// # Panics
    /// If the tile is both `Loaded` and resident in the cache.
    pub fn load_tile(&mut self, coord: TileCoord) -> Result<LoadKind, StreamError> {
        let tile = self.world.try_tile_mut(coord)?;
        let resident = self.cache.contains(coord);
        assert!(
            !(resident && tile.state() == TileState::Loaded),
            "tile {coord} is loaded and cached at once"
        );
        debug_assert_eq!(resident, tile.state() == TileState::CachedHidden);

        let kind = tile
            .load(&mut self.factory, &mut self.visual)
            .map_err(|source| StreamError::Restore { coord, source })?;
        if resident {
            self.cache.remove(coord);
        }
        self.loaded.insert(coord);
        tracing::debug!(%coord, ?kind, "loading tile");
        Ok(kind)
    }

    /// Take one tile out of `Loaded`. A tile with a handle is hidden and
    /// cached, which may evict older cached tiles.
    pub fn unload_tile(&mut self, coord: TileCoord) -> Result<UnloadOutcome, StreamError> {
        if !self.world.contains(coord) {
            return Err(WorldError::OutOfBounds(coord).into());
        }
        Ok(self.unload_in_bounds(coord))
    }

    fn unload_in_bounds(&mut self, coord: TileCoord) -> UnloadOutcome {
        let Some(tile) = self.world.tile_mut(coord) else {
            panic!("unloading {coord} outside the world");
        };
        let kind = tile.unload(&mut self.visual);
        self.loaded.remove(&coord);

        let mut evicted = Vec::new();
        match kind {
            UnloadKind::Hidden => {
                tracing::debug!(%coord, "caching tile");
                if let Insertion::Added { evicted: out } = self.cache.insert(coord) {
                    for victim in out {
                        self.evict_tile(victim);
                        evicted.push(victim);
                    }
                }
            }
            UnloadKind::Released => tracing::debug!(%coord, "tile unloaded"),
            UnloadKind::NotLoaded => {}
        }
        UnloadOutcome { kind, evicted }
    }

    fn evict_tile(&mut self, coord: TileCoord) {
        let Some(tile) = self.world.tile_mut(coord) else {
            panic!("cached coordinate {coord} outside the world");
        };
        tracing::debug!(%coord, "evicting tile");
        tile.evict();
    }

    /// Unload every loaded tile, then tear down everything in the cache.
    ///
    /// Afterwards no layer is drawn and no handle is live; every interactable
    /// is back in snapshot form.
    pub fn unload_all(&mut self) -> TickReport {
        let _span = tracing::info_span!("stream_unload_all").entered();
        let mut report = TickReport::default();

        let loaded: Vec<TileCoord> = self.loaded.iter().copied().collect();
        for coord in loaded {
            let outcome = self.unload_in_bounds(coord);
            report.unloaded.push(coord);
            report.evicted.extend(outcome.evicted);
        }
        let cached: Vec<TileCoord> = self.cache.drain().collect();
        for coord in cached {
            self.evict_tile(coord);
            report.evicted.push(coord);
        }

        tracing::debug!(
            unloaded = report.unloaded.len(),
            evicted = report.evicted.len(),
            "world torn down"
        );
        report
    }

    /// Change the cache limit. Takes effect on the next insertion.
    pub fn set_cache_capacity(&mut self, capacity: NonZeroUsize) {
        self.cache.set_capacity(capacity);
        self.config.cache_capacity = capacity.get();
    }

    /// Change the window half-extents. Takes effect on the next tick.
    pub fn set_view_range(&mut self, range_x: u32, range_y: u32) -> Result<(), StreamError> {
        for (axis, value) in [('x', range_x), ('y', range_y)] {
            if value > MAX_VIEW_RANGE {
                return Err(ConfigError::ViewRangeTooLarge { axis, value }.into());
            }
        }
        self.config.view_range_x = range_x;
        self.config.view_range_y = range_y;
        Ok(())
    }

    /// Change the unload margin. Takes effect on the next tick.
    pub fn set_hysteresis(&mut self, margin: u32) -> Result<(), StreamError> {
        check_hysteresis(margin)?;
        self.config.hysteresis = margin;
        Ok(())
    }

    pub fn world(&self) -> &TileWorld<F::Handle> {
        &self.world
    }

    pub fn cache(&self) -> &EvictionCache {
        &self.cache
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    pub fn visual(&self) -> &V {
        &self.visual
    }

    pub fn config(&self) -> &StreamConfig {
        &self.config
    }

    /// Coordinates of `Loaded` tiles, in coordinate order.
    pub fn loaded(&self) -> &BTreeSet<TileCoord> {
        &self.loaded
    }

    pub fn is_loaded(&self, coord: TileCoord) -> bool {
        self.loaded.contains(&coord)
    }

    /// Viewpoint cell of the last tick.
    pub fn viewpoint(&self) -> Option<TileCoord> {
        self.viewpoint
    }

    pub fn stats(&self) -> &StreamStats {
        &self.stats
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Live handle at a cell, active or hidden.
    pub fn handle(&self, coord: TileCoord) -> Option<&F::Handle> {
        self.world.tile(coord).and_then(|t| t.handle())
    }

    /// Mutable live handle, for actions that change interactable state.
    pub fn handle_mut(&mut self, coord: TileCoord) -> Option<&mut F::Handle> {
        self.world.tile_mut(coord).and_then(|t| t.handle_mut())
    }

    /// Active handles of loaded tiles, in coordinate order.
    pub fn active_handles_mut(&mut self) -> impl Iterator<Item = (TileCoord, &mut F::Handle)> {
        let loaded = &self.loaded;
        self.world
            .tiles_mut()
            .filter(move |t| loaded.contains(&t.coord()))
            .filter_map(|t| {
                let coord = t.coord();
                t.handle_mut().map(|h| (coord, h))
            })
    }
}
