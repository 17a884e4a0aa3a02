use tilestream_common::{SoilType, TileCoord};
use tilestream_kernel::{InteractableFactory, TileState, VisualGrid};
use tilestream_stream::Streamer;

/// Read-only queries against a streamer for debugging and the CLI.
pub struct StreamInspector;

impl StreamInspector {
    /// Produce a summary of the streamer and its world.
    pub fn summary<F, V>(streamer: &Streamer<F, V>) -> StreamSummary
    where
        F: InteractableFactory,
        V: VisualGrid,
    {
        let world = streamer.world();
        let counts = world.state_counts();
        let snapshots = world.tiles().filter(|t| t.snapshot().is_some()).count();
        StreamSummary {
            tick: streamer.ticks(),
            viewpoint: streamer.viewpoint(),
            width: world.width(),
            height: world.height(),
            loaded: counts.loaded,
            cached_hidden: counts.cached_hidden,
            unloaded: counts.unloaded,
            live_handles: world.live_handle_count(),
            snapshots,
            cache_len: streamer.cache().len(),
            cache_capacity: streamer.cache().capacity(),
        }
    }

    /// Describe one tile, or `None` outside the world.
    pub fn inspect_tile<F, V>(streamer: &Streamer<F, V>, coord: TileCoord) -> Option<TileInfo>
    where
        F: InteractableFactory,
        V: VisualGrid,
    {
        streamer.world().tile(coord).map(|tile| TileInfo {
            coord,
            state: tile.state(),
            top_soil: tile.layers().top(),
            has_handle: tile.handle().is_some(),
            has_snapshot: tile.snapshot().is_some(),
            cached: streamer.cache().contains(coord),
        })
    }

    /// Check residency bookkeeping against tile states. Empty means consistent.
    pub fn verify<F, V>(streamer: &Streamer<F, V>) -> Vec<Violation>
    where
        F: InteractableFactory,
        V: VisualGrid,
    {
        let cache = streamer.cache();
        let mut violations = Vec::new();

        for tile in streamer.world().tiles() {
            let coord = tile.coord();
            let cached = cache.contains(coord);
            let tracked = streamer.is_loaded(coord);
            match tile.state() {
                TileState::Loaded if cached => violations.push(Violation::DoubleResidency(coord)),
                TileState::Loaded if !tracked => {
                    violations.push(Violation::UntrackedLoad(coord))
                }
                TileState::CachedHidden if !cached => {
                    violations.push(Violation::MissingFromCache(coord))
                }
                TileState::CachedHidden if tile.handle().is_none() => {
                    violations.push(Violation::CachedWithoutHandle(coord))
                }
                TileState::Unloaded if cached || tracked => {
                    violations.push(Violation::StaleEntry(coord))
                }
                TileState::Unloaded if tile.handle().is_some() => {
                    violations.push(Violation::HandleOnUnloadedTile(coord))
                }
                _ => {}
            }
        }

        if !violations.is_empty() {
            tracing::warn!(count = violations.len(), "stream invariants violated");
        }
        violations
    }
}

/// Summary of streamer state for the inspector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamSummary {
    pub tick: u64,
    pub viewpoint: Option<TileCoord>,
    pub width: u32,
    pub height: u32,
    pub loaded: usize,
    pub cached_hidden: usize,
    pub unloaded: usize,
    pub live_handles: usize,
    pub snapshots: usize,
    pub cache_len: usize,
    pub cache_capacity: usize,
}

impl std::fmt::Display for StreamSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Stream: tick={} world={}x{} loaded={} cached={} unloaded={} handles={} snapshots={} cache={}/{}",
            self.tick,
            self.width,
            self.height,
            self.loaded,
            self.cached_hidden,
            self.unloaded,
            self.live_handles,
            self.snapshots,
            self.cache_len,
            self.cache_capacity,
        )?;
        if let Some(viewpoint) = self.viewpoint {
            write!(f, " viewpoint={viewpoint}")?;
        }
        Ok(())
    }
}

/// Detailed info about a single tile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileInfo {
    pub coord: TileCoord,
    pub state: TileState,
    pub top_soil: Option<SoilType>,
    pub has_handle: bool,
    pub has_snapshot: bool,
    pub cached: bool,
}

impl std::fmt::Display for TileInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Tile {} {:?}", self.coord, self.state)?;
        if let Some(soil) = self.top_soil {
            write!(f, " soil={soil:?}")?;
        }
        if self.has_handle {
            f.write_str(" handle")?;
        }
        if self.has_snapshot {
            f.write_str(" snapshot")?;
        }
        if self.cached {
            f.write_str(" cached")?;
        }
        Ok(())
    }
}

/// A residency inconsistency found by [`StreamInspector::verify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Violation {
    #[error("tile {0} is loaded and cached at once")]
    DoubleResidency(TileCoord),
    #[error("tile {0} is loaded but not tracked by the streamer")]
    UntrackedLoad(TileCoord),
    #[error("tile {0} is cached-hidden but not in the cache")]
    MissingFromCache(TileCoord),
    #[error("tile {0} is cached-hidden without a live handle")]
    CachedWithoutHandle(TileCoord),
    #[error("tile {0} is unloaded but still tracked as resident")]
    StaleEntry(TileCoord),
    #[error("tile {0} is unloaded but holds a live handle")]
    HandleOnUnloadedTile(TileCoord),
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use tilestream_common::GridLayer;
    use tilestream_interact::{TreeFactory, TreeSnapshot, WoodTree};
    use tilestream_kernel::{LayerStack, TileSeed, TileWorld};
    use tilestream_render::LayeredGrid;
    use tilestream_stream::StreamConfig;

    fn streamer() -> Streamer<TreeFactory, LayeredGrid> {
        let tree = TileCoord::new(1, 0);
        let seeds = (0..12)
            .map(|x| TileSeed {
                layers: LayerStack::with(GridLayer::Ground, SoilType::ForestGrass),
                interactable: (TileCoord::new(x, 0) == tree)
                    .then(|| TreeSnapshot::standing("birch", 2)),
            })
            .collect();
        let world: TileWorld<WoodTree> = TileWorld::from_seeds(12, 1, seeds).unwrap();
        let config = StreamConfig {
            view_range_x: 1,
            view_range_y: 0,
            hysteresis: 1,
            cache_capacity: 2,
        };
        Streamer::new(world, TreeFactory::default(), LayeredGrid::new(), config).unwrap()
    }

    #[test]
    fn summary_fresh_streamer() {
        let s = streamer();
        let summary = StreamInspector::summary(&s);
        assert_eq!(summary.tick, 0);
        assert_eq!(summary.loaded, 0);
        assert_eq!(summary.unloaded, 12);
        assert_eq!(summary.snapshots, 1);
        assert_eq!(summary.live_handles, 0);
        assert_eq!(summary.cache_capacity, 2);
        assert!(summary.viewpoint.is_none());
    }

    #[test]
    fn summary_after_caching() {
        let mut s = streamer();
        s.tick(Vec2::new(1.5, 0.5)).unwrap();
        s.tick(Vec2::new(9.5, 0.5)).unwrap();

        let summary = StreamInspector::summary(&s);
        assert_eq!(summary.tick, 2);
        assert_eq!(summary.loaded, 3);
        assert_eq!(summary.cached_hidden, 1);
        assert_eq!(summary.live_handles, 1);
        assert_eq!(summary.snapshots, 0);
        assert_eq!(summary.viewpoint, Some(TileCoord::new(9, 0)));
    }

    #[test]
    fn inspect_tile_found() {
        let mut s = streamer();
        s.tick(Vec2::new(1.5, 0.5)).unwrap();

        let info = StreamInspector::inspect_tile(&s, TileCoord::new(1, 0)).unwrap();
        assert_eq!(info.state, TileState::Loaded);
        assert_eq!(info.top_soil, Some(SoilType::ForestGrass));
        assert!(info.has_handle);
        assert!(!info.cached);
    }

    #[test]
    fn inspect_tile_outside_world() {
        let s = streamer();
        assert!(StreamInspector::inspect_tile(&s, TileCoord::new(-1, 0)).is_none());
    }

    #[test]
    fn verify_clean_after_walk() {
        let mut s = streamer();
        for x in 0..12 {
            s.tick(Vec2::new(x as f32, 0.0)).unwrap();
            assert!(StreamInspector::verify(&s).is_empty());
        }
        for x in (0..12).rev() {
            s.tick(Vec2::new(x as f32, 0.0)).unwrap();
            assert!(StreamInspector::verify(&s).is_empty());
        }
        s.unload_all();
        assert!(StreamInspector::verify(&s).is_empty());
    }

    #[test]
    fn summary_display() {
        let mut s = streamer();
        s.tick(Vec2::new(4.0, 0.0)).unwrap();
        let text = StreamInspector::summary(&s).to_string();
        assert!(text.contains("tick=1"));
        assert!(text.contains("viewpoint=(4, 0)"));
    }

    #[test]
    fn violation_messages_name_the_tile() {
        let v = Violation::DoubleResidency(TileCoord::new(3, 4));
        assert_eq!(v.to_string(), "tile (3, 4) is loaded and cached at once");
    }
}
