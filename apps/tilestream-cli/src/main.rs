use std::collections::BTreeSet;
use std::num::NonZeroUsize;
use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use glam::Vec2;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use tilestream_common::TileCoord;
use tilestream_interact::{ChopOutcome, ForestGenerator, TreeFactory, TreeSnapshot, WoodTree};
use tilestream_kernel::{LayerStack, TileSeed, TileWorld};
use tilestream_render::{AsciiRenderer, LayeredGrid, RenderView, Renderer};
use tilestream_stream::{StreamConfig, StreamStats, Streamer, TickTimer};
use tilestream_tools::StreamInspector;

type ForestStreamer = Streamer<TreeFactory, LayeredGrid>;

#[derive(Parser)]
#[command(name = "tilestream-cli", about = "CLI tool for tile streaming")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version, crate info and the default stream config
    Info,
    /// Walk a viewpoint across a generated forest and report stream stats
    Walk {
        /// World width in tiles
        #[arg(long, default_value = "128")]
        width: u32,
        /// World height in tiles
        #[arg(long, default_value = "64")]
        height: u32,
        /// Number of ticks to simulate
        #[arg(short, long, default_value = "200")]
        ticks: u64,
        /// Generator seed
        #[arg(short, long, default_value = "42")]
        seed: u64,
        /// Viewpoint speed in tiles per tick
        #[arg(long, default_value = "0.5")]
        speed: f32,
        /// YAML stream config
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Override the cache capacity from the config
        #[arg(long)]
        cache: Option<NonZeroUsize>,
        /// Print per-tick stats as JSON lines
        #[arg(long)]
        json: bool,
        /// Print the visible grid after the last tick
        #[arg(long)]
        render: bool,
    },
    /// Chop a tree, walk away until it is evicted, come back and check its health
    Scenario {
        /// Hits dealt before walking away
        #[arg(long, default_value = "2")]
        hits: u32,
    },
}

/// One line of `walk --json` output.
#[derive(Serialize)]
struct TickRecord {
    tick: u64,
    viewpoint: TileCoord,
    loaded: usize,
    unloaded: usize,
    cached: usize,
    evicted: usize,
    total_loaded: usize,
    cache_size: usize,
    tick_us: u128,
}

impl TickRecord {
    fn new(stats: &StreamStats, viewpoint: TileCoord) -> Self {
        Self {
            tick: stats.tick,
            viewpoint,
            loaded: stats.tiles_loaded_this_tick,
            unloaded: stats.tiles_unloaded_this_tick,
            cached: stats.tiles_cached_this_tick,
            evicted: stats.tiles_evicted_this_tick,
            total_loaded: stats.total_loaded_tiles,
            cache_size: stats.cache_size,
            tick_us: stats.tick_time.as_micros(),
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .init();

    match cli.command {
        Commands::Info => {
            println!("tilestream-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("stream: {}", tilestream_stream::crate_info());
            println!("tools: {}", tilestream_tools::crate_info());
            println!("default config:");
            print!("{}", StreamConfig::default().to_yaml()?);
        }
        Commands::Walk {
            width,
            height,
            ticks,
            seed,
            speed,
            config,
            cache,
            json,
            render,
        } => {
            let mut config = match config {
                Some(path) => StreamConfig::load(&path)
                    .with_context(|| format!("loading {}", path.display()))?,
                None => StreamConfig::default(),
            };
            if let Some(cache) = cache {
                config.cache_capacity = cache.get();
            }
            walk(width, height, ticks, seed, speed, config, json, render)?;
        }
        Commands::Scenario { hits } => scenario(hits)?,
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn walk(
    width: u32,
    height: u32,
    ticks: u64,
    seed: u64,
    speed: f32,
    config: StreamConfig,
    json: bool,
    render: bool,
) -> anyhow::Result<()> {
    let mut generator = ForestGenerator::new(seed);
    let world: TileWorld<WoodTree> = TileWorld::generate(width, height, &mut generator)?;
    let view = (config.view_range_x, config.view_range_y);
    let mut streamer = Streamer::new(world, TreeFactory::default(), LayeredGrid::new(), config)?;
    tracing::info!(width, height, seed, ticks, "walk started");

    let mut timer = TickTimer::new(60);
    let mut last = Vec2::ZERO;
    for tick in 0..ticks {
        last = sweep(tick, speed, width, height);
        streamer.tick(last)?;
        let stats = streamer.stats();
        timer.record(stats.tick_time);
        if json {
            let record = TickRecord::new(stats, TileCoord::from_position(last));
            println!("{}", serde_json::to_string(&record)?);
        }
    }

    let violations = StreamInspector::verify(&streamer);
    if let Some(first) = violations.first() {
        bail!("{} stream violations, first: {first}", violations.len());
    }

    if render {
        print!("{}", render_view(&streamer, TileCoord::from_position(last), view));
    }
    if !json {
        println!("{}", StreamInspector::summary(&streamer));
        println!(
            "tick time: avg={:?} min={:?} max={:?} (last {} ticks)",
            timer.average(),
            timer.min(),
            timer.max(),
            timer.count()
        );
    }

    let report = streamer.unload_all();
    tracing::info!(evicted = report.evicted.len(), "walk finished");
    Ok(())
}

/// Viewpoint for a tick: bounce left and right along a row that drifts upward.
fn sweep(tick: u64, speed: f32, width: u32, height: u32) -> Vec2 {
    let travel = tick as f32 * speed;
    let span = width.max(1) as f32;
    let lap = (travel / span).floor();
    let along = travel - lap * span;
    let x = if lap as u64 % 2 == 0 { along } else { span - along };
    let y = (lap * 4.0) % height.max(1) as f32;
    Vec2::new(x, y + 0.5)
}

fn render_view(streamer: &ForestStreamer, center: TileCoord, (rx, ry): (u32, u32)) -> String {
    let trees: BTreeSet<TileCoord> = streamer
        .loaded()
        .iter()
        .copied()
        .filter(|c| streamer.handle(*c).is_some())
        .collect();
    let renderer = AsciiRenderer::with_overlay(move |coord| {
        if coord == center {
            Some('@')
        } else if trees.contains(&coord) {
            Some('T')
        } else {
            None
        }
    });
    renderer.render(streamer.visual(), &RenderView::centered(center, rx + 1, ry + 1))
}

fn scenario(hits: u32) -> anyhow::Result<()> {
    let tree = TileCoord::new(5, 5);
    let decoy = TileCoord::new(14, 5);
    let seeds = (0..10)
        .flat_map(|y| (0..24).map(move |x| TileCoord::new(x, y)))
        .map(|c| TileSeed {
            layers: LayerStack::default(),
            interactable: (c == tree || c == decoy).then(|| TreeSnapshot::standing("pine", 4)),
        })
        .collect();
    let world: TileWorld<WoodTree> = TileWorld::from_seeds(24, 10, seeds)?;
    let config = StreamConfig {
        view_range_x: 1,
        view_range_y: 1,
        hysteresis: 1,
        cache_capacity: 1,
    };
    let mut streamer = Streamer::new(world, TreeFactory::default(), LayeredGrid::new(), config)?;

    streamer.tick(tree.center())?;
    for _ in 0..hits {
        let handle = streamer
            .handle_mut(tree)
            .context("tree handle missing after load")?;
        if let ChopOutcome::Felled | ChopOutcome::Cleared = handle.chop() {
            println!("tree came down early");
        }
        handle.tick(5.0);
    }
    let before = streamer.handle(tree).context("tree handle missing")?.health();
    println!("chopped {hits} times: health={before}");

    streamer.tick(decoy.center())?;
    let hidden = StreamInspector::inspect_tile(&streamer, tree).context("tile")?;
    println!("walked away: {hidden}");
    let report = streamer.tick(TileCoord::new(22, 5).center())?;
    let evicted = StreamInspector::inspect_tile(&streamer, tree).context("tile")?;
    println!("evicted {:?}: {evicted}", report.evicted);

    streamer.tick(tree.center())?;
    let after = streamer.handle(tree).context("tree handle missing after reload")?.health();
    println!("came back: health={after}");

    if before != after {
        bail!("health changed across eviction: {before} -> {after}");
    }
    println!("OK");
    Ok(())
}
