use std::hint::black_box;
use std::num::NonZeroUsize;
use std::time::Instant;

use glam::Vec2;
use tilestream_interact::{ForestGenerator, TreeFactory, WoodTree};
use tilestream_kernel::TileWorld;
use tilestream_render::LayeredGrid;
use tilestream_stream::{StreamConfig, Streamer};

fn make_streamer(side: u32, config: StreamConfig) -> Streamer<TreeFactory, LayeredGrid> {
    let mut generator = ForestGenerator::new(7);
    let world: TileWorld<WoodTree> =
        TileWorld::generate(side, side, &mut generator).expect("world generates");
    Streamer::new(world, TreeFactory::default(), LayeredGrid::new(), config)
        .expect("config is valid")
}

fn bench_walk(side: u32, range: u32, iterations: usize) {
    let config = StreamConfig {
        view_range_x: range,
        view_range_y: range,
        ..StreamConfig::default()
    };
    let mut streamer = make_streamer(side, config);

    let start = Instant::now();
    for i in 0..iterations {
        // Walk back and forth along the middle row.
        let step = (i % (side as usize * 2)) as f32;
        let x = if step < side as f32 { step } else { side as f32 * 2.0 - step };
        let _ = black_box(streamer.tick(black_box(Vec2::new(x, side as f32 / 2.0))));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  walk ({side}x{side}, r={range}, {iterations} ticks): {per_iter:?}/tick, total {elapsed:?}"
    );
}

fn bench_still(side: u32, range: u32, iterations: usize) {
    let config = StreamConfig {
        view_range_x: range,
        view_range_y: range,
        ..StreamConfig::default()
    };
    let mut streamer = make_streamer(side, config);
    let center = Vec2::splat(side as f32 / 2.0);
    let _ = streamer.tick(center);

    let start = Instant::now();
    for _ in 0..iterations {
        let _ = black_box(streamer.tick(black_box(center)));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  steady state ({side}x{side}, r={range}, {iterations} ticks): {per_iter:?}/tick, total {elapsed:?}"
    );
}

fn bench_teleport(side: u32, capacity: usize, iterations: usize) {
    let mut streamer = make_streamer(side, StreamConfig::default());
    if let Some(capacity) = NonZeroUsize::new(capacity) {
        streamer.set_cache_capacity(capacity);
    }

    let start = Instant::now();
    for i in 0..iterations {
        let corner = if i % 2 == 0 { 0.0 } else { side as f32 - 1.0 };
        let _ = black_box(streamer.tick(black_box(Vec2::splat(corner))));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  teleport ({side}x{side}, cache={capacity}, {iterations} ticks): {per_iter:?}/tick, total {elapsed:?}"
    );
}

fn main() {
    println!("=== Stream Walk Benchmarks ===\n");

    println!("Walking viewpoint:");
    bench_walk(128, 8, 1000);
    bench_walk(512, 12, 1000);
    bench_walk(512, 32, 200);

    println!("\nStationary viewpoint:");
    bench_still(256, 12, 10000);
    bench_still(256, 32, 1000);

    println!("\nTeleporting between corners (cache churn):");
    bench_teleport(256, 16, 200);
    bench_teleport(256, 1024, 200);

    println!("\n=== Done ===");
}
