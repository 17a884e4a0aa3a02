//! Streaming: viewport window scan, FIFO eviction cache, per-tick driver.
//!
//! # Invariants
//! - Every in-bounds cell inside the window is `Loaded` after a tick.
//! - A loaded tile unloads only once it is outside the window grown by the
//!   hysteresis margin.
//! - The cache never holds more than its capacity after an insertion, and a
//!   tile is never both loaded and cached.
//! - Cached tiles keep their handle; eviction turns it back into a snapshot.
//!
//! # Workaround
//! Streaming is synchronous and single-threaded: one tick scans the window,
//! loads what is missing and unloads what drifted away, in a fixed order.

mod cache;
mod config;
mod error;
mod stats;
mod streamer;
mod window;

pub use cache::{EvictionCache, Insertion};
pub use config::{ConfigError, MAX_VIEW_RANGE, StreamConfig};
pub use error::StreamError;
pub use stats::{StreamStats, TickTimer};
pub use streamer::{Streamer, TickReport, UnloadOutcome};
pub use window::Window;

pub fn crate_info() -> &'static str {
    concat!("tilestream-stream v", env!("CARGO_PKG_VERSION"))
}
