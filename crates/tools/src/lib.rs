//! Developer Tooling: stream inspector and residency checks.
//!
//! # Invariants
//! - Tools only read; inspecting a streamer never changes its state.

mod inspector;

pub use inspector::{StreamInspector, StreamSummary, TileInfo, Violation};

pub fn crate_info() -> &'static str {
    concat!("tilestream-tools v", env!("CARGO_PKG_VERSION"))
}
