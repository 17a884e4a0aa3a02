//! Rendering Adapter: the visual grid tiles are drawn onto.
//!
//! # Invariants
//! - The grid never reads or mutates tiles; it only records what was drawn.
//! - Draw and erase are idempotent.
//!
//! # Workaround
//! Provides an in-memory layered grid and a debug text renderer in place of a
//! real tilemap backend. Anything implementing `VisualGrid` can replace it
//! without changing the streamer.

mod grid;
mod renderer;

pub use grid::LayeredGrid;
pub use renderer::{AsciiRenderer, RenderView, Renderer};
