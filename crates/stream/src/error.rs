use tilestream_common::TileCoord;
use tilestream_kernel::{InteractableError, WorldError};

use crate::config::ConfigError;

/// Errors surfaced by the [`Streamer`](crate::Streamer).
///
/// Out-of-bounds cells met during the window scan are skipped, never
/// reported; `World` only comes from direct per-tile calls.
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    #[error("failed to restore interactable at {coord}")]
    Restore {
        coord: TileCoord,
        #[source]
        source: InteractableError,
    },
    #[error(transparent)]
    World(#[from] WorldError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}
