use tilestream_common::TileCoord;

/// Rejections from an [`InteractableFactory`](crate::InteractableFactory).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InteractableError {
    #[error("snapshot has no identifier")]
    MissingIdentifier,
    #[error("unknown interactable kind `{0}`")]
    UnknownKind(String),
    #[error("snapshot counter `{field}` is negative ({value})")]
    NegativeCounter { field: &'static str, value: i64 },
}

/// Errors from building or addressing a [`TileWorld`](crate::TileWorld).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorldError {
    #[error("world dimensions must be non-zero, got {width}x{height}")]
    EmptyWorld { width: u32, height: u32 },
    #[error("generator produced {actual} tiles for a {width}x{height} world")]
    SeedCountMismatch { width: u32, height: u32, actual: usize },
    #[error("coordinate {0} is outside the world")]
    OutOfBounds(TileCoord),
}
