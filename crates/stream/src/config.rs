use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Largest accepted view range on either axis.
pub const MAX_VIEW_RANGE: u32 = 4096;

/// Errors from loading or validating a [`StreamConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("cache capacity must be at least 1")]
    InvalidCapacity,
    #[error("view range {axis} = {value} exceeds {max}", max = MAX_VIEW_RANGE)]
    ViewRangeTooLarge { axis: char, value: u32 },
    #[error("hysteresis {0} must be between 1 and {max}", max = MAX_VIEW_RANGE)]
    InvalidHysteresis(u32),
}

/// Streaming configuration: window half-extents, unload margin and cache size.
///
/// Every field has a default, so a YAML file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    /// Cells loaded left and right of the viewpoint.
    pub view_range_x: u32,
    /// Cells loaded below and above the viewpoint.
    pub view_range_y: u32,
    /// Extra cells beyond the window a loaded tile may drift before it
    /// unloads. At least 1, so a viewpoint on a cell edge cannot thrash.
    pub hysteresis: u32,
    /// Maximum number of hidden tiles kept materialized.
    pub cache_capacity: usize,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            view_range_x: 12,
            view_range_y: 8,
            hysteresis: 1,
            cache_capacity: 256,
        }
    }
}

impl StreamConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a YAML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml_str(&text)?;
        tracing::debug!(path = %path.display(), ?config, "stream config loaded");
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Check ranges and return the cache capacity in its checked form.
    pub fn validate(&self) -> Result<NonZeroUsize, ConfigError> {
        if self.view_range_x > MAX_VIEW_RANGE {
            return Err(ConfigError::ViewRangeTooLarge {
                axis: 'x',
                value: self.view_range_x,
            });
        }
        if self.view_range_y > MAX_VIEW_RANGE {
            return Err(ConfigError::ViewRangeTooLarge {
                axis: 'y',
                value: self.view_range_y,
            });
        }
        check_hysteresis(self.hysteresis)?;
        NonZeroUsize::new(self.cache_capacity).ok_or(ConfigError::InvalidCapacity)
    }
}

pub(crate) fn check_hysteresis(margin: u32) -> Result<(), ConfigError> {
    if (1..=MAX_VIEW_RANGE).contains(&margin) {
        Ok(())
    } else {
        Err(ConfigError::InvalidHysteresis(margin))
    }
}
