use std::collections::VecDeque;
use std::time::Duration;

/// Per-tick streaming statistics for instrumentation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamStats {
    pub tick: u64,
    pub tiles_loaded_this_tick: usize,
    pub tiles_unloaded_this_tick: usize,
    /// Unloaded tiles that went into the cache rather than straight to `Unloaded`.
    pub tiles_cached_this_tick: usize,
    pub tiles_evicted_this_tick: usize,
    pub total_loaded_tiles: usize,
    pub cache_size: usize,
    pub tick_time: Duration,
}

/// Rolling window of recent tick durations.
#[derive(Debug, Clone)]
pub struct TickTimer {
    samples: VecDeque<Duration>,
    window: usize,
}

impl TickTimer {
    /// Keep the last `window` samples. A zero window keeps one.
    pub fn new(window: usize) -> Self {
        let window = window.max(1);
        Self {
            samples: VecDeque::with_capacity(window),
            window,
        }
    }

    pub fn record(&mut self, dt: Duration) {
        if self.samples.len() == self.window {
            self.samples.pop_front();
        }
        self.samples.push_back(dt);
    }

    pub fn average(&self) -> Duration {
        if self.samples.is_empty() {
            return Duration::ZERO;
        }
        self.samples.iter().sum::<Duration>() / self.samples.len() as u32
    }

    pub fn max(&self) -> Duration {
        self.samples.iter().copied().max().unwrap_or(Duration::ZERO)
    }

    pub fn min(&self) -> Duration {
        self.samples.iter().copied().min().unwrap_or(Duration::ZERO)
    }

    pub fn count(&self) -> usize {
        self.samples.len()
    }
}
