use std::num::NonZeroUsize;

use clap::ValueEnum;

use crate::{
    error::{Error, Result},
    table::DEFAULT_CAPACITY,
};

/// Used when the host can't tell us how many threads it has.
pub const FALLBACK_WORKERS: usize = 4;

/// How the input gets aggregated. All of them produce the same [`crate::Summary`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Strategy {
    /// One thread, `FxHashMap` keyed by slices. Slow but obviously right.
    Baseline,
    /// One thread, one fixed-capacity table.
    Single,
    /// One table per worker over record-aligned chunks, merged at the end.
    #[default]
    Parallel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Number of chunks, and threads, for [`Strategy::Parallel`].
    pub workers: usize,
    /// Slots per aggregation table. Has to be larger than the number of distinct keys.
    pub capacity: usize,
    pub strategy: Strategy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            capacity: DEFAULT_CAPACITY,
            strategy: Strategy::default(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(Error::InvalidConfig("worker count must be at least 1"));
        }
        Ok(())
    }
}

pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(FALLBACK_WORKERS)
}
