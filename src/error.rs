use std::{io, path::PathBuf};

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Everything that can stop a run. None of these are recovered from: a run
/// either produces statistics over every record or it produces nothing.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to open {}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to map {} into memory", path.display())]
    Map {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The line starting at `offset` is not `<key>;[-]d[d].d`.
    #[error("malformed record at byte offset {offset}")]
    MalformedRecord { offset: usize },

    /// More distinct keys than the table has slots.
    #[error("aggregation table is full ({capacity} slots)")]
    TableFull { capacity: usize },

    #[error("a worker thread panicked")]
    WorkerPanicked,

    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
}
