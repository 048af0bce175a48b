//! Min/mean/max per key over huge `<key>;<value>` files.
//!
//! The input is memory-mapped, split into record-aligned chunks, and each chunk is scanned by
//! its own thread into its own fixed-capacity open-addressing table keyed by slices of the map.
//! The tables are merged once every thread is done and the result is sorted by key bytes.

pub mod aggregate;
pub mod buffer;
pub mod config;
pub mod error;
pub mod parse;
pub mod partition;
pub mod reference;
pub mod report;
pub mod scan;
pub mod table;

pub use aggregate::summarize;
pub use buffer::RawBuffer;
pub use config::{Config, Strategy};
pub use error::{Error, Result};
pub use report::{Station, Summary};
