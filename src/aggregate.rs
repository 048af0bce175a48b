use std::{ops::Range, time::Instant};

use tracing::{debug, info};

use crate::{
    config::{Config, Strategy},
    error::{Error, Result},
    partition::partition,
    reference,
    report::Summary,
    scan::Scanner,
    table::AggTable,
};

/// Aggregate `bytes` the way `config` says to.
pub fn summarize(bytes: &[u8], config: &Config) -> Result<Summary> {
    config.validate()?;
    let begin = Instant::now();
    let summary = match config.strategy {
        Strategy::Baseline => reference::aggregate(bytes)?,
        Strategy::Single => single(bytes, config.capacity)?,
        Strategy::Parallel => parallel(bytes, config.workers, config.capacity)?,
    };
    info!(
        strategy = ?config.strategy,
        stations = summary.len(),
        records = summary.records(),
        elapsed_ms = begin.elapsed().as_millis() as u64,
        "aggregated input"
    );
    Ok(summary)
}

/// One worker's job: scan its chunk into its own fresh table.
pub fn process_chunk(bytes: &[u8], chunk: Range<usize>, capacity: usize) -> Result<AggTable<'_>> {
    let mut table = AggTable::with_capacity(capacity);
    for record in Scanner::new(bytes, chunk) {
        let record = record?;
        table.upsert(record.key, record.hash, record.value)?;
    }
    Ok(table)
}

pub fn single(bytes: &[u8], capacity: usize) -> Result<Summary> {
    Ok(process_chunk(bytes, 0..bytes.len(), capacity)?.into_summary())
}

/// Split into `workers` record-aligned chunks, give each one a thread and a private table,
/// join them all, then fold every table into the first.
///
/// The threads only ever read `bytes`, and every table belongs to exactly one thread until the
/// join, so there's nothing to lock. If any worker fails or panics the whole run fails.
pub fn parallel(bytes: &[u8], workers: usize, capacity: usize) -> Result<Summary> {
    let chunks = partition(bytes, workers);

    let begin = Instant::now();
    let tables = crossbeam::thread::scope(|scope| {
        chunks
            .into_iter()
            .map(|chunk| scope.spawn(move |_| process_chunk(bytes, chunk, capacity)))
            .collect::<Vec<_>>() // note: we collect here to eagerly spin up the threads
            .into_iter()
            .map(|handle| handle.join().map_err(|_| Error::WorkerPanicked)?)
            .collect::<Result<Vec<_>>>()
    })
    .map_err(|_| Error::WorkerPanicked)??;
    debug!(
        workers = tables.len(),
        distinct = ?tables.iter().map(AggTable::len).collect::<Vec<_>>(),
        elapsed_ms = begin.elapsed().as_millis() as u64,
        "workers joined"
    );

    Ok(merge(tables, capacity)?.into_summary())
}

/// Fold tables `1..` into table `0`. Stats combine associatively and commutatively, so the
/// result doesn't depend on the order the workers finished in.
pub fn merge(tables: Vec<AggTable<'_>>, capacity: usize) -> Result<AggTable<'_>> {
    let mut tables = tables.into_iter();
    let mut merged = tables
        .next()
        .unwrap_or_else(|| AggTable::with_capacity(capacity));
    for table in tables {
        merged.merge(table)?;
    }
    Ok(merged)
}
