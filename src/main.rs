use std::{
    io::{self, BufWriter, Write},
    path::PathBuf,
    time::Instant,
};

use anyhow::Context;
use clap::Parser;
use station_stats::{config::default_workers, summarize, table, Config, RawBuffer, Strategy};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(about = "Min/mean/max per station over a `<station>;<value>` file")]
struct Cli {
    /// Path to measurements file
    #[arg(default_value = "measurements.txt")]
    path: PathBuf,

    /// Worker threads, defaults to the available parallelism
    #[arg(short, long)]
    workers: Option<usize>,

    /// Slots per aggregation table, must exceed the number of distinct stations
    #[arg(short, long, default_value_t = table::DEFAULT_CAPACITY)]
    capacity: usize,

    #[arg(short, long, value_enum, default_value_t = Strategy::Parallel)]
    strategy: Strategy,

    /// Printed between entries
    #[arg(long, default_value = ",")]
    separator: String,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config {
        workers: cli.workers.unwrap_or_else(default_workers),
        capacity: cli.capacity,
        strategy: cli.strategy,
    };
    info!(path = %cli.path.display(), ?config, "starting");

    let begin = Instant::now();
    let buffer = RawBuffer::open(&cli.path)?;
    info!(
        bytes = buffer.len(),
        elapsed_ms = begin.elapsed().as_millis() as u64,
        "file time"
    );

    let begin_compute = Instant::now();
    let summary = summarize(&buffer, &config)?;
    // the summary owns its keys, the map can go now
    drop(buffer);
    info!(
        elapsed_ms = begin_compute.elapsed().as_millis() as u64,
        "parse time"
    );

    let mut out = BufWriter::new(io::stdout().lock());
    summary
        .write_to(&mut out, &cli.separator)
        .and_then(|()| out.flush())
        .context("failed to write report")?;

    info!(
        elapsed_ms = begin.elapsed().as_millis() as u64,
        records = summary.records(),
        "done"
    );
    Ok(())
}
