//! lrucli - replay command traces against an LRU set cache

mod handler;
mod replay;
mod report;
mod reply;

use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use lrucache::SharedLruCache;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::handler::CommandHandler;
use crate::replay::replay;
use crate::report::Report;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Cache capacity (number of values)
    #[arg(short, long, default_value_t = 1000)]
    capacity: usize,

    /// Trace file to replay (stdin when omitted)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Print the final report as JSON
    #[arg(long)]
    json: bool,

    /// Only print the final report
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    // Initialize tracing; stdout carries replies, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let cache = SharedLruCache::new(args.capacity).context("invalid --capacity")?;
    let handler = CommandHandler::new(cache);
    info!("Cache capacity: {}", args.capacity);

    let stdout = io::stdout();
    let mut out = stdout.lock();

    let summary = match &args.input {
        Some(path) => {
            info!("Replaying {}", path.display());
            let file = File::open(path)
                .with_context(|| format!("failed to open {}", path.display()))?;
            replay(BufReader::new(file), &mut out, &handler, args.quiet)?
        }
        None => {
            info!("Replaying stdin");
            replay(io::stdin().lock(), &mut out, &handler, args.quiet)?
        }
    };
    info!(
        commands = summary.commands,
        errors = summary.errors,
        "Replay finished"
    );

    let report = Report::new(&summary, handler.cache());
    if args.json {
        serde_json::to_writer_pretty(&mut out, &report)?;
        writeln!(out)?;
    } else {
        write!(out, "{}", report)?;
    }
    out.flush()?;

    Ok(())
}
