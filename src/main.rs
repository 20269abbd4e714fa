use anyhow::Result;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::time::Duration;

use springer::batch::{self, BatchParams};
use springer::board::{loc, Loc};

#[derive(Parser, Debug)]
#[command(author, version, about = "Search for knight's tours with Warnsdorff-ordered backtracking", long_about = None)]
struct Args {
    /// Board rows
    #[arg(long, default_value_t = 8)]
    rows: usize,

    /// Board columns
    #[arg(long, default_value_t = 8)]
    cols: usize,

    /// Accept only closed tours
    #[arg(long)]
    closed: bool,

    /// Time budget per starting square, in seconds (0 disables it)
    #[arg(long, default_value_t = 1.0)]
    time_limit: f64,

    /// Warnsdorff look-ahead depth (0 leaves moves unordered)
    #[arg(long, default_value_t = 5)]
    look_ahead: u32,

    /// Backtracks tolerated before the search widens
    #[arg(long, default_value_t = 500)]
    backup_limit: u64,

    /// Dead ends tolerated before a start gives up
    #[arg(long)]
    max_dead_ends: Option<u64>,

    /// Starting squares, comma separated; vertical ranges like a1-8 allowed
    /// (default: every square)
    #[arg(long)]
    starts: Option<String>,

    /// Search only this many starting squares, randomly sampled
    #[arg(long)]
    sample: Option<usize>,

    /// Seed for --sample
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Write one JSON record per starting square to this file
    #[arg(long)]
    json: Option<PathBuf>,

    /// Suppress the progress bar
    #[arg(long)]
    quiet: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.rows == 0 || args.cols == 0 {
        anyhow::bail!("board must have at least one row and one column");
    }
    let starts = resolve_starts(&args)?;
    let params = BatchParams {
        rows: args.rows,
        cols: args.cols,
        starts,
        closed: args.closed,
        budget: (args.time_limit > 0.0).then(|| Duration::from_secs_f64(args.time_limit)),
        look_ahead: args.look_ahead,
        backup_limit: args.backup_limit,
        max_dead_ends: args.max_dead_ends,
    };

    eprintln!(
        "Searching {} starts on a {}x{} board ({} tours, look-ahead {})",
        params.starts.len(),
        params.cols,
        params.rows,
        if params.closed { "closed" } else { "open" },
        params.look_ahead
    );

    let bar = if args.quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(params.starts.len() as u64)
    };
    bar.set_style(
        ProgressStyle::with_template("[{bar:40}] {pos}/{len} {msg}")?.progress_chars("=>-"),
    );
    let report = batch::run_batch_with(&params, None, |_, outcome| {
        bar.set_message(format!("{:?}", outcome.outcome));
        bar.inc(1);
    });
    bar.finish_and_clear();

    for line in report.summary_lines() {
        println!("{line}");
    }

    if let Some(path) = &args.json {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        for outcome in &report.outcomes {
            writeln!(writer, "{}", serde_json::to_string(outcome)?)?;
        }
        writer.flush()?;
        eprintln!("Wrote {} records to {}", report.outcomes.len(), path.display());
    }

    Ok(())
}

/// Expand --starts / --sample into the list of squares to search.
fn resolve_starts(args: &Args) -> Result<Vec<Loc>> {
    let mut starts = match &args.starts {
        Some(named) => {
            let mut listed = Vec::new();
            for token in named.split(',') {
                let token = token.trim();
                if token.is_empty() {
                    continue;
                }
                if token.contains('-') {
                    listed.extend(loc::parse_range(token, args.cols, args.rows)?);
                } else {
                    listed.push(loc::parse_loc(token, args.cols, args.rows)?);
                }
            }
            if listed.is_empty() {
                anyhow::bail!("--starts named no squares");
            }
            listed
        }
        None => batch::grid_starts(args.cols, args.rows),
    };
    if let Some(count) = args.sample {
        if count == 0 {
            anyhow::bail!("--sample must be at least 1");
        }
        let mut rng = SmallRng::seed_from_u64(args.seed);
        starts.shuffle(&mut rng);
        starts.truncate(count);
    }
    Ok(starts)
}
