//! Collect raw blocks for a date range from an explorer API and write one
//! JSON file per block.
//!
//! Files are named `<height>_<hash>.json`; existing files are skipped, so
//! an interrupted run can simply be restarted.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use txuntangle::collect::{days_in_range, ExplorerClient, ExplorerConfig};

#[derive(Parser, Debug)]
#[command(name = "collect_blocks", about = "Collect raw blocks for a date range")]
struct Args {
    /// First day to collect (YYYY-MM-DD)
    #[arg(long)]
    start_date: NaiveDate,

    /// Last day to collect, inclusive (YYYY-MM-DD)
    #[arg(long)]
    end_date: NaiveDate,

    /// Directory to write block JSON files into
    #[arg(long, default_value = "blocks")]
    out_dir: PathBuf,

    /// Explorer base URL
    #[arg(long, env = "EXPLORER_URL", default_value = "https://blockchain.info")]
    base_url: String,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    anyhow::ensure!(
        args.start_date <= args.end_date,
        "start date {} is after end date {}",
        args.start_date,
        args.end_date
    );

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("failed to create {}", args.out_dir.display()))?;

    let client = ExplorerClient::new(ExplorerConfig {
        base_url: args.base_url.clone(),
        timeout: Duration::from_secs(args.timeout_secs),
    })?;

    let days = days_in_range(args.start_date, args.end_date);
    println!(
        "collecting blocks for {} day(s) into {}",
        days.len(),
        args.out_dir.display()
    );

    let started = Instant::now();
    let mut collected = 0usize;
    let mut skipped = 0usize;

    for day in days {
        let summaries = client
            .block_summaries(day)
            .await
            .with_context(|| format!("failed to fetch block summaries for {day}"))?;
        println!("\n{day}: {} block(s)", summaries.len());

        for summary in summaries {
            let path = args
                .out_dir
                .join(format!("{}_{}.json", summary.height, summary.hash));
            if path.exists() {
                skipped += 1;
                continue;
            }

            let block = client
                .raw_block(&summary.hash)
                .await
                .with_context(|| format!("failed to fetch block {}", summary.hash))?;
            let json = serde_json::to_string(&block)
                .with_context(|| format!("failed to serialize block {}", block.hash))?;
            std::fs::write(&path, json)
                .with_context(|| format!("failed to write {}", path.display()))?;

            collected += 1;
            if collected % 25 == 0 {
                println!("    {collected} blocks collected...");
            }
        }
    }

    println!(
        "\ndone: {collected} collected, {skipped} already present, {:.1}s",
        started.elapsed().as_secs_f64()
    );
    Ok(())
}
