//! Batch-simplify daily transaction CSV files.
//!
//! For each `YYYY-MM-DD.csv` file in the input directory: load the
//! transactions, dust-prune them in parallel, classify the ones still
//! unclassified, and write the simplified file to the output directory
//! together with before/after class profiles.

use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;
use txuntangle::batch::{profile, reclassify, simplify_all};
use txuntangle::classify::DEFAULT_MAX_PARTITION_SIZE;
use txuntangle::io::{daily_csv_files, load_transactions_from_csv, write_transactions_to_csv};
use txuntangle::transaction::Transaction;

#[derive(Parser, Debug)]
#[command(
    name = "simplify_transactions",
    about = "Dust-prune and classify daily transaction CSV batches"
)]
struct Args {
    /// Directory of daily CSV files to process
    #[arg(long)]
    input_dir: PathBuf,

    /// Directory to write simplified CSV files into
    #[arg(long)]
    output_dir: PathBuf,

    /// Partition-size cap above which transactions are tagged intractable
    #[arg(long, default_value_t = DEFAULT_MAX_PARTITION_SIZE)]
    max_partition_size: usize,
}

fn print_profile(transactions: &[Transaction]) {
    for (class, count) in profile(transactions) {
        println!("        {:>14}: {count}", class.as_str());
    }
    println!();
}

fn main() -> Result<()> {
    let args = Args::parse();
    println!("found {} available threads\n", num_cpus::get());

    std::fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("failed to create {}", args.output_dir.display()))?;

    let files = daily_csv_files(&args.input_dir)?;
    if files.is_empty() {
        println!("no daily csv files found in {}", args.input_dir.display());
        return Ok(());
    }

    for path in files {
        let started = Instant::now();
        println!("processing file {}:\n", path.display());

        print!("    loading transactions... ");
        std::io::stdout().flush()?;
        let transactions = load_transactions_from_csv(&path)?;
        println!("done");
        print_profile(&transactions);

        print!("    simplifying transactions... ");
        std::io::stdout().flush()?;
        let simplified = simplify_all(transactions);
        println!("done");

        print!("    classifying simplified transactions... ");
        std::io::stdout().flush()?;
        let classified = reclassify(simplified, args.max_partition_size)?;
        println!("done");
        print_profile(&classified);

        let file_name = path
            .file_name()
            .with_context(|| format!("{} has no file name", path.display()))?;
        let out_path = args.output_dir.join(file_name);
        print!("    writing {}... ", out_path.display());
        std::io::stdout().flush()?;
        write_transactions_to_csv(&out_path, &classified)?;
        println!("done");

        println!("    finished in {:.2}s\n", started.elapsed().as_secs_f64());
    }
    Ok(())
}
