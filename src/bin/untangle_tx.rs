//! Untangle a single transaction and print every acceptable partition.
//!
//! The transaction comes either from inline `id:value` lists or from one of
//! the built-in paper examples (figure4 through figure10).

use anyhow::{bail, Context, Result};
use clap::Parser;
use txuntangle::transaction::{Entry, Transaction};
use txuntangle::untangle;

#[derive(Parser, Debug)]
#[command(name = "untangle_tx", about = "Untangle one transaction")]
struct Args {
    /// Funding entries as comma-separated id:value pairs, e.g. "a1:20,a2:10"
    #[arg(long, conflicts_with = "example")]
    inputs: Option<String>,

    /// Payee entries as comma-separated id:value pairs
    #[arg(long, conflicts_with = "example")]
    outputs: Option<String>,

    /// Transaction fee in the minimal currency unit
    #[arg(long, default_value_t = 0)]
    fee: u64,

    /// Built-in example: figure4, figure5, figure6, figure7 or figure10
    #[arg(long)]
    example: Option<String>,
}

fn parse_entries(spec: &str) -> Result<Vec<Entry>> {
    spec.split(',')
        .map(|pair| {
            let (id, value) = pair
                .split_once(':')
                .with_context(|| format!("entry `{pair}` is not id:value"))?;
            let value: u64 = value
                .trim()
                .parse()
                .with_context(|| format!("entry `{pair}` has a bad value"))?;
            Ok(Entry::new(id.trim(), value))
        })
        .collect()
}

fn example_transaction(name: &str) -> Result<Transaction> {
    let e = Entry::new;
    let tx = match name {
        // ambiguous
        "figure4" => Transaction::new(
            "t0",
            vec![e("a1", 101), e("a2", 200), e("a3", 102), e("a4", 300)],
            vec![e("b1", 51), e("b2", 250), e("b3", 52), e("b4", 350)],
            10,
        ),
        // ambiguous
        "figure5" => Transaction::new(
            "t0",
            vec![e("a1", 11), e("a2", 27), e("a3", 5)],
            vec![e("b1", 5), e("b2", 6), e("b3", 32)],
            0,
        ),
        // separable
        "figure6" => Transaction::new(
            "t0",
            vec![e("a1", 20), e("a2", 10)],
            vec![e("b1", 19), e("b2", 7), e("b3", 3)],
            1,
        ),
        // ambiguous
        "figure7" => Transaction::new(
            "t0",
            vec![e("a1", 10), e("a2", 10)],
            vec![e("b1", 10), e("b2", 7), e("b3", 3)],
            0,
        ),
        // separable after the small-input pass
        "figure10" => Transaction::new(
            "t0",
            vec![e("a1", 50), e("a2", 40), e("a3", 1)],
            vec![e("b1", 49), e("b2", 39)],
            3,
        ),
        other => bail!("unknown example `{other}`"),
    };
    Ok(tx)
}

fn main() -> Result<()> {
    let args = Args::parse();

    let transaction = if let Some(name) = &args.example {
        example_transaction(name)?
    } else {
        let inputs = parse_entries(
            args.inputs
                .as_deref()
                .context("--inputs is required without --example")?,
        )?;
        let outputs = parse_entries(
            args.outputs
                .as_deref()
                .context("--outputs is required without --example")?,
        )?;
        Transaction::new("t0", inputs, outputs, args.fee)
    };

    let found = untangle(&transaction)?;

    let noun = if found.len() == 1 {
        "partition"
    } else {
        "partitions"
    };
    println!("\nfound {} acceptable {noun}:\n", found.len());
    for partition in &found {
        println!("{partition}");
    }
    Ok(())
}
