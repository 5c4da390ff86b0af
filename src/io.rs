//! CSV ingestion and export in the batch pipeline schema.
//!
//! One row per transaction:
//! `transaction_hash,num_inputs,input_addresses,input_values,num_outputs,
//! output_addresses,output_values,transaction_fee,transaction_class`
//! with `:`-joined address and value lists. Parsing is strict: count
//! mismatches, negative values and malformed numbers are hard errors, never
//! silently skipped rows.

use crate::transaction::{Entry, Transaction, TxClass};
use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

/// Column order of the pipeline schema.
pub const CSV_HEADER: [&str; 9] = [
    "transaction_hash",
    "num_inputs",
    "input_addresses",
    "input_values",
    "num_outputs",
    "output_addresses",
    "output_values",
    "transaction_fee",
    "transaction_class",
];

const LIST_SEPARATOR: char = ':';

fn parse_value(raw: &str, what: &str, txid: &str) -> Result<u64> {
    let value: i64 = raw
        .parse()
        .with_context(|| format!("transaction {txid}: non-integer {what} `{raw}`"))?;
    if value < 0 {
        bail!("transaction {txid}: negative {what} {value}");
    }
    Ok(value as u64)
}

fn parse_entries(addresses: &str, values: &str, expected: usize, side: &str, txid: &str) -> Result<Vec<Entry>> {
    let addresses: Vec<&str> = if addresses.is_empty() {
        Vec::new()
    } else {
        addresses.split(LIST_SEPARATOR).collect()
    };
    let values: Vec<&str> = if values.is_empty() {
        Vec::new()
    } else {
        values.split(LIST_SEPARATOR).collect()
    };
    if addresses.len() != expected || values.len() != expected {
        bail!(
            "transaction {txid}: {side} count mismatch (declared {expected}, got {} addresses and {} values)",
            addresses.len(),
            values.len()
        );
    }
    addresses
        .iter()
        .zip(&values)
        .map(|(addr, value)| {
            Ok(Entry::new(
                addr.to_string(),
                parse_value(value, &format!("{side} value"), txid)?,
            ))
        })
        .collect()
}

/// Load every transaction from one pipeline CSV file.
pub fn load_transactions_from_csv(path: &Path) -> Result<Vec<Transaction>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;

    let mut transactions = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record =
            record.with_context(|| format!("failed to read {} row {}", path.display(), row + 1))?;
        if record.len() != CSV_HEADER.len() {
            bail!(
                "{} row {}: expected {} fields, got {}",
                path.display(),
                row + 1,
                CSV_HEADER.len(),
                record.len()
            );
        }

        let txid = record[0].to_string();
        let num_inputs: usize = record[1]
            .parse()
            .with_context(|| format!("transaction {txid}: bad input count"))?;
        let inputs = parse_entries(&record[2], &record[3], num_inputs, "input", &txid)?;
        let num_outputs: usize = record[4]
            .parse()
            .with_context(|| format!("transaction {txid}: bad output count"))?;
        let outputs = parse_entries(&record[5], &record[6], num_outputs, "output", &txid)?;
        let fee = parse_value(&record[7], "fee", &txid)?;
        let class: TxClass = record[8]
            .parse()
            .with_context(|| format!("transaction {txid}: bad class"))?;

        let mut transaction = Transaction::new(txid, inputs, outputs, fee);
        transaction.class = class;
        transactions.push(transaction);
    }
    Ok(transactions)
}

fn join_ids(entries: &[Entry]) -> String {
    let ids: Vec<&str> = entries.iter().map(|e| e.id.as_str()).collect();
    ids.join(&LIST_SEPARATOR.to_string())
}

fn join_values(entries: &[Entry]) -> String {
    let values: Vec<String> = entries.iter().map(|e| e.value.to_string()).collect();
    values.join(&LIST_SEPARATOR.to_string())
}

/// Write transactions to one pipeline CSV file, header included.
pub fn write_transactions_to_csv(path: &Path, transactions: &[Transaction]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    writer.write_record(CSV_HEADER)?;
    for tx in transactions {
        if tx.inputs.iter().chain(&tx.outputs).any(|e| e.id.contains(LIST_SEPARATOR)) {
            bail!(
                "transaction {}: address contains the list separator `{LIST_SEPARATOR}`",
                tx.txid
            );
        }
        let record = [
            tx.txid.clone(),
            tx.inputs.len().to_string(),
            join_ids(&tx.inputs),
            join_values(&tx.inputs),
            tx.outputs.len().to_string(),
            join_ids(&tx.outputs),
            join_values(&tx.outputs),
            tx.fee.to_string(),
            tx.class.as_str().to_string(),
        ];
        writer.write_record(&record)?;
    }
    writer
        .flush()
        .with_context(|| format!("failed to flush {}", path.display()))
}

/// Whether a file name is a daily batch file (`YYYY-MM-DD.csv`).
fn is_daily_csv_name(name: &str) -> bool {
    let stem = match name.strip_suffix(".csv") {
        Some(stem) => stem,
        None => return false,
    };
    let bytes = stem.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

/// Daily batch files in a directory, sorted by name (hence by date).
pub fn daily_csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let entries =
        std::fs::read_dir(dir).with_context(|| format!("failed to list {}", dir.display()))?;
    for entry in entries {
        let entry = entry?;
        let name = entry.file_name();
        if name.to_str().is_some_and(is_daily_csv_name) {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}
