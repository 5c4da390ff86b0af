//! Explorer API client for collecting raw blocks.
//!
//! Talks to a blockchain.info-style data API: per-day block summaries from
//! `/blocks/<millis>?format=json` and full blocks from `/rawblock/<hash>`.
//! Raw-block JSON is converted into core `Transaction` values here;
//! everything downstream works on those alone.

use crate::transaction::{Entry, Transaction};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Explorer client configuration
#[derive(Debug, Clone)]
pub struct ExplorerConfig {
    /// Base URL (e.g. "https://blockchain.info")
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            base_url: "https://blockchain.info".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Async explorer API client
pub struct ExplorerClient {
    client: Client,
    config: ExplorerConfig,
}

/// Basic information about one block, from the per-day listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockSummary {
    pub hash: String,
    pub height: u64,
    #[serde(default)]
    pub time: u64,
}

/// A full block as served by `/rawblock/<hash>`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawBlock {
    pub hash: String,
    pub height: u64,
    #[serde(default)]
    pub time: u64,
    #[serde(default)]
    pub tx: Vec<RawTransaction>,
}

/// One transaction of a raw block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawTransaction {
    pub hash: String,
    #[serde(default)]
    pub fee: u64,
    #[serde(default)]
    pub inputs: Vec<RawInput>,
    #[serde(default)]
    pub out: Vec<RawOutput>,
}

/// A transaction input; coinbase inputs have no `prev_out`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawInput {
    #[serde(default)]
    pub prev_out: Option<RawOutput>,
}

/// A (previous) transaction output; `addr` is absent for non-standard
/// scripts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawOutput {
    #[serde(default)]
    pub addr: Option<String>,
    #[serde(default)]
    pub value: u64,
}

impl ExplorerClient {
    pub fn new(config: ExplorerConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { client, config })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.config.base_url, path);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("request failed: {url}"))?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("request {url} failed with status {status}");
        }

        response
            .json()
            .await
            .with_context(|| format!("failed to parse response from {url}"))
    }

    /// Summaries of every block added on the given (UTC) day.
    pub async fn block_summaries(&self, day: NaiveDate) -> Result<Vec<BlockSummary>> {
        let millis = day
            .and_hms_opt(0, 0, 0)
            .context("invalid day")?
            .and_utc()
            .timestamp_millis();
        // The API has served both a bare array and a {"blocks": [...]}
        // wrapper; accept either.
        let payload: serde_json::Value = self
            .get_json(&format!("/blocks/{millis}?format=json"))
            .await?;
        let list = match payload.get("blocks") {
            Some(blocks) => blocks.clone(),
            None => payload,
        };
        serde_json::from_value(list).context("unexpected block summary payload")
    }

    /// One full block, with all its transactions.
    pub async fn raw_block(&self, block_hash: &str) -> Result<RawBlock> {
        self.get_json(&format!("/rawblock/{block_hash}")).await
    }
}

/// Convert one raw transaction into the core model.
///
/// Returns `None` for transactions with no usable entries on either side:
/// coinbase transactions (inputs without `prev_out`) and entries without an
/// address are skipped, and a transaction left with an empty side cannot be
/// analyzed.
pub fn transaction_from_raw(raw: &RawTransaction) -> Option<Transaction> {
    let inputs: Vec<Entry> = raw
        .inputs
        .iter()
        .filter_map(|input| {
            let prev = input.prev_out.as_ref()?;
            let addr = prev.addr.as_ref()?;
            Some(Entry::new(addr.clone(), prev.value))
        })
        .collect();
    let outputs: Vec<Entry> = raw
        .out
        .iter()
        .filter_map(|output| {
            let addr = output.addr.as_ref()?;
            Some(Entry::new(addr.clone(), output.value))
        })
        .collect();
    if inputs.is_empty() || outputs.is_empty() {
        return None;
    }
    Some(Transaction::new(raw.hash.clone(), inputs, outputs, raw.fee))
}

/// All analyzable transactions of a block.
pub fn transactions_from_block(block: &RawBlock) -> Vec<Transaction> {
    block.tx.iter().filter_map(transaction_from_raw).collect()
}

/// Every day from `start` through `end`, inclusive.
pub fn days_in_range(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut days = Vec::new();
    let mut day = start;
    while day <= end {
        days.push(day);
        match day.succ_opt() {
            Some(next) => day = next,
            None => break,
        }
    }
    days
}
