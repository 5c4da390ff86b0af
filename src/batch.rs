//! Parallel batch processing.
//!
//! One untangling is pure and touches no shared state, so a batch is
//! embarrassingly parallel: one transaction per rayon task, results
//! collected in order.

use crate::classify::classify;
use crate::error::UntangleError;
use crate::simplify::simplify;
use crate::transaction::{Transaction, TxClass};
use rayon::prelude::*;
use std::collections::BTreeMap;

/// Dust-prune every transaction in parallel.
///
/// Transactions the simplifier rejects (degenerate shapes) pass through
/// unchanged rather than poisoning the whole batch.
pub fn simplify_all(transactions: Vec<Transaction>) -> Vec<Transaction> {
    transactions
        .into_par_iter()
        .map(|tx| match simplify(&tx) {
            Ok(reduced) => reduced,
            Err(_) => tx,
        })
        .collect()
}

/// Classify, in parallel, every transaction that is still unclassified;
/// already-classified transactions keep their class.
pub fn reclassify(
    transactions: Vec<Transaction>,
    max_partition_size: usize,
) -> Result<Vec<Transaction>, UntangleError> {
    transactions
        .into_par_iter()
        .map(|mut tx| {
            if tx.class == TxClass::Unclassified {
                tx.class = classify(&tx, max_partition_size)?;
            }
            Ok(tx)
        })
        .collect()
}

/// Transactions per class, in class order.
pub fn profile(transactions: &[Transaction]) -> BTreeMap<TxClass, usize> {
    let mut counts = BTreeMap::new();
    for tx in transactions {
        *counts.entry(tx.class).or_insert(0) += 1;
    }
    counts
}
