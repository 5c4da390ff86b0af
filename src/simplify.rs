//! Dust pruning: shrink a transaction before the partition search.
//!
//! Two passes. Small inputs that the fee can absorb outright carry no
//! output-side signal and only inflate the search space; small outputs that
//! guaranteed slack can absorb are equally non-discriminating. Each pass
//! returns a NEW `Transaction` with the fee adjusted so the balance
//! invariant keeps holding; no in-place mutation, no aliasing.

use crate::error::UntangleError;
use crate::matcher::acceptable_partitions;
use crate::transaction::Transaction;

/// Drop inputs the fee can swallow whole.
///
/// Inputs are walked ascending by value; while the remaining fee covers the
/// current input, the input is dropped and its value subtracted from the
/// fee. The walk stops at the first survivor; everything after it is at
/// least as large. The resulting fee is never driven below zero, and the
/// surviving inputs stay sorted ascending.
pub fn remove_small_inputs(transaction: &Transaction) -> Transaction {
    let mut inputs = transaction.inputs.clone();
    inputs.sort_by_key(|e| e.value);

    let mut fee = transaction.fee;
    let mut kept = Vec::with_capacity(inputs.len());
    let mut pruning = true;
    for entry in inputs {
        if pruning && entry.value <= fee {
            fee -= entry.value;
        } else {
            pruning = false;
            kept.push(entry);
        }
    }

    Transaction {
        txid: transaction.txid.clone(),
        inputs: kept,
        outputs: transaction.outputs.clone(),
        fee,
        class: transaction.class,
    }
}

/// Drop outputs that guaranteed slack can swallow whole.
///
/// `delta` is the largest value that is unexplained slack in EVERY
/// acceptable grouping: over all acceptable partitions, the maximum of each
/// partition's minimum per-pair flow. Any output worth at most `delta`
/// could be attributed to slack in any untangling, so it discriminates
/// nothing; it is removed and its value folded back into the fee. The
/// surviving outputs are left sorted ascending.
pub fn remove_small_outputs(transaction: &Transaction) -> Result<Transaction, UntangleError> {
    let accepted = acceptable_partitions(transaction)?;

    let mut delta = 0u64;
    for partition in &accepted {
        let min_flow = partition.flows().into_iter().min().unwrap_or(0);
        if min_flow > delta {
            delta = min_flow;
        }
    }

    let mut outputs = transaction.outputs.clone();
    outputs.sort_by_key(|e| e.value);

    let mut fee = transaction.fee;
    let mut kept = Vec::with_capacity(outputs.len());
    for entry in outputs {
        if entry.value <= delta {
            fee += entry.value;
        } else {
            kept.push(entry);
        }
    }

    Ok(Transaction {
        txid: transaction.txid.clone(),
        inputs: transaction.inputs.clone(),
        outputs: kept,
        fee,
        class: transaction.class,
    })
}

/// Both pruning passes, inputs first, returning the reduced transaction.
pub fn simplify(transaction: &Transaction) -> Result<Transaction, UntangleError> {
    let reduced = remove_small_inputs(transaction);
    remove_small_outputs(&reduced)
}
