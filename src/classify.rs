//! Transaction classification for the batch pipeline.
//!
//! The untangling search is Bell-number scale in `min(inputs, outputs)`, so
//! the pipeline refuses to search past a caller-supplied size cap and tags
//! those transactions intractable instead of attempting them.

use crate::error::UntangleError;
use crate::transaction::{Transaction, TxClass};
use crate::untangle;

/// Default partition-size cap for the batch tools. Bell(6) = 203 partitions
/// per side is still cheap; a couple of sizes further up is not.
pub const DEFAULT_MAX_PARTITION_SIZE: usize = 6;

/// Classify a transaction by its untangling outcome.
///
/// Transactions with fewer than two inputs or outputs are trivial; ones
/// whose searchable size exceeds `max_partition_size` are intractable and
/// never searched. The rest are untangled and tagged by how many acceptable
/// partitions came back.
pub fn classify(
    transaction: &Transaction,
    max_partition_size: usize,
) -> Result<TxClass, UntangleError> {
    if transaction.inputs.len() < 2 || transaction.outputs.len() < 2 {
        return Ok(TxClass::Trivial);
    }
    let search_size = transaction.inputs.len().min(transaction.outputs.len());
    if search_size > max_partition_size {
        return Ok(TxClass::Intractable);
    }

    let found = untangle(transaction)?;
    Ok(match found.len() {
        0 => TxClass::NotSeparable,
        1 => TxClass::Separable,
        _ => TxClass::Ambiguous,
    })
}
