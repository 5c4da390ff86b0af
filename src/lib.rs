//! txuntangle - untangling analysis for multi-input, multi-output
//! transactions
//!
//! Given a transaction with several funding addresses and several payee
//! addresses, this crate finds every way its inputs and outputs can be
//! split into two or more disjoint groups such that each input group
//! plausibly funds exactly its paired output group within the declared fee.
//! A transaction that splits this way is not one joint payment but several
//! independent ones, which is a linkage signal for transaction-graph
//! analysis.
//!
//! The analysis core ([`partition`], [`matcher`], [`simplify`]) is pure and
//! single-threaded; the surrounding pipeline modules ([`collect`], [`io`],
//! [`classify`], [`batch`]) feed it and fan batches out across threads. The
//! search is Bell-number scale in `min(inputs, outputs)`: callers bound the
//! input size (see [`classify::DEFAULT_MAX_PARTITION_SIZE`]), the core
//! does not.

pub mod batch;
pub mod classify;
pub mod collect;
pub mod error;
pub mod format;
pub mod io;
pub mod matcher;
pub mod partition;
pub mod simplify;
pub mod transaction;

pub use error::UntangleError;
pub use matcher::{
    acceptable_connections, acceptable_partitions, is_connectable, AcceptablePartition,
};
pub use partition::{group_by_size, partitions, Partition, PartitionBucket};
pub use simplify::{remove_small_inputs, remove_small_outputs, simplify};
pub use transaction::{Entry, Transaction, TxClass};

/// Untangle one transaction: validate it, dust-prune it, then collect every
/// acceptable partition of the reduced transaction.
///
/// An empty result is a normal outcome (no grouping satisfies the fee
/// tolerance for any subset count >= 2), not an error.
pub fn untangle(
    transaction: &Transaction,
) -> Result<Vec<AcceptablePartition>, UntangleError> {
    transaction.validate()?;
    let reduced = simplify::simplify(transaction)?;
    matcher::acceptable_partitions(&reduced)
}
