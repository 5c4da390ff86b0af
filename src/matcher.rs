//! Fee-aware matching of input partitions against output partitions.
//!
//! For each subset count k, every input partition of size k is checked
//! against every permutation of every output partition of size k; an
//! ordering survives iff every index-aligned subset pair is connectable.
//! Permutations are walked with an iterative lexicographic successor, so no
//! recursion and no up-front materialization of all k! orderings.

use crate::error::UntangleError;
use crate::partition::{group_by_size, partitions, Partition};
use crate::transaction::{Entry, Transaction};

/// Total value of a subset.
pub fn subset_sum(subset: &[Entry]) -> u64 {
    subset.iter().map(|e| e.value).sum()
}

/// Can `input_subset` plausibly fund `output_subset` within `fee`?
///
/// Connectable iff `out_sum <= in_sum <= out_sum + fee`: the inputs must
/// cover the outputs, and the shortfall burned as fee must not exceed the
/// transaction fee. The bound is applied per pair, NOT shared across the
/// pairs of a partition: the sum of shortfalls over a whole partition may
/// exceed the transaction fee. That matches the reference heuristic and is
/// deliberate (see DESIGN.md).
pub fn is_connectable(input_subset: &[Entry], output_subset: &[Entry], fee: u64) -> bool {
    let in_sum = subset_sum(input_subset);
    let out_sum = subset_sum(output_subset);
    out_sum <= in_sum && in_sum <= out_sum + fee
}

/// One way of untangling a transaction: an input grouping paired with a
/// permutation-ordered output grouping of the same size, where every
/// index-aligned pair is connectable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptablePartition {
    pub input_subsets: Vec<Vec<Entry>>,
    pub output_subsets: Vec<Vec<Entry>>,
}

impl AcceptablePartition {
    /// Subset count k (identical on both sides).
    pub fn len(&self) -> usize {
        self.input_subsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.input_subsets.is_empty()
    }

    /// Per-pair value flow `in_sum - out_sum`, index aligned. Well-defined
    /// because every aligned pair satisfies the connectability lower bound
    /// `in_sum >= out_sum`.
    pub fn flows(&self) -> Vec<u64> {
        self.input_subsets
            .iter()
            .zip(&self.output_subsets)
            .map(|(inp, outp)| subset_sum(inp) - subset_sum(outp))
            .collect()
    }
}

/// Iterative lexicographic permutation walk over `0..n`.
struct PermutationIter {
    indices: Vec<usize>,
    started: bool,
    exhausted: bool,
}

impl PermutationIter {
    fn new(n: usize) -> Self {
        Self {
            indices: (0..n).collect(),
            started: false,
            exhausted: false,
        }
    }

    /// Standard next-permutation: find the longest non-increasing suffix,
    /// swap its pivot with the smallest larger element in it, reverse it.
    fn advance(&mut self) -> bool {
        let idx = &mut self.indices;
        if idx.len() < 2 {
            return false;
        }
        let mut i = idx.len() - 1;
        while i > 0 && idx[i - 1] >= idx[i] {
            i -= 1;
        }
        if i == 0 {
            return false;
        }
        let mut j = idx.len() - 1;
        while idx[j] <= idx[i - 1] {
            j -= 1;
        }
        idx.swap(i - 1, j);
        idx[i..].reverse();
        true
    }
}

impl Iterator for PermutationIter {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Vec<usize>> {
        if self.exhausted {
            return None;
        }
        if !self.started {
            self.started = true;
            return Some(self.indices.clone());
        }
        if self.advance() {
            Some(self.indices.clone())
        } else {
            self.exhausted = true;
            None
        }
    }
}

/// Check one input partition of size `k` against every subset ordering of
/// one output partition; keep the orderings where all k aligned pairs are
/// connectable.
pub fn acceptable_connections(
    k: usize,
    input_partition: &Partition,
    output_partition: &Partition,
    fee: u64,
) -> Vec<AcceptablePartition> {
    let mut kept = Vec::new();
    for ordering in PermutationIter::new(output_partition.len()) {
        let all_connectable = (0..k).all(|i| {
            is_connectable(
                &input_partition.subsets[i],
                &output_partition.subsets[ordering[i]],
                fee,
            )
        });
        if all_connectable {
            kept.push(AcceptablePartition {
                input_subsets: input_partition.subsets.clone(),
                output_subsets: ordering
                    .iter()
                    .map(|&i| output_partition.subsets[i].clone())
                    .collect(),
            });
        }
    }
    kept
}

/// Every acceptable partition of `transaction` for subset counts 2 through
/// `min(|inputs|, |outputs|)`. Size 1 (the unsplit transaction) carries no
/// untangling information and is excluded.
///
/// The result is the raw concatenation over all (k, input partition, output
/// partition) combinations: structurally equal groupings reached through
/// different combinations are NOT deduplicated (see DESIGN.md).
pub fn acceptable_partitions(
    transaction: &Transaction,
) -> Result<Vec<AcceptablePartition>, UntangleError> {
    let max_k = transaction.inputs.len().min(transaction.outputs.len());
    if max_k < 2 {
        // No grouping with k >= 2 exists; nothing to search.
        return Ok(Vec::new());
    }

    let input_buckets = group_by_size(partitions(&transaction.inputs, max_k)?);
    let output_buckets = group_by_size(partitions(&transaction.outputs, max_k)?);

    let mut accepted = Vec::new();
    for k in 2..=max_k {
        let (input_group, output_group) =
            match (input_buckets.get(&k), output_buckets.get(&k)) {
                (Some(inputs), Some(outputs)) => (inputs, outputs),
                _ => continue,
            };
        for input_partition in input_group {
            for output_partition in output_group {
                accepted.extend(acceptable_connections(
                    k,
                    input_partition,
                    output_partition,
                    transaction.fee,
                ));
            }
        }
    }
    Ok(accepted)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subset(values: &[u64]) -> Vec<Entry> {
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| Entry::new(format!("e{i}"), v))
            .collect()
    }

    #[test]
    fn connectability_boundaries() {
        // out_sum = 10, fee = 3: connectable iff 10 <= in_sum <= 13
        let outputs = subset(&[10]);
        assert!(is_connectable(&subset(&[10]), &outputs, 3)); // in == out
        assert!(is_connectable(&subset(&[13]), &outputs, 3)); // in == out + fee
        assert!(!is_connectable(&subset(&[14]), &outputs, 3)); // one over
        assert!(!is_connectable(&subset(&[9]), &outputs, 3)); // under out
        assert!(is_connectable(&subset(&[10]), &outputs, 0)); // exact, no fee
    }

    #[test]
    fn permutations_are_lexicographic_and_complete() {
        let orders: Vec<Vec<usize>> = PermutationIter::new(3).collect();
        assert_eq!(
            orders,
            vec![
                vec![0, 1, 2],
                vec![0, 2, 1],
                vec![1, 0, 2],
                vec![1, 2, 0],
                vec![2, 0, 1],
                vec![2, 1, 0],
            ]
        );
        assert_eq!(PermutationIter::new(4).count(), 24);
        assert_eq!(PermutationIter::new(1).count(), 1);
    }

    #[test]
    fn connections_keep_only_fully_connectable_orderings() {
        let input_partition = Partition {
            subsets: vec![subset(&[10]), subset(&[20])],
        };
        let output_partition = Partition {
            subsets: vec![subset(&[19]), subset(&[10])],
        };
        // fee 1: only the swapped ordering pairs 10->10 and 20->19
        let kept = acceptable_connections(2, &input_partition, &output_partition, 1);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].output_subsets[0][0].value, 10);
        assert_eq!(kept[0].output_subsets[1][0].value, 19);
        assert_eq!(kept[0].flows(), vec![0, 1]);
    }

    #[test]
    fn every_accepted_pair_respects_the_fee_bound() {
        let tx = Transaction::new(
            "t0",
            vec![
                Entry::new("a1", 101),
                Entry::new("a2", 200),
                Entry::new("a3", 102),
                Entry::new("a4", 300),
            ],
            vec![
                Entry::new("b1", 51),
                Entry::new("b2", 250),
                Entry::new("b3", 52),
                Entry::new("b4", 350),
            ],
            10,
        );
        let accepted = acceptable_partitions(&tx).unwrap();
        assert!(!accepted.is_empty());
        for partition in &accepted {
            assert!(partition.len() >= 2);
            for flow in partition.flows() {
                assert!(flow <= tx.fee);
            }
        }
    }

    #[test]
    fn degenerate_sides_yield_no_partitions() {
        let tx = Transaction::new(
            "t0",
            vec![Entry::new("a1", 10)],
            vec![Entry::new("b1", 6), Entry::new("b2", 4)],
            0,
        );
        assert!(acceptable_partitions(&tx).unwrap().is_empty());
    }
}
