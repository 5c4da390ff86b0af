//! Set-partition enumeration via restricted growth strings.
//!
//! A restricted growth string (RGS) of length n is an integer sequence
//! `c[0..n]` with `c[0] = 1` and `c[i] <= 1 + max(c[0..i])`, here also capped
//! at `k_max`. Each string is the canonical encoding of one set partition of
//! an n-element sequence into at most `k_max` blocks, so enumerating strings
//! enumerates partitions exactly once. For `k_max = n` the count is the n-th
//! Bell number; callers are responsible for keeping n small enough for that
//! to be affordable.
//!
//! Enumeration is an iterative successor walk (no recursion): start from the
//! all-ones string, repeatedly bump the rightmost position that can still
//! grow and reset everything to its right to 1.

use crate::error::UntangleError;
use crate::transaction::Entry;
use std::collections::HashMap;

/// A grouping of an entry sequence into nonempty, pairwise-disjoint subsets
/// whose union is the original sequence.
///
/// Subset order carries no meaning on its own; it only becomes significant
/// once an input partition is index-aligned against an output ordering by
/// the matcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    pub subsets: Vec<Vec<Entry>>,
}

impl Partition {
    /// Number of subsets (the partition's size k).
    pub fn len(&self) -> usize {
        self.subsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subsets.is_empty()
    }
}

/// Map from subset count k to the partitions of exactly that size.
pub type PartitionBucket = HashMap<usize, Vec<Partition>>;

/// Iterative successor walk over restricted growth strings of length `n`
/// bounded by `k_max`. Yields the all-ones string first.
struct CodewordIter {
    codeword: Vec<usize>,
    k_max: usize,
    started: bool,
    exhausted: bool,
}

impl CodewordIter {
    fn new(n: usize, k_max: usize) -> Self {
        Self {
            codeword: vec![1; n],
            k_max,
            started: false,
            exhausted: false,
        }
    }

    /// Advance to the successor string. Position 0 is pinned at 1; position i
    /// may grow while staying <= 1 + max of its prefix and <= k_max.
    fn advance(&mut self) -> bool {
        for i in (1..self.codeword.len()).rev() {
            let prefix_max = self.codeword[..i].iter().copied().max().unwrap_or(1);
            if self.codeword[i] <= prefix_max && self.codeword[i] < self.k_max {
                self.codeword[i] += 1;
                for c in &mut self.codeword[i + 1..] {
                    *c = 1;
                }
                return true;
            }
        }
        false
    }
}

impl Iterator for CodewordIter {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Vec<usize>> {
        if self.exhausted {
            return None;
        }
        if !self.started {
            self.started = true;
            return Some(self.codeword.clone());
        }
        if self.advance() {
            Some(self.codeword.clone())
        } else {
            self.exhausted = true;
            None
        }
    }
}

/// Enumerate every partition of `elements` into between 1 and `k_max`
/// subsets, in codeword successor order.
pub fn partitions(elements: &[Entry], k_max: usize) -> Result<Vec<Partition>, UntangleError> {
    if elements.is_empty() {
        return Err(UntangleError::InvalidInput(
            "cannot partition an empty sequence".to_string(),
        ));
    }
    if k_max < 1 {
        return Err(UntangleError::InvalidInput(
            "subset-count bound must be at least 1".to_string(),
        ));
    }

    let mut result = Vec::new();
    for codeword in CodewordIter::new(elements.len(), k_max) {
        let num_subsets = codeword.iter().copied().max().unwrap_or(1);
        let mut subsets = vec![Vec::new(); num_subsets];
        for (element, &block) in elements.iter().zip(&codeword) {
            subsets[block - 1].push(element.clone());
        }
        result.push(Partition { subsets });
    }
    Ok(result)
}

/// Bucket partitions by their subset count.
pub fn group_by_size(partitions: Vec<Partition>) -> PartitionBucket {
    let mut buckets: PartitionBucket = HashMap::new();
    for partition in partitions {
        buckets.entry(partition.len()).or_default().push(partition);
    }
    buckets
}
