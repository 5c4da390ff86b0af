//! Human-readable rendering of partitions and untangling results.
//!
//! Consumed by the tool binaries; the analysis itself never formats.

use crate::matcher::AcceptablePartition;
use crate::partition::Partition;
use crate::transaction::Entry;
use std::fmt;

/// `[id id ...]` for one subset.
pub fn subset_ids(subset: &[Entry]) -> String {
    let ids: Vec<&str> = subset.iter().map(|e| e.id.as_str()).collect();
    format!("[{}]", ids.join(" "))
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let subsets: Vec<String> = self.subsets.iter().map(|s| subset_ids(s)).collect();
        f.write_str(&subsets.join(" - "))
    }
}

impl fmt::Display for AcceptablePartition {
    /// One line per aligned pair: `[a1 a2] --> [b1]`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (inputs, outputs) in self.input_subsets.iter().zip(&self.output_subsets) {
            writeln!(f, "{} --> {}", subset_ids(inputs), subset_ids(outputs))?;
        }
        Ok(())
    }
}
