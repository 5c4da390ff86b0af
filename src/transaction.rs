//! Core transaction model.
//!
//! A transaction is an ordered list of funding entries, an ordered list of
//! payee entries and a fee, all in the minimal currency unit. Values are
//! `u64` throughout: exact integer arithmetic, no floating point, and the
//! negative-value preconditions are unrepresentable by construction (the
//! ingestion layers reject negative source data before it gets here).

use crate::error::UntangleError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One funding or payee slot: an address paired with a value.
///
/// Immutable once created; the analysis only ever clones entries into
/// partition subsets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entry {
    /// Opaque identifier (an address, in the collection pipeline)
    pub id: String,
    /// Value in the minimal currency unit
    pub value: u64,
}

impl Entry {
    pub fn new(id: impl Into<String>, value: u64) -> Self {
        Self {
            id: id.into(),
            value,
        }
    }
}

/// Pipeline classification of a transaction by untangling outcome.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum TxClass {
    /// Not yet examined (default for freshly collected transactions)
    Unclassified,
    /// Fewer than two inputs or fewer than two outputs: nothing to untangle
    Trivial,
    /// Too many inputs/outputs to search under the configured size cap
    Intractable,
    /// Untangling found no acceptable partition
    NotSeparable,
    /// Untangling found exactly one acceptable partition
    Separable,
    /// Untangling found more than one acceptable partition
    Ambiguous,
}

impl TxClass {
    /// CSV spelling of the class (the `transaction_class` column).
    pub fn as_str(&self) -> &'static str {
        match self {
            TxClass::Unclassified => "unclassified",
            TxClass::Trivial => "trivial",
            TxClass::Intractable => "intractable",
            TxClass::NotSeparable => "not_separable",
            TxClass::Separable => "separable",
            TxClass::Ambiguous => "ambiguous",
        }
    }
}

impl fmt::Display for TxClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TxClass {
    type Err = UntangleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unclassified" => Ok(TxClass::Unclassified),
            "trivial" => Ok(TxClass::Trivial),
            "intractable" => Ok(TxClass::Intractable),
            "not_separable" => Ok(TxClass::NotSeparable),
            "separable" => Ok(TxClass::Separable),
            "ambiguous" => Ok(TxClass::Ambiguous),
            other => Err(UntangleError::InvalidTransaction(format!(
                "unknown transaction class `{other}`"
            ))),
        }
    }
}

/// A multi-input, multi-output value transfer.
///
/// Invariant: `sum(input values) == sum(output values) + fee`. The simplifier
/// preserves it; [`Transaction::is_balanced`] checks it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub txid: String,
    pub inputs: Vec<Entry>,
    pub outputs: Vec<Entry>,
    pub fee: u64,
    pub class: TxClass,
}

impl Transaction {
    pub fn new(
        txid: impl Into<String>,
        inputs: Vec<Entry>,
        outputs: Vec<Entry>,
        fee: u64,
    ) -> Self {
        Self {
            txid: txid.into(),
            inputs,
            outputs,
            fee,
            class: TxClass::Unclassified,
        }
    }

    pub fn input_total(&self) -> u64 {
        self.inputs.iter().map(|e| e.value).sum()
    }

    pub fn output_total(&self) -> u64 {
        self.outputs.iter().map(|e| e.value).sum()
    }

    /// Whether the value balance invariant holds.
    pub fn is_balanced(&self) -> bool {
        self.input_total() == self.output_total() + self.fee
    }

    /// Fail fast on the preconditions the analysis requires. Negative fees
    /// and values cannot occur here (`u64`); what remains is emptiness.
    pub fn validate(&self) -> Result<(), UntangleError> {
        if self.inputs.is_empty() {
            return Err(UntangleError::InvalidTransaction(format!(
                "transaction {} has no inputs",
                self.txid
            )));
        }
        if self.outputs.is_empty() {
            return Err(UntangleError::InvalidTransaction(format!(
                "transaction {} has no outputs",
                self.txid
            )));
        }
        Ok(())
    }
}
