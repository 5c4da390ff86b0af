//! End-to-end untangling scenarios, after the figure examples of the
//! reference analysis.

use txuntangle::transaction::{Entry, Transaction};
use txuntangle::{simplify, untangle, UntangleError};

fn e(id: &str, value: u64) -> Entry {
    Entry::new(id, value)
}

/// Sorted ids per subset, subsets sorted, for order-insensitive grouping
/// comparison.
fn grouping(
    subsets: &[(Vec<&str>, Vec<&str>)],
) -> Vec<(Vec<String>, Vec<String>)> {
    let mut grouped: Vec<(Vec<String>, Vec<String>)> = subsets
        .iter()
        .map(|(inputs, outputs)| {
            let mut inputs: Vec<String> = inputs.iter().map(|s| s.to_string()).collect();
            let mut outputs: Vec<String> = outputs.iter().map(|s| s.to_string()).collect();
            inputs.sort();
            outputs.sort();
            (inputs, outputs)
        })
        .collect();
    grouped.sort();
    grouped
}

fn result_groupings(
    found: &[txuntangle::AcceptablePartition],
) -> Vec<Vec<(Vec<String>, Vec<String>)>> {
    found
        .iter()
        .map(|partition| {
            let mut pairs: Vec<(Vec<String>, Vec<String>)> = partition
                .input_subsets
                .iter()
                .zip(&partition.output_subsets)
                .map(|(inputs, outputs)| {
                    let mut inputs: Vec<String> =
                        inputs.iter().map(|e| e.id.clone()).collect();
                    let mut outputs: Vec<String> =
                        outputs.iter().map(|e| e.id.clone()).collect();
                    inputs.sort();
                    outputs.sort();
                    (inputs, outputs)
                })
                .collect();
            pairs.sort();
            pairs
        })
        .collect()
}

#[test]
fn separable_transaction_untangles_into_its_two_payments() {
    // figure 6: 20 -> 19 within fee 1, 10 -> 7+3 exact
    let tx = Transaction::new(
        "t0",
        vec![e("a1", 20), e("a2", 10)],
        vec![e("b1", 19), e("b2", 7), e("b3", 3)],
        1,
    );
    let found = untangle(&tx).unwrap();
    assert!(!found.is_empty());

    let expected = grouping(&[(vec!["a1"], vec!["b1"]), (vec!["a2"], vec!["b2", "b3"])]);
    assert!(
        result_groupings(&found).contains(&expected),
        "expected grouping missing from {found:?}"
    );
}

#[test]
fn ambiguous_transaction_admits_multiple_untanglings() {
    // figure 4
    let tx = Transaction::new(
        "t0",
        vec![e("a1", 101), e("a2", 200), e("a3", 102), e("a4", 300)],
        vec![e("b1", 51), e("b2", 250), e("b3", 52), e("b4", 350)],
        10,
    );
    let found = untangle(&tx).unwrap();
    assert!(found.len() > 1, "expected ambiguity, got {}", found.len());

    // every accepted pair respects the per-pair fee bound
    for partition in &found {
        for flow in partition.flows() {
            assert!(flow <= 10);
        }
    }
}

#[test]
fn equal_inputs_make_the_untangling_ambiguous() {
    // figure 7: both inputs are 10, so assignments are interchangeable
    let tx = Transaction::new(
        "t0",
        vec![e("a1", 10), e("a2", 10)],
        vec![e("b1", 10), e("b2", 7), e("b3", 3)],
        0,
    );
    let found = untangle(&tx).unwrap();
    assert!(found.len() > 1);
}

#[test]
fn zero_fee_transaction_with_exact_splits_is_ambiguous() {
    // figure 5
    let tx = Transaction::new(
        "t0",
        vec![e("a1", 11), e("a2", 27), e("a3", 5)],
        vec![e("b1", 5), e("b2", 6), e("b3", 32)],
        0,
    );
    let found = untangle(&tx).unwrap();
    assert!(found.len() > 1);
}

#[test]
fn dust_input_is_absorbed_before_matching() {
    // figure 10: a3 (1) fits under the fee (3); the reduced transaction is
    // separable into two single-input, single-output payments
    let tx = Transaction::new(
        "t0",
        vec![e("a1", 50), e("a2", 40), e("a3", 1)],
        vec![e("b1", 49), e("b2", 39)],
        3,
    );

    let reduced = simplify(&tx).unwrap();
    assert_eq!(reduced.fee, 2);
    assert!(reduced.inputs.iter().all(|entry| entry.id != "a3"));
    assert!(reduced.is_balanced());

    let found = untangle(&tx).unwrap();
    let expected = grouping(&[(vec!["a1"], vec!["b1"]), (vec!["a2"], vec!["b2"])]);
    assert!(result_groupings(&found).contains(&expected));
}

#[test]
fn untangleable_nothing_is_a_normal_empty_result() {
    let tx = Transaction::new(
        "t0",
        vec![e("a1", 10), e("a2", 10)],
        vec![e("b1", 15), e("b2", 5)],
        0,
    );
    assert!(untangle(&tx).unwrap().is_empty());
}

#[test]
fn empty_sides_fail_fast() {
    let no_inputs = Transaction::new("t0", vec![], vec![e("b1", 1)], 0);
    assert!(matches!(
        untangle(&no_inputs),
        Err(UntangleError::InvalidTransaction(_))
    ));

    let no_outputs = Transaction::new("t0", vec![e("a1", 1)], vec![], 1);
    assert!(matches!(
        untangle(&no_outputs),
        Err(UntangleError::InvalidTransaction(_))
    ));
}

#[test]
fn untangling_leaves_the_original_transaction_untouched() {
    let tx = Transaction::new(
        "t0",
        vec![e("a1", 50), e("a2", 40), e("a3", 1)],
        vec![e("b1", 49), e("b2", 39)],
        3,
    );
    let before = tx.clone();
    untangle(&tx).unwrap();
    assert_eq!(tx, before);
}
