//! Structural properties of the partition generator and the matcher.

use proptest::prelude::*;
use txuntangle::partition::{group_by_size, partitions};
use txuntangle::transaction::{Entry, Transaction};
use txuntangle::{acceptable_partitions, simplify, untangle};

fn entries(values: &[u64]) -> Vec<Entry> {
    values
        .iter()
        .enumerate()
        .map(|(i, &v)| Entry::new(format!("e{i}"), v))
        .collect()
}

proptest! {
    // Every generated partition has nonempty, disjoint subsets whose union
    // recovers exactly the original sequence, within the size bound.
    #[test]
    fn partitions_are_disjoint_and_cover(
        values in proptest::collection::vec(0u64..1000, 1..=6),
        k_max in 1usize..=6,
    ) {
        let elements = entries(&values);
        for partition in partitions(&elements, k_max).unwrap() {
            prop_assert!(partition.len() >= 1 && partition.len() <= k_max);
            prop_assert!(partition.subsets.iter().all(|s| !s.is_empty()));

            let mut seen: Vec<&str> =
                partition.subsets.iter().flatten().map(|e| e.id.as_str()).collect();
            prop_assert_eq!(seen.len(), elements.len());
            seen.sort();
            let mut expected: Vec<&str> = elements.iter().map(|e| e.id.as_str()).collect();
            expected.sort();
            prop_assert_eq!(seen, expected);
        }
    }

    // Bucketing never loses or duplicates a partition.
    #[test]
    fn bucketing_is_a_permutation_of_the_input(
        values in proptest::collection::vec(0u64..1000, 1..=5),
    ) {
        let elements = entries(&values);
        let all = partitions(&elements, elements.len()).unwrap();
        let total = all.len();
        let buckets = group_by_size(all);
        prop_assert_eq!(buckets.values().map(Vec::len).sum::<usize>(), total);
        for (size, group) in &buckets {
            prop_assert!(group.iter().all(|p| p.len() == *size));
        }
    }

    // For every accepted partition, every aligned pair satisfies
    // 0 <= in_sum - out_sum <= fee.
    #[test]
    fn accepted_pairs_respect_the_fee_bound(
        input_values in proptest::collection::vec(1u64..60, 2..=4),
        output_values in proptest::collection::vec(1u64..60, 2..=4),
    ) {
        let in_total: u64 = input_values.iter().sum();
        let out_total: u64 = output_values.iter().sum();
        prop_assume!(in_total >= out_total);
        let fee = in_total - out_total;

        let tx = Transaction::new(
            "t0",
            entries(&input_values),
            output_values
                .iter()
                .enumerate()
                .map(|(i, &v)| Entry::new(format!("o{i}"), v))
                .collect(),
            fee,
        );
        prop_assert!(tx.is_balanced());

        for partition in acceptable_partitions(&tx).unwrap() {
            for flow in partition.flows() {
                prop_assert!(flow <= fee);
            }
        }
    }

    // Simplification preserves the balance invariant and never grows the
    // transaction.
    #[test]
    fn simplification_preserves_balance(
        input_values in proptest::collection::vec(1u64..60, 2..=4),
        output_values in proptest::collection::vec(1u64..60, 2..=4),
    ) {
        let in_total: u64 = input_values.iter().sum();
        let out_total: u64 = output_values.iter().sum();
        prop_assume!(in_total >= out_total);
        let fee = in_total - out_total;

        let tx = Transaction::new(
            "t0",
            entries(&input_values),
            output_values
                .iter()
                .enumerate()
                .map(|(i, &v)| Entry::new(format!("o{i}"), v))
                .collect(),
            fee,
        );

        let reduced = simplify(&tx).unwrap();
        prop_assert!(reduced.is_balanced());
        prop_assert!(reduced.inputs.len() <= tx.inputs.len());
        prop_assert!(reduced.outputs.len() <= tx.outputs.len());

        // untangling the reduced transaction equals untangling the original
        let direct = acceptable_partitions(&reduced).unwrap();
        let via_untangle = untangle(&tx).unwrap();
        prop_assert_eq!(direct, via_untangle);
    }
}
