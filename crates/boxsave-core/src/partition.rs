//! Box partitioning: turns a target amount into the denominations `1..=n`.
//!
//! `n` is the largest integer whose triangular number `n(n+1)/2` does not
//! exceed the target, so the boxes can collect at most that triangular total.
//! Whatever lies between it and the target is unreachable.

use boxsave_domain::Amount;

/// Triangular number `n(n+1)/2`, computed wide enough to never overflow.
pub fn triangular(n: u64) -> i128 {
    let n = i128::from(n);
    n * (n + 1) / 2
}

/// Number of boxes for `target`. Zero for targets below one.
pub fn box_count(target: Amount) -> u64 {
    if target < 1 {
        return 0;
    }
    let goal = i128::from(target);
    let estimate = ((-1.0 + (1.0 + 8.0 * target as f64).sqrt()) / 2.0).floor();
    let mut n = if estimate.is_finite() && estimate > 0.0 {
        estimate as u64
    } else {
        0
    };
    // The float estimate can land one off near exact triangular numbers.
    while n > 0 && triangular(n) > goal {
        n -= 1;
    }
    while triangular(n + 1) <= goal {
        n += 1;
    }
    n
}

/// Ascending box denominations `[1, 2, ..., n]` for `target`.
pub fn partition(target: Amount) -> Vec<Amount> {
    (1..=box_count(target)).map(|value| value as Amount).collect()
}

/// Highest total the partition of `target` can collect.
pub fn reachable_total(target: Amount) -> Amount {
    // Never exceeds `target`, so it fits back into an `Amount`.
    triangular(box_count(target)) as Amount
}

/// Part of `target` no combination of boxes can reach.
pub fn shortfall(target: Amount) -> Amount {
    (target - reachable_total(target)).max(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn small_targets_match_known_partitions() {
        assert_eq!(partition(10), vec![1, 2, 3, 4]);
        assert_eq!(partition(5), vec![1, 2]);
        assert_eq!(partition(1), vec![1]);
        assert_eq!(partition(2), vec![1]);
        assert_eq!(partition(3), vec![1, 2]);
    }

    #[test]
    fn degenerate_targets_yield_no_boxes() {
        assert!(partition(0).is_empty());
        assert!(partition(-15).is_empty());
        assert!(partition(Amount::MIN).is_empty());
        assert_eq!(shortfall(-3), 0);
    }

    proptest! {
        #[test]
        fn every_target_sits_between_consecutive_triangulars(target in 1..=Amount::MAX / 2) {
            let n = box_count(target);
            prop_assert!(triangular(n) <= i128::from(target));
            prop_assert!(triangular(n + 1) > i128::from(target));
            prop_assert_eq!(shortfall(target), target - reachable_total(target));
        }
    }

    #[test]
    fn small_partitions_sum_to_reachable_total() {
        for target in 1..=5_000 {
            let boxes = partition(target);
            assert_eq!(boxes.len() as u64, box_count(target), "target {target}");
            assert_eq!(boxes.iter().sum::<Amount>(), reachable_total(target), "target {target}");
        }
    }

    #[test]
    fn exact_triangular_boundaries_are_inclusive() {
        for n in [1_u64, 2, 44, 133, 423, 94_906_265, 1_000_000_000, 3_037_000_000] {
            let exact = triangular(n) as Amount;
            assert_eq!(box_count(exact), n, "exact boundary for n={n}");
            assert_eq!(box_count(exact - 1), n - 1, "just below boundary for n={n}");
            assert_eq!(box_count(exact + 1), n, "just above boundary for n={n}");
        }
    }

    #[test]
    fn largest_target_does_not_overflow() {
        let n = box_count(Amount::MAX);
        assert!(triangular(n) <= i128::from(Amount::MAX));
        assert!(triangular(n + 1) > i128::from(Amount::MAX));
    }

    #[test]
    fn shortfall_reports_unreachable_remainder() {
        assert_eq!(reachable_total(10), 10);
        assert_eq!(shortfall(10), 0);
        assert_eq!(reachable_total(1_000), 990);
        assert_eq!(shortfall(1_000), 10);
        assert_eq!(partition(1_000).iter().sum::<Amount>(), 990);
    }
}
