use crate::models::{from_cents, to_cents, CompletedSet, ProgressSnapshot};

/// Aggregate completed boxes into a snapshot. Indices past the end of
/// `amounts` are ignored.
///
/// Sums are taken in cents so that completing every box gives exactly 100%.
pub fn aggregate(amounts: &[f64], completed: &CompletedSet) -> ProgressSnapshot {
    let total_cents: i64 = amounts.iter().map(|a| to_cents(*a)).sum();
    let (completed_cents, completed_boxes) = completed
        .iter()
        .filter_map(|i| amounts.get(i))
        .fold((0i64, 0usize), |(sum, count), a| (sum + to_cents(*a), count + 1));

    ProgressSnapshot {
        completed: from_cents(completed_cents),
        total: from_cents(total_cents),
        percentage: percentage(completed_cents, total_cents),
        completed_boxes,
        total_boxes: amounts.len(),
    }
}

fn percentage(completed_cents: i64, total_cents: i64) -> f64 {
    if total_cents > 0 {
        completed_cents as f64 / total_cents as f64 * 100.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::generate_amounts;

    #[test]
    fn test_empty_set_is_zero_percent() {
        let amounts = generate_amounts(100.0);
        let snap = aggregate(&amounts, &CompletedSet::new());
        assert_eq!(snap.completed, 0.0);
        assert_eq!(snap.percentage, 0.0);
        assert_eq!(snap.completed_boxes, 0);
        assert_eq!(snap.total_boxes, amounts.len());
        assert_eq!(snap.total, 100.0);
    }

    #[test]
    fn test_completed_is_sum_of_marked_amounts() {
        let amounts = vec![5.0, 8.0, 12.0, 50.0];
        let set: CompletedSet = [0, 2].into_iter().collect();
        let snap = aggregate(&amounts, &set);
        assert_eq!(snap.completed, 17.0);
        assert_eq!(snap.total, 75.0);
        assert_eq!(snap.completed_boxes, 2);
        assert!((snap.percentage - 17.0 / 75.0 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_out_of_range_indices_are_ignored() {
        let amounts = vec![1.0, 2.0];
        let set: CompletedSet = [1, 5, 99].into_iter().collect();
        let snap = aggregate(&amounts, &set);
        assert_eq!(snap.completed, 2.0);
        assert_eq!(snap.completed_boxes, 1);
    }

    #[test]
    fn test_all_boxes_is_exactly_one_hundred() {
        for objective in [0.3, 10.0, 333.33, 9_999.99] {
            let amounts = generate_amounts(objective);
            let all: CompletedSet = (0..amounts.len()).collect();
            let snap = aggregate(&amounts, &all);
            assert_eq!(snap.percentage, 100.0, "objective {objective}");
            assert_eq!(snap.completed, snap.total);
            assert_eq!(snap.remaining(), 0.0);
        }
    }

    #[test]
    fn test_no_boxes_is_zero_percent() {
        let snap = aggregate(&[], &[0, 1].into_iter().collect());
        assert_eq!(snap.percentage, 0.0);
        assert_eq!(snap.total_boxes, 0);
        assert_eq!(snap.completed_boxes, 0);
    }
}
