use crate::models::{from_cents, to_cents};

/// Upper bound on the number of boxes: one deposit per day for a year.
pub const MAX_BOXES: usize = 365;

/// Largest n <= MAX_BOXES with n(n+1)/2 <= cents.
fn box_count(cents: i64) -> usize {
    let mut n = 0usize;
    while n < MAX_BOXES && triangular(n + 1) <= cents {
        n += 1;
    }
    n
}

fn triangular(n: usize) -> i64 {
    let n = n as i64;
    n * (n + 1) / 2
}

/// Split an objective into cent-challenge boxes, in cents.
///
/// Box k (1-based) holds floor(k * S / T) cents where S is the objective in
/// cents and T = n(n+1)/2. The shortfall left by flooring is added to the
/// last box, so the boxes always sum to exactly S.
pub fn generate_cents(objective_cents: i64) -> Vec<i64> {
    let n = box_count(objective_cents);
    if n == 0 {
        return Vec::new();
    }
    let total = i128::from(triangular(n));
    let target = i128::from(objective_cents);

    let mut boxes: Vec<i64> = (1..=n as i128)
        .map(|k| (k * target / total) as i64)
        .collect();

    let shortfall = objective_cents - boxes.iter().sum::<i64>();
    if let Some(last) = boxes.last_mut() {
        *last += shortfall;
    }
    boxes
}

/// Box amounts for an objective. Empty for objectives below one cent.
pub fn generate_amounts(objective: f64) -> Vec<f64> {
    if !objective.is_finite() || objective <= 0.0 {
        return Vec::new();
    }
    generate_cents(to_cents(objective))
        .into_iter()
        .map(from_cents)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sum_cents(amounts: &[f64]) -> i64 {
        amounts.iter().map(|a| to_cents(*a)).sum()
    }

    #[test]
    fn test_classic_challenge_is_one_cent_per_day() {
        let amounts = generate_amounts(667.95);
        assert_eq!(amounts.len(), 365);
        assert_eq!(amounts[0], 0.01);
        assert_eq!(amounts[99], 1.00);
        assert_eq!(amounts[364], 3.65);
    }

    #[test]
    fn test_small_objective_absorbs_remainder_in_last_box() {
        let amounts = generate_amounts(10.0);
        // 44 * 45 / 2 = 990 cents, 10 cents left over
        assert_eq!(amounts.len(), 44);
        assert_eq!(amounts[0], 0.01);
        assert_eq!(amounts[42], 0.43);
        assert_eq!(amounts[43], 0.54);
        assert_eq!(sum_cents(&amounts), 1000);
    }

    #[test]
    fn test_sum_matches_objective() {
        for objective in [0.01, 0.5, 1.0, 3.33, 10.0, 99.99, 250.0, 1234.56, 10_000.0, 987_654.32] {
            let amounts = generate_amounts(objective);
            assert!(!amounts.is_empty(), "no boxes for {objective}");
            let sum: f64 = amounts.iter().sum();
            assert!((sum - objective).abs() < 0.01, "{objective}: sum was {sum}");
            assert_eq!(sum_cents(&amounts), to_cents(objective));
        }
    }

    #[test]
    fn test_non_decreasing_and_positive() {
        for objective in [0.03, 7.77, 55.0, 667.94, 668.0, 5_000.0, 123_456.78] {
            let amounts = generate_amounts(objective);
            assert!(amounts[0] > 0.0);
            for pair in amounts.windows(2) {
                assert!(pair[0] <= pair[1], "{objective}: {} > {}", pair[0], pair[1]);
            }
        }
    }

    #[test]
    fn test_box_count_is_capped() {
        assert_eq!(generate_amounts(50_000.0).len(), MAX_BOXES);
    }

    #[test]
    fn test_shortfall_stays_small() {
        let amounts = generate_amounts(10_000.0);
        let n = amounts.len();
        let last = to_cents(amounts[n - 1]);
        let before = to_cents(amounts[n - 2]);
        assert!(last - before < 2 * n as i64);
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(generate_amounts(432.1), generate_amounts(432.1));
    }

    #[test]
    fn test_non_positive_objective_yields_no_boxes() {
        assert!(generate_amounts(0.0).is_empty());
        assert!(generate_amounts(-5.0).is_empty());
        assert!(generate_amounts(0.004).is_empty());
        assert!(generate_amounts(f64::NAN).is_empty());
        assert!(generate_amounts(f64::INFINITY).is_empty());
    }
}
