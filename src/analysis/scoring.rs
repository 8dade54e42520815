//! Axis score computation.
//!
//! Statuses map to points (ok 2, warn 1, fail 0, na excluded) and each
//! axis is the point fraction scaled to 0..10, rounded to one decimal.
//! All three axes are derived from the same main-checklist population.

use crate::models::{AuditItem, Scores};

/// Score for one item population, `0.0` when nothing is scored.
pub fn axis_score(items: &[AuditItem]) -> f64 {
    let points: Vec<u32> = items.iter().filter_map(|i| i.status.points()).collect();
    if points.is_empty() {
        return 0.0;
    }

    let earned: u32 = points.iter().sum();
    let maximum = 2 * points.len() as u32;
    round_one(10.0 * f64::from(earned) / f64::from(maximum))
}

/// All three axis scores for the main checklist.
pub fn compute_scores(main_items: &[AuditItem]) -> Scores {
    let score = axis_score(main_items);
    Scores {
        visibility: score,
        seo: score,
        geo: score,
    }
}

fn round_one(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Status;

    fn item(status: Status) -> AuditItem {
        AuditItem::new("X", status, "", "")
    }

    #[test]
    fn test_empty_population_scores_zero() {
        assert_eq!(axis_score(&[]), 0.0);
        assert_eq!(axis_score(&[item(Status::Na)]), 0.0);
    }

    #[test]
    fn test_all_ok_is_ten() {
        let items = vec![item(Status::Ok), item(Status::Ok)];
        assert_eq!(axis_score(&items), 10.0);
    }

    #[test]
    fn test_mixed_population_rounds_to_one_decimal() {
        // 2 + 1 + 0 = 3 of 6 -> 5.0; adding a warn -> 4 of 8 -> 5.0;
        // ok, warn, fail, fail -> 3 of 8 -> 3.8 after rounding.
        let items = vec![
            item(Status::Ok),
            item(Status::Warn),
            item(Status::Fail),
            item(Status::Fail),
        ];
        assert_eq!(axis_score(&items), 3.8);
    }

    #[test]
    fn test_na_excluded_from_denominator() {
        let with_na = vec![item(Status::Ok), item(Status::Na)];
        assert_eq!(axis_score(&with_na), 10.0);
    }

    #[test]
    fn test_score_bounds_and_monotonicity() {
        let mut items = vec![
            item(Status::Fail),
            item(Status::Fail),
            item(Status::Warn),
            item(Status::Ok),
        ];

        let mut previous = 0.0;
        for index in 0..items.len() {
            let score = axis_score(&items);
            assert!((0.0..=10.0).contains(&score));
            assert!(score >= previous);
            previous = score;
            items[index] = item(Status::Ok);
        }
        assert_eq!(axis_score(&items), 10.0);
    }

    #[test]
    fn test_axes_are_identical() {
        let items = vec![item(Status::Ok), item(Status::Warn)];
        let scores = compute_scores(&items);
        assert_eq!(scores.visibility, scores.seo);
        assert_eq!(scores.seo, scores.geo);
        assert_eq!(scores.visibility, 7.5);
    }
}
