use chrono::NaiveDate;
use serde::Serialize;

use crate::model::PerformanceReview;
use crate::money::div_round;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PerformanceSummary {
    pub employee_id: String,
    pub review_count: i64,
    /// Average rating × 100, e.g. 367 for 3.67
    pub average_rating_hundredths: i64,
    pub latest_review_date: Option<NaiveDate>,
}

pub fn performance_summary(employee_id: &str, reviews: &[PerformanceReview]) -> PerformanceSummary {
    let mine: Vec<&PerformanceReview> = reviews.iter().filter(|r| r.employee_id == employee_id).collect();
    let count = mine.len() as i64;
    let total: i64 = mine.iter().map(|r| r.rating as i64).sum();
    PerformanceSummary {
        employee_id: employee_id.to_string(),
        review_count: count,
        average_rating_hundredths: if count == 0 {
            0
        } else {
            div_round(total as i128 * 100, count as i128)
        },
        latest_review_date: mine.iter().map(|r| r.review_date).max(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NewReview;

    fn review(id: &str, rating: u8, day: u32) -> PerformanceReview {
        let d = NaiveDate::from_ymd_opt(2026, 1, day).unwrap();
        PerformanceReview::create(
            id.to_string(),
            NewReview {
                employee_id: "e-1".to_string(),
                reviewer_id: None,
                review_date: d,
                period_start: d,
                period_end: d,
                rating,
                strengths: None,
                improvements: None,
                goals: None,
                comments: None,
            },
        )
        .unwrap()
    }

    #[test]
    fn test_average_in_hundredths() {
        let reviews = vec![review("p-1", 4, 3), review("p-2", 4, 9), review("p-3", 3, 5)];
        let s = performance_summary("e-1", &reviews);
        assert_eq!(s.review_count, 3);
        assert_eq!(s.average_rating_hundredths, 367);
        assert_eq!(s.latest_review_date, NaiveDate::from_ymd_opt(2026, 1, 9));
    }

    #[test]
    fn test_no_reviews() {
        let s = performance_summary("e-9", &[]);
        assert_eq!(s.review_count, 0);
        assert_eq!(s.average_rating_hundredths, 0);
        assert!(s.latest_review_date.is_none());
    }
}
