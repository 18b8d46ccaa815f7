use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{InnkeepError, Result};
use crate::rules::validation::{require_date_order, require_text};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceReview {
    pub id: String,
    pub employee_id: String,
    pub reviewer_id: Option<String>,
    pub review_date: NaiveDate,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    /// 1 (poor) to 5 (outstanding)
    pub rating: u8,
    pub strengths: Option<String>,
    pub improvements: Option<String>,
    pub goals: Option<String>,
    pub comments: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewReview {
    pub employee_id: String,
    pub reviewer_id: Option<String>,
    pub review_date: NaiveDate,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub rating: u8,
    pub strengths: Option<String>,
    pub improvements: Option<String>,
    pub goals: Option<String>,
    pub comments: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewPatch {
    pub reviewer_id: Option<String>,
    pub review_date: Option<NaiveDate>,
    pub period_start: Option<NaiveDate>,
    pub period_end: Option<NaiveDate>,
    pub rating: Option<u8>,
    pub strengths: Option<String>,
    pub improvements: Option<String>,
    pub goals: Option<String>,
    pub comments: Option<String>,
}

impl PerformanceReview {
    pub fn create(id: String, input: NewReview) -> Result<Self> {
        let now = Utc::now();
        let review = Self {
            id,
            employee_id: input.employee_id,
            reviewer_id: input.reviewer_id,
            review_date: input.review_date,
            period_start: input.period_start,
            period_end: input.period_end,
            rating: input.rating,
            strengths: input.strengths,
            improvements: input.improvements,
            goals: input.goals,
            comments: input.comments,
            created_at: now,
            updated_at: now,
        };
        review.validate()?;
        Ok(review)
    }

    pub fn validate(&self) -> Result<()> {
        require_text("employee_id", &self.employee_id)?;
        if !(1..=5).contains(&self.rating) {
            return Err(InnkeepError::invalid("rating", "must be between 1 and 5"));
        }
        require_date_order("period_end", self.period_start, self.period_end)?;
        if self.reviewer_id.as_deref() == Some(self.employee_id.as_str()) {
            return Err(InnkeepError::invalid(
                "reviewer_id",
                "an employee cannot review themselves",
            ));
        }
        Ok(())
    }

    pub fn apply(&mut self, patch: ReviewPatch) -> Result<()> {
        if patch.reviewer_id.is_some() {
            self.reviewer_id = patch.reviewer_id;
        }
        if let Some(date) = patch.review_date {
            self.review_date = date;
        }
        if let Some(start) = patch.period_start {
            self.period_start = start;
        }
        if let Some(end) = patch.period_end {
            self.period_end = end;
        }
        if let Some(rating) = patch.rating {
            self.rating = rating;
        }
        if patch.strengths.is_some() {
            self.strengths = patch.strengths;
        }
        if patch.improvements.is_some() {
            self.improvements = patch.improvements;
        }
        if patch.goals.is_some() {
            self.goals = patch.goals;
        }
        if patch.comments.is_some() {
            self.comments = patch.comments;
        }
        self.updated_at = Utc::now();
        self.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(rating: u8, reviewer: Option<&str>) -> NewReview {
        let d = NaiveDate::from_ymd_opt(2026, 6, 30).unwrap();
        NewReview {
            employee_id: "e-1".to_string(),
            reviewer_id: reviewer.map(str::to_string),
            review_date: d,
            period_start: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            period_end: d,
            rating,
            strengths: None,
            improvements: None,
            goals: None,
            comments: None,
        }
    }

    #[test]
    fn test_rating_range() {
        assert!(PerformanceReview::create("p-1".to_string(), input(0, None)).is_err());
        assert!(PerformanceReview::create("p-1".to_string(), input(6, None)).is_err());
        assert!(PerformanceReview::create("p-1".to_string(), input(5, Some("e-2"))).is_ok());
    }

    #[test]
    fn test_self_review_rejected() {
        assert!(PerformanceReview::create("p-1".to_string(), input(3, Some("e-1"))).is_err());
    }
}
