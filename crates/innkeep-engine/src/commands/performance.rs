use innkeep_core::model::{new_id, NewReview, PerformanceReview, ReviewPatch};
use innkeep_core::ops::performance_ops::performance_summary as summarize;
use innkeep_core::ops::PerformanceSummary;
use innkeep_store::SqliteRepo;
use rusqlite::Connection;

use crate::Result;

pub fn review_create(conn: &Connection, input: NewReview) -> Result<PerformanceReview> {
    logged!("review_create", {
        SqliteRepo::require_employee(conn, &input.employee_id)?;
        if let Some(reviewer) = input.reviewer_id.as_deref() {
            SqliteRepo::require_employee(conn, reviewer)?;
        }
        let review = PerformanceReview::create(new_id(), input)?;
        SqliteRepo::insert_review(conn, &review)?;
        Ok(review)
    })
}

pub fn review_update(conn: &Connection, id: &str, patch: ReviewPatch) -> Result<PerformanceReview> {
    logged!("review_update", review_id = id; {
        let mut review = SqliteRepo::require_review(conn, id)?;
        if let Some(reviewer) = patch.reviewer_id.as_deref() {
            if review.reviewer_id.as_deref() != Some(reviewer) {
                SqliteRepo::require_employee(conn, reviewer)?;
            }
        }
        review.apply(patch)?;
        SqliteRepo::update_review(conn, &review)?;
        Ok(review)
    })
}

pub fn review_get(conn: &Connection, id: &str) -> Result<PerformanceReview> {
    logged!("review_get", { SqliteRepo::require_review(conn, id) })
}

pub fn review_list(conn: &Connection, employee_id: Option<&str>) -> Result<Vec<PerformanceReview>> {
    logged!("review_list", { SqliteRepo::list_reviews(conn, employee_id) })
}

pub fn review_delete(conn: &Connection, id: &str) -> Result<()> {
    logged!("review_delete", review_id = id; { SqliteRepo::delete_review(conn, id) })
}

/// Average rating across every review of the employee
pub fn performance_summary(conn: &Connection, employee_id: &str) -> Result<PerformanceSummary> {
    logged!("performance_summary", employee_id = employee_id; {
        SqliteRepo::require_employee(conn, employee_id)?;
        let reviews = SqliteRepo::list_reviews(conn, Some(employee_id))?;
        Ok(summarize(employee_id, &reviews))
    })
}
