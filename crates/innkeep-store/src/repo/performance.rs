//! Performance reviews

use innkeep_core::model::PerformanceReview;
use rusqlite::{params, Connection, Row};

use super::rows::{execute_one, query_all, query_opt, ts};
use super::SqliteRepo;
use crate::errors::{from_rusqlite, not_found, Result};

const REVIEW_COLUMNS: &str = "id, employee_id, reviewer_id, review_date, period_start, period_end, \
     rating, strengths, improvements, goals, comments, created_at, updated_at";

fn review_from_row(row: &Row<'_>) -> rusqlite::Result<PerformanceReview> {
    Ok(PerformanceReview {
        id: row.get(0)?,
        employee_id: row.get(1)?,
        reviewer_id: row.get(2)?,
        review_date: row.get(3)?,
        period_start: row.get(4)?,
        period_end: row.get(5)?,
        rating: row.get(6)?,
        strengths: row.get(7)?,
        improvements: row.get(8)?,
        goals: row.get(9)?,
        comments: row.get(10)?,
        created_at: ts(row.get(11)?),
        updated_at: ts(row.get(12)?),
    })
}

impl SqliteRepo {
    pub fn insert_review(conn: &Connection, r: &PerformanceReview) -> Result<()> {
        conn.execute(
            &format!(
                "INSERT INTO performance_reviews ({}) VALUES
                 (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
                REVIEW_COLUMNS
            ),
            params![
                r.id,
                r.employee_id,
                r.reviewer_id,
                r.review_date,
                r.period_start,
                r.period_end,
                r.rating,
                r.strengths,
                r.improvements,
                r.goals,
                r.comments,
                r.created_at.timestamp(),
                r.updated_at.timestamp(),
            ],
        )
        .map_err(from_rusqlite)?;
        Ok(())
    }

    pub fn update_review(conn: &Connection, r: &PerformanceReview) -> Result<()> {
        execute_one(
            conn,
            "UPDATE performance_reviews SET reviewer_id = ?2, review_date = ?3, period_start = ?4,
                period_end = ?5, rating = ?6, strengths = ?7, improvements = ?8, goals = ?9,
                comments = ?10, updated_at = ?11
             WHERE id = ?1",
            params![
                r.id,
                r.reviewer_id,
                r.review_date,
                r.period_start,
                r.period_end,
                r.rating,
                r.strengths,
                r.improvements,
                r.goals,
                r.comments,
                r.updated_at.timestamp(),
            ],
            "performance review",
            &r.id,
        )
    }

    pub fn get_review(conn: &Connection, id: &str) -> Result<Option<PerformanceReview>> {
        query_opt(
            conn,
            &format!("SELECT {} FROM performance_reviews WHERE id = ?1", REVIEW_COLUMNS),
            [id],
            review_from_row,
        )
    }

    pub fn require_review(conn: &Connection, id: &str) -> Result<PerformanceReview> {
        Self::get_review(conn, id)?.ok_or_else(|| not_found("performance review", id))
    }

    /// Newest review first
    pub fn list_reviews(
        conn: &Connection,
        employee_id: Option<&str>,
    ) -> Result<Vec<PerformanceReview>> {
        query_all(
            conn,
            &format!(
                "SELECT {} FROM performance_reviews WHERE (?1 IS NULL OR employee_id = ?1)
                 ORDER BY review_date DESC, id DESC",
                REVIEW_COLUMNS
            ),
            [employee_id],
            review_from_row,
        )
    }

    pub fn delete_review(conn: &Connection, id: &str) -> Result<()> {
        execute_one(
            conn,
            "DELETE FROM performance_reviews WHERE id = ?1",
            [id],
            "performance review",
            id,
        )
    }
}
