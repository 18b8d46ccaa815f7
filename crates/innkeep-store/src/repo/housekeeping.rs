//! Housekeeping tasks

use innkeep_core::model::{HousekeepingTask, TaskFilter, TaskStatus, TaskType};
use rusqlite::{params, Connection, Row};

use super::rows::{count, enum_col, execute_one, opt_ts, query_all, query_opt, text_list, ts};
use super::SqliteRepo;
use crate::errors::{from_rusqlite, not_found, Result};

const TASK_COLUMNS: &str = "id, room_id, task_type, priority, status, assigned_to, scheduled_for, \
                            notes, created_at, started_at, completed_at";

fn task_from_row(row: &Row<'_>) -> rusqlite::Result<HousekeepingTask> {
    Ok(HousekeepingTask {
        id: row.get(0)?,
        room_id: row.get(1)?,
        task_type: enum_col(row, 2)?,
        priority: enum_col(row, 3)?,
        status: enum_col(row, 4)?,
        assigned_to: row.get(5)?,
        scheduled_for: row.get(6)?,
        notes: row.get(7)?,
        created_at: ts(row.get(8)?),
        started_at: opt_ts(row.get(9)?),
        completed_at: opt_ts(row.get(10)?),
    })
}

fn open_statuses() -> String {
    text_list(TaskStatus::OPEN.iter().map(|s| s.as_str()))
}

impl SqliteRepo {
    pub fn insert_task(conn: &Connection, task: &HousekeepingTask) -> Result<()> {
        conn.execute(
            &format!(
                "INSERT INTO housekeeping_tasks ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                TASK_COLUMNS
            ),
            params![
                task.id,
                task.room_id,
                task.task_type.as_str(),
                task.priority.as_str(),
                task.status.as_str(),
                task.assigned_to,
                task.scheduled_for,
                task.notes,
                task.created_at.timestamp(),
                task.started_at.map(|t| t.timestamp()),
                task.completed_at.map(|t| t.timestamp()),
            ],
        )
        .map_err(from_rusqlite)?;
        Ok(())
    }

    pub fn update_task(conn: &Connection, task: &HousekeepingTask) -> Result<()> {
        execute_one(
            conn,
            "UPDATE housekeeping_tasks SET priority = ?2, status = ?3, assigned_to = ?4,
                scheduled_for = ?5, notes = ?6, started_at = ?7, completed_at = ?8
             WHERE id = ?1",
            params![
                task.id,
                task.priority.as_str(),
                task.status.as_str(),
                task.assigned_to,
                task.scheduled_for,
                task.notes,
                task.started_at.map(|t| t.timestamp()),
                task.completed_at.map(|t| t.timestamp()),
            ],
            "housekeeping task",
            &task.id,
        )
    }

    pub fn get_task(conn: &Connection, id: &str) -> Result<Option<HousekeepingTask>> {
        query_opt(
            conn,
            &format!("SELECT {} FROM housekeeping_tasks WHERE id = ?1", TASK_COLUMNS),
            [id],
            task_from_row,
        )
    }

    pub fn require_task(conn: &Connection, id: &str) -> Result<HousekeepingTask> {
        Self::get_task(conn, id)?.ok_or_else(|| not_found("housekeeping task", id))
    }

    pub fn list_tasks(conn: &Connection, filter: &TaskFilter) -> Result<Vec<HousekeepingTask>> {
        query_all(
            conn,
            &format!(
                "SELECT {} FROM housekeeping_tasks
                 WHERE (?1 IS NULL OR status = ?1)
                   AND (?2 IS NULL OR room_id = ?2)
                   AND (?3 IS NULL OR assigned_to = ?3)
                   AND (?4 IS NULL OR scheduled_for = ?4)
                 ORDER BY scheduled_for, id",
                TASK_COLUMNS
            ),
            params![
                filter.status.map(|s| s.as_str()),
                filter.room_id,
                filter.assigned_to,
                filter.scheduled_for,
            ],
            task_from_row,
        )
    }

    /// Open tasks on a room whose type is one of `types`, other than `exclude_id`
    pub fn count_open_tasks(
        conn: &Connection,
        room_id: &str,
        types: &[TaskType],
        exclude_id: &str,
    ) -> Result<i64> {
        count(
            conn,
            &format!(
                "SELECT COUNT(*) FROM housekeeping_tasks
                 WHERE room_id = ?1 AND id <> ?2 AND status IN ({}) AND task_type IN ({})",
                open_statuses(),
                text_list(types.iter().map(|t| t.as_str()))
            ),
            params![room_id, exclude_id],
        )
    }

    pub fn count_tasks_with_status(conn: &Connection, status: TaskStatus) -> Result<i64> {
        count(
            conn,
            "SELECT COUNT(*) FROM housekeeping_tasks WHERE status = ?1",
            [status.as_str()],
        )
    }
}
