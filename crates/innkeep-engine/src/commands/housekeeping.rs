//! Housekeeping tasks and the room-status side effects of finishing them

use chrono::{NaiveDate, Utc};
use innkeep_core::model::{new_id, HousekeepingTask, NewTask, RoomStatus, TaskFilter, TaskType};
use innkeep_store::SqliteRepo;
use rusqlite::Connection;

use super::{begin, commit};
use crate::Result;

const MAINTENANCE_FAMILY: &[TaskType] = &[TaskType::Maintenance];

/// A maintenance task takes a free room off the market until it is done
pub fn task_create(conn: &mut Connection, input: NewTask, today: NaiveDate) -> Result<HousekeepingTask> {
    logged!("task_create", {
        let tx = begin(conn)?;
        let mut room = SqliteRepo::require_room(&tx, &input.room_id)?;
        if let Some(employee_id) = &input.assigned_to {
            SqliteRepo::require_employee(&tx, employee_id)?.ensure_active("assign tasks to")?;
        }
        let task = HousekeepingTask::create(new_id(), input, today)?;
        SqliteRepo::insert_task(&tx, &task)?;

        if task.task_type == TaskType::Maintenance
            && matches!(room.status, RoomStatus::Available | RoomStatus::Cleaning)
        {
            room.set_status_manually(RoomStatus::Maintenance)?;
            SqliteRepo::update_room(&tx, &room)?;
        }
        commit(tx)?;
        Ok(task)
    })
}

pub fn task_assign(conn: &Connection, id: &str, employee_id: &str) -> Result<HousekeepingTask> {
    logged!("task_assign", task_id = id, employee_id = employee_id; {
        let mut task = SqliteRepo::require_task(conn, id)?;
        SqliteRepo::require_employee(conn, employee_id)?.ensure_active("assign tasks to")?;
        task.assign(employee_id)?;
        SqliteRepo::update_task(conn, &task)?;
        Ok(task)
    })
}

pub fn task_start(conn: &Connection, id: &str) -> Result<HousekeepingTask> {
    logged!("task_start", task_id = id; {
        let mut task = SqliteRepo::require_task(conn, id)?;
        task.start(Utc::now())?;
        SqliteRepo::update_task(conn, &task)?;
        Ok(task)
    })
}

/// Finishing the last open task of a family releases the room it held:
/// cleaning, inspection and turndown clear `cleaning`, maintenance clears
/// `maintenance`.
pub fn task_complete(conn: &mut Connection, id: &str) -> Result<HousekeepingTask> {
    logged!("task_complete", task_id = id; {
        let tx = begin(conn)?;
        let mut task = SqliteRepo::require_task(&tx, id)?;
        task.complete(Utc::now())?;
        SqliteRepo::update_task(&tx, &task)?;

        let mut room = SqliteRepo::require_room(&tx, &task.room_id)?;
        let family: Option<(&[TaskType], RoomStatus)> = if task.task_type.is_cleaning_family() {
            Some((TaskType::CLEANING_FAMILY, RoomStatus::Cleaning))
        } else if task.task_type == TaskType::Maintenance {
            Some((MAINTENANCE_FAMILY, RoomStatus::Maintenance))
        } else {
            None
        };
        if let Some((types, held_status)) = family {
            if room.status == held_status
                && SqliteRepo::count_open_tasks(&tx, &room.id, types, &task.id)? == 0
            {
                room.set_status_manually(RoomStatus::Available)?;
                SqliteRepo::update_room(&tx, &room)?;
                tracing::debug!(room_id = %room.id, "room released");
            }
        }
        commit(tx)?;
        Ok(task)
    })
}

pub fn task_cancel(conn: &Connection, id: &str) -> Result<HousekeepingTask> {
    logged!("task_cancel", task_id = id; {
        let mut task = SqliteRepo::require_task(conn, id)?;
        task.cancel()?;
        SqliteRepo::update_task(conn, &task)?;
        Ok(task)
    })
}

pub fn task_get(conn: &Connection, id: &str) -> Result<HousekeepingTask> {
    logged!("task_get", { SqliteRepo::require_task(conn, id) })
}

pub fn task_list(conn: &Connection, filter: &TaskFilter) -> Result<Vec<HousekeepingTask>> {
    logged!("task_list", { SqliteRepo::list_tasks(conn, filter) })
}
