use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::rules::validation::{require_status, require_text};

string_enum! {
    pub enum TaskType {
        Cleaning => "cleaning",
        Inspection => "inspection",
        Maintenance => "maintenance",
        Turndown => "turndown",
    }
}

impl TaskType {
    /// Task types that clear a room out of `cleaning`
    pub const CLEANING_FAMILY: &'static [TaskType] =
        &[TaskType::Cleaning, TaskType::Inspection, TaskType::Turndown];

    pub fn is_cleaning_family(&self) -> bool {
        Self::CLEANING_FAMILY.contains(self)
    }
}

string_enum! {
    pub enum TaskPriority {
        Low => "low",
        Normal => "normal",
        High => "high",
        Urgent => "urgent",
    }
}

string_enum! {
    pub enum TaskStatus {
        Pending => "pending",
        InProgress => "in_progress",
        Completed => "completed",
        Cancelled => "cancelled",
    }
}

impl TaskStatus {
    pub const OPEN: &'static [TaskStatus] = &[TaskStatus::Pending, TaskStatus::InProgress];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HousekeepingTask {
    pub id: String,
    pub room_id: String,
    pub task_type: TaskType,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    pub assigned_to: Option<String>,
    pub scheduled_for: NaiveDate,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewTask {
    pub room_id: String,
    pub task_type: TaskType,
    pub priority: Option<TaskPriority>,
    pub assigned_to: Option<String>,
    /// Defaults to today
    pub scheduled_for: Option<NaiveDate>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskFilter {
    pub status: Option<TaskStatus>,
    pub room_id: Option<String>,
    pub assigned_to: Option<String>,
    pub scheduled_for: Option<NaiveDate>,
}

impl HousekeepingTask {
    pub fn create(id: String, input: NewTask, today: NaiveDate) -> Result<Self> {
        require_text("room_id", &input.room_id)?;
        Ok(Self {
            id,
            room_id: input.room_id,
            task_type: input.task_type,
            priority: input.priority.unwrap_or(TaskPriority::Normal),
            status: TaskStatus::Pending,
            assigned_to: input.assigned_to,
            scheduled_for: input.scheduled_for.unwrap_or(today),
            notes: input.notes,
            created_at: Utc::now(),
            started_at: None,
            completed_at: None,
        })
    }

    pub fn is_open(&self) -> bool {
        TaskStatus::OPEN.contains(&self.status)
    }

    pub fn assign(&mut self, employee_id: &str) -> Result<()> {
        require_status("task", &self.id, self.status, TaskStatus::OPEN, "assign")?;
        self.assigned_to = Some(employee_id.to_string());
        Ok(())
    }

    pub fn start(&mut self, at: DateTime<Utc>) -> Result<()> {
        require_status("task", &self.id, self.status, &[TaskStatus::Pending], "start")?;
        self.status = TaskStatus::InProgress;
        self.started_at = Some(at);
        Ok(())
    }

    pub fn complete(&mut self, at: DateTime<Utc>) -> Result<()> {
        require_status("task", &self.id, self.status, TaskStatus::OPEN, "complete")?;
        self.status = TaskStatus::Completed;
        self.completed_at = Some(at);
        Ok(())
    }

    pub fn cancel(&mut self) -> Result<()> {
        require_status("task", &self.id, self.status, TaskStatus::OPEN, "cancel")?;
        self.status = TaskStatus::Cancelled;
        Ok(())
    }
}
