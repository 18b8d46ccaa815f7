use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::rules::validation::{require_date_order, require_non_negative, require_text};

/// Planned amount for one account over a period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub id: String,
    pub name: String,
    pub account_id: String,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub amount_cents: i64,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewBudget {
    pub name: String,
    pub account_id: String,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub amount_cents: i64,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BudgetPatch {
    pub name: Option<String>,
    pub account_id: Option<String>,
    pub period_start: Option<NaiveDate>,
    pub period_end: Option<NaiveDate>,
    pub amount_cents: Option<i64>,
    pub notes: Option<String>,
}

impl Budget {
    pub fn create(id: String, input: NewBudget) -> Result<Self> {
        let now = Utc::now();
        let budget = Self {
            id,
            name: input.name.trim().to_string(),
            account_id: input.account_id,
            period_start: input.period_start,
            period_end: input.period_end,
            amount_cents: input.amount_cents,
            notes: input.notes,
            created_at: now,
            updated_at: now,
        };
        budget.validate()?;
        Ok(budget)
    }

    pub fn validate(&self) -> Result<()> {
        require_text("name", &self.name)?;
        require_text("account_id", &self.account_id)?;
        require_date_order("period_end", self.period_start, self.period_end)?;
        require_non_negative("amount_cents", self.amount_cents)
    }

    pub fn apply(&mut self, patch: BudgetPatch) -> Result<()> {
        if let Some(name) = patch.name {
            self.name = name.trim().to_string();
        }
        if let Some(account_id) = patch.account_id {
            self.account_id = account_id;
        }
        if let Some(start) = patch.period_start {
            self.period_start = start;
        }
        if let Some(end) = patch.period_end {
            self.period_end = end;
        }
        if let Some(amount) = patch.amount_cents {
            self.amount_cents = amount;
        }
        if patch.notes.is_some() {
            self.notes = patch.notes;
        }
        self.updated_at = Utc::now();
        self.validate()
    }
}
