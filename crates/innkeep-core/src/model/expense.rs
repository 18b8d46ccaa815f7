use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::rules::validation::{require_positive, require_status, require_text};

string_enum! {
    pub enum ExpenseStatus {
        Pending => "pending",
        Approved => "approved",
        Rejected => "rejected",
        Paid => "paid",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: String,
    pub category: String,
    pub description: String,
    pub vendor: Option<String>,
    pub amount_cents: i64,
    pub expense_date: NaiveDate,
    /// Expense account charged
    pub account_id: String,
    pub status: ExpenseStatus,
    pub payment_account_id: Option<String>,
    pub transaction_id: Option<String>,
    pub approved_by: Option<String>,
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewExpense {
    pub category: String,
    pub description: String,
    pub vendor: Option<String>,
    pub amount_cents: i64,
    pub expense_date: NaiveDate,
    pub account_id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExpensePatch {
    pub category: Option<String>,
    pub description: Option<String>,
    pub vendor: Option<String>,
    pub amount_cents: Option<i64>,
    pub expense_date: Option<NaiveDate>,
    pub account_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExpenseFilter {
    pub status: Option<ExpenseStatus>,
    pub category: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// Expense totals for one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpenseCategorySummary {
    pub category: String,
    pub count: i64,
    pub amount_cents: i64,
    pub paid_cents: i64,
}

impl Expense {
    pub fn create(id: String, input: NewExpense) -> Result<Self> {
        let now = Utc::now();
        let expense = Self {
            id,
            category: input.category.trim().to_string(),
            description: input.description.trim().to_string(),
            vendor: input.vendor,
            amount_cents: input.amount_cents,
            expense_date: input.expense_date,
            account_id: input.account_id,
            status: ExpenseStatus::Pending,
            payment_account_id: None,
            transaction_id: None,
            approved_by: None,
            rejection_reason: None,
            created_at: now,
            updated_at: now,
        };
        expense.validate()?;
        Ok(expense)
    }

    pub fn validate(&self) -> Result<()> {
        require_text("category", &self.category)?;
        require_text("description", &self.description)?;
        require_text("account_id", &self.account_id)?;
        require_positive("amount_cents", self.amount_cents)
    }

    pub fn ensure_pending(&self, action: &'static str) -> Result<()> {
        require_status(
            "expense",
            &self.id,
            self.status,
            &[ExpenseStatus::Pending],
            action,
        )
    }

    pub fn apply(&mut self, patch: ExpensePatch) -> Result<()> {
        self.ensure_pending("update")?;
        if let Some(category) = patch.category {
            self.category = category.trim().to_string();
        }
        if let Some(description) = patch.description {
            self.description = description.trim().to_string();
        }
        if patch.vendor.is_some() {
            self.vendor = patch.vendor;
        }
        if let Some(amount) = patch.amount_cents {
            self.amount_cents = amount;
        }
        if let Some(date) = patch.expense_date {
            self.expense_date = date;
        }
        if let Some(account_id) = patch.account_id {
            self.account_id = account_id;
        }
        self.updated_at = Utc::now();
        self.validate()
    }

    pub fn approve(&mut self, approver: &str) -> Result<()> {
        self.ensure_pending("approve")?;
        require_text("approved_by", approver)?;
        self.status = ExpenseStatus::Approved;
        self.approved_by = Some(approver.to_string());
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn reject(&mut self, reason: &str) -> Result<()> {
        self.ensure_pending("reject")?;
        require_text("reason", reason)?;
        self.status = ExpenseStatus::Rejected;
        self.rejection_reason = Some(reason.to_string());
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn mark_paid(&mut self, payment_account_id: &str, transaction_id: &str) -> Result<()> {
        require_status(
            "expense",
            &self.id,
            self.status,
            &[ExpenseStatus::Approved],
            "pay",
        )?;
        self.status = ExpenseStatus::Paid;
        self.payment_account_id = Some(payment_account_id.to_string());
        self.transaction_id = Some(transaction_id.to_string());
        self.updated_at = Utc::now();
        Ok(())
    }
}
