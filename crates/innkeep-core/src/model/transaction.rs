use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::rules::validation::require_status;

string_enum! {
    pub enum TransactionStatus {
        Posted => "posted",
        Void => "void",
    }
}

string_enum! {
    /// What produced a transaction
    pub enum TransactionSource {
        Manual => "manual",
        Invoice => "invoice",
        Payment => "payment",
        Expense => "expense",
        Payroll => "payroll",
    }
}

/// One side of a double-entry posting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalLine {
    pub id: String,
    pub transaction_id: String,
    pub line_no: u32,
    pub account_id: String,
    pub debit_cents: i64,
    pub credit_cents: i64,
    pub memo: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewJournalLine {
    pub account_id: String,
    #[serde(default)]
    pub debit_cents: i64,
    #[serde(default)]
    pub credit_cents: i64,
    pub memo: Option<String>,
}

impl NewJournalLine {
    pub fn debit(account_id: impl Into<String>, amount_cents: i64) -> Self {
        Self {
            account_id: account_id.into(),
            debit_cents: amount_cents,
            credit_cents: 0,
            memo: None,
        }
    }

    pub fn credit(account_id: impl Into<String>, amount_cents: i64) -> Self {
        Self {
            account_id: account_id.into(),
            debit_cents: 0,
            credit_cents: amount_cents,
            memo: None,
        }
    }

    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = Some(memo.into());
        self
    }
}

/// A balanced set of journal lines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub reference: String,
    pub txn_date: NaiveDate,
    pub description: String,
    pub status: TransactionStatus,
    pub source: TransactionSource,
    pub source_id: Option<String>,
    pub lines: Vec<JournalLine>,
    pub created_at: DateTime<Utc>,
    pub voided_at: Option<DateTime<Utc>>,
    pub void_reason: Option<String>,
}

impl Transaction {
    pub fn total_debits(&self) -> i64 {
        self.lines.iter().map(|l| l.debit_cents).sum()
    }

    pub fn total_credits(&self) -> i64 {
        self.lines.iter().map(|l| l.credit_cents).sum()
    }

    pub fn void(&mut self, reason: Option<String>, at: DateTime<Utc>) -> Result<()> {
        require_status(
            "transaction",
            &self.id,
            self.status,
            &[TransactionStatus::Posted],
            "void",
        )?;
        self.status = TransactionStatus::Void;
        self.voided_at = Some(at);
        self.void_reason = reason;
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewTransaction {
    pub txn_date: NaiveDate,
    pub description: String,
    pub lines: Vec<NewJournalLine>,
    #[serde(default = "manual")]
    pub source: TransactionSource,
    pub source_id: Option<String>,
}

fn manual() -> TransactionSource {
    TransactionSource::Manual
}

impl NewTransaction {
    /// System-generated posting tied to another record
    pub fn system(
        txn_date: NaiveDate,
        description: impl Into<String>,
        source: TransactionSource,
        source_id: impl Into<String>,
        lines: Vec<NewJournalLine>,
    ) -> Self {
        Self {
            txn_date,
            description: description.into(),
            lines,
            source,
            source_id: Some(source_id.into()),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransactionFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub account_id: Option<String>,
    pub source: Option<TransactionSource>,
    pub status: Option<TransactionStatus>,
}
