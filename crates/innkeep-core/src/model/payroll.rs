use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::rules::validation::require_status;

string_enum! {
    pub enum PayrollStatus {
        Draft => "draft",
        Paid => "paid",
    }
}

/// One employee's pay for a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payslip {
    pub id: String,
    pub run_id: String,
    pub employee_id: String,
    pub regular_minutes: i64,
    pub overtime_minutes: i64,
    pub base_pay_cents: i64,
    pub overtime_pay_cents: i64,
    pub unpaid_leave_deduction_cents: i64,
    pub gross_cents: i64,
    pub withholding_cents: i64,
    pub net_cents: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayrollRun {
    pub id: String,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub status: PayrollStatus,
    pub total_gross_cents: i64,
    pub total_deductions_cents: i64,
    pub total_net_cents: i64,
    pub transaction_id: Option<String>,
    pub payslips: Vec<Payslip>,
    pub created_at: DateTime<Utc>,
    pub paid_at: Option<DateTime<Utc>>,
}

impl PayrollRun {
    pub fn draft(id: String, period_start: NaiveDate, period_end: NaiveDate, payslips: Vec<Payslip>) -> Self {
        let mut run = Self {
            id,
            period_start,
            period_end,
            status: PayrollStatus::Draft,
            total_gross_cents: 0,
            total_deductions_cents: 0,
            total_net_cents: 0,
            transaction_id: None,
            payslips,
            created_at: Utc::now(),
            paid_at: None,
        };
        run.recompute();
        run
    }

    /// Totals are sums over payslips; deductions are withholding only
    pub fn recompute(&mut self) {
        self.total_gross_cents = self.payslips.iter().map(|p| p.gross_cents).sum();
        self.total_deductions_cents = self.payslips.iter().map(|p| p.withholding_cents).sum();
        self.total_net_cents = self.payslips.iter().map(|p| p.net_cents).sum();
    }

    pub fn overlaps(&self, from: NaiveDate, to: NaiveDate) -> bool {
        self.period_start <= to && from <= self.period_end
    }

    pub fn ensure_draft(&self, action: &'static str) -> Result<()> {
        require_status("payroll run", &self.id, self.status, &[PayrollStatus::Draft], action)
    }

    pub fn mark_paid(&mut self, transaction_id: Option<String>, at: DateTime<Utc>) -> Result<()> {
        self.ensure_draft("pay")?;
        self.status = PayrollStatus::Paid;
        self.transaction_id = transaction_id;
        self.paid_at = Some(at);
        Ok(())
    }
}
