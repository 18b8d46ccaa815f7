//! Report aggregation
//!
//! Every function here is a pure fold over rows the store has already
//! loaded, so the same figures come out of the API, the CLI and tests.

pub mod dashboard;
pub mod financial;
pub mod occupancy;
pub mod revenue;

pub use dashboard::Dashboard;
pub use financial::{
    account_ledger, balance_sheet, income_statement, trial_balance, AccountLedger, BalanceSheet,
    IncomeStatement, LedgerEntry, PostedLine, StatementRow, TrialBalance, TrialBalanceRow,
};
pub use occupancy::{occupancy, NightOccupancy, OccupancyReport, SoldStay};
pub use revenue::{
    revenue_by_category, tax_report, BilledLine, CategoryRevenue, RevenueByCategory, TaxReport,
};
