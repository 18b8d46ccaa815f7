//! Budget against actuals

use chrono::NaiveDate;
use serde::Serialize;

use crate::model::{Account, AccountType, Budget};
use crate::money::ratio_bp;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BudgetVariance {
    pub budget_id: String,
    pub name: String,
    pub account_id: String,
    pub account_code: String,
    pub account_name: String,
    pub account_type: AccountType,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub budget_cents: i64,
    pub actual_cents: i64,
    pub variance_cents: i64,
    pub utilization_bp: i64,
    pub over_budget: bool,
}

/// `actual_cents` is the account's net movement in its normal direction
/// over the budget period.
pub fn budget_variance(budget: &Budget, account: &Account, actual_cents: i64) -> BudgetVariance {
    let over_budget = match account.account_type {
        AccountType::Revenue => actual_cents < budget.amount_cents,
        _ => actual_cents > budget.amount_cents,
    };
    BudgetVariance {
        budget_id: budget.id.clone(),
        name: budget.name.clone(),
        account_id: account.id.clone(),
        account_code: account.code.clone(),
        account_name: account.name.clone(),
        account_type: account.account_type,
        period_start: budget.period_start,
        period_end: budget.period_end,
        budget_cents: budget.amount_cents,
        actual_cents,
        variance_cents: budget.amount_cents - actual_cents,
        utilization_bp: ratio_bp(actual_cents, budget.amount_cents),
        over_budget,
    }
}
