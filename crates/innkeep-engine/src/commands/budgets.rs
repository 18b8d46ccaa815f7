use innkeep_core::model::{new_id, AccountType, Budget, BudgetPatch, NewBudget};
use innkeep_core::ops::budget_ops::budget_variance as compute_variance;
use innkeep_core::ops::BudgetVariance;
use innkeep_store::SqliteRepo;
use rusqlite::Connection;

use crate::Result;

fn check_budget_account(conn: &Connection, account_id: &str) -> Result<()> {
    SqliteRepo::require_account(conn, account_id)?
        .require_type(&[AccountType::Expense, AccountType::Revenue])?;
    Ok(())
}

pub fn budget_create(conn: &Connection, input: NewBudget) -> Result<Budget> {
    logged!("budget_create", {
        let budget = Budget::create(new_id(), input)?;
        check_budget_account(conn, &budget.account_id)?;
        SqliteRepo::insert_budget(conn, &budget)?;
        Ok(budget)
    })
}

pub fn budget_update(conn: &Connection, id: &str, patch: BudgetPatch) -> Result<Budget> {
    logged!("budget_update", budget_id = id; {
        let mut budget = SqliteRepo::require_budget(conn, id)?;
        budget.apply(patch)?;
        check_budget_account(conn, &budget.account_id)?;
        SqliteRepo::update_budget(conn, &budget)?;
        Ok(budget)
    })
}

pub fn budget_get(conn: &Connection, id: &str) -> Result<Budget> {
    logged!("budget_get", { SqliteRepo::require_budget(conn, id) })
}

pub fn budget_list(conn: &Connection) -> Result<Vec<Budget>> {
    logged!("budget_list", { SqliteRepo::list_budgets(conn) })
}

pub fn budget_delete(conn: &Connection, id: &str) -> Result<()> {
    logged!("budget_delete", budget_id = id; { SqliteRepo::delete_budget(conn, id) })
}

/// Budget against posted actuals, for one budget or all of them
pub fn budget_variance(conn: &Connection, budget_id: Option<&str>) -> Result<Vec<BudgetVariance>> {
    logged!("budget_variance", {
        let budgets = match budget_id {
            Some(id) => vec![SqliteRepo::require_budget(conn, id)?],
            None => SqliteRepo::list_budgets(conn)?,
        };
        let mut rows = Vec::with_capacity(budgets.len());
        for budget in &budgets {
            let account = SqliteRepo::require_account(conn, &budget.account_id)?;
            let (debit, credit) = SqliteRepo::account_movement(
                conn,
                &account.id,
                budget.period_start,
                budget.period_end,
            )?;
            let actual = account.account_type.signed_delta(debit, credit);
            rows.push(compute_variance(budget, &account, actual));
        }
        Ok(rows)
    })
}
