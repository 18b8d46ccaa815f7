use chrono::NaiveDate;
use innkeep_core::model::{new_id, ItemCategory, NewTaxRate, TaxRate, TaxRatePatch};
use innkeep_core::ops::tax_ops::compute_tax;
use innkeep_core::ops::TaxBreakdown;
use innkeep_core::reports::{tax_report as build_tax_report, TaxReport};
use innkeep_core::rules::validation::{require_date_order, require_non_negative};
use innkeep_store::SqliteRepo;
use rusqlite::Connection;

use crate::Result;

const SALES_TAX_PAYABLE: &str = "2100";

pub fn tax_rate_create(conn: &Connection, input: NewTaxRate) -> Result<TaxRate> {
    logged!("tax_rate_create", {
        let rate = TaxRate::create(new_id(), input)?;
        SqliteRepo::insert_tax_rate(conn, &rate)?;
        Ok(rate)
    })
}

pub fn tax_rate_update(conn: &Connection, id: &str, patch: TaxRatePatch) -> Result<TaxRate> {
    logged!("tax_rate_update", tax_rate_id = id; {
        let mut rate = SqliteRepo::require_tax_rate(conn, id)?;
        rate.apply(patch)?;
        SqliteRepo::update_tax_rate(conn, &rate)?;
        Ok(rate)
    })
}

pub fn tax_rate_get(conn: &Connection, id: &str) -> Result<TaxRate> {
    logged!("tax_rate_get", { SqliteRepo::require_tax_rate(conn, id) })
}

pub fn tax_rate_list(conn: &Connection, active_only: bool) -> Result<Vec<TaxRate>> {
    logged!("tax_rate_list", { SqliteRepo::list_tax_rates(conn, active_only) })
}

pub fn tax_rate_delete(conn: &Connection, id: &str) -> Result<()> {
    logged!("tax_rate_delete", tax_rate_id = id; { SqliteRepo::delete_tax_rate(conn, id) })
}

/// Tax the active rates would charge on `amount_cents` of `category`
pub fn tax_compute(conn: &Connection, amount_cents: i64, category: ItemCategory) -> Result<TaxBreakdown> {
    logged!("tax_compute", {
        require_non_negative("amount_cents", amount_cents)?;
        let rates = SqliteRepo::list_tax_rates(conn, true)?;
        Ok(compute_tax(amount_cents, category, &rates))
    })
}

/// Tax billed per category in `[from, to]` and what is still owed
pub fn tax_report(conn: &Connection, from: NaiveDate, to: NaiveDate) -> Result<TaxReport> {
    logged!("tax_report", {
        require_date_order("to", from, to)?;
        let lines = SqliteRepo::billed_lines(conn, from, to)?;
        let payable = SqliteRepo::require_account_by_code(conn, SALES_TAX_PAYABLE)?;
        Ok(build_tax_report(from, to, &lines, payable.balance_cents))
    })
}
