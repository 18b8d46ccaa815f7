//! Hydration layer - loads ledger state and posted journal lines
//!
//! The engine posts through an in-memory `Ledger` built from here, and the
//! report paths fold over the `PostedLine`s loaded here.

#![allow(clippy::result_large_err)]

use chrono::NaiveDate;
use innkeep_core::model::{Account, AccountFilter, TransactionStatus};
use innkeep_core::reports::PostedLine;
use innkeep_core::Ledger;
use rusqlite::{params, Connection, Row};

use super::rows::{enum_col, query_all};
use super::SqliteRepo;
use crate::errors::Result;

/// Load the named accounts into a ledger; a missing id is `NotFound`
pub fn load_ledger<'a>(
    conn: &Connection,
    account_ids: impl IntoIterator<Item = &'a str>,
) -> Result<Ledger> {
    let mut accounts: Vec<Account> = Vec::new();
    for id in account_ids {
        if accounts.iter().any(|a| a.id == id) {
            continue;
        }
        accounts.push(SqliteRepo::require_account(conn, id)?);
    }
    Ok(Ledger::new(accounts))
}

/// Every account, ordered by code
pub fn load_all_accounts(conn: &Connection) -> Result<Vec<Account>> {
    SqliteRepo::list_accounts(conn, &AccountFilter::default())
}

fn posted_line_from_row(row: &Row<'_>) -> rusqlite::Result<PostedLine> {
    Ok(PostedLine {
        transaction_id: row.get(0)?,
        reference: row.get(1)?,
        description: row.get(2)?,
        txn_date: row.get(3)?,
        account_id: row.get(4)?,
        account_type: enum_col(row, 5)?,
        debit_cents: row.get(6)?,
        credit_cents: row.get(7)?,
        memo: row.get(8)?,
    })
}

/// Lines of posted transactions dated on or before `to`, optionally for one
/// account, in posting order
pub fn load_posted_lines(
    conn: &Connection,
    to: Option<NaiveDate>,
    account_id: Option<&str>,
) -> Result<Vec<PostedLine>> {
    query_all(
        conn,
        "SELECT t.id, t.reference, t.description, t.txn_date, l.account_id, a.account_type,
                l.debit_cents, l.credit_cents, l.memo
         FROM journal_lines l
         JOIN transactions t ON t.id = l.transaction_id
         JOIN accounts a ON a.id = l.account_id
         WHERE t.status = ?1
           AND (?2 IS NULL OR t.txn_date <= ?2)
           AND (?3 IS NULL OR l.account_id = ?3)
         ORDER BY t.txn_date, t.id, l.line_no",
        params![TransactionStatus::Posted.as_str(), to, account_id],
        posted_line_from_row,
    )
}
