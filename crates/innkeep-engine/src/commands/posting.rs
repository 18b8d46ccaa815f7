//! Double-entry posting
//!
//! `post_in` and `void_in` run inside the caller's SQL transaction, so an
//! automatic posting commits or rolls back together with the invoice line,
//! payment, expense or payroll run that caused it.

use chrono::Utc;
use innkeep_core::errors::InnkeepError;
use innkeep_core::ledger::validate_lines;
use innkeep_core::model::{
    dated_reference, new_id, Account, AccountType, JournalLine, NewTransaction, Transaction,
    TransactionFilter, TransactionSource, TransactionStatus,
};
use innkeep_core::BalanceChange;
use innkeep_store::repo::hydration::load_ledger;
use innkeep_store::SqliteRepo;
use rusqlite::Connection;

use super::{begin, commit, insert_with_fresh_reference};
use crate::Result;

/// Validate, apply and store a posting.
///
/// Line structure is checked before accounts are looked up, so a malformed
/// or unbalanced posting fails the same way whether or not its accounts
/// exist.
pub(crate) fn post_in(conn: &Connection, input: &NewTransaction) -> Result<Transaction> {
    validate_lines(&input.lines)?;
    let mut ledger = load_ledger(conn, input.lines.iter().map(|l| l.account_id.as_str()))?;
    let changes = ledger.post(input)?;

    let id = new_id();
    let lines = input
        .lines
        .iter()
        .enumerate()
        .map(|(i, l)| JournalLine {
            id: new_id(),
            transaction_id: id.clone(),
            line_no: i as u32 + 1,
            account_id: l.account_id.clone(),
            debit_cents: l.debit_cents,
            credit_cents: l.credit_cents,
            memo: l.memo.clone(),
        })
        .collect();
    let mut txn = Transaction {
        id,
        reference: dated_reference("TXN", input.txn_date),
        txn_date: input.txn_date,
        description: input.description.trim().to_string(),
        status: TransactionStatus::Posted,
        source: input.source,
        source_id: input.source_id.clone(),
        lines,
        created_at: Utc::now(),
        voided_at: None,
        void_reason: None,
    };
    insert_with_fresh_reference(
        &mut txn,
        |t| t.reference = dated_reference("TXN", t.txn_date),
        |t| SqliteRepo::insert_transaction(conn, t),
    )?;
    persist_balances(conn, &changes)?;

    tracing::debug!(
        transaction_id = %txn.id,
        reference = %txn.reference,
        source = %txn.source,
        lines = txn.lines.len(),
        "transaction posted"
    );
    Ok(txn)
}

/// Reverse a posted transaction's balance effect and mark it void
pub(crate) fn void_in(conn: &Connection, id: &str, reason: Option<String>) -> Result<Transaction> {
    let mut txn = SqliteRepo::require_transaction(conn, id)?;
    txn.void(reason, Utc::now())?;
    let mut ledger = load_ledger(conn, txn.lines.iter().map(|l| l.account_id.as_str()))?;
    let changes = ledger.reverse(&txn.lines)?;
    SqliteRepo::mark_transaction_void(conn, &txn)?;
    persist_balances(conn, &changes)?;

    tracing::debug!(transaction_id = %txn.id, "transaction voided");
    Ok(txn)
}

fn persist_balances(conn: &Connection, changes: &[BalanceChange]) -> Result<()> {
    let now = Utc::now().timestamp();
    for change in changes {
        SqliteRepo::update_account_balance(conn, &change.account_id, change.new_balance_cents, now)?;
    }
    Ok(())
}

/// An explicitly chosen asset account, or the system account `default_code`
pub(crate) fn asset_account(
    conn: &Connection,
    account_id: Option<&str>,
    default_code: &str,
) -> Result<Account> {
    let account = match account_id {
        Some(id) => SqliteRepo::require_account(conn, id)?,
        None => SqliteRepo::require_account_by_code(conn, default_code)?,
    };
    account.require_type(&[AccountType::Asset])?;
    Ok(account)
}

/// Post a balanced set of journal lines as one transaction
pub fn transaction_post(conn: &mut Connection, input: NewTransaction) -> Result<Transaction> {
    logged!("transaction_post", {
        let tx = begin(conn)?;
        let txn = post_in(&tx, &input)?;
        commit(tx)?;
        Ok(txn)
    })
}

/// Void a manual posting. Automatic postings belong to the invoice,
/// payment, expense or payroll run that made them and are reversed
/// through that record.
pub fn transaction_void(
    conn: &mut Connection,
    id: &str,
    reason: Option<String>,
) -> Result<Transaction> {
    logged!("transaction_void", transaction_id = id; {
        let tx = begin(conn)?;
        let existing = SqliteRepo::require_transaction(&tx, id)?;
        if existing.source != TransactionSource::Manual {
            return Err(InnkeepError::InUse {
                entity: "transaction",
                id: existing.id,
                reason: format!(
                    "posted by {} {}",
                    existing.source,
                    existing.source_id.as_deref().unwrap_or("-")
                ),
            }
            .into());
        }
        let txn = void_in(&tx, id, reason)?;
        commit(tx)?;
        Ok(txn)
    })
}

pub fn transaction_get(conn: &Connection, id: &str) -> Result<Transaction> {
    logged!("transaction_get", { SqliteRepo::require_transaction(conn, id) })
}

pub fn transaction_list(conn: &Connection, filter: &TransactionFilter) -> Result<Vec<Transaction>> {
    logged!("transaction_list", { SqliteRepo::list_transactions(conn, filter) })
}
