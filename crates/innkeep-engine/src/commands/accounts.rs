//! Chart of accounts

use chrono::NaiveDate;
use innkeep_core::errors::InnkeepError;
use innkeep_core::model::{new_id, Account, AccountFilter, AccountPatch, NewAccount};
use innkeep_core::reports::{account_ledger as build_ledger, AccountLedger};
use innkeep_store::repo::hydration::load_posted_lines;
use innkeep_store::SqliteRepo;
use rusqlite::Connection;

use crate::Result;

/// Parent must exist, share the child's type, and not descend from it
fn check_parent(conn: &Connection, account: &Account) -> Result<()> {
    let Some(parent_id) = &account.parent_id else {
        return Ok(());
    };
    let parent = SqliteRepo::require_account(conn, parent_id)?;
    parent.require_type(&[account.account_type])?;

    let mut cursor = parent.parent_id;
    while let Some(ancestor_id) = cursor {
        if ancestor_id == account.id {
            return Err(InnkeepError::invalid("parent_id", "would create a cycle").into());
        }
        cursor = SqliteRepo::require_account(conn, &ancestor_id)?.parent_id;
    }
    Ok(())
}

pub fn account_create(conn: &Connection, input: NewAccount) -> Result<Account> {
    logged!("account_create", {
        let account = Account::create(new_id(), input)?;
        check_parent(conn, &account)?;
        SqliteRepo::insert_account(conn, &account)?;
        Ok(account)
    })
}

/// Type and balance are not editable; system accounts stay active
pub fn account_update(conn: &Connection, id: &str, patch: AccountPatch) -> Result<Account> {
    logged!("account_update", account_id = id; {
        let mut account = SqliteRepo::require_account(conn, id)?;
        let parent_changed = patch.parent_id.is_some();
        account.apply(patch)?;
        if parent_changed {
            check_parent(conn, &account)?;
        }
        SqliteRepo::update_account(conn, &account)?;
        Ok(account)
    })
}

pub fn account_get(conn: &Connection, id: &str) -> Result<Account> {
    logged!("account_get", { SqliteRepo::require_account(conn, id) })
}

pub fn account_list(conn: &Connection, filter: &AccountFilter) -> Result<Vec<Account>> {
    logged!("account_list", { SqliteRepo::list_accounts(conn, filter) })
}

pub fn account_delete(conn: &Connection, id: &str) -> Result<()> {
    logged!("account_delete", account_id = id; {
        let account = SqliteRepo::require_account(conn, id)?;
        let in_use = |reason: String| InnkeepError::InUse {
            entity: "account",
            id: id.to_string(),
            reason,
        };
        if account.is_system {
            return Err(in_use("system accounts cannot be deleted".to_string()).into());
        }
        let children = SqliteRepo::count_child_accounts(conn, id)?;
        if children > 0 {
            return Err(in_use(format!("{} child accounts", children)).into());
        }
        let lines = SqliteRepo::count_journal_lines(conn, id)?;
        if lines > 0 {
            return Err(in_use(format!("{} journal lines", lines)).into());
        }
        SqliteRepo::delete_account(conn, id)
    })
}

/// Posted lines of one account with a running balance
pub fn account_ledger(
    conn: &Connection,
    id: &str,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Result<AccountLedger> {
    logged!("account_ledger", account_id = id; {
        let account = SqliteRepo::require_account(conn, id)?;
        let lines = load_posted_lines(conn, to, Some(id))?;
        Ok(build_ledger(&account, &lines, from, to))
    })
}
