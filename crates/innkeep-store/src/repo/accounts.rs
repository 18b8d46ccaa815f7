//! Chart of accounts

use innkeep_core::model::{Account, AccountFilter};
use rusqlite::{params, Connection, Row};

use super::rows::{count, enum_col, execute_one, query_all, query_opt, ts};
use super::SqliteRepo;
use crate::errors::{from_rusqlite, not_found, Result};

const ACCOUNT_COLUMNS: &str = "id, code, name, account_type, parent_id, description, \
                                          balance_cents, is_active, is_system, created_at, updated_at";

fn account_from_row(row: &Row<'_>) -> rusqlite::Result<Account> {
    Ok(Account {
        id: row.get(0)?,
        code: row.get(1)?,
        name: row.get(2)?,
        account_type: enum_col(row, 3)?,
        parent_id: row.get(4)?,
        description: row.get(5)?,
        balance_cents: row.get(6)?,
        is_active: row.get(7)?,
        is_system: row.get(8)?,
        created_at: ts(row.get(9)?),
        updated_at: ts(row.get(10)?),
    })
}

impl SqliteRepo {
    pub fn insert_account(conn: &Connection, account: &Account) -> Result<()> {
        conn.execute(
            &format!(
                "INSERT INTO accounts ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                ACCOUNT_COLUMNS
            ),
            params![
                account.id,
                account.code,
                account.name,
                account.account_type.as_str(),
                account.parent_id,
                account.description,
                account.balance_cents,
                account.is_active,
                account.is_system,
                account.created_at.timestamp(),
                account.updated_at.timestamp(),
            ],
        )
        .map_err(from_rusqlite)?;
        Ok(())
    }

    /// Descriptive fields; balances move only through `update_account_balance`
    pub fn update_account(conn: &Connection, account: &Account) -> Result<()> {
        execute_one(
            conn,
            "UPDATE accounts SET name = ?2, parent_id = ?3, description = ?4, is_active = ?5,
                updated_at = ?6
             WHERE id = ?1",
            params![
                account.id,
                account.name,
                account.parent_id,
                account.description,
                account.is_active,
                account.updated_at.timestamp(),
            ],
            "account",
            &account.id,
        )
    }

    pub fn update_account_balance(
        conn: &Connection,
        account_id: &str,
        balance_cents: i64,
        updated_at: i64,
    ) -> Result<()> {
        execute_one(
            conn,
            "UPDATE accounts SET balance_cents = ?2, updated_at = ?3 WHERE id = ?1",
            params![account_id, balance_cents, updated_at],
            "account",
            account_id,
        )
    }

    pub fn get_account(conn: &Connection, id: &str) -> Result<Option<Account>> {
        query_opt(
            conn,
            &format!("SELECT {} FROM accounts WHERE id = ?1", ACCOUNT_COLUMNS),
            [id],
            account_from_row,
        )
    }

    pub fn require_account(conn: &Connection, id: &str) -> Result<Account> {
        Self::get_account(conn, id)?.ok_or_else(|| not_found("account", id))
    }

    pub fn get_account_by_code(conn: &Connection, code: &str) -> Result<Option<Account>> {
        query_opt(
            conn,
            &format!("SELECT {} FROM accounts WHERE code = ?1", ACCOUNT_COLUMNS),
            [code],
            account_from_row,
        )
    }

    pub fn require_account_by_code(conn: &Connection, code: &str) -> Result<Account> {
        Self::get_account_by_code(conn, code)?.ok_or_else(|| not_found("account", code))
    }

    pub fn list_accounts(conn: &Connection, filter: &AccountFilter) -> Result<Vec<Account>> {
        query_all(
            conn,
            &format!(
                "SELECT {} FROM accounts
                 WHERE (?1 IS NULL OR account_type = ?1) AND (?2 IS NULL OR is_active = ?2)
                 ORDER BY code",
                ACCOUNT_COLUMNS
            ),
            params![filter.account_type.map(|t| t.as_str()), filter.is_active],
            account_from_row,
        )
    }

    pub fn delete_account(conn: &Connection, id: &str) -> Result<()> {
        execute_one(conn, "DELETE FROM accounts WHERE id = ?1", [id], "account", id)
    }

    pub fn count_child_accounts(conn: &Connection, id: &str) -> Result<i64> {
        count(conn, "SELECT COUNT(*) FROM accounts WHERE parent_id = ?1", [id])
    }

    /// Journal lines of any status that reference the account
    pub fn count_journal_lines(conn: &Connection, account_id: &str) -> Result<i64> {
        count(
            conn,
            "SELECT COUNT(*) FROM journal_lines WHERE account_id = ?1",
            [account_id],
        )
    }
}
