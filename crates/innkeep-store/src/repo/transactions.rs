//! Journal transactions and their lines

use chrono::NaiveDate;
use innkeep_core::model::{JournalLine, Transaction, TransactionFilter, TransactionStatus};
use rusqlite::{params, Connection, Row};

use super::rows::{enum_col, execute_one, opt_ts, query_all, query_opt, ts};
use super::SqliteRepo;
use crate::errors::{from_rusqlite, not_found, Result};

const TRANSACTION_COLUMNS: &str = "id, reference, txn_date, description, status, source, \
                                   source_id, created_at, voided_at, void_reason";

const LINE_COLUMNS: &str =
    "id, transaction_id, line_no, account_id, debit_cents, credit_cents, memo";

fn transaction_from_row(row: &Row<'_>) -> rusqlite::Result<Transaction> {
    Ok(Transaction {
        id: row.get(0)?,
        reference: row.get(1)?,
        txn_date: row.get(2)?,
        description: row.get(3)?,
        status: enum_col(row, 4)?,
        source: enum_col(row, 5)?,
        source_id: row.get(6)?,
        lines: Vec::new(),
        created_at: ts(row.get(7)?),
        voided_at: opt_ts(row.get(8)?),
        void_reason: row.get(9)?,
    })
}

fn line_from_row(row: &Row<'_>) -> rusqlite::Result<JournalLine> {
    Ok(JournalLine {
        id: row.get(0)?,
        transaction_id: row.get(1)?,
        line_no: row.get(2)?,
        account_id: row.get(3)?,
        debit_cents: row.get(4)?,
        credit_cents: row.get(5)?,
        memo: row.get(6)?,
    })
}

fn with_lines(conn: &Connection, mut txn: Transaction) -> Result<Transaction> {
    txn.lines = SqliteRepo::journal_lines(conn, &txn.id)?;
    Ok(txn)
}

impl SqliteRepo {
    /// Write the header and every line; callers wrap this in a SQL transaction
    pub fn insert_transaction(conn: &Connection, txn: &Transaction) -> Result<()> {
        conn.execute(
            &format!(
                "INSERT INTO transactions ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                TRANSACTION_COLUMNS
            ),
            params![
                txn.id,
                txn.reference,
                txn.txn_date,
                txn.description,
                txn.status.as_str(),
                txn.source.as_str(),
                txn.source_id,
                txn.created_at.timestamp(),
                txn.voided_at.map(|t| t.timestamp()),
                txn.void_reason,
            ],
        )
        .map_err(from_rusqlite)?;

        let mut stmt = conn
            .prepare(&format!(
                "INSERT INTO journal_lines ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                LINE_COLUMNS
            ))
            .map_err(from_rusqlite)?;
        for line in &txn.lines {
            stmt.execute(params![
                line.id,
                line.transaction_id,
                line.line_no,
                line.account_id,
                line.debit_cents,
                line.credit_cents,
                line.memo,
            ])
            .map_err(from_rusqlite)?;
        }
        Ok(())
    }

    pub fn mark_transaction_void(conn: &Connection, txn: &Transaction) -> Result<()> {
        execute_one(
            conn,
            "UPDATE transactions SET status = ?2, voided_at = ?3, void_reason = ?4 WHERE id = ?1",
            params![
                txn.id,
                txn.status.as_str(),
                txn.voided_at.map(|t| t.timestamp()),
                txn.void_reason,
            ],
            "transaction",
            &txn.id,
        )
    }

    pub fn journal_lines(conn: &Connection, transaction_id: &str) -> Result<Vec<JournalLine>> {
        query_all(
            conn,
            &format!(
                "SELECT {} FROM journal_lines WHERE transaction_id = ?1 ORDER BY line_no",
                LINE_COLUMNS
            ),
            [transaction_id],
            line_from_row,
        )
    }

    pub fn get_transaction(conn: &Connection, id: &str) -> Result<Option<Transaction>> {
        let header = query_opt(
            conn,
            &format!("SELECT {} FROM transactions WHERE id = ?1", TRANSACTION_COLUMNS),
            [id],
            transaction_from_row,
        )?;
        header.map(|txn| with_lines(conn, txn)).transpose()
    }

    pub fn require_transaction(conn: &Connection, id: &str) -> Result<Transaction> {
        Self::get_transaction(conn, id)?.ok_or_else(|| not_found("transaction", id))
    }

    pub fn list_transactions(
        conn: &Connection,
        filter: &TransactionFilter,
    ) -> Result<Vec<Transaction>> {
        let headers = query_all(
            conn,
            &format!(
                "SELECT {} FROM transactions t
                 WHERE (?1 IS NULL OR t.txn_date >= ?1)
                   AND (?2 IS NULL OR t.txn_date <= ?2)
                   AND (?3 IS NULL OR EXISTS (
                        SELECT 1 FROM journal_lines l
                        WHERE l.transaction_id = t.id AND l.account_id = ?3))
                   AND (?4 IS NULL OR t.source = ?4)
                   AND (?5 IS NULL OR t.status = ?5)
                 ORDER BY t.txn_date, t.id",
                TRANSACTION_COLUMNS
            ),
            params![
                filter.from,
                filter.to,
                filter.account_id,
                filter.source.map(|s| s.as_str()),
                filter.status.map(|s| s.as_str()),
            ],
            transaction_from_row,
        )?;
        headers.into_iter().map(|txn| with_lines(conn, txn)).collect()
    }

    /// Posted debit and credit totals on an account for `[from, to]`
    pub fn account_movement(
        conn: &Connection,
        account_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<(i64, i64)> {
        conn.query_row(
            "SELECT COALESCE(SUM(l.debit_cents), 0), COALESCE(SUM(l.credit_cents), 0)
             FROM journal_lines l JOIN transactions t ON t.id = l.transaction_id
             WHERE l.account_id = ?1 AND t.status = ?4 AND t.txn_date >= ?2 AND t.txn_date <= ?3",
            params![account_id, from, to, TransactionStatus::Posted.as_str()],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .map_err(from_rusqlite)
    }
}
