//! Invoices, invoice items and payments
//!
//! Invoice totals are not stored; they are re-derived from items and
//! payments every time an invoice is loaded.

use chrono::NaiveDate;
use innkeep_core::model::{Invoice, InvoiceFilter, InvoiceItem, InvoiceStatus, Payment};
use innkeep_core::reports::BilledLine;
use rusqlite::{params, Connection, Row};

use super::rows::{enum_col, execute_one, query_all, query_opt, ts};
use super::SqliteRepo;
use crate::errors::{from_rusqlite, not_found, Result};

const INVOICE_COLUMNS: &str = "id, invoice_number, guest_id, reservation_id, status, issued_on, \
                               notes, void_reason, created_at, updated_at";

const ITEM_COLUMNS: &str = "id, invoice_id, description, category, quantity, unit_price_cents, \
                            amount_cents, tax_cents, service_date, transaction_id, created_at";

const PAYMENT_COLUMNS: &str =
    "id, invoice_id, amount_cents, method, reference, received_at, transaction_id";

fn invoice_from_row(row: &Row<'_>) -> rusqlite::Result<Invoice> {
    Ok(Invoice {
        id: row.get(0)?,
        invoice_number: row.get(1)?,
        guest_id: row.get(2)?,
        reservation_id: row.get(3)?,
        status: enum_col(row, 4)?,
        subtotal_cents: 0,
        tax_cents: 0,
        total_cents: 0,
        paid_cents: 0,
        balance_cents: 0,
        issued_on: row.get(5)?,
        notes: row.get(6)?,
        void_reason: row.get(7)?,
        items: Vec::new(),
        payments: Vec::new(),
        created_at: ts(row.get(8)?),
        updated_at: ts(row.get(9)?),
    })
}

fn item_from_row(row: &Row<'_>) -> rusqlite::Result<InvoiceItem> {
    Ok(InvoiceItem {
        id: row.get(0)?,
        invoice_id: row.get(1)?,
        description: row.get(2)?,
        category: enum_col(row, 3)?,
        quantity: row.get(4)?,
        unit_price_cents: row.get(5)?,
        amount_cents: row.get(6)?,
        tax_cents: row.get(7)?,
        service_date: row.get(8)?,
        transaction_id: row.get(9)?,
        created_at: ts(row.get(10)?),
    })
}

fn payment_from_row(row: &Row<'_>) -> rusqlite::Result<Payment> {
    Ok(Payment {
        id: row.get(0)?,
        invoice_id: row.get(1)?,
        amount_cents: row.get(2)?,
        method: enum_col(row, 3)?,
        reference: row.get(4)?,
        received_at: ts(row.get(5)?),
        transaction_id: row.get(6)?,
    })
}

/// Attach items and payments, then derive totals
fn hydrate_invoice(conn: &Connection, mut invoice: Invoice) -> Result<Invoice> {
    invoice.items = query_all(
        conn,
        &format!("SELECT {} FROM invoice_items WHERE invoice_id = ?1 ORDER BY id", ITEM_COLUMNS),
        [&invoice.id],
        item_from_row,
    )?;
    invoice.payments = query_all(
        conn,
        &format!(
            "SELECT {} FROM payments WHERE invoice_id = ?1 ORDER BY received_at, id",
            PAYMENT_COLUMNS
        ),
        [&invoice.id],
        payment_from_row,
    )?;
    invoice.recompute();
    Ok(invoice)
}

impl SqliteRepo {
    pub fn insert_invoice(conn: &Connection, invoice: &Invoice) -> Result<()> {
        conn.execute(
            &format!(
                "INSERT INTO invoices ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                INVOICE_COLUMNS
            ),
            params![
                invoice.id,
                invoice.invoice_number,
                invoice.guest_id,
                invoice.reservation_id,
                invoice.status.as_str(),
                invoice.issued_on,
                invoice.notes,
                invoice.void_reason,
                invoice.created_at.timestamp(),
                invoice.updated_at.timestamp(),
            ],
        )
        .map_err(from_rusqlite)?;
        Ok(())
    }

    /// Header fields only; items and payments have their own writes
    pub fn update_invoice(conn: &Connection, invoice: &Invoice) -> Result<()> {
        execute_one(
            conn,
            "UPDATE invoices SET status = ?2, notes = ?3, void_reason = ?4, updated_at = ?5
             WHERE id = ?1",
            params![
                invoice.id,
                invoice.status.as_str(),
                invoice.notes,
                invoice.void_reason,
                invoice.updated_at.timestamp(),
            ],
            "invoice",
            &invoice.id,
        )
    }

    pub fn get_invoice(conn: &Connection, id: &str) -> Result<Option<Invoice>> {
        let header = query_opt(
            conn,
            &format!("SELECT {} FROM invoices WHERE id = ?1", INVOICE_COLUMNS),
            [id],
            invoice_from_row,
        )?;
        header.map(|invoice| hydrate_invoice(conn, invoice)).transpose()
    }

    pub fn require_invoice(conn: &Connection, id: &str) -> Result<Invoice> {
        Self::get_invoice(conn, id)?.ok_or_else(|| not_found("invoice", id))
    }

    pub fn list_invoices(conn: &Connection, filter: &InvoiceFilter) -> Result<Vec<Invoice>> {
        let headers = query_all(
            conn,
            &format!(
                "SELECT {} FROM invoices
                 WHERE (?1 IS NULL OR status = ?1)
                   AND (?2 IS NULL OR guest_id = ?2)
                   AND (?3 IS NULL OR reservation_id = ?3)
                 ORDER BY issued_on, id",
                INVOICE_COLUMNS
            ),
            params![
                filter.status.map(|s| s.as_str()),
                filter.guest_id,
                filter.reservation_id,
            ],
            invoice_from_row,
        )?;
        headers
            .into_iter()
            .map(|invoice| hydrate_invoice(conn, invoice))
            .collect()
    }

    /// Invoices still owing money
    pub fn outstanding_invoices(conn: &Connection) -> Result<Vec<Invoice>> {
        let mut open = Self::list_invoices(
            conn,
            &InvoiceFilter {
                status: Some(InvoiceStatus::Open),
                ..Default::default()
            },
        )?;
        open.extend(Self::list_invoices(
            conn,
            &InvoiceFilter {
                status: Some(InvoiceStatus::PartiallyPaid),
                ..Default::default()
            },
        )?);
        open.retain(|i| i.balance_cents > 0);
        Ok(open)
    }

    pub fn insert_invoice_item(conn: &Connection, item: &InvoiceItem) -> Result<()> {
        conn.execute(
            &format!(
                "INSERT INTO invoice_items ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                ITEM_COLUMNS
            ),
            params![
                item.id,
                item.invoice_id,
                item.description,
                item.category.as_str(),
                item.quantity,
                item.unit_price_cents,
                item.amount_cents,
                item.tax_cents,
                item.service_date,
                item.transaction_id,
                item.created_at.timestamp(),
            ],
        )
        .map_err(from_rusqlite)?;
        Ok(())
    }

    pub fn delete_invoice_item(conn: &Connection, item_id: &str) -> Result<()> {
        execute_one(
            conn,
            "DELETE FROM invoice_items WHERE id = ?1",
            [item_id],
            "invoice item",
            item_id,
        )
    }

    pub fn insert_payment(conn: &Connection, payment: &Payment) -> Result<()> {
        conn.execute(
            &format!(
                "INSERT INTO payments ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                PAYMENT_COLUMNS
            ),
            params![
                payment.id,
                payment.invoice_id,
                payment.amount_cents,
                payment.method.as_str(),
                payment.reference,
                payment.received_at.timestamp(),
                payment.transaction_id,
            ],
        )
        .map_err(from_rusqlite)?;
        Ok(())
    }

    /// Items on non-void invoices with a service date in `[from, to]`
    pub fn billed_lines(conn: &Connection, from: NaiveDate, to: NaiveDate) -> Result<Vec<BilledLine>> {
        query_all(
            conn,
            "SELECT i.category, i.amount_cents, i.tax_cents
             FROM invoice_items i JOIN invoices v ON v.id = i.invoice_id
             WHERE v.status <> ?3 AND i.service_date >= ?1 AND i.service_date <= ?2
             ORDER BY i.service_date, i.id",
            params![from, to, InvoiceStatus::Void.as_str()],
            |row| {
                Ok(BilledLine {
                    category: enum_col(row, 0)?,
                    amount_cents: row.get(1)?,
                    tax_cents: row.get(2)?,
                })
            },
        )
    }
}
