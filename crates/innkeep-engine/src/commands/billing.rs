//! Invoices, line items and payments
//!
//! Every line and payment is mirrored in the ledger:
//! a line posts Dr Accounts Receivable / Cr revenue (/ Cr Sales Tax Payable),
//! a payment posts Dr Cash or Bank / Cr Accounts Receivable.

use chrono::{NaiveDate, Utc};
use innkeep_core::model::{
    dated_reference, new_id, Invoice, InvoiceFilter, InvoiceItem, NewInvoice, NewInvoiceItem,
    NewJournalLine, NewPayment, NewTransaction, Payment, TransactionSource,
};
use innkeep_core::money::{checked_add, checked_mul};
use innkeep_core::ops::tax_ops::compute_tax;
use innkeep_store::SqliteRepo;
use rusqlite::Connection;
use serde::Serialize;

use super::posting::{post_in, void_in};
use super::{begin, commit, insert_with_fresh_reference};
use crate::Result;

const RECEIVABLE: &str = "1200";
const SALES_TAX_PAYABLE: &str = "2100";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutstandingSummary {
    pub invoice_count: i64,
    pub balance_cents: i64,
    pub invoices: Vec<Invoice>,
}

/// Open an invoice inside the caller's SQL transaction
pub(crate) fn open_invoice_in(conn: &Connection, input: NewInvoice, today: NaiveDate) -> Result<Invoice> {
    SqliteRepo::require_guest(conn, &input.guest_id)?;
    if let Some(reservation_id) = &input.reservation_id {
        SqliteRepo::require_reservation(conn, reservation_id)?;
    }
    let mut invoice = Invoice::create(new_id(), dated_reference("INV", today), input, today)?;
    insert_with_fresh_reference(
        &mut invoice,
        |i| i.invoice_number = dated_reference("INV", today),
        |i| SqliteRepo::insert_invoice(conn, i),
    )?;
    Ok(invoice)
}

/// Tax, recognise and attach one line. Zero-value lines are kept on the
/// folio without a ledger posting.
pub(crate) fn add_item_in(
    conn: &Connection,
    invoice: &mut Invoice,
    input: NewInvoiceItem,
    today: NaiveDate,
) -> Result<()> {
    invoice.ensure_accepts_items()?;
    let rates = SqliteRepo::list_tax_rates(conn, true)?;
    let amount = checked_mul("unit_price_cents", input.quantity, input.unit_price_cents)?;
    let tax = compute_tax(amount, input.category, &rates);
    let mut item = InvoiceItem::create(new_id(), invoice.id.clone(), input, tax.tax_cents, today)?;
    let gross = item.gross_cents()?;
    checked_add("amount_cents", invoice.total_cents, gross)?;

    if gross > 0 {
        let revenue = SqliteRepo::require_account_by_code(conn, item.category.revenue_account_code())?;
        let receivable = SqliteRepo::require_account_by_code(conn, RECEIVABLE)?;
        let mut lines = vec![
            NewJournalLine::debit(receivable.id, gross),
            NewJournalLine::credit(revenue.id, item.amount_cents),
        ];
        if item.tax_cents > 0 {
            let tax_payable = SqliteRepo::require_account_by_code(conn, SALES_TAX_PAYABLE)?;
            lines.push(NewJournalLine::credit(tax_payable.id, item.tax_cents));
        }
        let txn = post_in(
            conn,
            &NewTransaction::system(
                item.service_date,
                format!("{}: {}", invoice.invoice_number, item.description),
                TransactionSource::Invoice,
                invoice.id.clone(),
                lines,
            ),
        )?;
        item.transaction_id = Some(txn.id);
    }

    SqliteRepo::insert_invoice_item(conn, &item)?;
    invoice.add_item(item)?;
    SqliteRepo::update_invoice(conn, invoice)?;
    Ok(())
}

pub fn invoice_create(conn: &mut Connection, input: NewInvoice, today: NaiveDate) -> Result<Invoice> {
    logged!("invoice_create", {
        let tx = begin(conn)?;
        let invoice = open_invoice_in(&tx, input, today)?;
        commit(tx)?;
        Ok(invoice)
    })
}

pub fn invoice_add_item(
    conn: &mut Connection,
    id: &str,
    input: NewInvoiceItem,
    today: NaiveDate,
) -> Result<Invoice> {
    logged!("invoice_add_item", invoice_id = id; {
        let tx = begin(conn)?;
        let mut invoice = SqliteRepo::require_invoice(&tx, id)?;
        add_item_in(&tx, &mut invoice, input, today)?;
        commit(tx)?;
        Ok(invoice)
    })
}

/// Drop a line and void its revenue posting; refused once money was received
pub fn invoice_remove_item(conn: &mut Connection, id: &str, item_id: &str) -> Result<Invoice> {
    logged!("invoice_remove_item", invoice_id = id, item_id = item_id; {
        let tx = begin(conn)?;
        let mut invoice = SqliteRepo::require_invoice(&tx, id)?;
        let removed = invoice.remove_item(item_id)?;
        if let Some(txn_id) = &removed.transaction_id {
            void_in(&tx, txn_id, Some(format!("Line removed from {}", invoice.invoice_number)))?;
        }
        SqliteRepo::delete_invoice_item(&tx, &removed.id)?;
        SqliteRepo::update_invoice(&tx, &invoice)?;
        commit(tx)?;
        Ok(invoice)
    })
}

pub fn invoice_record_payment(
    conn: &mut Connection,
    id: &str,
    input: NewPayment,
    today: NaiveDate,
) -> Result<Invoice> {
    logged!("invoice_record_payment", invoice_id = id; {
        let tx = begin(conn)?;
        let mut invoice = SqliteRepo::require_invoice(&tx, id)?;
        let mut payment = Payment {
            id: new_id(),
            invoice_id: invoice.id.clone(),
            amount_cents: input.amount_cents,
            method: input.method,
            reference: input.reference,
            received_at: Utc::now(),
            transaction_id: None,
        };
        invoice.record_payment(payment.clone())?;

        let cash = SqliteRepo::require_account_by_code(&tx, payment.method.cash_account_code())?;
        let receivable = SqliteRepo::require_account_by_code(&tx, RECEIVABLE)?;
        let txn = post_in(
            &tx,
            &NewTransaction::system(
                today,
                format!("Payment on {} ({})", invoice.invoice_number, payment.method),
                TransactionSource::Payment,
                payment.id.clone(),
                vec![
                    NewJournalLine::debit(cash.id, payment.amount_cents),
                    NewJournalLine::credit(receivable.id, payment.amount_cents),
                ],
            ),
        )?;
        payment.transaction_id = Some(txn.id);
        SqliteRepo::insert_payment(&tx, &payment)?;
        if let Some(recorded) = invoice.payments.iter_mut().find(|p| p.id == payment.id) {
            recorded.transaction_id = payment.transaction_id.clone();
        }
        SqliteRepo::update_invoice(&tx, &invoice)?;
        commit(tx)?;
        Ok(invoice)
    })
}

/// Void an unpaid invoice and every revenue posting behind it
pub fn invoice_void(conn: &mut Connection, id: &str, reason: Option<String>) -> Result<Invoice> {
    logged!("invoice_void", invoice_id = id; {
        let tx = begin(conn)?;
        let mut invoice = SqliteRepo::require_invoice(&tx, id)?;
        invoice.void(reason)?;
        for item in &invoice.items {
            if let Some(txn_id) = &item.transaction_id {
                void_in(&tx, txn_id, Some(format!("Invoice {} voided", invoice.invoice_number)))?;
            }
        }
        SqliteRepo::update_invoice(&tx, &invoice)?;
        commit(tx)?;
        Ok(invoice)
    })
}

pub fn invoice_get(conn: &Connection, id: &str) -> Result<Invoice> {
    logged!("invoice_get", { SqliteRepo::require_invoice(conn, id) })
}

pub fn invoice_list(conn: &Connection, filter: &InvoiceFilter) -> Result<Vec<Invoice>> {
    logged!("invoice_list", { SqliteRepo::list_invoices(conn, filter) })
}

/// Open and partially paid invoices with their combined balance
pub fn invoice_outstanding(conn: &Connection) -> Result<OutstandingSummary> {
    logged!("invoice_outstanding", {
        let invoices = SqliteRepo::outstanding_invoices(conn)?;
        Ok(OutstandingSummary {
            invoice_count: invoices.len() as i64,
            balance_cents: invoices.iter().map(|i| i.balance_cents).sum(),
            invoices,
        })
    })
}
