use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{InnkeepError, Result};
use crate::money::{checked_add, checked_mul};
use crate::rules::validation::{require_non_negative, require_positive, require_status, require_text};

string_enum! {
    pub enum InvoiceStatus {
        Open => "open",
        PartiallyPaid => "partially_paid",
        Paid => "paid",
        Void => "void",
    }
}

string_enum! {
    /// Revenue category of an invoice line
    pub enum ItemCategory {
        Room => "room",
        FoodBeverage => "food_beverage",
        Service => "service",
        Minibar => "minibar",
        Other => "other",
    }
}

impl ItemCategory {
    /// Chart-of-accounts code credited when a line of this category is billed
    pub fn revenue_account_code(&self) -> &'static str {
        match self {
            ItemCategory::Room => "4000",
            ItemCategory::FoodBeverage | ItemCategory::Minibar => "4100",
            ItemCategory::Service => "4200",
            ItemCategory::Other => "4900",
        }
    }
}

string_enum! {
    pub enum PaymentMethod {
        Cash => "cash",
        Card => "card",
        BankTransfer => "bank_transfer",
    }
}

impl PaymentMethod {
    /// Asset account debited when the payment is received
    pub fn cash_account_code(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "1000",
            PaymentMethod::Card | PaymentMethod::BankTransfer => "1010",
        }
    }
}

/// A billable line on an invoice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceItem {
    pub id: String,
    pub invoice_id: String,
    pub description: String,
    pub category: ItemCategory,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub amount_cents: i64,
    pub tax_cents: i64,
    pub service_date: NaiveDate,
    /// Ledger posting that recognised this line
    pub transaction_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewInvoiceItem {
    pub description: String,
    pub category: ItemCategory,
    #[serde(default = "one")]
    pub quantity: i64,
    pub unit_price_cents: i64,
    /// Defaults to the day the item is added
    pub service_date: Option<NaiveDate>,
}

fn one() -> i64 {
    1
}

impl InvoiceItem {
    /// Build a line; tax is computed by the caller from active tax rates
    pub fn create(
        id: String,
        invoice_id: String,
        input: NewInvoiceItem,
        tax_cents: i64,
        service_date: NaiveDate,
    ) -> Result<Self> {
        require_text("description", &input.description)?;
        if input.quantity < 1 {
            return Err(InnkeepError::invalid("quantity", "must be at least 1"));
        }
        require_non_negative("unit_price_cents", input.unit_price_cents)?;
        require_non_negative("tax_cents", tax_cents)?;
        let amount_cents = checked_mul("unit_price_cents", input.quantity, input.unit_price_cents)?;
        checked_add("tax_cents", amount_cents, tax_cents)?;
        Ok(Self {
            id,
            invoice_id,
            description: input.description.trim().to_string(),
            category: input.category,
            quantity: input.quantity,
            unit_price_cents: input.unit_price_cents,
            amount_cents,
            tax_cents,
            service_date: input.service_date.unwrap_or(service_date),
            transaction_id: None,
            created_at: Utc::now(),
        })
    }

    pub fn gross_cents(&self) -> Result<i64> {
        checked_add("tax_cents", self.amount_cents, self.tax_cents)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: String,
    pub invoice_id: String,
    pub amount_cents: i64,
    pub method: PaymentMethod,
    pub reference: Option<String>,
    pub received_at: DateTime<Utc>,
    pub transaction_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewPayment {
    pub amount_cents: i64,
    pub method: PaymentMethod,
    pub reference: Option<String>,
}

/// A guest folio with its lines and payments
///
/// Money totals are derived from `items` and `payments` by `recompute`
/// and never edited directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: String,
    pub invoice_number: String,
    pub guest_id: String,
    pub reservation_id: Option<String>,
    pub status: InvoiceStatus,
    pub subtotal_cents: i64,
    pub tax_cents: i64,
    pub total_cents: i64,
    pub paid_cents: i64,
    pub balance_cents: i64,
    pub issued_on: NaiveDate,
    pub notes: Option<String>,
    pub void_reason: Option<String>,
    pub items: Vec<InvoiceItem>,
    pub payments: Vec<Payment>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewInvoice {
    pub guest_id: String,
    pub reservation_id: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InvoiceFilter {
    pub status: Option<InvoiceStatus>,
    pub guest_id: Option<String>,
    pub reservation_id: Option<String>,
}

fn saturating_total(amounts: impl Iterator<Item = i64>) -> i64 {
    amounts.fold(0, i64::saturating_add)
}

impl Invoice {
    pub fn create(
        id: String,
        invoice_number: String,
        input: NewInvoice,
        issued_on: NaiveDate,
    ) -> Result<Self> {
        require_text("guest_id", &input.guest_id)?;
        let now = Utc::now();
        Ok(Self {
            id,
            invoice_number,
            guest_id: input.guest_id,
            reservation_id: input.reservation_id,
            status: InvoiceStatus::Open,
            subtotal_cents: 0,
            tax_cents: 0,
            total_cents: 0,
            paid_cents: 0,
            balance_cents: 0,
            issued_on,
            notes: input.notes,
            void_reason: None,
            items: Vec::new(),
            payments: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Re-derive totals and the paid/partially-paid status
    pub fn recompute(&mut self) {
        self.subtotal_cents = saturating_total(self.items.iter().map(|i| i.amount_cents));
        self.tax_cents = saturating_total(self.items.iter().map(|i| i.tax_cents));
        self.total_cents = self.subtotal_cents.saturating_add(self.tax_cents);
        self.paid_cents = saturating_total(self.payments.iter().map(|p| p.amount_cents));
        self.balance_cents = self.total_cents.saturating_sub(self.paid_cents);

        if self.status == InvoiceStatus::Void {
            return;
        }
        self.status = if self.paid_cents == 0 {
            InvoiceStatus::Open
        } else if self.balance_cents <= 0 {
            InvoiceStatus::Paid
        } else {
            InvoiceStatus::PartiallyPaid
        };
    }

    pub fn ensure_accepts_items(&self) -> Result<()> {
        require_status(
            "invoice",
            &self.id,
            self.status,
            &[InvoiceStatus::Open, InvoiceStatus::PartiallyPaid],
            "add items to",
        )
    }

    /// Attach a line; the invoice total must stay representable
    pub fn add_item(&mut self, item: InvoiceItem) -> Result<()> {
        self.ensure_accepts_items()?;
        checked_add("amount_cents", self.total_cents, item.gross_cents()?)?;
        self.items.push(item);
        self.updated_at = Utc::now();
        self.recompute();
        Ok(())
    }

    /// Remove a line while nothing has been paid against the invoice
    pub fn remove_item(&mut self, item_id: &str) -> Result<InvoiceItem> {
        self.ensure_accepts_items()?;
        if !self.payments.is_empty() {
            return Err(InnkeepError::InUse {
                entity: "invoice",
                id: self.id.clone(),
                reason: "payments have been recorded".to_string(),
            });
        }
        let pos = self
            .items
            .iter()
            .position(|i| i.id == item_id)
            .ok_or_else(|| InnkeepError::not_found("invoice item", item_id))?;
        let removed = self.items.remove(pos);
        self.updated_at = Utc::now();
        self.recompute();
        Ok(removed)
    }

    pub fn record_payment(&mut self, payment: Payment) -> Result<()> {
        require_status(
            "invoice",
            &self.id,
            self.status,
            &[InvoiceStatus::Open, InvoiceStatus::PartiallyPaid],
            "record a payment on",
        )?;
        require_positive("amount_cents", payment.amount_cents)?;
        if payment.amount_cents > self.balance_cents {
            return Err(InnkeepError::PaymentExceedsBalance {
                invoice_id: self.id.clone(),
                amount_cents: payment.amount_cents,
                balance_cents: self.balance_cents,
            });
        }
        self.payments.push(payment);
        self.updated_at = Utc::now();
        self.recompute();
        Ok(())
    }

    pub fn void(&mut self, reason: Option<String>) -> Result<()> {
        require_status(
            "invoice",
            &self.id,
            self.status,
            &[InvoiceStatus::Open, InvoiceStatus::PartiallyPaid],
            "void",
        )?;
        if !self.payments.is_empty() {
            return Err(InnkeepError::InUse {
                entity: "invoice",
                id: self.id.clone(),
                reason: "payments have been recorded".to_string(),
            });
        }
        self.status = InvoiceStatus::Void;
        self.void_reason = reason;
        self.updated_at = Utc::now();
        self.recompute();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 4, 1).unwrap()
    }

    fn invoice() -> Invoice {
        Invoice::create(
            "inv-1".to_string(),
            "INV-20260401-AAAA".to_string(),
            NewInvoice {
                guest_id: "g-1".to_string(),
                reservation_id: None,
                notes: None,
            },
            date(),
        )
        .unwrap()
    }

    fn item(id: &str, qty: i64, price: i64, tax: i64) -> InvoiceItem {
        InvoiceItem::create(
            id.to_string(),
            "inv-1".to_string(),
            NewInvoiceItem {
                description: "Dinner".to_string(),
                category: ItemCategory::FoodBeverage,
                quantity: qty,
                unit_price_cents: price,
                service_date: None,
            },
            tax,
            date(),
        )
        .unwrap()
    }

    fn payment(amount: i64) -> Payment {
        Payment {
            id: "p-1".to_string(),
            invoice_id: "inv-1".to_string(),
            amount_cents: amount,
            method: PaymentMethod::Card,
            reference: None,
            received_at: Utc::now(),
            transaction_id: None,
        }
    }

    #[test]
    fn test_totals_follow_items_and_payments() {
        let mut inv = invoice();
        inv.add_item(item("i-1", 2, 2_500, 500)).unwrap();
        assert_eq!(inv.subtotal_cents, 5_000);
        assert_eq!(inv.total_cents, 5_500);
        assert_eq!(inv.status, InvoiceStatus::Open);

        inv.record_payment(payment(2_000)).unwrap();
        assert_eq!(inv.balance_cents, 3_500);
        assert_eq!(inv.status, InvoiceStatus::PartiallyPaid);

        inv.record_payment(payment(3_500)).unwrap();
        assert_eq!(inv.balance_cents, 0);
        assert_eq!(inv.status, InvoiceStatus::Paid);
    }

    #[test]
    fn test_overpayment_rejected() {
        let mut inv = invoice();
        inv.add_item(item("i-1", 1, 1_000, 0)).unwrap();
        let err = inv.record_payment(payment(1_001)).unwrap_err();
        assert!(matches!(err, InnkeepError::PaymentExceedsBalance { .. }));
    }

    #[test]
    fn test_zero_quantity_rejected() {
        let result = InvoiceItem::create(
            "i-1".to_string(),
            "inv-1".to_string(),
            NewInvoiceItem {
                description: "Water".to_string(),
                category: ItemCategory::Minibar,
                quantity: 0,
                unit_price_cents: 300,
                service_date: None,
            },
            0,
            date(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_line_amount_overflow_rejected() {
        let result = InvoiceItem::create(
            "i-1".to_string(),
            "inv-1".to_string(),
            NewInvoiceItem {
                description: "Banquet".to_string(),
                category: ItemCategory::FoodBeverage,
                quantity: 2,
                unit_price_cents: i64::MAX,
                service_date: None,
            },
            0,
            date(),
        );
        let err = result.unwrap_err();
        assert!(matches!(err, InnkeepError::InvalidInput { ref field, .. } if field == "unit_price_cents"));

        let mut inv = invoice();
        inv.add_item(item("i-1", 1, i64::MAX, 0)).unwrap();
        assert!(inv.add_item(item("i-2", 1, 1, 0)).is_err());
        assert_eq!(inv.items.len(), 1);
    }

    #[test]
    fn test_remove_item_blocked_after_payment() {
        let mut inv = invoice();
        inv.add_item(item("i-1", 1, 1_000, 0)).unwrap();
        inv.record_payment(payment(500)).unwrap();
        assert!(inv.remove_item("i-1").is_err());
        assert!(inv.void(None).is_err());
    }

    #[test]
    fn test_void_blocks_further_items() {
        let mut inv = invoice();
        inv.add_item(item("i-1", 1, 1_000, 0)).unwrap();
        inv.void(Some("duplicate".to_string())).unwrap();
        assert_eq!(inv.status, InvoiceStatus::Void);
        assert!(inv.add_item(item("i-2", 1, 100, 0)).is_err());
    }

    #[test]
    fn test_category_accounts() {
        assert_eq!(ItemCategory::Minibar.revenue_account_code(), "4100");
        assert_eq!(ItemCategory::Room.revenue_account_code(), "4000");
        assert_eq!(PaymentMethod::BankTransfer.cash_account_code(), "1010");
    }
}
