//! Invoice-line roll-ups by category

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::model::ItemCategory;

/// A billed line reduced to what the roll-ups need
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BilledLine {
    pub category: ItemCategory,
    pub amount_cents: i64,
    pub tax_cents: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryRevenue {
    pub category: ItemCategory,
    pub item_count: i64,
    pub amount_cents: i64,
    pub tax_cents: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RevenueByCategory {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub categories: Vec<CategoryRevenue>,
    pub total_amount_cents: i64,
    pub total_tax_cents: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaxReport {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub categories: Vec<CategoryRevenue>,
    pub total_taxable_cents: i64,
    pub total_tax_cents: i64,
    /// Current balance of Sales Tax Payable
    pub tax_payable_balance_cents: i64,
}

fn group(lines: &[BilledLine]) -> Vec<CategoryRevenue> {
    let mut by_category: BTreeMap<&'static str, CategoryRevenue> = BTreeMap::new();
    for line in lines {
        let entry = by_category
            .entry(line.category.as_str())
            .or_insert_with(|| CategoryRevenue {
                category: line.category,
                item_count: 0,
                amount_cents: 0,
                tax_cents: 0,
            });
        entry.item_count += 1;
        entry.amount_cents += line.amount_cents;
        entry.tax_cents += line.tax_cents;
    }
    by_category.into_values().collect()
}

/// `lines` are items on non-void invoices with a service date in range
pub fn revenue_by_category(from: NaiveDate, to: NaiveDate, lines: &[BilledLine]) -> RevenueByCategory {
    let categories = group(lines);
    RevenueByCategory {
        from,
        to,
        total_amount_cents: categories.iter().map(|c| c.amount_cents).sum(),
        total_tax_cents: categories.iter().map(|c| c.tax_cents).sum(),
        categories,
    }
}

pub fn tax_report(
    from: NaiveDate,
    to: NaiveDate,
    lines: &[BilledLine],
    tax_payable_balance_cents: i64,
) -> TaxReport {
    let categories = group(lines);
    TaxReport {
        from,
        to,
        total_taxable_cents: categories.iter().map(|c| c.amount_cents).sum(),
        total_tax_cents: categories.iter().map(|c| c.tax_cents).sum(),
        categories,
        tax_payable_balance_cents,
    }
}
