//! Sales tax on invoice lines

use serde::Serialize;

use crate::model::{ItemCategory, TaxRate};
use crate::money::apply_bp;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaxLine {
    pub tax_rate_id: String,
    pub name: String,
    pub rate_bp: i64,
    pub tax_cents: i64,
}

/// Tax owed on one amount, itemised per rate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaxBreakdown {
    pub category: ItemCategory,
    pub taxable_cents: i64,
    pub tax_cents: i64,
    pub lines: Vec<TaxLine>,
}

/// Each applicable active rate is rounded on its own, then summed
pub fn compute_tax(amount_cents: i64, category: ItemCategory, rates: &[TaxRate]) -> TaxBreakdown {
    let lines: Vec<TaxLine> = rates
        .iter()
        .filter(|r| r.applies(category))
        .map(|r| TaxLine {
            tax_rate_id: r.id.clone(),
            name: r.name.clone(),
            rate_bp: r.rate_bp,
            tax_cents: apply_bp(amount_cents, r.rate_bp),
        })
        .collect();

    TaxBreakdown {
        category,
        taxable_cents: amount_cents,
        tax_cents: lines.iter().map(|l| l.tax_cents).fold(0, i64::saturating_add),
        lines,
    }
}
