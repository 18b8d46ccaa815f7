use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ItemCategory;
use crate::errors::{InnkeepError, Result};
use crate::money::BP_SCALE;
use crate::rules::validation::require_text;

/// A sales tax applied to invoice lines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxRate {
    pub id: String,
    pub name: String,
    pub rate_bp: i64,
    /// `None` applies to every category
    pub applies_to: Option<ItemCategory>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewTaxRate {
    pub name: String,
    pub rate_bp: i64,
    pub applies_to: Option<ItemCategory>,
    #[serde(default = "active")]
    pub is_active: bool,
}

fn active() -> bool {
    true
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaxRatePatch {
    pub name: Option<String>,
    pub rate_bp: Option<i64>,
    pub applies_to: Option<ItemCategory>,
    /// Clears `applies_to` so the rate covers every category
    #[serde(default)]
    pub applies_to_all: bool,
    pub is_active: Option<bool>,
}

impl TaxRate {
    pub fn create(id: String, input: NewTaxRate) -> Result<Self> {
        let now = Utc::now();
        let rate = Self {
            id,
            name: input.name.trim().to_string(),
            rate_bp: input.rate_bp,
            applies_to: input.applies_to,
            is_active: input.is_active,
            created_at: now,
            updated_at: now,
        };
        rate.validate()?;
        Ok(rate)
    }

    pub fn validate(&self) -> Result<()> {
        require_text("name", &self.name)?;
        if !(0..=BP_SCALE).contains(&self.rate_bp) {
            return Err(InnkeepError::invalid(
                "rate_bp",
                format!("must be between 0 and {}", BP_SCALE),
            ));
        }
        Ok(())
    }

    pub fn apply(&mut self, patch: TaxRatePatch) -> Result<()> {
        if let Some(name) = patch.name {
            self.name = name.trim().to_string();
        }
        if let Some(rate) = patch.rate_bp {
            self.rate_bp = rate;
        }
        if patch.applies_to_all {
            self.applies_to = None;
        } else if patch.applies_to.is_some() {
            self.applies_to = patch.applies_to;
        }
        if let Some(active) = patch.is_active {
            self.is_active = active;
        }
        self.updated_at = Utc::now();
        self.validate()
    }

    pub fn applies(&self, category: ItemCategory) -> bool {
        self.is_active && self.applies_to.map_or(true, |c| c == category)
    }
}
