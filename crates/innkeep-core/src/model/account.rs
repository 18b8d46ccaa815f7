use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{InnkeepError, Result};
use crate::rules::validation::require_text;

string_enum! {
    pub enum AccountType {
        Asset => "asset",
        Liability => "liability",
        Equity => "equity",
        Revenue => "revenue",
        Expense => "expense",
    }
}

impl AccountType {
    /// Asset and expense balances grow with debits
    pub fn is_debit_normal(&self) -> bool {
        matches!(self, AccountType::Asset | AccountType::Expense)
    }

    /// Balance movement of one journal line in this account's normal direction
    pub fn signed_delta(&self, debit_cents: i64, credit_cents: i64) -> i64 {
        if self.is_debit_normal() {
            debit_cents - credit_cents
        } else {
            credit_cents - debit_cents
        }
    }
}

/// A chart-of-accounts entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub code: String,
    pub name: String,
    pub account_type: AccountType,
    pub parent_id: Option<String>,
    pub description: Option<String>,
    /// Running balance in the normal direction of `account_type`
    pub balance_cents: i64,
    pub is_active: bool,
    pub is_system: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewAccount {
    pub code: String,
    pub name: String,
    pub account_type: AccountType,
    pub parent_id: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccountPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    /// `null` detaches the account from its parent
    #[serde(default, deserialize_with = "super::nullable")]
    pub parent_id: Option<Option<String>>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccountFilter {
    pub account_type: Option<AccountType>,
    pub is_active: Option<bool>,
}

impl Account {
    pub fn create(id: String, input: NewAccount) -> Result<Self> {
        let now = Utc::now();
        let account = Self {
            id,
            code: input.code.trim().to_string(),
            name: input.name.trim().to_string(),
            account_type: input.account_type,
            parent_id: input.parent_id,
            description: input.description,
            balance_cents: 0,
            is_active: true,
            is_system: false,
            created_at: now,
            updated_at: now,
        };
        account.validate()?;
        Ok(account)
    }

    pub fn validate(&self) -> Result<()> {
        require_text("code", &self.code)?;
        require_text("name", &self.name)?;
        if self.parent_id.as_deref() == Some(self.id.as_str()) {
            return Err(InnkeepError::invalid("parent_id", "account cannot be its own parent"));
        }
        Ok(())
    }

    pub fn apply(&mut self, patch: AccountPatch) -> Result<()> {
        if let Some(name) = patch.name {
            self.name = name.trim().to_string();
        }
        if patch.description.is_some() {
            self.description = patch.description;
        }
        if let Some(parent_id) = patch.parent_id {
            self.parent_id = parent_id;
        }
        if let Some(active) = patch.is_active {
            if !active && self.is_system {
                return Err(InnkeepError::InUse {
                    entity: "account",
                    id: self.id.clone(),
                    reason: "system accounts cannot be deactivated".to_string(),
                });
            }
            self.is_active = active;
        }
        self.updated_at = Utc::now();
        self.validate()
    }

    /// Fail unless the account has the expected type
    pub fn require_type(&self, expected: &[AccountType]) -> Result<()> {
        if expected.contains(&self.account_type) {
            return Ok(());
        }
        Err(InnkeepError::AccountTypeMismatch {
            account_id: self.id.clone(),
            expected: expected
                .iter()
                .map(|t| t.as_str())
                .collect::<Vec<_>>()
                .join(" or "),
            actual: self.account_type.to_string(),
        })
    }

    pub fn require_active(&self) -> Result<()> {
        if !self.is_active {
            return Err(InnkeepError::AccountInactive {
                account_id: self.id.clone(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(account_type: AccountType) -> Account {
        Account::create(
            "a-1".to_string(),
            NewAccount {
                code: "6100".to_string(),
                name: "Laundry".to_string(),
                account_type,
                parent_id: None,
                description: None,
            },
        )
        .unwrap()
    }

    #[test]
    fn test_signed_delta_follows_normal_side() {
        assert_eq!(AccountType::Asset.signed_delta(100, 0), 100);
        assert_eq!(AccountType::Expense.signed_delta(0, 40), -40);
        assert_eq!(AccountType::Revenue.signed_delta(0, 100), 100);
        assert_eq!(AccountType::Liability.signed_delta(25, 0), -25);
    }

    #[test]
    fn test_system_account_cannot_be_deactivated() {
        let mut a = account(AccountType::Asset);
        a.is_system = true;
        let patch = AccountPatch {
            is_active: Some(false),
            ..Default::default()
        };
        assert!(matches!(a.apply(patch), Err(InnkeepError::InUse { .. })));
    }

    #[test]
    fn test_patch_distinguishes_missing_and_null_parent() {
        let mut a = account(AccountType::Asset);
        a.parent_id = Some("acct-1000".to_string());

        let keep: AccountPatch = serde_json::from_str(r#"{"name": "Front desk float"}"#).unwrap();
        assert_eq!(keep.parent_id, None);
        a.apply(keep).unwrap();
        assert_eq!(a.parent_id.as_deref(), Some("acct-1000"));

        let clear: AccountPatch = serde_json::from_str(r#"{"parent_id": null}"#).unwrap();
        assert_eq!(clear.parent_id, Some(None));
        a.apply(clear).unwrap();
        assert_eq!(a.parent_id, None);
    }

    #[test]
    fn test_require_type() {
        let a = account(AccountType::Liability);
        assert!(a.require_type(&[AccountType::Liability]).is_ok());
        let err = a
            .require_type(&[AccountType::Expense, AccountType::Revenue])
            .unwrap_err();
        assert!(err.to_string().contains("expense or revenue"));
    }
}
