//! In-memory double-entry ledger
//!
//! The engine hydrates the accounts a posting touches, asks the ledger to
//! validate and apply the lines, then writes the resulting balances back in
//! the same SQL transaction. Validation completes before any balance moves,
//! so a rejected posting leaves the ledger untouched.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::errors::{InnkeepError, Result};
use crate::model::{Account, JournalLine, NewJournalLine, NewTransaction};
use crate::money::{checked_add, checked_sum};
use crate::rules::validation::require_text;

/// New balance of one account after a posting
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BalanceChange {
    pub account_id: String,
    pub delta_cents: i64,
    pub new_balance_cents: i64,
}

#[derive(Debug, Clone, Default)]
pub struct Ledger {
    accounts: BTreeMap<String, Account>,
}

impl Ledger {
    pub fn new(accounts: impl IntoIterator<Item = Account>) -> Self {
        Self {
            accounts: accounts.into_iter().map(|a| (a.id.clone(), a)).collect(),
        }
    }

    pub fn account(&self, id: &str) -> Option<&Account> {
        self.accounts.get(id)
    }

    pub fn accounts(&self) -> impl Iterator<Item = &Account> {
        self.accounts.values()
    }

    /// Check a posting without applying it
    pub fn validate(&self, txn: &NewTransaction) -> Result<()> {
        validate_lines(&txn.lines)?;
        for line in &txn.lines {
            let account = self
                .accounts
                .get(&line.account_id)
                .ok_or_else(|| InnkeepError::not_found("account", &line.account_id))?;
            account.require_active()?;
        }
        require_text("description", &txn.description)
    }

    /// Validate then apply every line; returns one change per touched account
    pub fn post(&mut self, txn: &NewTransaction) -> Result<Vec<BalanceChange>> {
        self.validate(txn)?;
        let movements = txn
            .lines
            .iter()
            .map(|l| (l.account_id.as_str(), l.debit_cents, l.credit_cents));
        self.apply(movements)
    }

    /// Undo the balance effect of previously posted lines
    pub fn reverse(&mut self, lines: &[JournalLine]) -> Result<Vec<BalanceChange>> {
        for line in lines {
            if !self.accounts.contains_key(&line.account_id) {
                return Err(InnkeepError::not_found("account", &line.account_id));
            }
        }
        let movements = lines
            .iter()
            .map(|l| (l.account_id.as_str(), l.credit_cents, l.debit_cents));
        self.apply(movements)
    }

    fn apply<'a>(
        &mut self,
        movements: impl Iterator<Item = (&'a str, i64, i64)>,
    ) -> Result<Vec<BalanceChange>> {
        let mut deltas: BTreeMap<String, i64> = BTreeMap::new();
        for (account_id, debit, credit) in movements {
            let account = self
                .accounts
                .get(account_id)
                .ok_or_else(|| InnkeepError::not_found("account", account_id))?;
            let delta = deltas.entry(account_id.to_string()).or_default();
            *delta = checked_add(
                "balance_cents",
                *delta,
                account.account_type.signed_delta(debit, credit),
            )?;
        }

        // Every new balance is computed before any account moves
        let mut changes = Vec::with_capacity(deltas.len());
        for (account_id, delta) in deltas {
            let balance = self.accounts.get(&account_id).map_or(0, |a| a.balance_cents);
            changes.push(BalanceChange {
                new_balance_cents: checked_add("balance_cents", balance, delta)?,
                account_id,
                delta_cents: delta,
            });
        }
        for change in &changes {
            if let Some(account) = self.accounts.get_mut(&change.account_id) {
                account.balance_cents = change.new_balance_cents;
            }
        }
        Ok(changes)
    }
}

/// Structural checks on journal lines, in order: count, sides, balance
pub fn validate_lines(lines: &[NewJournalLine]) -> Result<()> {
    if lines.len() < 2 {
        return Err(InnkeepError::invalid(
            "lines",
            "a transaction needs at least two lines",
        ));
    }
    for (index, line) in lines.iter().enumerate() {
        if line.debit_cents < 0 || line.credit_cents < 0 {
            return Err(InnkeepError::InvalidJournalLine {
                index,
                reason: "amounts cannot be negative".to_string(),
            });
        }
        if (line.debit_cents > 0) == (line.credit_cents > 0) {
            return Err(InnkeepError::InvalidJournalLine {
                index,
                reason: "exactly one of debit or credit must be positive".to_string(),
            });
        }
    }
    let debits = checked_sum("debit_cents", lines.iter().map(|l| l.debit_cents))?;
    let credits = checked_sum("credit_cents", lines.iter().map(|l| l.credit_cents))?;
    if debits != credits {
        return Err(InnkeepError::UnbalancedTransaction {
            debit_cents: debits,
            credit_cents: credits,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AccountType, NewAccount, TransactionSource};
    use chrono::NaiveDate;

    fn account(id: &str, account_type: AccountType) -> Account {
        let mut a = Account::create(
            id.to_string(),
            NewAccount {
                code: id.to_string(),
                name: id.to_string(),
                account_type,
                parent_id: None,
                description: None,
            },
        )
        .unwrap();
        a.id = id.to_string();
        a
    }

    fn ledger() -> Ledger {
        Ledger::new(vec![
            account("cash", AccountType::Asset),
            account("revenue", AccountType::Revenue),
            account("tax", AccountType::Liability),
        ])
    }

    fn txn(lines: Vec<NewJournalLine>) -> NewTransaction {
        NewTransaction {
            txn_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            description: "Sale".to_string(),
            lines,
            source: TransactionSource::Manual,
            source_id: None,
        }
    }

    #[test]
    fn test_post_updates_normal_balances() {
        let mut l = ledger();
        let changes = l
            .post(&txn(vec![
                NewJournalLine::debit("cash", 1_100),
                NewJournalLine::credit("revenue", 1_000),
                NewJournalLine::credit("tax", 100),
            ]))
            .unwrap();
        assert_eq!(changes.len(), 3);
        assert_eq!(l.account("cash").unwrap().balance_cents, 1_100);
        assert_eq!(l.account("revenue").unwrap().balance_cents, 1_000);
        assert_eq!(l.account("tax").unwrap().balance_cents, 100);
    }

    #[test]
    fn test_unbalanced_leaves_balances_alone() {
        let mut l = ledger();
        let err = l
            .post(&txn(vec![
                NewJournalLine::debit("cash", 1_000),
                NewJournalLine::credit("revenue", 900),
            ]))
            .unwrap_err();
        assert_eq!(
            err,
            InnkeepError::UnbalancedTransaction {
                debit_cents: 1_000,
                credit_cents: 900
            }
        );
        assert_eq!(l.account("cash").unwrap().balance_cents, 0);
    }

    #[test]
    fn test_line_with_both_sides_rejected() {
        let line = NewJournalLine {
            account_id: "cash".to_string(),
            debit_cents: 10,
            credit_cents: 10,
            memo: None,
        };
        let err = validate_lines(&[line, NewJournalLine::credit("revenue", 0)]).unwrap_err();
        assert!(matches!(err, InnkeepError::InvalidJournalLine { index: 0, .. }));
    }

    #[test]
    fn test_oversized_amounts_rejected() {
        let err = validate_lines(&[
            NewJournalLine::debit("cash", i64::MAX),
            NewJournalLine::debit("cash", 1),
            NewJournalLine::credit("revenue", 1),
        ])
        .unwrap_err();
        assert!(matches!(err, InnkeepError::InvalidInput { ref field, .. } if field == "debit_cents"));

        let mut l = ledger();
        l.post(&txn(vec![
            NewJournalLine::debit("cash", i64::MAX),
            NewJournalLine::credit("revenue", i64::MAX),
        ]))
        .unwrap();
        let err = l
            .post(&txn(vec![
                NewJournalLine::debit("cash", 1),
                NewJournalLine::credit("revenue", 1),
            ]))
            .unwrap_err();
        assert!(matches!(err, InnkeepError::InvalidInput { ref field, .. } if field == "balance_cents"));
        assert_eq!(l.account("cash").unwrap().balance_cents, i64::MAX);
        assert_eq!(l.account("revenue").unwrap().balance_cents, i64::MAX);
    }

    #[test]
    fn test_single_line_rejected() {
        assert!(validate_lines(&[NewJournalLine::debit("cash", 10)]).is_err());
    }

    #[test]
    fn test_unknown_and_inactive_accounts() {
        let mut l = ledger();
        let err = l
            .post(&txn(vec![
                NewJournalLine::debit("nowhere", 10),
                NewJournalLine::credit("revenue", 10),
            ]))
            .unwrap_err();
        assert!(matches!(err, InnkeepError::NotFound { .. }));

        let mut inactive = account("old", AccountType::Asset);
        inactive.is_active = false;
        let mut l = Ledger::new(vec![inactive, account("revenue", AccountType::Revenue)]);
        let err = l
            .post(&txn(vec![
                NewJournalLine::debit("old", 10),
                NewJournalLine::credit("revenue", 10),
            ]))
            .unwrap_err();
        assert!(matches!(err, InnkeepError::AccountInactive { .. }));
    }

    #[test]
    fn test_reverse_restores_balances() {
        let mut l = ledger();
        let posting = txn(vec![
            NewJournalLine::debit("cash", 500),
            NewJournalLine::credit("revenue", 500),
        ]);
        l.post(&posting).unwrap();
        let lines: Vec<JournalLine> = posting
            .lines
            .iter()
            .enumerate()
            .map(|(i, n)| JournalLine {
                id: format!("jl-{}", i),
                transaction_id: "t-1".to_string(),
                line_no: i as u32 + 1,
                account_id: n.account_id.clone(),
                debit_cents: n.debit_cents,
                credit_cents: n.credit_cents,
                memo: None,
            })
            .collect();
        l.reverse(&lines).unwrap();
        assert_eq!(l.account("cash").unwrap().balance_cents, 0);
        assert_eq!(l.account("revenue").unwrap().balance_cents, 0);
    }
}
