#![allow(clippy::unwrap_used, clippy::expect_used)]

use chrono::NaiveDate;
use innkeep_core::errors::InnkeepError;
use innkeep_core::model::{
    Account, AccountType, NewAccount, NewJournalLine, NewTransaction, TransactionSource,
};
use innkeep_core::Ledger;
use proptest::prelude::*;

const ACCOUNT_TYPES: [AccountType; 5] = [
    AccountType::Asset,
    AccountType::Liability,
    AccountType::Equity,
    AccountType::Revenue,
    AccountType::Expense,
];

fn chart() -> Ledger {
    let accounts = ACCOUNT_TYPES.iter().enumerate().map(|(i, t)| {
        let mut a = Account::create(
            format!("a-{}", i),
            NewAccount {
                code: format!("{}000", i + 1),
                name: t.to_string(),
                account_type: *t,
                parent_id: None,
                description: None,
            },
        )
        .unwrap();
        a.id = format!("a-{}", i);
        a
    });
    Ledger::new(accounts)
}

fn posting(lines: Vec<NewJournalLine>) -> NewTransaction {
    NewTransaction {
        txn_date: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
        description: "generated".to_string(),
        lines,
        source: TransactionSource::Manual,
        source_id: None,
    }
}

/// Sum of balances in debit terms: debit-normal balances count positive,
/// credit-normal ones negative. Balanced postings keep this at zero.
fn debit_equivalent(ledger: &Ledger) -> i64 {
    ledger
        .accounts()
        .map(|a| {
            if a.account_type.is_debit_normal() {
                a.balance_cents
            } else {
                -a.balance_cents
            }
        })
        .sum()
}

/// Balanced line sets: random debits, then credits that split the same total
fn balanced_lines() -> impl Strategy<Value = Vec<NewJournalLine>> {
    (
        prop::collection::vec((0usize..5, 1i64..1_000_000), 1..4),
        prop::collection::vec((0usize..5, 1i64..100), 1..4),
    )
        .prop_map(|(debits, credit_weights)| {
            let total: i64 = debits.iter().map(|(_, amt)| amt).sum();
            let weight_sum: i64 = credit_weights.iter().map(|(_, w)| w).sum();
            let mut lines: Vec<NewJournalLine> = debits
                .iter()
                .map(|(acct, amt)| NewJournalLine::debit(format!("a-{}", acct), *amt))
                .collect();

            let mut remaining = total;
            for (i, (acct, w)) in credit_weights.iter().enumerate() {
                let amount = if i + 1 == credit_weights.len() {
                    remaining
                } else {
                    (total * w / weight_sum).min(remaining)
                };
                if amount > 0 {
                    lines.push(NewJournalLine::credit(format!("a-{}", acct), amount));
                    remaining -= amount;
                }
            }
            lines
        })
        .prop_filter("needs two lines", |lines| lines.len() >= 2)
}

proptest! {
    #[test]
    fn prop_balanced_postings_keep_debit_equivalent_at_zero(
        batches in prop::collection::vec(balanced_lines(), 1..8)
    ) {
        let mut ledger = chart();
        for lines in batches {
            ledger.post(&posting(lines)).unwrap();
            prop_assert_eq!(debit_equivalent(&ledger), 0);
        }
    }

    #[test]
    fn prop_unbalanced_postings_change_nothing(
        amount in 1i64..1_000_000,
        skew in 1i64..1_000,
    ) {
        let mut ledger = chart();
        let before: Vec<i64> = ledger.accounts().map(|a| a.balance_cents).collect();
        let err = ledger
            .post(&posting(vec![
                NewJournalLine::debit("a-0", amount + skew),
                NewJournalLine::credit("a-3", amount),
            ]))
            .unwrap_err();
        let is_unbalanced = matches!(err, InnkeepError::UnbalancedTransaction { .. });
        prop_assert!(is_unbalanced);
        let after: Vec<i64> = ledger.accounts().map(|a| a.balance_cents).collect();
        prop_assert_eq!(before, after);
    }
}

#[test]
fn test_validation_order_reports_line_shape_before_balance() {
    let ledger = chart();
    let lines = vec![
        NewJournalLine::debit("a-0", -5),
        NewJournalLine::credit("a-3", 10),
    ];
    let err = ledger.validate(&posting(lines)).unwrap_err();
    assert!(matches!(err, InnkeepError::InvalidJournalLine { index: 0, .. }));
}

#[test]
fn test_validation_order_reports_balance_before_missing_account() {
    let ledger = chart();
    let lines = vec![
        NewJournalLine::debit("missing", 10),
        NewJournalLine::credit("a-3", 5),
    ];
    let err = ledger.validate(&posting(lines)).unwrap_err();
    assert!(matches!(err, InnkeepError::UnbalancedTransaction { .. }));
}

#[test]
fn test_same_account_lines_net_into_one_change() {
    let mut ledger = chart();
    let changes = ledger
        .post(&posting(vec![
            NewJournalLine::debit("a-0", 300),
            NewJournalLine::debit("a-0", 200),
            NewJournalLine::credit("a-3", 500),
        ]))
        .unwrap();
    assert_eq!(changes.len(), 2);
    let cash = changes.iter().find(|c| c.account_id == "a-0").unwrap();
    assert_eq!(cash.delta_cents, 500);
    assert_eq!(cash.new_balance_cents, 500);
}
