// Integration tests for posting, the chart of accounts, expenses and the
// financial reports built on them.

mod common;

use common::*;
use innkeep_core::errors::ExErrorKind;
use innkeep_core::model::*;
use innkeep_engine::commands::{accounts, budgets, expenses, posting, reports};

fn owner_deposit(amount: i64) -> NewTransaction {
    NewTransaction {
        txn_date: date(2, 1),
        description: "Owner capital".to_string(),
        lines: vec![
            NewJournalLine::debit("acct-1010", amount),
            NewJournalLine::credit("acct-3000", amount),
        ],
        source: TransactionSource::Manual,
        source_id: None,
    }
}

fn office_supplies(amount: i64) -> NewExpense {
    NewExpense {
        category: "supplies".to_string(),
        description: "Printer paper".to_string(),
        vendor: Some("Stationers Ltd".to_string()),
        amount_cents: amount,
        expense_date: date(2, 3),
        account_id: "acct-5100".to_string(),
    }
}

// ---------------------------------------------------------------------------
// posting
// ---------------------------------------------------------------------------

#[test]
fn test_manual_posting_moves_balances() {
    let (_tmp, mut conn) = setup_db();

    let txn = posting::transaction_post(&mut conn, owner_deposit(500_000)).unwrap();
    assert_eq!(txn.status, TransactionStatus::Posted);
    assert!(txn.reference.starts_with("TXN-20260201-"));
    assert_eq!(txn.lines.len(), 2);
    assert_eq!(txn.lines[0].line_no, 1);

    assert_eq!(balance(&conn, "1010"), 500_000);
    assert_eq!(balance(&conn, "3000"), 500_000);
}

#[test]
fn test_unbalanced_posting_changes_nothing() {
    let (_tmp, mut conn) = setup_db();
    let mut input = owner_deposit(500_000);
    input.lines[1].credit_cents = 499_999;

    let err = posting::transaction_post(&mut conn, input).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::Unbalanced);
    assert_eq!(balance(&conn, "1010"), 0);
    assert!(posting::transaction_list(&conn, &TransactionFilter::default())
        .unwrap()
        .is_empty());
}

#[test]
fn test_posting_to_unknown_account_is_not_found() {
    let (_tmp, mut conn) = setup_db();
    let mut input = owner_deposit(1_000);
    input.lines[1].account_id = "acct-missing".to_string();

    let err = posting::transaction_post(&mut conn, input).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::NotFound);
}

#[test]
fn test_void_restores_balances_once() {
    let (_tmp, mut conn) = setup_db();
    let txn = posting::transaction_post(&mut conn, owner_deposit(500_000)).unwrap();

    let voided = posting::transaction_void(&mut conn, &txn.id, Some("entered twice".to_string())).unwrap();
    assert_eq!(voided.status, TransactionStatus::Void);
    assert_eq!(balance(&conn, "1010"), 0);
    assert_eq!(balance(&conn, "3000"), 0);

    let err = posting::transaction_void(&mut conn, &txn.id, None).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::InvalidTransition);
}

// ---------------------------------------------------------------------------
// chart of accounts
// ---------------------------------------------------------------------------

#[test]
fn test_system_account_cannot_be_deleted() {
    let (_tmp, conn) = setup_db();
    let err = accounts::account_delete(&conn, "acct-1000").unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::InUse);
}

#[test]
fn test_account_with_postings_cannot_be_deleted() {
    let (_tmp, mut conn) = setup_db();
    let petty = accounts::account_create(
        &conn,
        NewAccount {
            code: "1020".to_string(),
            name: "Petty Cash".to_string(),
            account_type: AccountType::Asset,
            parent_id: Some("acct-1000".to_string()),
            description: None,
        },
    )
    .unwrap();

    let mut input = owner_deposit(2_000);
    input.lines[0].account_id = petty.id.clone();
    posting::transaction_post(&mut conn, input).unwrap();

    let err = accounts::account_delete(&conn, &petty.id).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::InUse);

    let ledger = accounts::account_ledger(&conn, &petty.id, None, None).unwrap();
    assert_eq!(ledger.entries.len(), 1);
}

#[test]
fn test_system_account_cannot_be_deactivated() {
    let (_tmp, conn) = setup_db();
    let err = accounts::account_update(
        &conn,
        "acct-1000",
        AccountPatch {
            is_active: Some(false),
            ..Default::default()
        },
    )
    .unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::InUse);
    assert!(accounts::account_get(&conn, "acct-1000").unwrap().is_active);

    // Renaming is still allowed
    let renamed = accounts::account_update(
        &conn,
        "acct-1000",
        AccountPatch {
            name: Some("Cash on Hand".to_string()),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(renamed.name, "Cash on Hand");
}

#[test]
fn test_parent_can_be_cleared() {
    let (_tmp, conn) = setup_db();
    let petty = accounts::account_create(
        &conn,
        NewAccount {
            code: "1020".to_string(),
            name: "Petty Cash".to_string(),
            account_type: AccountType::Asset,
            parent_id: Some("acct-1000".to_string()),
            description: None,
        },
    )
    .unwrap();

    let updated = accounts::account_update(
        &conn,
        &petty.id,
        AccountPatch {
            parent_id: Some(None),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(updated.parent_id, None);
    assert_eq!(accounts::account_get(&conn, &petty.id).unwrap().parent_id, None);
}

#[test]
fn test_parent_must_share_account_type() {
    let (_tmp, conn) = setup_db();
    let err = accounts::account_create(
        &conn,
        NewAccount {
            code: "4050".to_string(),
            name: "Spa Revenue".to_string(),
            account_type: AccountType::Revenue,
            parent_id: Some("acct-1000".to_string()),
            description: None,
        },
    )
    .unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::AccountMismatch);
}

// ---------------------------------------------------------------------------
// expenses and budgets
// ---------------------------------------------------------------------------

#[test]
fn test_expense_must_be_approved_before_payment() {
    let (_tmp, mut conn) = setup_db();
    let expense = expenses::expense_create(&conn, office_supplies(4_500)).unwrap();
    assert_eq!(expense.status, ExpenseStatus::Pending);

    let err = expenses::expense_pay(&mut conn, &expense.id, None, date(2, 4)).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::InvalidTransition);

    expenses::expense_approve(&conn, &expense.id, "general manager").unwrap();
    let paid = expenses::expense_pay(&mut conn, &expense.id, None, date(2, 4)).unwrap();
    assert_eq!(paid.status, ExpenseStatus::Paid);
    assert!(paid.transaction_id.is_some());
    assert_eq!(balance(&conn, "5100"), 4_500);
    assert_eq!(balance(&conn, "1000"), -4_500);
}

#[test]
fn test_expense_cannot_be_paid_from_revenue_account() {
    let (_tmp, mut conn) = setup_db();
    let expense = expenses::expense_create(&conn, office_supplies(4_500)).unwrap();
    expenses::expense_approve(&conn, &expense.id, "general manager").unwrap();

    let err = expenses::expense_pay(&mut conn, &expense.id, Some("acct-4000"), date(2, 4)).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::AccountMismatch);
    assert_eq!(balance(&conn, "5100"), 0);
}

#[test]
fn test_expense_summary_leaves_out_rejected() {
    let (_tmp, mut conn) = setup_db();
    let paid = expenses::expense_create(&conn, office_supplies(4_500)).unwrap();
    expenses::expense_approve(&conn, &paid.id, "general manager").unwrap();
    expenses::expense_pay(&mut conn, &paid.id, None, date(2, 4)).unwrap();
    expenses::expense_create(&conn, office_supplies(1_000)).unwrap();
    let rejected = expenses::expense_create(&conn, office_supplies(2_000)).unwrap();
    expenses::expense_reject(&conn, &rejected.id, "personal purchase").unwrap();

    let summary = expenses::expense_summary(&conn, &ExpenseFilter::default()).unwrap();
    assert_eq!(summary.len(), 1);
    assert_eq!(summary[0].category, "supplies");
    assert_eq!(summary[0].count, 2);
    assert_eq!(summary[0].amount_cents, 5_500);
    assert_eq!(summary[0].paid_cents, 4_500);
}

#[test]
fn test_budget_variance_tracks_paid_expenses() {
    let (_tmp, mut conn) = setup_db();
    let budget = budgets::budget_create(
        &conn,
        NewBudget {
            name: "February operations".to_string(),
            account_id: "acct-5100".to_string(),
            period_start: date(2, 1),
            period_end: date(2, 28),
            amount_cents: 10_000,
            notes: None,
        },
    )
    .unwrap();

    let expense = expenses::expense_create(&conn, office_supplies(4_500)).unwrap();
    expenses::expense_approve(&conn, &expense.id, "general manager").unwrap();
    expenses::expense_pay(&mut conn, &expense.id, None, date(2, 4)).unwrap();

    let variance = budgets::budget_variance(&conn, Some(&budget.id)).unwrap();
    assert_eq!(variance.len(), 1);
    assert_eq!(variance[0].actual_cents, 4_500);
    assert!(!variance[0].over_budget);
}

// ---------------------------------------------------------------------------
// reports
// ---------------------------------------------------------------------------

#[test]
fn test_statements_stay_balanced() {
    let (_tmp, mut conn) = setup_db();
    posting::transaction_post(&mut conn, owner_deposit(500_000)).unwrap();
    let expense = expenses::expense_create(&conn, office_supplies(4_500)).unwrap();
    expenses::expense_approve(&conn, &expense.id, "general manager").unwrap();
    expenses::expense_pay(&mut conn, &expense.id, Some("acct-1010"), date(2, 4)).unwrap();

    let tb = reports::trial_balance(&conn, date(2, 28)).unwrap();
    assert!(tb.balanced);
    assert_eq!(tb.total_debit_cents, 500_000);

    let income = reports::income_statement(&conn, date(2, 1), date(2, 28)).unwrap();
    assert_eq!(income.total_revenue_cents, 0);
    assert_eq!(income.total_expense_cents, 4_500);
    assert_eq!(income.net_income_cents, -4_500);

    let sheet = reports::balance_sheet(&conn, date(2, 28)).unwrap();
    assert!(sheet.balanced);
    assert_eq!(sheet.total_assets_cents, 495_500);
}

#[test]
fn test_income_statement_rejects_reversed_range() {
    let (_tmp, conn) = setup_db();
    let err = reports::income_statement(&conn, date(3, 1), date(2, 1)).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::InvalidInput);
}
