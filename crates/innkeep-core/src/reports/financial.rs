//! Statements built from posted journal lines

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::model::{Account, AccountType};

/// A journal line of a posted transaction, joined with its account
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostedLine {
    pub transaction_id: String,
    pub reference: String,
    pub description: String,
    pub txn_date: NaiveDate,
    pub account_id: String,
    pub account_type: AccountType,
    pub debit_cents: i64,
    pub credit_cents: i64,
    pub memo: Option<String>,
}

impl PostedLine {
    pub fn signed(&self) -> i64 {
        self.account_type.signed_delta(self.debit_cents, self.credit_cents)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrialBalanceRow {
    pub account_id: String,
    pub code: String,
    pub name: String,
    pub account_type: AccountType,
    pub debit_cents: i64,
    pub credit_cents: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrialBalance {
    pub as_of: NaiveDate,
    pub rows: Vec<TrialBalanceRow>,
    pub total_debit_cents: i64,
    pub total_credit_cents: i64,
    pub balanced: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatementRow {
    pub account_id: String,
    pub code: String,
    pub name: String,
    pub amount_cents: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IncomeStatement {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub revenue: Vec<StatementRow>,
    pub expenses: Vec<StatementRow>,
    pub total_revenue_cents: i64,
    pub total_expense_cents: i64,
    pub net_income_cents: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BalanceSheet {
    pub as_of: NaiveDate,
    pub assets: Vec<StatementRow>,
    pub liabilities: Vec<StatementRow>,
    pub equity: Vec<StatementRow>,
    pub total_assets_cents: i64,
    pub total_liabilities_cents: i64,
    pub total_equity_cents: i64,
    /// Cumulative revenue less expense not yet closed to equity
    pub retained_earnings_cents: i64,
    pub balanced: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerEntry {
    pub transaction_id: String,
    pub reference: String,
    pub txn_date: NaiveDate,
    pub description: String,
    pub debit_cents: i64,
    pub credit_cents: i64,
    pub memo: Option<String>,
    pub running_balance_cents: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountLedger {
    pub account: Account,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub opening_balance_cents: i64,
    pub closing_balance_cents: i64,
    pub entries: Vec<LedgerEntry>,
}

/// Net debit-minus-credit per account over the filtered lines
fn net_by_account<'a>(
    lines: impl Iterator<Item = &'a PostedLine>,
) -> BTreeMap<&'a str, (i64, i64)> {
    let mut totals: BTreeMap<&str, (i64, i64)> = BTreeMap::new();
    for line in lines {
        let entry = totals.entry(line.account_id.as_str()).or_default();
        entry.0 += line.debit_cents;
        entry.1 += line.credit_cents;
    }
    totals
}

fn sorted_by_code(accounts: &[Account]) -> Vec<&Account> {
    let mut sorted: Vec<&Account> = accounts.iter().collect();
    sorted.sort_by(|a, b| a.code.cmp(&b.code));
    sorted
}

pub fn trial_balance(accounts: &[Account], lines: &[PostedLine], as_of: NaiveDate) -> TrialBalance {
    let totals = net_by_account(lines.iter().filter(|l| l.txn_date <= as_of));
    let mut rows = Vec::new();
    for account in sorted_by_code(accounts) {
        let Some((debit, credit)) = totals.get(account.id.as_str()) else {
            continue;
        };
        let net = debit - credit;
        if net == 0 {
            continue;
        }
        rows.push(TrialBalanceRow {
            account_id: account.id.clone(),
            code: account.code.clone(),
            name: account.name.clone(),
            account_type: account.account_type,
            debit_cents: net.max(0),
            credit_cents: (-net).max(0),
        });
    }
    let total_debit_cents = rows.iter().map(|r| r.debit_cents).sum();
    let total_credit_cents = rows.iter().map(|r| r.credit_cents).sum();
    TrialBalance {
        as_of,
        rows,
        total_debit_cents,
        total_credit_cents,
        balanced: total_debit_cents == total_credit_cents,
    }
}

/// Movement of each account of `wanted` type, in its normal direction
fn statement_rows(
    accounts: &[Account],
    totals: &BTreeMap<&str, (i64, i64)>,
    wanted: AccountType,
) -> Vec<StatementRow> {
    sorted_by_code(accounts)
        .into_iter()
        .filter(|a| a.account_type == wanted)
        .filter_map(|a| {
            let (debit, credit) = totals.get(a.id.as_str())?;
            let amount = wanted.signed_delta(*debit, *credit);
            (amount != 0).then(|| StatementRow {
                account_id: a.id.clone(),
                code: a.code.clone(),
                name: a.name.clone(),
                amount_cents: amount,
            })
        })
        .collect()
}

fn total(rows: &[StatementRow]) -> i64 {
    rows.iter().map(|r| r.amount_cents).sum()
}

pub fn income_statement(
    accounts: &[Account],
    lines: &[PostedLine],
    from: NaiveDate,
    to: NaiveDate,
) -> IncomeStatement {
    let totals = net_by_account(lines.iter().filter(|l| l.txn_date >= from && l.txn_date <= to));
    let revenue = statement_rows(accounts, &totals, AccountType::Revenue);
    let expenses = statement_rows(accounts, &totals, AccountType::Expense);
    let total_revenue_cents = total(&revenue);
    let total_expense_cents = total(&expenses);
    IncomeStatement {
        from,
        to,
        revenue,
        expenses,
        total_revenue_cents,
        total_expense_cents,
        net_income_cents: total_revenue_cents - total_expense_cents,
    }
}

pub fn balance_sheet(accounts: &[Account], lines: &[PostedLine], as_of: NaiveDate) -> BalanceSheet {
    let totals = net_by_account(lines.iter().filter(|l| l.txn_date <= as_of));
    let assets = statement_rows(accounts, &totals, AccountType::Asset);
    let liabilities = statement_rows(accounts, &totals, AccountType::Liability);
    let equity = statement_rows(accounts, &totals, AccountType::Equity);
    let retained_earnings_cents = total(&statement_rows(accounts, &totals, AccountType::Revenue))
        - total(&statement_rows(accounts, &totals, AccountType::Expense));

    let total_assets_cents = total(&assets);
    let total_liabilities_cents = total(&liabilities);
    let total_equity_cents = total(&equity);
    BalanceSheet {
        as_of,
        assets,
        liabilities,
        equity,
        total_assets_cents,
        total_liabilities_cents,
        total_equity_cents,
        retained_earnings_cents,
        balanced: total_assets_cents
            == total_liabilities_cents + total_equity_cents + retained_earnings_cents,
    }
}

/// Lines of one account with a running balance in its normal direction.
///
/// `lines` must belong to the account and be ordered by date then posting.
pub fn account_ledger(
    account: &Account,
    lines: &[PostedLine],
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> AccountLedger {
    let opening: i64 = lines
        .iter()
        .filter(|l| from.is_some_and(|f| l.txn_date < f))
        .map(PostedLine::signed)
        .sum();

    let mut running = opening;
    let entries: Vec<LedgerEntry> = lines
        .iter()
        .filter(|l| from.map_or(true, |f| l.txn_date >= f) && to.map_or(true, |t| l.txn_date <= t))
        .map(|l| {
            running += l.signed();
            LedgerEntry {
                transaction_id: l.transaction_id.clone(),
                reference: l.reference.clone(),
                txn_date: l.txn_date,
                description: l.description.clone(),
                debit_cents: l.debit_cents,
                credit_cents: l.credit_cents,
                memo: l.memo.clone(),
                running_balance_cents: running,
            }
        })
        .collect();

    AccountLedger {
        account: account.clone(),
        from,
        to,
        opening_balance_cents: opening,
        closing_balance_cents: running,
        entries,
    }
}
