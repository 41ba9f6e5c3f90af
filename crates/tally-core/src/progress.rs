//! Read-side aggregators over the full transaction set.
//!
//! Nothing here is stored: every figure is recomputed from the transactions
//! passed in, so results always reflect the current set.

use std::collections::BTreeMap;

use chrono::Datelike;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::{
  budget::Budget,
  goal::Goal,
  transaction::{Transaction, TransactionKind},
};

// ─── Budgets ─────────────────────────────────────────────────────────────────

/// Total of expense transactions in the budget's category, over all time.
pub fn budget_spent(budget: &Budget, transactions: &[Transaction]) -> Decimal {
  transactions
    .iter()
    .filter(|t| t.kind == TransactionKind::Expense && t.category == budget.category)
    .map(|t| t.amount)
    .sum()
}

/// A budget with its spent and remaining figures.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetProgress {
  #[serde(flatten)]
  pub budget:    Budget,
  pub spent:     Decimal,
  /// Negative when over budget.
  pub remaining: Decimal,
}

impl BudgetProgress {
  pub fn compute(budget: Budget, transactions: &[Transaction]) -> Self {
    let spent = budget_spent(&budget, transactions);
    let remaining = budget.amount - spent;
    Self { budget, spent, remaining }
  }
}

// ─── Goals ───────────────────────────────────────────────────────────────────

/// Total of every income transaction.
///
/// Goals carry no link to particular transactions, so every goal reports the
/// same figure.
pub fn goal_saved(_goal: &Goal, transactions: &[Transaction]) -> Decimal {
  total_of_kind(transactions, TransactionKind::Income)
}

/// A goal with its saved figure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalProgress {
  #[serde(flatten)]
  pub goal:  Goal,
  pub saved: Decimal,
}

impl GoalProgress {
  pub fn compute(goal: Goal, transactions: &[Transaction]) -> Self {
    let saved = goal_saved(&goal, transactions);
    Self { goal, saved }
  }
}

// ─── Dashboard summary ───────────────────────────────────────────────────────

/// Income and expense totals for one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyTotals {
  pub year:    i32,
  pub month:   u32,
  pub income:  Decimal,
  pub expense: Decimal,
}

/// The figures behind the dashboard's category and trend charts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
  pub total_income:         Decimal,
  pub total_expense:        Decimal,
  pub expenses_by_category: BTreeMap<String, Decimal>,
  pub monthly:              Vec<MonthlyTotals>,
}

impl Summary {
  pub fn compute(transactions: &[Transaction]) -> Self {
    Self {
      total_income:         total_of_kind(transactions, TransactionKind::Income),
      total_expense:        total_of_kind(transactions, TransactionKind::Expense),
      expenses_by_category: expenses_by_category(transactions),
      monthly:              monthly_totals(transactions),
    }
  }
}

fn total_of_kind(transactions: &[Transaction], kind: TransactionKind) -> Decimal {
  transactions
    .iter()
    .filter(|t| t.kind == kind)
    .map(|t| t.amount)
    .sum()
}

/// Expense totals keyed by category.
pub fn expenses_by_category(transactions: &[Transaction]) -> BTreeMap<String, Decimal> {
  let mut totals = BTreeMap::new();
  for t in transactions.iter().filter(|t| t.kind == TransactionKind::Expense) {
    *totals.entry(t.category.clone()).or_insert(Decimal::ZERO) += t.amount;
  }
  totals
}

/// Income and expense per calendar month (UTC), oldest month first. Months
/// with no transactions are omitted.
pub fn monthly_totals(transactions: &[Transaction]) -> Vec<MonthlyTotals> {
  let mut months: BTreeMap<(i32, u32), (Decimal, Decimal)> = BTreeMap::new();
  for t in transactions {
    let entry = months
      .entry((t.date.year(), t.date.month()))
      .or_insert((Decimal::ZERO, Decimal::ZERO));
    match t.kind {
      TransactionKind::Income => entry.0 += t.amount,
      TransactionKind::Expense => entry.1 += t.amount,
    }
  }

  months
    .into_iter()
    .map(|((year, month), (income, expense))| MonthlyTotals {
      year,
      month,
      income,
      expense,
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use chrono::{DateTime, TimeZone, Utc};
  use uuid::Uuid;

  use super::*;

  fn txn(category: &str, kind: TransactionKind, amount: i64, date: DateTime<Utc>) -> Transaction {
    Transaction {
      transaction_id: Uuid::new_v4(),
      title: format!("{category} {amount}"),
      amount: Decimal::from(amount),
      kind,
      category: category.into(),
      date,
      is_recurring: false,
      frequency: None,
    }
  }

  fn jan() -> DateTime<Utc> { Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap() }

  fn budget(category: &str, amount: i64) -> Budget {
    Budget {
      budget_id: Uuid::new_v4(),
      category: category.into(),
      amount: Decimal::from(amount),
      date: jan(),
    }
  }

  fn goal(title: &str, amount: i64) -> Goal {
    Goal {
      goal_id:     Uuid::new_v4(),
      title:       title.into(),
      amount:      Decimal::from(amount),
      target_date: jan(),
      progress:    Decimal::ZERO,
      is_achieved: false,
    }
  }

  #[test]
  fn budget_counts_only_matching_expenses() {
    let txns = vec![
      txn("Food", TransactionKind::Expense, 50, jan()),
      txn("Food", TransactionKind::Income, 1000, jan()),
      txn("Rent", TransactionKind::Expense, 80, jan()),
    ];
    assert_eq!(budget_spent(&budget("Food", 200), &txns), Decimal::from(50));
  }

  #[test]
  fn budget_with_no_matches_is_zero() {
    let txns = vec![txn("Rent", TransactionKind::Expense, 80, jan())];
    assert_eq!(budget_spent(&budget("Travel", 500), &txns), Decimal::ZERO);
    assert_eq!(budget_spent(&budget("Travel", 500), &[]), Decimal::ZERO);
  }

  #[test]
  fn budget_spent_is_not_period_scoped() {
    let old = Utc.with_ymd_and_hms(2019, 7, 1, 0, 0, 0).unwrap();
    let txns = vec![
      txn("Food", TransactionKind::Expense, 30, old),
      txn("Food", TransactionKind::Expense, 20, jan()),
    ];
    assert_eq!(budget_spent(&budget("Food", 100), &txns), Decimal::from(50));
  }

  #[test]
  fn budget_progress_goes_negative_when_over() {
    let txns = vec![txn("Fun", TransactionKind::Expense, 120, jan())];
    let p = BudgetProgress::compute(budget("Fun", 100), &txns);
    assert_eq!(p.spent, Decimal::from(120));
    assert_eq!(p.remaining, Decimal::from(-20));
  }

  #[test]
  fn goal_saved_sums_all_income() {
    let txns = vec![
      txn("Salary", TransactionKind::Income, 100, jan()),
      txn("Food", TransactionKind::Expense, 40, jan()),
      txn("Gift", TransactionKind::Income, 25, jan()),
    ];
    assert_eq!(goal_saved(&goal("Car", 5000), &txns), Decimal::from(125));
    assert_eq!(goal_saved(&goal("Trip", 1), &txns), Decimal::from(125));
  }

  #[test]
  fn summary_groups_by_category_and_month() {
    let feb = Utc.with_ymd_and_hms(2024, 2, 3, 0, 0, 0).unwrap();
    let dec = Utc.with_ymd_and_hms(2023, 12, 31, 0, 0, 0).unwrap();
    let txns = vec![
      txn("Food", TransactionKind::Expense, 10, feb),
      txn("Food", TransactionKind::Expense, 5, jan()),
      txn("Rent", TransactionKind::Expense, 700, jan()),
      txn("Salary", TransactionKind::Income, 2000, jan()),
      txn("Salary", TransactionKind::Income, 1900, dec),
    ];

    let s = Summary::compute(&txns);
    assert_eq!(s.total_income, Decimal::from(3900));
    assert_eq!(s.total_expense, Decimal::from(715));
    assert_eq!(s.expenses_by_category.len(), 2);
    assert_eq!(s.expenses_by_category["Food"], Decimal::from(15));
    assert_eq!(s.expenses_by_category["Rent"], Decimal::from(700));

    let months: Vec<_> = s.monthly.iter().map(|m| (m.year, m.month)).collect();
    assert_eq!(months, vec![(2023, 12), (2024, 1), (2024, 2)]);
    assert_eq!(s.monthly[1].income, Decimal::from(2000));
    assert_eq!(s.monthly[1].expense, Decimal::from(705));
    assert_eq!(s.monthly[2].income, Decimal::ZERO);
  }
}
