//! Transaction types: the records every other part of Tally is derived from.
//!
//! A transaction is either entered by the user or materialized from a
//! recurring transaction by [`crate::recurrence`]. Budgets and goals never
//! hold references to transactions; their figures are folded from the full
//! transaction set at read time.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Kind ────────────────────────────────────────────────────────────────────

/// Whether money came in or went out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
  Income,
  Expense,
}

impl TransactionKind {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Income => "income",
      Self::Expense => "expense",
    }
  }
}

// ─── Frequency ───────────────────────────────────────────────────────────────

/// The recurrence interval of a recurring transaction.
///
/// Values that are not one of the four known intervals are kept verbatim in
/// [`Frequency::Unrecognized`] so that legacy rows still load; such a
/// transaction never produces new occurrences.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Frequency {
  Daily,
  Weekly,
  Monthly,
  Yearly,
  Unrecognized(String),
}

impl Frequency {
  pub fn as_str(&self) -> &str {
    match self {
      Self::Daily => "daily",
      Self::Weekly => "weekly",
      Self::Monthly => "monthly",
      Self::Yearly => "yearly",
      Self::Unrecognized(raw) => raw,
    }
  }

  pub fn is_recognized(&self) -> bool {
    !matches!(self, Self::Unrecognized(_))
  }
}

impl From<String> for Frequency {
  fn from(raw: String) -> Self {
    match raw.as_str() {
      "daily" => Self::Daily,
      "weekly" => Self::Weekly,
      "monthly" => Self::Monthly,
      "yearly" => Self::Yearly,
      _ => Self::Unrecognized(raw),
    }
  }
}

impl From<&str> for Frequency {
  fn from(raw: &str) -> Self { Self::from(raw.to_owned()) }
}

impl From<Frequency> for String {
  fn from(f: Frequency) -> Self {
    match f {
      Frequency::Unrecognized(raw) => raw,
      known => known.as_str().to_owned(),
    }
  }
}

impl fmt::Display for Frequency {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

// ─── Transaction ─────────────────────────────────────────────────────────────

/// A stored transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
  /// Store-assigned; never reused.
  pub transaction_id: Uuid,
  pub title:          String,
  pub amount:         Decimal,
  pub kind:           TransactionKind,
  pub category:       String,
  /// The date this occurrence applies to.
  pub date:           DateTime<Utc>,
  pub is_recurring:   bool,
  /// Only meaningful when `is_recurring` is set.
  pub frequency:      Option<Frequency>,
}

// ─── NewTransaction ──────────────────────────────────────────────────────────

/// Input to [`crate::store::FinanceStore::add_transaction`] and
/// [`crate::store::FinanceStore::update_transaction`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
  pub title:        String,
  pub amount:       Decimal,
  pub kind:         TransactionKind,
  pub category:     String,
  pub date:         DateTime<Utc>,
  pub is_recurring: bool,
  pub frequency:    Option<Frequency>,
}

impl NewTransaction {
  /// Check the shape of a user-supplied transaction.
  pub fn validate(&self) -> Result<()> {
    if self.title.trim().is_empty() {
      return Err(Error::Validation("title must not be empty".into()));
    }
    if self.category.trim().is_empty() {
      return Err(Error::Validation("category must not be empty".into()));
    }
    if self.amount.is_sign_negative() {
      return Err(Error::Validation("amount must not be negative".into()));
    }
    match &self.frequency {
      Some(Frequency::Unrecognized(raw)) => Err(Error::Validation(format!(
        "unknown frequency {raw:?}; expected daily, weekly, monthly or yearly"
      ))),
      None if self.is_recurring => Err(Error::Validation(
        "a recurring transaction needs a frequency".into(),
      )),
      _ => Ok(()),
    }
  }

  /// The next occurrence of `source`: every field is copied except the date,
  /// which becomes `date`, and the recurring flag, which is cleared so the
  /// occurrence does not itself recur.
  pub fn occurrence_of(source: &Transaction, date: DateTime<Utc>) -> Self {
    Self {
      title: source.title.clone(),
      amount: source.amount,
      kind: source.kind,
      category: source.category.clone(),
      date,
      is_recurring: false,
      frequency: source.frequency.clone(),
    }
  }
}

impl From<Transaction> for NewTransaction {
  fn from(t: Transaction) -> Self {
    Self {
      title:        t.title,
      amount:       t.amount,
      kind:         t.kind,
      category:     t.category,
      date:         t.date,
      is_recurring: t.is_recurring,
      frequency:    t.frequency,
    }
  }
}

// ─── RecurringTransaction ────────────────────────────────────────────────────

/// A recurring transaction together with the time its most recent occurrence
/// was materialized, if any. Returned by
/// [`crate::store::FinanceStore::list_recurring`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurringTransaction {
  pub transaction:          Transaction,
  pub last_materialized_at: Option<DateTime<Utc>>,
}

impl RecurringTransaction {
  /// The date recurrence is measured from: the later of the source's own date
  /// and its last materialization.
  pub fn anchor(&self) -> DateTime<Utc> {
    match self.last_materialized_at {
      Some(at) if at > self.transaction.date => at,
      _ => self.transaction.date,
    }
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  fn new_txn() -> NewTransaction {
    NewTransaction {
      title:        "Rent".into(),
      amount:       Decimal::from(900),
      kind:         TransactionKind::Expense,
      category:     "Housing".into(),
      date:         Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
      is_recurring: true,
      frequency:    Some(Frequency::Monthly),
    }
  }

  #[test]
  fn frequency_serde_keeps_unknown_values() {
    let f: Frequency = serde_json::from_str("\"fortnightly\"").unwrap();
    assert_eq!(f, Frequency::Unrecognized("fortnightly".into()));
    assert_eq!(serde_json::to_string(&f).unwrap(), "\"fortnightly\"");

    let f: Frequency = serde_json::from_str("\"weekly\"").unwrap();
    assert_eq!(f, Frequency::Weekly);
  }

  #[test]
  fn valid_transaction_passes() {
    assert!(new_txn().validate().is_ok());
  }

  #[test]
  fn blank_title_is_rejected() {
    let mut t = new_txn();
    t.title = "   ".into();
    assert!(matches!(t.validate(), Err(Error::Validation(_))));
  }

  #[test]
  fn negative_amount_is_rejected() {
    let mut t = new_txn();
    t.amount = Decimal::from(-5);
    assert!(matches!(t.validate(), Err(Error::Validation(_))));
  }

  #[test]
  fn recurring_without_frequency_is_rejected() {
    let mut t = new_txn();
    t.frequency = None;
    assert!(matches!(t.validate(), Err(Error::Validation(_))));

    t.is_recurring = false;
    assert!(t.validate().is_ok());
  }

  #[test]
  fn unknown_frequency_is_rejected() {
    let mut t = new_txn();
    t.frequency = Some("hourly".into());
    assert!(matches!(t.validate(), Err(Error::Validation(_))));
  }

  #[test]
  fn occurrence_copies_fields_and_clears_recurring() {
    let source = Transaction {
      transaction_id: Uuid::new_v4(),
      title:          "Gym".into(),
      amount:         Decimal::new(2999, 2),
      kind:           TransactionKind::Expense,
      category:       "Health".into(),
      date:           Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap(),
      is_recurring:   true,
      frequency:      Some(Frequency::Monthly),
    };
    let today = Utc.with_ymd_and_hms(2024, 2, 5, 0, 0, 0).unwrap();

    let occ = NewTransaction::occurrence_of(&source, today);
    assert_eq!(occ.title, source.title);
    assert_eq!(occ.amount, source.amount);
    assert_eq!(occ.kind, source.kind);
    assert_eq!(occ.category, source.category);
    assert_eq!(occ.frequency, source.frequency);
    assert_eq!(occ.date, today);
    assert!(!occ.is_recurring);
  }

  #[test]
  fn anchor_prefers_later_materialization() {
    let date = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let later = Utc.with_ymd_and_hms(2024, 1, 8, 0, 0, 0).unwrap();
    let mut rt = RecurringTransaction {
      transaction:          Transaction {
        transaction_id: Uuid::new_v4(),
        title:          "Allowance".into(),
        amount:         Decimal::from(10),
        kind:           TransactionKind::Income,
        category:       "Family".into(),
        date,
        is_recurring:   true,
        frequency:      Some(Frequency::Weekly),
      },
      last_materialized_at: None,
    };
    assert_eq!(rt.anchor(), date);

    rt.last_materialized_at = Some(later);
    assert_eq!(rt.anchor(), later);
  }
}
