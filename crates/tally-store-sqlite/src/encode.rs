//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, amounts as decimal strings and
//! UUIDs as hyphenated lowercase strings.

use std::str::FromStr as _;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tally_core::{
  budget::Budget,
  goal::Goal,
  transaction::{Frequency, RecurringTransaction, Transaction, TransactionKind},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Decimal ──────────────────────────────────────────────────────────────────

pub fn encode_decimal(d: Decimal) -> String { d.to_string() }

pub fn decode_decimal(s: &str) -> Result<Decimal> { Ok(Decimal::from_str(s)?) }

// ─── TransactionKind ──────────────────────────────────────────────────────────

pub fn encode_kind(k: TransactionKind) -> &'static str { k.as_str() }

pub fn decode_kind(s: &str) -> Result<TransactionKind> {
  match s {
    "income" => Ok(TransactionKind::Income),
    "expense" => Ok(TransactionKind::Expense),
    other => Err(Error::UnknownKind(other.to_owned())),
  }
}

// ─── Frequency ────────────────────────────────────────────────────────────────

pub fn encode_frequency(f: Option<&Frequency>) -> Option<String> {
  f.map(|f| f.as_str().to_owned())
}

/// Never fails: unknown values come back as [`Frequency::Unrecognized`].
pub fn decode_frequency(s: Option<String>) -> Option<Frequency> {
  s.map(Frequency::from)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching [`RawTransaction::from_row`].
pub const TRANSACTION_COLUMNS: &str =
  "t.transaction_id, t.title, t.amount, t.kind, t.category, t.date, t.is_recurring, t.frequency";

/// Raw values read directly from a `transactions` row.
pub struct RawTransaction {
  pub transaction_id: String,
  pub title:          String,
  pub amount:         String,
  pub kind:           String,
  pub category:       String,
  pub date:           String,
  pub is_recurring:   bool,
  pub frequency:      Option<String>,
}

impl RawTransaction {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      transaction_id: row.get(0)?,
      title:          row.get(1)?,
      amount:         row.get(2)?,
      kind:           row.get(3)?,
      category:       row.get(4)?,
      date:           row.get(5)?,
      is_recurring:   row.get(6)?,
      frequency:      row.get(7)?,
    })
  }

  pub fn into_transaction(self) -> Result<Transaction> {
    Ok(Transaction {
      transaction_id: decode_uuid(&self.transaction_id)?,
      title:          self.title,
      amount:         decode_decimal(&self.amount)?,
      kind:           decode_kind(&self.kind)?,
      category:       self.category,
      date:           decode_dt(&self.date)?,
      is_recurring:   self.is_recurring,
      frequency:      decode_frequency(self.frequency),
    })
  }
}

/// A `transactions` row joined with its `recurrence_marks` row.
pub struct RawRecurring {
  pub transaction:          RawTransaction,
  pub last_materialized_at: Option<String>,
}

impl RawRecurring {
  pub fn into_recurring(self) -> Result<RecurringTransaction> {
    Ok(RecurringTransaction {
      transaction:          self.transaction.into_transaction()?,
      last_materialized_at: self
        .last_materialized_at
        .as_deref()
        .map(decode_dt)
        .transpose()?,
    })
  }
}

/// Raw values read directly from a `budgets` row.
pub struct RawBudget {
  pub budget_id: String,
  pub category:  String,
  pub amount:    String,
  pub date:      String,
}

impl RawBudget {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      budget_id: row.get(0)?,
      category:  row.get(1)?,
      amount:    row.get(2)?,
      date:      row.get(3)?,
    })
  }

  pub fn into_budget(self) -> Result<Budget> {
    Ok(Budget {
      budget_id: decode_uuid(&self.budget_id)?,
      category:  self.category,
      amount:    decode_decimal(&self.amount)?,
      date:      decode_dt(&self.date)?,
    })
  }
}

/// Raw values read directly from a `goals` row.
pub struct RawGoal {
  pub goal_id:     String,
  pub title:       String,
  pub amount:      String,
  pub target_date: String,
  pub progress:    String,
  pub is_achieved: bool,
}

impl RawGoal {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      goal_id:     row.get(0)?,
      title:       row.get(1)?,
      amount:      row.get(2)?,
      target_date: row.get(3)?,
      progress:    row.get(4)?,
      is_achieved: row.get(5)?,
    })
  }

  pub fn into_goal(self) -> Result<Goal> {
    Ok(Goal {
      goal_id:     decode_uuid(&self.goal_id)?,
      title:       self.title,
      amount:      decode_decimal(&self.amount)?,
      target_date: decode_dt(&self.target_date)?,
      progress:    decode_decimal(&self.progress)?,
      is_achieved: self.is_achieved,
    })
  }
}
