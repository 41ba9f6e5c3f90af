//! Savings goals.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// A savings target.
///
/// `progress` and `is_achieved` are display fields carried by the record. No
/// logic computes them; saved-so-far figures come from
/// [`crate::progress::goal_saved`] instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
  pub goal_id:     Uuid,
  pub title:       String,
  /// The target amount.
  pub amount:      Decimal,
  pub target_date: DateTime<Utc>,
  pub progress:    Decimal,
  pub is_achieved: bool,
}

/// Input to [`crate::store::FinanceStore::add_goal`] and
/// [`crate::store::FinanceStore::update_goal`]. Updates never touch
/// `progress` or `is_achieved`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewGoal {
  pub title:       String,
  pub amount:      Decimal,
  pub target_date: DateTime<Utc>,
}

impl NewGoal {
  pub fn validate(&self) -> Result<()> {
    if self.title.trim().is_empty() {
      return Err(Error::Validation("title must not be empty".into()));
    }
    if self.amount.is_sign_negative() {
      return Err(Error::Validation("amount must not be negative".into()));
    }
    Ok(())
  }
}
