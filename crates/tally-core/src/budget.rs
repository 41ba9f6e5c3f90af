//! Budgets: a spending ceiling for one category.
//!
//! A budget is linked to transactions by category name only; nothing enforces
//! that the category exists on any transaction.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
  pub budget_id: Uuid,
  pub category:  String,
  /// The budgeted ceiling.
  pub amount:    Decimal,
  /// Creation or period marker; not used by any aggregation.
  pub date:      DateTime<Utc>,
}

/// Input to [`crate::store::FinanceStore::add_budget`] and
/// [`crate::store::FinanceStore::update_budget`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewBudget {
  pub category: String,
  pub amount:   Decimal,
  /// Set to the current time by the store when absent.
  pub date:     Option<DateTime<Utc>>,
}

impl NewBudget {
  pub fn validate(&self) -> Result<()> {
    if self.category.trim().is_empty() {
      return Err(Error::Validation("category must not be empty".into()));
    }
    if self.amount.is_sign_negative() {
      return Err(Error::Validation("amount must not be negative".into()));
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn validation() {
    let ok = NewBudget { category: "Food".into(), amount: Decimal::from(200), date: None };
    assert!(ok.validate().is_ok());

    let blank = NewBudget { category: "".into(), ..ok.clone() };
    assert!(matches!(blank.validate(), Err(Error::Validation(_))));

    let negative = NewBudget { amount: Decimal::from(-1), ..ok };
    assert!(matches!(negative.validate(), Err(Error::Validation(_))));
  }
}
