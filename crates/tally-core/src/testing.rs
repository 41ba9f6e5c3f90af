//! In-memory [`FinanceStore`] used by the unit tests in this crate.

use std::{
  collections::{HashMap, HashSet},
  sync::{Arc, Mutex},
};

use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::Semaphore;
use uuid::Uuid;

use crate::{
  budget::{Budget, NewBudget},
  goal::{Goal, NewGoal},
  store::FinanceStore,
  transaction::{NewTransaction, RecurringTransaction, Transaction},
};

#[derive(Debug, Error)]
#[error("mem store: {0}")]
pub struct MemError(String);

#[derive(Default)]
struct State {
  transactions: Vec<Transaction>,
  marks:        HashMap<Uuid, DateTime<Utc>>,
  budgets:      Vec<Budget>,
  goals:        Vec<Goal>,
  failing:      HashSet<String>,
  fail_marks:   bool,
}

#[derive(Default)]
pub struct MemStore {
  state: Mutex<State>,
  gate:  Mutex<Option<Arc<Semaphore>>>,
}

impl MemStore {
  /// Make every insert of a transaction with this title fail.
  pub fn fail_inserts_titled(&self, title: &str) {
    self.state.lock().unwrap().failing.insert(title.to_owned());
  }

  /// Make every `record_materialization` call fail.
  pub fn fail_marks(&self) { self.state.lock().unwrap().fail_marks = true; }

  /// Block `list_recurring` until [`MemStore::release_reads`] is called.
  pub fn hold_reads(&self) {
    *self.gate.lock().unwrap() = Some(Arc::new(Semaphore::new(0)));
  }

  pub fn release_reads(&self) {
    if let Some(gate) = self.gate.lock().unwrap().as_ref() {
      gate.add_permits(Semaphore::MAX_PERMITS / 2);
    }
  }
}

fn build(id: Uuid, input: NewTransaction) -> Transaction {
  Transaction {
    transaction_id: id,
    title:          input.title,
    amount:         input.amount,
    kind:           input.kind,
    category:       input.category,
    date:           input.date,
    is_recurring:   input.is_recurring,
    frequency:      input.frequency,
  }
}

impl FinanceStore for MemStore {
  type Error = MemError;

  async fn add_transaction(&self, input: NewTransaction) -> Result<Transaction, MemError> {
    let mut state = self.state.lock().unwrap();
    if state.failing.contains(&input.title) {
      return Err(MemError(format!("insert of {:?} rejected", input.title)));
    }
    let txn = build(Uuid::new_v4(), input);
    state.transactions.push(txn.clone());
    Ok(txn)
  }

  async fn get_transaction(&self, id: Uuid) -> Result<Option<Transaction>, MemError> {
    let state = self.state.lock().unwrap();
    Ok(state.transactions.iter().find(|t| t.transaction_id == id).cloned())
  }

  async fn list_transactions(&self) -> Result<Vec<Transaction>, MemError> {
    Ok(self.state.lock().unwrap().transactions.clone())
  }

  async fn list_recurring(&self) -> Result<Vec<RecurringTransaction>, MemError> {
    let gate = self.gate.lock().unwrap().clone();
    if let Some(gate) = gate {
      let _permit = gate.acquire().await.map_err(|e| MemError(e.to_string()))?;
    }

    let state = self.state.lock().unwrap();
    Ok(
      state
        .transactions
        .iter()
        .filter(|t| t.is_recurring)
        .map(|t| RecurringTransaction {
          transaction:          t.clone(),
          last_materialized_at: state.marks.get(&t.transaction_id).copied(),
        })
        .collect(),
    )
  }

  async fn update_transaction(
    &self,
    id: Uuid,
    input: NewTransaction,
  ) -> Result<Option<Transaction>, MemError> {
    let mut state = self.state.lock().unwrap();
    Ok(
      state
        .transactions
        .iter_mut()
        .find(|t| t.transaction_id == id)
        .map(|t| {
          *t = build(id, input);
          t.clone()
        }),
    )
  }

  async fn delete_transaction(&self, id: Uuid) -> Result<bool, MemError> {
    let mut state = self.state.lock().unwrap();
    let before = state.transactions.len();
    state.transactions.retain(|t| t.transaction_id != id);
    state.marks.remove(&id);
    Ok(state.transactions.len() != before)
  }

  async fn record_materialization(
    &self,
    source_id: Uuid,
    at: DateTime<Utc>,
  ) -> Result<(), MemError> {
    let mut state = self.state.lock().unwrap();
    if state.fail_marks {
      return Err(MemError(format!("mark for {source_id} rejected")));
    }
    state.marks.insert(source_id, at);
    Ok(())
  }

  async fn add_budget(&self, input: NewBudget) -> Result<Budget, MemError> {
    let budget = Budget {
      budget_id: Uuid::new_v4(),
      category:  input.category,
      amount:    input.amount,
      date:      input.date.unwrap_or_else(Utc::now),
    };
    self.state.lock().unwrap().budgets.push(budget.clone());
    Ok(budget)
  }

  async fn get_budget(&self, id: Uuid) -> Result<Option<Budget>, MemError> {
    let state = self.state.lock().unwrap();
    Ok(state.budgets.iter().find(|b| b.budget_id == id).cloned())
  }

  async fn list_budgets(&self) -> Result<Vec<Budget>, MemError> {
    Ok(self.state.lock().unwrap().budgets.clone())
  }

  async fn update_budget(&self, id: Uuid, input: NewBudget) -> Result<Option<Budget>, MemError> {
    let mut state = self.state.lock().unwrap();
    Ok(state.budgets.iter_mut().find(|b| b.budget_id == id).map(|b| {
      b.category = input.category;
      b.amount = input.amount;
      if let Some(date) = input.date {
        b.date = date;
      }
      b.clone()
    }))
  }

  async fn delete_budget(&self, id: Uuid) -> Result<bool, MemError> {
    let mut state = self.state.lock().unwrap();
    let before = state.budgets.len();
    state.budgets.retain(|b| b.budget_id != id);
    Ok(state.budgets.len() != before)
  }

  async fn add_goal(&self, input: NewGoal) -> Result<Goal, MemError> {
    let goal = Goal {
      goal_id:     Uuid::new_v4(),
      title:       input.title,
      amount:      input.amount,
      target_date: input.target_date,
      progress:    Default::default(),
      is_achieved: false,
    };
    self.state.lock().unwrap().goals.push(goal.clone());
    Ok(goal)
  }

  async fn get_goal(&self, id: Uuid) -> Result<Option<Goal>, MemError> {
    let state = self.state.lock().unwrap();
    Ok(state.goals.iter().find(|g| g.goal_id == id).cloned())
  }

  async fn list_goals(&self) -> Result<Vec<Goal>, MemError> {
    Ok(self.state.lock().unwrap().goals.clone())
  }

  async fn update_goal(&self, id: Uuid, input: NewGoal) -> Result<Option<Goal>, MemError> {
    let mut state = self.state.lock().unwrap();
    Ok(state.goals.iter_mut().find(|g| g.goal_id == id).map(|g| {
      g.title = input.title;
      g.amount = input.amount;
      g.target_date = input.target_date;
      g.clone()
    }))
  }

  async fn delete_goal(&self, id: Uuid) -> Result<bool, MemError> {
    let mut state = self.state.lock().unwrap();
    let before = state.goals.len();
    state.goals.retain(|g| g.goal_id != id);
    Ok(state.goals.len() != before)
  }
}
