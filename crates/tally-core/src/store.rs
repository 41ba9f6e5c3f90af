//! The `FinanceStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `tally-store-sqlite`).
//! Higher layers (`tally-api`, the recurrence engine) depend on this
//! abstraction, not on any concrete backend.

use std::future::Future;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
  budget::{Budget, NewBudget},
  goal::{Goal, NewGoal},
  transaction::{NewTransaction, RecurringTransaction, Transaction},
};

/// Abstraction over a Tally storage backend.
///
/// Identifiers are always assigned by the store. Each write is atomic on its
/// own; no operation spans more than one record.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait FinanceStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Transactions ──────────────────────────────────────────────────────

  /// Persist a new transaction under a freshly assigned id.
  fn add_transaction(
    &self,
    input: NewTransaction,
  ) -> impl Future<Output = Result<Transaction, Self::Error>> + Send + '_;

  /// Retrieve a transaction by id. Returns `None` if not found.
  fn get_transaction(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Transaction>, Self::Error>> + Send + '_;

  /// Every stored transaction, oldest first.
  fn list_transactions(
    &self,
  ) -> impl Future<Output = Result<Vec<Transaction>, Self::Error>> + Send + '_;

  /// Every transaction with `is_recurring` set, joined with its last
  /// materialization mark.
  fn list_recurring(
    &self,
  ) -> impl Future<Output = Result<Vec<RecurringTransaction>, Self::Error>>
  + Send
  + '_;

  /// Replace the fields of an existing transaction. Returns `None` if the id
  /// is unknown.
  fn update_transaction(
    &self,
    id: Uuid,
    input: NewTransaction,
  ) -> impl Future<Output = Result<Option<Transaction>, Self::Error>> + Send + '_;

  /// Delete a transaction. Returns `false` if the id is unknown.
  fn delete_transaction(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Note that an occurrence of recurring transaction `source_id` was
  /// materialized at `at`. The source record itself is left untouched.
  fn record_materialization(
    &self,
    source_id: Uuid,
    at: DateTime<Utc>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Budgets ───────────────────────────────────────────────────────────

  fn add_budget(
    &self,
    input: NewBudget,
  ) -> impl Future<Output = Result<Budget, Self::Error>> + Send + '_;

  fn get_budget(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Budget>, Self::Error>> + Send + '_;

  fn list_budgets(
    &self,
  ) -> impl Future<Output = Result<Vec<Budget>, Self::Error>> + Send + '_;

  /// Returns `None` if the id is unknown.
  fn update_budget(
    &self,
    id: Uuid,
    input: NewBudget,
  ) -> impl Future<Output = Result<Option<Budget>, Self::Error>> + Send + '_;

  /// Returns `false` if the id is unknown.
  fn delete_budget(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Goals ─────────────────────────────────────────────────────────────

  fn add_goal(
    &self,
    input: NewGoal,
  ) -> impl Future<Output = Result<Goal, Self::Error>> + Send + '_;

  fn get_goal(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Goal>, Self::Error>> + Send + '_;

  fn list_goals(
    &self,
  ) -> impl Future<Output = Result<Vec<Goal>, Self::Error>> + Send + '_;

  /// Updates title, amount and target date only. Returns `None` if the id is
  /// unknown.
  fn update_goal(
    &self,
    id: Uuid,
    input: NewGoal,
  ) -> impl Future<Output = Result<Option<Goal>, Self::Error>> + Send + '_;

  /// Returns `false` if the id is unknown.
  fn delete_goal(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}
