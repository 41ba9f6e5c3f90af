//! JSON REST API for Tally.
//!
//! Exposes an axum [`Router`] backed by any [`tally_core::store::FinanceStore`].
//! TLS, CORS and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", tally_api::api_router(state))
//! ```

pub mod budgets;
pub mod error;
pub mod export;
pub mod goals;
pub mod recurrence;
pub mod summary;
pub mod transactions;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use tally_core::{recurrence::RecurrenceRunner, store::FinanceStore};

pub use error::{ApiError, ApiJson};

/// Shared state threaded through all handlers.
#[derive(Clone)]
pub struct AppState<S> {
  pub store:      Arc<S>,
  /// The same runner the daily scheduler uses, so on-demand and scheduled
  /// passes never overlap.
  pub recurrence: Arc<RecurrenceRunner<S>>,
}

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: AppState<S>) -> Router<()>
where
  S: FinanceStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    // Transactions
    .route(
      "/transactions",
      get(transactions::list::<S>).post(transactions::create::<S>),
    )
    .route("/transactions/export", get(transactions::export_csv::<S>))
    .route(
      "/transactions/{id}",
      get(transactions::get_one::<S>)
        .put(transactions::update::<S>)
        .delete(transactions::delete::<S>),
    )
    // Budgets
    .route("/budgets", get(budgets::list::<S>).post(budgets::create::<S>))
    .route("/budgets/progress", get(budgets::progress_all::<S>))
    .route(
      "/budgets/{id}",
      get(budgets::get_one::<S>)
        .put(budgets::update::<S>)
        .delete(budgets::delete::<S>),
    )
    .route("/budgets/{id}/progress", get(budgets::progress_one::<S>))
    // Goals
    .route("/goals", get(goals::list::<S>).post(goals::create::<S>))
    .route("/goals/progress", get(goals::progress_all::<S>))
    .route(
      "/goals/{id}",
      get(goals::get_one::<S>)
        .put(goals::update::<S>)
        .delete(goals::delete::<S>),
    )
    .route("/goals/{id}/progress", get(goals::progress_one::<S>))
    // Dashboard
    .route("/summary", get(summary::handler::<S>))
    // Recurrence
    .route("/recurrence/run", post(recurrence::run::<S>))
    .with_state(state)
}
