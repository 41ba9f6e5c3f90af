//! Handler for `POST /recurrence/run`, an on-demand recurrence pass.
//!
//! Runs the same pass as the daily scheduler, synchronously, and returns its
//! report. Answers 409 if a pass is already running.

use axum::{Json, extract::State};
use tally_core::{recurrence::RecurrenceReport, store::FinanceStore};

use crate::{AppState, error::ApiError};

/// `POST /recurrence/run`
pub async fn run<S>(
  State(state): State<AppState<S>>,
) -> Result<Json<RecurrenceReport>, ApiError>
where
  S: FinanceStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let report = state.recurrence.run().await?;
  Ok(Json(report))
}
