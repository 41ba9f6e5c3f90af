//! Handler for `GET /summary`, the figures behind the dashboard charts.

use axum::{Json, extract::State};
use tally_core::{progress::Summary, store::FinanceStore};

use crate::{AppState, error::ApiError};

/// `GET /summary`
pub async fn handler<S>(
  State(state): State<AppState<S>>,
) -> Result<Json<Summary>, ApiError>
where
  S: FinanceStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let transactions = state
    .store
    .list_transactions()
    .await
    .map_err(ApiError::store)?;
  Ok(Json(Summary::compute(&transactions)))
}
