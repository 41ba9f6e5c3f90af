//! Handlers for `/budgets` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/budgets` | |
//! | `POST`   | `/budgets` | Body: [`BudgetBody`]; returns 201 |
//! | `GET`    | `/budgets/progress` | Every budget with `spent` and `remaining` |
//! | `GET`    | `/budgets/:id` | 404 if not found |
//! | `PUT`    | `/budgets/:id` | Body: [`BudgetBody`] |
//! | `DELETE` | `/budgets/:id` | 404 if not found |
//! | `GET`    | `/budgets/:id/progress` | One budget with `spent` and `remaining` |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tally_core::{
  budget::{Budget, NewBudget},
  progress::BudgetProgress,
  store::FinanceStore,
};
use uuid::Uuid;

use crate::{AppState, error::{ApiError, ApiJson}};

/// JSON body accepted by `POST /budgets` and `PUT /budgets/:id`.
#[derive(Debug, Deserialize)]
pub struct BudgetBody {
  pub category: String,
  pub amount:   Decimal,
  pub date:     Option<DateTime<Utc>>,
}

impl BudgetBody {
  fn into_new(self) -> Result<NewBudget, ApiError> {
    let input = NewBudget {
      category: self.category,
      amount:   self.amount,
      date:     self.date,
    };
    input.validate()?;
    Ok(input)
  }
}

fn not_found(id: Uuid) -> ApiError {
  ApiError::NotFound(format!("budget {id} not found"))
}

/// `GET /budgets`
pub async fn list<S>(
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<Budget>>, ApiError>
where
  S: FinanceStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let budgets = state.store.list_budgets().await.map_err(ApiError::store)?;
  Ok(Json(budgets))
}

/// `GET /budgets/:id`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Budget>, ApiError>
where
  S: FinanceStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let budget = state
    .store
    .get_budget(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| not_found(id))?;
  Ok(Json(budget))
}

/// `POST /budgets`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  ApiJson(body): ApiJson<BudgetBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: FinanceStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let budget = state
    .store
    .add_budget(body.into_new()?)
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(budget)))
}

/// `PUT /budgets/:id`
pub async fn update<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  ApiJson(body): ApiJson<BudgetBody>,
) -> Result<Json<Budget>, ApiError>
where
  S: FinanceStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let budget = state
    .store
    .update_budget(id, body.into_new()?)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| not_found(id))?;
  Ok(Json(budget))
}

/// `DELETE /budgets/:id`
pub async fn delete<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: FinanceStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  if !state.store.delete_budget(id).await.map_err(ApiError::store)? {
    return Err(not_found(id));
  }
  Ok(Json(json!({ "message": "budget deleted" })))
}

// ─── Progress ─────────────────────────────────────────────────────────────────

/// `GET /budgets/progress`
pub async fn progress_all<S>(
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<BudgetProgress>>, ApiError>
where
  S: FinanceStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let budgets = state.store.list_budgets().await.map_err(ApiError::store)?;
  let transactions = state
    .store
    .list_transactions()
    .await
    .map_err(ApiError::store)?;

  Ok(Json(
    budgets
      .into_iter()
      .map(|b| BudgetProgress::compute(b, &transactions))
      .collect(),
  ))
}

/// `GET /budgets/:id/progress`
pub async fn progress_one<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<BudgetProgress>, ApiError>
where
  S: FinanceStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let budget = state
    .store
    .get_budget(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| not_found(id))?;
  let transactions = state
    .store
    .list_transactions()
    .await
    .map_err(ApiError::store)?;

  Ok(Json(BudgetProgress::compute(budget, &transactions)))
}
