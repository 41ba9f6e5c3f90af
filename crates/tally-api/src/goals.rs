//! Handlers for `/goals` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/goals` | |
//! | `POST`   | `/goals` | Body: [`GoalBody`]; returns 201 |
//! | `GET`    | `/goals/progress` | Every goal with `saved` |
//! | `GET`    | `/goals/:id` | 404 if not found |
//! | `PUT`    | `/goals/:id` | Body: [`GoalBody`]; `progress`/`is_achieved` untouched |
//! | `DELETE` | `/goals/:id` | 404 if not found |
//! | `GET`    | `/goals/:id/progress` | One goal with `saved` |

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
  goal::{Goal, NewGoal},
  progress::GoalProgress,
  store::FinanceStore,
};
use uuid::Uuid;

use crate::{AppState, error::{ApiError, ApiJson}};

/// JSON body accepted by `POST /goals` and `PUT /goals/:id`. Any `progress`
/// or `is_achieved` keys are ignored.
#[derive(Debug, Deserialize)]
pub struct GoalBody {
  pub title:       String,
  pub amount:      Decimal,
  pub target_date: DateTime<Utc>,
}

impl GoalBody {
  fn into_new(self) -> Result<NewGoal, ApiError> {
    let input = NewGoal {
      title:       self.title,
      amount:      self.amount,
      target_date: self.target_date,
    };
    input.validate()?;
    Ok(input)
  }
}

fn not_found(id: Uuid) -> ApiError {
  ApiError::NotFound(format!("goal {id} not found"))
}

/// `GET /goals`
pub async fn list<S>(
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<Goal>>, ApiError>
where
  S: FinanceStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let goals = state.store.list_goals().await.map_err(ApiError::store)?;
  Ok(Json(goals))
}

/// `GET /goals/:id`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Goal>, ApiError>
where
  S: FinanceStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let goal = state
    .store
    .get_goal(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| not_found(id))?;
  Ok(Json(goal))
}

/// `POST /goals`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  ApiJson(body): ApiJson<GoalBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: FinanceStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let goal = state
    .store
    .add_goal(body.into_new()?)
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(goal)))
}

/// `PUT /goals/:id`
pub async fn update<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  ApiJson(body): ApiJson<GoalBody>,
) -> Result<Json<Goal>, ApiError>
where
  S: FinanceStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let goal = state
    .store
    .update_goal(id, body.into_new()?)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| not_found(id))?;
  Ok(Json(goal))
}

/// `DELETE /goals/:id`
pub async fn delete<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: FinanceStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  if !state.store.delete_goal(id).await.map_err(ApiError::store)? {
    return Err(not_found(id));
  }
  Ok(Json(json!({ "message": "goal deleted" })))
}

// ─── Progress ─────────────────────────────────────────────────────────────────

/// `GET /goals/progress`
pub async fn progress_all<S>(
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<GoalProgress>>, ApiError>
where
  S: FinanceStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let goals = state.store.list_goals().await.map_err(ApiError::store)?;
  let transactions = state
    .store
    .list_transactions()
    .await
    .map_err(ApiError::store)?;

  Ok(Json(
    goals
      .into_iter()
      .map(|g| GoalProgress::compute(g, &transactions))
      .collect(),
  ))
}

/// `GET /goals/:id/progress`
pub async fn progress_one<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<GoalProgress>, ApiError>
where
  S: FinanceStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let goal = state
    .store
    .get_goal(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| not_found(id))?;
  let transactions = state
    .store
    .list_transactions()
    .await
    .map_err(ApiError::store)?;

  Ok(Json(GoalProgress::compute(goal, &transactions)))
}
