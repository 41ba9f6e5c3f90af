//! Handlers for `/transactions` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/transactions` | All transactions, oldest first |
//! | `POST`   | `/transactions` | Body: [`TransactionBody`]; returns 201 + stored transaction |
//! | `GET`    | `/transactions/export` | CSV download |
//! | `GET`    | `/transactions/:id` | 404 if not found |
//! | `PUT`    | `/transactions/:id` | Body: [`TransactionBody`]; replaces every field |
//! | `DELETE` | `/transactions/:id` | 404 if not found |

use axum::{
  Json,
  extract::{Path, State},
  http::{StatusCode, header},
  response::IntoResponse,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tally_core::{
  store::FinanceStore,
  transaction::{Frequency, NewTransaction, Transaction, TransactionKind},
};
use uuid::Uuid;

use crate::{AppState, error::{ApiError, ApiJson}, export};

// ─── Body ─────────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /transactions` and `PUT /transactions/:id`.
#[derive(Debug, Deserialize)]
pub struct TransactionBody {
  pub title:        String,
  pub amount:       Decimal,
  pub kind:         TransactionKind,
  pub category:     String,
  /// Defaults to now.
  pub date:         Option<DateTime<Utc>>,
  #[serde(default)]
  pub is_recurring: bool,
  pub frequency:    Option<Frequency>,
}

impl TransactionBody {
  /// Convert to a validated [`NewTransaction`].
  fn into_new(self) -> Result<NewTransaction, ApiError> {
    let input = NewTransaction {
      title:        self.title,
      amount:       self.amount,
      kind:         self.kind,
      category:     self.category,
      date:         self.date.unwrap_or_else(Utc::now),
      is_recurring: self.is_recurring,
      frequency:    self.frequency,
    };
    input.validate()?;
    Ok(input)
  }
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /transactions`
pub async fn list<S>(
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<Transaction>>, ApiError>
where
  S: FinanceStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let transactions = state
    .store
    .list_transactions()
    .await
    .map_err(ApiError::store)?;
  Ok(Json(transactions))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /transactions/:id`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Transaction>, ApiError>
where
  S: FinanceStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let transaction = state
    .store
    .get_transaction(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("transaction {id} not found")))?;
  Ok(Json(transaction))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /transactions`: returns 201 + the stored [`Transaction`].
pub async fn create<S>(
  State(state): State<AppState<S>>,
  ApiJson(body): ApiJson<TransactionBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: FinanceStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let transaction = state
    .store
    .add_transaction(body.into_new()?)
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(transaction)))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /transactions/:id`
pub async fn update<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  ApiJson(body): ApiJson<TransactionBody>,
) -> Result<Json<Transaction>, ApiError>
where
  S: FinanceStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let transaction = state
    .store
    .update_transaction(id, body.into_new()?)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("transaction {id} not found")))?;
  Ok(Json(transaction))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /transactions/:id`
pub async fn delete<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: FinanceStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let removed = state
    .store
    .delete_transaction(id)
    .await
    .map_err(ApiError::store)?;
  if !removed {
    return Err(ApiError::NotFound(format!("transaction {id} not found")));
  }
  Ok(Json(json!({ "message": "transaction deleted" })))
}

// ─── Export ───────────────────────────────────────────────────────────────────

/// `GET /transactions/export`: every transaction as a CSV attachment.
pub async fn export_csv<S>(
  State(state): State<AppState<S>>,
) -> Result<impl IntoResponse, ApiError>
where
  S: FinanceStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let transactions = state
    .store
    .list_transactions()
    .await
    .map_err(ApiError::store)?;
  let body = export::transactions_csv(&transactions).map_err(ApiError::store)?;

  Ok((
    [
      (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
      (
        header::CONTENT_DISPOSITION,
        "attachment; filename=\"transactions.csv\"",
      ),
    ],
    body,
  ))
}
