//! Error types for `tally-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A request body failed validation; never retried.
  #[error("validation failed: {0}")]
  Validation(String),

  /// A recurrence pass was requested while another one is still running.
  #[error("a recurrence pass is already in progress")]
  RecurrenceInProgress,

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub(crate) fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
