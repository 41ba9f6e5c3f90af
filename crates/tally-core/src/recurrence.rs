//! The recurring-transaction engine.
//!
//! - [`is_due`] decides whether a recurring transaction owes a new occurrence.
//! - [`materialize_due`] runs one pass over every recurring transaction and
//!   inserts the occurrences that are due.
//! - [`RecurrenceRunner`] wraps a pass so that at most one runs at a time; the
//!   daily scheduler and the on-demand API endpoint both go through it.
//!
//! Occurrences are new, non-recurring transactions. Source records are never
//! modified; after each successful insert the store records a separate
//! materialization mark, and the next evaluation is measured from the later of
//! the source's date and that mark.

use std::sync::{
  Arc,
  atomic::{AtomicBool, Ordering},
};

use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{
  Error, Result,
  clock::Clock,
  store::FinanceStore,
  transaction::{Frequency, NewTransaction},
};

// ─── Evaluator ───────────────────────────────────────────────────────────────

/// Whether a transaction last recorded at `last` with `frequency` is due for a
/// new occurrence as of `today`.
///
/// Day counts compare UTC calendar dates, so a pass that runs a few seconds
/// early or late still sees whole days.
///
/// | Frequency | Due when |
/// |-----------|----------|
/// | daily     | at least 1 day elapsed |
/// | weekly    | at least 7 days elapsed |
/// | monthly   | calendar month or year differs |
/// | yearly    | calendar year differs |
///
/// A missing or unrecognized frequency is never due.
pub fn is_due(
  last: DateTime<Utc>,
  frequency: Option<&Frequency>,
  today: DateTime<Utc>,
) -> bool {
  let elapsed_days = (today.date_naive() - last.date_naive()).num_days();

  match frequency {
    Some(Frequency::Daily) => elapsed_days >= 1,
    Some(Frequency::Weekly) => elapsed_days >= 7,
    Some(Frequency::Monthly) => {
      today.month() != last.month() || today.year() != last.year()
    }
    Some(Frequency::Yearly) => today.year() != last.year(),
    Some(Frequency::Unrecognized(raw)) => {
      tracing::warn!(frequency = %raw, "unknown recurrence frequency");
      false
    }
    None => {
      tracing::warn!("recurring transaction has no frequency");
      false
    }
  }
}

// ─── Materializer ────────────────────────────────────────────────────────────

/// One occurrence created during a pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MaterializedOccurrence {
  pub source_id:      Uuid,
  pub transaction_id: Uuid,
}

/// A recurring transaction whose occurrence could not be stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecurrenceFailure {
  pub source_id: Uuid,
  pub title:     String,
  pub error:     String,
}

/// Outcome of one recurrence pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecurrenceReport {
  /// The reference date the pass evaluated against.
  pub as_of:    DateTime<Utc>,
  /// Number of recurring transactions looked at.
  pub examined: usize,
  pub created:  Vec<MaterializedOccurrence>,
  pub failures: Vec<RecurrenceFailure>,
}

/// Run one recurrence pass against `store` as of `today`.
///
/// Each recurring transaction is handled independently: a failed insert is
/// logged and reported, and the pass carries on with the rest. Only failing to
/// read the recurring set aborts the pass.
pub async fn materialize_due<S>(
  store: &S,
  today: DateTime<Utc>,
) -> Result<RecurrenceReport>
where
  S: FinanceStore,
{
  let recurring = store.list_recurring().await.map_err(Error::store)?;

  let mut report = RecurrenceReport {
    as_of:    today,
    examined: recurring.len(),
    created:  Vec::new(),
    failures: Vec::new(),
  };

  for rt in &recurring {
    let source = &rt.transaction;
    if !source.is_recurring
      || !is_due(rt.anchor(), source.frequency.as_ref(), today)
    {
      continue;
    }

    let occurrence = NewTransaction::occurrence_of(source, today);
    let created = match store.add_transaction(occurrence).await {
      Ok(created) => created,
      Err(e) => {
        tracing::error!(
          transaction_id = %source.transaction_id,
          title = %source.title,
          error = %e,
          "failed to save recurring occurrence",
        );
        report.failures.push(RecurrenceFailure {
          source_id: source.transaction_id,
          title:     source.title.clone(),
          error:     e.to_string(),
        });
        continue;
      }
    };

    tracing::info!(
      transaction_id = %source.transaction_id,
      occurrence_id = %created.transaction_id,
      title = %source.title,
      "recurring occurrence added",
    );

    // The occurrence exists either way; a missing mark only means the next
    // pass measures from the older anchor.
    if let Err(e) = store
      .record_materialization(source.transaction_id, today)
      .await
    {
      tracing::warn!(
        transaction_id = %source.transaction_id,
        error = %e,
        "failed to record materialization mark",
      );
    }

    report.created.push(MaterializedOccurrence {
      source_id:      source.transaction_id,
      transaction_id: created.transaction_id,
    });
  }

  tracing::info!(
    examined = report.examined,
    created = report.created.len(),
    failed = report.failures.len(),
    "recurrence pass complete",
  );

  Ok(report)
}

// ─── Runner ──────────────────────────────────────────────────────────────────

/// Single-flight wrapper around [`materialize_due`].
///
/// Holds the store and the clock so callers trigger a pass with no arguments.
/// A pass requested while another is still running fails with
/// [`Error::RecurrenceInProgress`] instead of starting.
pub struct RecurrenceRunner<S> {
  store:   Arc<S>,
  clock:   Arc<dyn Clock>,
  guard:   Mutex<()>,
  running: AtomicBool,
}

/// Clears the running flag when a pass ends, including when it is dropped
/// mid-flight.
struct RunningFlag<'a>(&'a AtomicBool);

impl<'a> RunningFlag<'a> {
  fn raise(flag: &'a AtomicBool) -> Self {
    flag.store(true, Ordering::Release);
    Self(flag)
  }
}

impl Drop for RunningFlag<'_> {
  fn drop(&mut self) { self.0.store(false, Ordering::Release); }
}

impl<S: FinanceStore> RecurrenceRunner<S> {
  pub fn new(store: Arc<S>, clock: Arc<dyn Clock>) -> Self {
    Self {
      store,
      clock,
      guard: Mutex::new(()),
      running: AtomicBool::new(false),
    }
  }

  pub fn clock(&self) -> &dyn Clock { self.clock.as_ref() }

  /// Whether a pass is running right now. Never contends with [`Self::run`].
  pub fn is_running(&self) -> bool { self.running.load(Ordering::Acquire) }

  /// Run one pass as of the clock's current time.
  pub async fn run(&self) -> Result<RecurrenceReport> {
    let _guard = self
      .guard
      .try_lock()
      .map_err(|_| Error::RecurrenceInProgress)?;
    let _running = RunningFlag::raise(&self.running);
    materialize_due(self.store.as_ref(), self.clock.now()).await
  }
}
