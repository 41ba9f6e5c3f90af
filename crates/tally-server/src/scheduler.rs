//! Daily trigger for the recurrence pass.
//!
//! Sleeps until the next configured UTC wall-clock time, runs one pass through
//! the shared [`RecurrenceRunner`], and repeats. Because the runner is
//! single-flight, a pass still running when the next one is due (or an
//! on-demand pass from the API) causes the new one to be skipped.

use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveTime, Utc};
use tally_core::{Error, recurrence::RecurrenceRunner, store::FinanceStore};
use tokio::task::JoinHandle;

/// The first instant strictly after `now` whose UTC time of day is `at`.
pub fn next_run_after(now: DateTime<Utc>, at: NaiveTime) -> DateTime<Utc> {
  let today = now.date_naive().and_time(at).and_utc();
  if today > now { today } else { today + Duration::days(1) }
}

/// Run one scheduled pass and log its outcome. Never fails.
pub async fn run_scheduled<S: FinanceStore>(runner: &RecurrenceRunner<S>) {
  tracing::info!("running daily recurrence check");
  match runner.run().await {
    Ok(report) => tracing::debug!(
      created = report.created.len(),
      failed = report.failures.len(),
      "scheduled recurrence pass finished",
    ),
    Err(Error::RecurrenceInProgress) => {
      tracing::warn!("previous recurrence pass still running; skipping")
    }
    Err(e) => tracing::error!(error = %e, "scheduled recurrence pass failed"),
  }
}

/// The next run time for a loop whose previous target was `previous`.
///
/// Measured from whichever is later of `now` and `previous`, so a wake-up that
/// the wall clock sees as slightly before `at` does not schedule a second pass
/// for the same day.
pub fn next_target(
  now: DateTime<Utc>,
  previous: Option<DateTime<Utc>>,
  at: NaiveTime,
) -> DateTime<Utc> {
  let from = previous.map_or(now, |prev| now.max(prev));
  next_run_after(from, at)
}

/// Loop forever, running a pass once a day at `at` (UTC).
pub async fn run_daily<S: FinanceStore>(runner: Arc<RecurrenceRunner<S>>, at: NaiveTime) {
  let mut previous = None;
  loop {
    let now = runner.clock().now();
    let next = next_target(now, previous, at);
    tracing::info!(%next, "next recurrence pass scheduled");

    let wait = (next - now).to_std().unwrap_or_default();
    tokio::time::sleep(wait).await;

    run_scheduled(&runner).await;
    previous = Some(next);
  }
}

/// Spawn [`run_daily`] on the current runtime.
pub fn spawn_daily<S>(runner: Arc<RecurrenceRunner<S>>, at: NaiveTime) -> JoinHandle<()>
where
  S: FinanceStore + 'static,
{
  tokio::spawn(run_daily(runner, at))
}
