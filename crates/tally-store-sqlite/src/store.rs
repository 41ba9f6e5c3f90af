//! [`SqliteStore`], the SQLite implementation of [`FinanceStore`].

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use tally_core::{
  budget::{Budget, NewBudget},
  goal::{Goal, NewGoal},
  store::FinanceStore,
  transaction::{NewTransaction, RecurringTransaction, Transaction},
};

use crate::{
  encode::{
    encode_decimal, encode_dt, encode_frequency, encode_kind, encode_uuid,
    RawBudget, RawGoal, RawRecurring, RawTransaction, TRANSACTION_COLUMNS,
  },
  schema::SCHEMA,
  Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Tally store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

/// Column values of a transaction, ready to bind.
struct TransactionParams {
  title:        String,
  amount:       String,
  kind:         &'static str,
  category:     String,
  date:         String,
  is_recurring: bool,
  frequency:    Option<String>,
}

impl From<&NewTransaction> for TransactionParams {
  fn from(input: &NewTransaction) -> Self {
    Self {
      title:        input.title.clone(),
      amount:       encode_decimal(input.amount),
      kind:         encode_kind(input.kind),
      category:     input.category.clone(),
      date:         encode_dt(input.date),
      is_recurring: input.is_recurring,
      frequency:    encode_frequency(input.frequency.as_ref()),
    }
  }
}

fn build_transaction(id: Uuid, input: NewTransaction) -> Transaction {
  Transaction {
    transaction_id: id,
    title:          input.title,
    amount:         input.amount,
    kind:           input.kind,
    category:       input.category,
    date:           input.date,
    is_recurring:   input.is_recurring,
    frequency:      input.frequency,
  }
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run a `DELETE ... WHERE <id_column> = ?1` and report whether a row went.
  async fn delete_by_id(&self, sql: &'static str, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);
    let removed = self
      .conn
      .call(move |conn| Ok(conn.execute(sql, rusqlite::params![id_str])?))
      .await?;
    Ok(removed > 0)
  }
}

// ─── FinanceStore impl ───────────────────────────────────────────────────────

impl FinanceStore for SqliteStore {
  type Error = crate::Error;

  // ── Transactions ──────────────────────────────────────────────────────────

  async fn add_transaction(&self, input: NewTransaction) -> Result<Transaction> {
    let id = Uuid::new_v4();
    let id_str = encode_uuid(id);
    let p = TransactionParams::from(&input);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO transactions (
             transaction_id, title, amount, kind, category, date,
             is_recurring, frequency
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
          rusqlite::params![
            id_str,
            p.title,
            p.amount,
            p.kind,
            p.category,
            p.date,
            p.is_recurring,
            p.frequency,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(build_transaction(id, input))
  }

  async fn get_transaction(&self, id: Uuid) -> Result<Option<Transaction>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawTransaction> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {TRANSACTION_COLUMNS} FROM transactions t WHERE t.transaction_id = ?1"
              ),
              rusqlite::params![id_str],
              RawTransaction::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawTransaction::into_transaction).transpose()
  }

  async fn list_transactions(&self) -> Result<Vec<Transaction>> {
    let raws: Vec<RawTransaction> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {TRANSACTION_COLUMNS} FROM transactions t ORDER BY t.date, t.rowid"
        ))?;
        let rows = stmt
          .query_map([], RawTransaction::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawTransaction::into_transaction).collect()
  }

  async fn list_recurring(&self) -> Result<Vec<RecurringTransaction>> {
    let raws: Vec<RawRecurring> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {TRANSACTION_COLUMNS}, m.last_materialized_at
           FROM transactions t
           LEFT JOIN recurrence_marks m ON m.transaction_id = t.transaction_id
           WHERE t.is_recurring = 1
           ORDER BY t.date, t.rowid"
        ))?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawRecurring {
              transaction:          RawTransaction::from_row(row)?,
              last_materialized_at: row.get(8)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawRecurring::into_recurring).collect()
  }

  async fn update_transaction(
    &self,
    id: Uuid,
    input: NewTransaction,
  ) -> Result<Option<Transaction>> {
    let id_str = encode_uuid(id);
    let p = TransactionParams::from(&input);

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE transactions
           SET title = ?2, amount = ?3, kind = ?4, category = ?5, date = ?6,
               is_recurring = ?7, frequency = ?8
           WHERE transaction_id = ?1",
          rusqlite::params![
            id_str,
            p.title,
            p.amount,
            p.kind,
            p.category,
            p.date,
            p.is_recurring,
            p.frequency,
          ],
        )?)
      })
      .await?;

    Ok((changed > 0).then(|| build_transaction(id, input)))
  }

  async fn delete_transaction(&self, id: Uuid) -> Result<bool> {
    self
      .delete_by_id("DELETE FROM transactions WHERE transaction_id = ?1", id)
      .await
  }

  async fn record_materialization(&self, source_id: Uuid, at: DateTime<Utc>) -> Result<()> {
    let id_str = encode_uuid(source_id);
    let at_str = encode_dt(at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO recurrence_marks (transaction_id, last_materialized_at)
           VALUES (?1, ?2)
           ON CONFLICT (transaction_id)
           DO UPDATE SET last_materialized_at = excluded.last_materialized_at",
          rusqlite::params![id_str, at_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Budgets ───────────────────────────────────────────────────────────────

  async fn add_budget(&self, input: NewBudget) -> Result<Budget> {
    let budget = Budget {
      budget_id: Uuid::new_v4(),
      category:  input.category,
      amount:    input.amount,
      date:      input.date.unwrap_or_else(Utc::now),
    };

    let id_str       = encode_uuid(budget.budget_id);
    let category     = budget.category.clone();
    let amount_str   = encode_decimal(budget.amount);
    let date_str     = encode_dt(budget.date);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO budgets (budget_id, category, amount, date) VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![id_str, category, amount_str, date_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(budget)
  }

  async fn get_budget(&self, id: Uuid) -> Result<Option<Budget>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawBudget> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT budget_id, category, amount, date FROM budgets WHERE budget_id = ?1",
              rusqlite::params![id_str],
              RawBudget::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawBudget::into_budget).transpose()
  }

  async fn list_budgets(&self) -> Result<Vec<Budget>> {
    let raws: Vec<RawBudget> = self
      .conn
      .call(|conn| {
        let mut stmt = conn
          .prepare("SELECT budget_id, category, amount, date FROM budgets ORDER BY rowid")?;
        let rows = stmt
          .query_map([], RawBudget::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawBudget::into_budget).collect()
  }

  async fn update_budget(&self, id: Uuid, input: NewBudget) -> Result<Option<Budget>> {
    let id_str     = encode_uuid(id);
    let category   = input.category;
    let amount_str = encode_decimal(input.amount);
    let date_str   = input.date.map(encode_dt);

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE budgets
           SET category = ?2, amount = ?3, date = COALESCE(?4, date)
           WHERE budget_id = ?1",
          rusqlite::params![id_str, category, amount_str, date_str],
        )?)
      })
      .await?;

    if changed == 0 {
      return Ok(None);
    }
    self.get_budget(id).await
  }

  async fn delete_budget(&self, id: Uuid) -> Result<bool> {
    self
      .delete_by_id("DELETE FROM budgets WHERE budget_id = ?1", id)
      .await
  }

  // ── Goals ─────────────────────────────────────────────────────────────────

  async fn add_goal(&self, input: NewGoal) -> Result<Goal> {
    let goal = Goal {
      goal_id:     Uuid::new_v4(),
      title:       input.title,
      amount:      input.amount,
      target_date: input.target_date,
      progress:    Default::default(),
      is_achieved: false,
    };

    let id_str       = encode_uuid(goal.goal_id);
    let title        = goal.title.clone();
    let amount_str   = encode_decimal(goal.amount);
    let target_str   = encode_dt(goal.target_date);
    let progress_str = encode_decimal(goal.progress);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO goals (goal_id, title, amount, target_date, progress, is_achieved)
           VALUES (?1, ?2, ?3, ?4, ?5, 0)",
          rusqlite::params![id_str, title, amount_str, target_str, progress_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(goal)
  }

  async fn get_goal(&self, id: Uuid) -> Result<Option<Goal>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawGoal> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT goal_id, title, amount, target_date, progress, is_achieved
               FROM goals WHERE goal_id = ?1",
              rusqlite::params![id_str],
              RawGoal::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawGoal::into_goal).transpose()
  }

  async fn list_goals(&self) -> Result<Vec<Goal>> {
    let raws: Vec<RawGoal> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT goal_id, title, amount, target_date, progress, is_achieved
           FROM goals ORDER BY rowid",
        )?;
        let rows = stmt
          .query_map([], RawGoal::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawGoal::into_goal).collect()
  }

  async fn update_goal(&self, id: Uuid, input: NewGoal) -> Result<Option<Goal>> {
    let id_str     = encode_uuid(id);
    let title      = input.title;
    let amount_str = encode_decimal(input.amount);
    let target_str = encode_dt(input.target_date);

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE goals SET title = ?2, amount = ?3, target_date = ?4 WHERE goal_id = ?1",
          rusqlite::params![id_str, title, amount_str, target_str],
        )?)
      })
      .await?;

    if changed == 0 {
      return Ok(None);
    }
    self.get_goal(id).await
  }

  async fn delete_goal(&self, id: Uuid) -> Result<bool> {
    self
      .delete_by_id("DELETE FROM goals WHERE goal_id = ?1", id)
      .await
  }
}
