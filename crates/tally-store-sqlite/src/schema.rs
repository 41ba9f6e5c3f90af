//! SQL schema for the Tally SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS transactions (
    transaction_id TEXT PRIMARY KEY,
    title          TEXT NOT NULL,
    amount         TEXT NOT NULL,   -- decimal string
    kind           TEXT NOT NULL,   -- 'income' | 'expense'
    category       TEXT NOT NULL,
    date           TEXT NOT NULL,   -- ISO 8601 UTC
    is_recurring   INTEGER NOT NULL DEFAULT 0,
    frequency      TEXT             -- kept verbatim, even if unrecognized
);

-- When the last occurrence of a recurring transaction was materialized.
-- Kept apart so the source row is never rewritten by the recurrence pass.
CREATE TABLE IF NOT EXISTS recurrence_marks (
    transaction_id       TEXT PRIMARY KEY
                         REFERENCES transactions(transaction_id) ON DELETE CASCADE,
    last_materialized_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS budgets (
    budget_id TEXT PRIMARY KEY,
    category  TEXT NOT NULL,
    amount    TEXT NOT NULL,
    date      TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS goals (
    goal_id     TEXT PRIMARY KEY,
    title       TEXT NOT NULL,
    amount      TEXT NOT NULL,
    target_date TEXT NOT NULL,
    progress    TEXT NOT NULL DEFAULT '0',
    is_achieved INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS transactions_recurring_idx ON transactions(is_recurring);
CREATE INDEX IF NOT EXISTS transactions_date_idx      ON transactions(date);

PRAGMA user_version = 1;
";
