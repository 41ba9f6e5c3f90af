//! Core types and trait definitions for the Tally finance tracker.
//!
//! This crate is deliberately free of HTTP and database dependencies. It owns
//! the domain model, the [`store::FinanceStore`] repository abstraction, the
//! recurring-transaction engine and the read-side progress aggregators.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod budget;
pub mod clock;
pub mod error;
pub mod goal;
pub mod progress;
pub mod recurrence;
pub mod store;
pub mod transaction;

pub use error::{Error, Result};

#[cfg(test)]
mod testing;
