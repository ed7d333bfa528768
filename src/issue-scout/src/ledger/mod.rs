//! Processed-issue ledger.
//!
//! The ledger is the only state that outlives a run. It maps
//! `(repository, issue number)` to the last outcome recorded for that issue
//! and is what keeps the agent from commenting on the same issue twice.

mod activity;
mod entry;
mod error;
mod outcome;
mod store;

pub use activity::ActivityLog;
pub use entry::{LedgerEntry, LedgerKey};
pub use error::LedgerError;
pub use outcome::Outcome;
pub use store::Ledger;
