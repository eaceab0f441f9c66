//! A single-user expense ledger.
//!
//! The engine is synchronous: a `Ledger` holds the records and writes a full snapshot through its
//! `Persistence` after every change, a `Filter` derives the visible subset, `total` sums amounts,
//! and an `EditForm` validates drafts and submits them. A `Tracker` ties these together for one
//! session. The `commands` module and the `expenses` binary wrap the engine in a command-line
//! shell configured through `Config`.

pub mod aggregate;
pub mod args;
mod backup;
pub mod clock;
pub mod commands;
mod config;
mod error;
pub mod filter;
pub mod form;
mod fs;
pub mod id;
pub mod ledger;
pub mod model;
pub mod session;
pub mod store;
mod utils;

#[cfg(test)]
mod test;

pub use aggregate::total;
pub use backup::Backup;
pub use config::Config;
pub use error::{Error, ErrorType, Result};
pub use filter::{CategorySelector, Filter};
pub use form::{EditForm, FormState, Submission};
pub use ledger::{Durability, Ledger, PersistFailure, PersistOp, Snapshot};
pub use model::{Amount, Draft, Expense, ExpenseDetails, ValidationError};
pub use session::Tracker;
pub use store::{FileStorage, MemoryStorage, Persistence, Storage};
