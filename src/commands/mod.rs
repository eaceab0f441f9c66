//! Command handlers for the expenses CLI.
//!
//! This module contains implementations for all CLI subcommands.

mod delete;
mod init;
mod insert;
mod query;
mod update;

use crate::error::{ErrorType, IntoResult};
use crate::session::Tracker;
use crate::{Config, Result};
use serde::Serialize;
use std::fmt::Debug;
use tracing::{debug, info, warn};

pub use delete::delete;
pub use init::init;
pub use insert::add;
pub use query::{categories, list, Listing};
pub use update::edit;

/// The output type for a command. This allows the command to return a consistent message and,
/// optionally, structured data.
#[derive(Debug, Clone, Serialize)]
pub struct Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// A message that can be printed to the user regarding the outcome of the command execution.
    message: String,

    /// Any structured data that needs to be output from the call.
    structure: Option<T>,
}

impl<T, S> From<S> for Out<T>
where
    T: Debug + Clone + Serialize,
    S: Into<String>,
{
    fn from(value: S) -> Self {
        Out::new_message(value)
    }
}

impl<T> Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// Create a new `Out` object that has `Some(structure)`.
    pub fn new<S>(message: S, structure: T) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: Some(structure),
        }
    }

    /// Create a new `Out` object that has `None` for `structure`.
    pub fn new_message<S>(message: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: None,
        }
    }

    /// Get the `message`.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the structured data stored in `structure`.
    pub fn structure(&self) -> Option<&T> {
        self.structure.as_ref()
    }

    /// Print the message to `info!` and the structured data (if it exists) as JSON to `debug!`.
    pub fn print(&self) {
        info!("{}", self.message);
        if let Some(structure) = self.structure() {
            if let Ok(json) = serde_json::to_string_pretty(structure) {
                debug!("Command output:\n\n{json}\n\n");
            }
        }
    }
}

/// Backs up the stored snapshot and restores the session that a mutating command works on.
async fn open_for_change(config: &Config) -> Result<Tracker> {
    if let Some(path) = config
        .backup()
        .copy_snapshot()
        .await
        .pub_result(ErrorType::Storage)?
    {
        debug!("Backed up the ledger to {}", path.display());
    }
    open(config)
}

/// Restores the session. A snapshot that could not be read is reported and replaced by an empty
/// ledger.
fn open(config: &Config) -> Result<Tracker> {
    let mut tracker = config.open_tracker().pub_result(ErrorType::Storage)?;
    for failure in tracker.take_persist_failures() {
        warn!("{failure}");
    }
    Ok(tracker)
}

/// Reports save failures the ledger recovered from. Under best-effort durability the command
/// still succeeds, and a strict ledger has already returned the error from the change itself.
fn report_unsaved(tracker: &mut Tracker) {
    for failure in tracker.take_persist_failures() {
        warn!("The change was not saved, {failure}");
    }
}
