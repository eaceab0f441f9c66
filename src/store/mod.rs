//! Durable storage of the ledger snapshot.
//!
//! The ledger does not know where its bytes land. It talks to a `Persistence`, which encodes the
//! full ordered record sequence as a JSON array and writes it under one fixed key of a `Storage`,
//! a minimal key-value byte store.

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use crate::model::Expense;
use crate::Result;
use anyhow::Context;
use std::fmt::Debug;
use tracing::{debug, warn};

/// The key the snapshot is stored under unless configured otherwise.
pub const DEFAULT_KEY: &str = "expenses";

/// A key-value byte store.
pub trait Storage: Debug + Send {
    /// Returns the value stored under `key`, or `None` if nothing has been stored there.
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Overwrites the value stored under `key`.
    fn write(&mut self, key: &str, value: &[u8]) -> Result<()>;
}

/// Saves and loads the full record sequence under one key of a `Storage`.
#[derive(Debug)]
pub struct Persistence {
    storage: Box<dyn Storage>,
    key: String,
}

impl Persistence {
    pub fn new(storage: impl Storage + 'static, key: impl Into<String>) -> Self {
        Self {
            storage: Box::new(storage),
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Overwrites the stored snapshot with `records`.
    pub fn save(&mut self, records: &[Expense]) -> Result<()> {
        let json = serde_json::to_vec(records).context("Unable to serialize expenses")?;
        self.storage
            .write(&self.key, &json)
            .with_context(|| format!("Unable to save expenses under key '{}'", self.key))?;
        debug!("Saved {} expenses under key '{}'", records.len(), self.key);
        Ok(())
    }

    /// Reads the stored snapshot. A missing key is an empty ledger; unreadable or malformed data
    /// is an error.
    pub fn try_load(&self) -> Result<Vec<Expense>> {
        let bytes = match self
            .storage
            .read(&self.key)
            .with_context(|| format!("Unable to read expenses under key '{}'", self.key))?
        {
            Some(bytes) => bytes,
            None => {
                debug!("Nothing stored under key '{}'", self.key);
                return Ok(Vec::new());
            }
        };
        serde_json::from_slice(&bytes)
            .with_context(|| format!("The data stored under key '{}' is corrupt", self.key))
    }

    /// Reads the stored snapshot, substituting an empty sequence for any failure.
    pub fn load(&self) -> Vec<Expense> {
        self.try_load().unwrap_or_else(|e| {
            warn!("Starting with an empty ledger: {e:#}");
            Vec::new()
        })
    }
}
