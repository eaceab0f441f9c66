//! Implements the `Storage` trait using in-memory data.
//!
//! Clones share the same underlying map, so a caller can hand one clone to a `Persistence` and
//! keep another to inspect or tamper with what was written.

use crate::store::Storage;
use crate::Result;
use anyhow::{anyhow, bail};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    data: Arc<Mutex<BTreeMap<String, Vec<u8>>>>,
    failing: Arc<AtomicBool>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// When `failing` is true every `write` fails, as a full or unavailable store would.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Returns a copy of the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.lock().ok().and_then(|data| data.get(key).cloned())
    }

    /// Stores `value` under `key`, bypassing the failure switch.
    pub fn insert(&self, key: impl Into<String>, value: Vec<u8>) -> Result<()> {
        self.lock()?.insert(key.into(), value);
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<String, Vec<u8>>>> {
        self.data
            .lock()
            .map_err(|_| anyhow!("The in-memory storage lock is poisoned"))
    }
}

impl Storage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &[u8]) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            bail!("Storage quota exceeded");
        }
        self.lock()?.insert(key.to_string(), value.to_vec());
        Ok(())
    }
}
