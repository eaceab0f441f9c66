//! Sources of unique expense identifiers.

use chrono::Utc;
use std::fmt::Debug;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::warn;
use uuid::Uuid;

/// Mints identifiers for newly composed expenses.
pub trait IdSource: Debug + Send {
    fn next_id(&mut self) -> String;
}

/// The default source: random version 4 UUIDs.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIds;

impl IdSource for RandomIds {
    fn next_id(&mut self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Degraded mode for environments without a usable random source.
///
/// Ids are `{unix_millis}-{counter}`. The counter is process-wide, so two ids minted in the same
/// millisecond still differ, but ids minted by two processes can collide.
#[derive(Debug)]
pub struct SequentialIds {
    _private: (),
}

static SEQUENCE: AtomicU64 = AtomicU64::new(0);

impl SequentialIds {
    pub fn new() -> Self {
        warn!("Using timestamp-based expense ids; ids are only unique within this process");
        Self { _private: () }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new()
    }
}

impl IdSource for SequentialIds {
    fn next_id(&mut self) -> String {
        let n = SEQUENCE.fetch_add(1, Ordering::Relaxed);
        format!("{}-{n}", Utc::now().timestamp_millis())
    }
}
