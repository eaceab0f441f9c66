//! The ledger: the authoritative, ordered collection of expenses.
//!
//! A `Ledger` is restored once from its `Persistence` when the process starts, and every effective
//! mutation afterwards writes the entire snapshot back. Readers get a `Snapshot`, an immutable
//! copy-on-write view that is never updated in place.

use crate::id::{IdSource, RandomIds};
use crate::model::{Expense, ExpenseDetails};
use crate::store::Persistence;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::sync::Arc;
use tracing::{debug, warn};

/// How many ids are drawn from the `IdSource` before giving up on it for one insertion.
const MAX_ID_ATTEMPTS: usize = 8;

/// What happens when writing the snapshot fails.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Durability {
    /// Log the failure, queue it for `take_persist_failures`, and report success.
    #[default]
    BestEffort,
    /// Return the failure from the mutating call. The in-memory change is kept either way.
    Strict,
}

serde_plain::derive_display_from_serialize!(Durability);
serde_plain::derive_fromstr_from_deserialize!(Durability);

/// The persistence operation that failed.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum PersistOp {
    Load,
    Save,
}

/// A persistence error that was recovered from rather than returned.
#[derive(Debug)]
pub struct PersistFailure {
    op: PersistOp,
    error: anyhow::Error,
}

impl PersistFailure {
    pub fn op(&self) -> PersistOp {
        self.op
    }

    pub fn error(&self) -> &anyhow::Error {
        &self.error
    }
}

impl Display for PersistFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let op = match self.op {
            PersistOp::Load => "load",
            PersistOp::Save => "save",
        };
        write!(f, "{op} failed: {:#}", self.error)
    }
}

/// An immutable view of the ledger's records at one point in time, in storage order.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct Snapshot(Arc<Vec<Expense>>);

impl Snapshot {
    pub fn records(&self) -> &[Expense] {
        &self.0
    }
}

impl Deref for Snapshot {
    type Target = [Expense];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'a> IntoIterator for &'a Snapshot {
    type Item = &'a Expense;
    type IntoIter = std::slice::Iter<'a, Expense>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// The ordered collection of expenses, unique by id.
///
/// Storage order is newest-added first. `update` keeps a record's position.
#[derive(Debug)]
pub struct Ledger {
    records: Arc<Vec<Expense>>,
    persistence: Persistence,
    ids: Box<dyn IdSource>,
    durability: Durability,
    revision: u64,
    failures: Vec<PersistFailure>,
}

impl Ledger {
    /// Loads the stored snapshot. A missing, unreadable or corrupt snapshot yields an empty ledger;
    /// in the latter two cases the failure is queued for `take_persist_failures`.
    pub fn restore(persistence: Persistence) -> Self {
        let mut failures = Vec::new();
        let loaded = match persistence.try_load() {
            Ok(records) => records,
            Err(error) => {
                warn!("Starting with an empty ledger: {error:#}");
                failures.push(PersistFailure {
                    op: PersistOp::Load,
                    error,
                });
                Vec::new()
            }
        };

        let mut seen = HashSet::new();
        let mut records = Vec::with_capacity(loaded.len());
        for expense in loaded {
            if seen.insert(expense.id().to_string()) {
                records.push(expense);
            } else {
                warn!("Dropping stored expense with duplicate id '{}'", expense.id());
            }
        }
        debug!(
            "Restored {} expenses from key '{}'",
            records.len(),
            persistence.key()
        );

        Self {
            records: Arc::new(records),
            persistence,
            ids: Box::new(RandomIds),
            durability: Durability::default(),
            revision: 0,
            failures,
        }
    }

    /// Replaces the identifier source used by `add`.
    pub fn with_ids(mut self, ids: impl IdSource + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    pub fn with_durability(mut self, durability: Durability) -> Self {
        self.durability = durability;
        self
    }

    pub fn durability(&self) -> Durability {
        self.durability
    }

    /// The current records. Later mutations do not show through an existing snapshot.
    pub fn list(&self) -> Snapshot {
        Snapshot(Arc::clone(&self.records))
    }

    pub fn get(&self, id: &str) -> Option<&Expense> {
        self.records.iter().find(|e| e.id() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Incremented by every effective mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Stores a new expense under a freshly minted id and returns it.
    pub fn add(&mut self, details: ExpenseDetails) -> Result<Expense> {
        let id = self.mint_id();
        let expense = Expense::from_details(id, details);
        debug!("Adding expense {}", expense.id());
        Arc::make_mut(&mut self.records).insert(0, expense.clone());
        self.committed()?;
        Ok(expense)
    }

    /// Replaces the fields of the expense with `id`, keeping its id and position. Returns `None`
    /// and changes nothing if there is no such expense.
    pub fn update(&mut self, id: &str, details: ExpenseDetails) -> Result<Option<Expense>> {
        let Some(ix) = self.position(id) else {
            debug!("Not updating expense {id}: no such expense");
            return Ok(None);
        };
        let expense = Expense::from_details(id, details);
        debug!("Updating expense {id}");
        Arc::make_mut(&mut self.records)[ix] = expense.clone();
        self.committed()?;
        Ok(Some(expense))
    }

    /// Deletes the expense with `id` and returns it. Returns `None` and changes nothing if there is
    /// no such expense.
    pub fn remove(&mut self, id: &str) -> Result<Option<Expense>> {
        let Some(ix) = self.position(id) else {
            debug!("Not removing expense {id}: no such expense");
            return Ok(None);
        };
        debug!("Removing expense {id}");
        let removed = Arc::make_mut(&mut self.records).remove(ix);
        self.committed()?;
        Ok(Some(removed))
    }

    /// Writes the whole current snapshot, handling a failure according to the `Durability`.
    pub fn persist(&mut self) -> Result<()> {
        match self.persistence.save(&self.records) {
            Ok(()) => Ok(()),
            Err(error) => match self.durability {
                Durability::Strict => Err(error),
                Durability::BestEffort => {
                    warn!("Keeping the change in memory only: {error:#}");
                    self.failures.push(PersistFailure {
                        op: PersistOp::Save,
                        error,
                    });
                    Ok(())
                }
            },
        }
    }

    /// Drains the persistence failures recovered from since the last call.
    pub fn take_persist_failures(&mut self) -> Vec<PersistFailure> {
        std::mem::take(&mut self.failures)
    }

    fn committed(&mut self) -> Result<()> {
        self.revision += 1;
        self.persist()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.records.iter().position(|e| e.id() == id)
    }

    fn mint_id(&mut self) -> String {
        for _ in 0..MAX_ID_ATTEMPTS {
            let id = self.ids.next_id();
            if !self.contains(&id) {
                return id;
            }
            warn!("Id source produced an id that is already in use: {id}");
        }
        // the configured source keeps colliding, fall back to random ids for this insertion
        loop {
            let id = RandomIds.next_id();
            if !self.contains(&id) {
                return id;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::SequentialIds;
    use crate::store::{MemoryStorage, DEFAULT_KEY};
    use crate::test::{details, expense};

    fn empty_ledger() -> (Ledger, MemoryStorage) {
        let storage = MemoryStorage::new();
        let ledger = Ledger::restore(Persistence::new(storage.clone(), DEFAULT_KEY));
        (ledger, storage)
    }

    fn stored(storage: &MemoryStorage) -> Vec<Expense> {
        Persistence::new(storage.clone(), DEFAULT_KEY).load()
    }

    /// Always returns the same id.
    #[derive(Debug)]
    struct StuckIds;

    impl IdSource for StuckIds {
        fn next_id(&mut self) -> String {
            "same".to_string()
        }
    }

    #[test]
    fn test_add_mints_distinct_ids_and_persists() {
        let (mut ledger, storage) = empty_ledger();
        let mut ids = HashSet::new();
        for i in 0..50 {
            let e = ledger
                .add(details(&format!("item {i}"), "1.00", "Misc", "2024-01-01"))
                .unwrap();
            assert!(ids.insert(e.id().to_string()));
        }
        assert_eq!(ledger.len(), 50);
        assert_eq!(stored(&storage), ledger.list().to_vec());
    }

    #[test]
    fn test_add_inserts_newest_first() {
        let (mut ledger, _) = empty_ledger();
        let first = ledger.add(details("first", "1", "", "2024-01-01")).unwrap();
        let second = ledger.add(details("second", "2", "", "2024-01-01")).unwrap();
        let snapshot = ledger.list();
        assert_eq!(snapshot[0], second);
        assert_eq!(snapshot[1], first);
    }

    #[test]
    fn test_sequential_ids_are_distinct() {
        let (ledger, _) = empty_ledger();
        let mut ledger = ledger.with_ids(SequentialIds::new());
        for _ in 0..200 {
            ledger.add(details("x", "1", "", "2024-01-01")).unwrap();
        }
        let snapshot = ledger.list();
        let ids: HashSet<&str> = snapshot.iter().map(|e| e.id()).collect();
        assert_eq!(ids.len(), 200);
    }

    #[test]
    fn test_colliding_id_source_is_recovered() {
        let (ledger, _) = empty_ledger();
        let mut ledger = ledger.with_ids(StuckIds);
        let a = ledger.add(details("a", "1", "", "2024-01-01")).unwrap();
        let b = ledger.add(details("b", "1", "", "2024-01-01")).unwrap();
        assert_eq!(a.id(), "same");
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_update_preserves_id_position_and_size() {
        let (mut ledger, storage) = empty_ledger();
        let a = ledger.add(details("a", "1", "", "2024-01-01")).unwrap();
        let b = ledger.add(details("b", "2", "", "2024-01-02")).unwrap();
        let c = ledger.add(details("c", "3", "", "2024-01-03")).unwrap();

        let updated = ledger
            .update(b.id(), details("b2", "20", "Food", "2024-03-01"))
            .unwrap()
            .unwrap();
        assert_eq!(updated.id(), b.id());
        assert_eq!(updated.description(), "b2");
        assert_eq!(ledger.len(), 3);

        let snapshot = ledger.list();
        let ids: Vec<&str> = snapshot.iter().map(|e| e.id()).collect();
        assert_eq!(ids, vec![c.id(), b.id(), a.id()]);
        assert_eq!(stored(&storage)[1], updated);
    }

    #[test]
    fn test_high_precision_amounts_survive_a_reload() {
        let (mut ledger, storage) = empty_ledger();
        for amount in [
            "1234567890123456.78",
            "0.12345678901234567891",
            "79228162514264337593543950335",
        ] {
            ledger
                .add(details("precise", amount, "Misc", "2024-01-01"))
                .unwrap();
        }
        let reloaded = stored(&storage);
        assert_eq!(reloaded, ledger.list().to_vec());
        for (before, after) in ledger.list().iter().zip(&reloaded) {
            assert_eq!(before.amount().value(), after.amount().value());
            assert!(after.amount().is_positive());
        }
    }

    #[test]
    fn test_update_missing_is_noop() {
        let (mut ledger, storage) = empty_ledger();
        ledger.add(details("a", "1", "", "2024-01-01")).unwrap();
        let revision = ledger.revision();
        let before = ledger.list();
        let result = ledger.update("nope", details("z", "9", "", "2024-01-01")).unwrap();
        assert!(result.is_none());
        assert_eq!(ledger.list(), before);
        assert_eq!(ledger.revision(), revision);
        assert_eq!(stored(&storage), before.to_vec());
    }

    #[test]
    fn test_remove() {
        let (mut ledger, storage) = empty_ledger();
        let a = ledger.add(details("a", "1", "", "2024-01-01")).unwrap();
        let b = ledger.add(details("b", "2", "", "2024-01-02")).unwrap();
        let removed = ledger.remove(a.id()).unwrap();
        assert_eq!(removed, Some(a.clone()));
        assert!(!ledger.contains(a.id()));
        assert_eq!(stored(&storage), vec![b]);
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let (mut ledger, _) = empty_ledger();
        ledger.add(details("a", "1", "", "2024-01-01")).unwrap();
        let before = ledger.list();
        assert_eq!(ledger.remove("nope").unwrap(), None);
        assert_eq!(ledger.list(), before);
    }

    #[test]
    fn test_snapshot_is_not_updated_in_place() {
        let (mut ledger, _) = empty_ledger();
        ledger.add(details("a", "1", "", "2024-01-01")).unwrap();
        let snapshot = ledger.list();
        ledger.add(details("b", "2", "", "2024-01-01")).unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(ledger.list().len(), 2);
    }

    #[test]
    fn test_restore_from_stored_snapshot() {
        let storage = MemoryStorage::new();
        let records = vec![
            expense("b", "Train", "42.10", "Travel", "2024-02-01"),
            expense("a", "Coffee", "3.50", "Food", "2024-01-01"),
        ];
        Persistence::new(storage.clone(), DEFAULT_KEY)
            .save(&records)
            .unwrap();
        let mut ledger = Ledger::restore(Persistence::new(storage, DEFAULT_KEY));
        assert_eq!(ledger.list().to_vec(), records);
        assert!(ledger.take_persist_failures().is_empty());
    }

    #[test]
    fn test_restore_corrupt_is_empty_and_observable() {
        let storage = MemoryStorage::new();
        storage.insert(DEFAULT_KEY, b"[{]".to_vec()).unwrap();
        let mut ledger = Ledger::restore(Persistence::new(storage, DEFAULT_KEY));
        assert!(ledger.is_empty());
        let failures = ledger.take_persist_failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].op(), PersistOp::Load);
        assert!(ledger.take_persist_failures().is_empty());
    }

    #[test]
    fn test_restore_drops_duplicate_ids() {
        let storage = MemoryStorage::new();
        let records = vec![
            expense("a", "Coffee", "3.50", "Food", "2024-01-01"),
            expense("a", "Coffee again", "4.00", "Food", "2024-01-02"),
        ];
        Persistence::new(storage.clone(), DEFAULT_KEY)
            .save(&records)
            .unwrap();
        let ledger = Ledger::restore(Persistence::new(storage, DEFAULT_KEY));
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.get("a").unwrap().description(), "Coffee");
    }

    #[test]
    fn test_best_effort_save_failure_keeps_mutation() {
        let (mut ledger, storage) = empty_ledger();
        storage.set_failing(true);
        let added = ledger.add(details("a", "1", "", "2024-01-01")).unwrap();
        assert!(ledger.contains(added.id()));
        let failures = ledger.take_persist_failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].op(), PersistOp::Save);
        assert!(failures[0].to_string().starts_with("save failed"));
        assert!(storage.get(DEFAULT_KEY).is_none());

        // a later successful save catches the store up with memory
        storage.set_failing(false);
        ledger.persist().unwrap();
        assert_eq!(stored(&storage), ledger.list().to_vec());
    }

    #[test]
    fn test_strict_save_failure_is_returned_but_mutation_kept() {
        let (ledger, storage) = empty_ledger();
        let mut ledger = ledger.with_durability(Durability::Strict);
        storage.set_failing(true);
        assert!(ledger.add(details("a", "1", "", "2024-01-01")).is_err());
        assert_eq!(ledger.len(), 1);
        assert!(ledger.take_persist_failures().is_empty());
    }

    #[test]
    fn test_durability_from_str() {
        assert_eq!("strict".parse::<Durability>().unwrap(), Durability::Strict);
        assert_eq!(Durability::BestEffort.to_string(), "best_effort");
    }
}
