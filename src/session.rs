//! The interactive session: one ledger, the form that writes to it, and the filter that views it.

use crate::aggregate::total;
use crate::clock::Clock;
use crate::filter::{categories, Filter};
use crate::form::{EditForm, Submission};
use crate::ledger::{Ledger, PersistFailure};
use crate::model::{Amount, Expense};
use crate::Result;
use tracing::debug;

/// Keeps the form consistent with the ledger: every mutation the form did not make itself is
/// followed by `EditForm::reconcile`.
#[derive(Debug)]
pub struct Tracker {
    ledger: Ledger,
    form: EditForm,
    filter: Filter,
}

impl Tracker {
    pub fn new(ledger: Ledger, clock: impl Clock + 'static) -> Self {
        Self {
            ledger,
            form: EditForm::new(clock),
            filter: Filter::default(),
        }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn form(&self) -> &EditForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut EditForm {
        &mut self.form
    }

    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    pub fn filter_mut(&mut self) -> &mut Filter {
        &mut self.filter
    }

    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
    }

    /// The expenses that pass the current filter, most recent first.
    pub fn visible(&self) -> Vec<Expense> {
        self.filter.visible(&self.ledger.list())
    }

    /// The sum over the whole ledger, regardless of the filter.
    pub fn total_all(&self) -> Amount {
        total(&self.ledger.list())
    }

    pub fn total_visible(&self) -> Amount {
        total(&self.visible())
    }

    /// The distinct categories in the ledger, sorted.
    pub fn categories(&self) -> Vec<String> {
        categories(&self.ledger.list())
    }

    /// Loads the expense with `id` into the form. Returns `false` if there is no such expense.
    pub fn start_edit(&mut self, id: &str) -> bool {
        match self.ledger.get(id) {
            Some(expense) => {
                self.form.start_edit(expense);
                true
            }
            None => {
                debug!("Cannot edit expense {id}: no such expense");
                false
            }
        }
    }

    pub fn cancel(&mut self) {
        self.form.cancel();
    }

    pub fn submit(&mut self) -> Result<Submission> {
        self.form.submit(&mut self.ledger)
    }

    /// Removes the expense with `id`. If it was being edited the form returns to composing.
    pub fn delete(&mut self, id: &str) -> Result<Option<Expense>> {
        self.mutate(|ledger| ledger.remove(id))
    }

    /// Drains the persistence failures the ledger recovered from.
    pub fn take_persist_failures(&mut self) -> Vec<PersistFailure> {
        self.ledger.take_persist_failures()
    }

    fn mutate<T>(&mut self, f: impl FnOnce(&mut Ledger) -> Result<T>) -> Result<T> {
        let result = f(&mut self.ledger);
        self.form.reconcile(&self.ledger);
        result
    }
}
