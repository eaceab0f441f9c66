//! The add/edit form: one draft slot shared by composing new expenses and editing existing ones.

use crate::clock::Clock;
use crate::ledger::Ledger;
use crate::model::{validate, Draft, Expense, ValidationError};
use crate::Result;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Whether the form is composing a new expense or editing an existing one.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormState {
    #[default]
    Composing,
    Editing,
}

serde_plain::derive_display_from_serialize!(FormState);

/// The outcome of `EditForm::submit`.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Submission {
    Added(Expense),
    Updated(Expense),
    /// The expense being edited no longer exists. Nothing was written.
    Missing(String),
    /// The draft failed validation. The form keeps its draft and state.
    Rejected(ValidationError),
}

#[derive(Debug)]
pub struct EditForm {
    draft: Draft,
    error: Option<ValidationError>,
    clock: Box<dyn Clock>,
}

impl EditForm {
    /// A form composing a new expense dated today.
    pub fn new(clock: impl Clock + 'static) -> Self {
        let draft = Draft::blank(clock.today());
        Self {
            draft,
            error: None,
            clock: Box::new(clock),
        }
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn state(&self) -> FormState {
        if self.draft.is_editing() {
            FormState::Editing
        } else {
            FormState::Composing
        }
    }

    pub fn is_editing(&self) -> bool {
        self.draft.is_editing()
    }

    /// The id of the expense being edited, if any.
    pub fn editing_id(&self) -> Option<&str> {
        self.draft.id()
    }

    /// The message from the most recent rejected submission.
    pub fn error(&self) -> Option<ValidationError> {
        self.error
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.draft.description = description.into();
    }

    pub fn set_amount(&mut self, amount: impl Into<String>) {
        self.draft.amount = amount.into();
    }

    pub fn set_category(&mut self, category: impl Into<String>) {
        self.draft.category = category.into();
    }

    pub fn set_date(&mut self, date: impl Into<String>) {
        self.draft.date = date.into();
    }

    /// Loads `expense` into the draft and switches to editing it. Any unsaved draft is discarded.
    pub fn start_edit(&mut self, expense: &Expense) {
        debug!("Editing expense {}", expense.id());
        self.draft = Draft::from_expense(expense);
        self.error = None;
    }

    /// Discards the draft and returns to composing.
    pub fn cancel(&mut self) {
        self.reset();
    }

    /// Validates the draft and writes it to `ledger`.
    ///
    /// A rejected draft is reported as `Ok(Submission::Rejected)` and leaves the form as it was,
    /// with `error` set. Otherwise the form is reset before the ledger is written, so an `Err`
    /// from a strict ledger means the change was applied but not saved.
    pub fn submit(&mut self, ledger: &mut Ledger) -> Result<Submission> {
        let details = match validate(&self.draft) {
            Ok(details) => details,
            Err(e) => {
                debug!("Draft rejected: {e}");
                self.error = Some(e);
                return Ok(Submission::Rejected(e));
            }
        };

        let editing = self.draft.id.take();
        self.reset();

        match editing {
            Some(id) => Ok(match ledger.update(&id, details)? {
                Some(expense) => Submission::Updated(expense),
                None => Submission::Missing(id),
            }),
            None => Ok(Submission::Added(ledger.add(details)?)),
        }
    }

    /// Returns to composing if the expense being edited is gone from `ledger`. Returns `true` if
    /// the form was reset.
    pub fn reconcile(&mut self, ledger: &Ledger) -> bool {
        match self.draft.id() {
            Some(id) if !ledger.contains(id) => {
                debug!("Expense {id} was removed while being edited");
                self.reset();
                true
            }
            _ => false,
        }
    }

    fn reset(&mut self) {
        self.draft = Draft::blank(self.clock.today());
        self.error = None;
    }
}
