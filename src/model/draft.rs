use crate::model::{Expense, DATE_FORMAT};
use chrono::NaiveDate;

/// Raw, unvalidated form input for composing a new expense or editing an existing one.
///
/// Every field is kept as text exactly as entered; `validate` turns it into `ExpenseDetails`. The
/// draft carries the `id` of the expense being edited, and is in editing mode exactly when that
/// `id` is present.
#[derive(Debug, Clone, Default, Eq, PartialEq, Hash)]
pub struct Draft {
    pub(crate) id: Option<String>,
    pub(crate) description: String,
    pub(crate) amount: String,
    pub(crate) category: String,
    pub(crate) date: String,
}

impl Draft {
    /// An empty draft for composing a new expense, dated `today`.
    pub fn blank(today: NaiveDate) -> Self {
        Self {
            date: today.format(DATE_FORMAT).to_string(),
            ..Self::default()
        }
    }

    /// A draft pre-filled from `expense`, carrying its id.
    pub fn from_expense(expense: &Expense) -> Self {
        Self {
            id: Some(expense.id().to_string()),
            description: expense.description().to_string(),
            amount: expense.amount().value().normalize().to_string(),
            category: expense.category().to_string(),
            date: expense.date().format(DATE_FORMAT).to_string(),
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn is_editing(&self) -> bool {
        self.id.is_some()
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn date(&self) -> &str {
        &self.date
    }
}
