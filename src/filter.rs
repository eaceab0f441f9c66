//! Derives the visible subset of the ledger from the user's filter choices.

use crate::model::Expense;
use chrono::NaiveDate;
use std::collections::BTreeSet;
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// The label that selects every category.
pub const ALL_CATEGORIES: &str = "All";

/// Which category the visible subset is restricted to.
#[derive(Debug, Clone, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum CategorySelector {
    #[default]
    All,
    /// Only expenses whose category equals this value exactly (case-sensitive).
    Exact(String),
}

impl CategorySelector {
    pub fn matches(&self, category: &str) -> bool {
        match self {
            CategorySelector::All => true,
            CategorySelector::Exact(wanted) => wanted == category,
        }
    }
}

impl FromStr for CategorySelector {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "" | ALL_CATEGORIES => CategorySelector::All,
            other => CategorySelector::Exact(other.to_string()),
        })
    }
}

impl Display for CategorySelector {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CategorySelector::All => f.write_str(ALL_CATEGORIES),
            CategorySelector::Exact(category) => f.write_str(category),
        }
    }
}

/// The user's filter choices. All constraints must hold for an expense to be visible.
#[derive(Debug, Clone, Default, Eq, PartialEq, Hash)]
pub struct Filter {
    /// Free text matched, case-insensitively, against description and category.
    pub query: String,
    pub category: CategorySelector,
    /// Earliest date shown, inclusive.
    pub from: Option<NaiveDate>,
    /// Latest date shown, inclusive of the whole day.
    pub to: Option<NaiveDate>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    pub fn with_category(mut self, category: CategorySelector) -> Self {
        self.category = category;
        self
    }

    pub fn with_from(mut self, from: Option<NaiveDate>) -> Self {
        self.from = from;
        self
    }

    pub fn with_to(mut self, to: Option<NaiveDate>) -> Self {
        self.to = to;
        self
    }

    /// True when no constraint is set, so every expense is visible.
    pub fn is_unfiltered(&self) -> bool {
        self.needle().is_none()
            && self.category == CategorySelector::All
            && self.from.is_none()
            && self.to.is_none()
    }

    /// Whether `expense` satisfies every constraint.
    pub fn matches(&self, expense: &Expense) -> bool {
        self.matches_with(self.needle().as_deref(), expense)
    }

    /// The expenses among `records` that satisfy every constraint, most recent date first.
    ///
    /// Expenses sharing a date keep their order in `records`. Since the ledger stores newest
    /// additions first, the most recently added of them comes first.
    pub fn visible<'a, I>(&self, records: I) -> Vec<Expense>
    where
        I: IntoIterator<Item = &'a Expense>,
    {
        let needle = self.needle();
        let mut matched: Vec<(usize, &Expense)> = records
            .into_iter()
            .enumerate()
            .filter(|(_, e)| self.matches_with(needle.as_deref(), e))
            .collect();
        matched.sort_by(|(ix_a, a), (ix_b, b)| b.date().cmp(&a.date()).then(ix_a.cmp(ix_b)));
        matched.into_iter().map(|(_, e)| e.clone()).collect()
    }

    fn needle(&self) -> Option<String> {
        let query = self.query.trim();
        (!query.is_empty()).then(|| query.to_lowercase())
    }

    fn matches_with(&self, needle: Option<&str>, expense: &Expense) -> bool {
        if let Some(needle) = needle {
            let haystack = format!("{} {}", expense.description(), expense.category()).to_lowercase();
            if !haystack.contains(needle) {
                return false;
            }
        }
        if !self.category.matches(expense.category()) {
            return false;
        }
        if matches!(self.from, Some(from) if expense.date() < from) {
            return false;
        }
        if matches!(self.to, Some(to) if expense.date() > to) {
            return false;
        }
        true
    }
}

/// The distinct categories used by `records`, sorted, for populating a category selector.
pub fn categories<'a, I>(records: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a Expense>,
{
    records
        .into_iter()
        .map(|e| e.category())
        .collect::<BTreeSet<&str>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}
