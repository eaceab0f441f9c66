//! These structs provide the CLI interface for the expenses CLI.

use crate::filter::{CategorySelector, Filter};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// expenses: A command-line tool for keeping a personal expense ledger.
///
/// Expenses are recorded with a description, an amount, a category and a date, and are stored as
/// a JSON snapshot in the expenses home directory. You can list them with filters, see totals,
/// and correct or delete past entries.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the home directory and initialize the configuration file.
    ///
    /// This is the first command you should run. By default the home directory is
    /// $HOME/expenses; pass --expenses-home or set EXPENSES_HOME to put it somewhere else.
    Init,
    /// Record a new expense.
    Add(AddArgs),
    /// Change fields of an existing expense. Fields that are not given keep their values.
    Edit(EditArgs),
    /// Delete one or more expenses by id.
    Delete(DeleteArgs),
    /// List expenses, most recent first, with the visible and overall totals.
    List(ListArgs),
    /// List the distinct categories in use.
    Categories,
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where the ledger and configuration are held. Defaults to ~/expenses
    #[arg(long, env = "EXPENSES_HOME", default_value_t = default_expenses_home())]
    expenses_home: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, expenses_home: PathBuf) -> Self {
        Self {
            log_level,
            expenses_home: expenses_home.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn expenses_home(&self) -> &DisplayPath {
        &self.expenses_home
    }
}

/// (Not shown): Args for the `expenses add` command.
#[derive(Debug, Parser, Clone, Default)]
pub struct AddArgs {
    /// What the money was spent on.
    #[arg(long)]
    description: String,

    /// How much was spent, e.g. 12.50 or $1,200.00. Must be greater than zero.
    #[arg(long)]
    amount: String,

    /// A free-text category. Defaults to Uncategorized.
    #[arg(long, default_value = "")]
    category: String,

    /// The date of the expense as YYYY-MM-DD. Defaults to today.
    #[arg(long)]
    date: Option<String>,
}

impl AddArgs {
    pub fn new(
        description: impl Into<String>,
        amount: impl Into<String>,
        category: impl Into<String>,
        date: Option<String>,
    ) -> Self {
        Self {
            description: description.into(),
            amount: amount.into(),
            category: category.into(),
            date,
        }
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

    pub fn date(&self) -> Option<&str> {
        self.date.as_deref()
    }
}

/// (Not shown): Args for the `expenses edit` command.
#[derive(Debug, Parser, Clone, Default)]
pub struct EditArgs {
    /// The id of the expense to change.
    id: String,

    #[arg(long)]
    description: Option<String>,

    #[arg(long)]
    amount: Option<String>,

    /// The new category. An empty value sets it to Uncategorized.
    #[arg(long)]
    category: Option<String>,

    /// The new date as YYYY-MM-DD.
    #[arg(long)]
    date: Option<String>,
}

impl EditArgs {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_amount(mut self, amount: impl Into<String>) -> Self {
        self.amount = Some(amount.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn amount(&self) -> Option<&str> {
        self.amount.as_deref()
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn date(&self) -> Option<&str> {
        self.date.as_deref()
    }
}

/// (Not shown): Args for the `expenses delete` command.
#[derive(Debug, Parser, Clone)]
pub struct DeleteArgs {
    /// The ids of the expenses to delete. Nothing is deleted unless every id exists.
    #[arg(required = true)]
    ids: Vec<String>,
}

impl DeleteArgs {
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }
}

/// (Not shown): Args for the `expenses list` command.
#[derive(Debug, Parser, Clone, Default)]
pub struct ListArgs {
    /// Only show expenses whose description or category contains this text, ignoring case.
    #[arg(long, default_value = "")]
    query: String,

    /// Only show expenses in exactly this category. "All" shows every category.
    #[arg(long, default_value_t = CategorySelector::All)]
    category: CategorySelector,

    /// Only show expenses on or after this date (YYYY-MM-DD).
    #[arg(long)]
    from: Option<NaiveDate>,

    /// Only show expenses on or before this date (YYYY-MM-DD).
    #[arg(long)]
    to: Option<NaiveDate>,
}

impl ListArgs {
    pub fn new(filter: Filter) -> Self {
        Self {
            query: filter.query,
            category: filter.category,
            from: filter.from,
            to: filter.to,
        }
    }

    /// The filter these options describe.
    pub fn filter(&self) -> Filter {
        Filter::new()
            .with_query(self.query.clone())
            .with_category(self.category.clone())
            .with_from(self.from)
            .with_to(self.to)
    }
}

fn default_expenses_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("expenses"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --expenses-home or EXPENSES_HOME instead of relying on the \
                default home directory. If you continue using the program right now, you may \
                have problems!",
            );
            PathBuf::from("expenses")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn path(&self) -> &Path {
        &self.0
    }
}
