//! Types that represent the core data model: `Expense`, its `Amount`, and the `Draft` it is
//! entered through.
mod amount;
mod draft;
mod expense;

pub use amount::{Amount, AmountError};
pub use draft::Draft;
pub use expense::{
    normalize_category, validate, Expense, ExpenseDetails, ValidationError, DATE_FORMAT,
    DEFAULT_CATEGORY,
};
