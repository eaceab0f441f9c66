use crate::model::{Amount, Draft};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// The category label given to expenses that were entered without one.
pub const DEFAULT_CATEGORY: &str = "Uncategorized";

/// The date format used on the wire and in user input.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A single recorded expenditure. This is the only entity that is persisted.
///
/// The serialized shape is
/// `{"id": "...", "description": "...", "amount": 3.5, "category": "...", "date": "YYYY-MM-DD"}`.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Expense {
    id: String,
    description: String,
    amount: Amount,
    category: String,
    date: NaiveDate,
}

impl Expense {
    /// Binds validated `details` to an `id`. The ledger is the only caller that mints ids.
    pub(crate) fn from_details(id: impl Into<String>, details: ExpenseDetails) -> Self {
        Self {
            id: id.into(),
            description: details.description,
            amount: details.amount,
            category: details.category,
            date: details.date,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// The record's fields without its identity.
    pub fn details(&self) -> ExpenseDetails {
        ExpenseDetails {
            description: self.description.clone(),
            amount: self.amount,
            category: self.category.clone(),
            date: self.date,
        }
    }
}

/// The normalized, validated fields of an expense, not yet bound to an id.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct ExpenseDetails {
    pub description: String,
    pub amount: Amount,
    pub category: String,
    pub date: NaiveDate,
}

/// The reason a draft was rejected. Only the first failing rule is reported.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum ValidationError {
    MissingDescription,
    InvalidAmount,
    MissingDate,
    InvalidDate,
}

impl ValidationError {
    /// The human-readable message shown next to the form.
    pub fn message(&self) -> &'static str {
        match self {
            ValidationError::MissingDescription => "Description is required.",
            ValidationError::InvalidAmount => "Enter a valid amount greater than 0.",
            ValidationError::MissingDate => "Date is required.",
            ValidationError::InvalidDate => "Enter a valid date (YYYY-MM-DD).",
        }
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

impl StdError for ValidationError {}

/// Checks `draft` against the record rules, in order, and normalizes it.
///
/// 1. The description must not be blank.
/// 2. The amount must parse to a number greater than zero.
/// 3. The date must be present.
/// 4. The date must be a `YYYY-MM-DD` calendar date.
///
/// On success the description and category are trimmed and a blank category becomes
/// `"Uncategorized"`.
pub fn validate(draft: &Draft) -> Result<ExpenseDetails, ValidationError> {
    let description = draft.description().trim();
    if description.is_empty() {
        return Err(ValidationError::MissingDescription);
    }

    let amount = match Amount::from_str(draft.amount()) {
        Ok(amount) if amount.is_positive() => amount,
        _ => return Err(ValidationError::InvalidAmount),
    };

    let date = draft.date().trim();
    if date.is_empty() {
        return Err(ValidationError::MissingDate);
    }
    let date =
        NaiveDate::parse_from_str(date, DATE_FORMAT).map_err(|_| ValidationError::InvalidDate)?;

    Ok(ExpenseDetails {
        description: description.to_string(),
        amount,
        category: normalize_category(draft.category()),
        date,
    })
}

/// Trims `category`, substituting the default label when nothing is left.
pub fn normalize_category(category: &str) -> String {
    match category.trim() {
        "" => DEFAULT_CATEGORY.to_string(),
        trimmed => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn draft(description: &str, amount: &str, category: &str, date: &str) -> Draft {
        let mut d = Draft::blank(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        d.description = description.to_string();
        d.amount = amount.to_string();
        d.category = category.to_string();
        d.date = date.to_string();
        d
    }

    #[test]
    fn test_valid_draft_is_normalized() {
        let details = validate(&draft("  Coffee ", "3.5", "", "2024-01-05")).unwrap();
        assert_eq!(details.description, "Coffee");
        assert_eq!(details.amount.value(), Decimal::new(350, 2));
        assert_eq!(details.category, DEFAULT_CATEGORY);
        assert_eq!(details.date, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
    }

    #[test]
    fn test_category_is_trimmed() {
        let details = validate(&draft("Taxi", "12", "  Travel ", "2024-01-05")).unwrap();
        assert_eq!(details.category, "Travel");
    }

    #[test]
    fn test_blank_description_rejected() {
        for description in ["", "   ", "\t\n"] {
            let result = validate(&draft(description, "3.5", "Food", "2024-01-05"));
            assert_eq!(result, Err(ValidationError::MissingDescription));
        }
    }

    #[test]
    fn test_bad_amount_rejected() {
        for amount in ["", "0", "0.00", "-1", "abc", "NaN", "inf", "1..2"] {
            let result = validate(&draft("Coffee", amount, "Food", "2024-01-05"));
            assert_eq!(
                result,
                Err(ValidationError::InvalidAmount),
                "amount {amount:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_missing_date_rejected() {
        let result = validate(&draft("Coffee", "3.5", "Food", "  "));
        assert_eq!(result, Err(ValidationError::MissingDate));
    }

    #[test]
    fn test_malformed_date_rejected() {
        for date in ["2024-13-01", "01/05/2024", "yesterday"] {
            let result = validate(&draft("Coffee", "3.5", "Food", date));
            assert_eq!(result, Err(ValidationError::InvalidDate));
        }
    }

    #[test]
    fn test_first_failure_wins() {
        let result = validate(&draft("", "-5", "", ""));
        assert_eq!(result, Err(ValidationError::MissingDescription));
        let result = validate(&draft("Coffee", "-5", "", ""));
        assert_eq!(result, Err(ValidationError::InvalidAmount));
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            ValidationError::MissingDescription.to_string(),
            "Description is required."
        );
        assert_eq!(
            ValidationError::InvalidAmount.to_string(),
            "Enter a valid amount greater than 0."
        );
        assert_eq!(ValidationError::MissingDate.to_string(), "Date is required.");
    }

    #[test]
    fn test_wire_shape() {
        let details = validate(&draft("Coffee", "3.50", "Food", "2024-01-05")).unwrap();
        let expense = Expense::from_details("abc", details);
        let json = serde_json::to_value(&expense).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "abc",
                "description": "Coffee",
                "amount": 3.5,
                "category": "Food",
                "date": "2024-01-05"
            })
        );
    }
}
