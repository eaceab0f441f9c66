//! Amount type for handling monetary values with optional dollar signs.
//!
//! `Amount` wraps a `Decimal` so that sums of cents are exact. It parses user text that may or may
//! not include a dollar sign and thousands separators, and it is written to storage as a plain
//! JSON number.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::ser::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Number, Value};
use std::error::Error;
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;
use tracing::warn;

/// Represents a dollar amount.
///
/// # Examples
///
/// Parsing with or without a dollar sign and commas:
/// ```
/// # use expense_ledger::model::Amount;
/// # use std::str::FromStr;
/// let a = Amount::from_str("$1,250.00").unwrap();
/// let b = Amount::from_str("1250").unwrap();
/// assert_eq!(a, b);
/// assert_eq!(a.to_string(), "$1,250.00");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(Decimal);

impl Amount {
    pub const ZERO: Amount = Amount(Decimal::ZERO);

    /// Creates a new Amount from a Decimal value.
    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Returns the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Returns true if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns true if the amount is strictly greater than zero.
    pub fn is_positive(&self) -> bool {
        !self.is_zero() && self.0.is_sign_positive()
    }

    /// Returns true if the amount is negative.
    pub fn is_negative(&self) -> bool {
        !self.is_zero() && self.0.is_sign_negative()
    }
}

/// An error that can occur when parsing strings into `Amount` values.
pub struct AmountError(rust_decimal::Error);

impl Debug for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(&self.0, f)
    }
}

impl Display for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl std::error::Error for AmountError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.0)
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Ok(Amount::default());
        }

        // "-$50.00", "$50.00", "-50.00" and "50.00" are all accepted
        let without_dollar = if let Some(after_minus) = trimmed.strip_prefix('-') {
            match after_minus.strip_prefix('$') {
                Some(after_dollar) => format!("-{after_dollar}"),
                None => trimmed.to_string(),
            }
        } else if let Some(after_dollar) = trimmed.strip_prefix('$') {
            after_dollar.to_string()
        } else {
            trimmed.to_string()
        };

        let without_commas = without_dollar.replace(',', "");

        let value = Decimal::from_str(&without_commas)
            .or_else(|_| Decimal::from_scientific(&without_commas))
            .map_err(AmountError)?;
        Ok(Amount(value))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.is_negative() { "-" } else { "" };
        let num = self
            .0
            .abs()
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        write!(
            f,
            "{sign}${}",
            format_num::format_num!(",.2", num.to_f64().unwrap_or_default())
        )
    }
}

impl Serialize for Amount {
    /// Writes the exact decimal as a JSON number, e.g. `3.5` or `1234567890123456.78`.
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let number = Number::from_str(&self.0.normalize().to_string()).map_err(S::Error::custom)?;
        number.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Amount {
    /// Stored amounts are read leniently: numbers and numeric strings are accepted, anything else
    /// is coerced to zero so that one bad record cannot poison the totals or the whole snapshot.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Value::deserialize(deserializer)?;
        let parsed = match &raw {
            Value::Number(n) => Amount::from_str(&n.to_string()).ok(),
            Value::String(s) => Amount::from_str(s).ok(),
            _ => None,
        };
        Ok(parsed.unwrap_or_else(|| {
            warn!("Stored amount {raw} is not numeric, treating it as zero");
            Amount::ZERO
        }))
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_plain() {
        let amount = Amount::from_str("3.5").unwrap();
        assert_eq!(amount.value(), dec("3.50"));
    }

    #[test]
    fn test_parse_with_dollar_and_commas() {
        let amount = Amount::from_str("  $1,234,567.89 ").unwrap();
        assert_eq!(amount.value(), dec("1234567.89"));
    }

    #[test]
    fn test_parse_negative_with_dollar_sign() {
        let amount = Amount::from_str("-$50.00").unwrap();
        assert_eq!(amount.value(), dec("-50"));
        assert!(amount.is_negative());
    }

    #[test]
    fn test_parse_empty_is_zero() {
        let amount = Amount::from_str("   ").unwrap();
        assert!(amount.is_zero());
        assert!(!amount.is_positive());
    }

    #[test]
    fn test_parse_rejects_non_numeric() {
        assert!(Amount::from_str("abc").is_err());
        assert!(Amount::from_str("NaN").is_err());
        assert!(Amount::from_str("inf").is_err());
        assert!(Amount::from_str("12abc").is_err());
    }

    #[test]
    fn test_parse_scientific() {
        let amount = Amount::from_str("1.5e2").unwrap();
        assert_eq!(amount.value(), dec("150"));
    }

    #[test]
    fn test_display() {
        assert_eq!(Amount::new(dec("7.5")).to_string(), "$7.50");
        assert_eq!(Amount::new(dec("60000")).to_string(), "$60,000.00");
        assert_eq!(Amount::new(dec("-12.345")).to_string(), "-$12.35");
        assert_eq!(Amount::new(dec("0.125")).to_string(), "$0.13");
        assert_eq!(Amount::new(dec("2.665")).to_string(), "$2.67");
        assert_eq!(Amount::ZERO.to_string(), "$0.00");
    }

    #[test]
    fn test_serialize_as_number() {
        let json = serde_json::to_string(&Amount::new(dec("3.50"))).unwrap();
        assert_eq!(json, "3.5");
    }

    #[test]
    fn test_serialize_keeps_every_digit() {
        for text in [
            "1234567890123456.78",
            "0.12345678901234567891",
            "79228162514264337593543950335",
        ] {
            let amount = Amount::from_str(text).unwrap();
            let json = serde_json::to_string(&amount).unwrap();
            assert_eq!(json, text);
            let back: Amount = serde_json::from_str(&json).unwrap();
            assert_eq!(back.value(), amount.value());
        }
    }

    #[test]
    fn test_deserialize_number_and_string() {
        let a: Amount = serde_json::from_str("4.25").unwrap();
        assert_eq!(a.value(), dec("4.25"));
        let b: Amount = serde_json::from_str("\"$4.25\"").unwrap();
        assert_eq!(a, b);
        let c: Amount = serde_json::from_str("12").unwrap();
        assert_eq!(c.value(), dec("12"));
    }

    #[test]
    fn test_deserialize_garbage_is_zero() {
        let a: Amount = serde_json::from_str("\"lots\"").unwrap();
        assert!(a.is_zero());
        let b: Amount = serde_json::from_str("null").unwrap();
        assert!(b.is_zero());
        let c: Amount = serde_json::from_str("{\"cents\": 5}").unwrap();
        assert!(c.is_zero());
    }

    #[test]
    fn test_equality_ignores_scale() {
        assert_eq!(Amount::new(dec("3.5")), Amount::new(dec("3.50")));
    }

    #[test]
    fn test_ordering() {
        let a1 = Amount::from_str("$30.00").unwrap();
        let a2 = Amount::from_str("$50.00").unwrap();
        assert!(a1 < a2);
    }
}
