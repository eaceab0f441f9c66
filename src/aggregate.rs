use crate::model::{Amount, Expense};
use rust_decimal::Decimal;

/// The sum of the amounts of `records`.
///
/// Used for both the whole-ledger total and the visible-subset total. Amounts that were not
/// numeric in storage were already read as zero; overflow saturates rather than failing.
pub fn total<'a, I>(records: I) -> Amount
where
    I: IntoIterator<Item = &'a Expense>,
{
    let sum = records
        .into_iter()
        .fold(Decimal::ZERO, |acc, e| acc.saturating_add(e.amount().value()));
    Amount::new(sum)
}
