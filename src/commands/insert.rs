//! The `add` command.

use crate::args::AddArgs;
use crate::commands::{report_unsaved, open_for_change, Out};
use crate::error::{ErrorType, IntoResult};
use crate::form::Submission;
use crate::model::Expense;
use crate::{Config, Result};
use anyhow::anyhow;

/// Validates the given fields and records them as a new expense.
///
/// # Errors
/// - `ErrorType::Validation` if the fields are rejected. Nothing is written.
/// - `ErrorType::Storage` if the ledger could not be saved under strict durability.
pub async fn add(config: Config, args: AddArgs) -> Result<Out<Expense>> {
    let mut tracker = open_for_change(&config).await?;

    let form = tracker.form_mut();
    form.set_description(args.description());
    form.set_amount(args.amount());
    form.set_category(args.category());
    if let Some(date) = args.date() {
        form.set_date(date);
    }

    let submission = tracker.submit().pub_result(ErrorType::Storage)?;
    report_unsaved(&mut tracker);
    match submission {
        Submission::Added(expense) => Ok(Out::new(
            format!(
                "Added {} on {} for {} ({})",
                expense.description(),
                expense.date(),
                expense.amount(),
                expense.id()
            ),
            expense,
        )),
        Submission::Rejected(e) => Err(anyhow!(e)).pub_result(ErrorType::Validation),
        other => Err(anyhow!("Unexpected outcome while adding: {other:?}"))
            .pub_result(ErrorType::Storage),
    }
}
