//! The `edit` command.

use crate::args::EditArgs;
use crate::commands::{report_unsaved, open_for_change, Out};
use crate::error::{ErrorType, IntoResult};
use crate::form::Submission;
use crate::model::Expense;
use crate::{Config, Result};
use anyhow::anyhow;

/// Loads the expense with the given id into the form, overrides the fields that were given and
/// submits it. The expense keeps its id and position.
///
/// # Errors
/// - `ErrorType::NotFound` if there is no expense with the id.
/// - `ErrorType::Validation` if the changed fields are rejected. Nothing is written.
/// - `ErrorType::Storage` if the ledger could not be saved under strict durability.
pub async fn edit(config: Config, args: EditArgs) -> Result<Out<Expense>> {
    let mut tracker = open_for_change(&config).await?;
    if !tracker.start_edit(args.id()) {
        return Err(anyhow!("No expense with id '{}'", args.id())).pub_result(ErrorType::NotFound);
    }

    let form = tracker.form_mut();
    if let Some(description) = args.description() {
        form.set_description(description);
    }
    if let Some(amount) = args.amount() {
        form.set_amount(amount);
    }
    if let Some(category) = args.category() {
        form.set_category(category);
    }
    if let Some(date) = args.date() {
        form.set_date(date);
    }

    let submission = tracker.submit().pub_result(ErrorType::Storage)?;
    report_unsaved(&mut tracker);
    match submission {
        Submission::Updated(expense) => Ok(Out::new(
            format!("Updated expense {}", expense.id()),
            expense,
        )),
        Submission::Missing(id) => {
            Err(anyhow!("No expense with id '{id}'")).pub_result(ErrorType::NotFound)
        }
        Submission::Rejected(e) => Err(anyhow!(e)).pub_result(ErrorType::Validation),
        Submission::Added(expense) => Err(anyhow!(
            "Expense {} was added instead of updated",
            expense.id()
        ))
        .pub_result(ErrorType::Storage),
    }
}
