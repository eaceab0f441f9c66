//! The `delete` command.

use crate::args::DeleteArgs;
use crate::commands::{report_unsaved, open, open_for_change, Out};
use crate::error::{ErrorType, IntoResult};
use crate::{Config, Result};
use anyhow::anyhow;
use std::collections::HashSet;

/// Deletes one or more expenses by id.
///
/// This operation is all-or-nothing: if any id is not found, nothing is deleted.
pub async fn delete(config: Config, args: DeleteArgs) -> Result<Out<Vec<String>>> {
    let mut seen = HashSet::new();
    let ids: Vec<&str> = args
        .ids()
        .iter()
        .map(String::as_str)
        .filter(|id| seen.insert(*id))
        .collect();

    let missing: Vec<&str> = {
        let tracker = open(&config)?;
        ids.iter()
            .copied()
            .filter(|id| !tracker.ledger().contains(id))
            .collect()
    };
    if !missing.is_empty() {
        return Err(anyhow!(
            "No expense with id {}, nothing was deleted",
            missing
                .iter()
                .map(|id| format!("'{id}'"))
                .collect::<Vec<_>>()
                .join(", ")
        ))
        .pub_result(ErrorType::NotFound);
    }

    let mut tracker = open_for_change(&config).await?;
    let mut deleted = Vec::with_capacity(ids.len());
    for id in ids {
        if let Some(expense) = tracker.delete(id).pub_result(ErrorType::Storage)? {
            deleted.push(expense.id().to_string());
        }
    }
    report_unsaved(&mut tracker);

    let count = deleted.len();
    let message = format!(
        "Deleted {} expense{}",
        count,
        if count == 1 { "" } else { "s" }
    );
    Ok(Out::new(message, deleted))
}
