//! Read-only commands.
//!
//! This module provides:
//! - `list`: The expenses that pass a filter, with the visible and overall totals
//! - `categories`: The distinct categories in use

use crate::args::ListArgs;
use crate::commands::{open, Out};
use crate::model::{Amount, Expense, DATE_FORMAT};
use crate::{Config, Result};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// The result of `list`.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    /// The visible expenses, most recent first.
    pub expenses: Vec<Expense>,
    /// The sum over `expenses`.
    pub visible_total: Amount,
    /// The sum over the whole ledger.
    pub overall_total: Amount,
    /// How many expenses the ledger holds.
    pub recorded: usize,
}

impl Display for Listing {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.recorded == 0 {
            return write!(f, "No expenses recorded yet");
        }
        if self.expenses.is_empty() {
            return write!(
                f,
                "No expenses match the current filters (overall total {})",
                self.overall_total
            );
        }

        let header = ["Date", "Description", "Category", "Amount", "Id"];
        let rows: Vec<[String; 5]> = self
            .expenses
            .iter()
            .map(|e| {
                [
                    e.date().format(DATE_FORMAT).to_string(),
                    e.description().to_string(),
                    e.category().to_string(),
                    e.amount().to_string(),
                    e.id().to_string(),
                ]
            })
            .collect();

        let mut widths = header.map(|h| h.chars().count());
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        writeln!(
            f,
            "Showing {} of {} expenses",
            self.expenses.len(),
            self.recorded
        )?;
        write_row(f, &header, &widths)?;
        for row in &rows {
            write_row(f, row, &widths)?;
        }
        writeln!(f, "Visible total: {}", self.visible_total)?;
        write!(f, "Overall total: {}", self.overall_total)
    }
}

/// Amounts are right-aligned, everything else is left-aligned.
fn write_row<S: AsRef<str>>(
    f: &mut Formatter<'_>,
    cells: &[S; 5],
    widths: &[usize; 5],
) -> std::fmt::Result {
    let line = cells
        .iter()
        .zip(widths)
        .enumerate()
        .map(|(ix, (cell, &width))| {
            if ix == 3 {
                format!("{:>width$}", cell.as_ref())
            } else {
                format!("{:<width$}", cell.as_ref())
            }
        })
        .collect::<Vec<_>>()
        .join("  ");
    writeln!(f, "{}", line.trim_end())
}

/// Lists the expenses that pass the filter described by `args`.
pub async fn list(config: Config, args: ListArgs) -> Result<Out<Listing>> {
    let mut tracker = open(&config)?;
    tracker.set_filter(args.filter());

    let listing = Listing {
        expenses: tracker.visible(),
        visible_total: tracker.total_visible(),
        overall_total: tracker.total_all(),
        recorded: tracker.ledger().len(),
    };
    Ok(Out::new(listing.to_string(), listing))
}

/// Lists the distinct categories used by recorded expenses.
pub async fn categories(config: Config) -> Result<Out<Vec<String>>> {
    let tracker = open(&config)?;
    let categories = tracker.categories();
    let message = if categories.is_empty() {
        "No categories in use".to_string()
    } else {
        categories.join("\n")
    };
    Ok(Out::new(message, categories))
}
