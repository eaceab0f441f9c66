//! Shared test utilities for creating test environments and fixtures.
//!
//! This module is only compiled when running tests (`#[cfg(test)]`).

use crate::args::AddArgs;
use crate::ledger::Durability;
use crate::model::{Expense, ExpenseDetails, DATE_FORMAT};
use crate::{commands, utils, Config};
use chrono::NaiveDate;
use std::str::FromStr;
use tempfile::TempDir;

/// Test environment that sets up an expenses home directory with Config.
/// Holds TempDir to keep the directory alive for the duration of the test.
pub struct TestEnv {
    _temp_dir: TempDir,
    config: Config,
}

impl TestEnv {
    /// Creates a test environment with an initialized home directory.
    pub async fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("expenses");
        let config = Config::create(&root).await.unwrap();
        Self {
            _temp_dir: temp_dir,
            config,
        }
    }

    /// Rewrites `config.json` with the given durability and reloads the Config.
    pub async fn set_durability(&mut self, durability: Durability) {
        let root = self.config.root().to_path_buf();
        let path = root.join("config.json");
        let mut json: serde_json::Value =
            serde_json::from_str(&utils::read(&path).await.unwrap()).unwrap();
        json["durability"] = serde_json::Value::String(durability.to_string());
        utils::write(&path, serde_json::to_string_pretty(&json).unwrap())
            .await
            .unwrap();
        self.config = Config::load(root).await.unwrap();
    }

    /// Puts a directory where the snapshot file belongs so that every save fails.
    pub async fn block_snapshot(&self) {
        let path = self.config.snapshot_path().unwrap();
        utils::make_dir(path.join("occupied")).await.unwrap();
    }

    /// Returns a clone of the Config.
    pub fn config(&self) -> Config {
        self.config.clone()
    }

    /// Records an expense through the `add` command and returns it.
    pub async fn add(&self, description: &str, amount: &str, category: &str, date: &str) -> Expense {
        let args = AddArgs::new(description, amount, category, Some(date.to_string()));
        let out = commands::add(self.config(), args).await.unwrap();
        out.structure().unwrap().clone()
    }

    /// The number of files in the backups directory.
    pub async fn backup_count(&self) -> usize {
        let mut count = 0;
        let mut dir = utils::read_dir(self.config.backups()).await.unwrap();
        while dir.next_entry().await.unwrap().is_some() {
            count += 1;
        }
        count
    }
}

/// Validated fields built from literal text.
pub fn details(description: &str, amount: &str, category: &str, date: &str) -> ExpenseDetails {
    ExpenseDetails {
        description: description.to_string(),
        amount: crate::model::Amount::from_str(amount).unwrap(),
        category: category.to_string(),
        date: NaiveDate::parse_from_str(date, DATE_FORMAT).unwrap(),
    }
}

/// A stored expense built from literal text.
pub fn expense(id: &str, description: &str, amount: &str, category: &str, date: &str) -> Expense {
    Expense::from_details(id, details(description, amount, category, date))
}
