//! Application state root
//!
//! Owns the account collection. Whatever renders accounts gets a handle from
//! here instead of reaching for global state.

use accountbook_accounts::{AccountCollection, AccountRecord};
use accountbook_storage::{Database, KeyValueStore};

use crate::config::Config;
use crate::error::CoreError;
use crate::Result;

pub struct AccountBook {
    config: Config,
    accounts: AccountCollection,
}

impl AccountBook {
    /// Open the configured database and load the saved accounts
    pub fn new(config: Config) -> Result<Self> {
        if config.database_path.as_os_str().is_empty() {
            return Err(CoreError::Config("Database path cannot be empty".to_string()));
        }

        // Ensure data directory exists
        if let Some(parent) = config.database_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db = Database::open(&config.database_path)?;
        let book = Self::with_store(config, db);

        tracing::info!(
            path = %book.config.database_path.display(),
            accounts = book.accounts.len(),
            "Account book opened"
        );

        Ok(book)
    }

    /// Build on an already opened store
    pub fn with_store<S>(config: Config, store: S) -> Self
    where
        S: KeyValueStore + 'static,
    {
        Self {
            config,
            accounts: AccountCollection::load(store),
        }
    }

    // === Account operations ===

    pub fn accounts(&self) -> &AccountCollection {
        &self.accounts
    }

    pub fn list_accounts(&self) -> Vec<AccountRecord> {
        self.accounts.accounts()
    }

    pub fn add_account(&self) -> AccountRecord {
        self.accounts.add_account()
    }

    pub fn remove_account(&self, id: &str) -> bool {
        self.accounts.remove_account(id)
    }

    pub fn update_account(&self, updated: &AccountRecord) -> bool {
        self.accounts.update_account(updated)
    }

    /// Accounts as they are written to storage
    pub fn export_json(&self) -> Result<String> {
        Ok(self.accounts.snapshot_json()?)
    }

    // === Config ===

    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl Clone for AccountBook {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            accounts: self.accounts.clone(),
        }
    }
}
