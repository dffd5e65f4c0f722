//! Account Collection
//!
//! Ordered accounts mirrored to one storage slot.
//! Loaded once at construction, rewritten after every mutation.

use parking_lot::RwLock;
use std::collections::HashSet;
use std::sync::Arc;

use accountbook_storage::KeyValueStore;

use crate::account::AccountRecord;
use crate::error::AccountError;
use crate::Result;

/// Storage slot holding the serialized accounts
pub const ACCOUNTS_KEY: &str = "accounts";

type Subscriber = Arc<dyn Fn(&[AccountRecord]) + Send + Sync>;

pub struct AccountCollection {
    /// In-memory accounts, in render order
    accounts: Arc<RwLock<Vec<AccountRecord>>>,
    /// Called after each mutation that changed the accounts
    subscribers: Arc<RwLock<Vec<Subscriber>>>,
    /// Most recent failed write, cleared by the next successful one
    last_persist_error: Arc<RwLock<Option<String>>>,
    store: Arc<dyn KeyValueStore>,
}

impl AccountCollection {
    /// Build the collection from whatever the store holds under [`ACCOUNTS_KEY`].
    ///
    /// Never fails: a missing, unreadable or unparsable slot yields an empty
    /// collection and a log entry. Nothing is written back.
    pub fn load<S>(store: S) -> Self
    where
        S: KeyValueStore + 'static,
    {
        let store: Arc<dyn KeyValueStore> = Arc::new(store);

        let accounts = match store.get_item(ACCOUNTS_KEY) {
            Ok(Some(saved)) => match parse_accounts(&saved) {
                Ok(accounts) => accounts,
                Err(e) => {
                    tracing::warn!(error = %e, "Error parsing saved accounts, starting empty");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::error!(error = %e, "Failed to read saved accounts, starting empty");
                Vec::new()
            }
        };

        tracing::info!(count = accounts.len(), "Loaded accounts");

        Self {
            accounts: Arc::new(RwLock::new(accounts)),
            subscribers: Arc::new(RwLock::new(Vec::new())),
            last_persist_error: Arc::new(RwLock::new(None)),
            store,
        }
    }

    /// Append a blank local account and return a copy of it
    pub fn add_account(&self) -> AccountRecord {
        let account = AccountRecord::new();
        let created = account.clone();

        self.mutate(|accounts| {
            accounts.push(account);
            true
        });

        tracing::info!(account_id = %created.id, "Created account");

        created
    }

    /// Remove every account with the given id.
    ///
    /// Returns whether anything was removed; an unknown id is not an error.
    pub fn remove_account(&self, id: &str) -> bool {
        let removed = self.mutate(|accounts| {
            let before = accounts.len();
            accounts.retain(|acc| acc.id != id);
            accounts.len() != before
        });

        if removed {
            tracing::info!(account_id = %id, "Removed account");
        }

        removed
    }

    /// Replace the account with `updated.id` by `updated`, keeping its position.
    ///
    /// All fields are overwritten. Returns whether a matching account existed;
    /// an unknown id inserts nothing.
    pub fn update_account(&self, updated: &AccountRecord) -> bool {
        let replaced = self.mutate(|accounts| {
            match accounts.iter_mut().find(|acc| acc.id == updated.id) {
                Some(slot) => {
                    *slot = updated.clone();
                    true
                }
                None => false,
            }
        });

        if replaced {
            tracing::debug!(account_id = %updated.id, "Updated account");
        } else {
            tracing::debug!(account_id = %updated.id, "Ignoring update for unknown account");
        }

        replaced
    }

    /// Copy of all accounts, in order
    pub fn accounts(&self) -> Vec<AccountRecord> {
        self.accounts.read().clone()
    }

    /// Read the accounts without copying them.
    pub fn with_accounts<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&[AccountRecord]) -> R,
    {
        let accounts = self.accounts.read();
        f(&accounts)
    }

    pub fn get(&self, id: &str) -> Option<AccountRecord> {
        self.accounts.read().iter().find(|acc| acc.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.accounts.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.read().is_empty()
    }

    /// Register a callback run after every mutation that changed the accounts.
    ///
    /// Callbacks run on the mutating thread after every lock is released and
    /// receive a snapshot, so they may read, subscribe or mutate freely.
    pub fn subscribe<F>(&self, callback: F)
    where
        F: Fn(&[AccountRecord]) + Send + Sync + 'static,
    {
        self.subscribers.write().push(Arc::new(callback));
    }

    /// The last persistence failure, if the most recent write failed
    pub fn last_persist_error(&self) -> Option<String> {
        self.last_persist_error.read().clone()
    }

    /// The JSON written to storage for the current accounts
    pub fn snapshot_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&*self.accounts.read())?)
    }

    /// Apply `f`, persist, then notify subscribers if `f` reports a change.
    ///
    /// The write lock is held through the storage write, so the slot always
    /// ends up holding the last completed mutation. Subscribers see a copy
    /// taken before the lock is released.
    fn mutate<F>(&self, f: F) -> bool
    where
        F: FnOnce(&mut Vec<AccountRecord>) -> bool,
    {
        let snapshot = {
            let mut accounts = self.accounts.write();
            let changed = f(&mut accounts);
            self.persist(&accounts);
            changed.then(|| accounts.clone())
        };

        match snapshot {
            Some(accounts) => {
                self.notify(&accounts);
                true
            }
            None => false,
        }
    }

    /// Write the full snapshot to storage. Failures are logged, never returned.
    fn persist(&self, accounts: &[AccountRecord]) {
        let result = serde_json::to_string(accounts)
            .map_err(AccountError::from)
            .and_then(|json| {
                self.store
                    .set_item(ACCOUNTS_KEY, &json)
                    .map_err(AccountError::from)
            });

        match result {
            Ok(()) => {
                *self.last_persist_error.write() = None;
            }
            Err(e) => {
                tracing::error!(error = %e, count = accounts.len(), "Failed to persist accounts");
                *self.last_persist_error.write() = Some(e.to_string());
            }
        }
    }

    fn notify(&self, accounts: &[AccountRecord]) {
        let subscribers: Vec<Subscriber> = self.subscribers.read().clone();
        for subscriber in &subscribers {
            subscriber(accounts);
        }
    }
}

impl Clone for AccountCollection {
    fn clone(&self) -> Self {
        Self {
            accounts: Arc::clone(&self.accounts),
            subscribers: Arc::clone(&self.subscribers),
            last_persist_error: Arc::clone(&self.last_persist_error),
            store: Arc::clone(&self.store),
        }
    }
}

/// Parse a saved slot, rejecting any blob that repeats an id
fn parse_accounts(json: &str) -> Result<Vec<AccountRecord>> {
    let accounts: Vec<AccountRecord> = serde_json::from_str(json)?;

    let mut seen = HashSet::with_capacity(accounts.len());
    for account in &accounts {
        if !seen.insert(account.id.as_str()) {
            return Err(AccountError::DuplicateId(account.id.clone()));
        }
    }

    Ok(accounts)
}
