//! Accountbook Core
//!
//! Application root for the account store.
//! The UI layer renders from an [`AccountBook`] and mutates only through it.

mod book;
mod config;
mod error;

pub use book::AccountBook;
pub use config::Config;
pub use error::CoreError;

// Re-export core components
pub use accountbook_accounts::{
    labels_from_raw, AccountCollection, AccountError, AccountRecord, AccountType, Label,
    ACCOUNTS_KEY,
};
pub use accountbook_storage::{Database, KeyValueStore, MemoryStore, StorageError};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(true).init();
}
