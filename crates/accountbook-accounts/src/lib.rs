//! Accountbook Accounts
//!
//! - An account is a labelled login credential set (local or directory-backed)
//! - The collection is loaded once from a single storage slot at construction
//! - Every mutation rewrites the whole slot as a JSON array
//! - A corrupt slot never fails construction; it yields an empty collection

mod account;
mod collection;
mod error;

pub use account::{labels_from_raw, AccountRecord, AccountType, Label};
pub use collection::{AccountCollection, ACCOUNTS_KEY};
pub use error::AccountError;

pub type Result<T> = std::result::Result<T, AccountError>;
