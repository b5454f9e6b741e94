use std::fs;

use log::info;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::config::StorageConfig;
use crate::storage::models::{Account, Transaction};

pub mod csv_store;
pub mod memory;
pub mod models;

/// Canonical accounts file header
pub const ACCOUNTS_HEADER: [&str; 3] = ["username", "password", "balance"];

/// Canonical transactions file header
pub const TRANSACTIONS_HEADER: [&str; 6] =
    ["username", "date", "type", "amount", "balance", "details"];

/// Storage failures. These are the only fatal errors in the system; every
/// domain failure is reported back to the user and re-prompted instead.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("{0}")]
    InvalidRecord(String),
}

/// Keyed store of account records.
///
/// Mutations rewrite the whole backing file; there is no point update and no
/// cross-call locking. The interactive session is the only writer.
pub trait AccountRepository {
    /// True iff a record with this username is present.
    fn exists(&self, username: &str) -> Result<bool, StorageError>;

    /// Linear scan for the full record.
    fn find(&self, username: &str) -> Result<Option<Account>, StorageError>;

    /// Append a new record.
    fn create(&mut self, account: &Account) -> Result<(), StorageError>;

    /// Balance for the username, 0.00 when the account is missing. Callers
    /// are expected to have validated existence first.
    fn balance_of(&self, username: &str) -> Result<Decimal, StorageError>;

    /// Rewrite every record with the target row's balance replaced,
    /// preserving row order.
    fn set_balance(&mut self, username: &str, balance: Decimal) -> Result<(), StorageError>;
}

/// Append-only transaction ledger.
pub trait TransactionRepository {
    /// Append one row.
    fn append(&mut self, transaction: &Transaction) -> Result<(), StorageError>;

    /// All rows for the username, in file order. Empty when the file is
    /// absent or nothing matches.
    fn history(&self, username: &str) -> Result<Vec<Transaction>, StorageError>;
}

/// Create the data directory and both CSV files, reconciling headers.
pub fn initialize(storage: &StorageConfig) -> Result<(), StorageError> {
    fs::create_dir_all(&storage.data_dir)?;
    csv_store::ensure_header(&storage.accounts_path(), &ACCOUNTS_HEADER)?;
    csv_store::ensure_header(&storage.transactions_path(), &TRANSACTIONS_HEADER)?;
    info!("Storage initialized in {}", storage.data_dir);
    Ok(())
}
