use std::collections::HashSet;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, WriterBuilder};
use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::account::amount::{format_amount, normalize};
use crate::storage::models::{Account, Transaction, TransactionKind};
use crate::storage::{AccountRepository, StorageError, TransactionRepository, ACCOUNTS_HEADER};

/// Raw accounts file row; balances stay fixed 2-decimal strings on disk.
#[derive(Debug, Serialize, Deserialize)]
struct AccountRow {
    username: String,
    password: String,
    balance: String,
}

impl From<&Account> for AccountRow {
    fn from(account: &Account) -> Self {
        Self {
            username: account.username.clone(),
            password: account.password.clone(),
            balance: format_amount(account.balance),
        }
    }
}

impl From<AccountRow> for Account {
    fn from(row: AccountRow) -> Self {
        // An unreadable stored balance falls back to 0.00 instead of failing.
        let balance = row
            .balance
            .parse::<Decimal>()
            .map(normalize)
            .unwrap_or(Decimal::ZERO);
        Self {
            username: row.username,
            password: row.password,
            balance,
        }
    }
}

/// Raw transactions file row.
#[derive(Debug, Serialize, Deserialize)]
struct TransactionRow {
    username: String,
    date: String,
    #[serde(rename = "type")]
    kind: String,
    amount: String,
    balance: String,
    details: String,
}

impl From<&Transaction> for TransactionRow {
    fn from(tx: &Transaction) -> Self {
        Self {
            username: tx.username.clone(),
            date: tx.date.clone(),
            kind: tx.kind.as_str().to_string(),
            amount: format_amount(tx.amount),
            balance: format_amount(tx.balance),
            details: tx.details.clone(),
        }
    }
}

impl TryFrom<TransactionRow> for Transaction {
    type Error = StorageError;

    fn try_from(row: TransactionRow) -> Result<Self, Self::Error> {
        let kind = TransactionKind::from_str(&row.kind).map_err(StorageError::InvalidRecord)?;
        let amount = row
            .amount
            .parse::<Decimal>()
            .map(normalize)
            .unwrap_or(Decimal::ZERO);
        let balance = row
            .balance
            .parse::<Decimal>()
            .map(normalize)
            .unwrap_or(Decimal::ZERO);
        Ok(Self {
            username: row.username,
            date: row.date,
            kind,
            amount,
            balance,
            details: row.details,
        })
    }
}

/// Make sure a CSV file exists and starts with the expected header row.
///
/// The previous first row is dropped only when its field *set* equals the
/// expected header set; any other first row is kept as data under the fresh
/// canonical header.
pub fn ensure_header(path: &Path, header: &[&str]) -> Result<(), StorageError> {
    if !path.exists() {
        let mut writer = WriterBuilder::new().has_headers(false).from_path(path)?;
        writer.write_record(header)?;
        writer.flush()?;
        return Ok(());
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;
    let mut records = Vec::new();
    for record in reader.records() {
        records.push(record?);
    }

    let canonical = records
        .first()
        .map(|first| first.iter().eq(header.iter().copied()))
        .unwrap_or(false);
    if canonical {
        return Ok(());
    }

    let expected: HashSet<&str> = header.iter().copied().collect();
    let skip_first = records
        .first()
        .map(|first| first.iter().collect::<HashSet<&str>>() == expected)
        .unwrap_or(false);

    debug!("Rewriting header of {}", path.display());
    let mut writer = WriterBuilder::new().has_headers(false).from_path(path)?;
    writer.write_record(header)?;
    for record in records.iter().skip(usize::from(skip_first)) {
        if record.iter().any(|field| !field.is_empty()) {
            writer.write_record(record)?;
        }
    }
    writer.flush()?;
    Ok(())
}

/// Accounts ledger backed by a single CSV file. Every operation re-reads the
/// whole file; every mutation rewrites it.
#[derive(Debug)]
pub struct CsvAccountStore {
    path: PathBuf,
}

impl CsvAccountStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn load(&self) -> Result<Vec<AccountRow>, StorageError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let mut reader = ReaderBuilder::new().has_headers(true).from_path(&self.path)?;
        let mut rows = Vec::new();
        for row in reader.deserialize::<AccountRow>() {
            rows.push(row?);
        }
        Ok(rows)
    }
}

impl AccountRepository for CsvAccountStore {
    fn exists(&self, username: &str) -> Result<bool, StorageError> {
        Ok(self.load()?.iter().any(|row| row.username == username))
    }

    fn find(&self, username: &str) -> Result<Option<Account>, StorageError> {
        Ok(self
            .load()?
            .into_iter()
            .find(|row| row.username == username)
            .map(Account::from))
    }

    fn create(&mut self, account: &Account) -> Result<(), StorageError> {
        let file = OpenOptions::new().append(true).create(true).open(&self.path)?;
        let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
        writer.serialize(AccountRow::from(account))?;
        writer.flush()?;
        Ok(())
    }

    fn balance_of(&self, username: &str) -> Result<Decimal, StorageError> {
        Ok(self
            .find(username)?
            .map(|account| account.balance)
            .unwrap_or(Decimal::ZERO))
    }

    fn set_balance(&mut self, username: &str, balance: Decimal) -> Result<(), StorageError> {
        let balance = normalize(balance);
        let mut rows = self.load()?;
        for row in &mut rows {
            if row.username == username {
                row.balance = format_amount(balance);
            }
        }

        let mut writer = WriterBuilder::new().has_headers(false).from_path(&self.path)?;
        writer.write_record(&ACCOUNTS_HEADER)?;
        for row in &rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// Append-only transaction ledger backed by a single CSV file.
#[derive(Debug)]
pub struct CsvTransactionStore {
    path: PathBuf,
}

impl CsvTransactionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TransactionRepository for CsvTransactionStore {
    fn append(&mut self, transaction: &Transaction) -> Result<(), StorageError> {
        let file = OpenOptions::new().append(true).create(true).open(&self.path)?;
        let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
        writer.serialize(TransactionRow::from(transaction))?;
        writer.flush()?;
        Ok(())
    }

    fn history(&self, username: &str) -> Result<Vec<Transaction>, StorageError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let mut reader = ReaderBuilder::new().has_headers(true).from_path(&self.path)?;
        let mut rows = Vec::new();
        for row in reader.deserialize::<TransactionRow>() {
            let row = row?;
            if row.username == username {
                rows.push(Transaction::try_from(row)?);
            }
        }
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{initialize, TRANSACTIONS_HEADER};
    use std::fs;
    use tempfile::tempdir;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_ensure_header_creates_missing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("accounts.csv");
        ensure_header(&path, &ACCOUNTS_HEADER).unwrap();
        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "username,password,balance\n");
    }

    #[test]
    fn test_ensure_header_rewrites_permuted_header() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("accounts.csv");
        fs::write(&path, "balance,username,password\nalice,pw,1.00\n").unwrap();

        ensure_header(&path, &ACCOUNTS_HEADER).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "username,password,balance\nalice,pw,1.00\n");
    }

    #[test]
    fn test_ensure_header_keeps_headerless_data() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("accounts.csv");
        fs::write(&path, "alice,pw,1.00\nbob,pw,2.00\n").unwrap();

        ensure_header(&path, &ACCOUNTS_HEADER).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(
            contents,
            "username,password,balance\nalice,pw,1.00\nbob,pw,2.00\n"
        );
    }

    #[test]
    fn test_create_find_exists() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("accounts.csv");
        ensure_header(&path, &ACCOUNTS_HEADER).unwrap();
        let mut store = CsvAccountStore::new(&path);

        assert!(!store.exists("alice").unwrap());
        store
            .create(&Account::new("alice".to_string(), "secret".to_string()))
            .unwrap();

        assert!(store.exists("alice").unwrap());
        let account = store.find("alice").unwrap().unwrap();
        assert_eq!(account.password, "secret");
        assert_eq!(account.balance, dec("0.00"));
        assert!(store.find("bob").unwrap().is_none());
    }

    #[test]
    fn test_set_balance_rewrites_in_place() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("accounts.csv");
        ensure_header(&path, &ACCOUNTS_HEADER).unwrap();
        let mut store = CsvAccountStore::new(&path);
        store
            .create(&Account::new("alice".to_string(), "pw1".to_string()))
            .unwrap();
        store
            .create(&Account::new("bob".to_string(), "pw2".to_string()))
            .unwrap();

        store.set_balance("alice", dec("12.5")).unwrap();

        // Row order preserved, balance fixed to two decimals
        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(
            contents,
            "username,password,balance\nalice,pw1,12.50\nbob,pw2,0.00\n"
        );
    }

    #[test]
    fn test_balance_of_defaults_missing_and_garbage_to_zero() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("accounts.csv");
        fs::write(&path, "username,password,balance\nalice,pw,not-a-number\n").unwrap();
        let store = CsvAccountStore::new(&path);

        assert_eq!(store.balance_of("alice").unwrap(), Decimal::ZERO);
        assert_eq!(store.balance_of("missing").unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_history_filters_by_username_in_file_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("transactions.csv");
        ensure_header(&path, &TRANSACTIONS_HEADER).unwrap();
        let mut store = CsvTransactionStore::new(&path);

        store
            .append(&Transaction::record(
                "alice",
                TransactionKind::Deposit,
                dec("10.00"),
                dec("10.00"),
                "Cash deposit",
            ))
            .unwrap();
        store
            .append(&Transaction::record(
                "bob",
                TransactionKind::Deposit,
                dec("3.00"),
                dec("3.00"),
                "Cash deposit",
            ))
            .unwrap();
        store
            .append(&Transaction::record(
                "alice",
                TransactionKind::Withdraw,
                dec("4.00"),
                dec("6.00"),
                "Cash withdrawal",
            ))
            .unwrap();

        let rows = store.history("alice").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].kind, TransactionKind::Deposit);
        assert_eq!(rows[1].kind, TransactionKind::Withdraw);
        assert_eq!(rows[1].balance, dec("6.00"));

        assert!(store.history("carol").unwrap().is_empty());
    }

    #[test]
    fn test_history_of_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let store = CsvTransactionStore::new(dir.path().join("transactions.csv"));
        assert!(store.history("alice").unwrap().is_empty());
    }

    #[test]
    fn test_details_with_commas_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("transactions.csv");
        ensure_header(&path, &TRANSACTIONS_HEADER).unwrap();
        let mut store = CsvTransactionStore::new(&path);

        store
            .append(&Transaction::record(
                "alice",
                TransactionKind::TransferOut,
                dec("1.00"),
                dec("9.00"),
                "To bob, with love",
            ))
            .unwrap();

        let rows = store.history("alice").unwrap();
        assert_eq!(rows[0].details, "To bob, with love");
    }

    #[test]
    fn test_initialize_then_store_round_trip() {
        let dir = tempdir().unwrap();
        let storage = crate::config::StorageConfig {
            data_dir: dir.path().to_str().unwrap().to_string(),
            accounts_file: "accounts.csv".to_string(),
            transactions_file: "transactions.csv".to_string(),
        };
        initialize(&storage).unwrap();

        let mut store = CsvAccountStore::new(storage.accounts_path());
        store
            .create(&Account::new("alice".to_string(), "pw".to_string()))
            .unwrap();
        assert!(store.exists("alice").unwrap());
    }
}
