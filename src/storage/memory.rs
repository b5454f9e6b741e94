use rust_decimal::Decimal;

use crate::account::amount::normalize;
use crate::storage::models::{Account, Transaction};
use crate::storage::{AccountRepository, StorageError, TransactionRepository};

/// In-memory accounts store with the same contract as the CSV store; used
/// by unit tests in place of the filesystem.
#[derive(Debug, Default)]
pub struct InMemoryAccountStore {
    accounts: Vec<Account>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_accounts(accounts: Vec<Account>) -> Self {
        Self { accounts }
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }
}

impl AccountRepository for InMemoryAccountStore {
    fn exists(&self, username: &str) -> Result<bool, StorageError> {
        Ok(self.accounts.iter().any(|a| a.username == username))
    }

    fn find(&self, username: &str) -> Result<Option<Account>, StorageError> {
        Ok(self
            .accounts
            .iter()
            .find(|a| a.username == username)
            .cloned())
    }

    fn create(&mut self, account: &Account) -> Result<(), StorageError> {
        self.accounts.push(account.clone());
        Ok(())
    }

    fn balance_of(&self, username: &str) -> Result<Decimal, StorageError> {
        Ok(self
            .accounts
            .iter()
            .find(|a| a.username == username)
            .map(|a| a.balance)
            .unwrap_or(Decimal::ZERO))
    }

    fn set_balance(&mut self, username: &str, balance: Decimal) -> Result<(), StorageError> {
        let balance = normalize(balance);
        for account in &mut self.accounts {
            if account.username == username {
                account.balance = balance;
            }
        }
        Ok(())
    }
}

/// In-memory transaction ledger.
#[derive(Debug, Default)]
pub struct InMemoryTransactionStore {
    transactions: Vec<Transaction>,
}

impl InMemoryTransactionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[Transaction] {
        &self.transactions
    }
}

impl TransactionRepository for InMemoryTransactionStore {
    fn append(&mut self, transaction: &Transaction) -> Result<(), StorageError> {
        self.transactions.push(transaction.clone());
        Ok(())
    }

    fn history(&self, username: &str) -> Result<Vec<Transaction>, StorageError> {
        Ok(self
            .transactions
            .iter()
            .filter(|t| t.username == username)
            .cloned()
            .collect())
    }
}
