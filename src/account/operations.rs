use log::debug;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::account::amount::normalize;
use crate::storage::models::{Transaction, TransactionKind};
use crate::storage::{AccountRepository, StorageError, TransactionRepository};

/// Money movement errors
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("Insufficient balance.")]
    InsufficientFunds,

    #[error("You cannot transfer to yourself.")]
    SelfTransfer,

    #[error("Recipient does not exist.")]
    UnknownRecipient,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Outcome of a completed deposit or withdrawal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Receipt {
    pub amount: Decimal,
    pub balance: Decimal,
}

/// Outcome of a completed transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferReceipt {
    pub amount: Decimal,
    pub sender_balance: Decimal,
    pub recipient_balance: Decimal,
}

/// Banking operations over injected account and transaction stores.
pub struct Bank<A, T> {
    accounts: A,
    transactions: T,
}

impl<A, T> Bank<A, T>
where
    A: AccountRepository,
    T: TransactionRepository,
{
    pub fn new(accounts: A, transactions: T) -> Self {
        Self {
            accounts,
            transactions,
        }
    }

    pub fn accounts(&self) -> &A {
        &self.accounts
    }

    pub fn accounts_mut(&mut self) -> &mut A {
        &mut self.accounts
    }

    /// Credit the account and append one DEPOSIT row. Always succeeds for a
    /// validated amount.
    pub fn deposit(&mut self, username: &str, amount: Decimal) -> Result<Receipt, OperationError> {
        let amount = normalize(amount);
        let balance = self.accounts.balance_of(username)? + amount;
        self.accounts.set_balance(username, balance)?;
        self.transactions.append(&Transaction::record(
            username,
            TransactionKind::Deposit,
            amount,
            balance,
            "Cash deposit",
        ))?;
        debug!("Deposited {} for {}", amount, username);
        Ok(Receipt { amount, balance })
    }

    /// Debit the account and append one WITHDRAW row. On insufficient funds
    /// the balance is untouched and nothing is appended.
    pub fn withdraw(&mut self, username: &str, amount: Decimal) -> Result<Receipt, OperationError> {
        let amount = normalize(amount);
        let balance = self.accounts.balance_of(username)?;
        if amount > balance {
            return Err(OperationError::InsufficientFunds);
        }

        let balance = balance - amount;
        self.accounts.set_balance(username, balance)?;
        self.transactions.append(&Transaction::record(
            username,
            TransactionKind::Withdraw,
            amount,
            balance,
            "Cash withdrawal",
        ))?;
        debug!("Withdrew {} for {}", amount, username);
        Ok(Receipt { amount, balance })
    }

    /// Move money between two accounts. The debit and the credit are two
    /// independent ledger writes with no rollback in between; both balances
    /// are read once, before the first write.
    pub fn transfer(
        &mut self,
        sender: &str,
        recipient: &str,
        amount: Decimal,
    ) -> Result<TransferReceipt, OperationError> {
        if recipient == sender {
            return Err(OperationError::SelfTransfer);
        }
        if !self.accounts.exists(recipient)? {
            return Err(OperationError::UnknownRecipient);
        }

        let amount = normalize(amount);
        let sender_balance = self.accounts.balance_of(sender)?;
        if amount > sender_balance {
            return Err(OperationError::InsufficientFunds);
        }
        let recipient_balance = self.accounts.balance_of(recipient)?;

        let sender_balance = sender_balance - amount;
        let recipient_balance = recipient_balance + amount;
        self.accounts.set_balance(sender, sender_balance)?;
        self.accounts.set_balance(recipient, recipient_balance)?;

        self.transactions.append(&Transaction::record(
            sender,
            TransactionKind::TransferOut,
            amount,
            sender_balance,
            &format!("To {}", recipient),
        ))?;
        self.transactions.append(&Transaction::record(
            recipient,
            TransactionKind::TransferIn,
            amount,
            recipient_balance,
            &format!("From {}", sender),
        ))?;

        debug!("Transferred {} from {} to {}", amount, sender, recipient);
        Ok(TransferReceipt {
            amount,
            sender_balance,
            recipient_balance,
        })
    }

    /// Current balance, 0.00 for a missing account.
    pub fn balance(&self, username: &str) -> Result<Decimal, StorageError> {
        self.accounts.balance_of(username)
    }

    /// Ledger rows for the account, in append order.
    pub fn history(&self, username: &str) -> Result<Vec<Transaction>, StorageError> {
        self.transactions.history(username)
    }
}
