use chrono::Local;
use rust_decimal::Decimal;

use crate::account::amount::normalize;

/// Timestamp format used in the transactions file
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Transaction type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionKind {
    Deposit,
    Withdraw,
    TransferOut,
    TransferIn,
}

impl TransactionKind {
    pub fn as_str(&self) -> &str {
        match self {
            TransactionKind::Deposit => "DEPOSIT",
            TransactionKind::Withdraw => "WITHDRAW",
            TransactionKind::TransferOut => "TRANSFER OUT",
            TransactionKind::TransferIn => "TRANSFER IN",
        }
    }

    pub fn from_str(s: &str) -> Result<Self, String> {
        match s {
            "DEPOSIT" => Ok(TransactionKind::Deposit),
            "WITHDRAW" => Ok(TransactionKind::Withdraw),
            "TRANSFER OUT" => Ok(TransactionKind::TransferOut),
            "TRANSFER IN" => Ok(TransactionKind::TransferIn),
            _ => Err(format!("Invalid transaction type: {}", s)),
        }
    }
}

/// Account model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub username: String,
    pub password: String,
    pub balance: Decimal,
}

impl Account {
    pub fn new(username: String, password: String) -> Self {
        Self {
            username,
            password,
            balance: Decimal::new(0, 2),
        }
    }
}

/// One row of the transaction ledger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub username: String,
    /// Formatted with [`DATE_FORMAT`]; displayed as stored.
    pub date: String,
    pub kind: TransactionKind,
    pub amount: Decimal,
    /// Balance of the acting account after the operation.
    pub balance: Decimal,
    pub details: String,
}

impl Transaction {
    /// Build a ledger row stamped with the current local time.
    pub fn record(
        username: &str,
        kind: TransactionKind,
        amount: Decimal,
        balance: Decimal,
        details: &str,
    ) -> Self {
        Self {
            username: username.to_string(),
            date: Local::now().format(DATE_FORMAT).to_string(),
            kind,
            amount: normalize(amount),
            balance: normalize(balance),
            details: details.to_string(),
        }
    }
}
