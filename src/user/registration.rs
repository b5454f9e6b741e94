use log::{debug, info};
use thiserror::Error;

use crate::storage::models::Account;
use crate::storage::{AccountRepository, StorageError};

/// User registration error types
#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("Username cannot be empty.")]
    EmptyUsername,

    #[error("Password cannot be empty.")]
    EmptyPassword,

    #[error("Username already exists. Please choose another.")]
    DuplicateUsername,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Register a new account with a zero balance. Credentials are trimmed
/// before validation; usernames are case-sensitive and unique.
pub fn register_user<A: AccountRepository>(
    accounts: &mut A,
    username: &str,
    password: &str,
) -> Result<Account, RegistrationError> {
    debug!("Registering new user");

    let username = username.trim();
    if username.is_empty() {
        return Err(RegistrationError::EmptyUsername);
    }
    let password = password.trim();
    if password.is_empty() {
        return Err(RegistrationError::EmptyPassword);
    }
    if accounts.exists(username)? {
        return Err(RegistrationError::DuplicateUsername);
    }

    let account = Account::new(username.to_string(), password.to_string());
    accounts.create(&account)?;

    info!("Account created for {}", username);
    Ok(account)
}
