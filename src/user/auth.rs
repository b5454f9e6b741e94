use log::debug;

use crate::storage::models::Account;
use crate::storage::{AccountRepository, StorageError};

/// Compares a supplied secret against the stored credential.
///
/// The shipped implementation is exact plaintext equality; a hashed scheme
/// can be swapped in without touching any caller.
pub trait CredentialVerifier {
    fn verify(&self, supplied: &str, stored: &str) -> bool;
}

/// Exact-match plaintext comparison.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlaintextVerifier;

impl CredentialVerifier for PlaintextVerifier {
    fn verify(&self, supplied: &str, stored: &str) -> bool {
        supplied == stored
    }
}

/// Linear scan of the accounts store. Any mismatch yields `None`, never an
/// error; callers must not reveal whether the username or the password was
/// wrong.
pub fn authenticate<A, V>(
    accounts: &A,
    verifier: &V,
    username: &str,
    password: &str,
) -> Result<Option<Account>, StorageError>
where
    A: AccountRepository,
    V: CredentialVerifier,
{
    match accounts.find(username)? {
        Some(account) if verifier.verify(password, &account.password) => {
            debug!("Authenticated {}", username);
            Ok(Some(account))
        }
        _ => Ok(None),
    }
}
