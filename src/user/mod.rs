// User management module
// Registration and credential-based login against the accounts store.

mod auth;
mod registration;

pub use auth::{authenticate, CredentialVerifier, PlaintextVerifier};
pub use registration::{register_user, RegistrationError};
