use thiserror::Error;

use crate::db_types::{Account, AccountCredentials, NewAccount};

/// The `AuthManagement` trait defines the storage behaviour behind account registration and login.
///
/// Credential *policy* (digest scheme, salting) lives in the API layer; backends only store and
/// retrieve the opaque digest and salt strings. Token issuance and transport-level authentication are
/// collaborator concerns and do not appear here at all.
#[allow(async_fn_in_trait)]
pub trait AuthManagement {
    /// Creates a new account with the given credential digest and salt. Fails with
    /// [`AuthApiError::AccountAlreadyExists`] if the business name or email is already registered.
    async fn create_account_with_credentials(
        &self,
        account: &NewAccount,
        digest: &str,
        salt: &str,
    ) -> Result<Account, AuthApiError>;

    /// Fetches the account row and its stored credentials for the given email, if any.
    async fn fetch_credentials_by_email(&self, email: &str) -> Result<Option<AccountCredentials>, AuthApiError>;
}

#[derive(Debug, Clone, Error)]
pub enum AuthApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Invalid signup request: {0}")]
    ValidationError(String),
    #[error("Business name or email already exists")]
    AccountAlreadyExists,
    #[error("Invalid email or password")]
    InvalidCredentials,
}

impl From<sqlx::Error> for AuthApiError {
    fn from(e: sqlx::Error) -> Self {
        AuthApiError::DatabaseError(e.to_string())
    }
}
