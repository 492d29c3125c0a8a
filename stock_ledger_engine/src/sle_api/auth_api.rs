//! Account registration and credential verification.
//!
//! Token issuance, sessions and transport-level authentication are collaborator concerns; this API
//! only answers "who is this?". A successful login yields the account, nothing more.
use std::fmt::Debug;

use log::debug;
use sle_common::Secret;

use crate::{
    db_types::{Account, NewAccount},
    helpers::{credential_digest, random_salt},
    traits::{AuthApiError, AuthManagement},
};

pub struct AuthApi<B> {
    db: B,
}

impl<B: Debug> Debug for AuthApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AuthApi ({:?})", self.db)
    }
}

impl<B> AuthApi<B>
where B: AuthManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    /// Registers a new business account. All fields are required; the business name and email must
    /// not already be registered. The password is stored as a salted digest only.
    pub async fn create_account(&self, account: NewAccount) -> Result<Account, AuthApiError> {
        let required = [
            ("business_name", &account.business_name),
            ("email", &account.email),
            ("business_type", &account.business_type),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(AuthApiError::ValidationError(format!("Field '{field}' is required")));
            }
        }
        if account.password.reveal().is_empty() {
            return Err(AuthApiError::ValidationError("Field 'password' is required".to_string()));
        }
        let salt = random_salt();
        let digest = credential_digest(account.password.reveal(), &salt);
        let created = self.db.create_account_with_credentials(&account, &digest, &salt).await?;
        debug!("🧑️ Account #{} registered for [{}]", created.id, created.business_name);
        Ok(created)
    }

    /// Verifies the email/password pair and returns the matching account.
    ///
    /// An unknown email and a wrong password both report [`AuthApiError::InvalidCredentials`], so a
    /// caller cannot probe which of the two was wrong.
    pub async fn authenticate(&self, email: &str, password: &Secret<String>) -> Result<Account, AuthApiError> {
        let creds =
            self.db.fetch_credentials_by_email(email).await?.ok_or(AuthApiError::InvalidCredentials)?;
        let digest = credential_digest(password.reveal(), &creds.password_salt);
        if digest != creds.password_digest {
            return Err(AuthApiError::InvalidCredentials);
        }
        Ok(creds.into_account())
    }
}
