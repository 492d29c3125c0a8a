//! SQLite operations for account rows and their stored credentials.
//!
//! Generally clients should never call these methods directly, and prefer the [`AuthManagement`] and
//! [`AccountManagement`] trait methods implemented on the [`SqliteDatabase`] struct instead.
use log::debug;
use sqlx::SqliteConnection;

use crate::{
    db_types::{Account, AccountCredentials, NewAccount},
    traits::AuthApiError,
};

pub async fn insert_account(
    account: &NewAccount,
    digest: &str,
    salt: &str,
    conn: &mut SqliteConnection,
) -> Result<Account, AuthApiError> {
    let result: Result<Account, sqlx::Error> = sqlx::query_as(
        r#"
            INSERT INTO accounts (business_name, email, business_type, password_digest, password_salt)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, business_name, email, business_type, created_at, updated_at;
        "#,
    )
    .bind(&account.business_name)
    .bind(&account.email)
    .bind(&account.business_type)
    .bind(digest)
    .bind(salt)
    .fetch_one(conn)
    .await;
    match result {
        Ok(account) => {
            debug!("🧑️ Account [{}] registered with id {}", account.business_name, account.id);
            Ok(account)
        },
        Err(sqlx::Error::Database(de)) if de.is_unique_violation() => Err(AuthApiError::AccountAlreadyExists),
        Err(e) => Err(e.into()),
    }
}

pub async fn account_by_id(account_id: i64, conn: &mut SqliteConnection) -> Result<Option<Account>, sqlx::Error> {
    let account = sqlx::query_as(
        "SELECT id, business_name, email, business_type, created_at, updated_at FROM accounts WHERE id = $1",
    )
    .bind(account_id)
    .fetch_optional(conn)
    .await?;
    Ok(account)
}

pub async fn account_by_email(email: &str, conn: &mut SqliteConnection) -> Result<Option<Account>, sqlx::Error> {
    let account = sqlx::query_as(
        "SELECT id, business_name, email, business_type, created_at, updated_at FROM accounts WHERE email = $1",
    )
    .bind(email)
    .fetch_optional(conn)
    .await?;
    Ok(account)
}

/// Returns the account row including the credential digest and salt. Auth flow use only.
pub async fn credentials_by_email(
    email: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<AccountCredentials>, AuthApiError> {
    let creds = sqlx::query_as("SELECT * FROM accounts WHERE email = $1").bind(email).fetch_optional(conn).await?;
    Ok(creds)
}
