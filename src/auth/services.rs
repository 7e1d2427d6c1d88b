use anyhow::Context;
use lazy_static::lazy_static;
use regex::Regex;
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::auth::{password, repo_types::User};

#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown username and wrong password both end up here.
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("authentication failed: {0}")]
    Internal(String),
}

#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("Username already registered")]
    UsernameTaken,
    #[error("Email already registered")]
    EmailTaken,
    #[error("Invalid email address")]
    InvalidEmail,
    #[error("{0}")]
    Invalid(&'static str),
    #[error("registration failed: {0}")]
    Internal(String),
}

/// Who is making the current request. Lives for one request only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: i64,
    pub username: String,
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

// Argon2 is CPU-bound; keep it off the async workers.
async fn blocking<T, F>(f: F) -> anyhow::Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> anyhow::Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .context("password hasher task")?
}

pub async fn authenticate(
    db: &SqlitePool,
    username: &str,
    plain_password: &str,
) -> Result<Identity, AuthError> {
    let user = User::find_by_username(db, username).await.map_err(|e| {
        error!(error = %e, "find_by_username failed");
        AuthError::Internal(e.to_string())
    })?;

    let plain = plain_password.to_owned();
    let Some(user) = user else {
        let _ = blocking(move || Ok(password::verify_dummy(&plain))).await;
        warn!(%username, "login unknown username");
        return Err(AuthError::InvalidCredentials);
    };

    let hash = user.password_hash.clone();
    let ok = blocking(move || password::verify_password(&plain, &hash))
        .await
        .map_err(|e| {
            error!(error = %e, user_id = user.id, "verify_password failed");
            AuthError::Internal(e.to_string())
        })?;

    if !ok {
        warn!(%username, user_id = user.id, "login invalid password");
        return Err(AuthError::InvalidCredentials);
    }

    debug!(user_id = user.id, "user authenticated");
    Ok(Identity {
        id: user.id,
        username: user.username,
    })
}

pub async fn register(
    db: &SqlitePool,
    username: &str,
    email: &str,
    plain_password: &str,
) -> Result<User, RegistrationError> {
    // Stored and compared exactly as submitted; emails compare case-insensitively
    // through the column collation.
    if User::find_by_username(db, username)
        .await
        .map_err(internal)?
        .is_some()
    {
        return Err(RegistrationError::UsernameTaken);
    }
    if User::find_by_email(db, email)
        .await
        .map_err(internal)?
        .is_some()
    {
        return Err(RegistrationError::EmailTaken);
    }
    if !is_valid_email(email) {
        return Err(RegistrationError::InvalidEmail);
    }
    if username.trim().is_empty() {
        return Err(RegistrationError::Invalid("Username must not be empty"));
    }
    if plain_password.is_empty() {
        return Err(RegistrationError::Invalid("Password must not be empty"));
    }

    let plain = plain_password.to_owned();
    let hash = blocking(move || password::hash_password(&plain))
        .await
        .map_err(|e| {
            error!(error = %e, "hash_password failed");
            RegistrationError::Internal(e.to_string())
        })?;

    User::create(db, username, email, &hash)
        .await
        .map_err(map_insert_error)
}

fn internal(e: sqlx::Error) -> RegistrationError {
    error!(error = %e, "user lookup failed");
    RegistrationError::Internal(e.to_string())
}

/// A lost race against a concurrent registration surfaces as a UNIQUE
/// violation; report it as the conflict it is.
fn map_insert_error(e: sqlx::Error) -> RegistrationError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            if let Some(conflict) = conflict_from_message(db_err.message()) {
                return conflict;
            }
        }
    }
    error!(error = %e, "create user failed");
    RegistrationError::Internal(e.to_string())
}

fn conflict_from_message(message: &str) -> Option<RegistrationError> {
    if message.contains("users.username") {
        Some(RegistrationError::UsernameTaken)
    } else if message.contains("users.email") {
        Some(RegistrationError::EmailTaken)
    } else {
        None
    }
}
