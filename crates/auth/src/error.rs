use accounts_database::{StoreError, UniqueField};
use thiserror::Error;

use crate::token::TokenError;

/// Why a caller could not be authenticated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthFailure {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error(transparent)]
    Token(#[from] TokenError),
}

#[derive(Debug, Error)]
pub enum AccountError {
    #[error("{0}")]
    Validation(String),
    #[error("{}", conflict_message(.0))]
    Conflict(Option<UniqueField>),
    #[error("{0}")]
    Unauthenticated(#[from] AuthFailure),
    #[error("user not found")]
    NotFound,
    #[error("store error: {0}")]
    Store(StoreError),
    #[error("password hashing failed: {0}")]
    PasswordHash(argon2::password_hash::Error),
    #[error("token issuance failed: {0}")]
    TokenIssue(#[from] jsonwebtoken::errors::Error),
}

pub type AccountResult<T> = Result<T, AccountError>;

fn conflict_message(field: &Option<UniqueField>) -> String {
    match field {
        Some(field) => format!("{field} already exists"),
        None => "account already exists".to_string(),
    }
}

impl AccountError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

impl From<StoreError> for AccountError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(field) => AccountError::Conflict(field),
            other => AccountError::Store(other),
        }
    }
}

impl From<TokenError> for AccountError {
    fn from(err: TokenError) -> Self {
        AccountError::Unauthenticated(AuthFailure::Token(err))
    }
}

impl From<argon2::password_hash::Error> for AccountError {
    fn from(err: argon2::password_hash::Error) -> Self {
        AccountError::PasswordHash(err)
    }
}
