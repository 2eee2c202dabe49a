//! Input validation for registration and login.

use crate::error::{AccountError, AccountResult};

pub const MAX_USERNAME_LEN: usize = 80;
pub const MAX_NAME_LEN: usize = 100;
pub const MAX_EMAIL_LEN: usize = 100;
pub const MAX_PHONE_LEN: usize = 20;
pub const MAX_ADDRESS_LEN: usize = 255;

/// Unwrap a required field, rejecting absent or blank values.
pub fn require(field: &str, value: Option<String>) -> AccountResult<String> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(AccountError::validation(format!("{field} is required"))),
    }
}

/// Unwrap a password. Only absent or empty values are rejected; whitespace is
/// part of the secret.
pub fn require_password(value: Option<String>) -> AccountResult<String> {
    match value {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(AccountError::validation("password is required")),
    }
}

/// Treat blank optional strings as absent so they never take part in uniqueness.
pub fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

pub fn check_length(field: &str, value: &str, max: usize) -> AccountResult<()> {
    if value.chars().count() > max {
        return Err(AccountError::validation(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(())
}

pub fn check_optional_length(field: &str, value: Option<&str>, max: usize) -> AccountResult<()> {
    match value {
        Some(value) => check_length(field, value, max),
        None => Ok(()),
    }
}

/// Registration input as received, before any checks.
#[derive(Clone, Default)]
pub struct Registration {
    pub username: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("name", &self.name)
            .field("email", &self.email)
            .field("phone", &self.phone)
            .field("address", &self.address)
            .finish()
    }
}

/// Registration that passed [`Registration::validate`].
pub struct ValidRegistration {
    pub username: String,
    pub password: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl Registration {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            password: Some(password.into()),
            ..Self::default()
        }
    }

    pub fn validate(self) -> AccountResult<ValidRegistration> {
        let username = require("username", self.username)?;
        let password = require_password(self.password)?;
        let name = optional(self.name);
        let email = optional(self.email);
        let phone = optional(self.phone);
        let address = optional(self.address);

        check_length("username", &username, MAX_USERNAME_LEN)?;
        check_optional_length("name", name.as_deref(), MAX_NAME_LEN)?;
        check_optional_length("email", email.as_deref(), MAX_EMAIL_LEN)?;
        check_optional_length("phone", phone.as_deref(), MAX_PHONE_LEN)?;
        check_optional_length("address", address.as_deref(), MAX_ADDRESS_LEN)?;

        Ok(ValidRegistration {
            username,
            password,
            name,
            email,
            phone,
            address,
        })
    }
}
