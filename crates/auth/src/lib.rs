use accounts_config::AuthConfig;
use accounts_database::{NewUser, SqlitePool, User, UserRepository};
use tracing::{debug, info, warn};

mod error;
pub mod password;
pub mod token;
pub mod validation;

pub use error::{AccountError, AccountResult, AuthFailure};
pub use token::{Claims, TokenError, TokenIssuer};
pub use validation::Registration;

#[derive(Clone)]
pub struct Authenticator {
    users: UserRepository,
    tokens: TokenIssuer,
}

impl Authenticator {
    pub fn new(pool: SqlitePool, config: &AuthConfig) -> Self {
        Self {
            users: UserRepository::new(pool),
            tokens: TokenIssuer::from_config(config),
        }
    }

    pub fn tokens(&self) -> &TokenIssuer {
        &self.tokens
    }

    /// Create an account. Duplicate username, email or phone is reported by
    /// the store as a conflict on that field.
    pub async fn register(&self, registration: Registration) -> AccountResult<User> {
        let registration = registration.validate()?;
        let password_hash = password::hash_password(&registration.password)?;

        let new_user = NewUser {
            username: registration.username,
            password_hash,
            name: registration.name,
            email: registration.email,
            phone: registration.phone,
            address: registration.address,
        };

        let user = self.users.create(&new_user).await.map_err(|err| {
            debug!(error = %err, "registration rejected by store");
            AccountError::from(err)
        })?;

        info!(user_id = user.id, username = %user.username, "registered user");
        Ok(user)
    }

    /// Check credentials and issue a bearer token.
    pub async fn login(&self, username: &str, password: &str) -> AccountResult<String> {
        let Some(user) = self.users.find_by_username(username).await? else {
            debug!(username, "login for unknown username");
            return Err(AccountError::NotFound);
        };

        if !password::verify_password(password, &user.password_hash) {
            warn!(user_id = user.id, "login with wrong password");
            return Err(AuthFailure::InvalidCredentials.into());
        }

        let token = self.tokens.issue(user.id)?;
        info!(user_id = user.id, "issued token");
        Ok(token)
    }

    /// Resolve a bearer token to the user id it was issued for.
    pub fn authenticate_token(&self, token: &str) -> AccountResult<i64> {
        Ok(self.tokens.validate(token)?)
    }

    pub async fn profile(&self, user_id: i64) -> AccountResult<User> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(AccountError::NotFound)
    }
}
