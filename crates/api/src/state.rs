use accounts_auth::Authenticator;

use crate::ApiError;

#[derive(Clone)]
pub struct AppState {
    authenticator: Authenticator,
}

impl AppState {
    pub fn new(authenticator: Authenticator) -> Self {
        Self { authenticator }
    }

    pub fn authenticator(&self) -> &Authenticator {
        &self.authenticator
    }

    /// Resolve a bearer token to the id of the user it was issued for.
    pub fn authenticate(&self, token: &str) -> Result<i64, ApiError> {
        self.authenticator
            .authenticate_token(token)
            .map_err(ApiError::from)
    }
}
