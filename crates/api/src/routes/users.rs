use accounts_database::User;
use axum::{extract::State, http::HeaderMap, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{util::require_bearer, ApiError, AppState};

/// Non-secret account fields. Absent values serialize as `null`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProfileResponse {
    pub id: i64,
    pub username: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl From<User> for ProfileResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            name: user.name,
            email: user.email,
            phone: user.phone,
            address: user.address,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/profile",
    tag = "Users",
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Profile of the token holder", body = ProfileResponse),
        (status = 401, description = "Missing, invalid or expired token", body = crate::error::ErrorResponse),
        (status = 404, description = "Account no longer exists", body = crate::error::ErrorResponse)
    )
)]
pub async fn profile(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ProfileResponse>, ApiError> {
    let token = require_bearer(&headers)?;
    let user_id = state.authenticate(&token)?;
    let user = state.authenticator().profile(user_id).await?;

    Ok(Json(user.into()))
}
