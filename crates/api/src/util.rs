use axum::http::{header::AUTHORIZATION, HeaderMap};

use crate::ApiError;

/// Pull the token out of an `Authorization: Bearer <token>` header.
pub fn require_bearer(headers: &HeaderMap) -> Result<String, ApiError> {
    let value = headers
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .ok_or_else(|| ApiError::unauthorized("missing authorization header"))?;

    let mut parts = value.split_whitespace();
    let scheme = parts.next().unwrap_or("");
    if !scheme.eq_ignore_ascii_case("Bearer") {
        return Err(ApiError::unauthorized("invalid authorization scheme"));
    }

    let token = parts.next().unwrap_or("");
    if token.is_empty() {
        return Err(ApiError::unauthorized("missing bearer token"));
    }

    if parts.next().is_some() {
        return Err(ApiError::unauthorized("malformed authorization header"));
    }

    Ok(token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderValue, StatusCode};

    #[test]
    fn require_bearer_extracts_token_case_insensitive() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("bearer abc.def.ghi"));

        let token = require_bearer(&headers).expect("token should be extracted");
        assert_eq!(token, "abc.def.ghi");
    }

    #[test]
    fn require_bearer_rejects_missing_header() {
        let error = require_bearer(&HeaderMap::new()).expect_err("header is required");
        assert_eq!(error.status, StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn require_bearer_rejects_other_schemes() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic YWxpY2U6cHcx"));

        let error = require_bearer(&headers).expect_err("basic auth is not accepted");
        assert_eq!(error.status, StatusCode::UNAUTHORIZED);
        assert!(error.message.contains("scheme"));
    }

    #[test]
    fn require_bearer_rejects_missing_token() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer"));

        let error = require_bearer(&headers).expect_err("should reject missing token");
        assert_eq!(error.status, StatusCode::UNAUTHORIZED);
        assert!(error.message.contains("missing bearer token"));
    }

    #[test]
    fn require_bearer_rejects_trailing_parts() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer tok extra"));

        let error = require_bearer(&headers).expect_err("extra parts are not a token");
        assert_eq!(error.status, StatusCode::UNAUTHORIZED);
        assert!(error.message.contains("malformed"));
    }
}
