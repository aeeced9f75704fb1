// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication and authorization errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Authentication error type.
///
/// Every failure along the bearer-token path maps onto one variant. The
/// `Display` text is the human-readable description sent to clients; details
/// carried by the fetch and internal variants are only logged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// No authorization header present
    #[error("Authorization header is expected.")]
    MissingAuthHeader,
    /// Header scheme is not `Bearer`
    #[error("Authorization header must start with \"Bearer\".")]
    NotBearerScheme,
    /// `Bearer` with nothing after it
    #[error("Token not found.")]
    MissingToken,
    /// More than `Bearer <token>`
    #[error("Authorization header must be bearer token.")]
    TooManyParts,
    /// Token header is undecodable or has no `kid`
    #[error("Authorization malformed.")]
    MalformedToken,
    /// No key in the JWKS matches the token's `kid`
    #[error("Unable to find the appropriate key.")]
    NoMatchingKey,
    /// Token has expired
    #[error("Token expired.")]
    TokenExpired,
    /// Issuer or audience mismatch
    #[error("Incorrect claims. Please, check the audience and issuer.")]
    InvalidClaims,
    /// Signature, algorithm or payload failed verification
    #[error("Unable to parse authentication token.")]
    UnparsableToken,
    /// JWKS fetch failed
    #[error("Unable to parse authentication token.")]
    JwksFetchError(String),
    /// Internal error (unusable key material and the like)
    #[error("Unable to parse authentication token.")]
    InternalError(String),
    /// Token carries no `permissions` claim
    #[error("Permissions not included in JWT.")]
    PermissionsMissing,
    /// `permissions` claim lacks the required scope
    #[error("Permission not found.")]
    PermissionDenied,
}

#[derive(Serialize)]
struct AuthErrorBody {
    success: bool,
    error: u16,
    message: &'static str,
    description: String,
}

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingAuthHeader => "authorization_header_missing",
            AuthError::NotBearerScheme
            | AuthError::MissingToken
            | AuthError::TooManyParts
            | AuthError::MalformedToken
            | AuthError::NoMatchingKey
            | AuthError::UnparsableToken
            | AuthError::JwksFetchError(_)
            | AuthError::InternalError(_) => "invalid_header",
            AuthError::TokenExpired => "token_expired",
            AuthError::InvalidClaims | AuthError::PermissionsMissing => "invalid_claims",
            AuthError::PermissionDenied => "unauthorized",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingAuthHeader
            | AuthError::NotBearerScheme
            | AuthError::MissingToken
            | AuthError::TooManyParts
            | AuthError::MalformedToken
            | AuthError::NoMatchingKey
            | AuthError::TokenExpired
            | AuthError::InvalidClaims
            | AuthError::UnparsableToken => StatusCode::UNAUTHORIZED,
            AuthError::PermissionDenied => StatusCode::FORBIDDEN,
            AuthError::JwksFetchError(_)
            | AuthError::InternalError(_)
            | AuthError::PermissionsMissing => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match &self {
            AuthError::JwksFetchError(detail) | AuthError::InternalError(detail) => {
                tracing::warn!(error_code = self.error_code(), %detail, "Token verification failed");
            }
            _ => {
                tracing::info!(error_code = self.error_code(), "Request rejected: {self}");
            }
        }

        let status = self.status_code();
        let body = Json(AuthErrorBody {
            success: false,
            error: status.as_u16(),
            message: self.error_code(),
            description: self.to_string(),
        });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_of(error: AuthError) -> (StatusCode, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn missing_auth_returns_401() {
        let (status, body) = body_of(AuthError::MissingAuthHeader).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], 401);
        assert_eq!(body["message"], "authorization_header_missing");
        assert_eq!(body["description"], "Authorization header is expected.");
    }

    #[tokio::test]
    async fn permission_denied_returns_403() {
        let (status, body) = body_of(AuthError::PermissionDenied).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], 403);
        assert_eq!(body["message"], "unauthorized");
    }

    #[tokio::test]
    async fn missing_permissions_claim_returns_400() {
        let (status, body) = body_of(AuthError::PermissionsMissing).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "invalid_claims");
    }

    #[tokio::test]
    async fn fetch_failure_hides_detail() {
        let (status, body) =
            body_of(AuthError::JwksFetchError("connection refused".to_string())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "invalid_header");
        assert_eq!(body["description"], "Unable to parse authentication token.");
    }

    #[test]
    fn header_shape_errors_share_a_code() {
        for error in [
            AuthError::NotBearerScheme,
            AuthError::MissingToken,
            AuthError::TooManyParts,
            AuthError::MalformedToken,
            AuthError::NoMatchingKey,
        ] {
            assert_eq!(error.error_code(), "invalid_header");
            assert_eq!(error.status_code(), StatusCode::UNAUTHORIZED);
        }
    }
}
