// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractor for the verified token.
//!
//! Use `Verified` as the first argument of a handler behind a
//! [`PermissionGuard`](super::PermissionGuard):
//!
//! ```rust,ignore
//! async fn my_handler(Verified(token): Verified) -> impl IntoResponse {
//!     // token is the DecodedToken the guard produced
//! }
//! ```

use axum::{extract::FromRequestParts, http::request::Parts};

use super::{AuthError, DecodedToken};

/// Extractor for the claims of an authorized request.
///
/// It never verifies anything itself; it only hands over what the guard
/// middleware stored. On an unguarded route it rejects as if no credentials
/// were sent.
pub struct Verified(pub DecodedToken);

impl<S> FromRequestParts<S> for Verified
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<DecodedToken>()
            .cloned()
            .map(Verified)
            .ok_or(AuthError::MissingAuthHeader)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::claims::test_token;
    use axum::http::Request;

    fn parts() -> Parts {
        Request::builder()
            .uri("/test")
            .body(())
            .unwrap()
            .into_parts()
            .0
    }

    #[tokio::test]
    async fn takes_token_from_extensions() {
        let mut parts = parts();
        parts
            .extensions
            .insert(test_token(Some(&["patch:drinks"])));

        let Verified(token) = Verified::from_request_parts(&mut parts, &()).await.unwrap();
        assert!(token.has_permission("patch:drinks"));
    }

    #[tokio::test]
    async fn unguarded_route_is_rejected() {
        let mut parts = parts();
        let result = Verified::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AuthError::MissingAuthHeader)));
    }
}
