// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Permission-guard middleware for Axum.
//!
//! Each protected route is wrapped with a guard bound to one permission
//! scope when the router is built:
//!
//! ```rust,ignore
//! let guard = verifier.require(Permission::PostDrinks);
//!
//! let app = Router::new().route(
//!     "/drinks",
//!     post(create_drink).route_layer(from_fn_with_state(guard, require_permission)),
//! );
//! ```
//!
//! Per request the guard walks `NoToken → HeaderExtracted → SignatureVerified
//! → PermissionChecked → Authorized`; any step may end in a rejection, which
//! is rendered by [`AuthError`]'s `IntoResponse`. On success the
//! [`DecodedToken`] is stored in the request extensions for the
//! [`Verified`](super::Verified) extractor.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};

use super::permissions::check_permission;
use super::verifier::bearer_token;
use super::{AuthError, DecodedToken, Permission, TokenVerifier};

/// Route-level authorization state: a verifier plus the scope it enforces.
#[derive(Clone)]
pub struct PermissionGuard {
    verifier: TokenVerifier,
    permission: Permission,
}

impl PermissionGuard {
    pub fn new(verifier: TokenVerifier, permission: Permission) -> Self {
        Self {
            verifier,
            permission,
        }
    }

    pub fn permission(&self) -> Permission {
        self.permission
    }

    /// Authenticate the request headers and enforce the bound permission.
    #[tracing::instrument(name = "authorize", skip_all, fields(permission = %self.permission))]
    pub async fn authorize(&self, headers: &HeaderMap) -> Result<DecodedToken, AuthError> {
        let token = bearer_token(headers.get(AUTHORIZATION))?;
        tracing::debug!("Bearer token extracted");

        let decoded = self.verifier.verify_token(token).await?;
        tracing::debug!(sub = decoded.subject(), "Token signature verified");

        check_permission(self.permission.as_str(), &decoded)?;
        tracing::debug!(sub = decoded.subject(), "Permission granted");

        Ok(decoded)
    }
}

impl TokenVerifier {
    /// Build a guard enforcing `permission` with this verifier.
    pub fn require(&self, permission: Permission) -> PermissionGuard {
        PermissionGuard::new(self.clone(), permission)
    }
}

/// Authentication middleware function.
pub async fn require_permission(
    State(guard): State<PermissionGuard>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token = guard.authorize(request.headers()).await?;
    request.extensions_mut().insert(token);
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::verifier::test_support::{claims, sign, verifier};
    use crate::auth::Verified;
    use axum::{
        body::{to_bytes, Body},
        http::StatusCode,
        middleware::from_fn_with_state,
        routing::get,
        Router,
    };
    use tower::ServiceExt;

    fn app() -> Router {
        let guard = verifier().require(Permission::GetDrinksDetail);
        Router::new().route(
            "/secret",
            get(|Verified(token): Verified| async move {
                token.subject().unwrap_or_default().to_string()
            })
            .route_layer(from_fn_with_state(guard, require_permission)),
        )
    }

    async fn call(authorization: Option<String>) -> (StatusCode, String) {
        let mut request = Request::builder().uri("/secret");
        if let Some(value) = authorization {
            request = request.header(AUTHORIZATION, value);
        }
        let response = app()
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[test]
    fn guard_remembers_its_permission() {
        let guard = verifier().require(Permission::DeleteDrinks);
        assert_eq!(guard.permission(), Permission::DeleteDrinks);
    }

    #[tokio::test]
    async fn missing_header_is_rejected() {
        let (status, body) = call(None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.contains("authorization_header_missing"));
    }

    #[tokio::test]
    async fn granted_permission_reaches_handler_with_claims() {
        let token = sign(&claims(&["get:drinks-detail"]));
        let (status, body) = call(Some(format!("Bearer {token}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "auth0|barista");
    }

    #[tokio::test]
    async fn missing_scope_is_forbidden() {
        let token = sign(&claims(&["post:drinks"]));
        let (status, body) = call(Some(format!("Bearer {token}"))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert!(body.contains("unauthorized"));
    }

    #[tokio::test]
    async fn missing_permissions_claim_is_bad_request() {
        let mut claims = claims(&[]);
        claims.as_object_mut().unwrap().remove("permissions");
        let (status, body) = call(Some(format!("Bearer {}", sign(&claims)))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("invalid_claims"));
    }
}
