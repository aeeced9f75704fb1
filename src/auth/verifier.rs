// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bearer token parsing and JWT verification against the JWKS.

use axum::http::HeaderValue;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, decode_header, Algorithm, Validation};

use super::claims::ClaimSet;
use super::{AuthError, DecodedToken, JwksManager};

/// Pull the token out of an `Authorization: Bearer <token>` header value.
///
/// The scheme is matched case-insensitively and parts are split on
/// whitespace, so exactly two parts are accepted.
pub fn bearer_token(authorization: Option<&HeaderValue>) -> Result<&str, AuthError> {
    let value = authorization
        .ok_or(AuthError::MissingAuthHeader)?
        .to_str()
        .map_err(|_| AuthError::NotBearerScheme)?;

    let mut parts = value.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), _, _) if !scheme.eq_ignore_ascii_case("bearer") => {
            Err(AuthError::NotBearerScheme)
        }
        (None, _, _) => Err(AuthError::NotBearerScheme),
        (Some(_), None, _) => Err(AuthError::MissingToken),
        (Some(_), Some(token), None) => Ok(token),
        (Some(_), Some(_), Some(_)) => Err(AuthError::TooManyParts),
    }
}

/// Verifies RS256 access tokens issued by the identity provider.
///
/// Cheap to clone; the JWKS cache is shared between clones.
#[derive(Clone)]
pub struct TokenVerifier {
    jwks: JwksManager,
    issuer: String,
    audience: String,
    leeway: u64,
}

impl TokenVerifier {
    /// # Arguments
    /// - `jwks`: source of signing keys
    /// - `issuer`: expected `iss`, e.g. `https://coffee.example.com/`
    /// - `audience`: expected `aud`, the API identifier
    pub fn new(jwks: JwksManager, issuer: impl Into<String>, audience: impl Into<String>) -> Self {
        Self {
            jwks,
            issuer: issuer.into(),
            audience: audience.into(),
            leeway: 0,
        }
    }

    /// Clock skew tolerance in seconds for `exp`.
    pub fn with_leeway(mut self, leeway_secs: u64) -> Self {
        self.leeway = leeway_secs;
        self
    }

    pub fn jwks(&self) -> &JwksManager {
        &self.jwks
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn audience(&self) -> &str {
        &self.audience
    }

    /// Verify the raw `Authorization` header value.
    pub async fn verify(
        &self,
        authorization: Option<&HeaderValue>,
    ) -> Result<DecodedToken, AuthError> {
        let token = bearer_token(authorization)?;
        self.verify_token(token).await
    }

    /// Verify a bare token: signature, algorithm, issuer, audience and expiry.
    pub async fn verify_token(&self, token: &str) -> Result<DecodedToken, AuthError> {
        let header = decode_header(token).map_err(|_| AuthError::MalformedToken)?;
        let kid = header.kid.ok_or(AuthError::MalformedToken)?;

        let decoding_key = self.jwks.get_decoding_key(&kid).await?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);
        validation.set_required_spec_claims(&["exp", "iss", "aud"]);
        validation.leeway = self.leeway;

        let token_data =
            decode::<ClaimSet>(token, &decoding_key, &validation).map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                ErrorKind::InvalidIssuer | ErrorKind::InvalidAudience => AuthError::InvalidClaims,
                ErrorKind::MissingRequiredClaim(claim) if claim == "iss" || claim == "aud" => {
                    AuthError::InvalidClaims
                }
                _ => AuthError::UnparsableToken,
            })?;

        Ok(DecodedToken::from_verified(token_data.claims))
    }
}
