// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Verified JWT claims.

use serde::Deserialize;
use serde_json::{Map, Value};

/// Audience claim, either a single identifier or a list.
///
/// Access tokens minted for an API plus the `/userinfo` endpoint carry a list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Audience {
    One(String),
    Many(Vec<String>),
}

impl Audience {
    pub fn as_slice(&self) -> &[String] {
        match self {
            Audience::One(aud) => std::slice::from_ref(aud),
            Audience::Many(auds) => auds,
        }
    }

    pub fn contains(&self, audience: &str) -> bool {
        self.as_slice().iter().any(|a| a == audience)
    }
}

/// Claim set as it is deserialized from a token payload.
///
/// Only the verifier decodes into this type; everything else sees
/// [`DecodedToken`].
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ClaimSet {
    /// Issuer (`https://<domain>/`). Presence is enforced by validation.
    #[serde(default)]
    pub iss: Option<String>,

    /// Subject (user or client identifier)
    #[serde(default)]
    pub sub: Option<String>,

    /// Audience (API identifier). Presence is enforced by validation.
    #[serde(default)]
    pub aud: Option<Audience>,

    /// Expiration timestamp
    pub exp: i64,

    /// Issued at timestamp
    #[serde(default)]
    pub iat: Option<i64>,

    /// Permission scopes granted by the identity provider's RBAC
    #[serde(default)]
    pub permissions: Option<Vec<String>>,

    /// Every other claim, untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The verified claim set of a bearer token.
///
/// Produced only by [`TokenVerifier`](super::TokenVerifier) after signature
/// and standard-claim validation succeed. It has no public constructor and no
/// setters, and lives in the request extensions for the duration of a single
/// request.
#[derive(Debug, Clone)]
pub struct DecodedToken {
    claims: ClaimSet,
}

impl DecodedToken {
    pub(crate) fn from_verified(claims: ClaimSet) -> Self {
        Self { claims }
    }

    pub fn issuer(&self) -> &str {
        self.claims.iss.as_deref().unwrap_or_default()
    }

    pub fn subject(&self) -> Option<&str> {
        self.claims.sub.as_deref()
    }

    /// Audiences the token was issued for.
    pub fn audience(&self) -> &[String] {
        self.claims
            .aud
            .as_ref()
            .map(Audience::as_slice)
            .unwrap_or_default()
    }

    /// Expiry as a Unix timestamp.
    pub fn expires_at(&self) -> i64 {
        self.claims.exp
    }

    pub fn issued_at(&self) -> Option<i64> {
        self.claims.iat
    }

    /// The `permissions` claim, `None` when the token carries none at all.
    pub fn permissions(&self) -> Option<&[String]> {
        self.claims.permissions.as_deref()
    }

    /// Exact membership test against the `permissions` claim.
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions()
            .is_some_and(|granted| granted.iter().any(|p| p == permission))
    }

    /// Look up any claim not modelled above by name.
    pub fn claim(&self, name: &str) -> Option<&Value> {
        self.claims.extra.get(name)
    }
}

#[cfg(test)]
pub(crate) fn test_token(permissions: Option<&[&str]>) -> DecodedToken {
    let mut payload = serde_json::json!({
        "iss": "https://coffee.example.com/",
        "sub": "auth0|barista",
        "aud": ["drinks", "https://coffee.example.com/userinfo"],
        "exp": 4102444800_i64,
        "iat": 1700000000,
        "azp": "spa-client",
    });
    if let Some(permissions) = permissions {
        payload["permissions"] = serde_json::json!(permissions);
    }
    DecodedToken::from_verified(serde_json::from_value(payload).unwrap())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_expose_standard_claims() {
        let token = test_token(Some(&["get:drinks-detail"]));
        assert_eq!(token.issuer(), "https://coffee.example.com/");
        assert_eq!(token.subject(), Some("auth0|barista"));
        assert!(token.audience().iter().any(|a| a == "drinks"));
        assert_eq!(token.expires_at(), 4102444800);
        assert_eq!(token.issued_at(), Some(1700000000));
    }

    #[test]
    fn unmodelled_claims_are_kept() {
        let token = test_token(None);
        assert_eq!(token.claim("azp"), Some(&Value::from("spa-client")));
        assert_eq!(token.claim("nope"), None);
    }

    #[test]
    fn single_audience_deserializes() {
        let claims: ClaimSet = serde_json::from_value(serde_json::json!({
            "iss": "https://coffee.example.com/",
            "aud": "drinks",
            "exp": 1,
        }))
        .unwrap();
        assert_eq!(
            claims.aud.as_ref().map(Audience::as_slice),
            Some(["drinks".to_string()].as_slice())
        );
        assert!(claims.permissions.is_none());
    }

    #[test]
    fn absent_issuer_and_audience_still_deserialize() {
        let claims: ClaimSet = serde_json::from_value(serde_json::json!({"exp": 1})).unwrap();
        assert!(claims.iss.is_none());
        assert!(claims.aud.is_none());
    }

    #[test]
    fn permission_membership_is_exact() {
        let token = test_token(Some(&["post:drinks"]));
        assert!(token.has_permission("post:drinks"));
        assert!(!token.has_permission("post:drink"));
        assert!(!token.has_permission("POST:DRINKS"));

        let empty = test_token(None);
        assert!(!empty.has_permission("post:drinks"));
        assert!(empty.permissions().is_none());
    }
}
