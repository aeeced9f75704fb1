// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

#![allow(dead_code)]

use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use coffee_shop_server::{
    api::router,
    auth::{JwksManager, TokenVerifier},
    state::AppState,
    storage::DrinkDatabase,
};
use jsonwebtoken::{encode, jwk::JwkSet, Algorithm, EncodingKey, Header};
use serde_json::{json, Value};
use tower::ServiceExt;

pub const ISSUER: &str = "https://coffee.example.com/";
pub const AUDIENCE: &str = "drinks";
pub const KID: &str = "test-key-1";

pub const ALL_PERMISSIONS: &[&str] = &[
    "get:drinks-detail",
    "post:drinks",
    "patch:drinks",
    "delete:drinks",
];

const SIGNING_KEY: &[u8] = include_bytes!("../fixtures/signing.pem");
const FIXTURE_JWKS: &str = include_str!("../fixtures/jwks.json");

/// A router over a fresh database. Keep the directory alive for the test.
pub struct TestApp {
    pub router: Router,
    pub db: std::sync::Arc<DrinkDatabase>,
    _dir: tempfile::TempDir,
}

pub fn app() -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let db = DrinkDatabase::open(&dir.path().join("drinks.redb")).unwrap();
    let jwks: JwkSet = serde_json::from_str(FIXTURE_JWKS).unwrap();
    let verifier = TokenVerifier::new(JwksManager::preloaded(jwks), ISSUER, AUDIENCE);
    let state = AppState::new(db, verifier);
    let db = state.db.clone();
    TestApp {
        router: router(state),
        db,
        _dir: dir,
    }
}

pub fn now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64
}

pub fn sign(claims: &Value) -> String {
    let mut header = Header::new(Algorithm::RS256);
    header.kid = Some(KID.to_string());
    encode(
        &header,
        claims,
        &EncodingKey::from_rsa_pem(SIGNING_KEY).unwrap(),
    )
    .unwrap()
}

pub fn token_with(permissions: &[&str]) -> String {
    sign(&json!({
        "iss": ISSUER,
        "sub": "auth0|manager",
        "aud": AUDIENCE,
        "iat": now(),
        "exp": now() + 3600,
        "permissions": permissions,
    }))
}

pub fn manager_token() -> String {
    token_with(ALL_PERMISSIONS)
}

pub fn expired_token() -> String {
    sign(&json!({
        "iss": ISSUER,
        "sub": "auth0|manager",
        "aud": AUDIENCE,
        "iat": now() - 7200,
        "exp": now() - 3600,
        "permissions": ALL_PERMISSIONS,
    }))
}

impl TestApp {
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }
}
