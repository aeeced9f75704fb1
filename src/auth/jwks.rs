// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWKS (JSON Web Key Set) fetching and caching.
//!
//! ## Behaviour
//!
//! - Keys are fetched from `https://<domain>/.well-known/jwks.json`
//! - Keys are cached with a configurable TTL; a TTL of zero refetches on
//!   every verification
//! - A token signed with an unknown `kid` forces one refresh, at most once per
//!   [`MIN_FORCED_REFRESH_INTERVAL`], so rotated keys are picked up early
//! - Fetch failures are never papered over with stale keys

use std::sync::Arc;
use std::time::{Duration, Instant};

use jsonwebtoken::jwk::{AlgorithmParameters, Jwk, JwkSet};
use jsonwebtoken::DecodingKey;
use tokio::sync::RwLock;

use super::error::AuthError;

/// Default JWKS cache TTL (5 minutes).
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

/// Minimum age of the cached set before an unknown `kid` may trigger a refetch.
const MIN_FORCED_REFRESH_INTERVAL: Duration = Duration::from_secs(30);

/// JWKS cache entry.
struct CacheEntry {
    jwks: JwkSet,
    fetched_at: Instant,
}

/// JWKS manager with caching.
#[derive(Clone)]
pub struct JwksManager {
    /// JWKS URL, `None` for a preloaded key set
    jwks_url: Option<String>,
    /// Cache TTL
    cache_ttl: Duration,
    /// Cached JWKS
    cache: Arc<RwLock<Option<CacheEntry>>>,
    /// HTTP client
    client: reqwest::Client,
}

impl JwksManager {
    /// Create a JWKS manager that fetches from `jwks_url`.
    pub fn new(jwks_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            jwks_url: Some(jwks_url.into()),
            cache_ttl: DEFAULT_CACHE_TTL,
            cache: Arc::new(RwLock::new(None)),
            client: reqwest::Client::builder().timeout(timeout).build()?,
        })
    }

    /// Create a manager serving a fixed key set that never expires.
    ///
    /// Used for offline deployments and tests; it never touches the network.
    pub fn preloaded(jwks: JwkSet) -> Self {
        Self {
            jwks_url: None,
            cache_ttl: Duration::MAX,
            cache: Arc::new(RwLock::new(Some(CacheEntry {
                jwks,
                fetched_at: Instant::now(),
            }))),
            client: reqwest::Client::new(),
        }
    }

    /// Create with custom cache TTL.
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Get the JWKS URL.
    pub fn jwks_url(&self) -> Option<&str> {
        self.jwks_url.as_deref()
    }

    /// Fetch JWKS (with caching).
    async fn get_jwks(&self) -> Result<JwkSet, AuthError> {
        {
            let cache = self.cache.read().await;
            if let Some(entry) = &*cache {
                if entry.fetched_at.elapsed() < self.cache_ttl {
                    return Ok(entry.jwks.clone());
                }
            }
        }

        self.refresh().await
    }

    /// Fetch JWKS from the endpoint.
    async fn fetch_jwks(&self) -> Result<JwkSet, AuthError> {
        let url = self
            .jwks_url
            .as_deref()
            .ok_or_else(|| AuthError::JwksFetchError("no JWKS endpoint configured".to_string()))?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AuthError::JwksFetchError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AuthError::JwksFetchError(format!(
                "HTTP {} from JWKS endpoint",
                response.status()
            )));
        }

        let jwks: JwkSet = response
            .json()
            .await
            .map_err(|e| AuthError::JwksFetchError(e.to_string()))?;

        tracing::debug!(keys = jwks.keys.len(), "Fetched JWKS");
        Ok(jwks)
    }

    /// Get the RSA decoding key for the given key ID.
    pub async fn get_decoding_key(&self, kid: &str) -> Result<DecodingKey, AuthError> {
        let jwks = self.get_jwks().await?;
        if let Some(jwk) = jwks.find(kid) {
            return jwk_to_decoding_key(jwk);
        }

        if !self.may_force_refresh().await {
            return Err(AuthError::NoMatchingKey);
        }

        tracing::info!(kid, "Unknown key id, refreshing JWKS");
        let jwks = self.refresh().await?;
        let jwk = jwks.find(kid).ok_or(AuthError::NoMatchingKey)?;
        jwk_to_decoding_key(jwk)
    }

    /// Force refresh the JWKS cache, returning the fresh set.
    pub async fn refresh(&self) -> Result<JwkSet, AuthError> {
        let jwks = self.fetch_jwks().await?;
        let mut cache = self.cache.write().await;
        *cache = Some(CacheEntry {
            jwks: jwks.clone(),
            fetched_at: Instant::now(),
        });
        Ok(jwks)
    }

    /// Check if JWKS is currently cached and valid.
    pub async fn is_cached(&self) -> bool {
        let cache = self.cache.read().await;
        if let Some(entry) = &*cache {
            entry.fetched_at.elapsed() < self.cache_ttl
        } else {
            false
        }
    }

    async fn may_force_refresh(&self) -> bool {
        if self.jwks_url.is_none() {
            return false;
        }
        let cache = self.cache.read().await;
        match &*cache {
            Some(entry) => entry.fetched_at.elapsed() >= MIN_FORCED_REFRESH_INTERVAL,
            None => true,
        }
    }
}

/// Convert a JWK to a DecodingKey.
///
/// Tokens are restricted to RS256, so only RSA keys are usable; a matching
/// `kid` on any other key type counts as no appropriate key.
fn jwk_to_decoding_key(jwk: &Jwk) -> Result<DecodingKey, AuthError> {
    match &jwk.algorithm {
        AlgorithmParameters::RSA(rsa) => DecodingKey::from_rsa_components(&rsa.n, &rsa.e)
            .map_err(|e| AuthError::InternalError(format!("Failed to create RSA key: {e}"))),
        _ => Err(AuthError::NoMatchingKey),
    }
}
