// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names, default values and the
//! [`AppConfig`] loaded from them once at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `AUTH0_DOMAIN` | Identity provider domain (issuer host) | Required |
//! | `API_AUDIENCE` | Expected JWT audience (API identifier) | Required |
//! | `JWKS_CACHE_TTL_SECS` | JWKS cache TTL, `0` refetches per request | `300` |
//! | `JWKS_TIMEOUT_SECS` | JWKS fetch timeout | `10` |
//! | `JWT_LEEWAY_SECS` | Clock skew tolerance for `exp` | `0` |
//! | `DATABASE_PATH` | redb database file | `data/drinks.redb` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `TLS_CERT_PATH` / `TLS_KEY_PATH` | PEM pair enabling HTTPS | unset |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use url::Url;

pub const AUTH0_DOMAIN_ENV: &str = "AUTH0_DOMAIN";
pub const API_AUDIENCE_ENV: &str = "API_AUDIENCE";
pub const JWKS_CACHE_TTL_ENV: &str = "JWKS_CACHE_TTL_SECS";
pub const JWKS_TIMEOUT_ENV: &str = "JWKS_TIMEOUT_SECS";
pub const JWT_LEEWAY_ENV: &str = "JWT_LEEWAY_SECS";
pub const DATABASE_PATH_ENV: &str = "DATABASE_PATH";
pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const TLS_CERT_PATH_ENV: &str = "TLS_CERT_PATH";
pub const TLS_KEY_PATH_ENV: &str = "TLS_KEY_PATH";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_DATABASE_PATH: &str = "data/drinks.redb";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

const DEFAULT_JWKS_CACHE_TTL_SECS: u64 = 300;
const DEFAULT_JWKS_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("environment variable {0} is required")]
    Missing(&'static str),

    #[error("environment variable {var} is invalid: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            other => Err(format!("unknown log format {other:?}")),
        }
    }
}

/// Token verification settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSettings {
    /// Expected `iss`, `https://<domain>/`
    pub issuer: String,
    /// `https://<domain>/.well-known/jwks.json`
    pub jwks_url: String,
    /// Expected `aud`
    pub audience: String,
    pub jwks_cache_ttl: Duration,
    pub jwks_timeout: Duration,
    pub leeway_secs: u64,
}

impl AuthSettings {
    /// Derive issuer and JWKS URL from a bare domain such as
    /// `coffee.eu.auth0.com`. A leading `https://` or trailing `/` is tolerated.
    pub fn for_domain(domain: &str, audience: impl Into<String>) -> Result<Self, ConfigError> {
        let host = domain
            .trim()
            .trim_start_matches("https://")
            .trim_end_matches('/');
        let invalid = |reason: String| ConfigError::Invalid {
            var: AUTH0_DOMAIN_ENV,
            reason,
        };
        if host.is_empty() {
            return Err(invalid("empty domain".to_string()));
        }

        let issuer = Url::parse(&format!("https://{host}/")).map_err(|e| invalid(e.to_string()))?;
        let jwks_url = issuer
            .join(".well-known/jwks.json")
            .map_err(|e| invalid(e.to_string()))?;

        Ok(Self {
            issuer: issuer.to_string(),
            jwks_url: jwks_url.to_string(),
            audience: audience.into(),
            jwks_cache_ttl: Duration::from_secs(DEFAULT_JWKS_CACHE_TTL_SECS),
            jwks_timeout: Duration::from_secs(DEFAULT_JWKS_TIMEOUT_SECS),
            leeway_secs: 0,
        })
    }
}

/// Certificate and key for HTTPS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsPaths {
    pub cert: PathBuf,
    pub key: PathBuf,
}

/// Everything the server needs at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub auth: AuthSettings,
    pub database_path: PathBuf,
    pub bind_addr: SocketAddr,
    pub tls: Option<TlsPaths>,
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |var: &'static str| {
            lookup(var)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(var))
        };

        let domain = required(AUTH0_DOMAIN_ENV)?;
        let audience = required(API_AUDIENCE_ENV)?;

        let mut auth = AuthSettings::for_domain(&domain, audience)?;
        if let Some(ttl) = parse_opt::<u64>(&lookup, JWKS_CACHE_TTL_ENV)? {
            auth.jwks_cache_ttl = Duration::from_secs(ttl);
        }
        if let Some(timeout) = parse_opt::<u64>(&lookup, JWKS_TIMEOUT_ENV)? {
            auth.jwks_timeout = Duration::from_secs(timeout);
        }
        if let Some(leeway) = parse_opt::<u64>(&lookup, JWT_LEEWAY_ENV)? {
            auth.leeway_secs = leeway;
        }

        let database_path = lookup(DATABASE_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_PATH));

        let host = lookup(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = parse_opt::<u16>(&lookup, PORT_ENV)?.unwrap_or(DEFAULT_PORT);
        let bind_addr: SocketAddr =
            format!("{host}:{port}")
                .parse()
                .map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
                    var: HOST_ENV,
                    reason: e.to_string(),
                })?;

        let tls = match (lookup(TLS_CERT_PATH_ENV), lookup(TLS_KEY_PATH_ENV)) {
            (Some(cert), Some(key)) => Some(TlsPaths {
                cert: cert.into(),
                key: key.into(),
            }),
            (None, None) => None,
            (Some(_), None) => return Err(ConfigError::Missing(TLS_KEY_PATH_ENV)),
            (None, Some(_)) => return Err(ConfigError::Missing(TLS_CERT_PATH_ENV)),
        };

        let log_format = parse_opt::<LogFormat>(&lookup, LOG_FORMAT_ENV)?.unwrap_or_default();

        Ok(Self {
            auth,
            database_path,
            bind_addr,
            tls,
            log_format,
        })
    }
}

fn parse_opt<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    lookup(var)
        .map(|raw| {
            raw.trim().parse::<T>().map_err(|e| ConfigError::Invalid {
                var,
                reason: e.to_string(),
            })
        })
        .transpose()
}
