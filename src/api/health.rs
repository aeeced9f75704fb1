// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::AppState;

/// Health check response with individual component status.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReadyResponse {
    /// Overall health status ("ok" or "degraded").
    pub status: String,
    /// Individual health checks and their results.
    pub checks: HealthChecks,
}

/// Individual health check results.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthChecks {
    /// Whether the service process is running.
    pub service: String,
    /// Drink store status.
    pub database: String,
    /// JWKS (authentication keys) status.
    pub jwks: String,
}

fn check_database(state: &AppState) -> String {
    match state.db.check() {
        Ok(()) => "ok".to_string(),
        Err(e) => {
            tracing::warn!(error = %e, "Drink store health check failed");
            "unavailable".to_string()
        }
    }
}

/// Keys count as available when cached, or when a fetch succeeds now.
async fn check_jwks(state: &AppState) -> String {
    let jwks = state.verifier.jwks();
    if jwks.is_cached().await {
        return "ok".to_string();
    }
    if jwks.jwks_url().is_none() {
        return "unavailable".to_string();
    }
    match jwks.refresh().await {
        Ok(_) => "ok".to_string(),
        Err(_) => "unavailable".to_string(),
    }
}

/// Health check endpoint handler.
///
/// Returns 200 if all checks pass, 503 if any check fails.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is healthy", body = ReadyResponse),
        (status = 503, description = "Service is unhealthy", body = ReadyResponse)
    )
)]
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<ReadyResponse>) {
    let database = check_database(&state);
    let jwks = check_jwks(&state).await;

    let all_ok = database == "ok" && jwks == "ok";

    let response = ReadyResponse {
        status: if all_ok { "ok" } else { "degraded" }.to_string(),
        checks: HealthChecks {
            service: "ok".to_string(),
            database,
            jwks,
        },
    };

    let status = if all_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(response))
}
