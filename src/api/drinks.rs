// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Drink menu endpoints.
//!
//! `GET /drinks` is public. Everything else runs behind a
//! [`PermissionGuard`](crate::auth::PermissionGuard) and receives the
//! verified claims as its first argument.
//!
//! Store failures surface as 404 on reads and 422 on writes; the underlying
//! cause is only logged.

use axum::{
    body::Bytes,
    extract::{Path, State},
    Json,
};

use super::JsonBody;
use crate::{
    auth::Verified,
    error::ApiError,
    models::{
        encode_recipe, CreateDrinkRequest, DeleteDrinkResponse, Drink, DrinkDetailResponse,
        DrinkMenuResponse, UpdateDrinkRequest,
    },
    state::AppState,
    storage::DrinkDbError,
};

/// Resolve a path id to an existing drink.
///
/// Ids that are not unsigned integers cannot exist, so they are 404 too.
fn find_drink(state: &AppState, raw_id: &str) -> Result<Drink, ApiError> {
    let id: u64 = raw_id.parse().map_err(|_| ApiError::not_found())?;
    match state.db.get(id) {
        Ok(Some(drink)) => Ok(drink),
        Ok(None) => Err(ApiError::not_found()),
        Err(e) => {
            tracing::warn!(drink_id = id, error = %e, "Failed to look up drink");
            Err(ApiError::unprocessable())
        }
    }
}

fn write_failed(e: DrinkDbError) -> ApiError {
    match e {
        DrinkDbError::NotFound(_) => ApiError::not_found(),
        other => {
            tracing::warn!(error = %other, "Drink write failed");
            ApiError::unprocessable()
        }
    }
}

fn load_menu(state: &AppState) -> Result<Vec<Drink>, ApiError> {
    state.db.list().map_err(|e| {
        tracing::warn!(error = %e, "Failed to list drinks");
        ApiError::not_found()
    })
}

/// List the menu in short form.
#[utoipa::path(
    get,
    path = "/drinks",
    tag = "Drinks",
    responses(
        (status = 200, description = "Drinks without ingredient names", body = DrinkMenuResponse),
        (status = 404, description = "Menu unavailable")
    )
)]
pub async fn list_drinks(State(state): State<AppState>) -> Result<Json<DrinkMenuResponse>, ApiError> {
    let drinks = load_menu(&state)?;
    Ok(Json(DrinkMenuResponse {
        success: true,
        drinks: drinks.iter().map(Drink::short).collect(),
    }))
}

/// List the menu with full recipes.
#[utoipa::path(
    get,
    path = "/drinks-detail",
    tag = "Drinks",
    security(("bearer_auth" = ["get:drinks-detail"])),
    responses(
        (status = 200, description = "Drinks with full recipes", body = DrinkDetailResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Permission not granted"),
        (status = 404, description = "Menu unavailable")
    )
)]
pub async fn list_drinks_detail(
    Verified(_token): Verified,
    State(state): State<AppState>,
) -> Result<Json<DrinkDetailResponse>, ApiError> {
    let drinks = load_menu(&state)?;
    Ok(Json(DrinkDetailResponse {
        success: true,
        drinks: drinks.iter().map(Drink::long).collect(),
    }))
}

/// Add a drink to the menu.
#[utoipa::path(
    post,
    path = "/drinks",
    tag = "Drinks",
    security(("bearer_auth" = ["post:drinks"])),
    request_body = CreateDrinkRequest,
    responses(
        (status = 200, description = "The created drink", body = DrinkDetailResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Permission not granted"),
        (status = 422, description = "Missing fields or duplicate title")
    )
)]
pub async fn create_drink(
    Verified(token): Verified,
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CreateDrinkRequest>,
) -> Result<Json<DrinkDetailResponse>, ApiError> {
    let recipe = encode_recipe(&request.recipe).map_err(|_| ApiError::unprocessable())?;
    let drink = state
        .db
        .insert(&request.title, &recipe)
        .map_err(write_failed)?;

    tracing::info!(drink_id = drink.id, sub = token.subject(), "Drink created");

    Ok(Json(DrinkDetailResponse {
        success: true,
        drinks: vec![drink.long()],
    }))
}

/// Edit a drink. Only the supplied fields change.
///
/// The body is read only after the drink is known to exist, so a missing
/// drink is a 404 whatever was sent.
#[utoipa::path(
    patch,
    path = "/drinks/{id}",
    tag = "Drinks",
    security(("bearer_auth" = ["patch:drinks"])),
    params(("id" = u64, Path, description = "Drink id")),
    request_body = UpdateDrinkRequest,
    responses(
        (status = 200, description = "The updated drink", body = DrinkDetailResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Permission not granted"),
        (status = 404, description = "No such drink"),
        (status = 422, description = "Malformed body or duplicate title")
    )
)]
pub async fn update_drink(
    Verified(token): Verified,
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<DrinkDetailResponse>, ApiError> {
    let mut drink = find_drink(&state, &id)?;

    let request: UpdateDrinkRequest = serde_json::from_slice(&body).map_err(|e| {
        tracing::debug!(error = %e, "Rejected request body");
        ApiError::unprocessable()
    })?;

    if let Some(title) = request.title {
        drink.title = title;
    }
    if let Some(recipe) = request.recipe {
        drink.recipe = encode_recipe(&recipe).map_err(|_| ApiError::unprocessable())?;
    }

    state.db.update(&drink).map_err(write_failed)?;

    tracing::info!(drink_id = drink.id, sub = token.subject(), "Drink updated");

    Ok(Json(DrinkDetailResponse {
        success: true,
        drinks: vec![drink.long()],
    }))
}

/// Remove a drink from the menu.
#[utoipa::path(
    delete,
    path = "/drinks/{id}",
    tag = "Drinks",
    security(("bearer_auth" = ["delete:drinks"])),
    params(("id" = u64, Path, description = "Drink id")),
    responses(
        (status = 200, description = "Id of the deleted drink", body = DeleteDrinkResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Permission not granted"),
        (status = 404, description = "No such drink"),
        (status = 422, description = "Store failure")
    )
)]
pub async fn delete_drink(
    Verified(token): Verified,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteDrinkResponse>, ApiError> {
    let drink = find_drink(&state, &id)?;

    state.db.delete(drink.id).map_err(write_failed)?;

    tracing::info!(drink_id = drink.id, sub = token.subject(), "Drink deleted");

    Ok(Json(DeleteDrinkResponse {
        success: true,
        delete: drink.id,
    }))
}
