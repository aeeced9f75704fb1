// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::FromRequest,
    middleware::from_fn_with_state,
    routing::{delete, get, patch, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::{require_permission, Permission},
    error::{handler_404, handler_405, ApiError},
    models::{
        CreateDrinkRequest, DeleteDrinkResponse, DrinkDetailResponse, DrinkLong,
        DrinkMenuResponse, DrinkShort, Ingredient, ShortIngredient, UpdateDrinkRequest,
    },
    state::AppState,
};

pub mod drinks;
pub mod health;

/// JSON body whose rejections render as [`ApiError`] (422).
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

pub fn router(state: AppState) -> Router {
    let verifier = state.verifier.clone();
    let guard = move |permission: Permission| {
        from_fn_with_state(verifier.require(permission), require_permission)
    };

    let routes = Router::new()
        .route(
            "/drinks",
            get(drinks::list_drinks)
                .merge(post(drinks::create_drink).route_layer(guard(Permission::PostDrinks))),
        )
        .route(
            "/drinks-detail",
            get(drinks::list_drinks_detail).route_layer(guard(Permission::GetDrinksDetail)),
        )
        .route(
            "/drinks/{id}",
            patch(drinks::update_drink)
                .route_layer(guard(Permission::PatchDrinks))
                .merge(
                    delete(drinks::delete_drink).route_layer(guard(Permission::DeleteDrinks)),
                ),
        )
        .route("/health", get(health::health))
        .method_not_allowed_fallback(handler_405)
        .with_state(state);

    Router::new()
        .merge(routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .fallback(handler_404)
        .layer(CorsLayer::permissive())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        drinks::list_drinks,
        drinks::list_drinks_detail,
        drinks::create_drink,
        drinks::update_drink,
        drinks::delete_drink,
        health::health
    ),
    components(
        schemas(
            Ingredient,
            ShortIngredient,
            DrinkShort,
            DrinkLong,
            CreateDrinkRequest,
            UpdateDrinkRequest,
            DrinkMenuResponse,
            DrinkDetailResponse,
            DeleteDrinkResponse,
            health::ReadyResponse,
            health::HealthChecks
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Drinks", description = "Drink menu management"),
        (name = "Health", description = "Service health")
    )
)]
struct ApiDoc;
