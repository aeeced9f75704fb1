// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Coffee Shop - Drink Menu Service
//!
//! This crate serves a coffee shop's drink menu over HTTP. Reading the menu
//! is public; reading full recipes and editing the menu require a bearer JWT
//! from an external identity provider carrying the matching permission.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - JWT verification against a JWKS and permission checks
//! - `config` - Environment-driven startup configuration
//! - `storage` - Drink store (redb)

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod state;
pub mod storage;
