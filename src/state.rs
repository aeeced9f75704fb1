// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::TokenVerifier;
use crate::storage::DrinkDatabase;

/// Application context handed to the router.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DrinkDatabase>,
    pub verifier: TokenVerifier,
}

impl AppState {
    pub fn new(db: DrinkDatabase, verifier: TokenVerifier) -> Self {
        Self {
            db: Arc::new(db),
            verifier,
        }
    }
}
