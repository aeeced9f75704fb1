// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Storage Module
//!
//! Persistent storage for the drink menu in a single redb file.
//!
//! ## Contract
//!
//! Handlers only rely on insert, update, delete, query-by-id and
//! query-all-ordered-by-id. The recipe column holds serialized JSON text
//! whose shape the store does not enforce.

pub mod drinks_db;

pub use drinks_db::{DrinkDatabase, DrinkDbError, DrinkDbResult};
