// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Embedded drink database backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `drinks`: id → serialized [`Drink`] row (JSON bytes, recipe kept as text)
//! - `drink_titles`: title → id (unique index)
//! - `sequences`: name → last issued id

use std::path::Path;

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};

use crate::models::Drink;

// =============================================================================
// Table Definitions
// =============================================================================

/// Primary table: id → serialized Drink (JSON bytes).
const DRINKS: TableDefinition<u64, &[u8]> = TableDefinition::new("drinks");

/// Unique index: title → id.
const DRINK_TITLES: TableDefinition<&str, u64> = TableDefinition::new("drink_titles");

/// Id sequences: name → last issued id.
const SEQUENCES: TableDefinition<&str, u64> = TableDefinition::new("sequences");

const DRINK_SEQUENCE: &str = "drinks";

// =============================================================================
// Error Type
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum DrinkDbError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("drink {0} not found")]
    NotFound(u64),

    #[error("a drink titled {0:?} already exists")]
    DuplicateTitle(String),
}

pub type DrinkDbResult<T> = Result<T, DrinkDbError>;

// =============================================================================
// DrinkDatabase
// =============================================================================

/// Embedded ACID drink table.
pub struct DrinkDatabase {
    db: Database,
}

impl DrinkDatabase {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> DrinkDbResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let db = Database::create(path)?;

        // Pre-create all tables so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(DRINKS)?;
            let _ = write_txn.open_table(DRINK_TITLES)?;
            let _ = write_txn.open_table(SEQUENCES)?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }

    /// Confirm the database answers a read transaction.
    pub fn check(&self) -> DrinkDbResult<()> {
        let read_txn = self.db.begin_read()?;
        let _ = read_txn.open_table(DRINKS)?;
        Ok(())
    }

    /// Insert a new drink, assigning the next id.
    ///
    /// `recipe` is stored verbatim as the recipe column text.
    pub fn insert(&self, title: &str, recipe: &str) -> DrinkDbResult<Drink> {
        let write_txn = self.db.begin_write()?;
        let drink = {
            let mut titles = write_txn.open_table(DRINK_TITLES)?;
            if titles.get(title)?.is_some() {
                return Err(DrinkDbError::DuplicateTitle(title.to_string()));
            }

            let mut sequences = write_txn.open_table(SEQUENCES)?;
            let id = sequences
                .get(DRINK_SEQUENCE)?
                .map(|last| last.value())
                .unwrap_or(0)
                + 1;
            sequences.insert(DRINK_SEQUENCE, id)?;

            let drink = Drink {
                id,
                title: title.to_string(),
                recipe: recipe.to_string(),
            };
            let json = serde_json::to_vec(&drink)?;

            let mut drinks = write_txn.open_table(DRINKS)?;
            drinks.insert(id, json.as_slice())?;
            titles.insert(title, id)?;
            drink
        };
        write_txn.commit()?;
        Ok(drink)
    }

    /// Look up a single drink by id.
    pub fn get(&self, id: u64) -> DrinkDbResult<Option<Drink>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(DRINKS)?;
        match table.get(id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// All drinks, ordered by id.
    pub fn list(&self) -> DrinkDbResult<Vec<Drink>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(DRINKS)?;

        let mut drinks = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            drinks.push(serde_json::from_slice(value.value())?);
        }
        Ok(drinks)
    }

    /// Overwrite an existing drink, keeping the title index in step.
    pub fn update(&self, drink: &Drink) -> DrinkDbResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut drinks = write_txn.open_table(DRINKS)?;

            // Read existing value and deserialize before mutating
            let existing: Drink = {
                let existing = drinks
                    .get(drink.id)?
                    .ok_or(DrinkDbError::NotFound(drink.id))?;
                serde_json::from_slice(existing.value())?
            };

            if existing.title != drink.title {
                let mut titles = write_txn.open_table(DRINK_TITLES)?;
                if titles.get(drink.title.as_str())?.is_some() {
                    return Err(DrinkDbError::DuplicateTitle(drink.title.clone()));
                }
                titles.remove(existing.title.as_str())?;
                titles.insert(drink.title.as_str(), drink.id)?;
            }

            let json = serde_json::to_vec(drink)?;
            drinks.insert(drink.id, json.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Delete a drink and its title index entry.
    pub fn delete(&self, id: u64) -> DrinkDbResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut drinks = write_txn.open_table(DRINKS)?;
            let removed = drinks
                .remove(id)?
                .map(|value| value.value().to_vec())
                .ok_or(DrinkDbError::NotFound(id))?;
            let drink: Drink = serde_json::from_slice(&removed)?;

            let mut titles = write_txn.open_table(DRINK_TITLES)?;
            titles.remove(drink.title.as_str())?;
        }
        write_txn.commit()?;
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
