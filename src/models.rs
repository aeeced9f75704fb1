// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! The drink row as stored, its two public representations, and the request
//! and response bodies of the drink endpoints.
//!
//! ## Representations
//!
//! - **short**: `{id, title, recipe: [{color, parts}]}`, public
//! - **long**: `{id, title, recipe: [{name, color, parts}]}`, requires
//!   `get:drinks-detail` or a write scope

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// =============================================================================
// Drink Row
// =============================================================================

/// One ingredient of a recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Ingredient {
    /// Ingredient name, e.g. "milk".
    pub name: String,
    /// Color used to draw the layer in the cup.
    pub color: String,
    /// Relative amount.
    pub parts: u32,
}

/// Ingredient without its name, as shown to anonymous visitors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ShortIngredient {
    pub color: String,
    pub parts: u32,
}

impl From<Ingredient> for ShortIngredient {
    fn from(ingredient: Ingredient) -> Self {
        Self {
            color: ingredient.color,
            parts: ingredient.parts,
        }
    }
}

/// A drink as persisted.
///
/// `recipe` is the serialized JSON text of the ingredient list. The store
/// does not enforce its shape, so it is parsed defensively on the way out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Drink {
    pub id: u64,
    pub title: String,
    pub recipe: String,
}

impl Drink {
    /// Parsed ingredient list. Unreadable recipe text yields an empty list.
    pub fn ingredients(&self) -> Vec<Ingredient> {
        match serde_json::from_str(&self.recipe) {
            Ok(ingredients) => ingredients,
            Err(e) => {
                tracing::warn!(drink_id = self.id, error = %e, "Stored recipe is not a valid ingredient list");
                Vec::new()
            }
        }
    }

    pub fn short(&self) -> DrinkShort {
        DrinkShort {
            id: self.id,
            title: self.title.clone(),
            recipe: self.ingredients().into_iter().map(Into::into).collect(),
        }
    }

    pub fn long(&self) -> DrinkLong {
        DrinkLong {
            id: self.id,
            title: self.title.clone(),
            recipe: self.ingredients(),
        }
    }
}

/// Serialize an ingredient list into recipe column text.
pub fn encode_recipe(recipe: &[Ingredient]) -> Result<String, serde_json::Error> {
    serde_json::to_string(recipe)
}

/// Public drink representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DrinkShort {
    pub id: u64,
    pub title: String,
    pub recipe: Vec<ShortIngredient>,
}

/// Full drink representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DrinkLong {
    pub id: u64,
    pub title: String,
    pub recipe: Vec<Ingredient>,
}

// =============================================================================
// Requests
// =============================================================================

/// Body of `POST /drinks`. Both fields are required.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateDrinkRequest {
    pub title: String,
    pub recipe: Vec<Ingredient>,
}

/// Body of `PATCH /drinks/{id}`. Only supplied fields are applied.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateDrinkRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub recipe: Option<Vec<Ingredient>>,
}

// =============================================================================
// Responses
// =============================================================================

/// Response of `GET /drinks`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DrinkMenuResponse {
    pub success: bool,
    pub drinks: Vec<DrinkShort>,
}

/// Response of the endpoints returning full drinks.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DrinkDetailResponse {
    pub success: bool,
    pub drinks: Vec<DrinkLong>,
}

/// Response of `DELETE /drinks/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeleteDrinkResponse {
    pub success: bool,
    /// Id of the deleted drink.
    pub delete: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn water() -> Drink {
        Drink {
            id: 1,
            title: "water".to_string(),
            recipe: r#"[{"name":"Water","color":"blue","parts":1}]"#.to_string(),
        }
    }

    #[test]
    fn short_drops_ingredient_names() {
        let json = serde_json::to_value(water().short()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 1,
                "title": "water",
                "recipe": [{"color": "blue", "parts": 1}]
            })
        );
    }

    #[test]
    fn long_keeps_full_recipe() {
        let json = serde_json::to_value(water().long()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 1,
                "title": "water",
                "recipe": [{"name": "Water", "color": "blue", "parts": 1}]
            })
        );
    }

    #[test]
    fn corrupt_recipe_renders_empty() {
        let drink = Drink {
            recipe: "{not json".to_string(),
            ..water()
        };
        assert!(drink.long().recipe.is_empty());
        assert!(drink.short().recipe.is_empty());
    }

    #[test]
    fn encode_recipe_preserves_order() {
        let recipe = vec![
            Ingredient {
                name: "espresso".into(),
                color: "brown".into(),
                parts: 1,
            },
            Ingredient {
                name: "milk".into(),
                color: "white".into(),
                parts: 3,
            },
        ];
        let text = encode_recipe(&recipe).unwrap();
        let drink = Drink {
            id: 2,
            title: "latte".into(),
            recipe: text,
        };
        assert_eq!(drink.ingredients(), recipe);
    }

    #[test]
    fn update_request_fields_are_optional() {
        let request: UpdateDrinkRequest = serde_json::from_str("{}").unwrap();
        assert!(request.title.is_none());
        assert!(request.recipe.is_none());
    }

    #[test]
    fn create_request_requires_recipe() {
        let result = serde_json::from_str::<CreateDrinkRequest>(r#"{"title":"tea"}"#);
        assert!(result.is_err());
    }
}
