//! Data models for the drinks catalog
//!
//! This module contains the persisted entity structs and the insert-side
//! structs used to create new rows. All persisted entities share the same
//! identity contract: a store-generated integer primary key, `created_at` set
//! once at insert, and `updated_at` refreshed on every mutation.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::associations::IngredientMeasures;

/// A persisted drink
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Drink {
    /// Database primary key
    pub id: i64,
    /// Drink name
    pub name: String,
    /// Free-form preparation instructions
    pub preparation: String,
    /// Alcohol percentage, if known
    pub alcohol_content: Option<f64>,
    /// Provenance of the record
    pub data_source: Option<String>,
    /// Category (cocktail, shot, ...)
    pub drink_type: Option<String>,
    /// Garnish, if any
    pub garnish: Option<String>,
    /// Serving glass, if any
    pub glass: Option<String>,
    /// Timestamp when the row was inserted
    pub created_at: NaiveDateTime,
    /// Timestamp of the last mutation
    pub updated_at: NaiveDateTime,
}

/// A persisted ingredient. Deduplicated by name through the lookup registry;
/// shared reference data that survives deletion of any drink using it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ingredient {
    /// Database primary key
    pub id: i64,
    /// Ingredient name, globally unique
    pub name: String,
    /// Alcohol percentage, if known
    pub alcohol_content: Option<f64>,
    /// Category (spirit, juice, ...)
    pub category: Option<String>,
    /// Timestamp when the row was inserted
    pub created_at: NaiveDateTime,
    /// Timestamp of the last mutation
    pub updated_at: NaiveDateTime,
}

/// A persisted drink-ingredient association carrying the measurement payload.
/// One row per (drink, ingredient) pair, owned by the drink.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrinkIngredient {
    /// Database primary key
    pub id: i64,
    /// Foreign key to the owning drink
    pub drink_id: i64,
    /// Foreign key to the referenced ingredient
    pub ingredient_id: i64,
    /// Quantity/unit text, e.g. "2 oz"
    pub measurement: String,
    /// Timestamp when the row was inserted
    pub created_at: NaiveDateTime,
    /// Timestamp of the last mutation
    pub updated_at: NaiveDateTime,
}

/// Data for creating a new drink, including its staged ingredient
/// measurements. The staged map is flushed in the same transaction as the
/// drink row, so a half-created drink is never observable.
#[derive(Debug, Clone, Default)]
pub struct NewDrink {
    /// Drink name
    pub name: String,
    /// Free-form preparation instructions
    pub preparation: String,
    /// Alcohol percentage, if known
    pub alcohol_content: Option<f64>,
    /// Provenance of the record
    pub data_source: Option<String>,
    /// Category (cocktail, shot, ...)
    pub drink_type: Option<String>,
    /// Garnish, if any
    pub garnish: Option<String>,
    /// Serving glass, if any
    pub glass: Option<String>,
    /// Staged ingredient measurements, keyed by ingredient identity
    pub ingredients: IngredientMeasures,
}

/// Data for creating a new ingredient through the lookup registry
#[derive(Debug, Clone, Default)]
pub struct NewIngredient {
    /// Ingredient name, the dedup key
    pub name: String,
    /// Alcohol percentage, if known
    pub alcohol_content: Option<f64>,
    /// Category (spirit, juice, ...)
    pub category: Option<String>,
}

impl NewIngredient {
    /// Convenience constructor for a name-only ingredient
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Row counts across the catalog
#[derive(Debug, Clone, Copy)]
pub struct CatalogStats {
    /// Number of drinks
    pub drinks: usize,
    /// Number of distinct ingredients
    pub ingredients: usize,
    /// Number of drink-ingredient associations
    pub associations: usize,
}
