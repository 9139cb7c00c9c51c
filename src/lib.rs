//! MXR - Drinks and Ingredients Catalog
//!
//! A Rust library for persisting a catalog of drinks and the ingredients used
//! to prepare them, backed by SQLite.
//!
//! # Features
//!
//! - Relational schema with store-enforced constraints (uniqueness, foreign
//!   keys, cascade delete, measurement length)
//! - Concurrency-safe get-or-create deduplication for name-uniqued lookup
//!   entities
//! - Mapping-style view over the drink/ingredient join table
//! - Bulk CSV ingestion of the Kaggle cocktail dataset

/// Association mapping adapter over the join table
pub mod associations;
/// Configuration management
pub mod config;
/// Database operations and connection pooling
pub mod db;
/// Error taxonomy
pub mod error;
/// Bulk CSV ingestion
pub mod loader;
/// Logging setup and utilities
pub mod logging;
/// Lookup registry with race-safe get-or-create
pub mod lookup;
/// Metrics collection
pub mod metrics;
/// Data models and structures
pub mod models;
/// Database schema definitions
pub mod schema;

// Re-export key components for easier access
pub use associations::{IngredientMap, IngredientMeasures};
pub use db::Database;
pub use error::{ConstraintKind, MxrError, Result};
pub use lookup::{LookupRecord, NewLookupRecord};
pub use models::{Drink, Ingredient, NewDrink, NewIngredient};
