//! Database schema definitions
//!
//! This module provides constants for table, column, and constraint names used
//! to build SQL against the catalog. The DDL itself lives in `migrations/`.

/// Drinks table schema
pub mod drinks {
    /// Table name
    pub const TABLE: &str = "drinks";
    /// Primary key column
    pub const ID: &str = "id";
    /// Drink name column (not unique; variants of a drink may share a name)
    pub const NAME: &str = "name";
    /// Preparation instructions column
    pub const PREPARATION: &str = "preparation";
    /// Alcohol percentage column
    pub const ALCOHOL_CONTENT: &str = "alcohol_content";
    /// Provenance of the record
    pub const DATA_SOURCE: &str = "data_source";
    /// Drink category column
    pub const DRINK_TYPE: &str = "drink_type";
    /// Garnish column
    pub const GARNISH: &str = "garnish";
    /// Serving glass column
    pub const GLASS: &str = "glass";
    /// Row creation timestamp column
    pub const CREATED_AT: &str = "created_at";
    /// Last mutation timestamp column
    pub const UPDATED_AT: &str = "updated_at";
}

/// Ingredients table schema (a lookup table, deduplicated by name)
pub mod ingredients {
    /// Table name
    pub const TABLE: &str = "ingredients";
    /// Primary key column
    pub const ID: &str = "id";
    /// Ingredient name column, globally unique
    pub const NAME: &str = "name";
    /// Alcohol percentage column
    pub const ALCOHOL_CONTENT: &str = "alcohol_content";
    /// Ingredient category column
    pub const CATEGORY: &str = "category";
    /// Row creation timestamp column
    pub const CREATED_AT: &str = "created_at";
    /// Last mutation timestamp column
    pub const UPDATED_AT: &str = "updated_at";
    /// Identifier SQLite reports when the name uniqueness constraint fails
    pub const NAME_CONSTRAINT: &str = "ingredients.name";
}

/// Drink-ingredient join table schema
pub mod drink_ingredients {
    /// Table name
    pub const TABLE: &str = "drink_ingredients";
    /// Primary key column
    pub const ID: &str = "id";
    /// Foreign key to drinks, cascade on drink deletion
    pub const DRINK_ID: &str = "drink_id";
    /// Foreign key to ingredients (no cascade; ingredients are shared)
    pub const INGREDIENT_ID: &str = "ingredient_id";
    /// Quantity/unit text, at most 50 characters
    pub const MEASUREMENT: &str = "measurement";
    /// Row creation timestamp column
    pub const CREATED_AT: &str = "created_at";
    /// Last mutation timestamp column
    pub const UPDATED_AT: &str = "updated_at";
    /// Named CHECK constraint bounding the measurement length
    pub const MEASUREMENT_LEN_CONSTRAINT: &str = "measurement_len";
}
