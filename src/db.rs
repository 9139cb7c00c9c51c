//! Database operations and connection pooling
//!
//! `Database` wraps an r2d2 pool of SQLite connections, runs the embedded
//! migrations at startup, and exposes the drink CRUD surface. Integrity rules
//! (not-null, uniqueness, foreign keys, the measurement length bound) are
//! enforced by SQLite itself; this layer only maps the failures into the
//! crate's error taxonomy.

use std::fs;
use std::path::Path;
use std::time::Duration;

use chrono::Utc;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::{debug, info};

use crate::associations::IngredientMap;
use crate::error::{MxrError, Result};
use crate::metrics;
use crate::models::{CatalogStats, Drink, Ingredient, NewDrink};
use crate::schema::{drink_ingredients, drinks, ingredients};

/// Type alias for the database connection pool
pub type DbPool = Pool<SqliteConnectionManager>;
/// Type alias for a pooled connection
pub type DbConnection = r2d2::PooledConnection<SqliteConnectionManager>;

const DEFAULT_POOL_SIZE: u32 = 10;
const DEFAULT_CONNECTION_TIMEOUT: Duration = Duration::from_secs(30);

/// Database manager for handling connections and catalog operations
pub struct Database {
    pool: DbPool,
}

impl Database {
    /// Create a new database connection pool with default sizing.
    ///
    /// Accepts a filesystem path, optionally prefixed with `sqlite:` or
    /// `sqlite://`. Parent directories are created as needed and the schema
    /// migrations run before the pool is handed out.
    pub fn new(database_url: &str) -> Result<Self> {
        Self::with_pool_size(database_url, DEFAULT_POOL_SIZE, DEFAULT_CONNECTION_TIMEOUT)
    }

    /// Create a new database connection pool with explicit sizing
    pub fn with_pool_size(database_url: &str, max_connections: u32, connection_timeout: Duration) -> Result<Self> {
        let path = strip_sqlite_prefix(database_url);

        // Create parent directory if it doesn't exist
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        // Every pooled connection needs the same pragmas: WAL so concurrent
        // writers queue instead of failing, foreign_keys for FK enforcement
        // and cascade deletes, busy_timeout so lock contention waits rather
        // than surfacing immediately as a busy error.
        let manager = SqliteConnectionManager::file(path).with_init(|conn| {
            conn.execute_batch(
                "PRAGMA journal_mode = WAL;
                 PRAGMA synchronous = NORMAL;
                 PRAGMA foreign_keys = ON;
                 PRAGMA busy_timeout = 5000;",
            )
        });
        let pool = Pool::builder()
            .max_size(max_connections)
            .connection_timeout(connection_timeout)
            .build(manager)?;

        // Run migrations
        let conn = pool.get()?;
        Self::run_migrations(&conn)?;
        info!(database = path, "database ready");

        Ok(Self { pool })
    }

    /// Run database migrations
    fn run_migrations(conn: &Connection) -> Result<()> {
        conn.execute_batch(include_str!("../migrations/2026-08-30-000000_create_catalog/up.sql"))
            .map_err(MxrError::from)?;
        Ok(())
    }

    /// Get a connection from the pool
    pub fn get_connection(&self) -> Result<DbConnection> {
        self.pool.get().map_err(MxrError::from)
    }

    /// Insert a new drink together with its staged ingredient measurements.
    ///
    /// The drink row and all association rows commit in a single transaction;
    /// a reader never observes the drink without its ingredients.
    pub fn add_drink(&self, new_drink: &NewDrink) -> Result<Drink> {
        let mut conn = self.get_connection()?;
        let now = Utc::now().naive_utc();

        let tx = conn.transaction().map_err(MxrError::from)?;
        tx.execute(
            &format!(
                "INSERT INTO {} ({}, {}, {}, {}, {}, {}, {}, {}, {}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)",
                drinks::TABLE,
                drinks::NAME,
                drinks::PREPARATION,
                drinks::ALCOHOL_CONTENT,
                drinks::DATA_SOURCE,
                drinks::DRINK_TYPE,
                drinks::GARNISH,
                drinks::GLASS,
                drinks::CREATED_AT,
                drinks::UPDATED_AT,
            ),
            params![
                new_drink.name,
                new_drink.preparation,
                new_drink.alcohol_content,
                new_drink.data_source,
                new_drink.drink_type,
                new_drink.garnish,
                new_drink.glass,
                now,
            ],
        )
        .map_err(MxrError::from)?;
        let drink_id = tx.last_insert_rowid();

        // The staged map is already deduplicated by ingredient id, so plain
        // inserts cannot trip the composite unique constraint here.
        for (ingredient, measurement) in new_drink.ingredients.iter() {
            tx.execute(
                &format!(
                    "INSERT INTO {} ({}, {}, {}, {}, {}) VALUES (?1, ?2, ?3, ?4, ?4)",
                    drink_ingredients::TABLE,
                    drink_ingredients::DRINK_ID,
                    drink_ingredients::INGREDIENT_ID,
                    drink_ingredients::MEASUREMENT,
                    drink_ingredients::CREATED_AT,
                    drink_ingredients::UPDATED_AT,
                ),
                params![drink_id, ingredient.id, measurement, now],
            )
            .map_err(MxrError::from)?;
        }
        tx.commit().map_err(MxrError::from)?;

        metrics::drink_inserted();
        debug!(drink_id, name = %new_drink.name, ingredients = new_drink.ingredients.len(), "drink inserted");
        self.get_drink(drink_id)
    }

    /// Get a drink by id
    pub fn get_drink(&self, drink_id: i64) -> Result<Drink> {
        let conn = self.get_connection()?;
        conn.query_row(
            &format!("SELECT * FROM {} WHERE {} = ?1", drinks::TABLE, drinks::ID),
            params![drink_id],
            map_drink,
        )
        .optional()
        .map_err(MxrError::from)?
        .ok_or_else(|| MxrError::NotFound(format!("drink {drink_id}")))
    }

    /// All drinks with the given name, ordered by id. Drink names are not
    /// unique; variants may share one.
    pub fn drinks_by_name(&self, name: &str) -> Result<Vec<Drink>> {
        let conn = self.get_connection()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT * FROM {} WHERE {} = ?1 ORDER BY {}",
            drinks::TABLE,
            drinks::NAME,
            drinks::ID,
        ))?;
        let rows = stmt.query_map(params![name], map_drink)?;

        let mut results = Vec::new();
        for drink in rows {
            results.push(drink?);
        }
        Ok(results)
    }

    /// Write back a drink's attributes, refreshing `updated_at`.
    ///
    /// Returns the freshly read row. Fails with `NotFound` if the id has no
    /// backing row.
    pub fn update_drink(&self, drink: &Drink) -> Result<Drink> {
        let conn = self.get_connection()?;
        let now = Utc::now().naive_utc();
        let updated = conn
            .execute(
                &format!(
                    "UPDATE {} SET {} = ?1, {} = ?2, {} = ?3, {} = ?4, {} = ?5, {} = ?6, {} = ?7, {} = ?8 WHERE {} = ?9",
                    drinks::TABLE,
                    drinks::NAME,
                    drinks::PREPARATION,
                    drinks::ALCOHOL_CONTENT,
                    drinks::DATA_SOURCE,
                    drinks::DRINK_TYPE,
                    drinks::GARNISH,
                    drinks::GLASS,
                    drinks::UPDATED_AT,
                    drinks::ID,
                ),
                params![
                    drink.name,
                    drink.preparation,
                    drink.alcohol_content,
                    drink.data_source,
                    drink.drink_type,
                    drink.garnish,
                    drink.glass,
                    now,
                    drink.id,
                ],
            )
            .map_err(MxrError::from)?;
        if updated == 0 {
            return Err(MxrError::NotFound(format!("drink {}", drink.id)));
        }
        self.get_drink(drink.id)
    }

    /// Delete a drink. Its association rows cascade away; the ingredients it
    /// referenced remain.
    pub fn delete_drink(&self, drink_id: i64) -> Result<()> {
        let conn = self.get_connection()?;
        let deleted = conn
            .execute(
                &format!("DELETE FROM {} WHERE {} = ?1", drinks::TABLE, drinks::ID),
                params![drink_id],
            )
            .map_err(MxrError::from)?;
        if deleted == 0 {
            return Err(MxrError::NotFound(format!("drink {drink_id}")));
        }
        metrics::drink_deleted();
        debug!(drink_id, "drink deleted");
        Ok(())
    }

    /// Mapping view over a drink's ingredient measurements
    #[must_use]
    pub fn ingredients(&self, drink: &Drink) -> IngredientMap<'_> {
        IngredientMap::new(self, drink.id)
    }

    /// Get an ingredient by id
    pub fn get_ingredient(&self, ingredient_id: i64) -> Result<Ingredient> {
        let conn = self.get_connection()?;
        conn.query_row(
            &format!("SELECT * FROM {} WHERE {} = ?1", ingredients::TABLE, ingredients::ID),
            params![ingredient_id],
            map_ingredient,
        )
        .optional()
        .map_err(MxrError::from)?
        .ok_or_else(|| MxrError::NotFound(format!("ingredient {ingredient_id}")))
    }

    /// Row counts across the catalog
    pub fn catalog_stats(&self) -> Result<CatalogStats> {
        let conn = self.get_connection()?;
        let count = |table: &str| -> Result<usize> {
            let n: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))?;
            Ok(usize::try_from(n).unwrap_or(0))
        };
        Ok(CatalogStats {
            drinks: count(drinks::TABLE)?,
            ingredients: count(ingredients::TABLE)?,
            associations: count(drink_ingredients::TABLE)?,
        })
    }
}

fn strip_sqlite_prefix(database_url: &str) -> &str {
    database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))
        .unwrap_or(database_url)
}

/// Map a database row to a Drink
pub(crate) fn map_drink(row: &Row<'_>) -> rusqlite::Result<Drink> {
    Ok(Drink {
        id: row.get(drinks::ID)?,
        name: row.get(drinks::NAME)?,
        preparation: row.get(drinks::PREPARATION)?,
        alcohol_content: row.get(drinks::ALCOHOL_CONTENT)?,
        data_source: row.get(drinks::DATA_SOURCE)?,
        drink_type: row.get(drinks::DRINK_TYPE)?,
        garnish: row.get(drinks::GARNISH)?,
        glass: row.get(drinks::GLASS)?,
        created_at: row.get(drinks::CREATED_AT)?,
        updated_at: row.get(drinks::UPDATED_AT)?,
    })
}

/// Map a database row to an Ingredient
pub(crate) fn map_ingredient(row: &Row<'_>) -> rusqlite::Result<Ingredient> {
    Ok(Ingredient {
        id: row.get(ingredients::ID)?,
        name: row.get(ingredients::NAME)?,
        alcohol_content: row.get(ingredients::ALCOHOL_CONTENT)?,
        category: row.get(ingredients::CATEGORY)?,
        created_at: row.get(ingredients::CREATED_AT)?,
        updated_at: row.get(ingredients::UPDATED_AT)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sqlite_prefixes_are_stripped() {
        assert_eq!(strip_sqlite_prefix("sqlite://data/mxr.db"), "data/mxr.db");
        assert_eq!(strip_sqlite_prefix("sqlite:data/mxr.db"), "data/mxr.db");
        assert_eq!(strip_sqlite_prefix("data/mxr.db"), "data/mxr.db");
    }
}
