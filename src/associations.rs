//! Association mapping adapter
//!
//! Presents a drink's join rows as a plain mapping from [`Ingredient`] to a
//! measurement string, hiding the `drink_ingredients` table. Two forms exist:
//!
//! - [`IngredientMeasures`]: the staged map carried by a not-yet-inserted
//!   [`NewDrink`](crate::models::NewDrink), flushed together with the drink
//!   row in one transaction.
//! - [`IngredientMap`]: the live view bound to a persisted drink, translating
//!   every mapping operation into explicit row operations.
//!
//! Neither form ever creates or mutates ingredient rows; ingredient identity
//! always comes from the lookup registry.

use std::collections::BTreeMap;

use chrono::Utc;
use rusqlite::{params, OptionalExtension};
use tracing::debug;

use crate::db::{map_ingredient, Database};
use crate::error::{MxrError, Result};
use crate::models::Ingredient;
use crate::schema::{drink_ingredients, drinks};

/// Staged ingredient measurements for a drink that has not been inserted yet.
///
/// Keyed by ingredient id, so assigning the same ingredient twice replaces the
/// staged measurement instead of queuing a second row. This mirrors the
/// composite uniqueness the store enforces on flushed rows.
#[derive(Debug, Clone, Default)]
pub struct IngredientMeasures {
    entries: BTreeMap<i64, (Ingredient, String)>,
}

impl IngredientMeasures {
    /// Create an empty staged map
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage a measurement for an ingredient, replacing any previous staging
    /// of the same ingredient
    pub fn set(&mut self, ingredient: Ingredient, measurement: impl Into<String>) {
        self.entries.insert(ingredient.id, (ingredient, measurement.into()));
    }

    /// Read a staged measurement
    #[must_use]
    pub fn get(&self, ingredient: &Ingredient) -> Option<&str> {
        self.entries.get(&ingredient.id).map(|(_, m)| m.as_str())
    }

    /// Remove a staged entry, returning the measurement if one was staged
    pub fn remove(&mut self, ingredient: &Ingredient) -> Option<String> {
        self.entries.remove(&ingredient.id).map(|(_, m)| m)
    }

    /// Iterate staged `(ingredient, measurement)` pairs in ingredient-id order
    pub fn iter(&self) -> impl Iterator<Item = (&Ingredient, &str)> {
        self.entries.values().map(|(i, m)| (i, m.as_str()))
    }

    /// Number of staged entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing is staged
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(Ingredient, String)> for IngredientMeasures {
    fn from_iter<T: IntoIterator<Item = (Ingredient, String)>>(iter: T) -> Self {
        let mut measures = Self::new();
        for (ingredient, measurement) in iter {
            measures.set(ingredient, measurement);
        }
        measures
    }
}

/// Live mapping view over the association rows owned by one persisted drink.
///
/// Obtained from [`Database::ingredients`]. Every operation verifies the drink
/// still has a backing row and fails with
/// [`MxrError::SessionBinding`] otherwise.
pub struct IngredientMap<'a> {
    db: &'a Database,
    drink_id: i64,
}

impl<'a> IngredientMap<'a> {
    pub(crate) fn new(db: &'a Database, drink_id: i64) -> Self {
        Self { db, drink_id }
    }

    /// Id of the drink this view is bound to
    #[must_use]
    pub fn drink_id(&self) -> i64 {
        self.drink_id
    }

    fn assert_bound(&self, conn: &rusqlite::Connection) -> Result<()> {
        let exists: Option<i64> = conn
            .query_row(
                &format!("SELECT {} FROM {} WHERE {} = ?1", drinks::ID, drinks::TABLE, drinks::ID),
                params![self.drink_id],
                |row| row.get(0),
            )
            .optional()
            .map_err(MxrError::from)?;
        if exists.is_some() {
            Ok(())
        } else {
            Err(MxrError::SessionBinding(format!(
                "drink {} has no row in the store",
                self.drink_id
            )))
        }
    }

    /// Read the measurement recorded for an ingredient, if any
    pub fn get(&self, ingredient: &Ingredient) -> Result<Option<String>> {
        let conn = self.db.get_connection()?;
        self.assert_bound(&conn)?;
        let measurement = conn
            .query_row(
                &format!(
                    "SELECT {} FROM {} WHERE {} = ?1 AND {} = ?2",
                    drink_ingredients::MEASUREMENT,
                    drink_ingredients::TABLE,
                    drink_ingredients::DRINK_ID,
                    drink_ingredients::INGREDIENT_ID,
                ),
                params![self.drink_id, ingredient.id],
                |row| row.get(0),
            )
            .optional()
            .map_err(MxrError::from)?;
        Ok(measurement)
    }

    /// Assign a measurement to an ingredient.
    ///
    /// Creates the association row if the pair is new, otherwise updates the
    /// measurement in place. The (drink, ingredient) composite uniqueness
    /// guarantees a second row is never created; `created_at` is untouched on
    /// update.
    pub fn set(&self, ingredient: &Ingredient, measurement: &str) -> Result<()> {
        let conn = self.db.get_connection()?;
        self.assert_bound(&conn)?;
        let now = Utc::now().naive_utc();
        conn.execute(
            &format!(
                "INSERT INTO {} ({}, {}, {}, {}, {}) VALUES (?1, ?2, ?3, ?4, ?4)
                 ON CONFLICT ({}, {}) DO UPDATE SET {} = excluded.{}, {} = excluded.{}",
                drink_ingredients::TABLE,
                drink_ingredients::DRINK_ID,
                drink_ingredients::INGREDIENT_ID,
                drink_ingredients::MEASUREMENT,
                drink_ingredients::CREATED_AT,
                drink_ingredients::UPDATED_AT,
                drink_ingredients::DRINK_ID,
                drink_ingredients::INGREDIENT_ID,
                drink_ingredients::MEASUREMENT,
                drink_ingredients::MEASUREMENT,
                drink_ingredients::UPDATED_AT,
                drink_ingredients::UPDATED_AT,
            ),
            params![self.drink_id, ingredient.id, measurement, now],
        )
        .map_err(MxrError::from)?;
        debug!(drink_id = self.drink_id, ingredient = %ingredient.name, "measurement assigned");
        Ok(())
    }

    /// Remove an ingredient from the mapping, deleting its association row.
    /// Returns true if a row was deleted.
    pub fn remove(&self, ingredient: &Ingredient) -> Result<bool> {
        let conn = self.db.get_connection()?;
        self.assert_bound(&conn)?;
        let deleted = conn
            .execute(
                &format!(
                    "DELETE FROM {} WHERE {} = ?1 AND {} = ?2",
                    drink_ingredients::TABLE,
                    drink_ingredients::DRINK_ID,
                    drink_ingredients::INGREDIENT_ID,
                ),
                params![self.drink_id, ingredient.id],
            )
            .map_err(MxrError::from)?;
        Ok(deleted > 0)
    }

    /// All `(ingredient, measurement)` pairs for the drink, ordered by
    /// ingredient name
    pub fn entries(&self) -> Result<Vec<(Ingredient, String)>> {
        let conn = self.db.get_connection()?;
        self.assert_bound(&conn)?;
        let mut stmt = conn.prepare(&format!(
            "SELECT i.*, di.{} FROM {} di JOIN {} i ON i.{} = di.{} WHERE di.{} = ?1 ORDER BY i.{}",
            drink_ingredients::MEASUREMENT,
            drink_ingredients::TABLE,
            crate::schema::ingredients::TABLE,
            crate::schema::ingredients::ID,
            drink_ingredients::INGREDIENT_ID,
            drink_ingredients::DRINK_ID,
            crate::schema::ingredients::NAME,
        ))?;
        let rows = stmt.query_map(params![self.drink_id], |row| {
            let ingredient = map_ingredient(row)?;
            let measurement: String = row.get(drink_ingredients::MEASUREMENT)?;
            Ok((ingredient, measurement))
        })?;

        let mut entries = Vec::new();
        for entry in rows {
            entries.push(entry?);
        }
        Ok(entries)
    }

    /// Number of association rows owned by the drink
    pub fn len(&self) -> Result<usize> {
        let conn = self.db.get_connection()?;
        self.assert_bound(&conn)?;
        let count: i64 = conn.query_row(
            &format!(
                "SELECT COUNT(*) FROM {} WHERE {} = ?1",
                drink_ingredients::TABLE,
                drink_ingredients::DRINK_ID,
            ),
            params![self.drink_id],
            |row| row.get(0),
        )?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    /// True if the drink has no association rows
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn ingredient(id: i64, name: &str) -> Ingredient {
        let now = Utc::now().naive_utc();
        Ingredient {
            id,
            name: name.to_string(),
            alcohol_content: None,
            category: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn staged_map_replaces_on_reassignment() {
        let mut measures = IngredientMeasures::new();
        let tequila = ingredient(1, "Tequila");
        measures.set(tequila.clone(), "2 oz");
        measures.set(tequila.clone(), "3 oz");

        assert_eq!(measures.len(), 1);
        assert_eq!(measures.get(&tequila), Some("3 oz"));
    }

    #[test]
    fn staged_map_remove_returns_measurement() {
        let mut measures = IngredientMeasures::new();
        let lime = ingredient(2, "Lime Juice");
        measures.set(lime.clone(), "1 oz");

        assert_eq!(measures.remove(&lime), Some("1 oz".to_string()));
        assert!(measures.is_empty());
        assert_eq!(measures.remove(&lime), None);
    }

    #[test]
    fn staged_map_collects_from_iterator() {
        let measures: IngredientMeasures = vec![
            (ingredient(1, "Tequila"), "2 oz".to_string()),
            (ingredient(2, "Lime Juice"), "1 oz".to_string()),
            (ingredient(1, "Tequila"), "1.5 oz".to_string()),
        ]
        .into_iter()
        .collect();

        assert_eq!(measures.len(), 2);
        assert_eq!(measures.get(&ingredient(1, "Tequila")), Some("1.5 oz"));
    }
}
