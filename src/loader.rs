//! Bulk CSV ingestion
//!
//! Loads the Kaggle cocktail-ingredients export
//! (<https://www.kaggle.com/datasets/ai-first/cocktail-ingredients>) into the
//! catalog. Each CSV record becomes one drink, committed in its own
//! transaction; ingredient names resolve through the lookup registry so a
//! name shared by many records still produces a single ingredient row.

use std::collections::HashMap;
use std::path::Path;

use tracing::{info, warn};

use crate::associations::IngredientMeasures;
use crate::db::Database;
use crate::error::Result;
use crate::metrics;
use crate::models::{NewDrink, NewIngredient};

/// The Kaggle export numbers its ingredient/measure column pairs 1..=15.
const INGREDIENT_COLUMNS: usize = 15;

/// Outcome of a bulk load
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadReport {
    /// Drinks created
    pub drinks: usize,
    /// Records skipped for missing required fields
    pub skipped: usize,
}

/// Load a Kaggle cocktail CSV into the catalog.
///
/// Records without a drink name or preparation instructions are skipped with
/// a warning. Ingredient/measure pairs where either side is blank are ignored,
/// matching the source data's ragged trailing columns.
pub fn load_csv(db: &Database, path: &Path) -> Result<LoadReport> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut report = LoadReport::default();

    for record in reader.deserialize::<HashMap<String, String>>() {
        let row = record?;

        let Some(name) = non_blank(&row, "strDrink") else {
            warn!("skipping record without a drink name");
            report.skipped += 1;
            continue;
        };
        let Some(preparation) = non_blank(&row, "strInstructions") else {
            warn!(drink = name, "skipping record without preparation instructions");
            report.skipped += 1;
            continue;
        };

        let mut measures = IngredientMeasures::new();
        for num in 1..=INGREDIENT_COLUMNS {
            let ingredient_name = non_blank(&row, &format!("strIngredient{num}"));
            let measurement = non_blank(&row, &format!("strMeasure{num}"));
            let (Some(ingredient_name), Some(measurement)) = (ingredient_name, measurement) else {
                continue;
            };
            let ingredient = db.get_or_create(&NewIngredient::named(ingredient_name))?;
            measures.set(ingredient, measurement);
        }

        let new_drink = NewDrink {
            name: name.to_string(),
            preparation: preparation.to_string(),
            drink_type: non_blank(&row, "strCategory").map(str::to_string),
            glass: non_blank(&row, "strGlass").map(str::to_string),
            data_source: Some(provenance(&row)),
            ingredients: measures,
            ..NewDrink::default()
        };
        db.add_drink(&new_drink)?;
        report.drinks += 1;
    }

    metrics::drinks_loaded(report.drinks);
    info!(drinks = report.drinks, skipped = report.skipped, "bulk load complete");
    Ok(report)
}

/// Trimmed, non-empty field value
fn non_blank<'a>(row: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    row.get(key).map(|v| v.trim()).filter(|v| !v.is_empty())
}

/// Provenance string recording where the record came from
fn provenance(row: &HashMap<String, String>) -> String {
    format!(
        "data_source=kaggle idDrink={} strDrinkThumb={} strAlcoholic={}",
        non_blank(row, "idDrink").unwrap_or(""),
        non_blank(row, "strDrinkThumb").unwrap_or(""),
        non_blank(row, "strAlcoholic").unwrap_or(""),
    )
}
