use std::io::Write;

use mxr::db::Database;
use mxr::loader;
use mxr::models::Ingredient;

fn open_database(dir: &tempfile::TempDir) -> Database {
    let db_path = dir.path().join("test.db");
    Database::new(&format!("sqlite://{}", db_path.display())).expect("Failed to create database")
}

fn write_csv(dir: &tempfile::TempDir, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join("drinks.csv");
    let mut file = std::fs::File::create(&path).expect("Failed to create CSV");
    file.write_all(contents.as_bytes()).expect("Failed to write CSV");
    path
}

const HEADER: &str = "idDrink,strDrink,strCategory,strGlass,strAlcoholic,strDrinkThumb,strInstructions,\
strIngredient1,strMeasure1,strIngredient2,strMeasure2,strIngredient3,strMeasure3\n";

#[test]
fn test_shared_ingredients_are_deduplicated_across_records() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let db = open_database(&temp_dir);

    let csv = format!(
        "{HEADER}\
11007,Margarita,Ordinary Drink,Cocktail glass,Alcoholic,thumb1,\"Shake with ice, strain\",\
Tequila,2 oz,Lime Juice,1 oz,,\n\
178352,Tequila Sunrise,Ordinary Drink,Highball glass,Alcoholic,thumb2,\"Build over ice, float grenadine\",\
Tequila,1.5 oz,Orange Juice,4 oz,,\n"
    );
    let path = write_csv(&temp_dir, &csv);

    let report = loader::load_csv(&db, &path).expect("Failed to load CSV");
    assert_eq!(report.drinks, 2);
    assert_eq!(report.skipped, 0);

    // Exactly one Tequila row, referenced by both drinks with distinct measurements
    let stats = db.catalog_stats().expect("Failed to read stats");
    assert_eq!(stats.drinks, 2);
    assert_eq!(stats.ingredients, 3);
    assert_eq!(stats.associations, 4);

    let tequila: Ingredient = db
        .find_lookup("Tequila")
        .expect("Failed to query")
        .expect("Tequila should exist");

    let margarita = &db.drinks_by_name("Margarita").expect("query")[0];
    let sunrise = &db.drinks_by_name("Tequila Sunrise").expect("query")[0];

    assert_eq!(
        db.ingredients(margarita).get(&tequila).expect("read"),
        Some("2 oz".to_string())
    );
    assert_eq!(
        db.ingredients(sunrise).get(&tequila).expect("read"),
        Some("1.5 oz".to_string())
    );
}

#[test]
fn test_records_missing_required_fields_are_skipped() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let db = open_database(&temp_dir);

    let csv = format!(
        "{HEADER}\
1,,Ordinary Drink,Cocktail glass,Alcoholic,thumb,No name here,Gin,1 oz,,,,\n\
2,Nameless Wonder,Ordinary Drink,Cocktail glass,Alcoholic,thumb,,Gin,1 oz,,,,\n\
3,Gimlet,Ordinary Drink,Cocktail glass,Alcoholic,thumb,Stir with lime cordial,Gin,2 oz,Lime Cordial,0.75 oz,,\n"
    );
    let path = write_csv(&temp_dir, &csv);

    let report = loader::load_csv(&db, &path).expect("Failed to load CSV");
    assert_eq!(report.drinks, 1);
    assert_eq!(report.skipped, 2);

    let stats = db.catalog_stats().expect("Failed to read stats");
    assert_eq!(stats.drinks, 1);
    assert_eq!(stats.associations, 2);
}

#[test]
fn test_blank_ingredient_measure_pairs_are_ignored() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let db = open_database(&temp_dir);

    // Ingredient without a measure and measure without an ingredient both drop
    let csv = format!(
        "{HEADER}\
5,Spritz,Ordinary Drink,Wine glass,Alcoholic,thumb,Build in glass,\
Prosecco,3 oz,Aperol,,,1 oz\n"
    );
    let path = write_csv(&temp_dir, &csv);

    let report = loader::load_csv(&db, &path).expect("Failed to load CSV");
    assert_eq!(report.drinks, 1);

    let stats = db.catalog_stats().expect("Failed to read stats");
    assert_eq!(stats.ingredients, 1);
    assert_eq!(stats.associations, 1);

    let drink = &db.drinks_by_name("Spritz").expect("query")[0];
    let entries = db.ingredients(drink).entries().expect("entries");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].0.name, "Prosecco");
    assert_eq!(entries[0].1, "3 oz");
    assert!(drink
        .data_source
        .as_deref()
        .expect("provenance recorded")
        .contains("data_source=kaggle idDrink=5"));
}
