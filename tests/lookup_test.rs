use std::sync::Barrier;

use mxr::db::Database;
use mxr::models::{Ingredient, NewIngredient};
use mxr::{ConstraintKind, MxrError};

fn open_database(dir: &tempfile::TempDir) -> Database {
    let db_path = dir.path().join("test.db");
    Database::new(&format!("sqlite://{}", db_path.display())).expect("Failed to create database")
}

#[test]
fn test_get_or_create_is_idempotent() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let db = open_database(&temp_dir);

    let first = db
        .get_or_create(&NewIngredient::named("Tequila"))
        .expect("Failed to create ingredient");
    let second = db
        .get_or_create(&NewIngredient::named("Tequila"))
        .expect("Failed to reuse ingredient");

    assert_eq!(first.id, second.id);

    let stats = db.catalog_stats().expect("Failed to read stats");
    assert_eq!(stats.ingredients, 1);
}

#[test]
fn test_find_lookup_does_not_create() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let db = open_database(&temp_dir);

    let missing: Option<Ingredient> = db.find_lookup("Vermouth").expect("Failed to query");
    assert!(missing.is_none());
    assert_eq!(db.catalog_stats().expect("Failed to read stats").ingredients, 0);

    db.get_or_create(&NewIngredient::named("Vermouth"))
        .expect("Failed to create ingredient");
    let found: Option<Ingredient> = db.find_lookup("Vermouth").expect("Failed to query");
    assert_eq!(found.expect("ingredient should exist").name, "Vermouth");
}

#[test]
fn test_get_or_create_keeps_first_writers_attributes() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let db = open_database(&temp_dir);

    let first = db
        .get_or_create(&NewIngredient {
            name: "Campari".to_string(),
            alcohol_content: Some(25.0),
            category: Some("Bitter".to_string()),
        })
        .expect("Failed to create ingredient");

    // A later caller with different extra attributes still gets the
    // original row back; get-or-create never mutates an existing row.
    let second = db
        .get_or_create(&NewIngredient {
            name: "Campari".to_string(),
            alcohol_content: Some(99.0),
            category: None,
        })
        .expect("Failed to reuse ingredient");

    assert_eq!(second.id, first.id);
    assert_eq!(second.alcohol_content, Some(25.0));
    assert_eq!(second.category.as_deref(), Some("Bitter"));
}

#[test]
fn test_concurrent_get_or_create_leaves_exactly_one_row() {
    const WRITERS: usize = 8;

    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let db = open_database(&temp_dir);
    let barrier = Barrier::new(WRITERS);

    let ids: Vec<i64> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..WRITERS)
            .map(|_| {
                scope.spawn(|| {
                    barrier.wait();
                    db.get_or_create(&NewIngredient::named("Lime Juice"))
                        .expect("get_or_create failed under contention")
                        .id
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().expect("writer panicked")).collect()
    });

    // Every caller observed the same single row
    assert_eq!(ids.len(), WRITERS);
    assert!(ids.windows(2).all(|pair| pair[0] == pair[1]));
    assert_eq!(db.catalog_stats().expect("Failed to read stats").ingredients, 1);
}

#[test]
fn test_direct_duplicate_insert_violates_name_uniqueness() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let db = open_database(&temp_dir);

    let insert = || -> Result<(), MxrError> {
        let conn = db.get_connection()?;
        conn.execute(
            "INSERT INTO ingredients (name, created_at, updated_at) VALUES ('Tequila', '2026-01-01T00:00:00', '2026-01-01T00:00:00')",
            [],
        )
        .map_err(MxrError::from)?;
        Ok(())
    };

    insert().expect("first insert should succeed");
    let err = insert().expect_err("second insert should break uniqueness");

    match err {
        MxrError::ConstraintViolation { kind, constraint } => {
            assert_eq!(kind, ConstraintKind::Unique);
            assert_eq!(constraint, "ingredients.name");
        },
        other => panic!("expected unique violation, got {other:?}"),
    }
}
