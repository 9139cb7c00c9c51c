//! Lookup registry
//!
//! Generic get-or-create over lookup tables: reference entities uniquely
//! identified by a `name` column. [`Ingredient`] is the one lookup table
//! today; any future one implements the same trait pair and inherits the
//! race handling unchanged.
//!
//! The store's name uniqueness constraint is the only concurrency control.
//! `get_or_create` never takes a lock: it reads, inserts on a miss, and if the
//! insert loses a race to a concurrent writer it absorbs the unique violation
//! with a single fresh re-read. Exactly one row per name can ever exist, and
//! every caller ends up holding that row.

use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::info;

use crate::db::{map_ingredient, Database};
use crate::error::{MxrError, Result};
use crate::metrics;
use crate::models::{Ingredient, NewIngredient};
use crate::schema::ingredients;

/// A persisted lookup-table row, uniquely identified by name.
pub trait LookupRecord: Sized {
    /// Table the records live in
    const TABLE: &'static str;
    /// Constraint identifier SQLite reports when the name uniqueness breaks
    const NAME_CONSTRAINT: &'static str;

    /// Map a database row to the record
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;
}

/// Insert-side data for a lookup record.
pub trait NewLookupRecord {
    /// The persisted record type this creates
    type Record: LookupRecord;

    /// The dedup key
    fn name(&self) -> &str;

    /// Execute the INSERT for this record. Runs as a single autocommitted
    /// statement so the row is durable before `get_or_create` returns.
    fn insert(&self, conn: &Connection) -> rusqlite::Result<()>;
}

impl Database {
    /// Find a lookup record by name. Does not create.
    pub fn find_lookup<R: LookupRecord>(&self, name: &str) -> Result<Option<R>> {
        let conn = self.get_connection()?;
        conn.query_row(
            &format!("SELECT * FROM {} WHERE name = ?1", R::TABLE),
            params![name],
            R::from_row,
        )
        .optional()
        .map_err(MxrError::from)
    }

    /// Return the lookup record with the given name, creating it if absent.
    ///
    /// Safe for any number of concurrent callers requesting the same name:
    /// check-then-insert is racy, so a unique violation on the name constraint
    /// is treated as "a concurrent writer won" and answered with one fresh
    /// re-read. If that re-read still finds nothing the original violation
    /// propagates; that indicates the row vanished between the two steps,
    /// which is not a normal contention outcome.
    pub fn get_or_create<N: NewLookupRecord>(&self, new: &N) -> Result<N::Record> {
        if let Some(existing) = self.find_lookup::<N::Record>(new.name())? {
            metrics::lookup_hit(N::Record::TABLE);
            return Ok(existing);
        }

        let insert_result = {
            let conn = self.get_connection()?;
            new.insert(&conn).map_err(MxrError::from)
        };

        match insert_result {
            Ok(()) => {
                metrics::lookup_created(N::Record::TABLE);
                self.find_lookup(new.name())?
                    .ok_or_else(|| MxrError::NotFound(format!("{} {:?} after insert", N::Record::TABLE, new.name())))
            },
            Err(err) if err.is_unique_violation_of(N::Record::NAME_CONSTRAINT) => {
                // Lost the race; the winner's row must be visible to a fresh read.
                info!(table = N::Record::TABLE, name = new.name(), "duplicate lookup insert, reusing existing row");
                metrics::lookup_race(N::Record::TABLE);
                match self.find_lookup(new.name())? {
                    Some(existing) => Ok(existing),
                    None => Err(err),
                }
            },
            Err(err) => Err(err),
        }
    }
}

impl LookupRecord for Ingredient {
    const TABLE: &'static str = ingredients::TABLE;
    const NAME_CONSTRAINT: &'static str = ingredients::NAME_CONSTRAINT;

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        map_ingredient(row)
    }
}

impl NewLookupRecord for NewIngredient {
    type Record = Ingredient;

    fn name(&self) -> &str {
        &self.name
    }

    fn insert(&self, conn: &Connection) -> rusqlite::Result<()> {
        let now = chrono::Utc::now().naive_utc();
        conn.execute(
            &format!(
                "INSERT INTO {} ({}, {}, {}, {}, {}) VALUES (?1, ?2, ?3, ?4, ?4)",
                ingredients::TABLE,
                ingredients::NAME,
                ingredients::ALCOHOL_CONTENT,
                ingredients::CATEGORY,
                ingredients::CREATED_AT,
                ingredients::UPDATED_AT,
            ),
            params![self.name, self.alcohol_content, self.category, now],
        )?;
        Ok(())
    }
}
