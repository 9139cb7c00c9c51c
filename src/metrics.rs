//! Metrics collection
//!
//! Counter names and recording helpers for catalog operations. A recorder is
//! installed (or not) by the host application; without one these are no-ops.

/// Lookup registry fast-path hits (row already existed)
pub const LOOKUP_HITS_TOTAL: &str = "mxr_lookup_hits_total";
/// Lookup registry rows created
pub const LOOKUP_CREATED_TOTAL: &str = "mxr_lookup_created_total";
/// Lookup inserts that lost a concurrency race and reused the winner's row
pub const LOOKUP_RACES_TOTAL: &str = "mxr_lookup_races_total";
/// Drinks inserted
pub const DRINKS_INSERTED_TOTAL: &str = "mxr_drinks_inserted_total";
/// Drinks deleted
pub const DRINKS_DELETED_TOTAL: &str = "mxr_drinks_deleted_total";
/// Drinks created by the bulk loader
pub const DRINKS_LOADED_TOTAL: &str = "mxr_drinks_loaded_total";

/// Record a lookup fast-path hit
pub fn lookup_hit(table: &'static str) {
    ::metrics::counter!(LOOKUP_HITS_TOTAL, "table" => table).increment(1);
}

/// Record a lookup row creation
pub fn lookup_created(table: &'static str) {
    ::metrics::counter!(LOOKUP_CREATED_TOTAL, "table" => table).increment(1);
}

/// Record a lost lookup insert race
pub fn lookup_race(table: &'static str) {
    ::metrics::counter!(LOOKUP_RACES_TOTAL, "table" => table).increment(1);
}

/// Record a drink insert
pub fn drink_inserted() {
    ::metrics::counter!(DRINKS_INSERTED_TOTAL).increment(1);
}

/// Record a drink deletion
pub fn drink_deleted() {
    ::metrics::counter!(DRINKS_DELETED_TOTAL).increment(1);
}

/// Record drinks created by a bulk load
pub fn drinks_loaded(count: usize) {
    ::metrics::counter!(DRINKS_LOADED_TOTAL).increment(count as u64);
}
