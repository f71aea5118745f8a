//! Schema provisioning and seed data.
//!
//! The DDL lives in `migrations/` and is embedded at compile time. Every
//! statement is idempotent (`CREATE TABLE IF NOT EXISTS`, `ON CONFLICT DO
//! NOTHING`), so provisioning runs unconditionally on each process start.

use super::connect::{PgPool, get_conn};
use super::schema::categories;
use crate::board::domain::{CategoryId, DEFAULT_CATEGORY_NAMES};
use crate::board::ports::{StoreError, StoreResult};
use diesel::connection::SimpleConnection;
use diesel::prelude::*;

/// DDL for the three board relations and their indices.
pub const CREATE_SCHEMA_SQL: &str =
    include_str!("../../../../migrations/2026-08-20-000000_create_board_tables/up.sql");

/// Idempotently creates the board relations, constraints, and indices.
///
/// # Errors
///
/// Returns a connectivity error when no connection is available, or a
/// persistence error when the DDL fails.
pub fn ensure_schema(pool: &PgPool) -> StoreResult<()> {
    let mut conn = get_conn(pool)?;
    conn.batch_execute(CREATE_SCHEMA_SQL)
        .map_err(StoreError::persistence)?;
    tracing::info!("board schema provisioned");
    Ok(())
}

/// Seeds the fixed default category names; already-present names are
/// silently skipped.
///
/// # Errors
///
/// Returns a connectivity error when no connection is available, or a
/// persistence error when the insert fails.
pub fn seed_default_categories(pool: &PgPool) -> StoreResult<usize> {
    let inserted = seed_categories(pool, &DEFAULT_CATEGORY_NAMES)?.len();
    tracing::info!(
        inserted,
        seeded = DEFAULT_CATEGORY_NAMES.len(),
        "default categories seeded"
    );
    Ok(inserted)
}

/// Inserts categories by name, silently skipping names already present.
///
/// Returns the identifiers of the rows actually inserted; skipped names do
/// not appear.
///
/// # Errors
///
/// Returns a connectivity error when no connection is available, or a
/// persistence error when the insert fails.
pub fn seed_categories(pool: &PgPool, names: &[&str]) -> StoreResult<Vec<CategoryId>> {
    let mut conn = get_conn(pool)?;
    let rows: Vec<_> = names
        .iter()
        .map(|name| categories::name.eq(*name))
        .collect();
    let ids: Vec<i64> = diesel::insert_into(categories::table)
        .values(&rows)
        .on_conflict(categories::name)
        .do_nothing()
        .returning(categories::id)
        .get_results(&mut conn)
        .map_err(StoreError::persistence)?;
    Ok(ids.into_iter().map(CategoryId::from_inner).collect())
}
