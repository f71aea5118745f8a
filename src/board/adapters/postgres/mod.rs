//! `PostgreSQL` adapters for board persistence.

mod connect;
mod models;
mod provision;
mod schema;
mod side_effects;
mod store;

pub use connect::{PgPool, build_pool};
pub use provision::{CREATE_SCHEMA_SQL, ensure_schema, seed_categories, seed_default_categories};
pub use store::PostgresTaskStore;
