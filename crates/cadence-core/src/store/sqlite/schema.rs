//! Database schema initialization.

use rusqlite::Connection;

use crate::error::{DatabaseResultExt, Result};

/// Creates any missing tables from the embedded SQL file.
pub(super) fn initialize_schema(connection: &Connection) -> Result<()> {
    let schema_sql = include_str!("../../../assets/schema.sql");
    connection
        .execute_batch(schema_sql)
        .db_context("Failed to initialize database schema")
}
