#![forbid(unsafe_code)]

mod migrations;

use super::StoreError;
use rusqlite::Connection;

/// Bring the `items` table to the superset of all columns ever shipped.
///
/// Creates the table with the first deployment generation's column set,
/// then applies each later column addition independently. Idempotent and
/// safe under concurrent cold starts: the only failure swallowed per step
/// is the benign "duplicate column name".
pub(in crate::store) fn install_schema(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        r#"
        PRAGMA journal_mode=WAL;
        PRAGMA synchronous=NORMAL;

        CREATE TABLE IF NOT EXISTS items (
          id INTEGER PRIMARY KEY,
          title TEXT NOT NULL,
          description TEXT,
          category TEXT NOT NULL
        );
        "#,
    )?;

    migrations::apply(conn)?;

    Ok(())
}
