#![forbid(unsafe_code)]

use super::super::StoreError;
use rusqlite::Connection;

// Column additions by deployment generation. Additive-only: nothing is
// ever dropped or renamed, so rows written by any generation stay
// readable (absent columns read as NULL/default).
pub(super) fn apply(conn: &Connection) -> Result<(), StoreError> {
    add_column_if_missing(conn, "items", "service_type", "TEXT")?;
    add_column_if_missing(conn, "items", "urgency", "TEXT NOT NULL DEFAULT 'normal'")?;
    add_column_if_missing(conn, "items", "scheduled_at_ms", "INTEGER")?;
    add_column_if_missing(conn, "items", "created_at_ms", "INTEGER")?;
    add_column_if_missing(conn, "items", "completed_by", "TEXT")?;
    add_column_if_missing(conn, "items", "completed_at_ms", "INTEGER")?;
    Ok(())
}

fn add_column_if_missing(
    conn: &Connection,
    table: &str,
    column: &str,
    decl: &str,
) -> Result<(), StoreError> {
    let sql = format!("ALTER TABLE {table} ADD COLUMN {column} {decl}");
    match conn.execute(&sql, []) {
        Ok(_) => Ok(()),
        Err(err) if is_duplicate_column(&err) => Ok(()),
        Err(err) => Err(StoreError::from(err)),
    }
}

fn is_duplicate_column(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(_, Some(message)) => {
            message.contains("duplicate column name")
        }
        _ => false,
    }
}
