#![forbid(unsafe_code)]

mod error;
mod items;
mod requests;
mod schema;

pub use error::StoreError;
pub use requests::*;

use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DB_FILE: &str = "deskboard.db";
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// The only component that touches the `items` table. Holding a value
/// means the schema is ready: `open` is the explicit initialization step,
/// so there is no process-wide "ready" flag to reset between tests.
#[derive(Debug)]
pub struct ItemStore {
    conn: Connection,
    storage_dir: PathBuf,
}

impl ItemStore {
    pub fn open(storage_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let storage_dir = storage_dir.as_ref().to_path_buf();
        if let Err(err) = std::fs::create_dir_all(&storage_dir) {
            return Err(StoreError::SchemaUnavailable {
                path: storage_dir,
                detail: err.to_string(),
            });
        }

        let db_path = storage_dir.join(DB_FILE);
        let conn = match Connection::open(&db_path) {
            Ok(conn) => conn,
            Err(err) => {
                return Err(StoreError::SchemaUnavailable {
                    path: db_path,
                    detail: err.to_string(),
                });
            }
        };
        conn.busy_timeout(BUSY_TIMEOUT)?;

        schema::install_schema(&conn)?;

        Ok(Self { conn, storage_dir })
    }

    pub fn storage_dir(&self) -> &Path {
        &self.storage_dir
    }

    /// Cheap reachability check for the status operation.
    pub fn probe(&self) -> Result<(), StoreError> {
        self.conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
        Ok(())
    }
}

pub(crate) fn now_ms() -> i64 {
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default();
    now.as_millis() as i64
}
