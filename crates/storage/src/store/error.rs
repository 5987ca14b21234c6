#![forbid(unsafe_code)]

use dk_core::lifecycle::LifecycleError;
use std::path::PathBuf;

#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    Sql(rusqlite::Error),
    InvalidInput(&'static str),
    Lifecycle(LifecycleError),
    DuplicateId { id: i64 },
    UnknownId,
    /// SQLITE_BUSY after the busy timeout; retryable.
    Unavailable,
    /// The database itself could not be opened — a configuration problem,
    /// not an "already applied" schema condition.
    SchemaUnavailable { path: PathBuf, detail: String },
}

impl StoreError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Io(_) => "IO",
            Self::Sql(_) => "SQL",
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::Lifecycle(err) => err.code(),
            Self::DuplicateId { .. } => "DUPLICATE_ID",
            Self::UnknownId => "NOT_FOUND",
            Self::Unavailable => "STORE_UNAVAILABLE",
            Self::SchemaUnavailable { .. } => "SCHEMA_UNAVAILABLE",
        }
    }
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "io: {err}"),
            Self::Sql(err) => write!(f, "sqlite: {err}"),
            Self::InvalidInput(message) => write!(f, "invalid input: {message}"),
            Self::Lifecycle(err) => write!(f, "{err}"),
            Self::DuplicateId { id } => write!(f, "item id {id} already exists"),
            Self::UnknownId => write!(f, "unknown id"),
            Self::Unavailable => write!(f, "storage busy; retry"),
            Self::SchemaUnavailable { path, detail } => {
                write!(f, "database unavailable at {}: {detail}", path.display())
            }
        }
    }
}

impl std::error::Error for StoreError {}

impl From<std::io::Error> for StoreError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        if is_busy(&value) {
            return Self::Unavailable;
        }
        Self::Sql(value)
    }
}

impl From<LifecycleError> for StoreError {
    fn from(value: LifecycleError) -> Self {
        Self::Lifecycle(value)
    }
}

fn is_busy(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(failure, _)
            if matches!(
                failure.code,
                rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked
            )
    )
}

/// Classifier for insert failures: only the `items.id` primary-key
/// violation becomes `DuplicateId`; everything else keeps its own shape.
pub(crate) fn classify_insert_error(err: rusqlite::Error, id: i64) -> StoreError {
    if let rusqlite::Error::SqliteFailure(failure, Some(message)) = &err
        && failure.code == rusqlite::ErrorCode::ConstraintViolation
        && message.contains("items.id")
    {
        return StoreError::DuplicateId { id };
    }
    StoreError::from(err)
}
