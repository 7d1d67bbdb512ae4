use thiserror::Error;

/// Errors that can occur within the catalog store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A SQLite operation failed.
    #[error("Database error: {0}")]
    Database(rusqlite::Error),

    /// A table the query needs has not been created yet.
    #[error("Table does not exist: {0}")]
    MissingTable(String),

    /// A thread panicked while holding the connection.
    #[error("Store connection lock poisoned")]
    Poisoned,
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(_, Some(msg)) = &e {
            if let Some(table) = msg.strip_prefix("no such table: ") {
                return StoreError::MissingTable(table.to_string());
            }
        }
        StoreError::Database(e)
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
