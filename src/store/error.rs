//! Document Store Errors
//!
//! Error types for document store operations.

/// Errors that can occur in the document store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Store could not be reached
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// Caller is not allowed to write the document
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Patch cannot be applied to the stored document
    #[error("Invalid merge patch: {0}")]
    InvalidPatch(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Postgres SQLSTATE for insufficient_privilege
const INSUFFICIENT_PRIVILEGE: &str = "42501";

impl StoreError {
    /// Map raw database errors onto the store taxonomy
    pub fn classified(self) -> Self {
        match self {
            StoreError::Database(sqlx::Error::Io(e)) => StoreError::Unavailable(e.to_string()),
            StoreError::Database(sqlx::Error::PoolTimedOut) => {
                StoreError::Unavailable("connection pool timed out".to_string())
            }
            StoreError::Database(sqlx::Error::PoolClosed) => {
                StoreError::Unavailable("connection pool closed".to_string())
            }
            StoreError::Database(sqlx::Error::Database(db))
                if db.code().as_deref() == Some(INSUFFICIENT_PRIVILEGE) =>
            {
                StoreError::PermissionDenied(db.message().to_string())
            }
            other => other,
        }
    }
}
