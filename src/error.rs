use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Malformed {table} record {key}: {reason}")]
    MalformedRecord {
        table: &'static str,
        key: String,
        reason: String,
    },
}

impl StoreError {
    pub fn malformed(table: &'static str, key: impl Into<String>, reason: impl Into<String>) -> Self {
        StoreError::MalformedRecord {
            table,
            key: key.into(),
            reason: reason.into(),
        }
    }
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;
