use thiserror::Error;

pub type Result<T> = std::result::Result<T, BlobStoreError>;

#[derive(Debug, Error)]
pub enum BlobStoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Invalid blob name: {0:?}")]
    InvalidName(String),
}

impl From<sqlx::Error> for BlobStoreError {
    fn from(err: sqlx::Error) -> Self {
        BlobStoreError::Database(err.to_string())
    }
}
