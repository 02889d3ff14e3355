use opbridge_primitives::ProofDecodeError;

/// The error type for database operations.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    /// A database error occurred.
    #[error("database error: {0}")]
    DatabaseError(#[from] sea_orm::DbErr),
    /// A persisted merkle proof failed to decode.
    #[error("invalid merkle proof in database: {0}")]
    InvalidProof(#[from] ProofDecodeError),
    /// A persisted value failed to decode.
    #[error("invalid data in database: {0}")]
    InvalidData(String),
}
