use thiserror::Error;

/// Errors surfaced by a substrate backend.
#[derive(Debug, Error)]
pub enum SubstrateError {
    /// The backend rejected or could not complete an operation.
    #[error("substrate storage error: {0}")]
    Storage(String),

    /// A value could not be encoded for, or decoded from, the backend.
    #[error("substrate serialization error: {0}")]
    Serialization(String),
}
