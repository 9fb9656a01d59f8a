use thiserror::Error;

use driftfs_core::{ContentAddress, PathError};
use driftfs_substrate::SubstrateError;

/// Errors surfaced by [`FileStore`](crate::FileStore) operations.
///
/// Validation failures (`InvalidPath`, `EmptyName`, `InvalidName`,
/// `DuplicatePath`) are detected before any write occurs. `NotFound` covers
/// both unknown identities and chains that have been deleted. Substrate
/// failures are surfaced as-is; the engine keeps no durable queue to retry
/// against.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The path failed normalization or validation.
    #[error("invalid path: {0}")]
    InvalidPath(#[from] PathError),

    /// The file name is empty.
    #[error("file name cannot be empty")]
    EmptyName,

    /// The file name contains a separator or forbidden character.
    #[error("invalid file name: {0:?}")]
    InvalidName(String),

    /// A live file with this name already exists at the path.
    #[error("a file named {name:?} already exists at {path}")]
    DuplicatePath {
        /// Normalized directory path.
        path: String,
        /// The conflicting file name.
        name: String,
    },

    /// The address is unknown, or its chain has been deleted.
    #[error("file not found: {0}")]
    NotFound(ContentAddress),

    /// No live file with this name exists at the path.
    #[error("no file named {name:?} at {path}")]
    NameNotFound {
        /// Normalized directory path.
        path: String,
        /// The requested file name.
        name: String,
    },

    /// A stored record could not be decoded.
    #[error("corrupt record at {address}: {reason}")]
    Corrupt {
        /// Address of the undecodable record.
        address: ContentAddress,
        /// Decoder diagnostic.
        reason: String,
    },

    /// The substrate rejected or could not complete an operation.
    #[error("substrate error: {0}")]
    Substrate(#[from] SubstrateError),
}

impl StoreError {
    /// Whether this error means the referenced file does not exist
    /// (either kind of lookup miss).
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::NameNotFound { .. })
    }
}
