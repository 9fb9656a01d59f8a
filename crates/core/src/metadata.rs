use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::address::ContentAddress;
use crate::author::AuthorId;
use crate::path::DirPath;

/// An immutable file metadata record.
///
/// One record per revision. A file's first record (the creation revision) is
/// its stable identity; every update writes a fresh record that names its
/// predecessor, and the "current" state of the file is the last record of
/// that chain. `name`, `author`, `path` and `created` are constant along a
/// chain; `last_modified`, `size` and `chunk_hashes` describe this specific
/// revision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMetadata {
    /// File name, without any separators.
    pub name: String,
    /// Identity of the creating principal.
    pub author: AuthorId,
    /// Normalized path of the containing directory.
    pub path: DirPath,
    /// When the file was created. Constant across revisions.
    pub created: DateTime<Utc>,
    /// When this revision was written.
    pub last_modified: DateTime<Utc>,
    /// Byte length of the full reassembled content of this revision.
    pub size: u64,
    /// MIME-like type, free-form.
    pub file_type: String,
    /// Content addresses of the chunks, in reassembly order. Empty only
    /// when `size` is zero.
    pub chunk_hashes: Vec<ContentAddress>,
    /// The revision this one supersedes. `None` for the creation revision.
    #[serde(default)]
    pub predecessor: Option<ContentAddress>,
}

impl FileMetadata {
    /// Encode the record for substrate storage.
    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// Decode a record fetched from the substrate.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    /// Whether this is the creation revision (the file's identity).
    #[must_use]
    pub fn is_creation(&self) -> bool {
        self.predecessor.is_none()
    }
}
