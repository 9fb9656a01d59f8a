//! The public operation surface of the file store.

use std::collections::HashSet;
use std::sync::Arc;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument};

use driftfs_core::{AuthorId, ContentAddress, DirPath, FileMetadata};
use driftfs_substrate::{Substrate, SubstrateError};

use crate::chain::{ChainWalker, Revision};
use crate::chunk;
use crate::error::StoreError;
use crate::index::PathIndex;
use crate::link::LinkKind;

/// Request payload for creating a file.
#[derive(Debug, Clone)]
pub struct CreateFileRequest {
    /// File name; must be non-empty and contain no separators.
    pub name: String,
    /// Raw directory path; normalized by the store.
    pub path: String,
    /// MIME-like type, free-form.
    pub file_type: String,
    /// Identity of the creating principal.
    pub author: AuthorId,
    /// Full file content.
    pub content: Bytes,
}

/// A stored chunk: its content address and bytes.
#[derive(Debug, Clone)]
pub struct ChunkRecord {
    /// Content address of the chunk.
    pub address: ContentAddress,
    /// The chunk bytes.
    pub data: Bytes,
}

/// Outcome of a create or update: the new metadata revision plus the chunk
/// records written for it, in reassembly order.
#[derive(Debug, Clone)]
pub struct StoredFile {
    /// The metadata revision that was written.
    pub file: Revision,
    /// The chunk records backing it, in order.
    pub chunks: Vec<ChunkRecord>,
}

/// Receipt returned by [`FileStore::delete_file`].
#[derive(Debug, Clone)]
pub struct DeletionReceipt {
    /// Identity (creation revision) address of the deleted file.
    pub identity: ContentAddress,
    /// Number of metadata revisions retracted.
    pub revisions_removed: usize,
    /// Number of live chunk records retracted.
    pub chunks_removed: usize,
    /// When the teardown completed.
    pub deleted_at: DateTime<Utc>,
}

/// Chunked, content-addressed file store over a replicated substrate.
///
/// Composes the chunker, the path index and the update-chain walker. All
/// validation happens before any write. The write order for create and
/// update is chunks, then metadata, then index/link bookkeeping: every
/// cross-record reference is by content address, so a reader that can see a
/// metadata record is guaranteed the chunk addresses it names are the
/// correct, immutable ones for that revision. A failed multi-step write
/// leaves at worst unreferenced chunks behind, which are inert.
///
/// The duplicate-path admission check is advisory: each writer consults its
/// own (possibly stale) view of the index, so uniqueness is best-effort
/// under concurrent creation across peers, not linearizable.
pub struct FileStore {
    substrate: Arc<dyn Substrate>,
    index: PathIndex,
    chains: ChainWalker,
}

impl FileStore {
    /// Create a file store over the given substrate.
    pub fn new(substrate: Arc<dyn Substrate>) -> Self {
        Self {
            index: PathIndex::new(Arc::clone(&substrate)),
            chains: ChainWalker::new(Arc::clone(&substrate)),
            substrate,
        }
    }

    /// Create a new file.
    ///
    /// Fails `EmptyName`/`InvalidName`/`InvalidPath` before touching the
    /// substrate, and `DuplicatePath` if a live file with the same name
    /// already exists in the directory.
    #[instrument(skip(self, request), fields(name = %request.name, path = %request.path))]
    pub async fn create_file(&self, request: CreateFileRequest) -> Result<StoredFile, StoreError> {
        validate_name(&request.name)?;
        let path = DirPath::parse(&request.path)?;

        if self.find_live_by_name(&path, &request.name).await?.is_some() {
            return Err(StoreError::DuplicatePath {
                path: path.as_str().to_owned(),
                name: request.name,
            });
        }

        let chunks = self.write_chunks(&request.content).await?;
        let now = Utc::now();
        let metadata = FileMetadata {
            name: request.name,
            author: request.author,
            path: path.clone(),
            created: now,
            last_modified: now,
            size: request.content.len() as u64,
            file_type: request.file_type,
            chunk_hashes: chunks.iter().map(|c| c.address).collect(),
            predecessor: None,
        };
        let address = self.put_metadata(&metadata).await?;
        self.index.insert(&path, &address).await?;

        info!(%address, size = metadata.size, "created file");
        Ok(StoredFile {
            file: Revision { address, metadata },
            chunks,
        })
    }

    /// Current metadata of the file identified by `address`.
    ///
    /// `address` may be the identity, the current head, or any intermediate
    /// revision of the chain.
    pub async fn get_file_metadata(&self, address: ContentAddress) -> Result<Revision, StoreError> {
        self.chains.resolve_head(address).await
    }

    /// Ordered chunk bytes of the file's current revision.
    pub async fn get_file_chunks(&self, address: ContentAddress) -> Result<Vec<Bytes>, StoreError> {
        let head = self.chains.resolve_head(address).await?;
        let mut chunks = Vec::with_capacity(head.metadata.chunk_hashes.len());
        for hash in &head.metadata.chunk_hashes {
            let data = self
                .substrate
                .get(hash)
                .await?
                .ok_or(StoreError::NotFound(*hash))?;
            chunks.push(data);
        }
        Ok(chunks)
    }

    /// Full reassembled content of the file's current revision.
    pub async fn read_file(&self, address: ContentAddress) -> Result<Bytes, StoreError> {
        Ok(chunk::join(&self.get_file_chunks(address).await?))
    }

    /// Current metadata of every live file at `path` or any descendant.
    #[instrument(skip(self))]
    pub async fn get_files_metadata_by_path_recursively(
        &self,
        path: &str,
    ) -> Result<Vec<Revision>, StoreError> {
        let path = DirPath::parse(path)?;
        let identities = self.index.list_recursive(&path).await?;
        self.resolve_live(identities).await
    }

    /// Current metadata of every live file directly at `path`.
    pub async fn get_files_metadata_by_path(&self, path: &str) -> Result<Vec<Revision>, StoreError> {
        let path = DirPath::parse(path)?;
        let identities = self.index.list(&path).await?;
        self.resolve_live(identities).await
    }

    /// Look up a file's current metadata by directory and name.
    pub async fn get_file_metadata_by_path_and_name(
        &self,
        path: &str,
        name: &str,
    ) -> Result<Revision, StoreError> {
        let path = DirPath::parse(path)?;
        self.find_live_by_name(&path, name)
            .await?
            .ok_or_else(|| StoreError::NameNotFound {
                path: path.as_str().to_owned(),
                name: name.to_owned(),
            })
    }

    /// Replace the file's content with a new immutable revision.
    ///
    /// Identity fields (`name`, `author`, `path`, `created`, `file_type`)
    /// carry over; `last_modified`, `size` and `chunk_hashes` are
    /// recomputed. Chunks of the superseded revision that the new revision
    /// no longer references are retracted.
    #[instrument(skip(self, content), fields(%address, size = content.len()))]
    pub async fn update_file(
        &self,
        address: ContentAddress,
        content: Bytes,
    ) -> Result<StoredFile, StoreError> {
        let head = self.chains.resolve_head(address).await?;

        let chunks = self.write_chunks(&content).await?;
        let metadata = FileMetadata {
            name: head.metadata.name.clone(),
            author: head.metadata.author.clone(),
            path: head.metadata.path.clone(),
            created: head.metadata.created,
            last_modified: Utc::now(),
            size: content.len() as u64,
            file_type: head.metadata.file_type.clone(),
            chunk_hashes: chunks.iter().map(|c| c.address).collect(),
            predecessor: Some(head.address),
        };
        let new_address = self.put_metadata(&metadata).await?;
        self.substrate
            .link(&head.address, &new_address, &LinkKind::Revision.tag())
            .await?;

        // The superseded chunk set is unreachable through any revision the
        // store will still serve; shared addresses survive.
        let kept: HashSet<ContentAddress> = metadata.chunk_hashes.iter().copied().collect();
        for old in &head.metadata.chunk_hashes {
            if !kept.contains(old) {
                self.substrate.retract(old).await?;
            }
        }

        debug!(%new_address, "updated file");
        Ok(StoredFile {
            file: Revision {
                address: new_address,
                metadata,
            },
            chunks,
        })
    }

    /// Tear down the entire chain: every revision, every chunk set, and the
    /// path association anchored at the creation revision.
    ///
    /// The chain is fully enumerated before anything is removed. Terminal: a
    /// second delete of the same identity fails `NotFound`, and a new file
    /// created at the same path later is a fresh identity.
    #[instrument(skip(self), fields(%address))]
    pub async fn delete_file(&self, address: ContentAddress) -> Result<DeletionReceipt, StoreError> {
        let revisions = self.chains.collect(address).await?;
        let Some(origin) = revisions.first() else {
            return Err(StoreError::NotFound(address));
        };
        let identity = origin.address;

        self.index.remove(&origin.metadata.path, &identity).await?;

        let mut chunk_set = HashSet::new();
        for revision in &revisions {
            chunk_set.extend(revision.metadata.chunk_hashes.iter().copied());
        }
        let mut chunks_removed = 0;
        for chunk_hash in &chunk_set {
            if self.substrate.retract(chunk_hash).await? {
                chunks_removed += 1;
            }
        }
        for revision in &revisions {
            self.substrate.retract(&revision.address).await?;
        }

        info!(%identity, revisions = revisions.len(), "deleted file");
        Ok(DeletionReceipt {
            identity,
            revisions_removed: revisions.len(),
            chunks_removed,
            deleted_at: Utc::now(),
        })
    }

    /// Split, store and record the content's chunks, in order.
    async fn write_chunks(&self, content: &[u8]) -> Result<Vec<ChunkRecord>, StoreError> {
        let mut records = Vec::new();
        for data in chunk::split(content) {
            let address = self.substrate.put(data.clone()).await?;
            records.push(ChunkRecord { address, data });
        }
        Ok(records)
    }

    async fn put_metadata(&self, metadata: &FileMetadata) -> Result<ContentAddress, StoreError> {
        let bytes = metadata
            .to_bytes()
            .map_err(|e| SubstrateError::Serialization(e.to_string()))?;
        Ok(self.substrate.put(Bytes::from(bytes)).await?)
    }

    /// Resolve identities to current revisions, skipping chains that are
    /// already dead but whose index association has not been removed yet.
    async fn resolve_live(
        &self,
        identities: Vec<ContentAddress>,
    ) -> Result<Vec<Revision>, StoreError> {
        let mut live = Vec::with_capacity(identities.len());
        for identity in identities {
            match self.chains.resolve_head(identity).await {
                Ok(revision) => live.push(revision),
                Err(StoreError::NotFound(_)) => {}
                Err(e) => return Err(e),
            }
        }
        Ok(live)
    }

    async fn find_live_by_name(
        &self,
        path: &DirPath,
        name: &str,
    ) -> Result<Option<Revision>, StoreError> {
        for identity in self.index.list(path).await? {
            match self.chains.resolve_head(identity).await {
                Ok(revision) if revision.metadata.name == name => return Ok(Some(revision)),
                Ok(_) | Err(StoreError::NotFound(_)) => {}
                Err(e) => return Err(e),
            }
        }
        Ok(None)
    }
}

/// Validate a file name: non-empty, no separators, no forbidden characters.
fn validate_name(name: &str) -> Result<(), StoreError> {
    if name.is_empty() {
        return Err(StoreError::EmptyName);
    }
    if name
        .chars()
        .any(|c| matches!(c, '/' | '\\') || !DirPath::is_allowed_char(c))
    {
        return Err(StoreError::InvalidName(name.to_owned()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_validation() {
        assert!(validate_name("test.txt").is_ok());
        assert!(validate_name("with space.txt").is_ok());
        assert!(matches!(validate_name(""), Err(StoreError::EmptyName)));
        assert!(matches!(
            validate_name("a/b.txt"),
            Err(StoreError::InvalidName(_))
        ));
        assert!(matches!(
            validate_name("what?.txt"),
            Err(StoreError::InvalidName(_))
        ));
    }
}
