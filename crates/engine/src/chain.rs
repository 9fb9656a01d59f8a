//! Update-chain resolution over immutable metadata records.
//!
//! A file that looks mutable to callers is really a chain of immutable
//! revisions: the creation record is the file's identity, each update
//! appends a record naming its predecessor, and a forward `revision` link in
//! the substrate points from each revision to its successor. Resolving the
//! "current" file means walking those links to the tail.

use std::collections::HashSet;
use std::sync::Arc;

use driftfs_core::{ContentAddress, FileMetadata};
use driftfs_substrate::Substrate;

use crate::error::StoreError;
use crate::link::LinkKind;

/// A revision of a file: its record address plus the decoded metadata.
#[derive(Debug, Clone)]
pub struct Revision {
    /// Content address of the metadata record.
    pub address: ContentAddress,
    /// The decoded record.
    pub metadata: FileMetadata,
}

/// Walks update chains stored as `revision` links between immutable records.
pub(crate) struct ChainWalker {
    substrate: Arc<dyn Substrate>,
}

impl ChainWalker {
    pub(crate) fn new(substrate: Arc<dyn Substrate>) -> Self {
        Self { substrate }
    }

    /// Fetch and decode the metadata record at `address`.
    ///
    /// `NotFound` covers both never-written and retracted records, which is
    /// how a deleted chain surfaces to callers.
    async fn fetch(&self, address: ContentAddress) -> Result<FileMetadata, StoreError> {
        let bytes = self
            .substrate
            .get(&address)
            .await?
            .ok_or(StoreError::NotFound(address))?;
        FileMetadata::from_bytes(&bytes).map_err(|e| StoreError::Corrupt {
            address,
            reason: e.to_string(),
        })
    }

    /// Resolve the current revision of the chain containing `address`.
    ///
    /// Accepts the identity address, the current head, or any intermediate
    /// revision; all resolve to the same head. If several successor links
    /// exist, the most recently created one wins. The visited set guards
    /// against link cycles a buggy or malicious peer could introduce.
    pub(crate) async fn resolve_head(
        &self,
        address: ContentAddress,
    ) -> Result<Revision, StoreError> {
        let tag = LinkKind::Revision.tag();
        let mut visited = HashSet::new();
        let mut current = address;
        while visited.insert(current) {
            match self.substrate.links(&current, &tag).await?.last() {
                Some(next) => current = *next,
                None => break,
            }
        }
        let metadata = self.fetch(current).await?;
        Ok(Revision {
            address: current,
            metadata,
        })
    }

    /// Enumerate every revision of the chain containing `address`, from the
    /// creation record to the head.
    ///
    /// The enumeration is complete before the caller tears anything down,
    /// which is what makes cascading deletion all-or-nothing with respect to
    /// the index. Fails `NotFound` if any revision record is missing, e.g.
    /// after the chain has already been deleted.
    pub(crate) async fn collect(
        &self,
        address: ContentAddress,
    ) -> Result<Vec<Revision>, StoreError> {
        // Walk predecessor pointers back to the creation record.
        let mut ancestry = Vec::new();
        let mut visited = HashSet::new();
        let mut cursor = Some(address);
        while let Some(addr) = cursor {
            if !visited.insert(addr) {
                break;
            }
            let metadata = self.fetch(addr).await?;
            cursor = metadata.predecessor;
            ancestry.push(Revision {
                address: addr,
                metadata,
            });
        }
        ancestry.reverse();

        // Continue forward in case `address` was not the head.
        let tag = LinkKind::Revision.tag();
        let mut revisions = ancestry;
        let mut current = address;
        loop {
            let successor = self.substrate.links(&current, &tag).await?.last().copied();
            match successor {
                Some(next) if visited.insert(next) => {
                    let metadata = self.fetch(next).await?;
                    revisions.push(Revision {
                        address: next,
                        metadata,
                    });
                    current = next;
                }
                _ => break,
            }
        }
        Ok(revisions)
    }
}
