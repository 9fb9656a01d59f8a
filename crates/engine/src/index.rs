//! Hierarchical path index over substrate links.
//!
//! Directory paths are anchored by the content address of the normalized
//! path string, which every peer computes identically without coordination.
//! Ancestor anchors are linked parent to child (`path-child`), and files are
//! associated with their directory's anchor (`path-file`). A recursive
//! listing is a breadth-first walk over the child links, so hierarchy is
//! segment-wise by construction: `/sub` never matches files under
//! `/subfolder2`.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use bytes::Bytes;

use driftfs_core::{ContentAddress, DirPath};
use driftfs_substrate::{Substrate, SubstrateError};

use crate::link::LinkKind;

/// Secondary index mapping normalized directory paths to file identities.
///
/// This relation is metadata, not storage: removing an association never
/// touches file content, and an association left behind by a dead chain is
/// skipped at resolution time.
pub struct PathIndex {
    substrate: Arc<dyn Substrate>,
}

impl PathIndex {
    /// Create an index over the given substrate.
    pub fn new(substrate: Arc<dyn Substrate>) -> Self {
        Self { substrate }
    }

    /// Content address anchoring a directory path.
    fn anchor(path: &DirPath) -> ContentAddress {
        ContentAddress::of(path.as_str().as_bytes())
    }

    /// Ensure anchors exist for `path` and all its ancestors, each linked
    /// from its parent. Returns the anchor of `path` itself.
    async fn ensure(&self, path: &DirPath) -> Result<ContentAddress, SubstrateError> {
        let child_tag = LinkKind::PathChild.tag();
        let mut parent: Option<ContentAddress> = None;
        for prefix in path.prefixes() {
            let anchor = self
                .substrate
                .put(Bytes::copy_from_slice(prefix.as_str().as_bytes()))
                .await?;
            if let Some(parent) = parent {
                self.substrate.link(&parent, &anchor, &child_tag).await?;
            }
            parent = Some(anchor);
        }
        // prefixes() always yields at least the root.
        Ok(parent.unwrap_or_else(|| Self::anchor(path)))
    }

    /// Associate a file identity with its directory path.
    ///
    /// Called once at creation; the association is keyed by the creation
    /// revision's address and survives updates unchanged.
    pub async fn insert(
        &self,
        path: &DirPath,
        identity: &ContentAddress,
    ) -> Result<(), SubstrateError> {
        let anchor = self.ensure(path).await?;
        self.substrate
            .link(&anchor, identity, &LinkKind::PathFile.tag())
            .await
    }

    /// Remove a file association. The path anchors themselves stay; an
    /// anchor without file links is inert.
    pub async fn remove(
        &self,
        path: &DirPath,
        identity: &ContentAddress,
    ) -> Result<bool, SubstrateError> {
        self.substrate
            .unlink(&Self::anchor(path), identity, &LinkKind::PathFile.tag())
            .await
    }

    /// File identities located directly at `path`.
    pub async fn list(&self, path: &DirPath) -> Result<Vec<ContentAddress>, SubstrateError> {
        self.substrate
            .links(&Self::anchor(path), &LinkKind::PathFile.tag())
            .await
    }

    /// File identities located at `path` or any descendant directory.
    ///
    /// Returns an empty list for a path with no files, never an error.
    pub async fn list_recursive(
        &self,
        path: &DirPath,
    ) -> Result<Vec<ContentAddress>, SubstrateError> {
        let file_tag = LinkKind::PathFile.tag();
        let child_tag = LinkKind::PathChild.tag();

        let mut files = Vec::new();
        let mut visited = HashSet::new();
        let mut queue = VecDeque::from([Self::anchor(path)]);
        while let Some(anchor) = queue.pop_front() {
            if !visited.insert(anchor) {
                continue;
            }
            files.extend(self.substrate.links(&anchor, &file_tag).await?);
            queue.extend(self.substrate.links(&anchor, &child_tag).await?);
        }
        Ok(files)
    }
}
