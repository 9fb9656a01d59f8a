use async_trait::async_trait;
use bytes::Bytes;

use driftfs_core::ContentAddress;

use crate::error::SubstrateError;
use crate::tag::LinkTag;

/// Boundary to the replicated, append-only data substrate.
///
/// Records are immutable and content-addressed: `put` of identical bytes
/// always yields the same address and never a duplicate logical entry.
/// Nothing is ever mutated in place; "deletion" is a tombstone appended by
/// [`retract`](Substrate::retract) that removes an address from the
/// reachable set.
///
/// Consistency: a production backend is eventually consistent across peers.
/// Read-your-writes holds only against the same backend instance; a reader
/// on another peer may observe writes with delay and in any order, so
/// callers must not rely on cross-record atomicity. Implementations must be
/// safe for concurrent access.
#[async_trait]
pub trait Substrate: Send + Sync {
    /// Store an immutable record and return its content address.
    ///
    /// Idempotent: identical bytes return the same address without creating
    /// a duplicate. Re-putting retracted content makes the address
    /// reachable again.
    async fn put(&self, bytes: Bytes) -> Result<ContentAddress, SubstrateError>;

    /// Fetch a record. Returns `None` for unknown or retracted addresses.
    async fn get(&self, address: &ContentAddress) -> Result<Option<Bytes>, SubstrateError>;

    /// Append a tombstone so the address resolves to `None` from now on.
    ///
    /// Returns `true` if a live record existed.
    async fn retract(&self, address: &ContentAddress) -> Result<bool, SubstrateError>;

    /// Associate `target` with `base` under `tag`.
    ///
    /// Idempotent per `(base, target, tag)` triple.
    async fn link(
        &self,
        base: &ContentAddress,
        target: &ContentAddress,
        tag: &LinkTag,
    ) -> Result<(), SubstrateError>;

    /// Targets linked from `base` under `tag`, in creation order.
    ///
    /// Returns an empty list for a base with no links, never an error.
    async fn links(
        &self,
        base: &ContentAddress,
        tag: &LinkTag,
    ) -> Result<Vec<ContentAddress>, SubstrateError>;

    /// Remove the link from `base` to `target` under `tag`.
    ///
    /// Returns `true` if the link existed.
    async fn unlink(
        &self,
        base: &ContentAddress,
        target: &ContentAddress,
        tag: &LinkTag,
    ) -> Result<bool, SubstrateError>;
}
