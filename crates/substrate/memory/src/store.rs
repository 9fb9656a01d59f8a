use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;

use driftfs_core::ContentAddress;
use driftfs_substrate::error::SubstrateError;
use driftfs_substrate::store::Substrate;
use driftfs_substrate::tag::LinkTag;

/// A stored record. Retraction flags the slot instead of removing it, so the
/// map stays append-only in spirit and a later `put` of the same content
/// revives the address.
#[derive(Debug, Clone)]
struct RecordSlot {
    bytes: Bytes,
    retracted: bool,
}

/// In-memory [`Substrate`] backed by [`DashMap`]s.
///
/// Fully synchronous internally; the async trait methods return immediately.
/// Unlike a replicated backend this one is strongly consistent, which makes
/// it suitable for engine tests: anything that works here may still surface
/// later on another peer in production, never differently.
#[derive(Debug, Default)]
pub struct MemorySubstrate {
    records: DashMap<ContentAddress, RecordSlot>,
    links: DashMap<(ContentAddress, LinkTag), Vec<ContentAddress>>,
}

impl MemorySubstrate {
    /// Create a new, empty in-memory substrate.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Substrate for MemorySubstrate {
    async fn put(&self, bytes: Bytes) -> Result<ContentAddress, SubstrateError> {
        let address = ContentAddress::of(&bytes);
        self.records
            .entry(address)
            .and_modify(|slot| slot.retracted = false)
            .or_insert(RecordSlot {
                bytes,
                retracted: false,
            });
        Ok(address)
    }

    async fn get(&self, address: &ContentAddress) -> Result<Option<Bytes>, SubstrateError> {
        match self.records.get(address) {
            Some(slot) if !slot.retracted => Ok(Some(slot.bytes.clone())),
            _ => Ok(None),
        }
    }

    async fn retract(&self, address: &ContentAddress) -> Result<bool, SubstrateError> {
        match self.records.get_mut(address) {
            Some(mut slot) if !slot.retracted => {
                slot.retracted = true;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn link(
        &self,
        base: &ContentAddress,
        target: &ContentAddress,
        tag: &LinkTag,
    ) -> Result<(), SubstrateError> {
        let mut targets = self.links.entry((*base, tag.clone())).or_default();
        if !targets.contains(target) {
            targets.push(*target);
        }
        Ok(())
    }

    async fn links(
        &self,
        base: &ContentAddress,
        tag: &LinkTag,
    ) -> Result<Vec<ContentAddress>, SubstrateError> {
        Ok(self
            .links
            .get(&(*base, tag.clone()))
            .map(|targets| targets.clone())
            .unwrap_or_default())
    }

    async fn unlink(
        &self,
        base: &ContentAddress,
        target: &ContentAddress,
        tag: &LinkTag,
    ) -> Result<bool, SubstrateError> {
        let Some(mut targets) = self.links.get_mut(&(*base, tag.clone())) else {
            return Ok(false);
        };
        let before = targets.len();
        targets.retain(|t| t != target);
        Ok(targets.len() != before)
    }
}
