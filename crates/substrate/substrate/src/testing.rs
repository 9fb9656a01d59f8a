//! Conformance test suite for [`Substrate`] backends.
//!
//! Call [`run_substrate_conformance_tests`] from a backend's test module with
//! a fresh instance. The suite asserts the trait contract: content-addressed
//! idempotent `put`, tombstone semantics of `retract`, and ordered,
//! idempotent links.

use bytes::Bytes;

use driftfs_core::ContentAddress;

use crate::error::SubstrateError;
use crate::store::Substrate;
use crate::tag::LinkTag;

/// Run the full substrate conformance test suite.
///
/// # Errors
///
/// Returns an error if any conformance test fails at the substrate level;
/// contract violations panic with a descriptive message.
pub async fn run_substrate_conformance_tests(
    substrate: &dyn Substrate,
) -> Result<(), SubstrateError> {
    test_get_missing(substrate).await?;
    test_put_get_round_trip(substrate).await?;
    test_put_is_idempotent(substrate).await?;
    test_retract(substrate).await?;
    test_retract_missing(substrate).await?;
    test_put_revives_retracted(substrate).await?;
    test_links_ordered(substrate).await?;
    test_link_is_idempotent(substrate).await?;
    test_unlink(substrate).await?;
    Ok(())
}

async fn test_get_missing(substrate: &dyn Substrate) -> Result<(), SubstrateError> {
    let address = ContentAddress::of(b"conformance: never written");
    let record = substrate.get(&address).await?;
    assert!(record.is_none(), "get on a missing address should be None");
    Ok(())
}

async fn test_put_get_round_trip(substrate: &dyn Substrate) -> Result<(), SubstrateError> {
    let payload = Bytes::from_static(b"conformance: round trip");
    let address = substrate.put(payload.clone()).await?;
    assert_eq!(
        address,
        ContentAddress::of(&payload),
        "address must be the content hash"
    );
    let record = substrate.get(&address).await?;
    assert_eq!(record.as_deref(), Some(payload.as_ref()));
    Ok(())
}

async fn test_put_is_idempotent(substrate: &dyn Substrate) -> Result<(), SubstrateError> {
    let payload = Bytes::from_static(b"conformance: idempotent put");
    let first = substrate.put(payload.clone()).await?;
    let second = substrate.put(payload).await?;
    assert_eq!(first, second, "identical bytes must share one address");
    Ok(())
}

async fn test_retract(substrate: &dyn Substrate) -> Result<(), SubstrateError> {
    let address = substrate
        .put(Bytes::from_static(b"conformance: retract me"))
        .await?;
    let existed = substrate.retract(&address).await?;
    assert!(existed, "retract of a live record should return true");
    let record = substrate.get(&address).await?;
    assert!(record.is_none(), "get after retract should be None");
    Ok(())
}

async fn test_retract_missing(substrate: &dyn Substrate) -> Result<(), SubstrateError> {
    let address = ContentAddress::of(b"conformance: retract missing");
    let existed = substrate.retract(&address).await?;
    assert!(!existed, "retract on a missing address should return false");
    Ok(())
}

async fn test_put_revives_retracted(substrate: &dyn Substrate) -> Result<(), SubstrateError> {
    let payload = Bytes::from_static(b"conformance: revive");
    let address = substrate.put(payload.clone()).await?;
    substrate.retract(&address).await?;
    let revived = substrate.put(payload.clone()).await?;
    assert_eq!(address, revived);
    let record = substrate.get(&address).await?;
    assert_eq!(
        record.as_deref(),
        Some(payload.as_ref()),
        "re-put content should be reachable again"
    );
    Ok(())
}

async fn test_links_ordered(substrate: &dyn Substrate) -> Result<(), SubstrateError> {
    let base = substrate
        .put(Bytes::from_static(b"conformance: link base"))
        .await?;
    let tag = LinkTag::from("conformance-order");
    let first = ContentAddress::of(b"conformance: target 1");
    let second = ContentAddress::of(b"conformance: target 2");

    substrate.link(&base, &first, &tag).await?;
    substrate.link(&base, &second, &tag).await?;

    let targets = substrate.links(&base, &tag).await?;
    assert_eq!(
        targets,
        vec![first, second],
        "links must come back in creation order"
    );

    let other_tag = LinkTag::from("conformance-other");
    let none = substrate.links(&base, &other_tag).await?;
    assert!(none.is_empty(), "links are scoped per tag");
    Ok(())
}

async fn test_link_is_idempotent(substrate: &dyn Substrate) -> Result<(), SubstrateError> {
    let base = ContentAddress::of(b"conformance: idempotent link base");
    let target = ContentAddress::of(b"conformance: idempotent link target");
    let tag = LinkTag::from("conformance-idempotent");

    substrate.link(&base, &target, &tag).await?;
    substrate.link(&base, &target, &tag).await?;

    let targets = substrate.links(&base, &tag).await?;
    assert_eq!(targets.len(), 1, "duplicate link must not create a second entry");
    Ok(())
}

async fn test_unlink(substrate: &dyn Substrate) -> Result<(), SubstrateError> {
    let base = ContentAddress::of(b"conformance: unlink base");
    let target = ContentAddress::of(b"conformance: unlink target");
    let tag = LinkTag::from("conformance-unlink");

    substrate.link(&base, &target, &tag).await?;
    let existed = substrate.unlink(&base, &target, &tag).await?;
    assert!(existed, "unlink of an existing link should return true");

    let targets = substrate.links(&base, &tag).await?;
    assert!(targets.is_empty());

    let existed = substrate.unlink(&base, &target, &tag).await?;
    assert!(!existed, "unlink of a missing link should return false");
    Ok(())
}
