//! Chunked, content-addressed file storage engine.
//!
//! [`FileStore`] is the operation surface: create, read, update and delete
//! files whose content lives as fixed-size chunks in a replicated append-only
//! substrate. Files look mutable to callers, but nothing is ever rewritten in
//! place: an update appends a fresh immutable metadata revision linked to its
//! predecessor, and the "current" file is always the tail of that chain. A
//! hierarchical path index supports recursive directory listings, and delete
//! tears down every revision, chunk set and index association of a chain in
//! one logical operation.
//!
//! The engine holds no state of its own; everything lives behind the
//! [`Substrate`](driftfs_substrate::Substrate) trait, so any backend that
//! satisfies the conformance suite works.

pub mod chain;
pub mod chunk;
pub mod error;
pub mod index;
mod link;
pub mod store;

pub use chain::Revision;
pub use error::StoreError;
pub use index::PathIndex;
pub use store::{ChunkRecord, CreateFileRequest, DeletionReceipt, FileStore, StoredFile};
