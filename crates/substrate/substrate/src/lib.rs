//! Trait boundary to the replicated, append-only data substrate.
//!
//! The engine never talks to storage directly; it goes through [`Substrate`],
//! which models what a replicated peer-to-peer backend provides: immutable
//! content-addressed records, tombstone-style retraction, and tagged link
//! associations between addresses. Backends implement the trait; the
//! [`testing`] module holds a conformance suite every backend should run.

pub mod error;
pub mod store;
pub mod tag;
pub mod testing;

pub use error::SubstrateError;
pub use store::Substrate;
pub use tag::LinkTag;
