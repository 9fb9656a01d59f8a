//! In-memory [`Substrate`](driftfs_substrate::Substrate) backend.
//!
//! Strongly consistent, unlike a replicated production backend; intended for
//! tests and single-process embedding.

pub mod store;

pub use store::MemorySubstrate;
