//! Core types for the driftfs content-addressed file store.
//!
//! Everything in this crate is plain data: content addresses, normalized
//! directory paths, author identities, and the immutable file metadata
//! record. The substrate boundary and the storage engine live in their own
//! crates and build on these types.

pub mod address;
pub mod author;
pub mod metadata;
pub mod path;

pub use address::{AddressParseError, ContentAddress};
pub use author::AuthorId;
pub use metadata::FileMetadata;
pub use path::{DirPath, PathError};
