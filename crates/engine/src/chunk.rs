//! Fixed-size content chunking.

use bytes::Bytes;

/// Chunk size for file content: 1 MiB.
pub const CHUNK_SIZE: usize = 1024 * 1024;

/// Split content into [`CHUNK_SIZE`] chunks, in order.
///
/// The last chunk may be shorter. Zero-length content yields no chunks.
#[must_use]
pub fn split(content: &[u8]) -> Vec<Bytes> {
    content
        .chunks(CHUNK_SIZE)
        .map(Bytes::copy_from_slice)
        .collect()
}

/// Reassemble chunks into the original content.
///
/// Pure concatenation: `join(&split(x)) == x` for all byte sequences.
#[must_use]
pub fn join(chunks: &[Bytes]) -> Bytes {
    let total: usize = chunks.iter().map(Bytes::len).sum();
    let mut content = Vec::with_capacity(total);
    for chunk in chunks {
        content.extend_from_slice(chunk);
    }
    Bytes::from(content)
}
