use std::sync::Arc;

use bytes::Bytes;

use driftfs_core::{AuthorId, ContentAddress};
use driftfs_engine::chunk::CHUNK_SIZE;
use driftfs_engine::{CreateFileRequest, FileStore, StoreError};
use driftfs_substrate_memory::MemorySubstrate;

// -- Helpers --------------------------------------------------------------

fn store() -> FileStore {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
    FileStore::new(Arc::new(MemorySubstrate::new()))
}

fn request(path: &str, name: &str, content: &[u8]) -> CreateFileRequest {
    CreateFileRequest {
        name: name.to_owned(),
        path: path.to_owned(),
        file_type: "text/plain".to_owned(),
        author: AuthorId::from("alice"),
        content: Bytes::copy_from_slice(content),
    }
}

fn sample(path: &str, name: &str) -> CreateFileRequest {
    request(path, name, b"hello world!")
}

// -- Creation and listing -------------------------------------------------

#[tokio::test]
async fn create_files_and_list_by_path_recursively() {
    let store = store();

    store.create_file(sample("/", "test.txt")).await.unwrap();
    store.create_file(sample("/", "index2.txt")).await.unwrap();
    store
        .create_file(sample("/subfolder", "test.txt"))
        .await
        .unwrap();
    store
        .create_file(sample("/subfolder2", "index2.txt"))
        .await
        .unwrap();
    let deep = store
        .create_file(sample("/subfolder/subfolder3", "test.txt"))
        .await
        .unwrap();

    let all = store
        .get_files_metadata_by_path_recursively("/")
        .await
        .unwrap();
    assert_eq!(all.len(), 5);

    let under_subfolder = store
        .get_files_metadata_by_path_recursively("/subfolder")
        .await
        .unwrap();
    assert_eq!(under_subfolder.len(), 2);

    let under_subfolder2 = store
        .get_files_metadata_by_path_recursively("/subfolder2")
        .await
        .unwrap();
    assert_eq!(under_subfolder2.len(), 1);

    let under_deep = store
        .get_files_metadata_by_path_recursively("/subfolder/subfolder3")
        .await
        .unwrap();
    assert_eq!(under_deep.len(), 1);
    assert_eq!(under_deep[0].metadata.name, "test.txt");
    assert_eq!(under_deep[0].metadata.path.as_str(), "/subfolder/subfolder3");
    assert_eq!(under_deep[0].address, deep.file.address);
}

#[tokio::test]
async fn direct_listing_excludes_descendants() {
    let store = store();
    store.create_file(sample("/", "root.txt")).await.unwrap();
    store
        .create_file(sample("/subfolder", "nested.txt"))
        .await
        .unwrap();

    let direct = store.get_files_metadata_by_path("/").await.unwrap();
    assert_eq!(direct.len(), 1);
    assert_eq!(direct[0].metadata.name, "root.txt");
}

#[tokio::test]
async fn lookup_by_path_and_name() {
    let store = store();
    let created = store
        .create_file(sample("/subfolder", "test.txt"))
        .await
        .unwrap();

    let found = store
        .get_file_metadata_by_path_and_name("/subfolder", "test.txt")
        .await
        .unwrap();
    assert_eq!(found.address, created.file.address);

    let missing = store
        .get_file_metadata_by_path_and_name("/subfolder", "absent.txt")
        .await
        .unwrap_err();
    assert!(missing.is_not_found());
}

#[tokio::test]
async fn identical_content_shares_chunk_addresses() {
    let store = store();
    let first = store.create_file(sample("/", "a.txt")).await.unwrap();
    let second = store.create_file(sample("/", "b.txt")).await.unwrap();

    assert_eq!(first.chunks[0].address, second.chunks[0].address);
    assert_ne!(first.file.address, second.file.address);
}

#[tokio::test]
async fn empty_file_has_no_chunks() {
    let store = store();
    let created = store.create_file(request("/", "empty.txt", b"")).await.unwrap();

    assert!(created.chunks.is_empty());
    assert_eq!(created.file.metadata.size, 0);
    assert!(created.file.metadata.chunk_hashes.is_empty());

    let content = store.read_file(created.file.address).await.unwrap();
    assert!(content.is_empty());
}

// -- Validation -----------------------------------------------------------

#[tokio::test]
async fn empty_name_is_rejected() {
    let store = store();
    let err = store.create_file(sample("/", "")).await.unwrap_err();
    assert!(matches!(err, StoreError::EmptyName));
}

#[tokio::test]
async fn forbidden_path_characters_are_rejected() {
    let store = store();
    let err = store.create_file(sample("/?.34", "test.txt")).await.unwrap_err();
    assert!(matches!(err, StoreError::InvalidPath(_)));
}

#[tokio::test]
async fn paths_are_standardized() {
    let store = store();

    let slash = store.create_file(sample("/", "test.txt")).await.unwrap();
    let backslash = store.create_file(sample("\\", "test2.txt")).await.unwrap();
    assert_eq!(slash.file.metadata.path, backslash.file.metadata.path);

    let collapsed = store
        .create_file(sample("/subfolder///subfolder2", "test3.txt"))
        .await
        .unwrap();
    assert_eq!(collapsed.file.metadata.path.as_str(), "/subfolder/subfolder2");
}

#[tokio::test]
async fn duplicate_path_and_name_is_rejected() {
    let store = store();
    store.create_file(sample("/", "test.txt")).await.unwrap();

    let err = store
        .create_file(request("/", "test.txt", b"new content"))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::DuplicatePath { .. }));

    // The same name normalized differently still collides.
    let err = store
        .create_file(request("//", "test.txt", b"other"))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::DuplicatePath { .. }));
}

#[tokio::test]
async fn same_name_in_other_directory_is_fine() {
    let store = store();
    store.create_file(sample("/", "test.txt")).await.unwrap();
    store
        .create_file(sample("/subfolder", "test.txt"))
        .await
        .unwrap();
}

// -- Chunking -------------------------------------------------------------

#[tokio::test]
async fn large_file_splits_into_five_chunks() {
    let store = store();
    let content = vec![42u8; 5 * CHUNK_SIZE];
    let created = store
        .create_file(request("/", "large_file.txt", &content))
        .await
        .unwrap();

    assert_eq!(created.chunks.len(), 5);
    assert_eq!(created.file.metadata.size, content.len() as u64);

    let read_back = store.read_file(created.file.address).await.unwrap();
    assert_eq!(read_back.as_ref(), content.as_slice());
}

// -- Updates --------------------------------------------------------------

#[tokio::test]
async fn update_preserves_identity_and_replaces_content() {
    let store = store();
    let created = store.create_file(sample("/", "test.txt")).await.unwrap();
    let identity = created.file.address;

    let updated = store
        .update_file(identity, Bytes::from_static(b"new content"))
        .await
        .unwrap();

    let current = store.get_file_metadata(identity).await.unwrap();
    assert_eq!(current.address, updated.file.address);
    assert_eq!(current.metadata.name, created.file.metadata.name);
    assert_eq!(current.metadata.author, created.file.metadata.author);
    assert_eq!(current.metadata.path, created.file.metadata.path);
    assert_eq!(current.metadata.created, created.file.metadata.created);
    assert_eq!(current.metadata.file_type, created.file.metadata.file_type);
    assert_eq!(current.metadata.size, "new content".len() as u64);
    assert!(current.metadata.last_modified >= created.file.metadata.last_modified);
    assert_ne!(current.metadata.chunk_hashes, created.file.metadata.chunk_hashes);

    let content = store.read_file(identity).await.unwrap();
    assert_eq!(content.as_ref(), b"new content");
}

#[tokio::test]
async fn chained_updates_resolve_to_latest() {
    let store = store();
    let created = store.create_file(sample("/", "test.txt")).await.unwrap();
    let identity = created.file.address;

    let first = store
        .update_file(identity, Bytes::from_static(b"new content"))
        .await
        .unwrap();
    let second = store
        .update_file(identity, Bytes::from_static(b"new content 2"))
        .await
        .unwrap();

    // Identity, intermediate and head addresses all resolve to the head.
    for address in [identity, first.file.address, second.file.address] {
        let content = store.read_file(address).await.unwrap();
        assert_eq!(content.as_ref(), b"new content 2");

        let current = store.get_file_metadata(address).await.unwrap();
        assert_eq!(current.address, second.file.address);
    }
}

#[tokio::test]
async fn update_of_unknown_or_deleted_file_fails() {
    let store = store();
    let unknown = ContentAddress::of(b"never created");
    let err = store
        .update_file(unknown, Bytes::from_static(b"x"))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));

    let created = store.create_file(sample("/", "test.txt")).await.unwrap();
    store.delete_file(created.file.address).await.unwrap();
    let err = store
        .update_file(created.file.address, Bytes::from_static(b"x"))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
}

// -- Deletion -------------------------------------------------------------

#[tokio::test]
async fn delete_removes_metadata_and_chunks() {
    let store = store();
    // Distinct bytes per chunk so the five chunks get five addresses.
    let content: Vec<u8> = (0..5 * CHUNK_SIZE).map(|i| (i / CHUNK_SIZE) as u8).collect();
    let created = store
        .create_file(request("/", "large_file.txt", &content))
        .await
        .unwrap();
    let identity = created.file.address;

    let receipt = store.delete_file(identity).await.unwrap();
    assert_eq!(receipt.identity, identity);
    assert_eq!(receipt.revisions_removed, 1);
    assert_eq!(receipt.chunks_removed, 5);

    let err = store.get_file_metadata(identity).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
    let err = store.get_file_chunks(identity).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
}

#[tokio::test]
async fn delete_cascades_over_the_whole_chain() {
    let store = store();
    let created = store.create_file(sample("/", "test.txt")).await.unwrap();
    let identity = created.file.address;

    let first = store
        .update_file(identity, Bytes::from_static(b"new content"))
        .await
        .unwrap();
    let second = store
        .update_file(identity, Bytes::from_static(b"new content 2"))
        .await
        .unwrap();

    // Deleting through the identity tears down every revision.
    let receipt = store.delete_file(identity).await.unwrap();
    assert_eq!(receipt.revisions_removed, 3);

    for address in [identity, first.file.address, second.file.address] {
        let err = store.get_file_metadata(address).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)), "{address}");
        let err = store.get_file_chunks(address).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)), "{address}");
    }

    // The index no longer surfaces the file.
    let listed = store
        .get_files_metadata_by_path_recursively("/")
        .await
        .unwrap();
    assert!(listed.is_empty());
}

#[tokio::test]
async fn delete_through_the_head_address_works_too() {
    let store = store();
    let created = store.create_file(sample("/", "test.txt")).await.unwrap();
    let updated = store
        .update_file(created.file.address, Bytes::from_static(b"v2"))
        .await
        .unwrap();

    let receipt = store.delete_file(updated.file.address).await.unwrap();
    assert_eq!(receipt.identity, created.file.address);
    assert_eq!(receipt.revisions_removed, 2);

    let err = store.get_file_metadata(created.file.address).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
}

#[tokio::test]
async fn second_delete_fails_not_found() {
    let store = store();
    let created = store.create_file(sample("/", "test.txt")).await.unwrap();

    store.delete_file(created.file.address).await.unwrap();
    let err = store.delete_file(created.file.address).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
}

#[tokio::test]
async fn path_is_reusable_after_delete() {
    let store = store();
    let first = store.create_file(sample("/", "test.txt")).await.unwrap();
    store.delete_file(first.file.address).await.unwrap();

    // A fresh identity, not a resurrection of the old chain.
    let second = store
        .create_file(request("/", "test.txt", b"brand new"))
        .await
        .unwrap();
    assert_ne!(first.file.address, second.file.address);

    let content = store.read_file(second.file.address).await.unwrap();
    assert_eq!(content.as_ref(), b"brand new");
}

// -- Resolution edge cases ------------------------------------------------

#[tokio::test]
async fn unknown_address_fails_not_found() {
    let store = store();
    let unknown = ContentAddress::of(b"no such file");
    let err = store.get_file_metadata(unknown).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
}

#[tokio::test]
async fn invalid_path_on_listing_is_rejected() {
    let store = store();
    let err = store
        .get_files_metadata_by_path_recursively("/bad?path")
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidPath(_)));
}
