use std::path::PathBuf;

use blockstore::{AVAIL_BLOCKS, BLOCK_SIZE, Block, BlockStore, Error};
use tempfile::TempDir;

struct ImageContext {
    _dir: TempDir,
    path: PathBuf,
}

impl ImageContext {
    fn new() -> Self {
        let _ = env_logger::builder().is_test(true).try_init();
        let dir = tempfile::tempdir().expect("failed to create image dir");
        let path = dir.path().join("store.img");
        Self { _dir: dir, path }
    }
}

fn assert_counts(store: &BlockStore) {
    assert_eq!(
        store.used_count() + store.free_count(),
        BlockStore::total_blocks()
    );
}

#[test]
fn fresh_store_is_empty() {
    let store = BlockStore::new().unwrap();
    assert_eq!(BlockStore::total_blocks(), AVAIL_BLOCKS);
    assert_eq!(store.free_count(), AVAIL_BLOCKS);
    assert_eq!(store.used_count(), 0);
}

#[test]
fn allocate_until_exhausted() {
    let mut store = BlockStore::new().unwrap();

    let mut last = None;
    for _ in 0..BlockStore::total_blocks() {
        let id = store.allocate().unwrap();
        assert!(id < BlockStore::total_blocks());
        assert!(last.is_none_or(|last| id > last));
        last = Some(id);
        assert_counts(&store);
    }

    let result = store.allocate();
    assert!(matches!(result, Err(Error::NoSpace)));
    assert_eq!(libc::c_int::from(result.unwrap_err()), libc::ENOSPC);
    assert_counts(&store);
}

#[test]
fn request_release_request() {
    let mut store = BlockStore::new().unwrap();

    assert!(store.request(5));
    assert!(!store.request(5));
    store.release(5);
    assert!(store.request(5));
    assert_counts(&store);
}

#[test]
fn write_unallocated_block() {
    let mut store = BlockStore::new().unwrap();
    let data = [0xABu8; BLOCK_SIZE];

    assert_eq!(store.write(10, &data), 256);

    let mut out = [0u8; BLOCK_SIZE];
    assert_eq!(store.read(10, &mut out), 256);
    assert_eq!(out, data);
}

#[test]
fn round_trip() {
    let context = ImageContext::new();
    let mut store = BlockStore::new().unwrap();

    for _ in 0..20 {
        store.allocate().unwrap();
    }
    for id in [3, 7, 11] {
        store.release(id);
    }
    assert!(store.request(200));
    assert!(store.request(AVAIL_BLOCKS - 1));

    let ids: Vec<_> = (0..AVAIL_BLOCKS)
        .filter(|&id| store.is_allocated(id))
        .collect();
    for id in ids {
        store.write(id, &Block::filled(id as u8).data);
    }

    let written = store.serialize(&context.path).unwrap();
    assert_eq!(written, AVAIL_BLOCKS * BLOCK_SIZE + 32);

    let restored = BlockStore::deserialize(&context.path).unwrap();
    assert_eq!(restored.used_count(), store.used_count());
    assert_eq!(restored.free_count(), store.free_count());

    let mut expected = [0u8; BLOCK_SIZE];
    let mut actual = [0u8; BLOCK_SIZE];
    for id in 0..AVAIL_BLOCKS {
        assert_eq!(restored.is_allocated(id), store.is_allocated(id), "block {}", id);
        store.read(id, &mut expected);
        restored.read(id, &mut actual);
        assert_eq!(actual, expected, "block {}", id);
    }
}

#[test]
fn round_trip_full_store() {
    let context = ImageContext::new();
    let mut store = BlockStore::new().unwrap();

    for _ in 0..BlockStore::total_blocks() {
        let id = store.allocate().unwrap();
        store.write(id, &Block::filled(!(id as u8)).data);
    }
    store.serialize(&context.path).unwrap();

    let mut restored = BlockStore::deserialize(&context.path).unwrap();
    assert_eq!(restored.free_count(), 0);
    assert_eq!(restored.used_count(), AVAIL_BLOCKS);
    assert!(matches!(restored.allocate(), Err(Error::NoSpace)));

    let mut out = [0u8; BLOCK_SIZE];
    for id in 0..AVAIL_BLOCKS {
        assert!(restored.is_allocated(id), "block {}", id);
        assert_eq!(restored.read(id, &mut out), BLOCK_SIZE);
        assert_eq!(out, Block::filled(!(id as u8)).data, "block {}", id);
    }
}

#[test]
fn restored_store_keeps_allocating() {
    let context = ImageContext::new();
    let mut store = BlockStore::new().unwrap();
    store.allocate().unwrap();
    store.allocate().unwrap();
    store.serialize(&context.path).unwrap();

    let mut restored = BlockStore::deserialize(&context.path).unwrap();
    assert!(!restored.request(1));
    assert_eq!(restored.allocate().unwrap(), 2);
    assert_counts(&restored);
}

#[test]
fn deserialize_missing_file() {
    let context = ImageContext::new();
    let result = BlockStore::deserialize(&context.path);
    assert!(matches!(result, Err(Error::Io(_))));
    assert_eq!(libc::c_int::from(result.unwrap_err()), libc::ENOENT);
}
