#![allow(dead_code)]

use bytes::Bytes;
use lode_core::{sector_name, MinerId, SectorId, StoreConfig};
use lode_storage::SectorStore;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A sector store over a throwaway root, plus the handles tests need to
/// poke at the directory layout directly.
pub struct TestStore {
    pub store: SectorStore,
    pub miner: MinerId,
    pub root: TempDir,
}

/// Build a store rooted in a tempdir with a small, test-sized config.
pub async fn test_store(expected_cache_entries: usize) -> TestStore {
    let root = tempfile::tempdir().unwrap();
    let miner = MinerId::new("t0101");

    let mut config = StoreConfig::new(root.path());
    config.sector_size = 2048;
    config.expected_cache_entries = expected_cache_entries;

    let store = SectorStore::local(miner.clone(), &config).await.unwrap();
    TestStore { store, miner, root }
}

/// Create a sector's cache directory and fill it with empty named files.
pub async fn populate_cache(ts: &TestStore, id: SectorId, files: &[&str]) -> PathBuf {
    let dir = ts
        .root
        .path()
        .join("cache")
        .join(sector_name(&ts.miner, id));
    tokio::fs::create_dir_all(&dir).await.unwrap();
    for file in files {
        tokio::fs::write(dir.join(file), b"artifact").await.unwrap();
    }
    dir
}

/// Sorted file names currently present in `dir`.
pub async fn list_names(dir: &Path) -> Vec<String> {
    let mut names = Vec::new();
    let mut entries = tokio::fs::read_dir(dir).await.unwrap();
    while let Some(entry) = entries.next_entry().await.unwrap() {
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    names.sort();
    names
}

/// Generate deterministic test data using a seeded pseudo-random generator.
/// Same seed produces same output (reproducible tests).
pub fn seeded_bytes(seed: u64, len: usize) -> Bytes {
    let mut data = vec![0u8; len];
    let mut state = seed;

    for chunk in data.chunks_mut(8) {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
        let bytes = state.to_le_bytes();
        for (i, byte) in chunk.iter_mut().enumerate() {
            *byte = bytes[i % 8];
        }
    }

    Bytes::from(data)
}
