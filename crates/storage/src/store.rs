//! Sector store facade: path lifecycle, cache trimming, commit readiness.

use crate::backends::filesystem::LocalSectorFs;
use crate::error::{StorageError, StorageResult};
use crate::traits::{SectorFilesystem, SectorLock};
use lode_core::{
    sector_name, DataType, MinerId, SectorId, SectorPath, StoreConfig, CACHE_ARTIFACT_SUFFIX,
    RETAINED_TREE_SUFFIX,
};
use std::sync::Arc;
use tokio::fs;
use tokio_util::sync::CancellationToken;
use tracing::instrument;

/// One miner's view onto the sector artifact store.
///
/// Thin facade over a [`SectorFilesystem`]: translates (sector id, artifact
/// kind) into storage locations, guards mutating operations with the sector
/// directory lock, and prunes disposable cache artifacts. It does not seal,
/// prove, or decide physical placement.
pub struct SectorStore {
    fs: Arc<dyn SectorFilesystem>,
    miner: MinerId,
    sector_size: u64,
    expected_cache_entries: usize,
}

impl SectorStore {
    /// Store backed by an injected filesystem collaborator.
    pub fn with_filesystem(
        miner: MinerId,
        config: &StoreConfig,
        fs: Arc<dyn SectorFilesystem>,
    ) -> StorageResult<Self> {
        config.validate().map_err(StorageError::Config)?;
        Ok(Self {
            fs,
            miner,
            sector_size: config.sector_size,
            expected_cache_entries: config.expected_cache_entries,
        })
    }

    /// Store backed by a [`LocalSectorFs`] rooted at `config.root`.
    pub async fn local(miner: MinerId, config: &StoreConfig) -> StorageResult<Self> {
        let backend = LocalSectorFs::new(&config.root, config.capacity).await?;
        Self::with_filesystem(miner, config, Arc::new(backend))
    }

    /// Canonical name of `id` within this miner's namespace.
    pub fn sector_name(&self, id: SectorId) -> String {
        sector_name(&self.miner, id)
    }

    /// Resolve the existing location of a sector's artifacts of one kind.
    #[instrument(skip(self))]
    pub async fn sector_path(&self, kind: DataType, id: SectorId) -> StorageResult<SectorPath> {
        self.fs.find_sector(kind, &self.miner, id).await
    }

    /// Reserve a fresh location sized for this store's sector size.
    ///
    /// `cache` signals cache-tier placement preference. The slot's contents
    /// are not created here.
    #[instrument(skip(self))]
    pub async fn alloc_sector_path(
        &self,
        kind: DataType,
        id: SectorId,
        cache: bool,
    ) -> StorageResult<SectorPath> {
        self.fs
            .alloc_sector(kind, &self.miner, self.sector_size, cache, id)
            .await
    }

    /// Return `path` to the collaborator.
    ///
    /// Notification only: issued exactly once per call, deletes nothing.
    #[instrument(skip(self, path), fields(path = %path))]
    pub async fn release_sector(&self, path: SectorPath) {
        self.fs.release(path, self.sector_size).await;
    }

    /// Acquire the advisory lock on the sector directory behind `path`.
    ///
    /// The returned token releases on drop; a cancelled `ctx` fails the wait
    /// instead of blocking. Exposed so pipeline steps other than trimming
    /// can serialize their own access to a sector's on-disk set.
    pub async fn lock_sector(
        &self,
        ctx: &CancellationToken,
        path: &SectorPath,
    ) -> StorageResult<SectorLock> {
        self.fs.lock(ctx, path).await
    }

    /// Prune a sector's cache directory down to what later proof steps need.
    ///
    /// Removes every entry ending in `.dat` except the retained last tree
    /// layer (`-data-tree-r-last.dat`); non-`.dat` files are never touched.
    /// Intermediate tree layers are large and disposable once the final
    /// layer is committed to the Merkle root, so this bounds a sealed
    /// sector's storage cost.
    ///
    /// Runs under the directory's exclusive lock. The first failed removal
    /// aborts the operation; files already removed stay removed, and a
    /// retry of the whole operation is the caller's recovery path. Running
    /// on an already-trimmed directory is a no-op.
    #[instrument(skip(self, ctx))]
    pub async fn trim_cache(&self, ctx: &CancellationToken, id: SectorId) -> StorageResult<()> {
        let dir = self.fs.find_sector(DataType::Cache, &self.miner, id).await?;
        let _lock = self.fs.lock(ctx, &dir).await?;

        let mut entries = fs::read_dir(dir.path()).await.map_err(|e| StorageError::List {
            path: dir.path().to_path_buf(),
            source: e,
        })?;
        loop {
            let entry = match entries.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(e) => {
                    return Err(StorageError::List {
                        path: dir.path().to_path_buf(),
                        source: e,
                    })
                }
            };
            let name = entry.file_name().to_string_lossy().into_owned();
            if !name.ends_with(CACHE_ARTIFACT_SUFFIX) {
                continue;
            }
            if name.ends_with(RETAINED_TREE_SUFFIX) {
                // Want to keep.
                continue;
            }
            fs::remove_file(entry.path())
                .await
                .map_err(|e| StorageError::Deletion { file: name, source: e })?;
        }

        Ok(())
    }

    /// Coarse structural check that a sector's cache is ready to commit.
    ///
    /// Reports whether the cache directory's entry count equals the
    /// configured expectation for a fully-sealed sector. Read-only; never
    /// encodes "almost ready". The fixed-count heuristic is brittle to any
    /// layout change and stands in for a manifest-based check.
    #[instrument(skip(self))]
    pub async fn can_commit(&self, id: SectorId) -> StorageResult<bool> {
        let dir = self.fs.find_sector(DataType::Cache, &self.miner, id).await?;

        let mut entries = fs::read_dir(dir.path()).await.map_err(|e| StorageError::List {
            path: dir.path().to_path_buf(),
            source: e,
        })?;
        let mut count = 0usize;
        while let Some(_entry) = entries.next_entry().await.map_err(|e| StorageError::List {
            path: dir.path().to_path_buf(),
            source: e,
        })? {
            count += 1;
        }

        Ok(count == self.expected_cache_entries)
    }
}
