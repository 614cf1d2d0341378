//! Local single-root filesystem collaborator.

use crate::error::{StorageError, StorageResult};
use crate::traits::{LockToken, SectorFilesystem, SectorLock};
use async_trait::async_trait;
use lode_core::{sector_name, DataType, MinerId, SectorId, SectorPath};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::fs;
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;
use tracing::instrument;

/// In-process advisory lock namespace, keyed by sector directory.
///
/// Waiters queue on `freed`; the notified future is created before the held
/// set is checked so a release between check and wait cannot be missed.
#[derive(Debug, Default)]
struct LockRegistry {
    held: Mutex<HashSet<PathBuf>>,
    freed: Notify,
}

impl LockRegistry {
    fn held(&self) -> std::sync::MutexGuard<'_, HashSet<PathBuf>> {
        // A poisoned set is still structurally valid; keep going.
        self.held.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Lock token for one sector directory; releases on drop.
#[derive(Debug)]
struct DirLock {
    path: PathBuf,
    registry: Arc<LockRegistry>,
}

impl LockToken for DirLock {}

impl Drop for DirLock {
    fn drop(&mut self) {
        self.registry.held().remove(&self.path);
        self.registry.freed.notify_waiters();
    }
}

/// Single-root local filesystem backend.
///
/// Lays one pool directory per [`DataType`] under `root` and hands out
/// per-sector paths named by the canonical scheme. Capacity is a simple byte
/// budget over live reservations; locks are advisory and in-process only.
/// Cross-process exclusion is out of scope for this backend.
pub struct LocalSectorFs {
    root: PathBuf,
    capacity: Option<u64>,
    reserved: Mutex<u64>,
    locks: Arc<LockRegistry>,
}

impl LocalSectorFs {
    /// Create a backend rooted at `root`, creating the pool directories.
    pub async fn new(root: impl AsRef<Path>, capacity: Option<u64>) -> StorageResult<Self> {
        let root = root.as_ref().to_path_buf();
        for kind in DataType::ALL {
            fs::create_dir_all(root.join(kind.as_str())).await?;
        }
        Ok(Self {
            root,
            capacity,
            reserved: Mutex::new(0),
            locks: Arc::new(LockRegistry::default()),
        })
    }

    fn slot(&self, kind: DataType, miner: &MinerId, id: SectorId) -> SectorPath {
        SectorPath::new(
            kind,
            self.root.join(kind.as_str()).join(sector_name(miner, id)),
        )
    }

    fn reserved(&self) -> std::sync::MutexGuard<'_, u64> {
        self.reserved.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Bytes currently reserved by live allocations.
    pub fn reserved_bytes(&self) -> u64 {
        *self.reserved()
    }
}

#[async_trait]
impl SectorFilesystem for LocalSectorFs {
    #[instrument(skip(self), fields(backend = "filesystem"))]
    async fn find_sector(
        &self,
        kind: DataType,
        miner: &MinerId,
        id: SectorId,
    ) -> StorageResult<SectorPath> {
        let slot = self.slot(kind, miner, id);
        match fs::try_exists(slot.path()).await {
            Ok(true) => Ok(slot),
            Ok(false) => Err(StorageError::NotFound {
                kind,
                name: sector_name(miner, id),
            }),
            Err(e) => Err(StorageError::Io(e)),
        }
    }

    #[instrument(skip(self), fields(backend = "filesystem"))]
    async fn alloc_sector(
        &self,
        kind: DataType,
        miner: &MinerId,
        sector_size: u64,
        cache: bool,
        id: SectorId,
    ) -> StorageResult<SectorPath> {
        // Single-tier backend: `cache` placement preference is recorded by
        // the instrument span but does not change placement here.
        if let Some(capacity) = self.capacity {
            let mut reserved = self.reserved();
            let available = capacity.saturating_sub(*reserved);
            if available < sector_size {
                return Err(StorageError::Capacity {
                    needed: sector_size,
                    available,
                });
            }
            *reserved += sector_size;
        } else {
            *self.reserved() += sector_size;
        }

        let slot = self.slot(kind, miner, id);
        if let Some(pool) = slot.path().parent() {
            if let Err(e) = fs::create_dir_all(pool).await {
                // Hand the reservation back before reporting the failure.
                *self.reserved() = self.reserved().saturating_sub(sector_size);
                return Err(StorageError::Allocation {
                    kind,
                    name: sector_name(miner, id),
                    source: e,
                });
            }
        }
        Ok(slot)
    }

    #[instrument(skip(self, path), fields(backend = "filesystem", path = %path))]
    async fn release(&self, path: SectorPath, sector_size: u64) {
        // Notification only: the reservation is returned, files stay put.
        let mut reserved = self.reserved();
        *reserved = reserved.saturating_sub(sector_size);
    }

    #[instrument(skip(self, ctx, path), fields(backend = "filesystem", path = %path))]
    async fn lock(
        &self,
        ctx: &CancellationToken,
        path: &SectorPath,
    ) -> StorageResult<SectorLock> {
        let dir = path.path().to_path_buf();
        loop {
            let freed = self.locks.freed.notified();
            {
                let mut held = self.locks.held();
                if held.insert(dir.clone()) {
                    return Ok(Box::new(DirLock {
                        path: dir,
                        registry: Arc::clone(&self.locks),
                    }));
                }
            }
            tokio::select! {
                _ = freed => {}
                _ = ctx.cancelled() => {
                    return Err(StorageError::LockCancelled { path: dir });
                }
            }
        }
    }
}
