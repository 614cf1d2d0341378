//! Filesystem collaborator trait definitions.

use crate::error::StorageResult;
use async_trait::async_trait;
use lode_core::{DataType, MinerId, SectorId, SectorPath};
use std::fmt::Debug;
use tokio_util::sync::CancellationToken;

/// Token holding an advisory lock on one sector directory.
///
/// The lock is released when the token is dropped, which makes release
/// unconditional on every exit path: normal return, `?` propagation, panic
/// unwind, or the owning future being dropped mid-await.
pub trait LockToken: Send + Debug {}

/// An owned, droppable sector-directory lock.
pub type SectorLock = Box<dyn LockToken>;

/// The filesystem/pool allocator the sector store delegates to.
///
/// Implementations own physical placement, capacity accounting, and the
/// advisory lock namespace. The store never assembles paths itself; it only
/// requests, locks, and releases them through this trait.
#[async_trait]
pub trait SectorFilesystem: Send + Sync + 'static {
    /// Look up the existing location of a sector's artifacts of one kind.
    async fn find_sector(
        &self,
        kind: DataType,
        miner: &MinerId,
        id: SectorId,
    ) -> StorageResult<SectorPath>;

    /// Reserve a fresh location sized for `sector_size` bytes.
    ///
    /// Reserves the slot only; contents are created by the caller. `cache`
    /// signals that cache-tier placement is preferred where the
    /// implementation distinguishes tiers.
    async fn alloc_sector(
        &self,
        kind: DataType,
        miner: &MinerId,
        sector_size: u64,
        cache: bool,
        id: SectorId,
    ) -> StorageResult<SectorPath>;

    /// Notification that `path` is no longer in active use.
    ///
    /// Bookkeeping only: never deletes files. Implementations must tolerate
    /// release of an already-released path.
    async fn release(&self, path: SectorPath, sector_size: u64);

    /// Acquire the advisory lock on the sector directory behind `path`.
    ///
    /// Blocks while another owner holds the lock. A cancelled `ctx` unblocks
    /// the wait and fails with [`StorageError::LockCancelled`] instead of
    /// waiting forever.
    ///
    /// [`StorageError::LockCancelled`]: crate::error::StorageError::LockCancelled
    async fn lock(
        &self,
        ctx: &CancellationToken,
        path: &SectorPath,
    ) -> StorageResult<SectorLock>;
}
