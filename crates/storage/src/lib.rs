//! Sector artifact lifecycle for the lode proof-of-storage pipeline.
//!
//! This crate owns the on-disk path/lock lifecycle of per-sector sealing
//! artifacts and the stream-to-file bridge feeding descriptor-based proving
//! code:
//! - Path resolution, allocation, and release against a pluggable
//!   filesystem collaborator
//! - Scoped advisory locks over sector directories
//! - Cache trimming down to the retained Merkle layer
//! - A structural commit-readiness check
//! - Adaptation of arbitrary bounded byte streams into readable descriptors
//!
//! Sealing, proving, and physical placement policy live elsewhere and only
//! consume what this crate hands out.

pub mod adapt;
pub mod backends;
pub mod error;
pub mod store;
pub mod traits;

pub use adapt::{adapt, AdaptedFile, Completion, SectorSource};
pub use backends::filesystem::LocalSectorFs;
pub use error::{StorageError, StorageResult, StreamError};
pub use store::SectorStore;
pub use traits::{LockToken, SectorFilesystem, SectorLock};
