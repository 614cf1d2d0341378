//! Core domain types for the lode sector store.
//!
//! This crate defines the data model shared by the storage layer and the
//! sealing/proving pipeline that embeds it:
//! - Sector and miner identifiers, and the canonical sector naming scheme
//! - Artifact kinds and sector path handles
//! - Store configuration
//!
//! It deliberately contains no I/O; everything that touches the disk lives
//! in `lode-storage`.

pub mod config;
pub mod error;
pub mod sector;

pub use config::StoreConfig;
pub use error::{Error, Result};
pub use sector::{parse_sector_name, sector_name, DataType, MinerId, SectorId, SectorPath};

/// Default sector size: 1 GiB.
pub const DEFAULT_SECTOR_SIZE: u64 = 1024 * 1024 * 1024;

/// Expected number of entries in a fully-sealed sector's cache directory.
///
/// Placeholder for a manifest-driven readiness check: the value matches the
/// artifact layout of the current proof-tree shape and must be re-derived
/// whenever the sector size or tree layout changes. Overridable through
/// [`StoreConfig::expected_cache_entries`].
pub const EXPECTED_CACHE_ENTRIES: usize = 10;

/// Suffix shared by all on-disk cache artifacts.
pub const CACHE_ARTIFACT_SUFFIX: &str = ".dat";

/// Suffix of the one cache artifact that survives trimming: the last Merkle
/// tree layer, which later proof steps still read.
pub const RETAINED_TREE_SUFFIX: &str = "-data-tree-r-last.dat";
