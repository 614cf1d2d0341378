//! Configuration types shared across crates.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Sector store configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Root directory of the local sector pools.
    pub root: PathBuf,
    /// Size in bytes reserved for each allocated sector.
    #[serde(default = "default_sector_size")]
    pub sector_size: u64,
    /// Entry count a fully-sealed sector's cache directory is expected to
    /// hold. Placeholder for a manifest-based readiness check; must track
    /// the proof-tree layout for the configured sector size.
    #[serde(default = "default_expected_cache_entries")]
    pub expected_cache_entries: usize,
    /// Optional byte budget across all live allocations. `None` means
    /// unlimited.
    #[serde(default)]
    pub capacity: Option<u64>,
}

fn default_sector_size() -> u64 {
    crate::DEFAULT_SECTOR_SIZE
}

fn default_expected_cache_entries() -> usize {
    crate::EXPECTED_CACHE_ENTRIES
}

impl StoreConfig {
    /// Configuration rooted at `root` with default sizing.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            sector_size: default_sector_size(),
            expected_cache_entries: default_expected_cache_entries(),
            capacity: None,
        }
    }

    /// Validate invariants that serde defaults cannot express.
    pub fn validate(&self) -> Result<(), String> {
        if self.sector_size == 0 {
            return Err("sector_size must be non-zero".to_string());
        }
        if let Some(capacity) = self.capacity {
            if capacity < self.sector_size {
                return Err(format!(
                    "capacity {} is smaller than a single sector ({})",
                    capacity, self.sector_size
                ));
            }
        }
        Ok(())
    }
}
