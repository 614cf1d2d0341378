//! Sector identifiers, artifact kinds, and the canonical naming scheme.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Identifier of a sector within one miner's namespace.
///
/// Assigned by an external allocator and immutable afterwards.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SectorId(pub u64);

impl fmt::Display for SectorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<u64> for SectorId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Opaque token identifying the storage owner.
///
/// Combined with a [`SectorId`] it forms the canonical sector name. The
/// token must not contain `-` ambiguity problems: the name grammar splits on
/// the last `-`, so any printable token works, including ones with dashes.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MinerId(String);

impl MinerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MinerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MinerId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Kind of on-disk artifact a sector path refers to.
///
/// Determines which physical pool/directory the files live in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    /// Intermediate sealing artifacts (proof-tree layers, aux files).
    Cache,
    /// Raw data being staged into a sector.
    Staging,
    /// The sealed replica.
    Sealed,
    /// Unsealed sector data.
    Unsealed,
}

impl DataType {
    /// All artifact kinds, in pool-directory order.
    pub const ALL: [DataType; 4] = [
        DataType::Cache,
        DataType::Staging,
        DataType::Sealed,
        DataType::Unsealed,
    ];

    /// Directory name of the pool holding this kind of artifact.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cache => "cache",
            Self::Staging => "staging",
            Self::Sealed => "sealed",
            Self::Unsealed => "unsealed",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DataType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "cache" => Ok(Self::Cache),
            "staging" => Ok(Self::Staging),
            "sealed" => Ok(Self::Sealed),
            "unsealed" => Ok(Self::Unsealed),
            other => Err(Error::InvalidDataType(other.to_string())),
        }
    }
}

/// Location handle for one sector's artifacts of one kind.
///
/// Owned by the filesystem collaborator; the store requests and releases
/// these but never assembles paths itself.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectorPath {
    kind: DataType,
    path: PathBuf,
}

impl SectorPath {
    pub fn new(kind: DataType, path: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            path: path.into(),
        }
    }

    pub fn kind(&self) -> DataType {
        self.kind
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl fmt::Display for SectorPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

/// Canonical on-disk name for a sector: `s-<miner>-<id>`.
///
/// Deterministic and collision-free within one miner's namespace.
pub fn sector_name(miner: &MinerId, id: SectorId) -> String {
    format!("s-{}-{}", miner, id)
}

/// Inverse of [`sector_name`].
///
/// Splits on the last `-` so miner tokens containing dashes round-trip.
pub fn parse_sector_name(name: &str) -> Result<(MinerId, SectorId)> {
    let rest = name
        .strip_prefix("s-")
        .ok_or_else(|| Error::InvalidSectorName(name.to_string()))?;
    let (miner, id) = rest
        .rsplit_once('-')
        .ok_or_else(|| Error::InvalidSectorName(name.to_string()))?;
    if miner.is_empty() {
        return Err(Error::InvalidSectorName(name.to_string()));
    }
    let id: u64 = id
        .parse()
        .map_err(|_| Error::InvalidSectorName(name.to_string()))?;
    Ok((MinerId::new(miner), SectorId(id)))
}
