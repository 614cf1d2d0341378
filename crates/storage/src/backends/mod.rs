//! Concrete [`SectorFilesystem`](crate::traits::SectorFilesystem) backends.

pub mod filesystem;
