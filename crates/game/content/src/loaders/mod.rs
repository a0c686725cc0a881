//! Content loaders for reading game data from files.
//!
//! Loaders convert RON files into core types. Parse and I/O failures are
//! reported through `anyhow` with the offending path attached; gameplay
//! code never sees a partially-loaded catalog.

pub mod items;
pub mod tuning;

pub use items::{CatalogIndex, ItemLoader};
pub use tuning::{GameTuning, TuningLoader};

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
