//! Data-driven content definitions and loaders.
//!
//! This crate houses loaders for RON data files:
//! - Item catalogs (definitions shared by inventories and world items)
//! - Gameplay tuning (interaction and world-item constants)
//!
//! All loaders use skirmish-core types directly with serde for RON
//! deserialization. Content is immutable once loaded; the catalog hands out
//! shared `Arc<ItemDefinition>` entries.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{CatalogIndex, GameTuning, ItemLoader, TuningLoader};
