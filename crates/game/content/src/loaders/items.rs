//! Item catalog loader.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use skirmish_core::{ItemDefinition, ItemId};

use super::{read_file, LoadResult};

/// Item catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemCatalog {
    pub items: Vec<ItemDefinition>,
}

/// Loader for item catalogs from RON files.
pub struct ItemLoader;

impl ItemLoader {
    /// Load an item catalog from a RON file.
    pub fn load(path: &Path) -> LoadResult<Vec<ItemDefinition>> {
        let content = read_file(path)?;
        let catalog: ItemCatalog = ron::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse item catalog RON: {}", e))?;
        Ok(catalog.items)
    }

    /// Load a catalog and index it by item id.
    pub fn load_index(path: &Path) -> LoadResult<CatalogIndex> {
        Ok(CatalogIndex::from_definitions(Self::load(path)?))
    }
}

/// Id-indexed catalog handing out shared definitions.
#[derive(Debug, Clone, Default)]
pub struct CatalogIndex {
    by_id: HashMap<ItemId, Arc<ItemDefinition>>,
}

impl CatalogIndex {
    pub fn from_definitions(items: Vec<ItemDefinition>) -> Self {
        let by_id = items
            .into_iter()
            .map(|def| (def.id.clone(), Arc::new(def)))
            .collect();
        Self { by_id }
    }

    /// Shared definition for an id, if the catalog has one.
    pub fn get(&self, id: &ItemId) -> Option<Arc<ItemDefinition>> {
        self.by_id.get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}
