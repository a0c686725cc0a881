//! Item catalog definitions.

use std::collections::BTreeMap;
use std::fmt;

/// Well-known attribute ids used by gameplay code.
///
/// Catalog files may carry arbitrary attributes; only these are interpreted
/// by this crate.
pub mod attrs {
    /// Flat bonus added to the wielder's attack damage.
    pub const ATTACK_POWER: &str = "attack_power";
    /// Flat damage dealt by the item when thrown.
    pub const THROW_DAMAGE: &str = "throw_damage";
    /// Finite durability of the spawned world entity (hits until destroyed).
    pub const DURABILITY: &str = "durability";
    /// Flat bonus to the wielder's defense.
    pub const DEFENSE: &str = "defense";
}

/// Identifier of an item definition, unique within a catalog.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ItemId(String);

impl ItemId {
    /// Id of the sentinel "empty item" some containers use as a placeholder.
    /// A stack holding it counts as empty everywhere.
    pub const EMPTY_SENTINEL: &'static str = "empty_item";

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for the placeholder id that must never be treated as a real item.
    pub fn is_empty_sentinel(&self) -> bool {
        self.0 == Self::EMPTY_SENTINEL
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Immutable catalog entry describing one kind of item.
///
/// Definitions are shared (`Arc<ItemDefinition>`) across every stack that
/// references them and are never mutated after loading.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemDefinition {
    pub id: ItemId,
    /// Display name for UI surfaces.
    pub name: String,
    /// Icon resource reference, resolved by the host.
    #[cfg_attr(feature = "serde", serde(default))]
    pub icon: Option<String>,
    /// Attribute table (attack power, throw damage, ...). See [`attrs`].
    #[cfg_attr(feature = "serde", serde(default))]
    pub attributes: BTreeMap<String, f32>,
    /// World scene reference used when the item is dropped or thrown.
    /// `None` means the item cannot materialize in the world.
    #[cfg_attr(feature = "serde", serde(default))]
    pub world_scene: Option<String>,
    /// Maximum quantity a single stack may hold.
    pub max_stack: u32,
}

impl ItemDefinition {
    pub fn new(id: impl Into<ItemId>, name: impl Into<String>, max_stack: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            icon: None,
            attributes: BTreeMap::new(),
            world_scene: None,
            max_stack: max_stack.max(1),
        }
    }

    /// Builder-style attribute insertion for tests and scenario setup.
    pub fn with_attribute(mut self, attr: &str, value: f32) -> Self {
        self.attributes.insert(attr.to_owned(), value);
        self
    }

    /// Builder-style world scene reference.
    pub fn with_world_scene(mut self, scene: impl Into<String>) -> Self {
        self.world_scene = Some(scene.into());
        self
    }

    /// Looks up an attribute value.
    pub fn attribute(&self, attr: &str) -> Option<f32> {
        self.attributes.get(attr).copied()
    }

    /// Looks up an attribute value with a fallback.
    pub fn attribute_or(&self, attr: &str, default: f32) -> f32 {
        self.attribute(attr).unwrap_or(default)
    }
}
