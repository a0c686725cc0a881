//! Registry of spawned world items and pickup props.

use glam::Vec2;

use crate::actor::{Actor, ActorId};
use crate::env::anim::NullAnimations;
use crate::env::SceneResolver;
use crate::error::{ErrorSeverity, GameError};
use crate::events::EventQueue;
use crate::items::{attrs, ItemStack};

use super::entity::{ImpactPolicy, WorldItemEntity, WorldItemTuning};

/// Identifier of a spawned world item or pickup prop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WorldItemId(pub u32);

/// Errors from spawning a world entity for a detached stack.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SpawnError {
    /// No world scene is mapped for the item. Reported before any
    /// inventory removal is committed.
    #[error("no world scene mapped for item '{item}'")]
    SceneMissing { item: String },

    /// The resolved scene failed to instantiate. When this happens after
    /// extraction, the caller runs the recovery protocol.
    #[error("failed to instantiate world scene for item '{item}'")]
    InstantiateFailed { item: String },
}

impl GameError for SpawnError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Internal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::SceneMissing { .. } => "SPAWN_SCENE_MISSING",
            Self::InstantiateFailed { .. } => "SPAWN_INSTANTIATE_FAILED",
        }
    }
}

/// A generic pickable prop that is not a stack-bearing world item.
///
/// The handler runs the prop's effect on the picking actor and reports
/// whether the pickup consumed the prop.
pub struct PickupProp {
    pub id: WorldItemId,
    pub position: Vec2,
    enabled: bool,
    handler: Box<dyn FnMut(&mut Actor, &mut EventQueue) -> bool>,
}

impl PickupProp {
    pub fn new(
        id: WorldItemId,
        position: Vec2,
        handler: Box<dyn FnMut(&mut Actor, &mut EventQueue) -> bool>,
    ) -> Self {
        Self {
            id,
            position,
            enabled: true,
            handler,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Runs the prop's pickup effect. A consumed prop disables itself and
    /// is swept by the registry.
    pub fn try_pickup_by_actor(&mut self, actor: &mut Actor, events: &mut EventQueue) -> bool {
        if !self.enabled {
            return false;
        }
        let consumed = (self.handler)(actor, events);
        if consumed {
            self.enabled = false;
        }
        consumed
    }
}

/// Owns every spawned world item and pickup prop, allocates their ids, and
/// runs their per-tick physics updates.
pub struct WorldItemRegistry {
    next_id: u32,
    entities: Vec<WorldItemEntity>,
    props: Vec<PickupProp>,
    default_tuning: WorldItemTuning,
    default_policy: ImpactPolicy,
}

impl WorldItemRegistry {
    pub fn new() -> Self {
        Self::with_tuning(WorldItemTuning::default(), ImpactPolicy::default())
    }

    pub fn with_tuning(tuning: WorldItemTuning, policy: ImpactPolicy) -> Self {
        Self {
            next_id: 1,
            entities: Vec::new(),
            props: Vec::new(),
            default_tuning: tuning,
            default_policy: policy,
        }
    }

    pub fn allocate_id(&mut self) -> WorldItemId {
        let id = WorldItemId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Spawns a world entity for a detached stack at the given position.
    ///
    /// Item attributes specialize the default tuning: `throw_damage`
    /// overrides the impact damage and a positive `durability` makes the
    /// entity destructible. On failure the stack is handed back to the
    /// caller untouched, alongside the error.
    pub fn spawn_from_stack(
        &mut self,
        scenes: &mut dyn SceneResolver,
        stack: ItemStack,
        position: Vec2,
    ) -> Result<WorldItemId, (SpawnError, ItemStack)> {
        let item = stack.item().clone();

        let Some(handle) = scenes.resolve_world_scene(&item.id) else {
            return Err((
                SpawnError::SceneMissing {
                    item: item.id.to_string(),
                },
                stack,
            ));
        };
        let Some(mut body) = scenes.instantiate(handle) else {
            return Err((
                SpawnError::InstantiateFailed {
                    item: item.id.to_string(),
                },
                stack,
            ));
        };
        body.set_position(position);

        let mut tuning = self.default_tuning.clone();
        if let Some(damage) = item.attribute(attrs::THROW_DAMAGE) {
            tuning.throw_damage = damage;
        }
        let durability = item
            .attribute(attrs::DURABILITY)
            .filter(|d| *d > 0.0)
            .map(|d| d as u32);

        let id = self.allocate_id();
        let entity = WorldItemEntity::new(
            id,
            stack,
            body,
            Box::new(NullAnimations),
            tuning,
            self.default_policy,
            durability,
        );
        self.entities.push(entity);
        tracing::debug!(item = %item.id, id = id.0, "world item spawned");
        Ok(id)
    }

    /// Inserts a pre-built entity (hosts attach their own body/animation).
    pub fn insert(&mut self, entity: WorldItemEntity) -> WorldItemId {
        let id = entity.id();
        self.entities.push(entity);
        id
    }

    /// Registers a pickup prop.
    pub fn insert_prop(&mut self, position: Vec2, handler: Box<dyn FnMut(&mut Actor, &mut EventQueue) -> bool>) -> WorldItemId {
        let id = self.allocate_id();
        self.props.push(PickupProp::new(id, position, handler));
        id
    }

    pub fn get(&self, id: WorldItemId) -> Option<&WorldItemEntity> {
        self.entities.iter().find(|e| e.id() == id)
    }

    pub fn get_mut(&mut self, id: WorldItemId) -> Option<&mut WorldItemEntity> {
        self.entities.iter_mut().find(|e| e.id() == id)
    }

    pub fn prop_mut(&mut self, id: WorldItemId) -> Option<&mut PickupProp> {
        self.props.iter_mut().find(|p| p.id == id)
    }

    pub fn entities(&self) -> impl Iterator<Item = &WorldItemEntity> {
        self.entities.iter()
    }

    pub fn entities_mut(&mut self) -> impl Iterator<Item = &mut WorldItemEntity> {
        self.entities.iter_mut()
    }

    pub fn props(&self) -> impl Iterator<Item = &PickupProp> {
        self.props.iter()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Advances every entity's sub-state-machine and frees the finished
    /// ones (fully picked up or destroyed).
    pub fn physics_update(&mut self, delta: f32, events: &mut EventQueue) {
        for entity in self.entities.iter_mut() {
            entity.physics_update(delta, events);
        }
        self.entities.retain(|e| e.finished().is_none());
        self.props.retain(|p| p.is_enabled());
    }
}

impl Default for WorldItemRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::ItemDefinition;
    use crate::testkit::StaticScenes;
    use std::sync::Arc;

    fn knife() -> Arc<ItemDefinition> {
        Arc::new(
            ItemDefinition::new("knife", "Knife", 10)
                .with_attribute(attrs::THROW_DAMAGE, 7.0)
                .with_attribute(attrs::DURABILITY, 3.0)
                .with_world_scene("knife"),
        )
    }

    #[test]
    fn spawn_resolves_scene_and_applies_item_attributes() {
        let mut registry = WorldItemRegistry::new();
        let mut scenes = StaticScenes::with_items(&["knife"]);
        let id = registry
            .spawn_from_stack(&mut scenes, ItemStack::new(knife(), 3), Vec2::new(32.0, 0.0))
            .unwrap();
        let entity = registry.get(id).unwrap();
        assert_eq!(entity.quantity(), 3);
        assert_eq!(entity.durability(), Some(3));
        assert_eq!(entity.position(), Vec2::new(32.0, 0.0));
    }

    #[test]
    fn spawn_without_scene_returns_the_stack() {
        let mut registry = WorldItemRegistry::new();
        let mut scenes = StaticScenes::with_items(&[]); // nothing mapped
        let stack = ItemStack::new(knife(), 3);
        let (err, returned) = registry
            .spawn_from_stack(&mut scenes, stack, Vec2::ZERO)
            .unwrap_err();
        assert!(matches!(err, SpawnError::SceneMissing { .. }));
        assert_eq!(returned.quantity(), 3);
        assert!(registry.is_empty());
    }

    #[test]
    fn spawn_instantiate_failure_returns_the_stack() {
        let mut registry = WorldItemRegistry::new();
        let mut scenes = StaticScenes::with_items(&["knife"]);
        scenes.fail_instantiation = true;
        let (err, returned) = registry
            .spawn_from_stack(&mut scenes, ItemStack::new(knife(), 2), Vec2::ZERO)
            .unwrap_err();
        assert!(matches!(err, SpawnError::InstantiateFailed { .. }));
        assert_eq!(returned.quantity(), 2);
    }

    #[test]
    fn finished_entities_are_swept() {
        let mut registry = WorldItemRegistry::new();
        let mut scenes = StaticScenes::with_items(&["knife"]);
        let mut events = EventQueue::new();
        let id = registry
            .spawn_from_stack(&mut scenes, ItemStack::new(knife(), 1), Vec2::ZERO)
            .unwrap();

        let actor = Actor::new(ActorId(1), "hero");
        let mut inventory = crate::items::InventoryComponent::new();
        registry
            .get_mut(id)
            .unwrap()
            .try_pickup_by_actor(&actor, &mut inventory, false, &mut events);
        registry.physics_update(0.016, &mut events);
        assert!(registry.get(id).is_none());
    }
}
