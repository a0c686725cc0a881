//! Shared test doubles for unit tests.
//!
//! A deliberately small host: a static scene table, a kinematic body, and a
//! `GameWorld` whose overlap snapshots and damage applications are plain
//! vectors the tests inspect directly.

use std::collections::HashMap;
use std::sync::Arc;

use glam::Vec2;

use crate::actor::ActorId;
use crate::env::{
    CombatTargets, GameWorld, OverlapQuery, PhysicsBody, RegionKind, SceneHandle, SceneResolver,
    WorldParts,
};
use crate::events::EventQueue;
use crate::items::{ItemDefinition, ItemStack};
use crate::world::{WorldItemId, WorldItemRegistry};

/// Kinematic physics body storing its pose directly.
#[derive(Clone, Debug)]
pub struct TestBody {
    pub position: Vec2,
    pub velocity: Vec2,
    pub frozen: bool,
    pub gravity_scale: f32,
}

impl Default for TestBody {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            frozen: true,
            gravity_scale: 1.0,
        }
    }
}

impl PhysicsBody for TestBody {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    fn velocity(&self) -> Vec2 {
        self.velocity
    }

    fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }

    fn is_frozen(&self) -> bool {
        self.frozen
    }

    fn set_frozen(&mut self, frozen: bool) {
        self.frozen = frozen;
    }

    fn gravity_scale(&self) -> f32 {
        self.gravity_scale
    }

    fn set_gravity_scale(&mut self, scale: f32) {
        self.gravity_scale = scale;
    }
}

/// Scene resolver over a static item-id table.
#[derive(Debug, Default)]
pub struct StaticScenes {
    mapped: HashMap<String, SceneHandle>,
    next_handle: u32,
    /// Force `instantiate` to fail, simulating a broken scene.
    pub fail_instantiation: bool,
}

impl StaticScenes {
    pub fn with_items(items: &[&str]) -> Self {
        let mut scenes = Self::default();
        for item in items {
            scenes.map_item(item);
        }
        scenes
    }

    pub fn map_item(&mut self, item: &str) -> SceneHandle {
        if let Some(handle) = self.mapped.get(item) {
            return *handle;
        }
        self.next_handle += 1;
        let handle = SceneHandle(self.next_handle);
        self.mapped.insert(item.to_owned(), handle);
        handle
    }
}

impl SceneResolver for StaticScenes {
    fn resolve_world_scene(&mut self, item: &crate::items::ItemId) -> Option<SceneHandle> {
        self.mapped.get(item.as_str()).copied()
    }

    fn instantiate(&mut self, _handle: SceneHandle) -> Option<Box<dyn PhysicsBody>> {
        if self.fail_instantiation {
            None
        } else {
            Some(Box::new(TestBody::default()))
        }
    }
}

/// `GameWorld` test double with scripted overlaps and a damage log.
#[derive(Default)]
pub struct TestWorld {
    pub items: WorldItemRegistry,
    pub events: EventQueue,
    pub scenes: StaticScenes,
    /// Actors every `overlapping_actors` query reports.
    pub overlap_actors: Vec<ActorId>,
    /// Items every `overlapping_items` query reports.
    pub overlap_items: Vec<WorldItemId>,
    /// `(target, amount)` per `deal_damage` call.
    pub damage_log: Vec<(ActorId, u32)>,
    /// `(target, velocity)` per `push` call.
    pub push_log: Vec<(ActorId, Vec2)>,
    /// Positions reported for targets.
    pub target_positions: HashMap<ActorId, Vec2>,
}

impl TestWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scenes(items: &[&str]) -> Self {
        Self {
            scenes: StaticScenes::with_items(items),
            ..Self::default()
        }
    }

    /// Spawns an at-rest entity for the definition, mapping its scene on
    /// demand.
    pub fn spawn_resting(
        &mut self,
        item: Arc<ItemDefinition>,
        quantity: u32,
        position: Vec2,
    ) -> WorldItemId {
        self.scenes.map_item(item.id.as_str());
        self.items
            .spawn_from_stack(&mut self.scenes, ItemStack::new(item, quantity), position)
            .expect("test spawn")
    }
}

impl OverlapQuery for TestWorld {
    fn overlapping_actors(&self, _owner: ActorId, _region: RegionKind) -> Vec<ActorId> {
        self.overlap_actors.clone()
    }

    fn overlapping_items(&self, _owner: ActorId, _region: RegionKind) -> Vec<WorldItemId> {
        self.overlap_items.clone()
    }
}

impl CombatTargets for TestWorld {
    fn target_position(&self, target: ActorId) -> Option<Vec2> {
        self.target_positions.get(&target).copied()
    }

    fn deal_damage(
        &mut self,
        target: ActorId,
        amount: u32,
        _origin: Vec2,
        _attacker: Option<ActorId>,
    ) {
        self.damage_log.push((target, amount));
    }

    fn push(&mut self, target: ActorId, velocity: Vec2) {
        self.push_log.push((target, velocity));
    }
}

impl GameWorld for TestWorld {
    fn parts(&mut self) -> WorldParts<'_> {
        WorldParts {
            items: &mut self.items,
            events: &mut self.events,
            scenes: &mut self.scenes,
        }
    }

    fn overlaps(&self) -> &dyn OverlapQuery {
        self
    }

    fn targets(&mut self) -> &mut dyn CombatTargets {
        self
    }
}
