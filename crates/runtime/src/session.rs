//! The per-tick session driver.
//!
//! Owns the player, the enemies, and the shared world, and runs one logical
//! physics tick in a fixed order: input → player machine → enemy machines →
//! world items → body integration. Cross-actor damage is buffered by the
//! arena and applied between machine updates, so every effect lands within
//! the tick it was caused in and each actor is mutated by one call chain at
//! a time.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use glam::Vec2;

use skirmish_core::states::names;
use skirmish_core::{
    enemy_state_machine, player_state_machine, Actor, ActorId, AttackSpec, AttackTemplate,
    BasicMeleeAttack, CombatTargets, EnemyAttackController, EnemyContext, EventQueue, GameEvent,
    GameWorld, InteractionDirective, InventoryComponent, ItemDefinition, ItemInteractionComponent,
    ItemStack, OverlapQuery, PlayerContext, RegionKind, SpawnError, StateMachine, WorldItemId,
    WorldItemRegistry, WorldParts,
};

use crate::input::ScriptedInput;
use crate::sim::{RecordingAnimations, SimScenes, SimSpace};

/// Errors surfaced by session operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("failed to spawn world item: {0}")]
    Spawn(#[from] SpawnError),
}

/// Overlap radii standing in for the host's collision shapes.
#[derive(Clone, Copy, Debug)]
pub struct SimRegions {
    pub attack_radius: f32,
    pub interaction_radius: f32,
    /// Radius of every item's grab region (mutual-range bookkeeping).
    pub grab_radius: f32,
    /// Distance at which a flying item contacts an actor.
    pub impact_radius: f32,
}

impl Default for SimRegions {
    fn default() -> Self {
        Self {
            attack_radius: 70.0,
            interaction_radius: 80.0,
            grab_radius: 90.0,
            impact_radius: 30.0,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct ActorSnapshot {
    id: ActorId,
    position: Vec2,
    alive: bool,
}

enum PendingEffect {
    Damage {
        target: ActorId,
        amount: u32,
        origin: Vec2,
        attacker: Option<ActorId>,
    },
    Push {
        target: ActorId,
        velocity: Vec2,
    },
}

/// The shared world handed to state machines: registry, events, scenes,
/// overlap snapshots, and a buffer of cross-actor effects.
pub struct SimArena {
    pub items: WorldItemRegistry,
    pub events: EventQueue,
    pub scenes: SimScenes,
    pub regions: SimRegions,
    snapshot: Vec<ActorSnapshot>,
    pending: Vec<PendingEffect>,
}

impl SimArena {
    fn new(scenes: SimScenes) -> Self {
        Self {
            items: WorldItemRegistry::new(),
            events: EventQueue::new(),
            scenes,
            regions: SimRegions::default(),
            snapshot: Vec::new(),
            pending: Vec::new(),
        }
    }

    fn position_of(&self, actor: ActorId) -> Option<Vec2> {
        self.snapshot
            .iter()
            .find(|s| s.id == actor && s.alive)
            .map(|s| s.position)
    }
}

impl OverlapQuery for SimArena {
    fn overlapping_actors(&self, owner: ActorId, region: RegionKind) -> Vec<ActorId> {
        let radius = match region {
            RegionKind::AttackArea => self.regions.attack_radius,
            RegionKind::InteractionArea => self.regions.interaction_radius,
        };
        let Some(origin) = self.position_of(owner) else {
            return Vec::new();
        };
        self.snapshot
            .iter()
            .filter(|s| s.id != owner && s.alive)
            .filter(|s| s.position.distance_squared(origin) <= radius * radius)
            .map(|s| s.id)
            .collect()
    }

    fn overlapping_items(&self, owner: ActorId, region: RegionKind) -> Vec<WorldItemId> {
        let radius = match region {
            RegionKind::AttackArea => self.regions.attack_radius,
            RegionKind::InteractionArea => self.regions.interaction_radius,
        };
        let Some(origin) = self.position_of(owner) else {
            return Vec::new();
        };
        self.items
            .entities()
            .filter(|e| e.is_pickup_enabled())
            .filter(|e| e.position().distance_squared(origin) <= radius * radius)
            .map(|e| e.id())
            .collect()
    }
}

impl CombatTargets for SimArena {
    fn target_position(&self, target: ActorId) -> Option<Vec2> {
        self.position_of(target)
    }

    fn deal_damage(
        &mut self,
        target: ActorId,
        amount: u32,
        origin: Vec2,
        attacker: Option<ActorId>,
    ) {
        self.pending.push(PendingEffect::Damage {
            target,
            amount,
            origin,
            attacker,
        });
    }

    fn push(&mut self, target: ActorId, velocity: Vec2) {
        self.pending.push(PendingEffect::Push { target, velocity });
    }
}

impl GameWorld for SimArena {
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

/// An AI actor and its machine.
pub struct EnemyUnit {
    pub ctx: EnemyContext,
    pub machine: StateMachine<EnemyContext>,
}

/// Headless game session driving the full gameplay pipeline.
pub struct Session {
    pub player: PlayerContext,
    pub player_machine: StateMachine<PlayerContext>,
    /// Scripting handle sharing state with the player context's input.
    pub input: ScriptedInput,
    /// Recording handle sharing state with the player's animation sink.
    pub animations: RecordingAnimations,
    pub arena: SimArena,
    enemies: Vec<EnemyUnit>,
    space: Rc<RefCell<SimSpace>>,
    next_actor_id: u32,
}

impl Session {
    /// Builds a session whose scene resolver knows the given item ids.
    pub fn new(world_items: &[&str]) -> Self {
        let space = Rc::new(RefCell::new(SimSpace::new()));
        let scenes = SimScenes::new(Rc::clone(&space), world_items);
        let mut arena = SimArena::new(scenes);

        let input = ScriptedInput::new();
        let animations = RecordingAnimations::new();
        let actor = Actor::new(ActorId::PLAYER, "player");
        let mut player = PlayerContext::new(
            actor,
            InventoryComponent::new(),
            ItemInteractionComponent::default(),
            Box::new(animations.clone()),
            Box::new(input.clone()),
        );
        let mut player_machine = player_state_machine(&player);
        player_machine.change_state(&mut player, &mut arena, names::IDLE);

        Self {
            player,
            player_machine,
            input,
            animations,
            arena,
            enemies: Vec::new(),
            space,
            next_actor_id: 1,
        }
    }

    /// Attaches the default melee template to the player.
    pub fn with_basic_melee(mut self) -> Self {
        self.player.attack_templates.push(AttackTemplate::new(
            AttackSpec::new("BasicMelee").from_states(&[names::IDLE, names::WALK, names::RUN]),
            Box::new(BasicMeleeAttack::new()),
        ));
        self
    }

    /// Puts items straight into the player's inventory.
    pub fn give_player(&mut self, item: &Arc<ItemDefinition>, quantity: u32) -> u32 {
        self.player.inventory.add_item_smart(item, quantity)
    }

    /// Spawns an at-rest world item.
    pub fn spawn_world_item(
        &mut self,
        item: Arc<ItemDefinition>,
        quantity: u32,
        position: Vec2,
    ) -> Result<WorldItemId, SessionError> {
        let SimArena { items, scenes, .. } = &mut self.arena;
        items
            .spawn_from_stack(scenes, ItemStack::new(item, quantity), position)
            .map_err(|(err, stack)| {
                tracing::warn!(item = %stack.id(), "scenario spawn failed");
                err.into()
            })
    }

    /// Adds an enemy with its attack controller; starts idle.
    pub fn add_enemy(
        &mut self,
        name: &str,
        position: Vec2,
        controller: EnemyAttackController,
    ) -> ActorId {
        let id = ActorId(self.next_actor_id);
        self.next_actor_id += 1;
        let actor = Actor::new(id, name).at(position);
        let mut ctx = EnemyContext::new(actor, controller, Box::new(RecordingAnimations::new()));
        let mut machine = enemy_state_machine(&ctx);
        self.rebuild_snapshot();
        machine.change_state(&mut ctx, &mut self.arena, names::IDLE);
        self.enemies.push(EnemyUnit { ctx, machine });
        id
    }

    pub fn enemy(&self, id: ActorId) -> Option<&EnemyUnit> {
        self.enemies.iter().find(|u| u.ctx.actor.id == id)
    }

    pub fn enemy_mut(&mut self, id: ActorId) -> Option<&mut EnemyUnit> {
        self.enemies.iter_mut().find(|u| u.ctx.actor.id == id)
    }

    /// Removes and returns all events published so far.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.arena.events.drain()
    }

    /// Runs `count` ticks at a fixed delta.
    pub fn run_ticks(&mut self, count: usize, delta: f32) {
        for _ in 0..count {
            self.tick(delta);
        }
    }

    /// One logical physics tick.
    pub fn tick(&mut self, delta: f32) {
        self.rebuild_snapshot();

        // cooldowns advance even while no attack state is active
        self.player.tick_attack_cooldowns(delta);

        // interaction input, then any state the component asked for
        let has_throw = self.player_machine.has_state(names::THROW);
        let has_pickup = self.player_machine.has_state(names::PICK_UP);
        let directive = {
            let PlayerContext {
                actor,
                inventory,
                interaction,
                input,
                ..
            } = &mut self.player;
            interaction.process_input(
                input.as_ref(),
                has_throw,
                has_pickup,
                actor,
                inventory,
                &mut self.arena,
            )
        };
        match directive {
            Some(InteractionDirective::EnterThrowState) => {
                self.player_machine
                    .change_state(&mut self.player, &mut self.arena, names::THROW);
            }
            Some(InteractionDirective::EnterPickupState) => {
                self.player_machine
                    .change_state(&mut self.player, &mut self.arena, names::PICK_UP);
            }
            None => {}
        }

        self.player_machine
            .physics_update(&mut self.player, &mut self.arena, delta);
        self.apply_pending_effects();

        self.rebuild_snapshot();
        for index in 0..self.enemies.len() {
            let unit = &mut self.enemies[index];
            unit.ctx.controller.tick_cooldowns(delta);
            unit.machine
                .physics_update(&mut unit.ctx, &mut self.arena, delta);
        }
        self.apply_pending_effects();

        self.sync_grab_ranges();
        self.detect_impacts();

        let SimArena { items, events, .. } = &mut self.arena;
        items.physics_update(delta, events);
        self.space.borrow_mut().step(delta);

        self.input.end_tick();
    }

    fn rebuild_snapshot(&mut self) {
        self.arena.snapshot.clear();
        self.arena.snapshot.push(ActorSnapshot {
            id: self.player.actor.id,
            position: self.player.actor.position,
            alive: self.player.actor.is_alive(),
        });
        for unit in &self.enemies {
            self.arena.snapshot.push(ActorSnapshot {
                id: unit.ctx.actor.id,
                position: unit.ctx.actor.position,
                alive: unit.ctx.actor.is_alive(),
            });
        }
    }

    fn apply_pending_effects(&mut self) {
        let pending = std::mem::take(&mut self.arena.pending);
        let Session {
            player,
            enemies,
            arena,
            ..
        } = self;
        for effect in pending {
            match effect {
                PendingEffect::Damage {
                    target,
                    amount,
                    origin,
                    attacker,
                } => {
                    if let Some(actor) = find_actor(player, enemies, target) {
                        actor.take_damage(amount, Some(origin), attacker, &mut arena.events);
                    }
                }
                PendingEffect::Push { target, velocity } => {
                    if let Some(actor) = find_actor(player, enemies, target) {
                        actor.apply_knockback(velocity);
                    }
                }
            }
        }
    }

    /// Mutable access to any actor in the session (tests, host tooling).
    pub fn actor_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        find_actor(&mut self.player, &mut self.enemies, id)
    }

    /// Distance-based grab-region bookkeeping (mutual-range checks).
    fn sync_grab_ranges(&mut self) {
        let grab_sq = self.arena.regions.grab_radius * self.arena.regions.grab_radius;
        let snapshot: Vec<(ActorId, Vec2, bool)> = self
            .arena
            .snapshot
            .iter()
            .map(|s| (s.id, s.position, s.alive))
            .collect();
        for entity in self.arena.items.entities_mut() {
            for (id, position, alive) in &snapshot {
                let inside = *alive && entity.position().distance_squared(*position) <= grab_sq;
                if inside {
                    entity.actor_entered_range(*id);
                } else {
                    entity.actor_left_range(*id);
                }
            }
        }
    }

    /// Immutable access to any actor in the session.
    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        if self.player.actor.id == id {
            return Some(&self.player.actor);
        }
        self.enemies
            .iter()
            .map(|u| &u.ctx.actor)
            .find(|a| a.id == id)
    }

    /// Naive contact reporting: an armed item within the impact radius of
    /// an actor collides with it.
    fn detect_impacts(&mut self) {
        let impact_sq = self.arena.regions.impact_radius * self.arena.regions.impact_radius;
        let SimArena { items, events, .. } = &mut self.arena;
        for entity in items.entities_mut() {
            if !entity.is_armed() {
                continue;
            }
            if self.player.actor.is_alive()
                && entity.position().distance_squared(self.player.actor.position) <= impact_sq
            {
                entity.handle_impact(&mut self.player.actor, events);
            }
            for unit in self.enemies.iter_mut() {
                if unit.ctx.actor.is_alive()
                    && entity.position().distance_squared(unit.ctx.actor.position) <= impact_sq
                {
                    entity.handle_impact(&mut unit.ctx.actor, events);
                }
            }
        }
    }
}

fn find_actor<'a>(
    player: &'a mut PlayerContext,
    enemies: &'a mut [EnemyUnit],
    id: ActorId,
) -> Option<&'a mut Actor> {
    if player.actor.id == id {
        return Some(&mut player.actor);
    }
    enemies.iter_mut().map(|u| &mut u.ctx.actor).find(|a| a.id == id)
}
