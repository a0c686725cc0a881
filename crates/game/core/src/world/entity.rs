//! The world-item entity and its motion/impact/durability machinery.

use glam::Vec2;

use crate::actor::{Actor, ActorId};
use crate::env::{AnimationSink, PhysicsBody};
use crate::events::{EventQueue, GameEvent};
use crate::items::{ItemId, ItemStack};

use super::registry::WorldItemId;

bitflags::bitflags! {
    /// Impact handling policy of a world item.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct ImpactPolicy: u32 {
        /// Each hit consumes one durability point (finite-durability items).
        const CONSUME_DURABILITY = 1 << 0;
        /// Halt motion on the first hit instead of passing through targets.
        const STOP_ON_HIT = 1 << 1;
        /// Disable the grab region once the stack transfers completely.
        const AUTO_DISABLE_PICKUP = 1 << 2;
    }
}

impl Default for ImpactPolicy {
    fn default() -> Self {
        Self::CONSUME_DURABILITY | Self::AUTO_DISABLE_PICKUP
    }
}

/// Tunable constants of the world-item physics protocol.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WorldItemTuning {
    /// How long a thrown item keeps flying before it starts dropping.
    pub flight_duration: f32,
    /// Vertical displacement after which a dropping item is grounded.
    pub drop_limit_distance: f32,
    /// Downward speed applied when the drop begins.
    pub drop_vertical_speed: f32,
    /// Horizontal speed multiplier applied when the drop begins.
    pub drop_horizontal_damping: f32,
    /// Speed below which the body counts as resting.
    pub rest_speed_threshold: f32,
    /// Time the body must stay below the rest threshold before freezing.
    pub rest_debounce: f32,
    /// Damage dealt on a qualifying impact.
    pub throw_damage: f32,
    /// Minimum impact speed for a collision to deal damage.
    pub min_damage_velocity: f32,
    /// Knockback applied away from the impact point.
    pub knockback_force: f32,
    /// Destruction wait when no destruction animation is configured.
    pub destruction_fallback_duration: f32,
}

impl Default for WorldItemTuning {
    fn default() -> Self {
        Self {
            flight_duration: 0.4,
            drop_limit_distance: 64.0,
            drop_vertical_speed: 240.0,
            drop_horizontal_damping: 0.6,
            rest_speed_threshold: 8.0,
            rest_debounce: 0.25,
            throw_damage: 4.0,
            min_damage_velocity: 300.0,
            knockback_force: 200.0,
            destruction_fallback_duration: 0.5,
        }
    }
}

/// Motion sub-state of a world item.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MotionState {
    /// Frozen in place, pickable.
    AtRest,
    /// Horizontal travel after a throw; gravity suppressed.
    Flight { elapsed: f32 },
    /// Falling after flight; ends at the drop limit or once speed stays
    /// below the rest threshold long enough.
    Dropping { start_y: f32, settle: f32 },
}

/// Why an entity finished and should be freed by the registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FinishReason {
    PickedUp,
    Destroyed,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Lifecycle {
    Live,
    Destroying { elapsed: f32, duration: f32 },
    Finished(FinishReason),
}

/// Spawned world representation of a dropped or thrown stack.
///
/// Owns its physics body through the narrow [`PhysicsBody`] interface and
/// runs its own sub-state-machine: flight → drop → rest, orthogonal to
/// damage arming and destruction. Created on spawn; freed by the registry
/// after a full pickup or once destruction completes.
pub struct WorldItemEntity {
    id: WorldItemId,
    stack: Option<ItemStack>,
    body: Box<dyn PhysicsBody>,
    animation: Box<dyn AnimationSink>,
    tuning: WorldItemTuning,
    policy: ImpactPolicy,
    motion: MotionState,
    lifecycle: Lifecycle,
    /// While armed, the next qualifying collision deals damage.
    armed: bool,
    hit_this_throw: Vec<ActorId>,
    /// `None` means indestructible.
    durability: Option<u32>,
    destruction_animation: Option<(String, f32)>,
    pickup_enabled: bool,
    actors_in_range: Vec<ActorId>,
    last_dropped_by: Option<ActorId>,
    initial_gravity_scale: f32,
}

impl WorldItemEntity {
    pub fn new(
        id: WorldItemId,
        stack: ItemStack,
        body: Box<dyn PhysicsBody>,
        animation: Box<dyn AnimationSink>,
        tuning: WorldItemTuning,
        policy: ImpactPolicy,
        durability: Option<u32>,
    ) -> Self {
        let initial_gravity_scale = body.gravity_scale();
        let mut entity = Self {
            id,
            stack: Some(stack),
            body,
            animation,
            tuning,
            policy,
            motion: MotionState::AtRest,
            lifecycle: Lifecycle::Live,
            armed: false,
            hit_this_throw: Vec::new(),
            durability,
            destruction_animation: None,
            pickup_enabled: true,
            actors_in_range: Vec::new(),
            last_dropped_by: None,
            initial_gravity_scale,
        };
        entity.body.set_frozen(true);
        entity
    }

    pub fn with_destruction_animation(mut self, name: impl Into<String>, duration: f32) -> Self {
        self.destruction_animation = Some((name.into(), duration));
        self
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn id(&self) -> WorldItemId {
        self.id
    }

    /// The stack still held by the entity; `None` after a full transfer.
    pub fn current_stack(&self) -> Option<&ItemStack> {
        self.stack.as_ref()
    }

    pub fn item_id(&self) -> Option<&ItemId> {
        self.stack.as_ref().map(|s| s.id())
    }

    pub fn quantity(&self) -> u32 {
        self.stack.as_ref().map_or(0, |s| s.quantity())
    }

    pub fn position(&self) -> Vec2 {
        self.body.position()
    }

    pub fn motion(&self) -> MotionState {
        self.motion
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn durability(&self) -> Option<u32> {
        self.durability
    }

    pub fn is_destroying(&self) -> bool {
        matches!(self.lifecycle, Lifecycle::Destroying { .. })
    }

    /// Set once the entity should be freed; the registry sweeps these.
    pub fn finished(&self) -> Option<FinishReason> {
        match self.lifecycle {
            Lifecycle::Finished(reason) => Some(reason),
            _ => None,
        }
    }

    pub fn is_pickup_enabled(&self) -> bool {
        self.pickup_enabled
    }

    pub fn last_dropped_by(&self) -> Option<ActorId> {
        self.last_dropped_by
    }

    pub fn set_last_dropped_by(&mut self, actor: Option<ActorId>) {
        self.last_dropped_by = actor;
    }

    // ========================================================================
    // Mutual range tracking (fed by the host's grab region)
    // ========================================================================

    pub fn actor_entered_range(&mut self, actor: ActorId) {
        if !self.actors_in_range.contains(&actor) {
            self.actors_in_range.push(actor);
        }
    }

    pub fn actor_left_range(&mut self, actor: ActorId) {
        self.actors_in_range.retain(|a| *a != actor);
    }

    /// Mutual-range check: the item must also see the actor in its own
    /// grab region for a distance-scan pickup to qualify.
    pub fn is_actor_in_range(&self, actor: ActorId) -> bool {
        self.actors_in_range.contains(&actor)
    }

    // ========================================================================
    // Throw / motion
    // ========================================================================

    /// Launches the entity: flight state, gravity off, damage armed, fresh
    /// per-throw hit set.
    pub fn apply_throw_impulse(&mut self, velocity: Vec2) {
        if self.finished().is_some() || self.is_destroying() {
            return;
        }
        self.body.set_frozen(false);
        self.body.set_gravity_scale(0.0);
        self.body.set_velocity(velocity);
        self.motion = MotionState::Flight { elapsed: 0.0 };
        if velocity.length_squared() > 0.01 {
            self.armed = true;
            self.hit_this_throw.clear();
        }
    }

    /// Advances the motion sub-state-machine by one tick.
    pub fn physics_update(&mut self, delta: f32, events: &mut EventQueue) {
        match self.lifecycle {
            Lifecycle::Finished(_) => return,
            Lifecycle::Destroying { elapsed, duration } => {
                let elapsed = elapsed + delta;
                if elapsed >= duration {
                    self.complete_destruction(events);
                } else {
                    self.lifecycle = Lifecycle::Destroying { elapsed, duration };
                }
                return;
            }
            Lifecycle::Live => {}
        }

        match self.motion {
            MotionState::AtRest => {}
            MotionState::Flight { elapsed } => {
                let elapsed = elapsed + delta;
                let velocity = self.body.velocity();
                // pure horizontal travel while flying
                self.body.set_velocity(Vec2::new(velocity.x, 0.0));
                if elapsed >= self.tuning.flight_duration {
                    self.body.set_gravity_scale(self.initial_gravity_scale);
                    self.body.set_velocity(Vec2::new(
                        velocity.x * self.tuning.drop_horizontal_damping,
                        self.tuning.drop_vertical_speed,
                    ));
                    self.motion = MotionState::Dropping {
                        start_y: self.body.position().y,
                        settle: 0.0,
                    };
                } else {
                    self.motion = MotionState::Flight { elapsed };
                }
            }
            MotionState::Dropping { start_y, settle } => {
                if self.body.position().y - start_y >= self.tuning.drop_limit_distance {
                    self.come_to_rest();
                    return;
                }
                let speed = self.body.velocity().length();
                if speed <= self.tuning.rest_speed_threshold {
                    let settle = settle + delta;
                    if settle >= self.tuning.rest_debounce {
                        self.come_to_rest();
                    } else {
                        self.motion = MotionState::Dropping { start_y, settle };
                    }
                } else {
                    self.motion = MotionState::Dropping { start_y, settle: 0.0 };
                }
            }
        }
    }

    fn come_to_rest(&mut self) {
        self.body.set_frozen(true);
        self.body.set_velocity(Vec2::ZERO);
        self.motion = MotionState::AtRest;
        self.armed = false;
    }

    /// Halts motion entirely (stop-on-hit policy).
    fn stop_movement(&mut self) {
        self.body.set_velocity(Vec2::ZERO);
        self.body.set_gravity_scale(self.initial_gravity_scale);
        self.body.set_frozen(true);
        self.motion = MotionState::AtRest;
        self.armed = false;
    }

    // ========================================================================
    // Impact damage
    // ========================================================================

    /// Called by the host when its physics engine reports a collision with
    /// an actor. Deals the configured damage once per target per throw when
    /// armed and fast enough; applies knockback away from the impact point
    /// and consumes durability per policy. Returns true when damage landed.
    pub fn handle_impact(&mut self, target: &mut Actor, events: &mut EventQueue) -> bool {
        if !self.armed || self.is_destroying() || self.finished().is_some() {
            return false;
        }
        if Some(target.id) == self.last_dropped_by {
            return false;
        }
        if self.hit_this_throw.contains(&target.id) {
            return false;
        }
        let velocity = self.body.velocity();
        if velocity.length() < self.tuning.min_damage_velocity {
            return false;
        }

        let damage = (self.tuning.throw_damage.round() as u32).max(1);
        let origin = self.body.position();
        target.take_damage(damage, Some(origin), self.last_dropped_by, events);
        self.hit_this_throw.push(target.id);

        if self.tuning.knockback_force > 0.0 {
            let mut direction = target.position - origin;
            if direction.length_squared() < 0.01 {
                // positions coincide; push along the impact velocity instead
                direction = velocity;
            }
            target.apply_knockback(direction.normalize_or_zero() * self.tuning.knockback_force);
        }

        if self.policy.contains(ImpactPolicy::CONSUME_DURABILITY) {
            self.consume_durability(1);
        }
        if self.policy.contains(ImpactPolicy::STOP_ON_HIT) {
            self.stop_movement();
        }
        true
    }

    // ========================================================================
    // Durability / destruction
    // ========================================================================

    fn consume_durability(&mut self, amount: u32) {
        let destroying = self.is_destroying();
        let Some(durability) = self.durability.as_mut() else {
            return;
        };
        if destroying {
            return;
        }
        *durability = durability.saturating_sub(amount);
        if *durability == 0 {
            self.begin_destruction();
        }
    }

    /// Starts the destruction sequence: damage and pickup disabled, body
    /// frozen, destruction animation (or the fallback wait) running.
    fn begin_destruction(&mut self) {
        if self.is_destroying() || self.finished().is_some() {
            return;
        }
        self.armed = false;
        self.pickup_enabled = false;
        self.body.set_velocity(Vec2::ZERO);
        self.body.set_frozen(true);

        let duration = match &self.destruction_animation {
            Some((name, duration)) => {
                self.animation.play(name, false, 1.0);
                *duration
            }
            None => self.tuning.destruction_fallback_duration,
        };
        self.lifecycle = Lifecycle::Destroying {
            elapsed: 0.0,
            duration,
        };
    }

    /// Finishes destruction exactly once. Safe to call again (idempotent) -
    /// hosts wire their animation-finished callback here while the timer
    /// acts as a backstop.
    pub fn complete_destruction(&mut self, events: &mut EventQueue) {
        if !self.is_destroying() {
            return;
        }
        if let Some(item) = self.item_id().cloned() {
            events.push(GameEvent::ItemDestroyed {
                entity: self.id,
                item,
            });
        }
        self.lifecycle = Lifecycle::Finished(FinishReason::Destroyed);
    }

    // ========================================================================
    // Pickup transfer
    // ========================================================================

    /// Attempts to transfer the stack into the actor's inventory.
    ///
    /// Full acceptance frees the entity; partial acceptance keeps the
    /// remainder pickable; zero acceptance changes nothing. Observers can
    /// tell transfer from failure by the emitted event.
    pub fn try_pickup_by_actor(
        &mut self,
        actor: &Actor,
        inventory: &mut crate::items::InventoryComponent,
        to_backpack: bool,
        events: &mut EventQueue,
    ) -> bool {
        if !self.pickup_enabled || self.is_destroying() || self.finished().is_some() {
            return false;
        }
        let Some(stack) = self.stack.as_mut() else {
            return false;
        };
        if stack.is_empty() {
            return false;
        }

        let accepted = if to_backpack {
            inventory.add_to_backpack(stack)
        } else {
            let accepted = inventory.add_item_smart(stack.item(), stack.quantity());
            stack.remove(accepted);
            accepted
        };

        if accepted == 0 {
            events.push(GameEvent::ItemTransferFailed {
                entity: self.id,
                actor: actor.id,
            });
            return false;
        }

        let item = stack.id().clone();
        let fully_transferred = stack.is_empty();
        events.push(GameEvent::ItemTransferred {
            entity: self.id,
            actor: actor.id,
            item,
            amount: accepted,
        });

        if fully_transferred {
            self.stack = None;
            if self.policy.contains(ImpactPolicy::AUTO_DISABLE_PICKUP) {
                self.pickup_enabled = false;
            }
            self.lifecycle = Lifecycle::Finished(FinishReason::PickedUp);
        } else {
            // partial pickups must remain pickable
            self.pickup_enabled = true;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::anim::NullAnimations;
    use crate::items::{attrs, InventoryComponent, ItemDefinition};
    use crate::testkit::TestBody;
    use std::sync::Arc;

    fn knife_def() -> Arc<ItemDefinition> {
        Arc::new(
            ItemDefinition::new("knife", "Knife", 10)
                .with_attribute(attrs::THROW_DAMAGE, 4.0)
                .with_world_scene("knife"),
        )
    }

    fn entity(stack_size: u32, durability: Option<u32>) -> WorldItemEntity {
        WorldItemEntity::new(
            WorldItemId(1),
            ItemStack::new(knife_def(), stack_size),
            Box::new(TestBody::default()),
            Box::new(NullAnimations),
            WorldItemTuning::default(),
            ImpactPolicy::default(),
            durability,
        )
    }

    fn tick(entity: &mut WorldItemEntity, events: &mut EventQueue, steps: usize, dt: f32) {
        for _ in 0..steps {
            entity.physics_update(dt, events);
        }
    }

    #[test]
    fn throw_enters_flight_then_drops_then_rests() {
        let mut events = EventQueue::new();
        let mut e = entity(1, None);
        e.apply_throw_impulse(Vec2::new(800.0, 0.0));
        assert!(matches!(e.motion(), MotionState::Flight { .. }));
        assert!(e.is_armed());

        // flight duration is 0.4s
        tick(&mut e, &mut events, 5, 0.1);
        assert!(matches!(e.motion(), MotionState::Dropping { .. }));

        // body is kinematic in tests; simulate slowing to rest
        // (velocity decays only through the entity's own transitions, so
        // force it below the rest threshold)
        e.body.set_velocity(Vec2::new(0.0, 1.0));
        tick(&mut e, &mut events, 4, 0.1);
        assert!(matches!(e.motion(), MotionState::AtRest));
        assert!(!e.is_armed());
    }

    #[test]
    fn impact_damages_once_per_target_per_throw() {
        let mut events = EventQueue::new();
        let mut e = entity(3, None);
        e.apply_throw_impulse(Vec2::new(800.0, 0.0));

        let mut target = Actor::new(ActorId(5), "orc").with_health(20).at(Vec2::new(50.0, 0.0));
        assert!(e.handle_impact(&mut target, &mut events));
        assert_eq!(target.hp, 16);
        // overlapping for several more ticks: no second application
        assert!(!e.handle_impact(&mut target, &mut events));
        assert_eq!(target.hp, 16);
        // knockback applied once, away from the impact point
        assert!(target.velocity.x > 0.0);
    }

    #[test]
    fn impact_ignores_the_thrower_and_slow_hits() {
        let mut events = EventQueue::new();
        let mut e = entity(1, None);
        e.set_last_dropped_by(Some(ActorId(1)));
        e.apply_throw_impulse(Vec2::new(800.0, 0.0));

        let mut thrower = Actor::new(ActorId(1), "hero");
        assert!(!e.handle_impact(&mut thrower, &mut events));

        let mut target = Actor::new(ActorId(2), "orc");
        e.body.set_velocity(Vec2::new(10.0, 0.0)); // below MinDamageVelocity
        assert!(!e.handle_impact(&mut target, &mut events));
    }

    #[test]
    fn durability_reaches_zero_and_destroys_exactly_once() {
        let mut events = EventQueue::new();
        let mut e = entity(1, Some(1));
        e.apply_throw_impulse(Vec2::new(800.0, 0.0));

        let mut target = Actor::new(ActorId(2), "orc").at(Vec2::new(30.0, 0.0));
        assert!(e.handle_impact(&mut target, &mut events));
        assert_eq!(e.durability(), Some(0));
        assert!(e.is_destroying());
        assert!(!e.is_pickup_enabled());

        // fallback destruction duration elapses; completion is idempotent
        tick(&mut e, &mut events, 6, 0.1);
        assert_eq!(e.finished(), Some(FinishReason::Destroyed));
        e.complete_destruction(&mut events);
        let destroyed = events
            .drain()
            .into_iter()
            .filter(|ev| matches!(ev, GameEvent::ItemDestroyed { .. }))
            .count();
        assert_eq!(destroyed, 1);
    }

    #[test]
    fn partial_pickup_keeps_remainder_pickable() {
        let mut events = EventQueue::new();
        let actor = Actor::new(ActorId(1), "hero");

        // pack every slot with non-stackable rocks except one opening that
        // can only take 6 more knives (max_stack 10, 4 already present)
        let knife = knife_def();
        let rock = Arc::new(ItemDefinition::new("rock", "Rock", 1));
        let mut inventory = InventoryComponent::new();
        inventory.add_item_smart(&knife, 4);
        while inventory.add_item_smart(&rock, 1) > 0 {}

        let mut e = WorldItemEntity::new(
            WorldItemId(2),
            ItemStack::new(knife, 10),
            Box::new(TestBody::default()),
            Box::new(NullAnimations),
            WorldItemTuning::default(),
            ImpactPolicy::default(),
            None,
        );
        assert!(e.try_pickup_by_actor(&actor, &mut inventory, false, &mut events));
        // 6 accepted, 4 retained and still pickable
        assert_eq!(e.quantity(), 4);
        assert!(e.finished().is_none());
        assert!(e.is_pickup_enabled());

        match events.drain().as_slice() {
            [GameEvent::ItemTransferred { amount, .. }] => assert_eq!(*amount, 6),
            other => panic!("unexpected events {other:?}"),
        }
    }

    #[test]
    fn full_pickup_frees_the_entity() {
        let mut events = EventQueue::new();
        let mut e = entity(3, None);
        let actor = Actor::new(ActorId(1), "hero");
        let mut inventory = InventoryComponent::new();
        assert!(e.try_pickup_by_actor(&actor, &mut inventory, false, &mut events));
        assert_eq!(e.finished(), Some(FinishReason::PickedUp));
        assert!(e.current_stack().is_none());
        assert!(!e.is_pickup_enabled());
    }

    #[test]
    fn rejected_pickup_changes_nothing_and_reports_failure() {
        let mut events = EventQueue::new();
        // non-stackable sword into a full inventory
        let sword = Arc::new(ItemDefinition::new("sword", "Sword", 1));
        let mut e = WorldItemEntity::new(
            WorldItemId(3),
            ItemStack::new(sword.clone(), 1),
            Box::new(TestBody::default()),
            Box::new(NullAnimations),
            WorldItemTuning::default(),
            ImpactPolicy::default(),
            None,
        );
        let actor = Actor::new(ActorId(1), "hero");
        let mut inventory = InventoryComponent::new();
        while inventory.add_item_smart(&sword, 1) > 0 {}
        assert!(!e.try_pickup_by_actor(&actor, &mut inventory, false, &mut events));
        assert_eq!(e.quantity(), 1);
        assert!(e.finished().is_none());
        assert!(events
            .iter()
            .any(|ev| matches!(ev, GameEvent::ItemTransferFailed { .. })));
    }

    #[test]
    fn mutual_range_tracking() {
        let mut e = entity(1, None);
        e.actor_entered_range(ActorId(1));
        assert!(e.is_actor_in_range(ActorId(1)));
        e.actor_left_range(ActorId(1));
        assert!(!e.is_actor_in_range(ActorId(1)));
    }
}
