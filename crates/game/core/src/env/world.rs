//! Shared world access for states and attack templates.

use glam::Vec2;

use crate::actor::ActorId;
use crate::events::EventQueue;
use crate::world::{WorldItemId, WorldItemRegistry};

use super::scene::SceneResolver;

/// Overlap regions gameplay code can query. The host owns the actual
/// collision shapes and what "overlapping" means for each.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RegionKind {
    /// The actor's attack hit region.
    AttackArea,
    /// The actor's pickup/interaction region.
    InteractionArea,
}

/// Point-in-time overlap snapshots, one per tick.
pub trait OverlapQuery {
    /// Actors currently overlapping `owner`'s region.
    fn overlapping_actors(&self, owner: ActorId, region: RegionKind) -> Vec<ActorId>;

    /// World items currently overlapping `owner`'s region.
    fn overlapping_items(&self, owner: ActorId, region: RegionKind) -> Vec<WorldItemId>;
}

/// Damage and displacement applied to actors other than the acting one.
///
/// Attack templates and thrown items address targets by id so no actor
/// reference is held across ticks. Hosts may apply the effects immediately
/// or defer them to the end of the current call chain, as long as they land
/// within the same tick.
pub trait CombatTargets {
    /// Position of a target, `None` if it no longer exists.
    fn target_position(&self, target: ActorId) -> Option<Vec2>;

    /// Applies damage to a target.
    fn deal_damage(&mut self, target: ActorId, amount: u32, origin: Vec2, attacker: Option<ActorId>);

    /// Adds a velocity impulse to a target (knockback).
    fn push(&mut self, target: ActorId, velocity: Vec2);
}

/// Split borrows of the host-owned world pieces.
///
/// Item spawning needs the registry, the scene resolver, and the event
/// queue alive at once, which single accessor methods cannot lend.
pub struct WorldParts<'a> {
    pub items: &'a mut WorldItemRegistry,
    pub events: &'a mut EventQueue,
    pub scenes: &'a mut dyn SceneResolver,
}

/// Aggregate world view handed to state machines per tick.
///
/// Bundles the shared, host-owned pieces every state might touch. The
/// narrow sub-traits stay separate so hosts can implement them on
/// different objects and compose here.
pub trait GameWorld {
    /// Splits out registry, events, and scene resolver simultaneously.
    fn parts(&mut self) -> WorldParts<'_>;

    /// Overlap snapshots.
    fn overlaps(&self) -> &dyn OverlapQuery;

    /// Cross-actor combat effects.
    fn targets(&mut self) -> &mut dyn CombatTargets;

    /// Spawned world items and pickup props.
    fn items(&mut self) -> &mut WorldItemRegistry {
        self.parts().items
    }

    /// Event queue for this tick.
    fn events(&mut self) -> &mut EventQueue {
        self.parts().events
    }

    /// Scene resolution for item spawning.
    fn scenes(&mut self) -> &mut dyn SceneResolver {
        self.parts().scenes
    }
}
