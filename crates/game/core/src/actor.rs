//! Actors - the controlled entities.

use glam::Vec2;

use crate::events::{EventQueue, GameEvent};

/// Stable identifier of an actor for its lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActorId(pub u32);

impl ActorId {
    /// The player-controlled actor.
    pub const PLAYER: ActorId = ActorId(0);
}

/// Horizontal facing of an actor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    /// Unit direction along the x axis.
    pub fn dir(self) -> Vec2 {
        match self {
            Facing::Left => Vec2::new(-1.0, 0.0),
            Facing::Right => Vec2::new(1.0, 0.0),
        }
    }
}

/// Pending hurt reaction recorded by [`Actor::take_damage`] and consumed by
/// the actor's state machine on its next update.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HurtTrigger {
    pub origin: Option<Vec2>,
    pub attacker: Option<ActorId>,
    /// True when the damage was lethal.
    pub lethal: bool,
}

/// A controlled entity: position, facing, velocity, health.
///
/// State objects hold only the actor's id; the actor itself is owned by its
/// per-actor context and mutated by exactly one call chain per tick.
#[derive(Clone, Debug)]
pub struct Actor {
    pub id: ActorId,
    /// Diagnostic name used in logs.
    pub name: String,
    pub position: Vec2,
    pub velocity: Vec2,
    pub facing: Facing,
    /// Base movement speed in world units per second.
    pub move_speed: f32,
    pub hp: u32,
    pub max_hp: u32,
    /// Unarmed attack damage before item and skill bonuses.
    pub base_damage: f32,
    pending_hurt: Option<HurtTrigger>,
}

impl Actor {
    pub fn new(id: ActorId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            facing: Facing::default(),
            move_speed: 120.0,
            hp: 20,
            max_hp: 20,
            base_damage: 2.0,
            pending_hurt: None,
        }
    }

    pub fn at(mut self, position: Vec2) -> Self {
        self.position = position;
        self
    }

    pub fn with_health(mut self, hp: u32) -> Self {
        self.hp = hp;
        self.max_hp = hp;
        self
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Unit vector the actor is facing along.
    pub fn facing_dir(&self) -> Vec2 {
        self.facing.dir()
    }

    /// Flips facing from a horizontal input component.
    pub fn flip_facing(&mut self, right: bool) {
        self.facing = if right { Facing::Right } else { Facing::Left };
    }

    /// Applies damage, records the hurt trigger for the state machine, and
    /// publishes the resulting events. HP saturates at zero.
    pub fn take_damage(
        &mut self,
        amount: u32,
        origin: Option<Vec2>,
        attacker: Option<ActorId>,
        events: &mut EventQueue,
    ) {
        if !self.is_alive() {
            return;
        }
        self.hp = self.hp.saturating_sub(amount);
        events.push(GameEvent::DamageDealt {
            target: self.id,
            amount,
            attacker,
        });
        let lethal = self.hp == 0;
        if lethal {
            events.push(GameEvent::ActorDied { actor: self.id });
        }
        self.pending_hurt = Some(HurtTrigger {
            origin,
            attacker,
            lethal,
        });
    }

    /// Adds a knockback impulse to the current velocity.
    pub fn apply_knockback(&mut self, velocity: Vec2) {
        self.velocity += velocity;
    }

    /// Consumes the pending hurt trigger, if any. States call this at the
    /// top of their update to decide Hurt/Death transitions.
    pub fn take_hurt_trigger(&mut self) -> Option<HurtTrigger> {
        self.pending_hurt.take()
    }

    /// Integrates velocity into position for one tick. Hosts with their own
    /// character physics sync `position` instead of calling this.
    pub fn integrate(&mut self, delta: f32) {
        self.position += self.velocity * delta;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn damage_saturates_and_reports_death_once() {
        let mut events = EventQueue::new();
        let mut actor = Actor::new(ActorId(1), "dummy").with_health(5);
        actor.take_damage(3, None, None, &mut events);
        assert_eq!(actor.hp, 2);
        actor.take_damage(10, None, None, &mut events);
        assert_eq!(actor.hp, 0);
        assert!(!actor.is_alive());
        // further damage on a dead actor is ignored
        actor.take_damage(1, None, None, &mut events);
        let died = events
            .drain()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::ActorDied { .. }))
            .count();
        assert_eq!(died, 1);
    }

    #[test]
    fn hurt_trigger_is_consumed_once() {
        let mut events = EventQueue::new();
        let mut actor = Actor::new(ActorId(1), "dummy");
        actor.take_damage(1, Some(Vec2::new(1.0, 0.0)), None, &mut events);
        let trigger = actor.take_hurt_trigger().unwrap();
        assert!(!trigger.lethal);
        assert!(actor.take_hurt_trigger().is_none());
    }
}
