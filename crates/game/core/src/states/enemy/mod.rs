//! Enemy state set: Idle, Chase, Attack, Hurt, Death.
//!
//! Enemies share the player's machine and attack-template machinery; their
//! intent comes from target tracking and the weighted attack controller
//! instead of input.

mod attack;
mod chase;
mod idle;
mod lifecycle;

pub use attack::EnemyAttackState;
pub use chase::EnemyChaseState;
pub use idle::EnemyIdleState;
pub use lifecycle::{EnemyDeathState, EnemyHurtState};

use crate::actor::{Actor, ActorId, HurtTrigger};
use crate::combat::EnemyAttackController;
use crate::env::AnimationSink;
use crate::fsm::{StateMachine, TransitionQueue};
use crate::rng::PcgRandom;

use super::names;

/// Behavior tunables of one enemy archetype.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EnemyBehavior {
    /// Distance at which the enemy notices its target.
    pub aggro_radius: f32,
    /// Distance at which the enemy stops chasing and attacks.
    pub attack_range: f32,
    /// Movement speed multiplier while chasing.
    pub chase_speed_multiplier: f32,
}

impl Default for EnemyBehavior {
    fn default() -> Self {
        Self {
            aggro_radius: 220.0,
            attack_range: 60.0,
            chase_speed_multiplier: 1.0,
        }
    }
}

/// Animation names of the enemy rig.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EnemyAnimations {
    pub idle: String,
    pub walk: String,
    pub hurt: String,
    pub death: String,
}

impl Default for EnemyAnimations {
    fn default() -> Self {
        Self {
            idle: "idle".to_owned(),
            walk: "walk".to_owned(),
            hurt: "hurt".to_owned(),
            death: "death".to_owned(),
        }
    }
}

/// Everything actor-personal the enemy states operate on.
pub struct EnemyContext {
    pub actor: Actor,
    pub controller: EnemyAttackController,
    pub animation: Box<dyn AnimationSink>,
    pub rng: PcgRandom,
    pub behavior: EnemyBehavior,
    pub animations: EnemyAnimations,
    /// Actor this enemy hunts, usually the player.
    pub target: Option<ActorId>,
    pub last_hurt: Option<HurtTrigger>,
}

impl EnemyContext {
    pub fn new(actor: Actor, controller: EnemyAttackController, animation: Box<dyn AnimationSink>) -> Self {
        let rng = PcgRandom::new(actor.id.0 as u64);
        Self {
            actor,
            controller,
            animation,
            rng,
            behavior: EnemyBehavior::default(),
            animations: EnemyAnimations::default(),
            target: Some(ActorId::PLAYER),
            last_hurt: None,
        }
    }
}

/// Builds the enemy machine with the full state set registered.
pub fn enemy_state_machine(ctx: &EnemyContext) -> StateMachine<EnemyContext> {
    let mut machine = StateMachine::new(ctx.actor.id);
    machine
        .add_state(Box::new(EnemyIdleState::new()))
        .add_state(Box::new(EnemyChaseState::new()))
        .add_state(Box::new(EnemyAttackState::new()))
        .add_state(Box::new(EnemyHurtState::new()))
        .add_state(Box::new(EnemyDeathState::new()));
    machine
}

/// Routes a pending hurt trigger into the Hurt or Death state.
pub(crate) fn interrupt_gate(ctx: &mut EnemyContext, queue: &mut TransitionQueue) -> bool {
    if let Some(trigger) = ctx.actor.take_hurt_trigger() {
        ctx.last_hurt = Some(trigger);
        queue.change_state(if trigger.lethal { names::DEATH } else { names::HURT });
        return true;
    }
    false
}
